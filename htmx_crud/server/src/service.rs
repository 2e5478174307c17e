/// Error type shared by the message, task and user services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// A submitted field failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    /// No entity with the given id exists.
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: u64 },
}

impl ServiceError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: u64) -> Self {
        Self::NotFound { entity, id }
    }
}

pub const MIN_AGE: i32 = 0;
pub const MAX_AGE: i32 = 130;

/// Trims `value` and rejects it if nothing is left.
///
/// # Returns
///
/// The trimmed value, which is what gets stored.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::invalid(field, "must not be blank"));
    }
    Ok(trimmed.to_string())
}

/// Accepts a missing age or one within `MIN_AGE..=MAX_AGE`.
pub fn validate_age(age: Option<i32>) -> Result<Option<u8>, ServiceError> {
    match age {
        None => Ok(None),
        Some(age) if (MIN_AGE..=MAX_AGE).contains(&age) => u8::try_from(age)
            .map(Some)
            .map_err(|_| ServiceError::invalid("age", format!("{age} is out of range"))),
        Some(age) => Err(ServiceError::invalid(
            "age",
            format!("{age} is not between {MIN_AGE} and {MAX_AGE}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims_surrounding_whitespace() {
        assert_eq!(require_text("text", "  hello \n"), Ok("hello".to_string()));
    }

    #[test]
    fn require_text_rejects_blank_values() {
        for blank in ["", "   ", "\t\n"] {
            assert_eq!(
                require_text("title", blank),
                Err(ServiceError::invalid("title", "must not be blank"))
            );
        }
    }

    #[test]
    fn validate_age_accepts_bounds_and_absence() {
        assert_eq!(validate_age(None), Ok(None));
        assert_eq!(validate_age(Some(0)), Ok(Some(0)));
        assert_eq!(validate_age(Some(130)), Ok(Some(130)));
    }

    #[test]
    fn validate_age_rejects_values_outside_bounds() {
        assert!(matches!(
            validate_age(Some(-1)),
            Err(ServiceError::InvalidInput { field: "age", .. })
        ));
        assert!(matches!(
            validate_age(Some(131)),
            Err(ServiceError::InvalidInput { field: "age", .. })
        ));
    }

    #[test]
    fn error_messages_name_the_problem() {
        assert_eq!(
            ServiceError::not_found("Task", 3).to_string(),
            "Task with ID 3 not found"
        );
        assert_eq!(
            ServiceError::invalid("age", "200 is not between 0 and 130").to_string(),
            "Invalid age: 200 is not between 0 and 130"
        );
    }
}
