use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::repository::{Entity, InMemoryRepository};
use crate::service::{ServiceError, require_text, validate_age};

pub mod api;
pub mod web;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Female,
    Male,
    Other,
    #[default]
    Unknown,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Gender::Female, Gender::Male, Gender::Other, Gender::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "FEMALE",
            Gender::Male => "MALE",
            Gender::Other => "OTHER",
            Gender::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ServiceError::invalid("gender", format!("unknown value '{value}'")))
    }
}

/// Parses an optional gender parameter, treating a blank value as absent.
pub fn parse_gender(value: Option<&str>) -> Result<Option<Gender>, ServiceError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

/// Parses an age form field, treating a blank value as absent.
pub fn parse_age(value: Option<&str>) -> Result<Option<i32>, ServiceError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ServiceError::invalid("age", format!("'{value}' is not a number"))),
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct User {
    id: u64,
    first_name: String,
    last_name: String,
    age: Option<u8>,
    gender: Gender,
}

impl User {
    pub fn new(
        id: u64,
        first_name: String,
        last_name: String,
        age: Option<u8>,
        gender: Gender,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            age,
            gender,
        }
    }

    /// Returns the ID of the user.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn age(&self) -> Option<u8> {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    fn matches_name(&self, needle: &str) -> bool {
        self.first_name.to_lowercase().contains(needle)
            || self.last_name.to_lowercase().contains(needle)
    }
}

impl Entity for User {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Unvalidated user fields as submitted by a form or JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub gender: Gender,
}

/// User fields that passed validation.
struct ValidUser {
    first_name: String,
    last_name: String,
    age: Option<u8>,
    gender: Gender,
}

impl ValidUser {
    fn into_user(self, id: u64) -> User {
        User::new(id, self.first_name, self.last_name, self.age, self.gender)
    }
}

impl TryFrom<UserInput> for ValidUser {
    type Error = ServiceError;

    fn try_from(input: UserInput) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: require_text("first_name", &input.first_name)?,
            last_name: require_text("last_name", &input.last_name)?,
            age: validate_age(input.age)?,
            gender: input.gender,
        })
    }
}

pub type UserRepository = InMemoryRepository<User>;

#[derive(Clone, Default)]
pub struct UserState {
    pub repository: Arc<UserRepository>,
}

pub struct UserService<'a> {
    repository: &'a UserRepository,
}

impl UserService<'_> {
    pub fn new(repository: &UserRepository) -> UserService<'_> {
        UserService { repository }
    }

    /// Retrieves all users in creation order.
    #[tracing::instrument(skip(self))]
    pub fn list(&self) -> Vec<User> {
        self.repository.find_all()
    }

    /// Creates a new user.
    ///
    /// # Arguments
    ///
    /// * `input` - The submitted fields. Names are trimmed and must not be blank,
    ///   the age must be within 0 to 130 when given.
    ///
    /// # Returns
    ///
    /// The created `User`, or `InvalidInput` naming the first offending field.
    #[tracing::instrument(skip(self))]
    pub fn create(&self, input: UserInput) -> Result<User, ServiceError> {
        let valid = ValidUser::try_from(input)?;
        let user = self.repository.add(|id| valid.into_user(id));
        tracing::info!(id = user.id(), "User created");
        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    pub fn get(&self, id: u64) -> Result<User, ServiceError> {
        self.repository
            .find_by_id(id)
            .ok_or(ServiceError::not_found("User", id))
    }

    /// Replaces every field of an existing user except its ID.
    ///
    /// Input is validated before the store is touched, so a rejected update
    /// leaves the stored user unchanged.
    #[tracing::instrument(skip(self))]
    pub fn update(&self, id: u64, input: UserInput) -> Result<User, ServiceError> {
        let valid = ValidUser::try_from(input)?;
        let user = self
            .repository
            .update(valid.into_user(id))
            .ok_or(ServiceError::not_found("User", id))?;
        tracing::info!(id, "User updated");
        Ok(user)
    }

    /// Deletes a user by their ID.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: u64) -> Result<(), ServiceError> {
        if !self.repository.delete(id) {
            return Err(ServiceError::not_found("User", id));
        }
        tracing::info!(id, "User deleted");
        Ok(())
    }

    /// Filters users by name and gender.
    ///
    /// A user matches when the query is a case-insensitive substring of their
    /// first or last name and, if `gender` is given, their gender equals it.
    /// A missing or blank query matches every name. Results keep store order.
    #[tracing::instrument(skip(self))]
    pub fn search(&self, query: Option<&str>, gender: Option<Gender>) -> Vec<User> {
        let needle = query.map(str::trim).unwrap_or_default().to_lowercase();
        self.repository
            .find_all()
            .into_iter()
            .filter(|user| needle.is_empty() || user.matches_name(&needle))
            .filter(|user| gender.is_none_or(|gender| user.gender() == gender))
            .collect()
    }
}
