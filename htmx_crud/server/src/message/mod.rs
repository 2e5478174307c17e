use std::sync::Arc;

use crate::repository::{Entity, InMemoryRepository};
use crate::service::{ServiceError, require_text};

pub mod api;
pub mod web;

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Message {
    id: u64,
    text: String,
}

impl Message {
    pub fn new(id: u64, text: String) -> Self {
        Self { id, text }
    }

    /// Returns the ID of the message.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the message text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Entity for Message {
    fn id(&self) -> u64 {
        self.id
    }
}

pub type MessageRepository = InMemoryRepository<Message>;

#[derive(Clone, Default)]
pub struct MessageState {
    pub repository: Arc<MessageRepository>,
}

pub struct MessageService<'a> {
    repository: &'a MessageRepository,
}

impl MessageService<'_> {
    pub fn new(repository: &MessageRepository) -> MessageService<'_> {
        MessageService { repository }
    }

    /// Retrieves all messages in the order they were posted.
    #[tracing::instrument(skip(self))]
    pub fn list(&self) -> Vec<Message> {
        self.repository.find_all()
    }

    /// Posts a new message.
    ///
    /// # Arguments
    ///
    /// * `text` - The message body. Surrounding whitespace is dropped.
    ///
    /// # Returns
    ///
    /// The created `Message`, or `InvalidInput` if the text is blank.
    #[tracing::instrument(skip(self))]
    pub fn create(&self, text: &str) -> Result<Message, ServiceError> {
        let text = require_text("text", text)?;
        let message = self.repository.add(|id| Message::new(id, text));
        tracing::info!(id = message.id(), "Message created");
        Ok(message)
    }

    #[tracing::instrument(skip(self))]
    pub fn get(&self, id: u64) -> Result<Message, ServiceError> {
        self.repository
            .find_by_id(id)
            .ok_or(ServiceError::not_found("Message", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_post_message() {
        let repository = MessageRepository::new();
        let service = MessageService::new(&repository);

        let message = service.create("  hello world ").unwrap();

        assert_eq!(message, Message::new(1, "hello world".to_string()));
        assert_eq!(service.list(), vec![message.clone()]);
        assert_eq!(service.get(message.id()), Ok(message));
    }

    #[test]
    fn rejects_blank_message() {
        let repository = MessageRepository::new();
        let service = MessageService::new(&repository);

        let result = service.create("   ");

        assert!(matches!(
            result,
            Err(ServiceError::InvalidInput { field: "text", .. })
        ));
        assert!(service.list().is_empty());
    }

    #[test]
    fn get_unknown_message_is_not_found() {
        let repository = MessageRepository::new();
        let service = MessageService::new(&repository);

        assert_eq!(service.get(42), Err(ServiceError::not_found("Message", 42)));
    }
}
