//! Per-conversation state passed into turn handling

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ChatMessage, ChatRole};

/// Message history of one support conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    id: Uuid,
    welcome: Option<String>,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            welcome: None,
            messages: Vec::new(),
        }
    }

    /// Start with an assistant greeting; it does not count as a question
    pub fn with_welcome(welcome: impl Into<String>) -> Self {
        let welcome = welcome.into();

        Self {
            id: Uuid::new_v4(),
            messages: vec![ChatMessage::assistant(welcome.clone())],
            welcome: Some(welcome),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True until the first user question has been recorded
    pub fn is_first_question(&self) -> bool {
        self.user_turns() == 0
    }

    pub fn user_turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == ChatRole::User)
            .count()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Drop the history and start a new conversation with the same greeting
    pub fn clear(&mut self) {
        self.id = Uuid::new_v4();
        self.messages.clear();

        if let Some(welcome) = &self.welcome {
            self.messages.push(ChatMessage::assistant(welcome.clone()));
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
