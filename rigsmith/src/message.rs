//! Chat message types sent to the generative-text provider.
//!
//! The planner builds a short message list per generation call: the system framing
//! first, then the user request (or adjustment feedback).

/// A single message in a generation request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Message {
    /// System framing; placed first in the list.
    System(String),
    /// User request or feedback.
    User(String),
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    /// Text content regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Self::System(s) | Self::User(s) => s,
        }
    }
}
