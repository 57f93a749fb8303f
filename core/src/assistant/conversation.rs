use serde::{Deserialize, Serialize};

use super::wire::{Content, Part};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One utterance in a chronological dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

impl From<&ConversationTurn> for Content {
    fn from(turn: &ConversationTurn) -> Self {
        Content {
            role: Some(turn.role),
            parts: vec![Part::text(turn.text.clone())],
        }
    }
}

/// Thread `history` and the new message into request contents.
///
/// Turns are emitted exactly as given, followed by one `user` entry. Empty
/// messages are passed through; callers trim before calling.
pub fn assemble_contents(history: &[ConversationTurn], new_message: &str) -> Vec<Content> {
    let mut contents: Vec<Content> = Vec::with_capacity(history.len() + 1);
    contents.extend(history.iter().map(Content::from));
    contents.push(Content {
        role: Some(Role::User),
        parts: vec![Part::text(new_message)],
    });
    contents
}

/// Wrap a bare prompt as a single user turn.
pub fn single_prompt(prompt: &str) -> Vec<Content> {
    assemble_contents(&[], prompt)
}
