//! Chatbot conversation state as shown in the assistant drawer.

use serde::{Deserialize, Serialize};

use crate::assistant::conversation::ConversationTurn;
use crate::assistant::modes::InteractionMode;
use crate::errors::GatewayError;
use crate::gateway::AiGateway;

pub const APOLOGY_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl From<&ChatMessage> for ConversationTurn {
    fn from(message: &ChatMessage) -> Self {
        match message.sender {
            Sender::User => ConversationTurn::user(message.text.clone()),
            Sender::Bot => ConversationTurn::model(message.text.clone()),
        }
    }
}

#[derive(Debug)]
pub enum ChatOutcome {
    /// Blank input; nothing was sent.
    Ignored,
    Replied(String),
    /// The apology message was appended in place of a reply.
    Failed(GatewayError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pub mode: InteractionMode,
}

impl ChatSession {
    pub fn new(mode: InteractionMode) -> Self {
        Self {
            messages: Vec::new(),
            mode,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn history(&self) -> Vec<ConversationTurn> {
        self.messages.iter().map(ConversationTurn::from).collect()
    }

    /// Send `input` and record both sides of the exchange.
    ///
    /// The history sent to the model is everything before this message,
    /// including earlier apology messages.
    pub async fn send(&mut self, gateway: &AiGateway, input: &str) -> ChatOutcome {
        if input.trim().is_empty() {
            return ChatOutcome::Ignored;
        }
        let history = self.history();
        self.messages.push(ChatMessage {
            sender: Sender::User,
            text: input.to_string(),
        });

        match gateway.chat_turn(&history, input, self.mode).await {
            Ok(reply) => {
                self.messages.push(ChatMessage {
                    sender: Sender::Bot,
                    text: reply.text.clone(),
                });
                ChatOutcome::Replied(reply.text)
            }
            Err(err) => {
                log::warn!(target: "ai.chat", "chat turn failed: {err}");
                self.messages.push(ChatMessage {
                    sender: Sender::Bot,
                    text: APOLOGY_MESSAGE.to_string(),
                });
                ChatOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::conversation::Role;
    use crate::gateway::tests::{gateway_with_key, text_body, FakeConnector};

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let connector = FakeConnector::new();
        let gateway = gateway_with_key(connector.clone());
        let mut session = ChatSession::default();

        assert!(matches!(session.send(&gateway, "   \n").await, ChatOutcome::Ignored));
        assert!(session.messages().is_empty());
        assert!(connector.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn replies_are_threaded_into_the_next_turn() {
        let connector = FakeConnector::new();
        let gateway = gateway_with_key(connector.clone());
        let mut session = ChatSession::new(InteractionMode::Fast);

        connector.transport.reply(Ok(text_body("An ordered list of steps.")));
        let first = session.send(&gateway, "What is an algorithm?").await;
        assert!(matches!(first, ChatOutcome::Replied(ref t) if t == "An ordered list of steps."));

        session.send(&gateway, "Example?").await;
        let calls = connector.transport.calls();
        assert_eq!(calls[1].0, "gemini-2.5-flash-lite");
        let contents = calls[1].1["contents"].as_array().unwrap().clone();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "An ordered list of steps.");

        let history = session.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[3].role, Role::Model);
    }

    #[tokio::test]
    async fn failures_append_apology() {
        let connector = FakeConnector::new();
        let gateway = gateway_with_key(connector.clone());
        let mut session = ChatSession::default();

        connector
            .transport
            .reply(Err(GatewayError::Transport("connection reset".into())));
        let outcome = session.send(&gateway, "Hello").await;
        assert!(matches!(outcome, ChatOutcome::Failed(_)));
        assert_eq!(
            session.messages(),
            &[
                ChatMessage {
                    sender: Sender::User,
                    text: "Hello".into()
                },
                ChatMessage {
                    sender: Sender::Bot,
                    text: APOLOGY_MESSAGE.into()
                },
            ]
        );
    }
}
