//! Version 1 of the collaborator API.
//!
//! Handlers are thin wrappers that validate input, call the gateway and
//! return JSON-friendly payloads. Failures cross the boundary as
//! [`ApiError`] so no provider types leak to the UI.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assistant::conversation::ConversationTurn;
use crate::assistant::grounding::{GeoLocation, GroundingRequest};
use crate::assistant::modes::{ContentTier, InteractionMode};
use crate::assistant::response::SourceChunk;
use crate::errors::{GatewayError, LocationError};
use crate::gateway::AiGateway;

/// Shared state handed to each handler.
#[derive(Clone)]
pub struct ApiState {
    pub gateway: Arc<AiGateway>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message} [{code}]")]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub explain: String,
}

impl ApiError {
    fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            code: "API-4000".to_string(),
            message: message.into(),
            explain: "The request was rejected before contacting the AI provider.".to_string(),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            explain: err.explain().to_string(),
        }
    }
}

impl From<LocationError> for ApiError {
    fn from(err: LocationError) -> Self {
        Self::invalid_input(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct AiChatInput {
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
    pub message: String,
    /// Mode label as shown in the UI; unknown labels mean Standard.
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AiChatOutput {
    pub model: String,
    pub text: String,
}

/// One chatbot exchange.
pub async fn ai_chat(state: &ApiState, input: AiChatInput) -> Result<AiChatOutput, ApiError> {
    let message = input.message.trim();
    if message.is_empty() {
        return Err(ApiError::invalid_input("message must not be blank"));
    }
    let mode = input
        .mode
        .as_deref()
        .map(InteractionMode::from_label)
        .unwrap_or_default();
    let reply = state
        .gateway
        .chat_turn(&input.history, message, mode)
        .await?;
    Ok(AiChatOutput {
        model: reply.model,
        text: reply.text,
    })
}

#[derive(Debug, Deserialize)]
pub struct AiAskInput {
    pub prompt: String,
    #[serde(default)]
    pub tier: ContentTier,
}

#[derive(Debug, Serialize)]
pub struct AiAskOutput {
    pub text: String,
}

/// One-off question without history or tools.
pub async fn ai_ask(state: &ApiState, input: AiAskInput) -> Result<AiAskOutput, ApiError> {
    let prompt = input.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::invalid_input("prompt must not be blank"));
    }
    let text = state.gateway.single_shot(prompt, input.tier).await?;
    Ok(AiAskOutput { text })
}

#[derive(Debug, Deserialize)]
pub struct AiAssistInput {
    /// Editing instruction, e.g. "Simplify for first-year students".
    pub instruction: String,
    pub current_content: String,
    #[serde(default)]
    pub tier: ContentTier,
}

#[derive(Debug, Serialize)]
pub struct AiAssistOutput {
    pub content: String,
}

pub fn assist_prompt(instruction: &str, current_content: &str) -> String {
    format!("{instruction}:\n\n---\n\n{current_content}")
}

/// Rewrite lesson content following an instruction.
pub async fn ai_assist_content(
    state: &ApiState,
    input: AiAssistInput,
) -> Result<AiAssistOutput, ApiError> {
    if input.instruction.trim().is_empty() {
        return Err(ApiError::invalid_input("instruction must not be blank"));
    }
    let prompt = assist_prompt(input.instruction.trim(), &input.current_content);
    let content = state.gateway.single_shot(&prompt, input.tier).await?;
    Ok(AiAssistOutput { content })
}

#[derive(Debug, Deserialize)]
pub struct AiResearchInput {
    pub query: String,
    #[serde(default)]
    pub use_maps: bool,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct AiResearchOutput {
    pub text: String,
    pub sources: Vec<SourceChunk>,
}

/// Grounded research question for the assistant panel.
///
/// Coordinates are only read when maps is on, and only used when both are
/// present; maps may be enabled before the location resolves.
pub async fn ai_research(
    state: &ApiState,
    input: AiResearchInput,
) -> Result<AiResearchOutput, ApiError> {
    let query = input.query.trim();
    if query.is_empty() {
        return Err(ApiError::invalid_input("query must not be blank"));
    }
    let mut request = GroundingRequest::search(query);
    if input.use_maps {
        let location = match (input.latitude, input.longitude) {
            (Some(lat), Some(lng)) => Some(GeoLocation::new(lat, lng)?),
            _ => None,
        };
        request = request.with_maps(location);
    }
    let result = state.gateway.grounded_query(&request).await?;
    Ok(AiResearchOutput {
        text: result.text,
        sources: result.sources,
    })
}
