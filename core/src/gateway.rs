//! Composition root for every AI call the application makes.
//!
//! The gateway owns a single provider transport that is created on the
//! first call. Initialisation runs at most once: concurrent first callers
//! wait on the same initialiser, and a missing credential is remembered so
//! that every later call fails the same way without reaching the network.

use std::sync::Arc;

use log::Level;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::assistant::config::GatewayConfig;
use crate::assistant::conversation::{assemble_contents, single_prompt, ConversationTurn};
use crate::assistant::grounding::GroundingRequest;
use crate::assistant::modes::{select_model, ContentTier, InteractionMode, GROUNDED_MODEL};
use crate::assistant::response::{normalize_grounded, response_text, GroundingResult};
use crate::assistant::transport::{Connector, GenerativeTransport, HttpConnector};
use crate::assistant::wire::{
    decode_response, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::errors::GatewayError;
use crate::logging::log_event;

const LOG_MODULE: &str = "ai.gateway";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    Uninitialized,
    Ready,
}

/// Reply to a chat turn. `raw` keeps the provider body as plain JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub model: String,
    pub text: String,
    pub raw: Value,
}

pub struct AiGateway {
    config: GatewayConfig,
    connector: Arc<dyn Connector>,
    transport: OnceCell<Result<Arc<dyn GenerativeTransport>, GatewayError>>,
}

impl AiGateway {
    /// Gateway backed by the HTTPS transport.
    pub fn new(config: GatewayConfig) -> Arc<Self> {
        Self::with_connector(config, Arc::new(HttpConnector))
    }

    pub fn with_connector(config: GatewayConfig, connector: Arc<dyn Connector>) -> Arc<Self> {
        Arc::new(Self {
            config,
            connector,
            transport: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn state(&self) -> GatewayState {
        match self.transport.get() {
            Some(Ok(_)) => GatewayState::Ready,
            _ => GatewayState::Uninitialized,
        }
    }

    /// Send one chat turn threaded onto `history`.
    pub async fn chat_turn(
        &self,
        history: &[ConversationTurn],
        new_message: &str,
        mode: InteractionMode,
    ) -> Result<ChatReply, GatewayError> {
        let selection = select_model(mode);
        let request = GenerateContentRequest {
            generation_config: GenerationConfig::from_invocation(&selection.config),
            ..GenerateContentRequest::new(assemble_contents(history, new_message))
        };
        let (body, raw) = self.invoke("chat_turn", selection.model, &request).await?;
        Ok(ChatReply {
            model: selection.model.to_string(),
            text: response_text(&body),
            raw,
        })
    }

    /// Stateless generation without history or tools.
    pub async fn single_shot(
        &self,
        prompt_text: &str,
        tier: ContentTier,
    ) -> Result<String, GatewayError> {
        let request = GenerateContentRequest::new(single_prompt(prompt_text));
        let (body, _) = self.invoke("single_shot", tier.model(), &request).await?;
        Ok(response_text(&body))
    }

    /// Search-grounded query, optionally with maps retrieval.
    pub async fn grounded_query(
        &self,
        request: &GroundingRequest,
    ) -> Result<GroundingResult, GatewayError> {
        let plan = request.plan();
        let payload = GenerateContentRequest {
            tools: Some(plan.tools),
            tool_config: Some(plan.tool_config),
            ..GenerateContentRequest::new(single_prompt(&request.prompt_text))
        };
        let (body, _) = self
            .invoke("grounded_query", GROUNDED_MODEL, &payload)
            .await?;
        Ok(normalize_grounded(&body))
    }

    async fn transport(&self) -> Result<Arc<dyn GenerativeTransport>, GatewayError> {
        let slot = self
            .transport
            .get_or_init(|| async { self.initialise() })
            .await;
        slot.clone()
    }

    fn initialise(&self) -> Result<Arc<dyn GenerativeTransport>, GatewayError> {
        let Some(credential) = self.config.credential.read() else {
            let err = GatewayError::MissingCredential(self.config.credential.describe());
            log_event(
                Level::Error,
                Some(err.code()),
                LOG_MODULE,
                "AI gateway has no credential",
                Some(err.explain()),
                None,
            );
            return Err(err);
        };
        let transport = self.connector.connect(&self.config, credential);
        match &transport {
            Ok(_) => {
                log_event(
                    Level::Info,
                    Some("AI-0100"),
                    LOG_MODULE,
                    "AI gateway initialised",
                    None,
                    Some(serde_json::json!({ "base_url": self.config.base_url })),
                );
            }
            Err(err) => {
                log_event(
                    Level::Error,
                    Some(err.code()),
                    LOG_MODULE,
                    "AI gateway initialisation failed",
                    Some(err.explain()),
                    Some(serde_json::json!({ "error": err.to_string() })),
                );
            }
        }
        transport
    }

    async fn invoke(
        &self,
        operation: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<(GenerateContentResponse, Value), GatewayError> {
        let transport = self.transport().await?;
        let outcome = match transport.generate_content(model, request).await {
            Ok(raw) => decode_response(&raw).map(|body| (body, raw)),
            Err(err) => Err(err),
        };
        match &outcome {
            Ok((body, _)) => log_invocation_success(operation, model, &response_text(body)),
            Err(err) => log_invocation_failure(operation, model, err),
        }
        outcome
    }
}

fn log_invocation_success(operation: &str, model: &str, text: &str) {
    let preview = text.chars().take(200).collect::<String>();
    log_event(
        Level::Info,
        Some("AI-0200"),
        LOG_MODULE,
        "AI invocation succeeded",
        None,
        Some(serde_json::json!({
            "operation": operation,
            "model": model,
            "preview": preview,
        })),
    );
}

fn log_invocation_failure(operation: &str, model: &str, error: &GatewayError) {
    log_event(
        Level::Warn,
        Some("AI-0201"),
        LOG_MODULE,
        "AI provider invocation failed",
        Some(error.explain()),
        Some(serde_json::json!({
            "operation": operation,
            "model": model,
            "code": error.code(),
            "error": error.to_string(),
        })),
    );
}
