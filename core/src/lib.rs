//! Core library for the Edu Tracker AI assistant.
//!
//! The modules split along the request path:
//! - [`assistant`] holds model selection, conversation assembly, grounding
//!   tools, response normalisation and the provider transport.
//! - [`gateway`] is the composition root that owns the provider client.
//! - [`chat`] keeps the chatbot's visible message list.
//! - [`api`] exposes the plain-data handlers the UI invokes.
//! - [`errors`] keeps the central error catalogue with human friendly metadata.
//! - [`logging`] emits structured diagnostics through the `log` facade.

pub mod api;
pub mod assistant;
pub mod chat;
pub mod errors;
pub mod gateway;
pub mod logging;

pub use errors::{ErrorKind, GatewayError, LocationError};
pub use gateway::{AiGateway, ChatReply, GatewayState};
