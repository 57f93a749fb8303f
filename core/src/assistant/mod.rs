pub mod config;
pub mod conversation;
pub mod grounding;
pub mod modes;
pub mod response;
pub mod transport;
pub mod wire;

pub use config::{Credential, CredentialSource, GatewayConfig};
pub use conversation::{assemble_contents, ConversationTurn, Role};
pub use grounding::{configure_grounding, GeoLocation, GroundingPlan, GroundingRequest};
pub use modes::{select_model, ContentTier, InteractionMode, ModelSelection};
pub use response::{normalize_grounded, GroundingResult, ReviewSnippet, SourceChunk};
pub use transport::{Connector, GenerativeTransport, HttpConnector, HttpTransport};
