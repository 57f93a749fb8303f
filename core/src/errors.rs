use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("AI credential is not configured ({0} is unset)")] MissingCredential(String),
    #[error("AI client could not be constructed: {0}")] ClientSetup(String),
    #[error("AI provider request failed: {0}")] Transport(String),
    #[error("AI provider returned status {status}: {message}")] ProviderStatus { status: u16, message: String },
    #[error("AI provider response could not be decoded: {0}")] Decode(String),
}

/// Coarse taxonomy surfaced to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Provider,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential(_) | Self::ClientSetup(_) => ErrorKind::Configuration,
            Self::Transport(_) | Self::ProviderStatus { .. } | Self::Decode(_) => ErrorKind::Provider,
        }
    }
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) => "CFG-1001",
            Self::ClientSetup(_) => "CFG-1002",
            Self::Transport(_) => "AI-1001",
            Self::ProviderStatus { .. } => "AI-1002",
            Self::Decode(_) => "AI-1003",
        }
    }
    pub fn explain(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) => "The AI assistant needs an API key in the environment. Restart with the key set.",
            Self::ClientSetup(_) => "The HTTP client for the AI provider could not be built from the current settings.",
            Self::Transport(_) => "The AI provider could not be reached. Please try again.",
            Self::ProviderStatus { .. } => "The AI provider rejected the request. Please try again.",
            Self::Decode(_) => "The AI provider sent a response in an unexpected format.",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Rejected coordinates for a maps bias.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("coordinates must be finite numbers")] NotFinite,
    #[error("latitude {0} is outside [-90, 90]")] LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")] LongitudeOutOfRange(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_split_configuration_from_provider() {
        assert!(GatewayError::MissingCredential("API_KEY".into()).is_configuration());
        assert!(GatewayError::ClientSetup("tls".into()).is_configuration());
        assert_eq!(GatewayError::Transport("reset".into()).kind(), ErrorKind::Provider);
        assert_eq!(
            GatewayError::ProviderStatus { status: 429, message: "quota".into() }.kind(),
            ErrorKind::Provider
        );
        assert_eq!(GatewayError::Decode("eof".into()).kind(), ErrorKind::Provider);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(GatewayError::MissingCredential("API_KEY".into()).code(), "CFG-1001");
        assert_eq!(
            GatewayError::ProviderStatus { status: 500, message: String::new() }.code(),
            "AI-1002"
        );
    }
}
