use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const CREDENTIAL_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];
const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
const TIMEOUT_VAR: &str = "EDUTRACK_REQUEST_TIMEOUT_SECS";

/// Provider API key. Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Where the gateway looks for its credential on first use.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// First non-blank variable wins.
    Env(Vec<String>),
    Fixed(Option<Credential>),
}

impl CredentialSource {
    pub fn env_default() -> Self {
        Self::Env(CREDENTIAL_VARS.iter().map(|v| v.to_string()).collect())
    }

    pub fn read(&self) -> Option<Credential> {
        match self {
            Self::Env(vars) => vars.iter().find_map(|var| {
                std::env::var(var)
                    .ok()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .map(Credential)
            }),
            Self::Fixed(value) => value.clone(),
        }
    }

    /// Name reported when no credential is found.
    pub fn describe(&self) -> String {
        match self {
            Self::Env(vars) => vars.join(" / "),
            Self::Fixed(_) => "configured credential".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub credential: CredentialSource,
    /// No deadline is applied unless set.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credential: CredentialSource::env_default(),
            request_timeout: None,
            user_agent: format!("EduTrack-Core/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GatewayConfig {
    /// Settings from the process environment. The credential itself is not
    /// read here; that is deferred to the gateway's first call.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(base_url) = non_blank_var(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        config.request_timeout = non_blank_var(TIMEOUT_VAR)
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        config
    }

    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = CredentialSource::Fixed(credential);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
