use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::GatewayError;

use super::config::{Credential, GatewayConfig};
use super::wire::GenerateContentRequest;

/// One request-response exchange with the provider, returning the raw body.
#[async_trait]
pub trait GenerativeTransport: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<Value, GatewayError>;
}

/// Builds the transport once a credential is available.
pub trait Connector: Send + Sync {
    fn connect(
        &self,
        config: &GatewayConfig,
        credential: Credential,
    ) -> Result<Arc<dyn GenerativeTransport>, GatewayError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    fn connect(
        &self,
        config: &GatewayConfig,
        credential: Credential,
    ) -> Result<Arc<dyn GenerativeTransport>, GatewayError> {
        Ok(Arc::new(HttpTransport::new(config, credential)?))
    }
}

pub struct HttpTransport {
    client: Client,
    config: GatewayConfig,
    credential: Credential,
}

impl HttpTransport {
    pub fn new(config: &GatewayConfig, credential: Credential) -> Result<Self, GatewayError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GatewayError::ClientSetup(err.to_string()))?;
        Ok(Self {
            client,
            config: config.clone(),
            credential,
        })
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

#[async_trait]
impl GenerativeTransport for HttpTransport {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<Value, GatewayError> {
        let response = self
            .client
            .post(self.config.endpoint(model))
            .header("x-goog-api-key", self.credential.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|env| env.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(GatewayError::ProviderStatus {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::conversation::single_prompt;
    use crate::assistant::response::response_text;
    use crate::assistant::wire::decode_response;
    use mockito::Matcher;
    use serde_json::json;

    fn transport_for(server: &mockito::ServerGuard) -> HttpTransport {
        let config = GatewayConfig::default().with_base_url(server.url());
        HttpTransport::new(&config, Credential::new("test-key")).unwrap()
    }

    #[tokio::test]
    async fn posts_to_model_endpoint_with_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Summarise photosynthesis" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{ "content": { "role": "model", "parts": [{ "text": "Plants make sugar." }] } }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let transport = transport_for(&server);
        let request = GenerateContentRequest::new(single_prompt("Summarise photosynthesis"));
        let raw = transport
            .generate_content("gemini-2.5-flash", &request)
            .await
            .unwrap();
        let response = decode_response(&raw).unwrap();
        assert_eq!(response_text(&response), "Plants make sugar.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_carries_provider_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(json!({ "error": { "code": 429, "message": "Quota exceeded" } }).to_string())
            .create_async()
            .await;

        let transport = transport_for(&server);
        let request = GenerateContentRequest::new(single_prompt("hi"));
        let err = transport
            .generate_content("gemini-2.5-pro", &request)
            .await
            .unwrap_err();
        match err {
            GatewayError::ProviderStatus { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let transport = transport_for(&server);
        let request = GenerateContentRequest::new(single_prompt("hi"));
        let err = transport
            .generate_content("gemini-2.5-flash", &request)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "AI-1003");
        assert!(!err.is_configuration());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let config = GatewayConfig::default().with_base_url("http://127.0.0.1:1");
        let transport = HttpTransport::new(&config, Credential::new("k")).unwrap();
        let request = GenerateContentRequest::new(single_prompt("hi"));
        let err = transport
            .generate_content("gemini-2.5-flash", &request)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "AI-1001");
    }

    #[tokio::test]
    async fn transport_errors_do_not_carry_the_key() {
        let config = GatewayConfig::default().with_base_url("http://127.0.0.1:1");
        let transport = HttpTransport::new(&config, Credential::new("SECRET-KEY-123")).unwrap();
        let request = GenerateContentRequest::new(single_prompt("hi"));
        let err = transport
            .generate_content("gemini-2.5-flash", &request)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "AI-1001");
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }
}
