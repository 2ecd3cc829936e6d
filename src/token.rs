use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthExchangeError {
    #[error("token endpoint unreachable: {0}")]
    Http(String),
    #[error("token endpoint returned status {0}")]
    Status(http::StatusCode),
    #[error("token endpoint response missing client_token")]
    MalformedResponse,
}

/// Exchanges the process-wide secret for a short-lived, single-user widget
/// token. The token is issued per page render, never persisted, and never
/// logged.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    async fn user_token(&self) -> Result<String, AuthExchangeError>;
}

#[derive(Debug, Deserialize)]
struct UserTokenResponse {
    client_token: String,
}

/// HTTP client for the EmbedWorkflow user-token endpoint. One POST per page
/// render, single attempt, no retry or backoff.
pub struct EmbedWorkflowClient {
    base_url: url::Url,
    secret_key: String,
    client: reqwest::Client,
}

impl EmbedWorkflowClient {
    pub fn new(base_url: &str, secret_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let base_url: url::Url = base_url.parse()?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            secret_key,
            client,
        })
    }
}

#[async_trait]
impl TokenExchanger for EmbedWorkflowClient {
    async fn user_token(&self) -> Result<String, AuthExchangeError> {
        let url = self
            .base_url
            .join("/api/v1/user_token")
            .map_err(|e| AuthExchangeError::Http(e.to_string()))?;
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AuthExchangeError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%status, "user token exchange rejected");
            return Err(AuthExchangeError::Status(status));
        }

        let body: UserTokenResponse = resp
            .json()
            .await
            .map_err(|_| AuthExchangeError::MalformedResponse)?;
        Ok(body.client_token)
    }
}

/// Fixed-token exchanger for tests and offline development.
pub struct StaticTokenExchanger(pub String);

#[async_trait]
impl TokenExchanger for StaticTokenExchanger {
    async fn user_token(&self) -> Result<String, AuthExchangeError> {
        Ok(self.0.clone())
    }
}
