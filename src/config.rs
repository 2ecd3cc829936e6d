use anyhow::Context;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_EMBED_WORKFLOW_API_URL: &str = "https://embedworkflow.com";

/// Runtime configuration for the lead detail server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    /// Server-side EmbedWorkflow secret key. Stays on the server; never
    /// rendered, logged, or embedded in props.
    pub embed_workflow_sk: String,
    /// Public key handed to the browser-side widget loader.
    pub embed_workflow_pk: String,
    /// Base URL of the EmbedWorkflow API. Overridable so tests can point
    /// the token exchange at a local mock.
    pub embed_workflow_api_url: String,
    pub token_exchange_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr: SocketAddr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("failed to parse BIND_ADDR")?;

        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let embed_workflow_sk =
            std::env::var("EMBED_WORKFLOW_SK").context("EMBED_WORKFLOW_SK not set")?;
        let embed_workflow_pk =
            std::env::var("EMBED_WORKFLOW_PK").context("EMBED_WORKFLOW_PK not set")?;

        let embed_workflow_api_url = std::env::var("EMBED_WORKFLOW_API_URL")
            .unwrap_or_else(|_| DEFAULT_EMBED_WORKFLOW_API_URL.to_string());

        let token_exchange_timeout = std::env::var("TOKEN_EXCHANGE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(5000));

        Ok(Self {
            bind_addr,
            database_url,
            embed_workflow_sk,
            embed_workflow_pk,
            embed_workflow_api_url,
            token_exchange_timeout,
        })
    }
}
