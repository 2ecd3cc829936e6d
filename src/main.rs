mod config;
mod page;
mod sdk;
mod serialize;
mod server;
mod store;
mod token;

use crate::config::AppConfig;
use crate::server::AppState;
use crate::store::PgLeadStore;
use crate::token::EmbedWorkflowClient;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store: Arc<dyn crate::store::LeadStore> = Arc::new(PgLeadStore::new(pool));

    let tokens: Arc<dyn crate::token::TokenExchanger> = Arc::new(EmbedWorkflowClient::new(
        &config.embed_workflow_api_url,
        config.embed_workflow_sk.clone(),
        config.token_exchange_timeout,
    )?);

    let state = AppState::new(config.clone(), store, tokens);

    let addr: SocketAddr = config.bind_addr;
    tracing::info!(%addr, "starting leadflow-gui server");
    server::run(addr, state).await?;
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
