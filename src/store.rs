use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("lead store unavailable: {0}")]
    Provider(String),
}

/// A sales/marketing contact record. `execution_hashid` correlates the lead
/// to a workflow run on the EmbedWorkflow platform; leads without one have no
/// execution to visualize.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub execution_hashid: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Pluggable lookup against the lead store. Read-only: leads are created and
/// mutated outside this service.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Lead>, StoreError>;
}

/// Postgres-backed store. Single keyed lookup, no retries; failures surface
/// to the page handler.
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Lead>, StoreError> {
        sqlx::query_as::<_, Lead>(
            "SELECT id, name, email, phone, execution_hashid, created_at \
             FROM leads WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Provider(e.to_string()))
    }
}

/// In-memory store for tests and local development without a database.
#[derive(Default)]
pub struct InMemoryLeadStore {
    leads: Vec<Lead>,
}

impl InMemoryLeadStore {
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self { leads }
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Lead>, StoreError> {
        Ok(self.leads.iter().find(|l| l.id == id).cloned())
    }
}
