use crate::config::AppConfig;
use crate::page::{self, PageError};
use crate::store::LeadStore;
use crate::token::TokenExchanger;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn LeadStore>,
    pub tokens: Arc<dyn TokenExchanger>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn LeadStore>,
        tokens: Arc<dyn TokenExchanger>,
    ) -> Self {
        Self {
            config,
            store,
            tokens,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/leads/{id}", get(get_lead_page))
        .route("/assets/widget-loader.js", get(serve_widget_loader))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

async fn get_lead_page(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match page::prepare_props(
        state.store.as_ref(),
        state.tokens.as_ref(),
        &state.config.embed_workflow_pk,
        id,
    )
    .await
    {
        Ok(props) => Html(page::render_lead_page(&props)).into_response(),
        Err(err) => page_error_response(id, err),
    }
}

// Error bodies stay generic: no secret, no token, no store internals.
fn page_error_response(id: i64, err: PageError) -> Response {
    match err {
        PageError::NotFound(_) => {
            tracing::debug!(lead_id = id, "lead not found");
            (
                StatusCode::NOT_FOUND,
                Html(page::render_error_page("Lead not found", "No such lead.")),
            )
                .into_response()
        }
        PageError::Store(err) => {
            tracing::error!(lead_id = id, %err, "lead lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(page::render_error_page(
                    "Something went wrong",
                    "The lead could not be loaded.",
                )),
            )
                .into_response()
        }
        PageError::AuthExchange(err) => {
            tracing::error!(lead_id = id, %err, "user token exchange failed");
            (
                StatusCode::BAD_GATEWAY,
                Html(page::render_error_page(
                    "Something went wrong",
                    "The workflow service is unavailable.",
                )),
            )
                .into_response()
        }
    }
}

async fn serve_widget_loader(State(_state): State<AppState>) -> Response {
    let mut resp = Response::new(crate::sdk::widget_loader_script().into());
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/javascript"),
    );
    resp
}

async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryLeadStore, Lead};
    use crate::token::StaticTokenExchanger;
    use chrono::{TimeZone, Utc};
    use http::Request;
    use tower::ServiceExt;

    fn test_config() -> AppConfig {
        AppConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            database_url: "postgres://unused".to_string(),
            embed_workflow_sk: "sk_test".to_string(),
            embed_workflow_pk: "pk_test".to_string(),
            embed_workflow_api_url: "http://unused".to_string(),
            token_exchange_timeout: std::time::Duration::from_secs(1),
        }
    }

    fn jane(execution_hashid: Option<&str>) -> Lead {
        Lead {
            id: 42,
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-0100".to_string(),
            execution_hashid: execution_hashid.map(str::to_string),
            created_at: Utc.with_ymd_and_hms(2023, 5, 17, 9, 30, 0).unwrap(),
        }
    }

    fn test_router(leads: Vec<Lead>) -> Router {
        let state = AppState::new(
            test_config(),
            Arc::new(InMemoryLeadStore::with_leads(leads)),
            Arc::new(StaticTokenExchanger("tok_test".to_string())),
        );
        router(state)
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn lead_page_renders_without_viewer() {
        let app = test_router(vec![jane(None)]);
        let response = app
            .oneshot(
                Request::get("/leads/42")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("Information for Jane Doe."));
        assert!(!body.contains("EWF__execution_viewer"));
        assert!(!body.contains("sk_test"));
        assert!(body.contains("tok_test"));
    }

    #[tokio::test]
    async fn lead_page_renders_viewer_for_execution() {
        let app = test_router(vec![jane(Some("abc123"))]);
        let response = app
            .oneshot(
                Request::get("/leads/42")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("EWF__execution_viewer"));
        assert!(body.contains("data-hashid=\"abc123\""));
    }

    #[tokio::test]
    async fn unknown_lead_is_404() {
        let app = test_router(vec![]);
        let response = app
            .oneshot(
                Request::get("/leads/7")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn auth_failure_maps_to_bad_gateway() {
        struct FailingExchanger;
        #[async_trait::async_trait]
        impl crate::token::TokenExchanger for FailingExchanger {
            async fn user_token(&self) -> Result<String, crate::token::AuthExchangeError> {
                Err(crate::token::AuthExchangeError::Http("boom".to_string()))
            }
        }

        let state = AppState::new(
            test_config(),
            Arc::new(InMemoryLeadStore::with_leads(vec![jane(None)])),
            Arc::new(FailingExchanger),
        );
        let response = router(state)
            .oneshot(
                Request::get("/leads/42")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn store_failure_maps_to_internal_error() {
        struct FailingStore;
        #[async_trait::async_trait]
        impl crate::store::LeadStore for FailingStore {
            async fn find_by_id(
                &self,
                _id: i64,
            ) -> Result<Option<Lead>, crate::store::StoreError> {
                Err(crate::store::StoreError::Provider(
                    "connection refused".to_string(),
                ))
            }
        }

        let state = AppState::new(
            test_config(),
            Arc::new(FailingStore),
            Arc::new(StaticTokenExchanger("tok_test".to_string())),
        );
        let response = router(state)
            .oneshot(
                Request::get("/leads/42")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_string(response).await;
        assert!(body.contains("The lead could not be loaded."));
        assert!(!body.contains("connection refused"));
    }

    #[tokio::test]
    async fn widget_loader_served_as_javascript() {
        let app = test_router(vec![]);
        let response = app
            .oneshot(
                Request::get("/assets/widget-loader.js")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/javascript"
        );
        let body = body_string(response).await;
        assert!(!body.contains("sk_test"));
    }
}
