use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::subscription::{RequestContext, SubscriptionRepository, SubscriptionService};

use crate::openapi::ApiDoc;

pub mod subscriptions;

/// Shared handler state. The repository is type-erased so tests can run the
/// full router against the in-memory store.
#[derive(Clone)]
pub struct ServerState {
    pub subscriptions: Arc<SubscriptionService<dyn SubscriptionRepository>>,
    pub request_timeout: Duration,
    /// Fired when the shutdown grace period runs out; aborts in-flight storage calls.
    pub shutdown: CancellationToken,
}

impl ServerState {
    pub fn new(repo: Arc<dyn SubscriptionRepository>, request_timeout: Duration) -> Self {
        Self {
            subscriptions: Arc::new(SubscriptionService::new(repo)),
            request_timeout,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout).with_token(self.shutdown.child_token())
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health, subscription API and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/subscriptions", get(subscriptions::list).post(subscriptions::create))
        .route("/subscriptions/total-cost", get(subscriptions::total_cost))
        .route(
            "/subscriptions/:id",
            get(subscriptions::get).put(subscriptions::update).delete(subscriptions::delete),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
