//! Router assembly.

use crate::handlers::{dispatch_page, health_check, metrics};
use crate::state::AppState;
use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Build the HTTP router.
///
/// - `GET /health`: liveness
/// - `GET /metrics`: Prometheus scrape, only when the state has a handle
/// - anything else: [`dispatch_page`]
///
/// Every request gets an `x-request-id` (kept if the client sent one),
/// echoed on the response, and a tracing span.
pub fn router(state: AppState) -> Router {
    let mut router = Router::new().route("/health", get(health_check));
    if state.metrics().is_some() {
        router = router.route("/metrics", get(metrics));
    }

    router
        .fallback(dispatch_page)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}
