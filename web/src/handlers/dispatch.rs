//! Page dispatch endpoint.
//!
//! Every path not claimed by another route lands here:
//!
//! 1. resolve the path to `controller.action`
//! 2. check the sitemap allowance against the user's roles
//! 3. run the dispatcher on a blocking worker with a fresh registry
//! 4. render the final view

use crate::error::AppError;
use crate::extractors::{CorrelationId, Roles};
use crate::routing;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{Method, Uri, header},
    response::{IntoResponse, Response},
};
use composable_mvc_core::RequestContext;
use composable_mvc_runtime::Dispatcher;
use std::collections::BTreeMap;

/// Dispatch the page named by the request path.
///
/// # Errors
///
/// - 404 for malformed paths and unknown controllers or actions
/// - 403 when the sitemap denies every role of the user
/// - 500 for controller failures, forward loops and render failures
#[tracing::instrument(
    skip_all,
    fields(method = %method, path = %uri.path(), correlation_id = %correlation_id.0)
)]
pub async fn dispatch_page(
    State(state): State<AppState>,
    Roles(roles): Roles,
    correlation_id: CorrelationId,
    method: Method,
    uri: Uri,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Response, AppError> {
    let route = routing::resolve(uri.path(), state.application(), state.config())?;

    let page_key = route.page_key();
    if !state
        .application()
        .sitemap()
        .find_allow_roles(&page_key)
        .permits_any(&roles)
    {
        tracing::info!(page = %page_key, ?roles, "Access denied");
        return Err(AppError::forbidden(format!("Access to {page_key} denied")));
    }

    let request = RequestContext::new(method.as_str(), uri.path())
        .with_params(params)
        .with_roles(roles);

    let app = state.application().clone();
    let view = tokio::task::spawn_blocking(move || {
        Dispatcher::new(&app).execute_into_view(&route.controller, &route.action, &request)
    })
    .await
    .map_err(|err| AppError::internal("Dispatch task failed").with_source(err.into()))??;

    let renderer = state.renderer();
    let body = renderer.render(&view.render_context(&state.config().default_layout))?;

    Ok(([(header::CONTENT_TYPE, renderer.content_type())], body).into_response())
}
