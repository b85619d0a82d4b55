//! Custom Axum extractors.
//!
//! - `Roles`: roles of the current user, placed in request extensions by the
//!   application's authentication layer
//! - `CorrelationId`: the request id set by the router's request-id layer

use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use uuid::Uuid;

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Roles of the current user.
///
/// Authentication middleware inserts a `Roles` value into the request
/// extensions. Requests without one (or with an empty one) get the configured
/// guest role.
///
/// # Example
///
/// ```ignore
/// async fn auth(mut request: Request, next: Next) -> Response {
///     request.extensions_mut().insert(Roles::new(["editor"]));
///     next.run(request).await
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roles(pub Vec<String>);

impl Roles {
    /// Roles from any list of names.
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Roles {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let roles = parts
            .extensions
            .get::<Self>()
            .filter(|roles| !roles.0.is_empty())
            .cloned()
            .unwrap_or_else(|| Self::new([state.config().guest_role.as_str()]));
        Ok(roles)
    }
}

/// Correlation ID for request tracing.
///
/// Read from the `x-request-id` header, or freshly generated when the header
/// is missing or not a UUID.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::Request;
    use composable_mvc_runtime::Application;

    fn state() -> AppState {
        AppState::new(Application::builder().build())
    }

    #[tokio::test]
    async fn test_roles_from_extensions() {
        let mut req = Request::builder().body(()).expect("Valid request");
        req.extensions_mut().insert(Roles::new(["editor", "admin"]));

        let (mut parts, ()) = req.into_parts();
        let roles = Roles::from_request_parts(&mut parts, &state())
            .await
            .expect("Should extract");

        assert_eq!(roles, Roles::new(["editor", "admin"]));
    }

    #[tokio::test]
    async fn test_roles_default_to_guest() {
        let mut req = Request::builder().body(()).expect("Valid request");
        req.extensions_mut().insert(Roles(Vec::new()));

        let (mut parts, ()) = req.into_parts();
        let roles = Roles::from_request_parts(&mut parts, &state())
            .await
            .expect("Should extract");

        assert_eq!(roles, Roles::new(["guest"]));
    }

    #[tokio::test]
    async fn test_correlation_id_from_header() {
        let uuid = Uuid::new_v4();
        let req = Request::builder()
            .header(REQUEST_ID_HEADER, uuid.to_string())
            .body(())
            .expect("Valid request");

        let (mut parts, ()) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, uuid);
    }

    #[tokio::test]
    async fn test_correlation_id_generates_new() {
        let req = Request::builder()
            .header(REQUEST_ID_HEADER, "not-a-uuid")
            .body(())
            .expect("Valid request");

        let (mut parts, ()) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_ne!(correlation_id.0, Uuid::nil());
    }
}
