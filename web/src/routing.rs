//! URL path to controller action resolution.
//!
//! | Path                   | Controller        | Action          |
//! |------------------------|-------------------|-----------------|
//! | `/`                    | default           | default         |
//! | `/blog` (registered)   | `blog`            | default         |
//! | `/blog/show`           | `blog`            | `show`          |
//! | `/blog/comment/edit`   | `blog/comment`    | `edit`          |
//! | `/about` (unregistered)| default           | `about`         |
//!
//! A path naming a registered controller always takes the default action, so
//! `/blog/comment` reaches `blog/comment.index` when that controller exists and
//! `blog.comment` otherwise.

use crate::config::WebConfig;
use composable_mvc_core::canonical_name;
use composable_mvc_runtime::Application;
use thiserror::Error;

/// Path rejected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A segment contains characters outside `[A-Za-z0-9_-]`.
    #[error("Invalid path segment: {0:?}")]
    InvalidSegment(String),
}

/// Controller action a path resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Canonical controller name.
    pub controller: String,
    /// Action name, case preserved.
    pub action: String,
}

impl Route {
    /// Route to `controller.action`.
    #[must_use]
    pub fn new(controller: &str, action: impl Into<String>) -> Self {
        Self {
            controller: canonical_name(controller),
            action: action.into(),
        }
    }

    /// Dotted sitemap key of this route.
    #[must_use]
    pub fn page_key(&self) -> String {
        composable_mvc_core::page_key(&self.controller, &self.action)
    }
}

/// Resolve `path` against the registered controllers.
///
/// # Errors
///
/// [`RouteError::InvalidSegment`] if any segment is not `[A-Za-z0-9_-]+`.
pub fn resolve(path: &str, app: &Application, config: &WebConfig) -> Result<Route, RouteError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if let Some(bad) = segments.iter().find(|s| !is_valid_segment(s)) {
        return Err(RouteError::InvalidSegment((*bad).to_string()));
    }

    let Some((action, rest)) = segments.split_last() else {
        return Ok(Route::new(&config.default_controller, &config.default_action));
    };

    let full = segments.join("/");
    if app.has_controller(&full) {
        return Ok(Route::new(&full, &config.default_action));
    }

    if rest.is_empty() {
        Ok(Route::new(&config.default_controller, *action))
    } else {
        Ok(Route::new(&rest.join("/"), *action))
    }
}

fn is_valid_segment(segment: &str) -> bool {
    segment
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use composable_mvc_core::Controller;

    #[derive(Default)]
    struct Stub;
    impl Controller for Stub {}

    fn app() -> Application {
        Application::builder()
            .controller("index", Stub::default)
            .controller("blog", Stub::default)
            .controller("blog/comment", Stub::default)
            .build()
    }

    fn route(path: &str) -> Route {
        resolve(path, &app(), &WebConfig::default()).unwrap()
    }

    #[test]
    fn test_root_uses_defaults() {
        assert_eq!(route("/"), Route::new("index", "index"));
        assert_eq!(route(""), Route::new("index", "index"));
    }

    #[test]
    fn test_registered_controller_path() {
        assert_eq!(route("/blog"), Route::new("blog", "index"));
        assert_eq!(route("/Blog/Comment/"), Route::new("blog/comment", "index"));
    }

    #[test]
    fn test_last_segment_is_action() {
        assert_eq!(route("/blog/show"), Route::new("blog", "show"));
        assert_eq!(route("/blog/comment/edit"), Route::new("blog/comment", "edit"));
        assert_eq!(route("/blog/showAll"), Route::new("blog", "showAll"));
    }

    #[test]
    fn test_single_unknown_segment_is_default_controller_action() {
        assert_eq!(route("/about"), Route::new("index", "about"));
        assert_eq!(route("/about").page_key(), "index.about");
    }

    #[test]
    fn test_invalid_segments() {
        let config = WebConfig::default();
        for path in ["/blog/../etc", "/blog/a.b", "/blog/%20"] {
            assert!(matches!(
                resolve(path, &app(), &config),
                Err(RouteError::InvalidSegment(_))
            ));
        }
    }
}
