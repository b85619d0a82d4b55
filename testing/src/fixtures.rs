//! Fixture helpers shared by dispatch tests.

use composable_mvc_core::{RequestContext, Sitemap};

/// Parse a sitemap from JSON, panicking on malformed input.
///
/// # Panics
///
/// Panics if `source` is not a valid sitemap document.
#[must_use]
#[allow(clippy::expect_used)] // Test code can use expect
pub fn sitemap(source: &str) -> Sitemap {
    Sitemap::from_json(source).expect("fixture sitemap must parse")
}

/// `GET /controller/action` carrying `roles`.
#[must_use]
pub fn request_as(controller: &str, action: &str, roles: &[&str]) -> RequestContext {
    RequestContext::get(format!("/{controller}/{action}")).with_roles(roles.iter().copied())
}

/// Install a test-friendly tracing subscriber.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_fixture() {
        let map = sitemap(r#"{ "_title": "Site", "blog": { "_allow": "editor" } }"#);
        assert!(map.find_allow_roles("blog").permits("editor"));
        assert!(!map.find_allow_roles("blog").permits("guest"));
    }

    #[test]
    fn test_request_as() {
        init_tracing();
        let request = request_as("blog", "edit", &["editor"]);
        assert_eq!(request.path(), "/blog/edit");
        assert_eq!(request.roles(), ["editor"]);
    }
}
