//! Renderer interface.
//!
//! Template engines live outside this crate. They receive a finished
//! [`RenderContext`] and produce a response body.

use crate::view::RenderContext;

/// Turns a finished view into a response body.
pub trait Renderer: Send + Sync {
    /// Render the view.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be found or rendered.
    fn render(&self, context: &RenderContext<'_>) -> anyhow::Result<String>;

    /// `Content-Type` of rendered bodies.
    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }
}
