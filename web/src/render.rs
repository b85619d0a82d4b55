//! Built-in renderers.

use composable_mvc_core::{RenderContext, Renderer};

/// Renders the view as its JSON render context.
///
/// Useful for APIs and tests; HTML applications plug in a template engine
/// through [`Renderer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, context: &RenderContext<'_>) -> anyhow::Result<String> {
        Ok(serde_json::to_string(context)?)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
