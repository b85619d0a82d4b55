//! Application state for Axum handlers.

use crate::config::WebConfig;
use crate::render::JsonRenderer;
use composable_mvc_core::Renderer;
use composable_mvc_runtime::Application;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// State shared by every HTTP handler.
///
/// Cheap to clone: the application catalog and renderer sit behind `Arc`s.
///
/// # Example
///
/// ```
/// use composable_mvc_runtime::Application;
/// use composable_mvc_web::{AppState, WebConfig};
///
/// let state = AppState::new(Application::builder().build())
///     .with_config(WebConfig::new().with_default_controller("home"));
///
/// assert_eq!(state.config().default_controller, "home");
/// assert!(state.metrics().is_none());
/// ```
#[derive(Clone)]
pub struct AppState {
    application: Arc<Application>,
    renderer: Arc<dyn Renderer>,
    config: WebConfig,
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State rendering views as JSON with the default configuration.
    #[must_use]
    pub fn new(application: Application) -> Self {
        Self {
            application: Arc::new(application),
            renderer: Arc::new(JsonRenderer),
            config: WebConfig::default(),
            metrics: None,
        }
    }

    /// Replace the renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: WebConfig) -> Self {
        self.config = config;
        self
    }

    /// Expose `GET /metrics` backed by `handle`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// The application catalog.
    #[must_use]
    pub fn application(&self) -> &Arc<Application> {
        &self.application
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &WebConfig {
        &self.config
    }

    /// The Prometheus handle, if metrics are exposed.
    #[must_use]
    pub const fn metrics(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }
}
