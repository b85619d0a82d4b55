//! Axum web framework integration for Composable MVC.
//!
//! This crate is the imperative shell around the dispatch runtime: it turns
//! an HTTP request into a controller action, enforces sitemap access rules,
//! runs the dispatcher and renders the resulting view.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at the fallback handler
//! 2. **Resolve** the path to `controller.action`
//! 3. **Authorize** the user's roles against the sitemap
//! 4. **Dispatch** on a blocking worker with a per-request registry
//! 5. **Render** the final view through the configured [`Renderer`]
//! 6. **Map errors** to HTTP responses via [`AppError`]
//!
//! # Example
//!
//! ```no_run
//! use composable_mvc_core::{ActionContext, ActionResult, Controller, Outcome};
//! use composable_mvc_runtime::Application;
//! use composable_mvc_web::{AppState, router};
//!
//! #[derive(Default)]
//! struct Index;
//!
//! impl Controller for Index {
//!     fn dispatch(&mut self, action: &str, cx: &mut ActionContext<'_>) -> Option<ActionResult> {
//!         (action == "index").then(|| {
//!             cx.assign("greeting", "hello");
//!             Ok(Outcome::Completed)
//!         })
//!     }
//! }
//!
//! # async fn serve() -> Result<(), Box<dyn std::error::Error>> {
//! let app = Application::builder().controller("index", Index::default).build();
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, router(AppState::new(app))).await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Renderer`]: composable_mvc_core::Renderer

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod render;
pub mod router;
pub mod routing;
pub mod state;

// Re-export key types for convenience
pub use config::WebConfig;
pub use error::AppError;
pub use extractors::{CorrelationId, Roles};
pub use render::JsonRenderer;
pub use router::router;
pub use routing::{Route, RouteError};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
