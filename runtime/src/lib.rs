//! # Composable MVC Runtime
//!
//! Dispatch runtime for the Composable MVC architecture.
//!
//! This crate turns "run `blog.index` for this request" into a finished view.
//!
//! ## Core Components
//!
//! - **Application**: immutable catalog of controllers, action classes,
//!   sitemap and configuration, built once at startup
//! - **Controller Registry**: per-request cache of controller instances
//! - **Dispatcher**: runs actions, follows forwards, enforces the forward
//!   depth limit
//!
//! ## Example
//!
//! ```
//! use composable_mvc_core::{ActionContext, ActionResult, Controller, Outcome, RequestContext};
//! use composable_mvc_runtime::{Application, Dispatcher};
//!
//! #[derive(Default)]
//! struct Home;
//!
//! impl Controller for Home {
//!     fn dispatch(&mut self, action: &str, cx: &mut ActionContext<'_>) -> Option<ActionResult> {
//!         match action {
//!             "index" => {
//!                 cx.assign("greeting", "hello");
//!                 Some(Ok(Outcome::Completed))
//!             }
//!             "start" => Some(Ok(Outcome::forward("index"))),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let app = Application::builder().controller("home", Home::default).build();
//!
//! let view = Dispatcher::new(&app)
//!     .execute_into_view("home", "start", &RequestContext::get("/home/start"))
//!     .unwrap();
//!
//! assert_eq!(view.template(), Some("home/index"));
//! assert_eq!(view.get("greeting").and_then(|v| v.as_str()), Some("hello"));
//! ```

pub mod application;
pub mod config;
pub mod dispatcher;
pub mod metrics;
pub mod registry;

pub use application::{Application, ApplicationBuilder};
pub use config::DispatchConfig;
pub use dispatcher::Dispatcher;
pub use registry::{ControllerInstance, ControllerRegistry, Phase};
