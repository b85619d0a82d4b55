//! # Composable MVC Testing
//!
//! Testing utilities and helpers for the Composable MVC architecture.
//!
//! This crate provides:
//! - [`ScriptedController`]: a controller driven by per-action scripts that
//!   records every hook and action it runs
//! - [`DispatchTest`]: Given-When-Then assertions over a dispatch
//! - Fixture helpers for sitemaps, requests and tracing
//!
//! ## Example
//!
//! ```
//! use composable_mvc_runtime::Application;
//! use composable_mvc_testing::{DispatchTest, ScriptedController};
//!
//! let a = ScriptedController::new().forwards("forwardOther", Some("b"), "test");
//! let b = ScriptedController::new().completes("test");
//! let app = Application::builder()
//!     .controller("a", move || a.clone())
//!     .controller("b", move || b.clone())
//!     .build();
//!
//! DispatchTest::new(app)
//!     .when_dispatched("a", "forwardOther")
//!     .then_completed_on("b")
//!     .then_controller::<ScriptedController, _>("a", |a| {
//!         assert_eq!(a.log(), ["pre", "forwardOther"]);
//!     })
//!     .then_controller::<ScriptedController, _>("b", |b| {
//!         assert_eq!(b.log(), ["pre", "test"]);
//!     })
//!     .run();
//! ```

pub mod dispatch_test;
pub mod fixtures;
pub mod mocks;

pub use dispatch_test::DispatchTest;
pub use fixtures::{init_tracing, request_as, sitemap};
pub use mocks::{PRE_EXECUTE, ScriptedController, Step};
