//! # Composable MVC Core
//!
//! Core traits and types for the Composable MVC dispatch layer.
//!
//! This crate holds everything that does not need a runtime: the sitemap,
//! the per-controller view state, the controller and action traits, and the
//! error taxonomy. The dispatcher itself lives in `composable-mvc-runtime`.
//!
//! ## Core Concepts
//!
//! - **Sitemap**: static tree giving every `controller.action` its title,
//!   stylesheets, scripts and which roles may reach it
//! - **View State**: template, layout, variables, metas, styles and scripts
//!   accumulated by one controller
//! - **Controller**: request-scoped struct handling actions (method-style)
//! - **Action**: standalone type bound to one controller type (class-style)
//! - **Outcome**: `Completed`, or `Forward` to another action
//!
//! ## Example
//!
//! ```
//! use composable_mvc_core::sitemap::{RoleSpec, Sitemap, SitemapNode};
//!
//! let sitemap = Sitemap::new(
//!     SitemapNode::new()
//!         .with_allow(RoleSpec::any())
//!         .with_child("admin", SitemapNode::new().with_allow(RoleSpec::roles(["admin"]))),
//! );
//!
//! assert!(sitemap.find_allow_roles("blog.index").permits("guest"));
//! assert!(!sitemap.find_allow_roles("admin.users").permits("guest"));
//! ```

pub mod action;
pub mod controller;
pub mod error;
pub mod name;
pub mod render;
pub mod request;
pub mod sitemap;
pub mod view;

// Re-export commonly used types
pub use action::{Action, ActionFactory, ActionResult, Forward, Outcome};
pub use controller::{ActionContext, AsAny, Controller};
pub use error::{DispatchError, Result};
pub use name::{canonical_name, page_key, template_name};
pub use render::Renderer;
pub use request::RequestContext;
pub use sitemap::{NavEntry, PageMeta, RoleAllowance, RoleSpec, Sitemap, SitemapError, SitemapNode};
pub use view::{Layout, RenderContext, Scope, ViewState};
pub use serde_json::Value;
