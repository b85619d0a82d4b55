//! Application catalog: every controller and action class, registered once at
//! startup.
//!
//! The catalog is immutable after [`ApplicationBuilder::build`] and is shared
//! between requests (typically behind an `Arc`). Per-request state lives in
//! [`ControllerRegistry`](crate::registry::ControllerRegistry).
//!
//! # Example
//!
//! ```
//! use composable_mvc_core::{Action, ActionContext, ActionResult, Controller, Outcome};
//! use composable_mvc_runtime::Application;
//!
//! #[derive(Default)]
//! struct Pages;
//! impl Controller for Pages {}
//!
//! struct About;
//! impl Action for About {
//!     type Controller = Pages;
//!     fn execute(&mut self, _: &mut Pages, cx: &mut ActionContext<'_>) -> ActionResult {
//!         cx.assign("company", "Acme");
//!         Ok(Outcome::Completed)
//!     }
//! }
//!
//! let app = Application::builder()
//!     .controller("pages", Pages::default)
//!     .action("pages", "about", || About)
//!     .build();
//!
//! assert!(app.has_controller("Pages"));
//! assert!(app.action_factory("pages", "about").is_some());
//! ```

use crate::config::DispatchConfig;
use composable_mvc_core::{Action, ActionFactory, Controller, Sitemap, canonical_name};
use std::collections::HashMap;
use std::fmt;

type ControllerFn = dyn Fn() -> Box<dyn Controller> + Send + Sync;

/// Immutable catalog of controllers, action classes, sitemap and config.
pub struct Application {
    controllers: HashMap<String, Box<ControllerFn>>,
    actions: HashMap<String, HashMap<String, ActionFactory>>,
    sitemap: Sitemap,
    config: DispatchConfig,
}

impl Application {
    /// Start building an application.
    #[must_use]
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }

    /// The sitemap.
    #[must_use]
    pub const fn sitemap(&self) -> &Sitemap {
        &self.sitemap
    }

    /// Dispatch configuration.
    #[must_use]
    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Whether a controller is registered under `name` (any spelling that
    /// normalizes to the same canonical name).
    #[must_use]
    pub fn has_controller(&self, name: &str) -> bool {
        self.controllers.contains_key(&canonical_name(name))
    }

    /// Registered controller names, sorted.
    #[must_use]
    pub fn controller_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.controllers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Construct a fresh controller.
    #[must_use]
    pub fn build_controller(&self, name: &str) -> Option<Box<dyn Controller>> {
        self.controllers
            .get(&canonical_name(name))
            .map(|build| build())
    }

    /// Registered action class for `controller.action`.
    #[must_use]
    pub fn action_factory(&self, controller: &str, action: &str) -> Option<&ActionFactory> {
        self.actions
            .get(&canonical_name(controller))
            .and_then(|actions| actions.get(action))
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("controllers", &self.controller_names())
            .field("actions", &self.actions)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Application`].
#[derive(Default)]
pub struct ApplicationBuilder {
    controllers: HashMap<String, Box<ControllerFn>>,
    actions: HashMap<String, HashMap<String, ActionFactory>>,
    sitemap: Sitemap,
    config: DispatchConfig,
}

impl ApplicationBuilder {
    /// Register a controller constructor under `name`.
    ///
    /// Registering the same canonical name twice keeps the last constructor.
    #[must_use]
    pub fn controller<C, F>(mut self, name: &str, build: F) -> Self
    where
        C: Controller,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let name = canonical_name(name);
        let build: Box<ControllerFn> = Box::new(move || Box::new(build()) as Box<dyn Controller>);
        if self.controllers.insert(name.clone(), build).is_some() {
            tracing::warn!(controller = %name, "Controller registered twice, keeping the last one");
        }
        self
    }

    /// Register an action class for `controller.action`.
    #[must_use]
    pub fn action<A, F>(mut self, controller: &str, action: &str, build: F) -> Self
    where
        A: Action,
        F: Fn() -> A + Send + Sync + 'static,
    {
        let controller = canonical_name(controller);
        let previous = self
            .actions
            .entry(controller.clone())
            .or_default()
            .insert(action.to_string(), ActionFactory::new(build));
        if previous.is_some() {
            tracing::warn!(%controller, action, "Action registered twice, keeping the last one");
        }
        self
    }

    /// Set the sitemap.
    #[must_use]
    pub fn sitemap(mut self, sitemap: Sitemap) -> Self {
        self.sitemap = sitemap;
        self
    }

    /// Set the dispatch configuration.
    #[must_use]
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Application {
        tracing::info!(
            controllers = self.controllers.len(),
            actions = self.actions.values().map(HashMap::len).sum::<usize>(),
            "Application catalog built"
        );
        Application {
            controllers: self.controllers,
            actions: self.actions,
            sitemap: self.sitemap,
            config: self.config,
        }
    }
}
