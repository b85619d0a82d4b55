//! Controller trait and the context handed to every action.
//!
//! A controller is a plain struct registered under a name. It can handle
//! actions itself through [`Controller::dispatch`] (method-style), or have
//! standalone [`Action`](crate::action::Action) types registered against it
//! (class-style).
//!
//! # Example
//!
//! ```
//! use composable_mvc_core::controller::{ActionContext, Controller};
//! use composable_mvc_core::action::{ActionResult, Outcome};
//!
//! #[derive(Default)]
//! struct BlogController;
//!
//! impl BlogController {
//!     fn index(&mut self, cx: &mut ActionContext<'_>) -> ActionResult {
//!         cx.assign("posts", 3);
//!         Ok(Outcome::Completed)
//!     }
//! }
//!
//! impl Controller for BlogController {
//!     fn dispatch(&mut self, action: &str, cx: &mut ActionContext<'_>) -> Option<ActionResult> {
//!         match action {
//!             "index" => Some(self.index(cx)),
//!             "latest" => Some(Ok(Outcome::forward("index"))),
//!             _ => None,
//!         }
//!     }
//! }
//! ```

use crate::action::ActionResult;
use crate::request::RequestContext;
use crate::view::{Scope, ViewState};
use serde_json::Value;
use std::any::Any;

/// Access to a value as [`Any`], implemented for every `'static` type.
///
/// Class-style actions use this to reach their concrete controller type.
pub trait AsAny {
    /// Borrow as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Borrow as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A request-scoped controller.
pub trait Controller: AsAny + Send + 'static {
    /// Hook run once per controller instance, before its first action.
    ///
    /// # Errors
    ///
    /// Any error aborts dispatch and is returned to the caller unchanged.
    fn pre_execute(&mut self, cx: &mut ActionContext<'_>) -> anyhow::Result<()> {
        let _ = cx;
        Ok(())
    }

    /// Method-style dispatch.
    ///
    /// Return `None` when this controller has no method for `action`; the
    /// dispatcher then looks for a registered action class.
    fn dispatch(&mut self, action: &str, cx: &mut ActionContext<'_>) -> Option<ActionResult> {
        let _ = (action, cx);
        None
    }
}

/// What an action sees while it runs: the request and its controller's view.
#[derive(Debug)]
pub struct ActionContext<'a> {
    request: &'a RequestContext,
    view: &'a mut ViewState,
    controller: &'a str,
    action: &'a str,
}

impl<'a> ActionContext<'a> {
    /// Build a context for `controller.action`.
    pub const fn new(
        request: &'a RequestContext,
        view: &'a mut ViewState,
        controller: &'a str,
        action: &'a str,
    ) -> Self {
        Self {
            request,
            view,
            controller,
            action,
        }
    }

    /// The current request.
    #[must_use]
    pub const fn request(&self) -> &RequestContext {
        self.request
    }

    /// A request parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.request.param(name)
    }

    /// The controller's view.
    #[must_use]
    pub fn view(&self) -> &ViewState {
        &*self.view
    }

    /// The controller's view, mutably.
    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut *self.view
    }

    /// Canonical name of the running controller.
    #[must_use]
    pub const fn controller_name(&self) -> &str {
        self.controller
    }

    /// Name of the running action.
    #[must_use]
    pub const fn action_name(&self) -> &str {
        self.action
    }

    /// Assign a locally scoped view variable.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.view.assign(name, value, Scope::Local);
    }

    /// Assign a globally scoped view variable, carried across forwards.
    pub fn assign_global(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.view.assign(name, value, Scope::Global);
    }
}
