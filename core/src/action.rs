//! Action outcomes and class-style actions.
//!
//! Every action returns an [`Outcome`]. `Outcome::Forward` hands the request to
//! another action (possibly on another controller) without an HTTP redirect;
//! the dispatcher follows it.
//!
//! Class-style actions are standalone types implementing [`Action`], bound to
//! one concrete controller type. They are registered up front through an
//! [`ActionFactory`]; nothing is looked up by name at runtime.

use crate::controller::{ActionContext, Controller};
use crate::error::DispatchError;
use std::fmt;

/// Result returned by every action.
pub type ActionResult = anyhow::Result<Outcome>;

/// Transfer of request handling to another controller action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forward {
    controller: Option<String>,
    action: String,
}

impl Forward {
    /// Forward to `action`, on `controller` or on the current one when `None`.
    #[must_use]
    pub fn new(controller: Option<String>, action: impl Into<String>) -> Self {
        Self {
            controller,
            action: action.into(),
        }
    }

    /// Target controller; `None` means the current controller.
    #[must_use]
    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }

    /// Target action.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Split into `(controller, action)`.
    #[must_use]
    pub fn into_parts(self) -> (Option<String>, String) {
        (self.controller, self.action)
    }
}

/// How an action finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action produced the view; dispatch ends here.
    Completed,
    /// Continue with another action.
    Forward(Forward),
}

impl Outcome {
    /// Forward to another action of the same controller.
    #[must_use]
    pub fn forward(action: impl Into<String>) -> Self {
        Self::Forward(Forward::new(None, action))
    }

    /// Forward to an action of another controller.
    #[must_use]
    pub fn forward_to(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Forward(Forward::new(Some(controller.into()), action))
    }

    /// Whether this outcome is a forward.
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        matches!(self, Self::Forward(_))
    }
}

/// A standalone action bound to one controller type.
///
/// # Example
///
/// ```
/// use composable_mvc_core::action::{Action, ActionResult, Outcome};
/// use composable_mvc_core::controller::{ActionContext, Controller};
///
/// #[derive(Default)]
/// struct CommentController {
///     approved: usize,
/// }
///
/// impl Controller for CommentController {}
///
/// struct Approve;
///
/// impl Action for Approve {
///     type Controller = CommentController;
///
///     fn execute(&mut self, controller: &mut CommentController, cx: &mut ActionContext<'_>) -> ActionResult {
///         controller.approved += 1;
///         cx.assign("approved", controller.approved);
///         Ok(Outcome::forward("index"))
///     }
/// }
/// ```
pub trait Action: Send + 'static {
    /// Controller type this action runs against.
    type Controller: Controller;

    /// Run the action.
    ///
    /// # Errors
    ///
    /// Any error aborts dispatch and is returned to the caller unchanged.
    fn execute(&mut self, controller: &mut Self::Controller, cx: &mut ActionContext<'_>) -> ActionResult;
}

trait ErasedAction: Send {
    fn execute_erased(
        &mut self,
        controller: &mut dyn Controller,
        cx: &mut ActionContext<'_>,
    ) -> Result<Outcome, DispatchError>;
}

struct Bound<A>(A);

impl<A: Action> ErasedAction for Bound<A> {
    fn execute_erased(
        &mut self,
        controller: &mut dyn Controller,
        cx: &mut ActionContext<'_>,
    ) -> Result<Outcome, DispatchError> {
        let Some(controller) = controller.as_any_mut().downcast_mut::<A::Controller>() else {
            return Err(DispatchError::BadInterface {
                controller: cx.controller_name().to_string(),
                action: cx.action_name().to_string(),
                expected: std::any::type_name::<A::Controller>(),
            });
        };
        self.0.execute(controller, cx).map_err(DispatchError::Action)
    }
}

type BuildFn = dyn Fn() -> Box<dyn ErasedAction> + Send + Sync;

/// Statically registered constructor of a class-style action.
pub struct ActionFactory {
    build: Box<BuildFn>,
    action_type: &'static str,
}

impl ActionFactory {
    /// Wrap a constructor of `A`.
    pub fn new<A, F>(build: F) -> Self
    where
        A: Action,
        F: Fn() -> A + Send + Sync + 'static,
    {
        Self {
            build: Box::new(move || Box::new(Bound(build())) as Box<dyn ErasedAction>),
            action_type: std::any::type_name::<A>(),
        }
    }

    /// Type name of the action this factory builds.
    #[must_use]
    pub const fn action_type(&self) -> &'static str {
        self.action_type
    }

    /// Build a fresh action and run it against `controller`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::BadInterface`] if `controller` is not the type the action
    /// is bound to; [`DispatchError::Action`] if the action itself fails.
    pub fn invoke(
        &self,
        controller: &mut dyn Controller,
        cx: &mut ActionContext<'_>,
    ) -> Result<Outcome, DispatchError> {
        (self.build)().execute_erased(controller, cx)
    }
}

impl fmt::Debug for ActionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionFactory")
            .field("action_type", &self.action_type)
            .finish_non_exhaustive()
    }
}
