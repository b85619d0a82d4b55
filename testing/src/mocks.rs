//! Scripted controllers for dispatch tests.
//!
//! [`ScriptedController`] records every hook and action it runs into an
//! execution log and behaves according to a per-action script, so tests can
//! describe forward chains without writing a controller per case.

use composable_mvc_core::{
    ActionContext, ActionResult, Controller, Forward, Outcome, Scope, Value,
};
use std::collections::HashMap;

/// Log entry written when the pre-execution hook runs.
pub const PRE_EXECUTE: &str = "pre";

/// One step of an action script.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Assign a view variable.
    Assign {
        /// Variable name
        name: String,
        /// Value to assign
        value: Value,
        /// Scope of the assignment
        scope: Scope,
    },
    /// Finish with a forward.
    Forward(Forward),
    /// Finish with an error.
    Fail(String),
}

/// Controller driven by per-action scripts.
///
/// Actions without a script are unknown to the controller (method-style
/// dispatch returns `None`). Actions with a script log their name, run their
/// assignments, then complete, forward, or fail.
///
/// # Example
///
/// ```
/// use composable_mvc_testing::mocks::ScriptedController;
///
/// let controller = ScriptedController::new()
///     .forwards("forward", None, "test")
///     .completes("test");
/// assert!(controller.log().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedController {
    scripts: HashMap<String, Vec<Step>>,
    failing_pre_execute: Option<String>,
    log: Vec<String>,
}

impl ScriptedController {
    /// Controller with no actions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `action` completes the request.
    #[must_use]
    pub fn completes(mut self, action: &str) -> Self {
        self.scripts.entry(action.to_string()).or_default();
        self
    }

    /// `action` assigns a variable (then continues with its other steps).
    #[must_use]
    pub fn assigns(mut self, action: &str, name: &str, value: impl Into<Value>, scope: Scope) -> Self {
        self.scripts.entry(action.to_string()).or_default().push(Step::Assign {
            name: name.to_string(),
            value: value.into(),
            scope,
        });
        self
    }

    /// `action` forwards to `target_action` on `target_controller` (or on
    /// itself when `None`).
    #[must_use]
    pub fn forwards(mut self, action: &str, target_controller: Option<&str>, target_action: &str) -> Self {
        self.scripts
            .entry(action.to_string())
            .or_default()
            .push(Step::Forward(Forward::new(
                target_controller.map(str::to_string),
                target_action,
            )));
        self
    }

    /// `action` fails with `message`.
    #[must_use]
    pub fn fails(mut self, action: &str, message: &str) -> Self {
        self.scripts
            .entry(action.to_string())
            .or_default()
            .push(Step::Fail(message.to_string()));
        self
    }

    /// The pre-execution hook fails with `message`.
    #[must_use]
    pub fn failing_pre_execute(mut self, message: &str) -> Self {
        self.failing_pre_execute = Some(message.to_string());
        self
    }

    /// Hooks and actions run so far, in order.
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    fn run_script(steps: &[Step], cx: &mut ActionContext<'_>) -> ActionResult {
        for step in steps {
            match step {
                Step::Assign { name, value, scope } => {
                    cx.view_mut().assign(name.clone(), value.clone(), *scope);
                },
                Step::Forward(forward) => return Ok(Outcome::Forward(forward.clone())),
                Step::Fail(message) => return Err(anyhow::anyhow!(message.clone())),
            }
        }
        Ok(Outcome::Completed)
    }
}

impl Controller for ScriptedController {
    fn pre_execute(&mut self, _cx: &mut ActionContext<'_>) -> anyhow::Result<()> {
        self.log.push(PRE_EXECUTE.to_string());
        match &self.failing_pre_execute {
            Some(message) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(()),
        }
    }

    fn dispatch(&mut self, action: &str, cx: &mut ActionContext<'_>) -> Option<ActionResult> {
        let steps = self.scripts.get(action)?;
        let result = Self::run_script(steps, cx);
        self.log.push(action.to_string());
        Some(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use composable_mvc_core::{RequestContext, ViewState};

    #[test]
    fn test_script_runs_steps_in_order() {
        let mut controller = ScriptedController::new()
            .assigns("index", "user", "ada", Scope::Global)
            .forwards("index", Some("b"), "show");

        let request = RequestContext::default();
        let mut view = ViewState::new("en", "");
        let mut cx = ActionContext::new(&request, &mut view, "a", "index");

        controller.pre_execute(&mut cx).unwrap();
        let outcome = controller.dispatch("index", &mut cx).unwrap().unwrap();
        assert_eq!(outcome, Outcome::forward_to("b", "show"));
        assert!(controller.dispatch("unknown", &mut cx).is_none());

        assert_eq!(controller.log(), ["pre", "index"]);
        assert_eq!(view.is_global("user"), Scope::Global);
    }

    #[test]
    fn test_failures() {
        let mut controller = ScriptedController::new()
            .failing_pre_execute("no session")
            .fails("boom", "exploded");

        let request = RequestContext::default();
        let mut view = ViewState::new("en", "");
        let mut cx = ActionContext::new(&request, &mut view, "a", "boom");

        assert_eq!(
            controller.pre_execute(&mut cx).unwrap_err().to_string(),
            "no session"
        );
        let err = controller.dispatch("boom", &mut cx).unwrap().unwrap_err();
        assert_eq!(err.to_string(), "exploded");
    }
}
