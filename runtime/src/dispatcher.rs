//! Action dispatcher.
//!
//! The dispatcher drives one request through one or more controller actions:
//!
//! ```text
//! NotStarted ──pre_execute──▶ PreExecuted ──▶ Dispatching ──▶ Completed
//!                                                  │
//!                                                  └──▶ Forwarded ──▶ Dispatching (target)
//! ```
//!
//! For every action it runs, the dispatcher:
//!
//! 1. seeds the view from the sitemap page for `controller.action`
//! 2. sets the default template `{controller}/{action}`
//! 3. runs the controller's pre-execution hook if this instance has not run it
//! 4. tries method-style dispatch ([`Controller::dispatch`])
//! 5. falls back to the action class registered for `controller.action`
//!
//! An [`Outcome::Forward`] continues the loop on the target action; globally
//! scoped view variables are copied into the target controller's view when it
//! is a different instance. The loop gives up with
//! [`DispatchError::ForwardLoopDetected`] after `max_forward_depth` forwards.
//!
//! [`Controller::dispatch`]: composable_mvc_core::Controller::dispatch

use crate::application::Application;
use crate::metrics::DispatchMetrics;
use crate::registry::{ControllerInstance, ControllerRegistry, Phase};
use composable_mvc_core::{
    ActionContext, DispatchError, Outcome, RequestContext, Result, Scope, Value, ViewState,
    canonical_name, page_key, template_name,
};
use smallvec::SmallVec;
use std::time::Instant;

/// Runs controller actions for one request.
///
/// Owns a fresh [`ControllerRegistry`]; create one dispatcher per request.
#[derive(Debug)]
pub struct Dispatcher<'app> {
    app: &'app Application,
    registry: ControllerRegistry<'app>,
}

impl<'app> Dispatcher<'app> {
    /// Dispatcher with an empty registry.
    #[must_use]
    pub fn new(app: &'app Application) -> Self {
        Self {
            app,
            registry: ControllerRegistry::new(app),
        }
    }

    /// Controllers created so far.
    #[must_use]
    pub const fn registry(&self) -> &ControllerRegistry<'app> {
        &self.registry
    }

    /// Controllers created so far, mutably.
    pub fn registry_mut(&mut self) -> &mut ControllerRegistry<'app> {
        &mut self.registry
    }

    /// Consume the dispatcher, keeping its registry.
    #[must_use]
    pub fn into_registry(self) -> ControllerRegistry<'app> {
        self.registry
    }

    /// Run `controller.action` and every forward it triggers.
    ///
    /// Returns the instance whose action completed the request, which differs
    /// from `controller` when a forward moved to another controller.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::ControllerNotFound`] / [`DispatchError::ActionNotFound`]
    ///   when nothing handles a requested action
    /// - [`DispatchError::BadInterface`] when an action class is bound to a
    ///   different controller type
    /// - [`DispatchError::ForwardLoopDetected`] when the forward chain is too deep
    /// - [`DispatchError::Action`] for errors raised by controller code
    #[tracing::instrument(
        skip(self, request),
        name = "dispatch",
        fields(method = %request.method(), path = %request.path())
    )]
    pub fn execute(
        &mut self,
        controller: &str,
        action: &str,
        request: &RequestContext,
    ) -> Result<&mut ControllerInstance> {
        let started = Instant::now();
        DispatchMetrics::record_request();

        let result = self.follow(controller, action, request);
        DispatchMetrics::record_duration(started.elapsed());

        match result {
            Ok(final_controller) => self.registry.get_or_create(&final_controller),
            Err(err) => {
                if err.is_not_found() {
                    DispatchMetrics::record_not_found();
                    tracing::debug!(error = %err, "Nothing handles the requested action");
                }
                Err(err)
            },
        }
    }

    /// Run `controller.action` and hand back the final view, dropping the
    /// registry.
    ///
    /// # Errors
    ///
    /// Same as [`Self::execute`].
    pub fn execute_into_view(
        mut self,
        controller: &str,
        action: &str,
        request: &RequestContext,
    ) -> Result<ViewState> {
        let name = self.execute(controller, action, request)?.name().to_string();
        self.registry
            .remove(&name)
            .map(ControllerInstance::into_view)
            .ok_or(DispatchError::ControllerNotFound { controller: name })
    }

    fn follow(&mut self, controller: &str, action: &str, request: &RequestContext) -> Result<String> {
        let max_depth = self.app.config().max_forward_depth;
        let mut current = canonical_name(controller);
        let mut action = action.to_string();
        let mut chain: SmallVec<[String; 4]> = SmallVec::new();
        let mut forwards = 0usize;

        loop {
            chain.push(format!("{current}.{action}"));

            let forward = match self.run(&current, &action, request)? {
                Outcome::Completed => {
                    self.set_phase(&current, Phase::Completed);
                    return Ok(current);
                },
                Outcome::Forward(forward) => forward,
            };
            self.set_phase(&current, Phase::Forwarded);

            forwards += 1;
            if forwards > max_depth {
                DispatchMetrics::record_forward_loop();
                tracing::warn!(
                    depth = max_depth,
                    chain = %chain.join(" -> "),
                    "Forward depth limit exceeded"
                );
                return Err(DispatchError::ForwardLoopDetected {
                    depth: max_depth,
                    chain: chain.into_vec(),
                });
            }

            let (target, target_action) = forward.into_parts();
            let target = target.map_or_else(|| current.clone(), |name| canonical_name(&name));

            tracing::debug!(
                from = %format_args!("{current}.{action}"),
                to = %format_args!("{target}.{target_action}"),
                "Forwarding"
            );
            DispatchMetrics::record_forward();

            if target != current {
                self.carry_globals(&current, &target)?;
            }
            current = target;
            action = target_action;
        }
    }

    fn run(&mut self, controller: &str, action: &str, request: &RequestContext) -> Result<Outcome> {
        let app = self.app;
        let page = app.sitemap().page(&page_key(controller, action));

        let instance = self.registry.get_or_create(controller)?;
        let first_run = !instance.is_pre_executed();
        let (inner, view, phase) = instance.parts_mut();

        view.apply_page(&page);
        view.set_template(template_name(controller, action));

        let mut cx = ActionContext::new(request, view, controller, action);

        if first_run {
            *phase = Phase::PreExecuted;
            tracing::debug!(controller, "Running pre-execution hook");
            inner.pre_execute(&mut cx)?;
        }

        *phase = Phase::Dispatching;
        if let Some(result) = inner.dispatch(action, &mut cx) {
            return result.map_err(DispatchError::Action);
        }

        match app.action_factory(controller, action) {
            Some(factory) => {
                tracing::trace!(controller, action, action_type = factory.action_type(), "Running action class");
                factory.invoke(inner, &mut cx)
            },
            None => Err(DispatchError::ActionNotFound {
                controller: controller.to_string(),
                action: action.to_string(),
            }),
        }
    }

    fn carry_globals(&mut self, from: &str, to: &str) -> Result<()> {
        let globals: Vec<(String, Value)> = self
            .registry
            .get(from)
            .map(|source| {
                source
                    .view()
                    .global_vars()
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let target = self.registry.get_or_create(to)?;
        if !globals.is_empty() {
            tracing::debug!(from, to, count = globals.len(), "Carrying global view variables");
        }
        target.view_mut().assign_many(globals, Scope::Global);
        Ok(())
    }

    fn set_phase(&mut self, controller: &str, phase: Phase) {
        if let Some(instance) = self.registry.get_mut(controller) {
            instance.set_phase(phase);
        }
    }
}
