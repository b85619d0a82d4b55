//! Per-request controller registry.
//!
//! A registry memoizes controller instances by canonical name for the duration
//! of one request, so a forward chain that lands on the same controller twice
//! reuses the instance (and its view). Create a new registry per request; it
//! is a deduplication cache, not a concurrency primitive.

use crate::application::Application;
use composable_mvc_core::{Controller, DispatchError, Result, ViewState, canonical_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

/// Lifecycle of a controller instance within one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created, pre-execution hook not yet run.
    NotStarted,
    /// Pre-execution hook has run.
    PreExecuted,
    /// An action is running.
    Dispatching,
    /// The last action run on this instance completed the request.
    Completed,
    /// The last action run on this instance forwarded elsewhere.
    Forwarded,
}

/// A controller, its view, and its lifecycle phase.
pub struct ControllerInstance {
    name: String,
    controller: Box<dyn Controller>,
    view: ViewState,
    phase: Phase,
}

impl ControllerInstance {
    /// Wrap a freshly constructed controller.
    #[must_use]
    pub fn new(name: impl Into<String>, controller: Box<dyn Controller>, view: ViewState) -> Self {
        Self {
            name: name.into(),
            controller,
            view,
            phase: Phase::NotStarted,
        }
    }

    /// Canonical controller name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The controller's view.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// The controller's view, mutably.
    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Consume the instance, keeping its view.
    #[must_use]
    pub fn into_view(self) -> ViewState {
        self.view
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the pre-execution hook has run on this instance.
    #[must_use]
    pub const fn is_pre_executed(&self) -> bool {
        !matches!(self.phase, Phase::NotStarted)
    }

    /// The concrete controller, if it is a `T`.
    #[must_use]
    pub fn controller<T: Controller>(&self) -> Option<&T> {
        (*self.controller).as_any().downcast_ref::<T>()
    }

    /// The concrete controller, mutably, if it is a `T`.
    pub fn controller_mut<T: Controller>(&mut self) -> Option<&mut T> {
        (*self.controller).as_any_mut().downcast_mut::<T>()
    }

    pub(crate) const fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut dyn Controller, &mut ViewState, &mut Phase) {
        (self.controller.as_mut(), &mut self.view, &mut self.phase)
    }
}

impl fmt::Debug for ControllerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerInstance")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

/// Request-scoped map from canonical controller name to instance.
pub struct ControllerRegistry<'app> {
    app: &'app Application,
    instances: HashMap<String, ControllerInstance>,
}

impl<'app> ControllerRegistry<'app> {
    /// Empty registry backed by `app`'s controller catalog.
    #[must_use]
    pub fn new(app: &'app Application) -> Self {
        Self {
            app,
            instances: HashMap::new(),
        }
    }

    /// Return the instance for `name`, constructing it on first reference.
    ///
    /// # Errors
    ///
    /// [`DispatchError::ControllerNotFound`] if no controller is registered
    /// under `name`.
    pub fn get_or_create(&mut self, name: &str) -> Result<&mut ControllerInstance> {
        match self.instances.entry(canonical_name(name)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let name = entry.key().clone();
                let controller = self
                    .app
                    .build_controller(&name)
                    .ok_or_else(|| DispatchError::ControllerNotFound {
                        controller: name.clone(),
                    })?;
                let config = self.app.config();
                let view = ViewState::new(config.language.clone(), config.title.clone());

                tracing::debug!(controller = %name, "Created controller instance");
                metrics::counter!(crate::metrics::CONTROLLERS_CREATED).increment(1);

                Ok(entry.insert(ControllerInstance::new(name, controller, view)))
            },
        }
    }

    /// The instance for `name`, if already created.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ControllerInstance> {
        self.instances.get(&canonical_name(name))
    }

    /// The instance for `name`, mutably, if already created.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ControllerInstance> {
        self.instances.get_mut(&canonical_name(name))
    }

    /// Whether an instance exists for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(&canonical_name(name))
    }

    /// Take the instance for `name` out of the registry.
    pub fn remove(&mut self, name: &str) -> Option<ControllerInstance> {
        self.instances.remove(&canonical_name(name))
    }

    /// Drop every instance.
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Number of instances created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl fmt::Debug for ControllerRegistry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("instances", &self.instances)
            .finish_non_exhaustive()
    }
}
