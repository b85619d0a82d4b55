//! Ergonomic testing utilities for dispatch
//!
//! This module provides a fluent API for testing forward chains with readable
//! Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // DispatchTest is the natural name

use composable_mvc_core::{Controller, DispatchError, RequestContext, ViewState, canonical_name};
use composable_mvc_runtime::{Application, ControllerRegistry, Dispatcher};

/// Type alias for assertions run after dispatch
type DispatchAssertion = Box<dyn FnOnce(&Result<String, DispatchError>, &ControllerRegistry<'_>)>;

/// Fluent API for testing dispatch with Given-When-Then syntax
///
/// # Example
///
/// ```
/// use composable_mvc_runtime::Application;
/// use composable_mvc_testing::{DispatchTest, ScriptedController};
///
/// let a = ScriptedController::new().forwards("forward", None, "test").completes("test");
/// let app = Application::builder().controller("a", move || a.clone()).build();
///
/// DispatchTest::new(app)
///     .when_dispatched("a", "forward")
///     .then_completed_on("a")
///     .then_controller::<ScriptedController, _>("a", |a| {
///         assert_eq!(a.log(), ["pre", "forward", "test"]);
///     })
///     .run();
/// ```
pub struct DispatchTest {
    app: Application,
    request: Option<RequestContext>,
    target: Option<(String, String)>,
    expects_error: bool,
    assertions: Vec<DispatchAssertion>,
}

impl DispatchTest {
    /// Create a new dispatch test against `app`
    #[must_use]
    pub fn new(app: Application) -> Self {
        Self {
            app,
            request: None,
            target: None,
            expects_error: false,
            assertions: Vec::new(),
        }
    }

    /// Set the request (Given). Defaults to `GET /controller/action`.
    #[must_use]
    pub fn given_request(mut self, request: RequestContext) -> Self {
        self.request = Some(request);
        self
    }

    /// Set the controller action to dispatch (When)
    #[must_use]
    pub fn when_dispatched(mut self, controller: &str, action: &str) -> Self {
        self.target = Some((controller.to_string(), action.to_string()));
        self
    }

    /// Assert that dispatch completed on `controller` (Then)
    #[must_use]
    pub fn then_completed_on(mut self, controller: &str) -> Self {
        let expected = canonical_name(controller);
        self.assertions.push(Box::new(move |result, _| {
            assert_eq!(
                result.as_ref().ok(),
                Some(&expected),
                "Expected dispatch to complete on {expected}"
            );
        }));
        self
    }

    /// Add an assertion about a controller's view (Then)
    #[must_use]
    pub fn then_view<F>(mut self, controller: &str, assertion: F) -> Self
    where
        F: FnOnce(&ViewState) + 'static,
    {
        let name = controller.to_string();
        self.assertions.push(Box::new(move |_, registry| {
            let instance = registry.get(&name);
            assert!(instance.is_some(), "Controller {name} was never created");
            if let Some(instance) = instance {
                assertion(instance.view());
            }
        }));
        self
    }

    /// Add an assertion about a controller instance of type `T` (Then)
    #[must_use]
    pub fn then_controller<T, F>(mut self, controller: &str, assertion: F) -> Self
    where
        T: Controller,
        F: FnOnce(&T) + 'static,
    {
        let name = controller.to_string();
        self.assertions.push(Box::new(move |_, registry| {
            let typed = registry.get(&name).and_then(|instance| instance.controller::<T>());
            assert!(
                typed.is_some(),
                "Controller {name} was never created or is not a {}",
                std::any::type_name::<T>()
            );
            if let Some(typed) = typed {
                assertion(typed);
            }
        }));
        self
    }

    /// Add an assertion about the dispatch error (Then)
    ///
    /// Without this, any dispatch error fails the test.
    #[must_use]
    pub fn then_error<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&DispatchError) + 'static,
    {
        self.expects_error = true;
        self.assertions.push(Box::new(move |result, _| {
            assert!(result.is_err(), "Expected dispatch to fail, got {result:?}");
            if let Err(err) = result {
                assertion(err);
            }
        }));
        self
    }

    /// Run the dispatch and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if no target is set, if dispatch fails without `then_error`, or
    /// if any assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let (controller, action) = self
            .target
            .expect("Target must be set with when_dispatched()");
        let request = self
            .request
            .unwrap_or_else(|| RequestContext::get(format!("/{controller}/{action}")));

        let mut dispatcher = Dispatcher::new(&self.app);
        let result = dispatcher
            .execute(&controller, &action, &request)
            .map(|instance| instance.name().to_string());

        if let Err(err) = &result {
            if !self.expects_error {
                panic!("Dispatch of {controller}.{action} failed: {err}");
            }
        }

        let registry = dispatcher.into_registry();
        for assertion in self.assertions {
            assertion(&result, &registry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::ScriptedController;

    fn app() -> Application {
        let home = ScriptedController::new().completes("index").fails("boom", "kaput");
        Application::builder()
            .controller("home", move || home.clone())
            .build()
    }

    #[test]
    fn test_completed_dispatch() {
        DispatchTest::new(app())
            .given_request(RequestContext::get("/"))
            .when_dispatched("home", "index")
            .then_completed_on("home")
            .then_view("home", |view| {
                assert_eq!(view.template(), Some("home/index"));
            })
            .run();
    }

    #[test]
    fn test_expected_error() {
        DispatchTest::new(app())
            .when_dispatched("home", "boom")
            .then_error(|err| {
                assert_eq!(err.to_string(), "kaput");
            })
            .then_controller::<ScriptedController, _>("home", |home| {
                assert_eq!(home.log(), ["pre", "boom"]);
            })
            .run();
    }

    #[test]
    #[should_panic(expected = "failed")]
    fn test_unexpected_error_panics() {
        DispatchTest::new(app()).when_dispatched("home", "missing").run();
    }
}
