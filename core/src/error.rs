//! Errors raised while dispatching a controller action.

use thiserror::Error;

/// Result type alias for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Everything that can go wrong between "dispatch this action" and a finished
/// view.
///
/// Errors raised by controller code itself travel through [`DispatchError::Action`]
/// untouched.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No controller is registered under the requested name.
    #[error("Controller not found: {controller}")]
    ControllerNotFound {
        /// Canonical controller name
        controller: String,
    },

    /// The controller has neither a method nor a registered action class for
    /// the requested action.
    #[error("Action not found: {controller}.{action}")]
    ActionNotFound {
        /// Canonical controller name
        controller: String,
        /// Requested action
        action: String,
    },

    /// A registered action class is bound to a different controller type.
    #[error("Action {controller}.{action} expects controller type {expected}")]
    BadInterface {
        /// Canonical controller name
        controller: String,
        /// Requested action
        action: String,
        /// Controller type the action was written for
        expected: &'static str,
    },

    /// The forward chain exceeded the configured depth.
    #[error("Forward loop detected after {depth} forwards: {}", .chain.join(" -> "))]
    ForwardLoopDetected {
        /// Number of forwards followed
        depth: usize,
        /// Visited `controller.action` pairs, in order
        chain: Vec<String>,
    },

    /// Error raised by a pre-execution hook or an action.
    #[error(transparent)]
    Action(#[from] anyhow::Error),
}

impl DispatchError {
    /// Whether the error means "nothing handles this request" (HTTP 404).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ControllerNotFound { .. } | Self::ActionNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = DispatchError::ActionNotFound {
            controller: "blog".to_string(),
            action: "nope".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Action not found: blog.nope");

        let err = DispatchError::ControllerNotFound {
            controller: "ghost".to_string(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_forward_loop_message() {
        let err = DispatchError::ForwardLoopDetected {
            depth: 2,
            chain: vec!["a.x".to_string(), "b.y".to_string(), "a.x".to_string()],
        };
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Forward loop detected after 2 forwards: a.x -> b.y -> a.x"
        );
    }

    #[test]
    fn test_action_errors_are_transparent() {
        let err = DispatchError::from(anyhow::anyhow!("database unavailable"));
        assert_eq!(err.to_string(), "database unavailable");
    }
}
