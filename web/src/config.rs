//! Web shell configuration.

use serde::Deserialize;

/// Controller used when the path names none.
pub const DEFAULT_CONTROLLER: &str = "index";
/// Action used when the path names none.
pub const DEFAULT_ACTION: &str = "index";
/// Role assumed for requests without roles.
pub const GUEST_ROLE: &str = "guest";
/// Layout used when a view does not name one.
pub const DEFAULT_LAYOUT: &str = "layout";

/// Configuration for the HTTP shell.
///
/// # Example
///
/// ```
/// use composable_mvc_web::WebConfig;
///
/// let config = WebConfig::new()
///     .with_default_controller("home")
///     .with_guest_role("anonymous");
///
/// assert_eq!(config.default_controller, "home");
/// assert_eq!(config.default_action, "index");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Controller for `/`.
    pub default_controller: String,
    /// Action when the path only names a controller.
    pub default_action: String,
    /// Role given to requests that carry none.
    pub guest_role: String,
    /// Layout handed to the renderer when the view keeps the default.
    pub default_layout: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            default_controller: DEFAULT_CONTROLLER.to_string(),
            default_action: DEFAULT_ACTION.to_string(),
            guest_role: GUEST_ROLE.to_string(),
            default_layout: DEFAULT_LAYOUT.to_string(),
        }
    }
}

impl WebConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default controller.
    #[must_use]
    pub fn with_default_controller(mut self, controller: impl Into<String>) -> Self {
        self.default_controller = controller.into();
        self
    }

    /// Set the default action.
    #[must_use]
    pub fn with_default_action(mut self, action: impl Into<String>) -> Self {
        self.default_action = action.into();
        self
    }

    /// Set the guest role.
    #[must_use]
    pub fn with_guest_role(mut self, role: impl Into<String>) -> Self {
        self.guest_role = role.into();
        self
    }

    /// Set the default layout.
    #[must_use]
    pub fn with_default_layout(mut self, layout: impl Into<String>) -> Self {
        self.default_layout = layout.into();
        self
    }
}
