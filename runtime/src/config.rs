//! Dispatch configuration.
//!
//! Values are provided by the application; nothing here reads files or the
//! environment. The struct deserializes with serde so it can be embedded in
//! whatever configuration format the application already uses.

use serde::{Deserialize, Serialize};

/// Default limit on forwards followed by one dispatch.
pub const DEFAULT_MAX_FORWARD_DEPTH: usize = 16;

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Maximum forwards followed before failing with `ForwardLoopDetected`.
    ///
    /// Default: 16
    pub max_forward_depth: usize,

    /// `language` meta seeded into every new view.
    ///
    /// Default: `"en"`
    pub language: String,

    /// `title` meta seeded into every new view, before the sitemap applies.
    ///
    /// Default: empty
    pub title: String,
}

impl DispatchConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the forward depth limit.
    #[must_use]
    pub const fn with_max_forward_depth(mut self, depth: usize) -> Self {
        self.max_forward_depth = depth;
        self
    }

    /// Set the default language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the default title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_forward_depth: DEFAULT_MAX_FORWARD_DEPTH,
            language: "en".to_string(),
            title: String::new(),
        }
    }
}
