//! Read-only request context handed to controllers and actions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The parts of an HTTP request (or CLI invocation) an action may read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    method: String,
    path: String,
    params: BTreeMap<String, String>,
    roles: Vec<String>,
}

impl RequestContext {
    /// Create a request context for `method` and `path`.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            params: BTreeMap::new(),
            roles: Vec::new(),
        }
    }

    /// `GET` request for `path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    /// `POST` request for `path`.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    /// Add a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Add several parameters.
    #[must_use]
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the roles of the requesting user.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// A single parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// All parameters.
    #[must_use]
    pub const fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Roles of the requesting user.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = RequestContext::post("/blog/edit")
            .with_param("id", "7")
            .with_params([("draft", "1")])
            .with_roles(["editor"]);

        assert_eq!(request.method(), "POST");
        assert_eq!(request.path(), "/blog/edit");
        assert_eq!(request.param("id"), Some("7"));
        assert_eq!(request.param("draft"), Some("1"));
        assert_eq!(request.param("missing"), None);
        assert_eq!(request.roles(), ["editor".to_string()]);
    }
}
