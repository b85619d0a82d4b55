//! Sitemap: the static, hierarchical description of every controller/action.
//!
//! A sitemap is a tree keyed by path segment. `blog.comment.edit` walks
//! `root → blog → comment → edit`. Every node may carry directives (keys with a
//! leading underscore, unknown ones ignored); every other key is a child node:
//!
//! ```json
//! {
//!   "_title": "My Site",
//!   "_allow": "*",
//!   "admin": {
//!     "_allow": ["admin"],
//!     "_title": "Administration",
//!     "_styles": ["admin.css", "print.css@print"],
//!     "users": { "_title": "Users" }
//!   }
//! }
//! ```
//!
//! # Access resolution
//!
//! Allowances inherit from parent to child. `_allow` replaces the inherited
//! allowance, `_deny` then removes roles from whatever is in effect at that
//! node, so a deny blocks its whole subtree until a descendant re-allows.

use crate::view::Layout;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Role identifier meaning "every role".
pub const WILDCARD: &str = "*";

/// Leading character of directive keys.
pub const DIRECTIVE_PREFIX: char = '_';

/// Errors raised while building a [`Sitemap`].
#[derive(Debug, Error)]
pub enum SitemapError {
    /// The sitemap document could not be parsed.
    #[error("Invalid sitemap: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Role list as written in a sitemap directive.
///
/// Accepts either a single string (`"admin"`, `"*"`) or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleSpec {
    /// A single role, or the wildcard.
    One(String),
    /// A list of roles; containing the wildcard makes it a wildcard.
    Many(Vec<String>),
}

impl RoleSpec {
    /// Wildcard spec (`"*"`).
    #[must_use]
    pub fn any() -> Self {
        Self::One(WILDCARD.to_string())
    }

    /// Spec listing the given roles.
    #[must_use]
    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(roles.into_iter().map(Into::into).collect())
    }

    /// Whether the spec names every role.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        match self {
            Self::One(role) => role == WILDCARD,
            Self::Many(roles) => roles.iter().any(|role| role == WILDCARD),
        }
    }

    fn to_set(&self) -> BTreeSet<String> {
        match self {
            Self::One(role) => std::iter::once(role.clone()).collect(),
            Self::Many(roles) => roles.iter().cloned().collect(),
        }
    }
}

/// Effective set of roles allowed to reach a sitemap node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "roles", rename_all = "snake_case")]
pub enum RoleAllowance {
    /// Every role is allowed.
    All,
    /// Only the listed roles are allowed (empty means nobody).
    Only(BTreeSet<String>),
    /// Every role except the listed ones is allowed.
    AllExcept(BTreeSet<String>),
}

impl RoleAllowance {
    /// Allowance that admits nobody.
    #[must_use]
    pub const fn nobody() -> Self {
        Self::Only(BTreeSet::new())
    }

    /// Whether `role` may access the node.
    #[must_use]
    pub fn permits(&self, role: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(roles) => roles.contains(role),
            Self::AllExcept(roles) => !roles.contains(role),
        }
    }

    /// Whether at least one of `roles` may access the node.
    pub fn permits_any<I, S>(&self, roles: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        roles.into_iter().any(|role| self.permits(role.as_ref()))
    }

    /// Remove the denied roles from this allowance.
    #[must_use]
    pub fn deny(self, spec: &RoleSpec) -> Self {
        if spec.is_wildcard() {
            return Self::nobody();
        }
        let denied = spec.to_set();
        match self {
            Self::All => Self::AllExcept(denied),
            Self::Only(roles) => Self::Only(roles.difference(&denied).cloned().collect()),
            Self::AllExcept(mut roles) => {
                roles.extend(denied);
                Self::AllExcept(roles)
            },
        }
    }

    fn from_allow(spec: &RoleSpec) -> Self {
        if spec.is_wildcard() {
            Self::All
        } else {
            Self::Only(spec.to_set())
        }
    }
}

/// Layout directive in a sitemap node: `false` disables, a string names one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutDirective {
    /// `true` keeps the renderer default, `false` renders without a layout.
    Enabled(bool),
    /// A named layout.
    Named(String),
}

impl From<&LayoutDirective> for Layout {
    fn from(directive: &LayoutDirective) -> Self {
        match directive {
            LayoutDirective::Enabled(true) => Self::Default,
            LayoutDirective::Enabled(false) => Self::None,
            LayoutDirective::Named(name) => Self::Named(name.clone()),
        }
    }
}

/// One node of the sitemap tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapNode {
    /// Roles allowed at this node; replaces the inherited allowance.
    #[serde(rename = "_allow", default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<RoleSpec>,

    /// Roles denied at this node and below.
    #[serde(rename = "_deny", default, skip_serializing_if = "Option::is_none")]
    pub deny: Option<RoleSpec>,

    /// Page title.
    #[serde(rename = "_title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Stylesheet directives (`path[@media]`, `-path` removes).
    #[serde(rename = "_styles", default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<String>,

    /// Script directives (`path`, `-path` removes).
    #[serde(rename = "_scripts", default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<String>,

    /// Extra page metas.
    #[serde(rename = "_metas", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metas: BTreeMap<String, Value>,

    /// Layout override.
    #[serde(rename = "_layout", default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutDirective>,

    /// Whether the node shows up in navigation. Defaults to visible.
    #[serde(rename = "_visible", default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    /// Child nodes keyed by path segment.
    #[serde(flatten, deserialize_with = "child_nodes")]
    pub children: BTreeMap<String, SitemapNode>,
}

/// Every non-directive key is a child; unknown directives are ignored.
fn child_nodes<'de, D>(deserializer: D) -> Result<BTreeMap<String, SitemapNode>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .filter(|(key, _)| !key.starts_with(DIRECTIVE_PREFIX))
        .map(|(key, value)| {
            SitemapNode::deserialize(value)
                .map(|node| (key, node))
                .map_err(D::Error::custom)
        })
        .collect()
}

impl SitemapNode {
    /// Empty node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `_allow` directive.
    #[must_use]
    pub fn with_allow(mut self, spec: RoleSpec) -> Self {
        self.allow = Some(spec);
        self
    }

    /// Set the `_deny` directive.
    #[must_use]
    pub fn with_deny(mut self, spec: RoleSpec) -> Self {
        self.deny = Some(spec);
        self
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append stylesheet directives.
    #[must_use]
    pub fn with_styles<I, S>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.styles.extend(styles.into_iter().map(Into::into));
        self
    }

    /// Append script directives.
    #[must_use]
    pub fn with_scripts<I, S>(mut self, scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scripts.extend(scripts.into_iter().map(Into::into));
        self
    }

    /// Set a page meta.
    #[must_use]
    pub fn with_meta(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metas.insert(name.into(), value.into());
        self
    }

    /// Set the layout directive.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutDirective) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Hide the node from navigation.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = Some(false);
        self
    }

    /// Add a child node.
    #[must_use]
    pub fn with_child(mut self, segment: impl Into<String>, child: Self) -> Self {
        self.children.insert(segment.into(), child);
        self
    }

    /// Whether the node is shown in navigation.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    /// Apply this node's directives to the allowance inherited from its parent.
    #[must_use]
    pub fn effective_allowance(&self, inherited: RoleAllowance) -> RoleAllowance {
        let base = self
            .allow
            .as_ref()
            .map_or(inherited, RoleAllowance::from_allow);
        match &self.deny {
            Some(spec) => base.deny(spec),
            None => base,
        }
    }
}

/// Page metadata accumulated along a sitemap path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    /// Title of the deepest node defining one.
    pub title: Option<String>,
    /// Stylesheet directives, root first.
    pub styles: Vec<String>,
    /// Script directives, root first.
    pub scripts: Vec<String>,
    /// Metas, deeper nodes overriding.
    pub metas: BTreeMap<String, Value>,
    /// Layout of the deepest node defining one.
    pub layout: Option<Layout>,
}

impl PageMeta {
    fn absorb(&mut self, node: &SitemapNode) {
        if let Some(title) = &node.title {
            self.title = Some(title.clone());
        }
        self.styles.extend(node.styles.iter().cloned());
        self.scripts.extend(node.scripts.iter().cloned());
        self.metas
            .extend(node.metas.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(layout) = &node.layout {
            self.layout = Some(layout.into());
        }
    }
}

/// Navigation entry for a visible, accessible child node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    /// Full dotted key of the child.
    pub key: String,
    /// Last path segment.
    pub segment: String,
    /// Child title, if any.
    pub title: Option<String>,
}

/// The sitemap tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sitemap {
    root: SitemapNode,
}

impl Sitemap {
    /// Wrap a root node.
    #[must_use]
    pub const fn new(root: SitemapNode) -> Self {
        Self { root }
    }

    /// Parse a sitemap from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SitemapError::Parse`] if the document is not a valid tree.
    pub fn from_json(source: &str) -> Result<Self, SitemapError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Build a sitemap from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`SitemapError::Parse`] if the value is not a valid tree.
    pub fn from_value(value: Value) -> Result<Self, SitemapError> {
        Ok(serde_json::from_value(value)?)
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> &SitemapNode {
        &self.root
    }

    /// Exact node lookup. An empty key returns the root.
    #[must_use]
    pub fn find(&self, dot_key: &str) -> Option<&SitemapNode> {
        segments(dot_key).try_fold(&self.root, |node, segment| node.children.get(segment))
    }

    /// Resolve the roles allowed to reach `dot_key`.
    ///
    /// Missing nodes stop the walk; the nearest defining ancestor wins and an
    /// undecorated tree allows every role.
    #[must_use]
    pub fn find_allow_roles(&self, dot_key: &str) -> RoleAllowance {
        let mut node = &self.root;
        let mut effective = node.effective_allowance(RoleAllowance::All);
        for segment in segments(dot_key) {
            let Some(child) = node.children.get(segment) else {
                break;
            };
            effective = child.effective_allowance(effective);
            node = child;
        }
        effective
    }

    /// Collect page metadata along the path to `dot_key`.
    #[must_use]
    pub fn page(&self, dot_key: &str) -> PageMeta {
        let mut page = PageMeta::default();
        let mut node = &self.root;
        page.absorb(node);
        for segment in segments(dot_key) {
            let Some(child) = node.children.get(segment) else {
                break;
            };
            page.absorb(child);
            node = child;
        }
        page
    }

    /// Visible children of `dot_key` that at least one of `roles` may access.
    #[must_use]
    pub fn navigation<S: AsRef<str>>(&self, dot_key: &str, roles: &[S]) -> Vec<NavEntry> {
        let Some(node) = self.find(dot_key) else {
            return Vec::new();
        };
        let inherited = self.find_allow_roles(dot_key);
        let prefix = segments(dot_key).collect::<Vec<_>>().join(".");

        node.children
            .iter()
            .filter(|(_, child)| child.is_visible())
            .filter(|(_, child)| {
                child
                    .effective_allowance(inherited.clone())
                    .permits_any(roles)
            })
            .map(|(segment, child)| NavEntry {
                key: if prefix.is_empty() {
                    segment.clone()
                } else {
                    format!("{prefix}.{segment}")
                },
                segment: segment.clone(),
                title: child.title.clone(),
            })
            .collect()
    }
}

fn segments(dot_key: &str) -> impl Iterator<Item = &str> {
    dot_key.split('.').filter(|segment| !segment.is_empty())
}
