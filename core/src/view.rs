//! View state accumulated by a controller while it handles a request.
//!
//! Each controller instance owns exactly one [`ViewState`]. Actions assign
//! variables, pick a template and layout, and add stylesheets and scripts. Once
//! dispatch completes, the state is handed to a renderer as a
//! [`RenderContext`].
//!
//! Variables carry a scope. Globally scoped variables survive a forward into a
//! different controller; locally scoped ones stay behind.

use crate::sitemap::PageMeta;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Leading character that turns a style or script entry into a removal.
pub const REMOVAL_MARKER: char = '-';

/// Separator between a stylesheet path and its media query.
pub const MEDIA_SEPARATOR: char = '@';

/// Media query used when a stylesheet entry names none.
pub const DEFAULT_MEDIA: &str = "screen";

/// Meta key holding the page language.
pub const META_LANGUAGE: &str = "language";

/// Meta key holding the page title.
pub const META_TITLE: &str = "title";

/// Scope of a view variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The variable was never assigned.
    NotSet,
    /// Carried across forwards into other controllers.
    Global,
    /// Visible only to the owning controller's view.
    Local,
}

impl Scope {
    /// Whether the scope is [`Scope::Global`].
    #[must_use]
    pub const fn is_global(self) -> bool {
        matches!(self, Self::Global)
    }

    /// Whether the variable has been assigned at all.
    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::NotSet)
    }
}

impl From<bool> for Scope {
    fn from(global: bool) -> Self {
        if global { Self::Global } else { Self::Local }
    }
}

/// Layout selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Layout {
    /// Use the renderer's default layout.
    #[default]
    Default,
    /// Render the template without a layout.
    None,
    /// Use the named layout.
    Named(String),
}

/// Mutable view bag owned by one controller instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    vars: HashMap<String, Value>,
    globals: HashMap<String, bool>,
    template: Option<String>,
    layout: Layout,
    metas: BTreeMap<String, Value>,
    styles: IndexMap<String, String>,
    scripts: IndexSet<String>,
}

impl ViewState {
    /// Create a view seeded with the `language` and `title` metas.
    #[must_use]
    pub fn new(language: impl Into<String>, title: impl Into<String>) -> Self {
        let mut metas = BTreeMap::new();
        metas.insert(META_LANGUAGE.to_string(), Value::String(language.into()));
        metas.insert(META_TITLE.to_string(), Value::String(title.into()));
        Self {
            vars: HashMap::new(),
            globals: HashMap::new(),
            template: None,
            layout: Layout::Default,
            metas,
            styles: IndexMap::new(),
            scripts: IndexSet::new(),
        }
    }

    // ── Variables ──────────────────────────────────────────────────────

    /// Assign a variable, overwriting any previous value and scope.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>, scope: Scope) {
        let name = name.into();
        self.globals.insert(name.clone(), scope.is_global());
        self.vars.insert(name, value.into());
    }

    /// Assign several variables with the same scope.
    pub fn assign_many<I, K, V>(&mut self, vars: I, scope: Scope)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in vars {
            self.assign(name, value, scope);
        }
    }

    /// Current value of a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Remove a variable and its scope.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.globals.remove(name);
        self.vars.remove(name)
    }

    /// All variables.
    #[must_use]
    pub const fn vars(&self) -> &HashMap<String, Value> {
        &self.vars
    }

    /// Scope of a variable; [`Scope::NotSet`] for unknown names.
    #[must_use]
    pub fn is_global(&self, name: &str) -> Scope {
        self.globals
            .get(name)
            .map_or(Scope::NotSet, |global| Scope::from(*global))
    }

    /// Globally scoped variables.
    pub fn global_vars(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars
            .iter()
            .filter(|(name, _)| self.globals.get(*name).copied().unwrap_or(false))
            .map(|(name, value)| (name.as_str(), value))
    }

    // ── Template & layout ──────────────────────────────────────────────

    /// Template name, if one is set.
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Set the template name.
    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = Some(template.into());
    }

    /// Layout selection.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Set the layout selection.
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// Layout to render with, resolving [`Layout::Default`] to `default`.
    #[must_use]
    pub fn effective_layout<'a>(&'a self, default: &'a str) -> Option<&'a str> {
        match &self.layout {
            Layout::Default => Some(default),
            Layout::None => None,
            Layout::Named(name) => Some(name.as_str()),
        }
    }

    // ── Metas ──────────────────────────────────────────────────────────

    /// A page meta.
    #[must_use]
    pub fn meta(&self, name: &str) -> Option<&Value> {
        self.metas.get(name)
    }

    /// Set a page meta.
    pub fn set_meta(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.metas.insert(name.into(), value.into());
    }

    /// All page metas.
    #[must_use]
    pub const fn metas(&self) -> &BTreeMap<String, Value> {
        &self.metas
    }

    /// Page title, if the `title` meta is a string.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.metas.get(META_TITLE).and_then(Value::as_str)
    }

    /// Set the page title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.set_meta(META_TITLE, Value::String(title.into()));
    }

    // ── Styles & scripts ───────────────────────────────────────────────

    /// Add or remove stylesheets.
    ///
    /// Entries are `path` or `path@media` (media defaults to `screen`). A
    /// leading `-` removes the path instead; removing an absent path is a
    /// no-op. Re-adding a path keeps its position and updates its media.
    pub fn set_styles<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let entry = entry.as_ref().trim();
            if let Some(removed) = entry.strip_prefix(REMOVAL_MARKER) {
                let (path, _) = split_media(removed);
                self.styles.shift_remove(path);
                continue;
            }
            let (path, media) = split_media(entry);
            if !path.is_empty() {
                self.styles
                    .insert(path.to_string(), media.unwrap_or(DEFAULT_MEDIA).to_string());
            }
        }
    }

    /// Stylesheets in insertion order, mapped to their media query.
    #[must_use]
    pub const fn styles(&self) -> &IndexMap<String, String> {
        &self.styles
    }

    /// Add or remove scripts. Same removal convention as [`Self::set_styles`].
    pub fn set_scripts<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let entry = entry.as_ref().trim();
            if let Some(removed) = entry.strip_prefix(REMOVAL_MARKER) {
                self.scripts.shift_remove(removed);
            } else if !entry.is_empty() {
                self.scripts.insert(entry.to_string());
            }
        }
    }

    /// Scripts in insertion order.
    #[must_use]
    pub fn scripts(&self) -> Vec<&str> {
        self.scripts.iter().map(String::as_str).collect()
    }

    // ── Sitemap & rendering ────────────────────────────────────────────

    /// Seed title, styles, scripts, metas and layout from sitemap metadata.
    pub fn apply_page(&mut self, page: &PageMeta) {
        if let Some(title) = &page.title {
            self.set_title(title.clone());
        }
        self.set_styles(&page.styles);
        self.set_scripts(&page.scripts);
        for (name, value) in &page.metas {
            self.metas.insert(name.clone(), value.clone());
        }
        if let Some(layout) = &page.layout {
            self.layout = layout.clone();
        }
    }

    /// Snapshot handed to a renderer.
    #[must_use]
    pub fn render_context<'a>(&'a self, default_layout: &'a str) -> RenderContext<'a> {
        RenderContext {
            template: self.template(),
            layout: self.effective_layout(default_layout),
            vars: &self.vars,
            metas: &self.metas,
            styles: self
                .styles
                .iter()
                .map(|(href, media)| Stylesheet { href, media })
                .collect(),
            scripts: self.scripts(),
        }
    }
}

fn split_media(entry: &str) -> (&str, Option<&str>) {
    match entry.split_once(MEDIA_SEPARATOR) {
        Some((path, media)) if !media.is_empty() => (path, Some(media)),
        Some((path, _)) => (path, None),
        None => (entry, None),
    }
}

/// Stylesheet reference in a [`RenderContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stylesheet<'a> {
    /// Stylesheet path.
    pub href: &'a str,
    /// Media query.
    pub media: &'a str,
}

/// Everything a renderer needs from a finished view.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext<'a> {
    /// Template to render.
    pub template: Option<&'a str>,
    /// Layout to wrap the template in; `None` renders bare.
    pub layout: Option<&'a str>,
    /// View variables.
    pub vars: &'a HashMap<String, Value>,
    /// Page metas.
    pub metas: &'a BTreeMap<String, Value>,
    /// Stylesheets in order.
    pub styles: Vec<Stylesheet<'a>>,
    /// Scripts in order.
    pub scripts: Vec<&'a str>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn view() -> ViewState {
        ViewState::new("en", "Home")
    }

    #[test]
    fn test_new_seeds_language_and_title() {
        let view = view();
        assert_eq!(view.meta(META_LANGUAGE), Some(&json!("en")));
        assert_eq!(view.title(), Some("Home"));
        assert!(view.template().is_none());
        assert_eq!(view.layout(), &Layout::Default);
    }

    #[test]
    fn test_assign_overwrites_value_and_scope() {
        let mut view = view();
        view.assign("user", "ada", Scope::Global);
        view.assign("user", "grace", Scope::Local);
        assert_eq!(view.get("user"), Some(&json!("grace")));
        assert_eq!(view.is_global("user"), Scope::Local);
    }

    #[test]
    fn test_unassigned_scope_is_not_set() {
        let view = view();
        let scope = view.is_global("missing");
        assert_eq!(scope, Scope::NotSet);
        assert_ne!(scope, Scope::Local);
        assert!(!scope.is_set());
    }

    #[test]
    fn test_assign_many_and_global_vars() {
        let mut view = view();
        view.assign_many([("a", 1), ("b", 2)], Scope::Global);
        view.assign("c", 3, Scope::Local);

        let mut globals: Vec<_> = view.global_vars().map(|(k, _)| k).collect();
        globals.sort_unstable();
        assert_eq!(globals, vec!["a", "b"]);
    }

    #[test]
    fn test_remove_clears_scope() {
        let mut view = view();
        view.assign("a", 1, Scope::Global);
        assert_eq!(view.remove("a"), Some(json!(1)));
        assert_eq!(view.is_global("a"), Scope::NotSet);
    }

    #[test]
    fn test_scripts_add_then_remove() {
        let mut view = view();
        view.set_scripts(["a", "b", "-a"]);
        assert_eq!(view.scripts(), vec!["b"]);
    }

    #[test]
    fn test_scripts_stay_unique() {
        let mut view = view();
        view.set_scripts(["a", "b", "a"]);
        assert_eq!(view.scripts(), vec!["a", "b"]);
    }

    #[test]
    fn test_removing_missing_entry_is_noop() {
        let mut view = view();
        view.set_scripts(["-ghost.js"]);
        view.set_styles(["-ghost.css"]);
        assert!(view.scripts().is_empty());
        assert!(view.styles().is_empty());
    }

    #[test]
    fn test_styles_media() {
        let mut view = view();
        view.set_styles(["main.css", "print.css@print", "empty.css@"]);
        let styles: Vec<_> = view
            .styles()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            styles,
            vec![
                ("main.css", "screen"),
                ("print.css", "print"),
                ("empty.css", "screen")
            ]
        );

        view.set_styles(["-print.css@print", "main.css@all"]);
        assert_eq!(view.styles().len(), 2);
        assert_eq!(view.styles().get("main.css").map(String::as_str), Some("all"));
        assert_eq!(view.styles().get_index(0).map(|(k, _)| k.as_str()), Some("main.css"));
    }

    #[test]
    fn test_effective_layout() {
        let mut view = view();
        assert_eq!(view.effective_layout("layout"), Some("layout"));
        view.set_layout(Layout::None);
        assert_eq!(view.effective_layout("layout"), None);
        view.set_layout(Layout::Named("admin".to_string()));
        assert_eq!(view.effective_layout("layout"), Some("admin"));
    }

    #[test]
    fn test_apply_page() {
        let mut view = view();
        view.set_scripts(["app.js"]);
        let page = PageMeta {
            title: Some("Blog".to_string()),
            styles: vec!["blog.css".to_string()],
            scripts: vec!["-app.js".to_string(), "blog.js".to_string()],
            metas: std::iter::once(("robots".to_string(), json!("noindex"))).collect(),
            layout: Some(Layout::None),
        };
        view.apply_page(&page);

        assert_eq!(view.title(), Some("Blog"));
        assert_eq!(view.scripts(), vec!["blog.js"]);
        assert!(view.styles().contains_key("blog.css"));
        assert_eq!(view.meta("robots"), Some(&json!("noindex")));
        assert_eq!(view.layout(), &Layout::None);
    }

    #[test]
    fn test_render_context_serializes() {
        let mut view = view();
        view.set_template("blog/index");
        view.assign("count", 3, Scope::Local);
        view.set_styles(["blog.css"]);

        let value = serde_json::to_value(view.render_context("layout")).unwrap();
        assert_eq!(value["template"], json!("blog/index"));
        assert_eq!(value["layout"], json!("layout"));
        assert_eq!(value["vars"]["count"], json!(3));
        assert_eq!(value["styles"][0], json!({ "href": "blog.css", "media": "screen" }));
        assert_eq!(value["metas"]["title"], json!("Home"));
    }

    proptest! {
        #[test]
        fn prop_scripts_mirror_ordered_set(ops in proptest::collection::vec((any::<bool>(), 0u8..5), 0..40)) {
            let mut view = view();
            let mut model: Vec<String> = Vec::new();
            for (remove, id) in ops {
                let name = format!("s{id}.js");
                if remove {
                    view.set_scripts([format!("-{name}")]);
                    model.retain(|s| s != &name);
                } else {
                    view.set_scripts([name.clone()]);
                    if !model.contains(&name) {
                        model.push(name);
                    }
                }
            }
            prop_assert_eq!(view.scripts(), model.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
