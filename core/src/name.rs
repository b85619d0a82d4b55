//! Controller name normalization.

/// Normalize a controller name to its canonical slash-joined, lowercase form.
///
/// `Blog::Comment`, `blog.comment`, `blog\Comment` and `/blog/comment/` all
/// become `blog/comment`.
#[must_use]
pub fn canonical_name(raw: &str) -> String {
    raw.replace("::", "/")
        .split(['/', '.', '\\'])
        .filter(|segment| !segment.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("/")
}

/// Sitemap key of a controller action: `blog/comment` + `edit` → `blog.comment.edit`.
#[must_use]
pub fn page_key(controller: &str, action: &str) -> String {
    let controller = canonical_name(controller).replace('/', ".");
    if controller.is_empty() {
        action.to_string()
    } else {
        format!("{controller}.{action}")
    }
}

/// Default template of a controller action: `{controller}/{action}`.
#[must_use]
pub fn template_name(controller: &str, action: &str) -> String {
    format!("{}/{action}", canonical_name(controller))
}
