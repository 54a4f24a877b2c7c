//! Deep-link resolution and tag click handling.

use serde::Serialize;
use url::Url;

use crate::item::slug_id;

/// Domains whose links resolve to comics.
pub const LINK_DOMAINS: &[&str] = &["batcave.biz"];

/// Resolves a comic page URL to its slug-id.
///
/// Only detail pages (`/<digits>-<slug>.html`) on a known domain resolve.
/// Reader URLs carry just the numeric id and do not.
///
/// ```rust
/// use batcave_core::links::link_to_id;
///
/// assert_eq!(link_to_id("https://batcave.biz/23236-peanuts-2012.html").as_deref(), Some("23236-peanuts-2012"));
/// assert_eq!(link_to_id("https://batcave.biz/reader/23236/4"), None);
/// ```
pub fn link_to_id(link: &str) -> Option<String> {
    let link = link.trim();
    let url = Url::parse(link).or_else(|_| Url::parse(&format!("https://{}", link))).ok()?;

    let host = url.host_str()?;
    let known = LINK_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.strip_suffix(domain).is_some_and(|sub| sub.ends_with('.')));
    if !known {
        return None;
    }

    let id = slug_id(url.path())?;
    (url.path() == format!("/{}.html", id)).then_some(id)
}

/// What the host should do when a tag is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum TagAction {
    /// Run a search with the tag text as keyword.
    Search { keyword: String },
}

/// Maps a tag click to an action. Every tag, whatever its group, becomes a keyword search.
pub fn tag_action(_namespace: &str, tag: &str) -> TagAction {
    TagAction::Search { keyword: tag.to_string() }
}
