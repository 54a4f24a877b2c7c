//! Catalog item records and the per-variant normalizer.
//!
//! Every listing on the site renders comics with one of a handful of card
//! shapes. [`normalize`] maps one card fragment to an [`Item`]. The only hard
//! requirement is a slug-id in the card's link; every other field is optional
//! and degrades to `None` (or an empty title/tag list) when the markup omits it.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::parse::Element;

static SLUG_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+-[^/?#]+)\.html").expect("slug-id pattern compiles"));

static BARE_SLUG_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-[^/?#\\\s]+$").expect("bare slug-id pattern compiles"));

/// A comic as shown in any listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Slug-id, e.g. `6975-invincible-2003`. Never empty.
    pub id: String,
    pub title: String,
    /// Absolute cover URL.
    pub cover: Option<String>,
    pub sub_title: Option<String>,
    /// Tags in source order.
    pub tags: Vec<String>,
    pub description: Option<String>,
}

/// A titled group of items, e.g. one homepage block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub items: Vec<Item>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub items: Vec<Item>,
    /// Always at least 1.
    pub max_page: u32,
}

/// Card shapes found on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemVariant {
    /// `a.poster` cards in the homepage carousel, hot releases and related blocks.
    Carousel,
    /// `li.latest` rows in the homepage "Newest Comic Releases" block.
    Latest,
    /// `div.readed` cards on category listings.
    ListingCard,
    /// `div.readed` cards on search results.
    SearchCard,
    /// `a.poster` cards on favorites pages.
    FavoriteCard,
}

/// Extracts the slug-id from a content URL.
///
/// ```rust
/// use batcave_core::item::slug_id;
///
/// assert_eq!(slug_id("https://batcave.biz/6975-invincible-2003.html").as_deref(), Some("6975-invincible-2003"));
/// assert_eq!(slug_id("https://batcave.biz/reader/6975/1"), None);
/// ```
pub fn slug_id(url: &str) -> Option<String> {
    SLUG_ID.captures(url).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}

/// Whether `id` is a bare slug-id that can be spliced into a site path.
///
/// Anything carrying a path separator, query, fragment or whitespace is rejected.
pub fn is_slug_id(id: &str) -> bool {
    BARE_SLUG_ID.is_match(id)
}

/// Leading numeric segment of a slug-id (`6975-invincible-2003` → `6975`).
///
/// Ids without a dash are returned whole.
pub fn numeric_prefix(id: &str) -> &str {
    id.split_once('-').map_or(id, |(head, _)| head)
}

/// Qualifies a possibly relative asset path against the site origin.
///
/// Absolute `http(s)` URLs pass through unchanged, so applying this twice
/// is the same as applying it once. Blank input yields `None`.
pub fn qualify_url(base: &Url, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }
    if let Some(rest) = path.strip_prefix("//") {
        return Some(format!("{}://{}", base.scheme(), rest));
    }
    match base.join(path) {
        Ok(url) => Some(url.to_string()),
        Err(_) => Some(format!("{}{}", base.origin().ascii_serialization(), path)),
    }
}

/// Normalizes one card fragment into an [`Item`].
///
/// Returns `None` only when the card's link carries no slug-id.
pub fn normalize(fragment: &Element<'_>, variant: ItemVariant, base: &Url) -> Option<Item> {
    let item = match variant {
        ItemVariant::Carousel => poster(fragment, base, "p.poster__title", &["data-src", "src"], true),
        ItemVariant::FavoriteCard => poster(fragment, base, "h3.poster__title", &["src", "data-src"], false),
        ItemVariant::Latest => latest(fragment, base),
        ItemVariant::ListingCard | ItemVariant::SearchCard => readed(fragment, base),
    };

    if item.is_none() {
        tracing::debug!(?variant, "dropping card without a slug-id link");
    }
    item
}

/// `a.poster` cards: the fragment itself is the link.
fn poster(fragment: &Element<'_>, base: &Url, title_sel: &str, cover_attrs: &[&str], tag_publisher: bool) -> Option<Item> {
    let id = slug_id(fragment.attr("href")?)?;
    let title = fragment.first(title_sel).map(|e| e.text()).unwrap_or_default();
    let cover = fragment.first("div.poster__img img").and_then(|img| image_src(&img, base, cover_attrs));

    let subtitle_items = fragment.all("ul.poster__subtitle li");
    let publisher = subtitle_items.first().and_then(|e| e.non_empty_text());
    let year = match subtitle_items.as_slice() {
        [_, .., last] => Some(last.text().replace("г.", "").trim().to_string()).filter(|y| !y.is_empty()),
        _ => None,
    };

    let mut tags = Vec::new();
    if tag_publisher && let Some(publisher) = &publisher {
        tags.push(publisher.clone());
    }

    Some(Item {
        id,
        title,
        cover,
        sub_title: compose_subtitle(publisher.as_deref(), year.as_deref()),
        tags,
        description: if tag_publisher { year } else { None },
    })
}

/// `li.latest` rows on the homepage.
fn latest(fragment: &Element<'_>, base: &Url) -> Option<Item> {
    let link = fragment.first("a.latest__img")?;
    let id = slug_id(link.attr("href")?)?;

    let title = fragment.first("a.latest__title").map(|e| e.text()).unwrap_or_default();
    let cover = link.first("img").and_then(|img| image_src(&img, base, &["src", "data-src"]));
    let publisher = fragment
        .first("div.latest__publisher")
        .map(|e| e.text().replace("Publisher:", "").trim().to_string())
        .filter(|p| !p.is_empty());
    let chapter = fragment.first("p.latest__chapter a").and_then(|e| e.non_empty_text());

    Some(Item {
        id,
        title,
        cover,
        sub_title: publisher.clone(),
        tags: publisher.into_iter().collect(),
        description: chapter,
    })
}

/// `div.readed` cards on category and search listings.
fn readed(fragment: &Element<'_>, base: &Url) -> Option<Item> {
    let anchor = fragment.first("h2.readed__title > a")?;
    let id = slug_id(anchor.attr("href")?)?;

    let title = anchor.text();
    let cover = fragment
        .first("a.readed__img > img")
        .and_then(|img| image_src(&img, base, &["data-src", "src"]));

    let info = fragment.all("ul.readed__info > li");
    let mut description = info.first().map(|li| li.text()).unwrap_or_default();
    let last_issue = info
        .iter()
        .find(|li| li.first("span").is_some_and(|span| span.text().contains("Last issue:")))
        .map(|li| li.text().replace("Last issue:", "Last:").trim().to_string());
    if let Some(last_issue) = last_issue {
        if !description.is_empty() {
            description.push('\n');
        }
        description.push_str(&last_issue);
    }

    let meta = fragment.all("div.readed__meta > div.readed__meta-item");
    let publisher = meta.first().and_then(|e| e.non_empty_text());
    let mut tags: Vec<String> = publisher.iter().cloned().collect();
    if let [_, .., last] = meta.as_slice() {
        let year = last.text();
        if !year.is_empty() && year.parse::<u32>().is_ok() {
            tags.push(year);
        }
    }

    Some(Item {
        id,
        title,
        cover,
        sub_title: publisher,
        tags,
        description: Some(description).filter(|d| !d.is_empty()),
    })
}

fn image_src(img: &Element<'_>, base: &Url, attrs: &[&str]) -> Option<String> {
    attrs
        .iter()
        .filter_map(|name| img.attr(name))
        .find(|v| !v.trim().is_empty())
        .and_then(|v| qualify_url(base, v))
}

/// `Publisher (Year)`, or whichever half is present.
fn compose_subtitle(publisher: Option<&str>, year: Option<&str>) -> Option<String> {
    match (publisher, year) {
        (Some(p), Some(y)) => Some(format!("{} ({})", p, y)),
        (Some(p), None) => Some(p.to_string()),
        (None, Some(y)) => Some(y.to_string()),
        (None, None) => None,
    }
}
