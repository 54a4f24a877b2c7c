//! Comic detail pages.

use serde::ser::{Serialize, Serializer};
use url::Url;

use crate::embedded::{DATA_BLOB, PageDataBlob, extract_blob_as};
use crate::item::{Item, ItemVariant, numeric_prefix, qualify_url};
use crate::listing::collect_items;
use crate::parse::{Document, Element};
use crate::{Result, SourceError};

/// Key under which the genre block is merged into the tag table.
pub const GENRE_LABEL: &str = "Genre";

const TITLE: &str = "header.page__header h1";
const POSTER: &str = "div.page__poster img";
const DESCRIPTION: &str = "div.page__text.full-text";
const INFO_ROWS: &str = "aside.page__left ul.page__list li";
const GENRE_LINKS: &str = "div.page__tags a";
const RELATED_CARDS: &str = "section.page__sect--hot .page__sect-content a.poster";

/// Everything shown on a comic's page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicDetail {
    /// Public slug-id the page was requested with.
    pub id: String,
    pub title: String,
    pub cover: Option<String>,
    /// Description as inner HTML.
    pub description: Option<String>,
    pub tag_groups: TagTable,
    /// Chapters in site order.
    pub chapters: Vec<Chapter>,
    pub related: Vec<Item>,
    /// Id used by reader URLs; differs from the slug-id.
    pub internal_numeric_id: String,
}

/// One readable chapter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,
}

/// Ordered mapping from a label to its values.
///
/// Adding to an existing label appends; labels keep their first-seen position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTable {
    groups: Vec<(String, Vec<String>)>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends values under `label`, creating the label if needed.
    pub fn add<I: IntoIterator<Item = String>>(&mut self, label: &str, values: I) {
        self.values_mut(label).extend(values);
    }

    /// Appends only the values not already present under `label`.
    pub fn merge<I: IntoIterator<Item = String>>(&mut self, label: &str, values: I) {
        let existing = self.values_mut(label);
        for value in values {
            if !existing.contains(&value) {
                existing.push(value);
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.groups.iter().find(|(l, _)| l == label).map(|(_, v)| v.as_slice())
    }

    /// Values of `label` re-serialized as one comma-separated string.
    pub fn joined(&self, label: &str) -> Option<String> {
        self.get(label).map(|values| values.join(", "))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(l, v)| (l.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn values_mut(&mut self, label: &str) -> &mut Vec<String> {
        let index = match self.groups.iter().position(|(l, _)| l == label) {
            Some(index) => index,
            None => {
                self.groups.push((label.to_string(), Vec::new()));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index].1
    }
}

impl Serialize for TagTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.groups.iter().map(|(l, v)| (l, v)))
    }
}

/// Extracts a [`ComicDetail`] from the page body.
///
/// # Errors
///
/// Returns [`SourceError::NoContent`] when the page has no title heading,
/// which is how the site renders missing or removed comics.
pub fn parse_comic_detail(html: &str, id: &str, base: &Url) -> Result<ComicDetail> {
    let doc = Document::parse(html);

    let title = doc
        .select_first(TITLE)?
        .and_then(|h1| h1.non_empty_text())
        .ok_or_else(|| SourceError::NoContent(format!("{}.html", id)))?;

    let cover = doc.select_first(POSTER)?.and_then(|img| {
        ["src", "data-src"]
            .iter()
            .find_map(|name| img.attr(name).and_then(|v| qualify_url(base, v)))
    });

    let description = doc
        .select_first(DESCRIPTION)?
        .map(|el| el.inner_html().trim().to_string())
        .filter(|d| !d.is_empty());

    let mut tag_groups = TagTable::new();
    for row in doc.select(INFO_ROWS)? {
        read_info_row(&row, &mut tag_groups);
    }

    let genres: Vec<String> = doc.select(GENRE_LINKS)?.iter().filter_map(|a| a.non_empty_text()).collect();
    if !genres.is_empty() {
        tag_groups.merge(GENRE_LABEL, genres);
    }

    let related = collect_items(&doc, RELATED_CARDS, ItemVariant::Carousel, base)?;

    let data: Option<PageDataBlob> = extract_blob_as(html, DATA_BLOB);
    let chapters = data
        .as_ref()
        .and_then(|d| d.chapters.as_ref())
        .map(|chapters| {
            chapters
                .iter()
                .map(|c| Chapter { id: c.id.clone(), title: c.title.clone().unwrap_or_else(|| c.id.clone()) })
                .collect()
        })
        .unwrap_or_default();

    let internal_numeric_id = data
        .and_then(|d| d.news_id)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| numeric_prefix(id).to_string());

    Ok(ComicDetail { id: id.to_string(), title, cover, description, tag_groups, chapters, related, internal_numeric_id })
}

/// Reads one `<li><div>Label:</div> value</li>` row into the table.
///
/// Linked values are taken one per anchor; a bare text value is split on commas.
fn read_info_row(row: &Element<'_>, table: &mut TagTable) {
    let Some(label_el) = row.first("div") else {
        return;
    };
    let label = label_el.text().trim_end_matches(':').trim().to_string();
    if label.is_empty() {
        return;
    }

    let anchors = row.all("a");
    let values: Vec<String> = if anchors.is_empty() {
        label_el
            .following_text()
            .map(|text| text.split(',').map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).collect())
            .unwrap_or_default()
    } else {
        anchors.iter().filter_map(|a| a.non_empty_text()).collect()
    };

    if !values.is_empty() {
        table.add(&label, values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://batcave.biz").unwrap()
    }

    const DETAIL: &str = r#"<html><body>
        <header class="page__header"><h1> Invincible (2003) </h1></header>
        <div class="page__poster"><img src="/uploads/posts/inv.jpg"></div>
        <aside class="page__left"><ul class="page__list">
            <li><div>Publisher:</div> Image</li>
            <li><div>Writer:</div> <a href="/w/1">Robert Kirkman</a></li>
            <li><div>Artist:</div> <a href="/a/1">Cory Walker</a>, <a href="/a/2">Ryan Ottley</a></li>
            <li><div>Writer:</div> <a href="/w/2">Robert Kirkman</a></li>
            <li><div>Status:</div></li>
        </ul></aside>
        <div class="page__tags"><a href="/g/1">Superhero</a><a href="/g/2">Action</a></div>
        <div class="page__text full-text"><p>Mark Grayson is <b>just</b> a teenager.</p></div>
        <section class="page__sect page__sect--hot"><div class="page__sect-content">
            <a class="poster" href="/7000-other-2010.html">
                <div class="poster__img"><img data-src="/uploads/o.jpg"></div>
                <p class="poster__title">Other</p>
            </a>
        </div></section>
        <script>window.__DATA__ = {"news_id": 6975, "chapters": [{"id": 11, "title": "Issue #1"}, {"id": 12, "title": "Issue #2; the \"end\" {?}"}]};</script>
    </body></html>"#;

    #[test]
    fn test_parse_detail() {
        let detail = parse_comic_detail(DETAIL, "6975-invincible-2003", &base()).unwrap();
        assert_eq!(detail.title, "Invincible (2003)");
        assert_eq!(detail.cover.as_deref(), Some("https://batcave.biz/uploads/posts/inv.jpg"));
        assert!(detail.description.as_deref().unwrap().contains("<b>just</b>"));
        assert_eq!(detail.internal_numeric_id, "6975");
        assert_eq!(detail.chapters.len(), 2);
        assert_eq!(detail.chapters[0], Chapter { id: "11".into(), title: "Issue #1".into() });
        assert_eq!(detail.chapters[1].title, "Issue #2; the \"end\" {?}");
        assert_eq!(detail.related.len(), 1);
        assert_eq!(detail.related[0].id, "7000-other-2010");
    }

    #[test]
    fn test_tag_table_accumulates_and_keeps_kinds() {
        let detail = parse_comic_detail(DETAIL, "6975-invincible-2003", &base()).unwrap();
        let tags = &detail.tag_groups;
        assert_eq!(tags.get("Publisher"), Some(&["Image".to_string()][..]));
        assert_eq!(tags.get("Writer").unwrap(), &["Robert Kirkman", "Robert Kirkman"]);
        assert_eq!(tags.joined("Artist").as_deref(), Some("Cory Walker, Ryan Ottley"));
        assert_eq!(tags.get(GENRE_LABEL).unwrap(), &["Superhero", "Action"]);
        assert!(tags.get("Status").is_none());

        let labels: Vec<&str> = tags.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Publisher", "Writer", "Artist", GENRE_LABEL]);
    }

    #[test]
    fn test_numeric_id_falls_back_to_slug() {
        let html = DETAIL.replace("window.__DATA__", "window.__OTHER__");
        let detail = parse_comic_detail(&html, "6975-invincible-2003", &base()).unwrap();
        assert_eq!(detail.internal_numeric_id, "6975");
        assert!(detail.chapters.is_empty());

        let html = DETAIL.replace("\"news_id\": 6975", "\"news_id\": 81234");
        let detail = parse_comic_detail(&html, "6975-invincible-2003", &base()).unwrap();
        assert_eq!(detail.internal_numeric_id, "81234");
    }

    #[test]
    fn test_bad_chapter_entry_keeps_numeric_id() {
        let html = DETAIL
            .replace("\"news_id\": 6975", "\"news_id\": 81234")
            .replace("{\"id\": 11, ", "{\"id\": null, ");
        let detail = parse_comic_detail(&html, "6975-invincible-2003", &base()).unwrap();
        assert_eq!(detail.internal_numeric_id, "81234");
        assert_eq!(detail.chapters.len(), 1);
        assert_eq!(detail.chapters[0].id, "12");
    }

    #[test]
    fn test_missing_title_is_no_content() {
        let result = parse_comic_detail("<html><body>gone</body></html>", "1-x", &base());
        assert!(matches!(result, Err(SourceError::NoContent(_))));
    }

    #[test]
    fn test_tag_table_merge_skips_duplicates() {
        let mut table = TagTable::new();
        table.add(GENRE_LABEL, vec!["Horror".to_string()]);
        table.merge(GENRE_LABEL, vec!["Horror".to_string(), "Crime".to_string()]);
        assert_eq!(table.get(GENRE_LABEL).unwrap(), &["Horror", "Crime"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_tag_table_serializes_as_ordered_map() {
        let mut table = TagTable::new();
        table.add("Writer", vec!["A".to_string()]);
        table.add("Artist", vec!["B".to_string(), "C".to_string()]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"Writer":["A"],"Artist":["B","C"]}"#);
    }

    #[test]
    fn test_bare_text_is_split_on_commas() {
        let html = r#"<header class="page__header"><h1>T</h1></header>
            <aside class="page__left"><ul class="page__list">
                <li><div>Writer:</div> Alan Moore, Dave Gibbons</li>
            </ul></aside>"#;
        let detail = parse_comic_detail(html, "5-t", &base()).unwrap();
        assert_eq!(detail.tag_groups.get("Writer").unwrap(), &["Alan Moore", "Dave Gibbons"]);
        assert_eq!(detail.internal_numeric_id, "5");
    }
}
