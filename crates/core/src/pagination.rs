//! Page-count inference for paginated listings.

use crate::parse::Document;

/// Page-number anchors inside the pager region.
pub const PAGER_LINKS: &str = "div.pagination__pages a";

/// The current-page marker, rendered as a bare span.
pub const PAGER_CURRENT: &str = "div.pagination__pages span";

/// Determines the highest page number advertised by the pager.
///
/// Collects every number from the pager anchors plus the current-page marker
/// and returns the maximum. Without a pager the listing counts as a single
/// page whether or not it has items; a site whose pager uses different
/// markup therefore also reads as one page.
///
/// # Example
///
/// ```rust
/// use batcave_core::{Document, pagination::resolve_max_page};
///
/// let html = r#"<div class="pagination__pages"><a>2</a><span>3</span><a>4</a><a>5</a></div>"#;
/// assert_eq!(resolve_max_page(&Document::parse(html), 10), 5);
/// ```
pub fn resolve_max_page(doc: &Document, item_count: usize) -> u32 {
    let mut pages: Vec<u32> = doc
        .select(PAGER_LINKS)
        .unwrap_or_default()
        .iter()
        .filter_map(|a| page_number(&a.text()))
        .collect();

    if let Ok(Some(current)) = doc.select_first(PAGER_CURRENT)
        && let Some(n) = page_number(&current.text())
    {
        pages.push(n);
    }

    match pages.into_iter().max() {
        Some(max) => max.max(1),
        None if item_count > 0 => {
            tracing::debug!(item_count, "no pager found, treating listing as a single page");
            1
        }
        None => {
            tracing::debug!("no pager and no items");
            1
        }
    }
}

/// Leading integer of a pager label; `None` for labels like "Next".
fn page_number(label: &str) -> Option<u32> {
    let label = label.trim();
    let end = label.find(|c: char| !c.is_ascii_digit()).unwrap_or(label.len());
    label[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_page(html: &str, items: usize) -> u32 {
        resolve_max_page(&Document::parse(html), items)
    }

    #[test]
    fn test_pager_with_current_marker() {
        let html = r#"<div class="pagination__pages">
            <a href="/page/2/">2</a><span>3</span><a href="/page/4/">4</a><a href="/page/5/">5</a>
        </div>"#;
        assert_eq!(max_page(html, 20), 5);
    }

    #[test]
    fn test_current_marker_can_be_the_maximum() {
        let html = r#"<div class="pagination__pages"><a>1</a><a>2</a><span>3</span></div>"#;
        assert_eq!(max_page(html, 5), 3);
    }

    #[test]
    fn test_non_numeric_anchors_are_ignored() {
        let html = r#"<div class="pagination__pages"><a>Prev</a><a>1</a><span>2</span><a>…</a><a>48</a><a>Next</a></div>"#;
        assert_eq!(max_page(html, 5), 48);
    }

    #[test]
    fn test_no_pager_with_items_is_single_page() {
        assert_eq!(max_page("<div id=\"dle-content\"><div class=\"readed\"></div></div>", 1), 1);
    }

    #[test]
    fn test_no_pager_without_items_is_single_page() {
        assert_eq!(max_page("<div id=\"dle-content\"></div>", 0), 1);
    }

    #[test]
    fn test_lone_current_marker() {
        assert_eq!(max_page(r#"<div class="pagination__pages"><span>1</span></div>"#, 3), 1);
    }

    #[test]
    fn test_page_number() {
        assert_eq!(page_number(" 12 "), Some(12));
        assert_eq!(page_number("7abc"), Some(7));
        assert_eq!(page_number("Next"), None);
        assert_eq!(page_number(""), None);
    }
}
