//! Listing pages: homepage sections and paginated card grids.
//!
//! These functions take a response body and return finished records. The
//! parsed [`Document`] lives only inside each call.

use url::Url;

use crate::Result;
use crate::item::{Item, ItemVariant, PageResult, Section, normalize};
use crate::pagination::resolve_max_page;
use crate::parse::Document;

pub const POPULAR_SECTION: &str = "Popular (Carousel)";
pub const HOT_SECTION: &str = "Hot New Releases";
pub const LATEST_SECTION: &str = "Newest Comic Releases";

/// Homepage carousel posters.
pub const CAROUSEL_CARDS: &str = "div#owl-carou a.poster.grid-item";
/// Homepage "Hot New Releases" posters.
pub const HOT_CARDS: &str = "section.sect--hot div.sect__content a.poster.grid-item";
/// Homepage "Newest Comic Releases" rows.
pub const LATEST_ROWS: &str = "section.sect--latest ul#content-load > li.latest.grid-item";
/// Category and search result cards.
pub const LISTING_CARDS: &str = "#dle-content div.readed.d-flex.short";
/// Favorites folder posters.
pub const FAVORITE_CARDS: &str = "#dle-content a.poster.grid-item";

/// Extracts the homepage sections.
///
/// Page 1 carries the carousel, hot releases and the first page of newest
/// releases. Later pages only carry newest releases, titled with the page
/// number. Empty sections are left out.
pub fn parse_homepage(html: &str, page: u32, base: &Url) -> Result<Vec<Section>> {
    let doc = Document::parse(html);
    let mut sections = Vec::new();

    if page <= 1 {
        push_section(&mut sections, POPULAR_SECTION.to_string(), collect_items(&doc, CAROUSEL_CARDS, ItemVariant::Carousel, base)?);
        push_section(&mut sections, HOT_SECTION.to_string(), collect_items(&doc, HOT_CARDS, ItemVariant::Carousel, base)?);
    }

    let latest_title = if page > 1 { format!("{} (Page {})", LATEST_SECTION, page) } else { LATEST_SECTION.to_string() };
    push_section(&mut sections, latest_title, collect_items(&doc, LATEST_ROWS, ItemVariant::Latest, base)?);

    Ok(sections)
}

/// Extracts one page of a card grid together with its page count.
pub fn parse_card_page(html: &str, selector: &str, variant: ItemVariant, base: &Url) -> Result<PageResult> {
    let doc = Document::parse(html);
    let items = collect_items(&doc, selector, variant, base)?;
    let max_page = resolve_max_page(&doc, items.len());
    Ok(PageResult { items, max_page })
}

/// Normalizes every fragment matching `selector`, skipping cards without a slug-id.
pub fn collect_items(doc: &Document, selector: &str, variant: ItemVariant, base: &Url) -> Result<Vec<Item>> {
    Ok(doc
        .select(selector)?
        .iter()
        .filter_map(|fragment| normalize(fragment, variant, base))
        .collect())
}

fn push_section(sections: &mut Vec<Section>, title: String, items: Vec<Item>) {
    if !items.is_empty() {
        sections.push(Section { title, items });
    }
}
