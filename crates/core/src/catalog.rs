//! Catalog pipelines: fetch a page, check the status, extract records.
//!
//! Every method issues one request. Non-success statuses become
//! [`SourceError::Transport`]; parsing happens after the response is in hand
//! so the parsed document never crosses an await point.

use std::sync::Arc;

use url::Url;

use crate::detail::{ComicDetail, parse_comic_detail};
use crate::facets::{FacetSet, FacetToken, SortOption, init_categories};
use crate::fetch::HttpClient;
use crate::item::{ItemVariant, PageResult, Section, is_slug_id};
use crate::listing::{LISTING_CARDS, parse_card_page, parse_homepage};
use crate::reader::{ChapterImages, image_headers, parse_chapter_images, reader_path};
use crate::{Result, SourceError};

/// Homepage path for a page number.
pub fn homepage_path(page: u32) -> String {
    if page <= 1 { "/".to_string() } else { format!("/page/{}/", page) }
}

/// Detail page path for a slug-id.
///
/// # Errors
///
/// An id that is not a bare slug-id fails with [`SourceError::InvalidUrl`].
pub fn detail_path(id: &str) -> Result<String> {
    if !is_slug_id(id) {
        return Err(SourceError::InvalidUrl(format!("{:?} is not a comic id", id)));
    }
    Ok(format!("/{}.html", id))
}

/// Search results URL, with the keyword encoded as a single path segment.
pub fn search_url(base: &Url, keyword: &str, page: u32) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| SourceError::InvalidUrl(format!("{} cannot carry a path", base)))?
        .clear()
        .push("search")
        .push(keyword.trim())
        .push("page")
        .push(&page.max(1).to_string())
        .push("");
    Ok(url)
}

/// Read-only access to listings, details and chapters.
#[derive(Debug, Clone)]
pub struct CatalogReader {
    http: Arc<HttpClient>,
}

impl CatalogReader {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Homepage sections for `page` (1-based).
    pub async fn homepage(&self, page: u32) -> Result<Vec<Section>> {
        let response = self.http.get(&homepage_path(page)).await?.ensure_success()?;
        parse_homepage(&response.body, page, self.http.base_url())
    }

    /// Loads the category facets. See [`init_categories`].
    pub async fn init_categories(&self) -> FacetSet {
        init_categories(&self.http).await
    }

    /// One page of a category listing.
    ///
    /// # Errors
    ///
    /// A malformed `token` fails with [`SourceError::InvalidFacetToken`]
    /// before any request is made.
    pub async fn category(&self, token: &str, sort: Option<SortOption>, page: u32) -> Result<PageResult> {
        let token = FacetToken::parse(token)?;
        let response = self.http.get(&token.path(sort, page)).await?.ensure_success()?;
        parse_card_page(&response.body, LISTING_CARDS, ItemVariant::ListingCard, self.http.base_url())
    }

    /// One page of keyword search results.
    pub async fn search(&self, keyword: &str, page: u32) -> Result<PageResult> {
        let url = search_url(self.http.base_url(), keyword, page)?;
        let response = self.http.get(url.as_str()).await?.ensure_success()?;
        parse_card_page(&response.body, LISTING_CARDS, ItemVariant::SearchCard, self.http.base_url())
    }

    /// Full detail record for a slug-id.
    ///
    /// A malformed id fails before any request is made.
    pub async fn comic_detail(&self, id: &str) -> Result<ComicDetail> {
        let path = detail_path(id)?;
        let response = self.http.get(&path).await?.ensure_success()?;
        parse_comic_detail(&response.body, id, self.http.base_url())
    }

    /// Image URLs of one chapter plus the headers the image host requires.
    ///
    /// Malformed ids fail before any request is made.
    pub async fn chapter_images(&self, comic_id: &str, chapter_id: &str) -> Result<ChapterImages> {
        let path = reader_path(comic_id, chapter_id)?;
        let headers = image_headers(self.http.base_url(), &path);
        let response = self.http.get(&path).await?.ensure_success()?;
        let images = parse_chapter_images(&response.body, self.http.base_url());
        if images.is_empty() {
            tracing::warn!(comic_id, chapter_id, "reader page carried no images");
        }
        Ok(ChapterImages { images, headers })
    }
}
