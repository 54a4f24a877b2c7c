//! Chapter reader pages.
//!
//! Image URLs come from the `images` list of the reader page's `__DATA__`
//! payload. The image host rejects requests without a `Referer` pointing at
//! the reader page, so every [`ChapterImages`] carries the headers the host
//! must send with each image request.

use serde::Serialize;
use url::Url;

use crate::embedded::{DATA_BLOB, PageDataBlob, extract_blob_as};
use crate::item::{is_slug_id, numeric_prefix, qualify_url};
use crate::{Result, SourceError};

/// Images of one chapter, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterImages {
    pub images: Vec<String>,
    /// Headers to send with every image request.
    pub headers: Vec<(String, String)>,
}

/// Reader path for a chapter. Accepts either a slug-id or a bare numeric id.
///
/// # Errors
///
/// Both ids must reduce to digits; anything else fails with
/// [`SourceError::InvalidUrl`].
pub fn reader_path(comic_id: &str, chapter_id: &str) -> Result<String> {
    let news_id = numeric_prefix(comic_id);
    if !is_digits(news_id) || (comic_id != news_id && !is_slug_id(comic_id)) {
        return Err(SourceError::InvalidUrl(format!("{:?} is not a comic id", comic_id)));
    }
    if !is_digits(chapter_id) {
        return Err(SourceError::InvalidUrl(format!("{:?} is not a chapter id", chapter_id)));
    }
    Ok(format!("/reader/{}/{}", news_id, chapter_id))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Headers required when fetching an image from the reader page at `path`.
pub fn image_headers(base: &Url, path: &str) -> Vec<(String, String)> {
    let referer = match base.join(path) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", base.origin().ascii_serialization(), path),
    };
    vec![("Referer".to_string(), referer)]
}

/// Extracts the ordered, absolute image URLs from a reader page body.
///
/// A page without the payload yields an empty list.
pub fn parse_chapter_images(html: &str, base: &Url) -> Vec<String> {
    let data: Option<PageDataBlob> = extract_blob_as(html, DATA_BLOB);
    data.and_then(|d| d.images)
        .unwrap_or_default()
        .iter()
        .filter_map(|path| qualify_url(base, path))
        .collect()
}
