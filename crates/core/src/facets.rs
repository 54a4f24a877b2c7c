//! Catalog facets, category tokens and sort options.
//!
//! Facets are read once from the `__XFILTER__` payload of the catalog page.
//! [`FacetSet`] is the explicit result of that one-shot initialization; the
//! host keeps it and hands tokens from it to category listings. Loading never
//! fails outright: any problem yields a single sentinel facet instead.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::embedded::{FILTER_BLOB, FilterBlob, extract_blob_as};
use crate::{Result, SourceError};

/// Path of the catalog page carrying the facet definitions.
pub const CATALOG_PATH: &str = "/comix/";

/// Facet keys read from the payload, with their fallback display names.
const FACET_KEYS: [(&str, &str); 2] = [("p", "Publisher"), ("g", "Genres")];

/// Token carried by every sentinel facet value.
pub const SENTINEL_PARAM: &str = "error";

/// How a facet's values are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    /// A fixed list of selectable values.
    Fixed,
}

/// A filterable dimension of the catalog.
///
/// `value_labels` and `value_params` are parallel: `value_params[i]` is the
/// category token for `value_labels[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFacet {
    pub name: String,
    pub kind: FacetKind,
    pub value_labels: Vec<String>,
    pub value_params: Vec<String>,
}

/// Why facet initialization fell back to the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetFailure {
    /// The payload was missing, malformed or had no known facets.
    LoadFailed,
    /// The catalog page answered with a non-success status.
    HttpError(u16),
    /// The request itself failed.
    Exception(String),
}

impl FacetFailure {
    /// The placeholder facet shown instead of real data.
    pub fn sentinel(&self) -> CategoryFacet {
        let (name, value) = match self {
            Self::LoadFailed => ("Categories failed to load".to_string(), "No data".to_string()),
            Self::HttpError(status) => ("Categories failed to load (HTTP error)".to_string(), format!("Error code: {}", status)),
            Self::Exception(_) => ("Categories failed to load (exception)".to_string(), "Check the network or the source".to_string()),
        };
        CategoryFacet { name, kind: FacetKind::Fixed, value_labels: vec![value], value_params: vec![SENTINEL_PARAM.to_string()] }
    }
}

impl fmt::Display for FacetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadFailed => write!(f, "facet payload missing or malformed"),
            Self::HttpError(status) => write!(f, "catalog page returned HTTP {}", status),
            Self::Exception(cause) => write!(f, "catalog request failed: {}", cause),
        }
    }
}

/// Result of facet initialization. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetSet {
    pub facets: Vec<CategoryFacet>,
    #[serde(skip)]
    pub failure: Option<FacetFailure>,
}

impl FacetSet {
    /// Builds facets from the catalog page body, falling back to the sentinel.
    pub fn from_html(html: &str) -> Self {
        match parse_facets(html) {
            Ok(facets) => Self { facets, failure: None },
            Err(failure) => Self::from_failure(failure),
        }
    }

    /// A set holding only the sentinel facet for `failure`.
    pub fn from_failure(failure: FacetFailure) -> Self {
        tracing::warn!(%failure, "using sentinel category facet");
        Self { facets: vec![failure.sentinel()], failure: Some(failure) }
    }

    /// True when the set holds the sentinel instead of real facets.
    pub fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }
}

/// Parses the publisher and genre facets out of the `__XFILTER__` payload.
pub fn parse_facets(html: &str) -> std::result::Result<Vec<CategoryFacet>, FacetFailure> {
    let blob: FilterBlob = extract_blob_as(html, FILTER_BLOB).ok_or(FacetFailure::LoadFailed)?;
    if blob.filter_items.is_none() {
        return Err(FacetFailure::LoadFailed);
    }

    let facets: Vec<CategoryFacet> = FACET_KEYS
        .iter()
        .filter_map(|(key, default_name)| {
            let item = blob.facet(key)?;
            Some(CategoryFacet {
                name: item.title.filter(|t| !t.trim().is_empty()).unwrap_or_else(|| default_name.to_string()),
                kind: FacetKind::Fixed,
                value_labels: item.values.iter().map(|v| v.value.clone()).collect(),
                value_params: item.values.iter().map(|v| format!("{}_{}", key, v.id)).collect(),
            })
        })
        .collect();

    if facets.is_empty() { Err(FacetFailure::LoadFailed) } else { Ok(facets) }
}

/// A category token of the form `<facetKey>_<numericId>`, e.g. `g_14`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetToken {
    pub key: String,
    pub id: String,
}

impl FacetToken {
    /// Validates and splits a token.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidFacetToken`] unless the token is an
    /// alphanumeric key and a numeric id joined by `_`.
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = || SourceError::InvalidFacetToken(token.to_string());
        let (key, id) = token.split_once('_').ok_or_else(invalid)?;

        let key_ok = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric());
        let id_ok = !id.is_empty() && id.chars().all(|c| c.is_ascii_digit());
        if !key_ok || !id_ok {
            return Err(invalid());
        }

        Ok(Self { key: key.to_string(), id: id.to_string() })
    }

    /// Request path for one page of this category.
    pub fn path(&self, sort: Option<SortOption>, page: u32) -> String {
        let mut path = format!("/xfsearch/{}/{}/page/{}/", self.key, self.id, page.max(1));
        if let Some(sort) = sort {
            path.push_str(&sort.query());
        }
        path
    }
}

impl FromStr for FacetToken {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FacetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.key, self.id)
    }
}

/// Sort orders accepted by category listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortOption {
    DateDesc,
    DateAsc,
    EditDateDesc,
    RatingDesc,
    ReadsDesc,
    CommentsDesc,
    TitleAsc,
    TitleDesc,
}

impl SortOption {
    /// Every option, in display order.
    pub const ALL: [SortOption; 8] = [
        Self::DateDesc,
        Self::DateAsc,
        Self::EditDateDesc,
        Self::RatingDesc,
        Self::ReadsDesc,
        Self::CommentsDesc,
        Self::TitleAsc,
        Self::TitleDesc,
    ];

    /// Machine key, `<field>_<direction>`.
    pub fn key(self) -> &'static str {
        match self {
            Self::DateDesc => "date_desc",
            Self::DateAsc => "date_asc",
            Self::EditDateDesc => "editdate_desc",
            Self::RatingDesc => "rating_desc",
            Self::ReadsDesc => "news_read_desc",
            Self::CommentsDesc => "comm_num_desc",
            Self::TitleAsc => "title_asc",
            Self::TitleDesc => "title_desc",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::DateDesc => "Date (newest)",
            Self::DateAsc => "Date (oldest)",
            Self::EditDateDesc => "Last updated",
            Self::RatingDesc => "Rating",
            Self::ReadsDesc => "Views",
            Self::CommentsDesc => "Comments",
            Self::TitleAsc => "Title (A-Z)",
            Self::TitleDesc => "Title (Z-A)",
        }
    }

    /// Query string selecting this order, including the leading `?`.
    pub fn query(self) -> String {
        let (field, direction) = self.key().rsplit_once('_').unwrap_or((self.key(), "desc"));
        format!("?dlenewssortby={}&dledirection={}", field, direction.to_uppercase())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|o| o.key() == s).ok_or_else(|| {
            let keys: Vec<&str> = Self::ALL.iter().map(|o| o.key()).collect();
            format!("Invalid sort option: {}. Valid options: {}", s, keys.join(", "))
        })
    }
}

/// Loads the catalog page and builds the facet set.
///
/// Never fails: a bad status, a failed request or an unusable payload each
/// produce the matching sentinel facet.
#[cfg(feature = "fetch")]
pub async fn init_categories(http: &crate::fetch::HttpClient) -> FacetSet {
    match http.get(CATALOG_PATH).await {
        Ok(page) if page.is_success() => FacetSet::from_html(&page.body),
        Ok(page) => FacetSet::from_failure(FacetFailure::HttpError(page.status)),
        Err(e) => FacetSet::from_failure(FacetFailure::Exception(e.to_string())),
    }
}
