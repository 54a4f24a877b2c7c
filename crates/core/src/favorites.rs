//! Favorites folders.
//!
//! The site keeps a fixed set of seven bookmark folders per account. Listing
//! a folder's comics is supported; mutating folders or their contents is not,
//! and those calls fail with [`SourceError::Unsupported`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[cfg(feature = "fetch")]
use std::sync::Arc;

#[cfg(feature = "fetch")]
use crate::{Result, SourceError};
#[cfg(feature = "fetch")]
use crate::fetch::HttpClient;
#[cfg(feature = "fetch")]
use crate::item::{ItemVariant, PageResult};
#[cfg(feature = "fetch")]
use crate::listing::{FAVORITE_CARDS, parse_card_page};

/// The site's bookmark folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteFolder {
    Reading,
    Later,
    Readed,
    Delayed,
    Dropped,
    Disliked,
    Liked,
}

impl FavoriteFolder {
    pub const ALL: [FavoriteFolder; 7] =
        [Self::Reading, Self::Later, Self::Readed, Self::Delayed, Self::Dropped, Self::Disliked, Self::Liked];

    /// Path segment used by the site, e.g. `reading`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Reading => "reading",
            Self::Later => "later",
            Self::Readed => "readed",
            Self::Delayed => "delayed",
            Self::Dropped => "dropped",
            Self::Disliked => "disliked",
            Self::Liked => "liked",
        }
    }

    /// Numeric folder id used by the site's scripts.
    pub fn id(self) -> u8 {
        match self {
            Self::Reading => 1,
            Self::Later => 2,
            Self::Readed => 3,
            Self::Delayed => 4,
            Self::Dropped => 5,
            Self::Disliked => 6,
            Self::Liked => 7,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Reading => "Reading",
            Self::Later => "Read later",
            Self::Readed => "Finished",
            Self::Delayed => "On hold",
            Self::Dropped => "Dropped",
            Self::Disliked => "Disliked",
            Self::Liked => "Favourite",
        }
    }

    /// Listing path for one page of this folder.
    pub fn path(self, page: u32) -> String {
        format!("/favorites/{}/page/{}/", self.key(), page.max(1))
    }
}

impl FromStr for FavoriteFolder {
    type Err = String;

    /// Accepts the folder key or its numeric id.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(s) || f.id().to_string() == s)
            .ok_or_else(|| format!("Unknown favorites folder: {}", s))
    }
}

impl fmt::Display for FavoriteFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Folder overview for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderList {
    /// `(key, title)` pairs in site order.
    pub folders: Vec<(String, String)>,
    /// Folders known to contain the comic. Always empty: the site exposes
    /// per-comic folder state only through scripts on the comic's own page.
    pub favorited: Vec<String>,
}

/// The fixed folder taxonomy.
pub fn folder_list() -> FolderList {
    FolderList {
        folders: FavoriteFolder::ALL
            .iter()
            .map(|f| (f.key().to_string(), f.title().to_string()))
            .collect(),
        favorited: Vec::new(),
    }
}

/// Read access to the logged-in account's favorites.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct FavoritesReader {
    http: Arc<HttpClient>,
}

#[cfg(feature = "fetch")]
impl FavoritesReader {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// One page of comics in a folder. Requires a logged-in session.
    pub async fn list(&self, folder: FavoriteFolder, page: u32) -> Result<PageResult> {
        let response = self.http.get(&folder.path(page)).await?.ensure_success()?;
        parse_card_page(&response.body, FAVORITE_CARDS, ItemVariant::FavoriteCard, self.http.base_url())
    }

    /// The folder taxonomy. The comic id is accepted for interface parity but not consulted.
    pub fn list_folders(&self, _comic_id: Option<&str>) -> FolderList {
        folder_list()
    }

    pub async fn add_or_remove(&self, _comic_id: &str, _folder: FavoriteFolder, _adding: bool) -> Result<()> {
        Err(SourceError::Unsupported("favorites.add_or_remove"))
    }

    pub async fn add_folder(&self, _name: &str) -> Result<()> {
        Err(SourceError::Unsupported("favorites.add_folder"))
    }

    pub async fn delete_folder(&self, _folder: FavoriteFolder) -> Result<()> {
        Err(SourceError::Unsupported("favorites.delete_folder"))
    }
}
