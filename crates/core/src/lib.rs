//! Structured extraction for the batcave.biz comic catalog.
//!
//! The pure extraction layer turns page bodies into records: [`listing`] for
//! homepage sections and card grids, [`detail`] for comic pages, [`reader`]
//! for chapter images and [`facets`] for catalog filters. With the default
//! `fetch` feature, [`BatCave`] composes those with an HTTP client into the
//! catalog, session and favorites capabilities.
//!
//! ```rust
//! use batcave_core::listing::parse_homepage;
//! use url::Url;
//!
//! let html = r#"<div id="owl-carou">
//!     <a class="poster grid-item" href="/6975-invincible-2003.html">
//!         <div class="poster__img"><img data-src="/uploads/posts/invincible.jpg"></div>
//!         <p class="poster__title">Invincible</p>
//!     </a>
//! </div>"#;
//! let sections = parse_homepage(html, 1, &Url::parse("https://batcave.biz").unwrap()).unwrap();
//! assert_eq!(sections[0].items[0].id, "6975-invincible-2003");
//! ```

pub mod detail;
pub mod embedded;
pub mod error;
pub mod facets;
pub mod favorites;
pub mod item;
pub mod links;
pub mod listing;
pub mod pagination;
pub mod parse;
pub mod reader;
pub mod session;

#[cfg(feature = "fetch")]
pub mod catalog;
#[cfg(feature = "fetch")]
pub mod fetch;
#[cfg(feature = "fetch")]
pub mod source;

pub use detail::{Chapter, ComicDetail, TagTable, parse_comic_detail};
pub use embedded::{extract_blob, extract_blob_as};
pub use error::{Result, SourceError};
pub use facets::{CategoryFacet, FacetFailure, FacetSet, FacetToken, SortOption};
pub use favorites::{FavoriteFolder, FolderList};
pub use item::{Item, ItemVariant, PageResult, Section};
pub use links::{TagAction, link_to_id, tag_action};
pub use listing::{parse_card_page, parse_homepage};
pub use parse::{Document, Element};
pub use reader::ChapterImages;
pub use session::LoginOutcome;

#[cfg(feature = "fetch")]
pub use catalog::CatalogReader;
#[cfg(feature = "fetch")]
pub use facets::init_categories;
#[cfg(feature = "fetch")]
pub use favorites::FavoritesReader;
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, FetchedPage, HttpClient};
#[cfg(feature = "fetch")]
pub use session::SessionManager;
#[cfg(feature = "fetch")]
pub use source::{BatCave, SourceConfig, SourceConfigBuilder};
