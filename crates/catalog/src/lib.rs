// ABOUTME: Main library entry point for the efir catalog scraper.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, record types, extractors, and ScrapeError.

//! efir-catalog - a catalog scraper for the Channel One website.
//!
//! This crate fetches pages from www.1tv.ru and extracts the catalog
//! hierarchy: the alphabetical show index, per-show menus, paginated
//! episode listings, and finally a playable video URL per episode. All
//! operations are synchronous and return plain records; rendering and
//! routing belong to the consumer.
//!
//! # Example
//!
//! ```no_run
//! use efir_catalog::{list_shows_by_letter, Client, ScrapeError};
//!
//! fn main() -> Result<(), ScrapeError> {
//!     let client = Client::builder().build()?;
//!     for group in list_shows_by_letter(&client)? {
//!         println!("{}: {} shows", group.letter, group.shows.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod client;
pub mod date_parse;
pub mod duration_parse;
pub mod error;
pub mod listing;
pub mod models;
pub mod options;
pub mod playlist;
pub mod select;

pub use crate::catalog::{list_show_menu, list_shows_by_letter};
pub use crate::client::{Client, FetchResult};
pub use crate::date_parse::parse_flexible_date;
pub use crate::duration_parse::parse_duration_seconds;
pub use crate::error::{ErrorCode, ScrapeError};
pub use crate::listing::fetch_listing;
pub use crate::models::{
    EpisodeRecord, LetterGroup, ListingPage, MenuEntry, ShowLink, VideoTarget,
};
pub use crate::options::{ClientBuilder, Options};
pub use crate::playlist::{resolve_video, ExternalResolver, PlaylistEntry, PlaylistSource};
