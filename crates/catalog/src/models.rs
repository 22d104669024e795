// ABOUTME: Plain record types produced by the catalog extractors.
// ABOUTME: All records are transient, serializable, and carry no host-framework types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pointer into the catalog: one show link under a letter group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowLink {
    pub href: String,
    pub label: String,
}

/// One letter of the alphabetical show index with its links.
///
/// Groups come out in site document order; letters are neither deduplicated
/// nor sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LetterGroup {
    pub letter: String,
    pub shows: Vec<ShowLink>,
}

/// A category/album link in a show's menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub href: String,
    pub label: String,
}

/// One episode card from a listing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub id: String,
    pub source_url: String,
    pub title: String,
    pub description: String,
    pub duration_seconds: Option<u32>,
    /// Absolutized at extraction time; empty when the card has no usable image.
    pub cover_url: String,
}

/// One page of a listing plus the cursor to the next one, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingPage {
    pub items: Vec<EpisodeRecord>,
    pub next_url: Option<String>,
}

/// Terminal playback record, recomputed on every request and never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoTarget {
    pub title: String,
    pub play_url: String,
    pub air_date: Option<DateTime<Utc>>,
}
