// ABOUTME: Catalog index extractors: alphabetical show index and per-show menus.
// ABOUTME: Pure extraction over fetched pages; output is plain record types.

use once_cell::sync::Lazy;
use scraper::Selector;
use tracing::debug;

use crate::client::Client;
use crate::error::ScrapeError;
use crate::models::{LetterGroup, MenuEntry, ShowLink};
use crate::select::first_text;

/// Path of the "all shows" index page.
const SHOWS_INDEX_PATH: &str = "/shows?all";

static ARCHIVE_SECTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section.archive").unwrap());
static LETTER_CARD: Lazy<Selector> = Lazy::new(|| Selector::parse("div.card").unwrap());
static CARD_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static MENU_BLOCK: Lazy<Selector> = Lazy::new(|| Selector::parse("div.menu").unwrap());
static MENU_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("ul > li > a").unwrap());

/// Fetches the show index and extracts its letter groups.
///
/// Each card in the archive section yields the group letter (trimmed,
/// upper-cased) and the ordered (href, label) pairs inside it. Document
/// order is preserved; duplicate letters across cards are not merged.
pub fn list_shows_by_letter(client: &Client) -> Result<Vec<LetterGroup>, ScrapeError> {
    let url = client.absolute(SHOWS_INDEX_PATH)?;
    let doc = client.get_html(url.as_str())?;

    let archive = doc
        .root_element()
        .select(&ARCHIVE_SECTION)
        .next()
        .ok_or_else(|| {
            ScrapeError::extract(
                url.as_str(),
                "ListShows",
                Some(anyhow::anyhow!("archive section not found")),
            )
        })?;

    let mut groups = Vec::new();
    for card in archive.select(&LETTER_CARD) {
        let letter = first_text(card, &["div.letter"]).to_uppercase();
        let shows: Vec<ShowLink> = card
            .select(&CARD_LINK)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                Some(ShowLink {
                    href: href.to_string(),
                    label: a.text().collect::<String>().trim().to_string(),
                })
            })
            .collect();
        groups.push(LetterGroup { letter, shows });
    }

    debug!(url = %url, groups = groups.len(), "extracted show index");
    Ok(groups)
}

/// Fetches a show's page and extracts its menu entries.
///
/// The menu block lists category/album links as `ul > li > a`; labels come
/// from the nested `span` element's trimmed text.
pub fn list_show_menu(client: &Client, show_url: &str) -> Result<Vec<MenuEntry>, ScrapeError> {
    let url = client.absolute(show_url)?;
    let doc = client.get_html(url.as_str())?;

    let menu = doc
        .root_element()
        .select(&MENU_BLOCK)
        .next()
        .ok_or_else(|| {
            ScrapeError::extract(
                url.as_str(),
                "ListShowMenu",
                Some(anyhow::anyhow!("menu block not found")),
            )
        })?;

    let entries: Vec<MenuEntry> = menu
        .select(&MENU_LINK)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            Some(MenuEntry {
                href: href.to_string(),
                label: first_text(a, &["span"]),
            })
        })
        .collect();

    debug!(url = %url, entries = entries.len(), "extracted show menu");
    Ok(entries)
}
