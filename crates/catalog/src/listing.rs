// ABOUTME: Episode listing extractor and paginator, the core of the scraper.
// ABOUTME: Detects the response regime (HTML vs JS-wrapped HTML), extracts cards, resolves the next-page cursor.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::client::Client;
use crate::duration_parse::parse_duration_seconds;
use crate::error::ScrapeError;
use crate::models::{EpisodeRecord, ListingPage};
use crate::select::{first_attr, first_text};

/// Localized label of the "show more" element carrying the next-page URL.
const SHOW_MORE_LABEL: &str = "Показать еще";

/// Title fallbacks, first non-empty wins.
const TITLE_SELECTORS: &[&str] = &["h3", "div.title"];
/// Description fallbacks.
const DESCRIPTION_SELECTORS: &[&str] = &["div.itv-index-card__text", "div.lead"];
/// Duration field.
const DURATION_SELECTORS: &[&str] = &["div.length"];
/// Cover image attributes, primary source first, then the lazy-load attribute.
const COVER_ATTRS: &[&str] = &["src", "data-src"];

static CARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[data-id][data-role="content_modal"]"#).unwrap());
static ANY_ELEMENT: Lazy<Selector> = Lazy::new(|| Selector::parse("*").unwrap());

/// Matches the JS statement assigning escaped HTML to `collection_items`.
static COLLECTION_ITEMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"collection_items\s*=\s*.*?'<(.+)>'").unwrap());

/// Matches the `'data-url', '<url>'` attribute pair embedded in the JS body.
/// The regex crate has no backreferences, so both quote styles are spelled out.
static JS_DATA_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["']data-url["'],\s*(?:'([^']+)'|"([^"]+)")"#).unwrap());

/// Fetches one page of an episode listing and resolves the next-page cursor.
///
/// When the request URL carries both `limit` and `offset`, the fetch
/// transparently asks for `limit + 1` items to probe for a further page,
/// and the returned items are truncated back to `limit`. Without that pair
/// the cursor comes from the page itself (the "show more" element in the
/// HTML regime, the `data-url` pair in the JS regime).
pub fn fetch_listing(client: &Client, url: &str) -> Result<ListingPage, ScrapeError> {
    let requested = client.absolute(url)?;
    let paging = read_paging(&requested);

    let fetch_url = match paging {
        Some((limit, _)) => with_query_param(&requested, "limit", limit + 1),
        None => requested.clone(),
    };

    let resp = client.get(fetch_url.as_str())?;
    let content_type = resp.content_type.clone().ok_or_else(|| {
        ScrapeError::content_type(
            requested.as_str(),
            "FetchListing",
            Some(anyhow::anyhow!("response has no content-type header")),
        )
    })?;

    let body = resp.text();

    let (doc, js_code) = if is_script_content_type(&content_type) {
        match embedded_fragment(&body) {
            Some(html) => (Html::parse_fragment(&html), Some(body)),
            None => {
                // Graceful empty: a JS body without the expected assignment
                // yields no items and no cursor, not an error.
                debug!(url = %requested, "collection_items pattern not found in JS response");
                return Ok(ListingPage::default());
            }
        }
    } else {
        (Html::parse_document(&body), None)
    };

    let root = doc.root_element();
    let mut items = collect_cards(client, root);

    let next_url = match paging {
        Some((limit, offset)) => {
            let limit = limit as usize;
            let has_more = items.len() > limit;
            items.truncate(limit);
            if has_more {
                Some(with_query_param(&requested, "offset", (offset as usize + limit) as u32).to_string())
            } else {
                None
            }
        }
        None => match &js_code {
            Some(code) => js_next_url(code),
            None => show_more_url(root),
        },
    };

    debug!(url = %requested, items = items.len(), next = next_url.as_deref().unwrap_or("-"), "extracted listing page");
    Ok(ListingPage { items, next_url })
}

/// Reads the `limit`/`offset` pair from a request URL; both must be present.
fn read_paging(url: &Url) -> Option<(u32, u32)> {
    let mut limit = None;
    let mut offset = None;
    for (k, v) in url.query_pairs() {
        match k.as_ref() {
            "limit" => limit = v.parse().ok(),
            "offset" => offset = v.parse().ok(),
            _ => {}
        }
    }
    Some((limit?, offset?))
}

/// Returns a copy of the URL with one query parameter replaced, preserving
/// the order and value of every other pair.
fn with_query_param(url: &Url, key: &str, value: u32) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut out = url.clone();
    {
        let mut query = out.query_pairs_mut();
        query.clear();
        for (k, v) in &pairs {
            if k == key {
                query.append_pair(k, &value.to_string());
            } else {
                query.append_pair(k, v);
            }
        }
    }
    out
}

fn is_script_content_type(content_type: &str) -> bool {
    let ct = content_type.trim().to_ascii_lowercase();
    ct.starts_with("text/javascript") || ct.starts_with("application/javascript")
}

/// Recovers the escaped HTML fragment from a `collection_items = '...'`
/// assignment, with literal backslash escapes removed.
fn embedded_fragment(code: &str) -> Option<String> {
    let caps = COLLECTION_ITEMS_RE.captures(code)?;
    Some(format!("<{}>", caps[1].replace('\\', "")))
}

/// Finds the next-page URL embedded in a JS response body.
fn js_next_url(code: &str) -> Option<String> {
    let caps = JS_DATA_URL_RE.captures(code)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    Some(unescape_entities(raw))
}

/// Finds the "show more" element in an HTML fragment and reads its next-page
/// URL. Missing element or attribute degrades to "no next page".
fn show_more_url(root: ElementRef<'_>) -> Option<String> {
    for element in root.select(&ANY_ELEMENT) {
        if element.text().collect::<String>().trim() != SHOW_MORE_LABEL {
            continue;
        }
        if let Some(url) = element.value().attr("data-url") {
            if !url.is_empty() {
                return Some(url.to_string());
            }
        }
    }
    None
}

/// Decodes the named and numeric entities seen in attribute values the site
/// embeds inside JS strings (most importantly `&amp;` in query strings).
fn unescape_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Extracts every collection item card under `root` into episode records.
fn collect_cards(client: &Client, root: ElementRef<'_>) -> Vec<EpisodeRecord> {
    root.select(&CARD)
        .filter_map(|card| {
            // The selector guarantees data-id is present.
            let id = card.value().attr("data-id")?.to_string();

            let href = card.value().attr("href").unwrap_or_default();
            let source_url = client
                .absolute(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string());

            let cover_url = first_attr(card, "img", COVER_ATTRS)
                .and_then(|src| client.absolute(&src).ok())
                .map(|u| u.to_string())
                .unwrap_or_default();

            Some(EpisodeRecord {
                id,
                source_url,
                title: first_text(card, TITLE_SELECTORS),
                description: first_text(card, DESCRIPTION_SELECTORS),
                duration_seconds: parse_duration_seconds(&first_text(card, DURATION_SELECTORS)),
                cover_url,
            })
        })
        .collect()
}
