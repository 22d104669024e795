// ABOUTME: Ordered-fallback selector helpers used by all extractors.
// ABOUTME: Selectors are tried strictly in order; first match wins, empty string means field unknown.

use scraper::{ElementRef, Selector};

/// Returns the first descendant of `scope` matching any of the selectors.
///
/// Selectors are tried strictly in the given order; the first one with a
/// match wins and later selectors are never consulted. Invalid selector
/// strings are skipped.
pub fn find_first<'a>(scope: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    for css in selectors {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(element) = scope.select(&selector).next() {
            return Some(element);
        }
    }
    None
}

/// Resolves a node via `find_first` and returns its flattened text.
///
/// The result is the concatenation of every descendant text node in document
/// order, trimmed. Returns an empty string when nothing matches: callers
/// treat empty as "field unknown", never as an error.
pub fn first_text(scope: ElementRef<'_>, selectors: &[&str]) -> String {
    match find_first(scope, selectors) {
        Some(element) => element.text().collect::<String>().trim().to_string(),
        None => String::new(),
    }
}

/// Returns the first listed attribute present on the first element matching
/// `selector` under `scope`.
///
/// Attribute names are tried in order on that one element; presence wins
/// even when the value is empty, matching how the site marks lazy-loaded
/// images (a present-but-primary attribute takes precedence).
pub fn first_attr(scope: ElementRef<'_>, selector: &str, attrs: &[&str]) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = scope.select(&selector).next()?;
    for name in attrs {
        if let Some(value) = element.value().attr(name) {
            return Some(value.to_string());
        }
    }
    None
}
