// ABOUTME: Integration tests for the episode listing extractor and paginator against a mock server.
// ABOUTME: Covers the limit/offset probe, the show-more cursor, and both JS-regime behaviors.

use efir_catalog::{fetch_listing, Client};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.base_url())
        .build()
        .unwrap()
}

fn card(id: u32) -> String {
    format!(
        r#"<a data-id="{id}" data-role="content_modal" href="/shows/x/vypuski/{id}">
            <img data-src="/images/{id}.jpg">
            <h3>Выпуск {id}</h3>
            <div class="itv-index-card__text">Описание выпуска {id}</div>
            <div class="length">44:05</div>
        </a>"#
    )
}

fn listing_html(ids: &[u32]) -> String {
    let cards: String = ids.iter().map(|id| card(*id)).collect();
    format!("<div class=\"collection\">{}</div>", cards)
}

#[test]
fn offset_regime_probes_one_extra_and_advances_offset() {
    let server = MockServer::start();
    // limit=2 requested; the fetch must transparently ask for limit=3.
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/collections/5/items")
            .query_param("limit", "3")
            .query_param("offset", "0");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(listing_html(&[1, 2, 3]));
    });

    let url = format!("{}/collections/5/items?limit=2&offset=0", server.base_url());
    let page = fetch_listing(&client_for(&server), &url).unwrap();

    mock.assert();
    assert_eq!(page.items.len(), 2, "items must be truncated to the original limit");
    assert_eq!(page.items[0].id, "1");
    assert_eq!(page.items[1].id, "2");
    assert_eq!(
        page.next_url.as_deref(),
        Some(format!("{}/collections/5/items?limit=2&offset=2", server.base_url()).as_str())
    );
}

#[test]
fn offset_regime_without_probe_item_has_no_next_page() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/collections/5/items")
            .query_param("limit", "3")
            .query_param("offset", "0");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(listing_html(&[1, 2]));
    });

    let url = format!("{}/collections/5/items?limit=2&offset=0", server.base_url());
    let page = fetch_listing(&client_for(&server), &url).unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.next_url, None);
}

#[test]
fn offset_regime_walk_visits_every_item_once() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/collections/5/items")
            .query_param("limit", "3")
            .query_param("offset", "0");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(listing_html(&[1, 2, 3]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/collections/5/items")
            .query_param("limit", "3")
            .query_param("offset", "2");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(listing_html(&[3]));
    });

    let client = client_for(&server);
    let mut url = format!("{}/collections/5/items?limit=2&offset=0", server.base_url());
    let mut seen = Vec::new();
    loop {
        let page = fetch_listing(&client, &url).unwrap();
        seen.extend(page.items.into_iter().map(|i| i.id));
        match page.next_url {
            Some(next) => url = next,
            None => break,
        }
    }

    assert_eq!(seen, vec!["1", "2", "3"]);
}

#[test]
fn show_more_regime_reads_cursor_from_element() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/shows/x/vypuski");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(format!(
                r#"<html><body>{}
                <div class="show-more" data-url="/collections/5/items?limit=12&offset=12">Показать еще</div>
                </body></html>"#,
                listing_html(&[1, 2])
            ));
    });

    let url = format!("{}/shows/x/vypuski", server.base_url());
    let page = fetch_listing(&client_for(&server), &url).unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(
        page.next_url.as_deref(),
        Some("/collections/5/items?limit=12&offset=12")
    );
}

#[test]
fn show_more_regime_without_element_has_no_next_page() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/shows/x/vypuski");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(listing_html(&[1, 2, 3]));
    });

    let url = format!("{}/shows/x/vypuski", server.base_url());
    let page = fetch_listing(&client_for(&server), &url).unwrap();

    assert_eq!(page.items.len(), 3);
    assert_eq!(page.next_url, None);
}

#[test]
fn extracted_fields_use_fallbacks_and_absolute_urls() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/shows/x/vypuski");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(
                r#"<html><body>
                <a data-id="77" data-role="content_modal" href="/shows/x/vypuski/77">
                    <img data-src="/images/77.jpg">
                    <div class="title">Заголовок из фолбэка</div>
                    <div class="lead">Описание из фолбэка</div>
                    <div class="length"></div>
                </a>
                <a data-role="content_modal" href="/shows/x/vypuski/na">
                    <h3>Без идентификатора</h3>
                </a>
                </body></html>"#,
            );
    });

    let url = format!("{}/shows/x/vypuski", server.base_url());
    let page = fetch_listing(&client_for(&server), &url).unwrap();

    // The card without data-id is not a collection item card.
    assert_eq!(page.items.len(), 1);
    let item = &page.items[0];
    assert_eq!(item.id, "77");
    assert_eq!(item.title, "Заголовок из фолбэка");
    assert_eq!(item.description, "Описание из фолбэка");
    assert_eq!(item.duration_seconds, None);
    assert_eq!(
        item.source_url,
        format!("{}/shows/x/vypuski/77", server.base_url())
    );
    // Lazy-load attribute is the only one set, and it must be absolutized.
    assert_eq!(item.cover_url, format!("{}/images/77.jpg", server.base_url()));
}

#[test]
fn js_regime_recovers_fragment_and_cursor() {
    let server = MockServer::start();
    let body = concat!(
        r#"collection_items = '<div class=\'collection\'>"#,
        r#"<a data-id=\'8\' data-role=\'content_modal\' href=\'/shows/x/vypuski/8\'>"#,
        r#"<img src=\'/images/8.jpg\'><h3>Выпуск 8</h3><div class=\'length\'>1:02:05</div></a>"#,
        r#"</div>';"#,
        "\n",
        r#"$('.show-more').attr('data-url', '/collections/5/items?limit=12&amp;offset=24');"#,
    );
    server.mock(|when, then| {
        when.method(GET).path("/collections/5/items");
        then.status(200)
            .header("content-type", "text/javascript; charset=utf-8")
            .body(body);
    });

    let url = format!("{}/collections/5/items", server.base_url());
    let page = fetch_listing(&client_for(&server), &url).unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "8");
    assert_eq!(page.items[0].title, "Выпуск 8");
    assert_eq!(page.items[0].duration_seconds, Some(3725));
    assert_eq!(
        page.items[0].cover_url,
        format!("{}/images/8.jpg", server.base_url())
    );
    assert_eq!(
        page.next_url.as_deref(),
        Some("/collections/5/items?limit=12&offset=24")
    );
}

#[test]
fn js_regime_with_paging_uses_offset_arithmetic() {
    let server = MockServer::start();
    let body = concat!(
        r#"collection_items = '<div>"#,
        r#"<a data-id=\'1\' data-role=\'content_modal\' href=\'/v/1\'><h3>a</h3></a>"#,
        r#"<a data-id=\'2\' data-role=\'content_modal\' href=\'/v/2\'><h3>b</h3></a>"#,
        r#"<a data-id=\'3\' data-role=\'content_modal\' href=\'/v/3\'><h3>c</h3></a>"#,
        r#"</div>';"#,
        "\n",
        r#"$('.show-more').attr('data-url', '/collections/5/items?limit=2&amp;offset=99');"#,
    );
    server.mock(|when, then| {
        when.method(GET)
            .path("/collections/5/items")
            .query_param("limit", "3")
            .query_param("offset", "0");
        then.status(200)
            .header("content-type", "text/javascript; charset=utf-8")
            .body(body);
    });

    let url = format!("{}/collections/5/items?limit=2&offset=0", server.base_url());
    let page = fetch_listing(&client_for(&server), &url).unwrap();

    // limit/offset on the request takes precedence over the embedded data-url.
    assert_eq!(page.items.len(), 2);
    assert_eq!(
        page.next_url.as_deref(),
        Some(format!("{}/collections/5/items?limit=2&offset=2", server.base_url()).as_str())
    );
}

#[test]
fn js_regime_pattern_mismatch_yields_graceful_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/collections/5/items");
        then.status(200)
            .header("content-type", "text/javascript; charset=utf-8")
            .body("window.totally_unrelated = 42;");
    });

    let url = format!("{}/collections/5/items", server.base_url());
    let page = fetch_listing(&client_for(&server), &url).unwrap();

    assert_eq!(page.items.len(), 0);
    assert_eq!(page.next_url, None);
}

#[test]
fn missing_content_type_fails_fast() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/collections/5/items");
        then.status(200).body(listing_html(&[1]));
    });

    let url = format!("{}/collections/5/items", server.base_url());
    let err = fetch_listing(&client_for(&server), &url).expect_err("should fail fast");
    assert!(err.is_content_type(), "expected content-type error, got: {}", err);
}

#[test]
fn transport_errors_propagate_unmodified() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/collections/5/items");
        then.status(503);
    });

    let url = format!("{}/collections/5/items", server.base_url());
    let err = fetch_listing(&client_for(&server), &url).expect_err("should propagate");
    assert!(err.is_fetch());
}
