//! Every page type against an index that cannot be used.

mod support;

use postscope::{
    application::{
        controllers::{category, related, search, tags},
        dispatch::ClickEvent,
        page::PageEvent,
        store::FetchError,
    },
    presentation::{
        document::{Document, Region},
        node::Element,
    },
};

use support::{fixture_store, is_hidden, location, malformed_store, region_text, run_page, store_with};

fn every_surface() -> Document {
    Document::new()
        .with_region(Region::new(search::INPUT))
        .with_region(Region::new(search::RESULTS))
        .with_region(Region::new(tags::CLOUD))
        .with_region(Region::new(tags::FILTER_BAR))
        .with_region(Region::new(tags::POSTS))
        .with_region(
            Region::new(related::POST_TAGS)
                .child(Element::new("li").class("post-tag").text("linux")),
        )
        .with_region(Region::new(related::SECTION))
        .with_region(Region::new(related::GRID))
}

#[tokio::test]
async fn malformed_index_shows_failure_messages() {
    let (store, source) = malformed_store();
    let page = run_page(every_surface(), location("/posts/x/"), &store, Vec::new()).await;

    assert_eq!(region_text(&page, search::RESULTS), "Failed to load posts.");
    assert_eq!(region_text(&page, tags::CLOUD), "Failed to load tags.");
    assert!(is_hidden(&page, related::SECTION));
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn transport_failure_on_category_pages() {
    let (store, _) = store_with(Err(FetchError::transport("memory", "connection refused")));
    let document = Document::new()
        .with_region(Region::new(category::TILES))
        .with_region(Region::new(category::GRID));
    let page = run_page(
        document,
        location("/cybersecurity/"),
        &store,
        vec![PageEvent::Click(
            ClickEvent::on(category::TILES).with_data("filter", "ctf"),
        )],
    )
    .await;

    assert_eq!(region_text(&page, category::GRID), "Failed to load posts.");
    assert_eq!(page.location().relative(), "/cybersecurity/");

    let (store, _) = malformed_store();
    let listing = Document::new().with_region(Region::new(category::CONTAINER).data("category", "dev"));
    let page = run_page(listing, location("/dev/"), &store, Vec::new()).await;
    assert_eq!(
        region_text(&page, category::CONTAINER),
        "Failed to load posts."
    );
}

#[tokio::test(start_paused = true)]
async fn input_after_a_failed_load_is_ignored() {
    let (store, _) = malformed_store();
    let document = Document::new()
        .with_region(Region::new(search::INPUT))
        .with_region(Region::new(search::RESULTS));
    let page = run_page(
        document,
        location("/search/"),
        &store,
        vec![PageEvent::Input {
            region: search::INPUT.to_string(),
            value: "rust".to_string(),
        }],
    )
    .await;

    assert_eq!(page.location().history_len(), 1);
    assert_eq!(region_text(&page, search::RESULTS), "Failed to load posts.");
}

#[tokio::test]
async fn one_fetch_serves_every_controller_on_the_page() {
    let (store, source) = fixture_store();
    let page = run_page(every_surface(), location("/posts/x/"), &store, Vec::new()).await;

    assert_eq!(page.controller_names(), vec!["search", "tags", "related"]);
    assert!(!is_hidden(&page, related::SECTION));
    assert_eq!(source.calls(), 1);
}
