//! Search page: debouncing, sanitising and `?q=` sync.

mod support;

use std::time::Duration;

use postscope::{
    application::{
        controllers::search::{COUNT, INPUT, RESULTS},
        page::{Page, PageEvent, PageSettings},
    },
    presentation::document::{Document, Region},
};
use tokio::sync::mpsc;

use support::{card_titles, elements, fixture_store, location, region_text, run_page};

fn search_document() -> Document {
    Document::new()
        .with_region(Region::new(INPUT))
        .with_region(Region::new(COUNT))
        .with_region(Region::new(RESULTS))
}

fn typed(value: &str) -> PageEvent {
    PageEvent::Input {
        region: INPUT.to_string(),
        value: value.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn keystrokes_inside_the_window_run_one_search() {
    let (store, _) = fixture_store();
    let events = ["r", "ru", "rus", "rust", "rust "]
        .into_iter()
        .map(typed)
        .collect();

    let page = run_page(search_document(), location("/search/"), &store, events).await;

    assert_eq!(page.location().history_len(), 2);
    assert_eq!(page.location().relative(), "/search/?q=rust");
    assert_eq!(region_text(&page, COUNT), "2 results for 'rust'");
    assert_eq!(
        card_titles(&page, RESULTS),
        vec!["Async Rust Notes", "Rust CLI Tips"]
    );
}

#[tokio::test(start_paused = true)]
async fn pauses_longer_than_the_delay_search_each_value() {
    let (store, _) = fixture_store();
    let (sender, receiver) = mpsc::channel(4);

    let producer = tokio::spawn(async move {
        sender.send(typed("nmap")).await.expect("send");
        tokio::time::sleep(Duration::from_millis(300)).await;
        sender.send(typed("rust")).await.expect("send");
    });

    let page = Page::new(
        search_document(),
        location("/search/"),
        &PageSettings::default(),
    )
    .run(&store, receiver)
    .await;
    producer.await.expect("producer finishes");

    let queries: Vec<Option<String>> = page
        .location()
        .history()
        .iter()
        .map(|url| url.query().map(str::to_string))
        .collect();
    assert_eq!(
        queries,
        vec![None, Some("q=nmap".to_string()), Some("q=rust".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn query_is_sanitised_before_reaching_page_and_url() {
    let (store, _) = fixture_store();
    let page = run_page(
        search_document(),
        location("/search/"),
        &store,
        vec![typed("  <nmap>\"  ")],
    )
    .await;

    assert_eq!(page.location().relative(), "/search/?q=nmap");
    assert_eq!(region_text(&page, COUNT), "1 result for 'nmap'");

    let html = page.document().to_html();
    assert!(!html.contains("<nmap>"));

    let titles = elements(&page, RESULTS, "h3", "post-title");
    let mark = titles[0]
        .children
        .iter()
        .filter_map(|node| node.as_element())
        .find_map(|link| {
            link.children
                .iter()
                .filter_map(|node| node.as_element())
                .find(|child| child.tag == "mark")
        })
        .expect("highlighted match");
    assert_eq!(mark.text_content(), "Nmap");
}

#[tokio::test(start_paused = true)]
async fn query_in_url_is_restored_into_input_and_results() {
    let (store, _) = fixture_store();
    let page = run_page(
        search_document(),
        location("/search/?q=%20Nmap%20"),
        &store,
        Vec::new(),
    )
    .await;

    let input = page.document().region(INPUT).expect("input region");
    assert_eq!(input.value.as_deref(), Some("Nmap"));
    assert_eq!(card_titles(&page, RESULTS), vec!["Nmap Cheatsheet"]);
    assert_eq!(page.location().history_len(), 1);
}

#[tokio::test(start_paused = true)]
async fn no_matches_renders_the_empty_state() {
    let (store, _) = fixture_store();
    let page = run_page(
        search_document(),
        location("/search/"),
        &store,
        vec![typed("kubernetes")],
    )
    .await;

    assert_eq!(region_text(&page, COUNT), "0 results for 'kubernetes'");
    assert_eq!(
        region_text(&page, RESULTS),
        "No posts matched 'kubernetes'."
    );
    assert_eq!(page.location().relative(), "/search/?q=kubernetes");
}

#[tokio::test(start_paused = true)]
async fn clearing_the_box_removes_the_parameter() {
    let (store, _) = fixture_store();
    let (sender, receiver) = mpsc::channel(4);

    let producer = tokio::spawn(async move {
        sender.send(typed("rust")).await.expect("send");
        tokio::time::sleep(Duration::from_millis(500)).await;
        sender.send(typed("   ")).await.expect("send");
    });

    let page = Page::new(
        search_document(),
        location("/search/?page=2"),
        &PageSettings::default(),
    )
    .run(&store, receiver)
    .await;
    producer.await.expect("producer finishes");

    assert_eq!(page.location().relative(), "/search/?page=2");
    assert!(card_titles(&page, RESULTS).is_empty());
    assert_eq!(region_text(&page, COUNT), "");
}

#[tokio::test(start_paused = true)]
async fn submitting_the_form_does_not_navigate() {
    let (store, _) = fixture_store();
    let page = run_page(
        search_document(),
        location("/search/"),
        &store,
        vec![PageEvent::Submit {
            region: INPUT.to_string(),
        }],
    )
    .await;

    assert_eq!(page.location().history_len(), 1);
    assert!(card_titles(&page, RESULTS).is_empty());
}
