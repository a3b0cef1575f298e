//! Shared fixtures for page runtime tests.
#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use postscope::{
    application::{
        location::Location,
        page::{Page, PageEvent, PageSettings},
        store::{FetchError, IndexSource, PostStore},
    },
    presentation::{document::Document, node::Element},
};
use tokio::sync::mpsc;

pub const INDEX: &str = r#"[
  {"title":"Buffer Overflow 101","excerpt":"Smashing the stack on a tiny binary.","date":"2024-05-10","url":"/cybersecurity/ctf/bof/","category":"cybersecurity","subcategory":"ctf","tags":["pwn","linux"]},
  {"title":"Nmap Cheatsheet","excerpt":"Scans I keep reaching for.","date":"2024-03-02","url":"/cybersecurity/cheatsheets/nmap/","category":"cybersecurity","subcategory":"cheatsheets","tags":["recon","linux"]},
  {"title":"Malware Triage","excerpt":"First hour with an unknown sample.","date":"2024-06-01","url":"/cybersecurity/malware/triage/","category":"cybersecurity","subcategory":"malware","tags":["reversing"]},
  {"title":"Home Lab Setup","excerpt":"Proxmox, VLANs and a firewall.","date":"2023-12-20","url":"/cybersecurity/labs/home-lab/","category":"cybersecurity","subcategory":"labs","tags":["linux","homelab"]},
  {"title":"Async Rust Notes","excerpt":"Pinning, wakers and select.","date":"2024-04-15","url":"/dev/writeups/async-rust/","category":"dev","subcategory":"writeups","tags":["rust","async"]},
  {"title":"Rust CLI Tips","excerpt":"Argument parsing with clap.","date":"2024-02-11","url":"/dev/cheatsheets/rust-cli/","category":"dev","subcategory":"cheatsheets","tags":["rust"]},
  {"title":"Portfolio Site","excerpt":"How this blog is built.","date":"2024-01-05","url":"/dev/portfolio/","category":"dev","subcategory":null,"tags":["web"]}
]"#;

pub struct MemorySource {
    body: Result<String, FetchError>,
    calls: AtomicUsize,
}

impl MemorySource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndexSource for MemorySource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.body.clone().map(String::into_bytes)
    }
}

pub fn store_with(body: Result<&str, FetchError>) -> (PostStore, Arc<MemorySource>) {
    let source = Arc::new(MemorySource {
        body: body.map(str::to_string),
        calls: AtomicUsize::new(0),
    });
    (PostStore::new(source.clone()), source)
}

pub fn fixture_store() -> (PostStore, Arc<MemorySource>) {
    store_with(Ok(INDEX))
}

pub fn malformed_store() -> (PostStore, Arc<MemorySource>) {
    store_with(Ok(r#"[{"title": "truncated""#))
}

pub fn location(raw: &str) -> Location {
    Location::parse(raw).expect("location parses")
}

/// Queue `events`, close the channel and run the page to completion.
pub async fn run_page(
    document: Document,
    location: Location,
    store: &PostStore,
    events: Vec<PageEvent>,
) -> Page {
    let (sender, receiver) = mpsc::channel(events.len().max(1));
    for event in events {
        sender.try_send(event).expect("channel has room");
    }
    drop(sender);

    Page::new(document, location, &PageSettings::default())
        .run(store, receiver)
        .await
}

/// Elements with `tag` and `class` anywhere in region `id`.
pub fn elements<'a>(page: &'a Page, id: &str, tag: &str, class: &str) -> Vec<&'a Element> {
    page.document()
        .region(id)
        .map(|region| region.find_all(&|element| element.tag == tag && element.has_class(class)))
        .unwrap_or_default()
}

/// Titles of the cards rendered in region `id`, in order.
pub fn card_titles(page: &Page, id: &str) -> Vec<String> {
    elements(page, id, "h3", "post-title")
        .into_iter()
        .map(|element| element.text_content())
        .collect()
}

pub fn region_text(page: &Page, id: &str) -> String {
    page.document()
        .region(id)
        .map(|region| region.text_content())
        .unwrap_or_default()
}

pub fn is_hidden(page: &Page, id: &str) -> bool {
    page.document()
        .region(id)
        .is_some_and(|region| region.hidden)
}
