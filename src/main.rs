use std::{collections::BTreeMap, process};

use postscope::{
    application::{
        controllers::{category, related, search, tags},
        dispatch::ClickEvent,
        error::AppError,
        filter,
        location::Location,
        page::{Page, PageEvent},
        store::PostStore,
    },
    config::{self, PageKind, RenderArgs},
    infra::{index, telemetry},
    presentation::{
        document::{Document, Region},
        node::Element,
    },
};
use tokio::sync::mpsc;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    let source = index::source_from_settings(&settings.index)?;
    let store = PostStore::new(source);

    match cli_args.command {
        config::Command::Render(args) => run_render(&settings, &store, args).await,
        config::Command::Inspect => run_inspect(&store).await,
    }
}

async fn run_render(
    settings: &config::Settings,
    store: &PostStore,
    args: RenderArgs,
) -> Result<(), AppError> {
    let location = Location::parse(&args.location)?;
    let document = build_document(&args);
    let events = simulated_events(&args);

    info!(
        page = ?args.page,
        location = %location.relative(),
        events = events.len(),
        "rendering page"
    );

    let (sender, receiver) = mpsc::channel(events.len().max(1));
    for event in events {
        sender
            .send(event)
            .await
            .map_err(|_| AppError::validation("page event channel closed early"))?;
    }
    drop(sender);

    let page = Page::new(document, location, &settings.page_settings());
    let page = page.run(store, receiver).await;
    let (document, location) = page.into_parts();

    for region in document.regions() {
        println!("{}", region.to_html());
    }
    println!("location: {}", location.relative());
    println!("history: {}", location.history_len());
    Ok(())
}

async fn run_inspect(store: &PostStore) -> Result<(), AppError> {
    let posts = store.load().await?;

    let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
    for post in posts.iter() {
        *categories.entry(post.category.as_str()).or_default() += 1;
    }
    let tags = filter::tag_cloud(&posts);

    println!("posts: {}", posts.len());
    println!("tags: {}", tags.len());
    for (category, count) in categories {
        println!("category {category}: {count}");
    }
    Ok(())
}

/// Mount points of the requested page template.
fn build_document(args: &RenderArgs) -> Document {
    match args.page {
        PageKind::Category => Document::new()
            .with_region(Region::new(category::TILES))
            .with_region(Region::new(category::HEADING))
            .with_region(Region::new(category::GRID)),
        PageKind::Listing => {
            let mut container = Region::new(category::CONTAINER);
            if let Some(name) = &args.category {
                container = container.data("category", name.as_str());
            }
            if let Some(name) = &args.subcategory {
                container = container.data("subcategory", name.as_str());
            }
            Document::new().with_region(container)
        }
        PageKind::Search => Document::new()
            .with_region(Region::new(search::INPUT))
            .with_region(Region::new(search::COUNT))
            .with_region(Region::new(search::RESULTS)),
        PageKind::Tags => Document::new()
            .with_region(Region::new(tags::CLOUD))
            .with_region(Region::new(tags::FILTER_BAR).hidden(true))
            .with_region(Region::new(tags::ACTIVE))
            .with_region(Region::new(tags::CLEAR))
            .with_region(Region::new(tags::POSTS)),
        PageKind::Related => {
            let post_tags = args.current_tags.iter().fold(
                Region::new(related::POST_TAGS),
                |region, tag| region.child(Element::new("li").class("post-tag").text(tag.as_str())),
            );
            Document::new()
                .with_region(post_tags)
                .with_region(Region::new(related::SECTION).hidden(true))
                .with_region(Region::new(related::GRID))
        }
    }
}

fn simulated_events(args: &RenderArgs) -> Vec<PageEvent> {
    let mut events: Vec<PageEvent> = args
        .typed
        .iter()
        .map(|value| PageEvent::Input {
            region: search::INPUT.to_string(),
            value: value.clone(),
        })
        .collect();

    let click_target = match args.page {
        PageKind::Category => Some((category::TILES, "filter")),
        PageKind::Tags => Some((tags::CLOUD, "tag")),
        PageKind::Listing | PageKind::Search | PageKind::Related => None,
    };
    if let Some((region, attribute)) = click_target {
        events.extend(args.click.iter().map(|value| {
            PageEvent::Click(ClickEvent::on(region).with_data(attribute, value.as_str()))
        }));
    }
    events
}
