//! Page runtime: mounts controllers, loads the index once and processes
//! events one at a time.

use std::time::Duration;

use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, info};

use crate::application::{
    controllers::{
        category::{CategoryController, ListingController},
        related::RelatedController,
        search::{DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_QUERY_LEN, SearchController},
        tags::TagsController,
    },
    dispatch::ClickEvent,
    location::Location,
    store::{FetchError, PostIndex, PostStore},
};
use crate::domain::{catalog::Catalog, posts::DateStyle};
use crate::presentation::document::Document;

/// Behaviour knobs shared by every controller on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    pub debounce: Duration,
    pub max_query_len: usize,
    pub date_style: DateStyle,
    pub catalog: Catalog,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            max_query_len: DEFAULT_MAX_QUERY_LEN,
            date_style: DateStyle::default(),
            catalog: Catalog::default(),
        }
    }
}

/// Mutable page surfaces handed to a controller while it handles an event.
pub struct PageContext<'a> {
    pub document: &'a mut Document,
    pub location: &'a mut Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Click(ClickEvent),
    Input { region: String, value: String },
    Submit { region: String },
}

pub trait Controller {
    fn name(&self) -> &'static str;

    /// Whether the controller needs the post index at all.
    fn wants_index(&self) -> bool {
        true
    }

    /// Called once, before the index is requested.
    fn mounted(&mut self, _ctx: &mut PageContext<'_>) {}

    fn index_loaded(&mut self, ctx: &mut PageContext<'_>, index: Result<PostIndex, FetchError>);

    fn click(&mut self, _ctx: &mut PageContext<'_>, _event: &ClickEvent) {}

    fn input(&mut self, _ctx: &mut PageContext<'_>, _region: &str, _value: &str) {}

    fn debounce_deadline(&self) -> Option<Instant> {
        None
    }

    fn debounce_elapsed(&mut self, _ctx: &mut PageContext<'_>, _now: Instant) {}
}

pub struct Page {
    document: Document,
    location: Location,
    controllers: Vec<Box<dyn Controller>>,
}

impl Page {
    /// Build every controller whose mount points exist in `document`.
    pub fn new(mut document: Document, mut location: Location, settings: &PageSettings) -> Self {
        let mut controllers: Vec<Box<dyn Controller>> = Vec::new();

        if let Some(controller) = CategoryController::mount(&document, &location, settings) {
            controllers.push(Box::new(controller));
        } else if let Some(controller) = ListingController::mount(&document, settings) {
            controllers.push(Box::new(controller));
        }
        if let Some(controller) = SearchController::mount(&document, settings) {
            controllers.push(Box::new(controller));
        }
        if let Some(controller) = TagsController::mount(&document, settings) {
            controllers.push(Box::new(controller));
        }
        if let Some(controller) = RelatedController::mount(&document, &location, settings) {
            controllers.push(Box::new(controller));
        }

        let mut ctx = PageContext {
            document: &mut document,
            location: &mut location,
        };
        for controller in controllers.iter_mut() {
            controller.mounted(&mut ctx);
        }

        let names: Vec<&str> = controllers.iter().map(|controller| controller.name()).collect();
        info!(path = location.path(), controllers = ?names, "page mounted");

        Self {
            document,
            location,
            controllers,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn controller_names(&self) -> Vec<&'static str> {
        self.controllers
            .iter()
            .map(|controller| controller.name())
            .collect()
    }

    pub fn into_parts(self) -> (Document, Location) {
        (self.document, self.location)
    }

    /// Load the index (once, only if a controller wants it) and hand the
    /// outcome to every interested controller.
    pub async fn boot(&mut self, store: &PostStore) {
        if !self.controllers.iter().any(|controller| controller.wants_index()) {
            debug!("no controller requested the post index");
            return;
        }

        let index = store.load().await;
        let mut ctx = PageContext {
            document: &mut self.document,
            location: &mut self.location,
        };
        for controller in self.controllers.iter_mut() {
            if controller.wants_index() {
                controller.index_loaded(&mut ctx, index.clone());
            }
        }
    }

    pub fn handle(&mut self, event: &PageEvent) {
        let mut ctx = PageContext {
            document: &mut self.document,
            location: &mut self.location,
        };
        match event {
            PageEvent::Click(click) => {
                for controller in self.controllers.iter_mut() {
                    controller.click(&mut ctx, click);
                }
            }
            PageEvent::Input { region, value } => {
                for controller in self.controllers.iter_mut() {
                    controller.input(&mut ctx, region, value);
                }
            }
            PageEvent::Submit { region } => {
                debug!(region = %region, "form submission suppressed");
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.controllers
            .iter()
            .filter_map(|controller| controller.debounce_deadline())
            .min()
    }

    /// Fire every debounce timer that is due at `now`.
    pub fn fire_due(&mut self, now: Instant) {
        let mut ctx = PageContext {
            document: &mut self.document,
            location: &mut self.location,
        };
        for controller in self.controllers.iter_mut() {
            if controller
                .debounce_deadline()
                .is_some_and(|deadline| deadline <= now)
            {
                controller.debounce_elapsed(&mut ctx, now);
            }
        }
    }

    /// Boot the page, then process events until the channel closes and no
    /// debounce timer is pending.
    pub async fn run(mut self, store: &PostStore, mut events: mpsc::Receiver<PageEvent>) -> Self {
        self.boot(store).await;

        let mut closed = false;
        loop {
            let deadline = self.next_deadline();
            if closed && deadline.is_none() {
                break;
            }

            tokio::select! {
                event = events.recv(), if !closed => match event {
                    Some(event) => self.handle(&event),
                    None => closed = true,
                },
                _ = sleep_until_deadline(deadline) => {
                    self.fire_due(Instant::now());
                }
            }
        }

        self
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
