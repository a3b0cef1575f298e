//! Tag cloud page: one active tag at a time, mirrored into `?tag=`.

use tracing::{debug, warn};

use crate::application::{
    dispatch::{ClickEvent, Dispatcher},
    filter::{self, TagCount},
    location::{HistoryMode, Location},
    page::{Controller, PageContext, PageSettings},
    store::{FetchError, PostIndex},
};
use crate::domain::posts::DateStyle;
use crate::presentation::{
    card::{CardOptions, empty_state, render_grid},
    document::Document,
    node::{Element, Node},
};

use super::LOAD_FAILED_TAGS;

pub const CLOUD: &str = "js-tag-cloud";
pub const FILTER_BAR: &str = "js-tag-filter-bar";
pub const ACTIVE: &str = "js-tag-active";
pub const POSTS: &str = "js-tag-posts";
pub const CLEAR: &str = "js-tag-clear";

pub const TAG_PARAM: &str = "tag";

#[derive(Debug, Clone, PartialEq, Eq)]
enum TagAction {
    Toggle(String),
    Clear,
}

/// Predicate state of the tags page.
#[derive(Debug, Default)]
struct TagsState {
    posts: Option<PostIndex>,
    cloud: Vec<TagCount>,
    active: Option<String>,
}

pub struct TagsController {
    state: TagsState,
    dispatcher: Dispatcher<TagAction>,
    date_style: DateStyle,
}

impl TagsController {
    pub fn mount(document: &Document, settings: &PageSettings) -> Option<Self> {
        if !document.contains(CLOUD) {
            return None;
        }
        Some(Self {
            state: TagsState::default(),
            dispatcher: Dispatcher::new()
                .on_data(CLOUD, "tag", TagAction::Toggle)
                .on_region(CLEAR, |_| TagAction::Clear),
            date_style: settings.date_style,
        })
    }

    fn apply(&mut self, document: &mut Document, tag: String) {
        let matched = match &self.state.posts {
            Some(posts) => filter::filter_by_tag(posts, &tag),
            None => Vec::new(),
        };
        metrics::counter!("postscope_filter_runs_total", "page" => "tags").increment(1);
        debug!(tag = %tag, matches = matched.len(), "tag filter applied");

        document.set_hidden(FILTER_BAR, false);
        document.set_text(ACTIVE, format!("#{tag}"));
        let posts = if matched.is_empty() {
            Vec::new()
        } else {
            let options = CardOptions::new(self.date_style);
            vec![render_grid(matched, &options)]
        };
        document.replace_children(POSTS, posts);

        self.state.active = Some(tag);
        self.render_cloud(document);
    }

    fn clear(&mut self, document: &mut Document) {
        self.state.active = None;
        document.set_hidden(FILTER_BAR, true);
        document.set_text(ACTIVE, "");
        document.replace_children(POSTS, Vec::new());
        self.render_cloud(document);
    }

    fn render_cloud(&self, document: &mut Document) {
        let active = self.state.active.as_deref();
        let buttons = self
            .state
            .cloud
            .iter()
            .map(|entry| tag_button(entry, active == Some(entry.tag.as_str())))
            .collect();
        document.replace_children(CLOUD, buttons);
    }

    fn sync_url(&self, location: &mut Location) {
        location.set_query_param(TAG_PARAM, self.state.active.as_deref(), HistoryMode::Push);
    }
}

fn tag_button(entry: &TagCount, active: bool) -> Node {
    let class = if active { "tag-btn is-active" } else { "tag-btn" };
    Element::new("button")
        .attr("type", "button")
        .class(class)
        .attr("data-tag", entry.tag.as_str())
        .attr("aria-pressed", active.to_string())
        .child(
            Element::new("span")
                .class("tag-btn-name")
                .text(format!("#{}", entry.tag)),
        )
        .child(
            Element::new("span")
                .class("tag-btn-count")
                .text(format!("({})", entry.count)),
        )
        .into()
}

impl Controller for TagsController {
    fn name(&self) -> &'static str {
        "tags"
    }

    fn mounted(&mut self, ctx: &mut PageContext<'_>) {
        ctx.document.set_hidden(FILTER_BAR, true);
    }

    fn index_loaded(&mut self, ctx: &mut PageContext<'_>, index: Result<PostIndex, FetchError>) {
        let posts = match index {
            Ok(posts) => posts,
            Err(err) => {
                warn!(error = %err, "tag cloud unavailable");
                ctx.document
                    .replace_children(CLOUD, vec![empty_state(LOAD_FAILED_TAGS)]);
                return;
            }
        };

        self.state.cloud = filter::tag_cloud(&posts);
        self.state.posts = Some(posts);
        self.render_cloud(ctx.document);

        if let Some(tag) = ctx.location.query_param(TAG_PARAM) {
            if !tag.is_empty() {
                self.apply(ctx.document, tag);
            }
        }
    }

    fn click(&mut self, ctx: &mut PageContext<'_>, event: &ClickEvent) {
        if self.state.posts.is_none() {
            return;
        }
        let Some(action) = self.dispatcher.dispatch(ctx.document, event) else {
            return;
        };

        match action {
            TagAction::Clear if self.state.active.is_none() => return,
            TagAction::Toggle(tag) if self.state.active.as_deref() == Some(tag.as_str()) => {
                self.clear(ctx.document)
            }
            TagAction::Toggle(tag) => self.apply(ctx.document, tag),
            TagAction::Clear => self.clear(ctx.document),
        }
        self.sync_url(ctx.location);
    }
}
