//! Category pages: the tiled landing page and the plain category listing.

use tracing::{debug, warn};

use crate::application::{
    dispatch::{ClickEvent, Dispatcher},
    filter::{self, CategoryFilter, PostGroup},
    location::{HistoryMode, Location},
    page::{Controller, PageContext, PageSettings},
    store::{FetchError, PostIndex},
};
use crate::domain::{catalog::Catalog, posts::{DateStyle, Post}};
use crate::presentation::{
    card::{CardOptions, empty_state, render_grid},
    document::Document,
    node::{Element, Node},
};

use super::LOAD_FAILED_POSTS;

pub const TILES: &str = "js-cyber-tiles";
pub const GRID: &str = "js-articles-grid";
pub const HEADING: &str = "js-articles-heading";
pub const CONTAINER: &str = "js-posts-container";

pub const FILTER_PARAM: &str = "filter";

const TILED_EMPTY: &str = "no posts yet in this category";
const LISTING_EMPTY: &str = "No posts yet. Check back soon.";

#[derive(Debug)]
enum IndexState {
    Pending,
    Ready(PostIndex),
    Failed,
}

/// Subcategory tiles over one category, with `?filter=` kept in the URL.
pub struct CategoryController {
    catalog: Catalog,
    date_style: DateStyle,
    dispatcher: Dispatcher<String>,
    index: IndexState,
    active: Option<String>,
    has_heading: bool,
}

impl CategoryController {
    pub fn mount(document: &Document, location: &Location, settings: &PageSettings) -> Option<Self> {
        if !document.contains(TILES) || !document.contains(GRID) {
            return None;
        }

        let catalog = settings.catalog.clone();
        let active = location
            .query_param(FILTER_PARAM)
            .and_then(|raw| catalog.accept_filter(&raw));

        Some(Self {
            catalog,
            date_style: settings.date_style,
            dispatcher: Dispatcher::new().on_data(TILES, "filter", |value| value),
            index: IndexState::Pending,
            active,
            has_heading: document.contains(HEADING),
        })
    }

    /// Posts of the tiled category, newest first.
    fn category_posts<'p>(&self, posts: &'p [Post]) -> Vec<&'p Post> {
        let scope = CategoryFilter::new(Some(self.catalog.tiled_category.as_str()), None);
        let mut matched = filter::filter_by_category(posts, &scope);
        filter::sort_newest_first(&mut matched);
        matched
    }

    fn render(&self, document: &mut Document) {
        let posts: &[Post] = match &self.index {
            IndexState::Ready(posts) => &posts[..],
            IndexState::Pending | IndexState::Failed => &[],
        };
        let in_category = self.category_posts(posts);

        let counts = filter::subcategory_counts(&in_category, &self.catalog.tile_keys());
        let tiles = self
            .catalog
            .tiles
            .iter()
            .zip(counts)
            .map(|(tile, (_, count))| {
                tile_button(
                    &tile.filter,
                    &tile.label,
                    count,
                    self.active.as_deref() == Some(tile.filter.as_str()),
                )
            })
            .collect();
        document.replace_children(TILES, tiles);

        let visible: Vec<&Post> = match self.active.as_deref() {
            Some(active) => in_category
                .into_iter()
                .filter(|post| post.subcategory() == Some(active))
                .collect(),
            None => in_category,
        };
        metrics::counter!("postscope_filter_runs_total", "page" => "category").increment(1);
        debug!(filter = ?self.active, matches = visible.len(), "category filter applied");

        let grid = if visible.is_empty() {
            empty_state(TILED_EMPTY)
        } else {
            render_grid(visible, &CardOptions::new(self.date_style))
        };
        document.replace_children(GRID, vec![grid]);

        if self.has_heading {
            document.set_text(HEADING, self.heading());
        }
    }

    fn heading(&self) -> String {
        match self.active.as_deref().and_then(|key| self.catalog.tile(key)) {
            Some(tile) => format!("// {}", tile.label.to_lowercase()),
            None => "// all articles".to_string(),
        }
    }
}

fn tile_button(filter: &str, label: &str, count: usize, active: bool) -> Node {
    let class = if active {
        "cyber-tile cyber-tile--active"
    } else {
        "cyber-tile"
    };
    Element::new("button")
        .attr("type", "button")
        .class(class)
        .attr("data-filter", filter)
        .child(Element::new("span").class("cyber-tile-label").text(label))
        .child(
            Element::new("span")
                .class("cyber-tile-count")
                .attr("data-subcat", filter)
                .text(format!("{count:02}")),
        )
        .into()
}

impl Controller for CategoryController {
    fn name(&self) -> &'static str {
        "category"
    }

    fn mounted(&mut self, ctx: &mut PageContext<'_>) {
        let tiles = self
            .catalog
            .tiles
            .iter()
            .map(|tile| {
                tile_button(
                    &tile.filter,
                    &tile.label,
                    0,
                    self.active.as_deref() == Some(tile.filter.as_str()),
                )
            })
            .collect();
        ctx.document.replace_children(TILES, tiles);
    }

    fn index_loaded(&mut self, ctx: &mut PageContext<'_>, index: Result<PostIndex, FetchError>) {
        match index {
            Ok(posts) => {
                self.index = IndexState::Ready(posts);
                self.render(ctx.document);
            }
            Err(err) => {
                warn!(error = %err, "category page unavailable");
                self.index = IndexState::Failed;
                ctx.document
                    .replace_children(GRID, vec![empty_state(LOAD_FAILED_POSTS)]);
            }
        }
    }

    fn click(&mut self, ctx: &mut PageContext<'_>, event: &ClickEvent) {
        if !matches!(self.index, IndexState::Ready(_)) {
            return;
        }
        let Some(filter) = self.dispatcher.dispatch(ctx.document, event) else {
            return;
        };
        let Some(filter) = self.catalog.accept_filter(&filter) else {
            return;
        };

        if self.active.as_deref() == Some(filter.as_str()) {
            self.active = None;
        } else {
            self.active = Some(filter);
        }
        self.render(ctx.document);
        ctx.location
            .set_query_param(FILTER_PARAM, self.active.as_deref(), HistoryMode::Replace);
    }
}

/// Flat or grouped listing of one category, configured by the container's
/// `data-category` / `data-subcategory`.
pub struct ListingController {
    scope: CategoryFilter,
    preferred_groups: Vec<String>,
    date_style: DateStyle,
}

impl ListingController {
    pub fn mount(document: &Document, settings: &PageSettings) -> Option<Self> {
        let container = document.region(CONTAINER)?;
        let scope = CategoryFilter::new(
            container.data_value("category"),
            container.data_value("subcategory"),
        );

        Some(Self {
            scope,
            preferred_groups: settings.catalog.preferred_groups.clone(),
            date_style: settings.date_style,
        })
    }

    fn grouped(&self) -> bool {
        self.scope.category.is_some() && self.scope.subcategory.is_none()
    }

    fn group_section(&self, group: &PostGroup<'_>, options: &CardOptions<'_>) -> Node {
        let mut section = Element::new("section").class("post-group");
        if let Some(subcategory) = &group.subcategory {
            section = section.attr("data-subcategory", subcategory.as_str());
        }
        section = section
            .child(Element::new("h2").class("post-group-title").text(group.label()))
            .child(render_grid(group.posts.iter().copied(), options));

        match (&self.scope.category, &group.subcategory) {
            (Some(category), Some(subcategory)) => section
                .child(
                    Element::new("a")
                        .class("post-group-more")
                        .attr("href", format!("/{category}/{subcategory}/"))
                        .text("view all"),
                )
                .into(),
            _ => section.into(),
        }
    }
}

impl Controller for ListingController {
    fn name(&self) -> &'static str {
        "listing"
    }

    fn index_loaded(&mut self, ctx: &mut PageContext<'_>, index: Result<PostIndex, FetchError>) {
        let posts = match index {
            Ok(posts) => posts,
            Err(err) => {
                warn!(error = %err, "category listing unavailable");
                ctx.document
                    .replace_children(CONTAINER, vec![empty_state(LOAD_FAILED_POSTS)]);
                return;
            }
        };

        let mut matched = filter::filter_by_category(&posts, &self.scope);
        filter::sort_newest_first(&mut matched);
        metrics::counter!("postscope_filter_runs_total", "page" => "listing").increment(1);
        debug!(
            category = ?self.scope.category,
            subcategory = ?self.scope.subcategory,
            matches = matched.len(),
            "category listing filtered"
        );

        if matched.is_empty() {
            ctx.document
                .replace_children(CONTAINER, vec![empty_state(LISTING_EMPTY)]);
            return;
        }

        let options = CardOptions::new(self.date_style);
        let children = if self.grouped() {
            filter::group_by_subcategory(&matched, &self.preferred_groups)
                .iter()
                .map(|group| self.group_section(group, &options))
                .collect()
        } else {
            vec![render_grid(matched, &options)]
        };
        ctx.document.replace_children(CONTAINER, children);
    }
}
