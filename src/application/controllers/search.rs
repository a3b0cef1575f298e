//! Free-text search page.

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::application::{
    debounce::Debouncer,
    filter::{self, SearchOutcome},
    location::HistoryMode,
    page::{Controller, PageContext, PageSettings},
    store::{FetchError, PostIndex},
};
use crate::domain::posts::{DateStyle, Post};
use crate::presentation::{
    card::{CardOptions, empty_state, render_grid},
    document::Document,
};

use super::LOAD_FAILED_POSTS;

pub const INPUT: &str = "js-search-input";
pub const RESULTS: &str = "js-search-results";
pub const COUNT: &str = "js-search-count";

pub const QUERY_PARAM: &str = "q";
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;
pub const DEFAULT_MAX_QUERY_LEN: usize = 100;

const STRIPPED: &[char] = &['<', '>', '"', '\'', '&'];

/// Trim, clamp to `max_len` characters and drop markup-significant
/// characters. Runs before a query reaches the page or the URL.
pub fn sanitize_query(raw: &str, max_len: usize) -> String {
    let clamped: String = raw.trim().chars().take(max_len).collect();
    clamped
        .chars()
        .filter(|ch| !STRIPPED.contains(ch))
        .collect::<String>()
        .trim()
        .to_string()
}

#[derive(Debug)]
enum IndexState {
    Pending,
    Ready(PostIndex),
    Failed,
}

pub struct SearchController {
    index: IndexState,
    debouncer: Debouncer<String>,
    max_query_len: usize,
    date_style: DateStyle,
    has_count: bool,
}

impl SearchController {
    pub fn mount(document: &Document, settings: &PageSettings) -> Option<Self> {
        if !document.contains(INPUT) || !document.contains(RESULTS) {
            return None;
        }
        Some(Self {
            index: IndexState::Pending,
            debouncer: Debouncer::new(settings.debounce),
            max_query_len: settings.max_query_len,
            date_style: settings.date_style,
            has_count: document.contains(COUNT),
        })
    }

    fn run(&self, document: &mut Document, query: &str) {
        let posts: &[Post] = match &self.index {
            IndexState::Ready(posts) => &posts[..],
            IndexState::Pending | IndexState::Failed => &[],
        };

        let outcome = filter::search(posts, query);
        metrics::counter!("postscope_filter_runs_total", "page" => "search").increment(1);
        debug!(query, matches = outcome.match_count(), "search executed");
        self.render(document, &outcome);
    }

    fn render(&self, document: &mut Document, outcome: &SearchOutcome<'_>) {
        match outcome {
            SearchOutcome::Inactive => {
                document.replace_children(RESULTS, Vec::new());
                if self.has_count {
                    document.set_text(COUNT, "");
                }
            }
            SearchOutcome::Empty { query } => {
                self.render_count(document, 0, query);
                document.replace_children(
                    RESULTS,
                    vec![empty_state(format!("No posts matched '{query}'."))],
                );
            }
            SearchOutcome::Matches { query, posts } => {
                self.render_count(document, posts.len(), query);
                let options = CardOptions::new(self.date_style).highlighting(query);
                document.replace_children(
                    RESULTS,
                    vec![render_grid(posts.iter().copied(), &options)],
                );
            }
        }
    }

    fn render_count(&self, document: &mut Document, count: usize, query: &str) {
        if !self.has_count {
            return;
        }
        let noun = if count == 1 { "result" } else { "results" };
        document.set_text(COUNT, format!("{count} {noun} for '{query}'"));
    }
}

impl Controller for SearchController {
    fn name(&self) -> &'static str {
        "search"
    }

    fn index_loaded(&mut self, ctx: &mut PageContext<'_>, index: Result<PostIndex, FetchError>) {
        match index {
            Ok(posts) => self.index = IndexState::Ready(posts),
            Err(err) => {
                warn!(error = %err, "search disabled: post index unavailable");
                self.index = IndexState::Failed;
                self.debouncer.cancel();
                ctx.document
                    .replace_children(RESULTS, vec![empty_state(LOAD_FAILED_POSTS)]);
                return;
            }
        }

        let Some(raw) = ctx.location.query_param(QUERY_PARAM) else {
            return;
        };
        if raw.is_empty() {
            return;
        }
        let query = sanitize_query(&raw, self.max_query_len);
        ctx.document.set_value(INPUT, query.clone());
        self.run(ctx.document, &query);
    }

    fn input(&mut self, _ctx: &mut PageContext<'_>, region: &str, value: &str) {
        if region != INPUT || matches!(self.index, IndexState::Failed) {
            return;
        }
        self.debouncer.schedule(value.to_string());
    }

    fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    fn debounce_elapsed(&mut self, ctx: &mut PageContext<'_>, now: Instant) {
        let Some(raw) = self.debouncer.take_due(now) else {
            return;
        };
        let query = sanitize_query(&raw, self.max_query_len);
        self.run(ctx.document, &query);
        ctx.location
            .set_query_param(QUERY_PARAM, Some(query.as_str()), HistoryMode::Push);
    }
}
