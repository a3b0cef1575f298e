//! "Related posts" section under a single post.

use tracing::{debug, warn};

use crate::application::{
    filter::{self, RELATED_LIMIT},
    location::Location,
    page::{Controller, PageContext, PageSettings},
    store::{FetchError, PostIndex},
};
use crate::domain::posts::DateStyle;
use crate::presentation::{
    card::{CardOptions, render_card},
    document::Document,
};

pub const SECTION: &str = "js-related-posts";
pub const GRID: &str = "js-related-grid";
pub const POST_TAGS: &str = "post-full-tags";

pub struct RelatedController {
    current_tags: Vec<String>,
    current_url: String,
    date_style: DateStyle,
}

impl RelatedController {
    pub fn mount(document: &Document, location: &Location, settings: &PageSettings) -> Option<Self> {
        if !document.contains(SECTION) || !document.contains(GRID) {
            return None;
        }

        Some(Self {
            current_tags: current_tags(document),
            current_url: location.path().to_string(),
            date_style: settings.date_style,
        })
    }
}

/// Tags listed on the post itself, as `li.post-tag` items.
fn current_tags(document: &Document) -> Vec<String> {
    let Some(region) = document.region(POST_TAGS) else {
        return Vec::new();
    };
    region
        .find_all(&|element| element.tag == "li" && element.has_class("post-tag"))
        .into_iter()
        .map(|element| element.text_content().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

impl Controller for RelatedController {
    fn name(&self) -> &'static str {
        "related"
    }

    fn wants_index(&self) -> bool {
        !self.current_tags.is_empty()
    }

    fn mounted(&mut self, ctx: &mut PageContext<'_>) {
        ctx.document.set_hidden(SECTION, true);
    }

    fn index_loaded(&mut self, ctx: &mut PageContext<'_>, index: Result<PostIndex, FetchError>) {
        let posts = match index {
            Ok(posts) => posts,
            Err(err) => {
                warn!(error = %err, "related posts skipped");
                return;
            }
        };

        let related =
            filter::related_posts(&posts, &self.current_tags, &self.current_url, RELATED_LIMIT);
        metrics::counter!("postscope_filter_runs_total", "page" => "related").increment(1);
        debug!(url = %self.current_url, matches = related.len(), "related posts ranked");
        if related.is_empty() {
            return;
        }

        let options = CardOptions::new(self.date_style);
        for post in related {
            ctx.document.append_child(GRID, render_card(post, &options));
        }
        ctx.document.set_hidden(SECTION, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{document::Region, node::Element};

    #[test]
    fn current_tags_are_read_from_post_tag_items() {
        let document = Document::new().with_region(
            Region::new(POST_TAGS)
                .child(Element::new("li").class("post-tag").text("  rust "))
                .child(Element::new("li").class("post-tag").text(""))
                .child(Element::new("li").class("other").text("ignored")),
        );

        assert_eq!(current_tags(&document), vec!["rust".to_string()]);
    }

    #[test]
    fn controller_needs_both_mount_points() {
        let location = Location::parse("/posts/a/").expect("location parses");
        let settings = PageSettings::default();
        let partial = Document::new().with_region(Region::new(SECTION));
        assert!(RelatedController::mount(&partial, &location, &settings).is_none());

        let full = partial.with_region(Region::new(GRID));
        let controller =
            RelatedController::mount(&full, &location, &settings).expect("controller mounts");
        assert!(!controller.wants_index());
    }
}
