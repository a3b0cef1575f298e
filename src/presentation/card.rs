//! Post card rendering shared by every listing surface.

use crate::domain::{
    badges::BadgeStyle,
    posts::{DateStyle, Post, format_display_date},
};

use super::node::{Element, Node};

#[derive(Debug, Clone, Copy, Default)]
pub struct CardOptions<'a> {
    pub date_style: DateStyle,
    /// Active search query whose occurrences are marked in the title.
    pub highlight: Option<&'a str>,
}

impl<'a> CardOptions<'a> {
    pub fn new(date_style: DateStyle) -> Self {
        Self {
            date_style,
            highlight: None,
        }
    }

    pub fn highlighting(self, query: &'a str) -> Self {
        Self {
            highlight: Some(query),
            ..self
        }
    }
}

pub fn render_card(post: &Post, options: &CardOptions<'_>) -> Node {
    let badge = BadgeStyle::for_subcategory(post.subcategory());

    let meta = Element::new("div")
        .class("post-meta")
        .child(
            Element::new("time")
                .class("post-date")
                .attr("datetime", post.date.as_str())
                .text(format_display_date(&post.date, options.date_style)),
        )
        .child(
            Element::new("span")
                .class(format!("cat-badge {}", badge.class_name()))
                .text(post.badge_label()),
        );

    let link = Element::new("a")
        .attr("href", post.url.as_str())
        .children(title_nodes(&post.title, options.highlight));

    let tags = Element::new("ul")
        .class("post-tags")
        .attr("aria-label", "Tags")
        .children(
            post.tags
                .iter()
                .map(|tag| Element::new("li").class("post-tag").text(tag.as_str()).into()),
        );

    Element::new("article")
        .class("post-item")
        .child(meta)
        .child(Element::new("h3").class("post-title").child(link))
        .child(
            Element::new("p")
                .class("post-excerpt")
                .text(post.excerpt.as_str()),
        )
        .child(tags)
        .into()
}

pub fn render_grid<'p>(
    posts: impl IntoIterator<Item = &'p Post>,
    options: &CardOptions<'_>,
) -> Node {
    Element::new("div")
        .class("posts-grid")
        .children(posts.into_iter().map(|post| render_card(post, options)))
        .into()
}

pub fn empty_state(message: impl Into<String>) -> Node {
    Element::new("p").class("empty-state").text(message).into()
}

fn title_nodes(title: &str, query: Option<&str>) -> Vec<Node> {
    let Some(query) = query else {
        return vec![Node::text(title)];
    };

    highlight(title, query)
        .into_iter()
        .map(|segment| match segment {
            Segment::Plain(text) => Node::text(text),
            Segment::Highlight(text) => Element::new("mark").text(text).into(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Highlight(&'a str),
}

/// Split `text` around every case-insensitive, non-overlapping occurrence of
/// `query`, keeping the original casing of each slice.
///
/// Matching runs on lower-cased characters mapped back to the characters they
/// came from; a match must start and end on an original character boundary.
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return plain_only(text);
    }

    let folded: Vec<(char, usize)> = text
        .char_indices()
        .flat_map(|(offset, ch)| ch.to_lowercase().map(move |lower| (lower, offset)))
        .collect();

    let starts_char = |index: usize| {
        index == 0 || index == folded.len() || folded[index].1 != folded[index - 1].1
    };
    let byte_at = |index: usize| {
        if index == folded.len() {
            text.len()
        } else {
            folded[index].1
        }
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    let mut index = 0;
    while index + needle.len() <= folded.len() {
        let end = index + needle.len();
        let matches = starts_char(index)
            && starts_char(end)
            && folded[index..end]
                .iter()
                .map(|(lower, _)| *lower)
                .eq(needle.iter().copied());

        if !matches {
            index += 1;
            continue;
        }

        let (start_byte, end_byte) = (byte_at(index), byte_at(end));
        if start_byte > cursor {
            segments.push(Segment::Plain(&text[cursor..start_byte]));
        }
        segments.push(Segment::Highlight(&text[start_byte..end_byte]));
        cursor = end_byte;
        index = end;
    }

    if cursor < text.len() {
        segments.push(Segment::Plain(&text[cursor..]));
    }
    segments
}

fn plain_only(text: &str) -> Vec<Segment<'_>> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Segment::Plain(text)]
    }
}
