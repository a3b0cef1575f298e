//! Pure filtering, ranking and grouping over the post index.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::posts::{Post, normalize_url};

pub const RELATED_LIMIT: usize = 3;

/// Category constraint; empty values match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

impl CategoryFilter {
    pub fn new(category: Option<&str>, subcategory: Option<&str>) -> Self {
        let clean = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|inner| !inner.is_empty())
                .map(str::to_string)
        };
        Self {
            category: clean(category),
            subcategory: clean(subcategory),
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| post.category == category);
        let subcategory_ok = self
            .subcategory
            .as_deref()
            .is_none_or(|subcategory| post.subcategory() == Some(subcategory));
        category_ok && subcategory_ok
    }
}

pub fn filter_by_category<'p>(posts: &'p [Post], filter: &CategoryFilter) -> Vec<&'p Post> {
    posts.iter().filter(|post| filter.matches(post)).collect()
}

/// Exact, case-sensitive tag membership.
pub fn filter_by_tag<'p>(posts: &'p [Post], tag: &str) -> Vec<&'p Post> {
    posts.iter().filter(|post| post.has_tag(tag)).collect()
}

/// Result of a free-text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<'p> {
    /// No query after trimming; nothing is rendered.
    Inactive,
    Empty { query: String },
    Matches { query: String, posts: Vec<&'p Post> },
}

impl SearchOutcome<'_> {
    pub fn query(&self) -> Option<&str> {
        match self {
            SearchOutcome::Inactive => None,
            SearchOutcome::Empty { query } | SearchOutcome::Matches { query, .. } => Some(query),
        }
    }

    pub fn match_count(&self) -> usize {
        match self {
            SearchOutcome::Matches { posts, .. } => posts.len(),
            _ => 0,
        }
    }
}

pub fn search<'p>(posts: &'p [Post], query: &str) -> SearchOutcome<'p> {
    let query = query.trim();
    if query.is_empty() {
        return SearchOutcome::Inactive;
    }

    let needle = query.to_lowercase();
    let matched: Vec<&Post> = posts
        .iter()
        .filter(|post| text_matches(post, &needle))
        .collect();

    if matched.is_empty() {
        SearchOutcome::Empty {
            query: query.to_string(),
        }
    } else {
        SearchOutcome::Matches {
            query: query.to_string(),
            posts: matched,
        }
    }
}

fn text_matches(post: &Post, needle: &str) -> bool {
    post.title.to_lowercase().contains(needle)
        || post.excerpt.to_lowercase().contains(needle)
        || post
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Stable newest-first ordering on the raw ISO date string.
pub fn sort_newest_first(posts: &mut [&Post]) {
    posts.sort_by(|left, right| right.date.cmp(&left.date));
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostGroup<'p> {
    /// `None` collects posts without a subcategory.
    pub subcategory: Option<String>,
    pub posts: Vec<&'p Post>,
}

impl PostGroup<'_> {
    pub fn label(&self) -> &str {
        self.subcategory.as_deref().unwrap_or("other")
    }
}

/// Partition posts by subcategory: preferred keys first (when present), then
/// the remaining subcategories in first-seen order, then unclassified posts.
pub fn group_by_subcategory<'p>(posts: &[&'p Post], preferred: &[String]) -> Vec<PostGroup<'p>> {
    let mut seen: Vec<Option<String>> = Vec::new();
    for post in posts {
        let key = post.subcategory.clone();
        if !seen.contains(&key) {
            seen.push(key);
        }
    }

    let mut order: Vec<Option<String>> = preferred
        .iter()
        .filter(|key| seen.iter().any(|candidate| candidate.as_deref() == Some(key.as_str())))
        .map(|key| Some(key.clone()))
        .collect();
    for key in &seen {
        if key.is_some() && !order.contains(key) {
            order.push(key.clone());
        }
    }
    if seen.contains(&None) {
        order.push(None);
    }

    order
        .into_iter()
        .map(|key| PostGroup {
            posts: posts
                .iter()
                .copied()
                .filter(|post| post.subcategory == key)
                .collect(),
            subcategory: key,
        })
        .collect()
}

/// Rank posts sharing tags with the current one.
///
/// The current post is excluded by URL (trailing slashes ignored). Ranking is
/// by shared-tag count, then by calendar date, both descending; unparseable
/// dates rank oldest.
pub fn related_posts<'p>(
    posts: &'p [Post],
    current_tags: &[String],
    current_url: &str,
    limit: usize,
) -> Vec<&'p Post> {
    if current_tags.is_empty() {
        return Vec::new();
    }

    let current = normalize_url(current_url);
    let shared = |post: &Post| {
        post.tags
            .iter()
            .filter(|tag| current_tags.contains(tag))
            .count()
    };

    let mut ranked: Vec<(usize, &Post)> = posts
        .iter()
        .filter(|post| post.normalized_url() != current)
        .map(|post| (shared(post), post))
        .filter(|(count, _)| *count > 0)
        .collect();

    ranked.sort_by(|(left_count, left), (right_count, right)| {
        right_count
            .cmp(left_count)
            .then_with(|| compare_dates_desc(left, right))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(_, post)| post)
        .collect()
}

fn compare_dates_desc(left: &Post, right: &Post) -> Ordering {
    right.calendar_date().cmp(&left.calendar_date())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Distinct tags with the number of posts carrying them, alphabetical.
pub fn tag_cloud(posts: &[Post]) -> Vec<TagCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect()
}

/// Post count per subcategory key, in the order the keys are given.
pub fn subcategory_counts(posts: &[&Post], keys: &[&str]) -> Vec<(String, usize)> {
    keys.iter()
        .map(|key| {
            let count = posts
                .iter()
                .filter(|post| post.subcategory() == Some(*key))
                .count();
            (key.to_string(), count)
        })
        .collect()
}
