//! The page's single copy of the post index.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::domain::posts::{Post, parse_index};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("failed to fetch post index from {origin}: {message}")]
    Transport { origin: String, message: String },
    #[error("failed to parse post index from {origin}: {message}")]
    Parse { origin: String, message: String },
}

impl FetchError {
    pub fn transport(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

/// Where the raw index document comes from.
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Human-readable origin used in logs and errors.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

pub type PostIndex = Arc<[Post]>;

/// Loads the index at most once; the first outcome, success or failure, is
/// kept for the lifetime of the page.
pub struct PostStore {
    source: Arc<dyn IndexSource>,
    loaded: OnceCell<Result<PostIndex, FetchError>>,
}

impl PostStore {
    pub fn new(source: Arc<dyn IndexSource>) -> Self {
        Self {
            source,
            loaded: OnceCell::new(),
        }
    }

    pub async fn load(&self) -> Result<PostIndex, FetchError> {
        self.loaded
            .get_or_init(|| self.fetch_index())
            .await
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    async fn fetch_index(&self) -> Result<PostIndex, FetchError> {
        let origin = self.source.describe();
        let outcome = self.source.fetch().await.and_then(|bytes| {
            parse_index(&bytes).map_err(|err| FetchError::parse(origin.clone(), err.to_string()))
        });

        match &outcome {
            Ok(posts) => {
                metrics::counter!("postscope_index_load_total", "outcome" => "ok").increment(1);
                info!(origin = %origin, posts = posts.len(), "post index loaded");
            }
            Err(err) => {
                metrics::counter!("postscope_index_load_total", "outcome" => "error").increment(1);
                warn!(origin = %origin, error = %err, "post index failed to load");
            }
        }

        outcome.map(PostIndex::from)
    }
}
