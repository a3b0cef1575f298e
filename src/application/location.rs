//! Page location and same-document history.
//!
//! Controllers mirror their predicate state into the query string without
//! navigating. Writes either push a new history entry or replace the current
//! one; the page never reloads.

use tracing::debug;
use url::Url;

const LOCAL_ORIGIN: &str = "http://localhost/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    entries: Vec<Url>,
}

impl Location {
    /// Parse an absolute URL, or a path (with optional query) relative to a
    /// local origin.
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(LOCAL_ORIGIN)?.join(raw)?,
            Err(err) => return Err(err),
        };
        Ok(Self::from_url(url))
    }

    pub fn from_url(url: Url) -> Self {
        Self { entries: vec![url] }
    }

    pub fn url(&self) -> &Url {
        // `entries` is never empty: it is seeded on construction and only grows.
        &self.entries[self.entries.len() - 1]
    }

    fn url_mut(&mut self) -> &mut Url {
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn path(&self) -> &str {
        self.url().path()
    }

    /// Path plus query, as shown in the address bar of a same-origin page.
    pub fn relative(&self) -> String {
        match self.url().query() {
            Some(query) => format!("{}?{}", self.path(), query),
            None => self.path().to_string(),
        }
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url()
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Set (`Some`) or remove (`None`) a query parameter.
    ///
    /// An existing parameter keeps its position; duplicates are dropped. An
    /// empty value removes the parameter.
    pub fn set_query_param(&mut self, name: &str, value: Option<&str>, mode: HistoryMode) {
        let value = value.filter(|inner| !inner.is_empty());
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut replaced = false;
        for (key, existing) in self.url().query_pairs() {
            if key != name {
                pairs.push((key.into_owned(), existing.into_owned()));
            } else if !replaced {
                replaced = true;
                if let Some(value) = value {
                    pairs.push((key.into_owned(), value.to_string()));
                }
            }
        }
        if !replaced {
            if let Some(value) = value {
                pairs.push((name.to_string(), value.to_string()));
            }
        }

        let mut next = self.url().clone();
        if pairs.is_empty() {
            next.set_query(None);
        } else {
            next.query_pairs_mut().clear().extend_pairs(pairs);
        }

        debug!(param = name, url = %next, ?mode, "location updated");
        match mode {
            HistoryMode::Push => self.entries.push(next),
            HistoryMode::Replace => *self.url_mut() = next,
        }
    }

    /// Number of history entries created on this page, the initial one included.
    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    pub fn history(&self) -> &[Url] {
        &self.entries
    }
}
