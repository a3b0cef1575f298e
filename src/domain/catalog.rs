//! Category tiles and grouping preferences for the category pages.

use serde::Deserialize;

pub const DEFAULT_TILED_CATEGORY: &str = "cybersecurity";
pub const DEFAULT_MAX_FILTER_LEN: usize = 30;

/// A clickable shortcut filtering the tiled page down to one subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tile {
    pub filter: String,
    pub label: String,
}

impl Tile {
    pub fn new(filter: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub tiled_category: String,
    pub tiles: Vec<Tile>,
    pub preferred_groups: Vec<String>,
    pub max_filter_len: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            tiled_category: DEFAULT_TILED_CATEGORY.to_string(),
            tiles: default_tiles(),
            preferred_groups: vec!["writeups".to_string(), "cheatsheets".to_string()],
            max_filter_len: DEFAULT_MAX_FILTER_LEN,
        }
    }
}

impl Catalog {
    pub fn tile(&self, filter: &str) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.filter == filter)
    }

    /// Accept a raw `filter` query value only when it names a known tile.
    pub fn accept_filter(&self, raw: &str) -> Option<String> {
        let clamped: String = raw.trim().chars().take(self.max_filter_len).collect();
        self.tile(&clamped).map(|tile| tile.filter.clone())
    }

    pub fn tile_keys(&self) -> Vec<&str> {
        self.tiles.iter().map(|tile| tile.filter.as_str()).collect()
    }
}

pub fn default_tiles() -> Vec<Tile> {
    vec![
        Tile::new("ctf", "Writeups CTF"),
        Tile::new("labs", "Labs"),
        Tile::new("malware", "Malware Analysis"),
        Tile::new("cheatsheets", "Cheatsheets"),
    ]
}
