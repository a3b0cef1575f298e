//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::{
    controllers::search::{DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_QUERY_LEN},
    page::PageSettings,
};
use crate::domain::{
    catalog::{Catalog, Tile},
    posts::DateStyle,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "postscope";
const ENV_PREFIX: &str = "POSTSCOPE";

/// Command-line arguments for the postscope binary.
#[derive(Debug, Parser)]
#[command(
    name = "postscope",
    version,
    about = "Post index filtering and rendering for static blogs"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "POSTSCOPE_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Fetch the post index over HTTP from this URL.
    #[arg(long = "index-url", value_name = "URL", global = true)]
    pub index_url: Option<String>,

    /// Read the post index from a local file.
    #[arg(
        long = "index-path",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub index_path: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run one page template against the index and print the result.
    Render(RenderArgs),
    /// Load the index and print summary counts.
    Inspect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageKind {
    /// Tiled category landing page.
    Category,
    /// Plain category or subcategory listing.
    Listing,
    Search,
    Tags,
    /// A single post with its related-posts section.
    Related,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Page template to mount.
    #[arg(value_enum)]
    pub page: PageKind,

    /// Page URL, absolute or site-relative, including its query string.
    #[arg(long, value_name = "URL", default_value = "/")]
    pub location: String,

    /// `data-category` of the listing container.
    #[arg(long, value_name = "NAME")]
    pub category: Option<String>,

    /// `data-subcategory` of the listing container.
    #[arg(long, value_name = "NAME")]
    pub subcategory: Option<String>,

    /// Tag shown on the current post (repeatable).
    #[arg(long = "current-tag", value_name = "TAG")]
    pub current_tags: Vec<String>,

    /// Text typed into the search box, one value per keystroke batch.
    #[arg(long = "type", value_name = "TEXT")]
    pub typed: Vec<String>,

    /// Delegated click on a tile or tag with this data value (repeatable).
    #[arg(long, value_name = "VALUE")]
    pub click: Vec<String>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub index: IndexSettings,
    pub logging: LoggingSettings,
    pub search: SearchSettings,
    pub render: RenderSettings,
    pub catalog: Catalog,
}

impl Settings {
    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            debounce: self.search.debounce,
            max_query_len: self.search.max_query_len,
            date_style: self.render.date_style,
            catalog: self.catalog.clone(),
        }
    }
}

/// Where the post index lives; exactly one source is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSettings {
    Url(Url),
    Path(PathBuf),
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub max_query_len: usize,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub date_style: DateStyle,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    index: RawIndexSettings,
    logging: RawLoggingSettings,
    search: RawSearchSettings,
    render: RawRenderSettings,
    catalog: RawCatalogSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        // A source given on the command line replaces whichever one the
        // files configured.
        if let Some(url) = overrides.index_url.as_ref() {
            self.index.url = Some(url.clone());
            self.index.path = None;
        }
        if let Some(path) = overrides.index_path.as_ref() {
            self.index.path = Some(path.clone());
            if overrides.index_url.is_none() {
                self.index.url = None;
            }
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            index,
            logging,
            search,
            render,
            catalog,
        } = raw;

        Ok(Self {
            index: build_index_settings(index)?,
            logging: build_logging_settings(logging)?,
            search: build_search_settings(search)?,
            render: build_render_settings(render)?,
            catalog: build_catalog(catalog)?,
        })
    }
}

fn build_index_settings(index: RawIndexSettings) -> Result<IndexSettings, LoadError> {
    let url = index.url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });
    let path = index.path.filter(|path| !path.as_os_str().is_empty());

    match (url, path) {
        (Some(url), None) => Url::parse(&url)
            .map(IndexSettings::Url)
            .map_err(|err| LoadError::invalid("index.url", format!("failed to parse: {err}"))),
        (None, Some(path)) => Ok(IndexSettings::Path(path)),
        (Some(_), Some(_)) => Err(LoadError::invalid(
            "index",
            "set only one of `index.url` and `index.path`",
        )),
        (None, None) => Err(LoadError::invalid(
            "index",
            "one of `index.url` or `index.path` is required",
        )),
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_search_settings(search: RawSearchSettings) -> Result<SearchSettings, LoadError> {
    let debounce_ms = search.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS);
    if debounce_ms == 0 {
        return Err(LoadError::invalid(
            "search.debounce_ms",
            "must be greater than zero",
        ));
    }

    let max_query_len = search.max_query_len.unwrap_or(DEFAULT_MAX_QUERY_LEN);
    if max_query_len == 0 {
        return Err(LoadError::invalid(
            "search.max_query_len",
            "must be greater than zero",
        ));
    }

    Ok(SearchSettings {
        debounce: Duration::from_millis(debounce_ms),
        max_query_len,
    })
}

fn build_render_settings(render: RawRenderSettings) -> Result<RenderSettings, LoadError> {
    let date_style = match render.date_style {
        Some(value) => DateStyle::parse(&value).ok_or_else(|| {
            LoadError::invalid("render.date_style", format!("unknown style `{value}`"))
        })?,
        None => DateStyle::default(),
    };

    Ok(RenderSettings { date_style })
}

fn build_catalog(catalog: RawCatalogSettings) -> Result<Catalog, LoadError> {
    let defaults = Catalog::default();

    let tiled_category = match catalog.tiled_category {
        Some(value) if value.trim().is_empty() => {
            return Err(LoadError::invalid(
                "catalog.tiled_category",
                "must not be empty",
            ));
        }
        Some(value) => value.trim().to_string(),
        None => defaults.tiled_category,
    };

    let tiles = catalog.tiles.unwrap_or(defaults.tiles);
    if tiles
        .iter()
        .any(|tile| tile.filter.trim().is_empty() || tile.label.trim().is_empty())
    {
        return Err(LoadError::invalid(
            "catalog.tiles",
            "every tile needs a filter and a label",
        ));
    }

    let max_filter_len = catalog.max_filter_len.unwrap_or(defaults.max_filter_len);
    if max_filter_len == 0 {
        return Err(LoadError::invalid(
            "catalog.max_filter_len",
            "must be greater than zero",
        ));
    }
    if let Some(tile) = tiles
        .iter()
        .find(|tile| tile.filter.chars().count() > max_filter_len)
    {
        return Err(LoadError::invalid(
            "catalog.tiles",
            format!("filter `{}` exceeds max_filter_len", tile.filter),
        ));
    }

    Ok(Catalog {
        tiled_category,
        tiles,
        preferred_groups: catalog
            .preferred_groups
            .unwrap_or(defaults.preferred_groups),
        max_filter_len,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawIndexSettings {
    url: Option<String>,
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSearchSettings {
    debounce_ms: Option<u64>,
    max_query_len: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    date_style: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCatalogSettings {
    tiled_category: Option<String>,
    tiles: Option<Vec<Tile>>,
    preferred_groups: Option<Vec<String>>,
    max_filter_len: Option<usize>,
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
