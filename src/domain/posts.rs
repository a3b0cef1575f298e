use serde::{Deserialize, Deserializer};
use time::{Date, Month, format_description::FormatItem, macros::format_description};

const URL_BASE: &str = "http://localhost/";

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// One entry of the published post index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    pub title: String,
    pub excerpt: String,
    /// ISO-style calendar date, kept verbatim.
    pub date: String,
    pub url: String,
    pub category: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub subcategory: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

impl Post {
    pub fn subcategory(&self) -> Option<&str> {
        self.subcategory.as_deref()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    /// Label shown on the card badge.
    pub fn badge_label(&self) -> &str {
        self.subcategory().unwrap_or(&self.category)
    }

    pub fn calendar_date(&self) -> Option<Date> {
        parse_calendar_date(&self.date)
    }

    pub fn normalized_url(&self) -> String {
        normalize_url(&self.url)
    }
}

/// How card dates are displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateStyle {
    #[default]
    Iso,
    Human,
}

impl DateStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "iso" => Some(Self::Iso),
            "human" => Some(Self::Human),
            _ => None,
        }
    }
}

pub fn format_display_date(raw: &str, style: DateStyle) -> String {
    match style {
        DateStyle::Iso => raw.to_string(),
        DateStyle::Human => parse_calendar_date(raw)
            .and_then(|date| date.format(HUMAN_DATE_FORMAT).ok())
            .unwrap_or_else(|| raw.to_string()),
    }
}

/// Lenient `YYYY-M-D` parse; a time suffix after `T` or a space is ignored.
pub fn parse_calendar_date(raw: &str) -> Option<Date> {
    let day_part = raw.trim().split(['T', ' ']).next()?;
    let mut parts = day_part.splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = parts.next()?.parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

/// Reduce a post or page URL to its percent-encoded path without trailing
/// slashes. Relative URLs resolve against a fixed local origin.
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    let path = match url::Url::parse(URL_BASE).and_then(|base| base.join(raw)) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => raw.to_string(),
    };
    path.trim_end_matches('/').to_string()
}

/// Parse the JSON index document (an array of post records).
pub fn parse_index(bytes: &[u8]) -> Result<Vec<Post>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|inner| !inner.trim().is_empty()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default_when_absent() {
        let posts = parse_index(
            br#"[{"title":"t","excerpt":"e","date":"2024-01-02","url":"/p/","category":"c"}]"#,
        )
        .expect("index parses");

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].subcategory, None);
        assert!(posts[0].tags.is_empty());
        assert_eq!(posts[0].badge_label(), "c");
    }

    #[test]
    fn null_tags_and_blank_subcategory_are_treated_as_absent() {
        let posts = parse_index(
            br#"[{"title":"t","excerpt":"e","date":"2024-01-02","url":"/p/","category":"c","subcategory":"","tags":null}]"#,
        )
        .expect("index parses");

        assert_eq!(posts[0].subcategory, None);
        assert!(posts[0].tags.is_empty());
    }

    #[test]
    fn missing_required_field_fails_the_whole_index() {
        let result = parse_index(br#"[{"excerpt":"e","date":"2024-01-02","url":"/p/","category":"c"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn calendar_dates_tolerate_missing_padding_and_time_suffix() {
        let expected = Date::from_calendar_date(2024, Month::March, 5).expect("valid date");
        assert_eq!(parse_calendar_date("2024-3-5"), Some(expected));
        assert_eq!(parse_calendar_date("2024-03-05T10:00:00Z"), Some(expected));
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date("2024-02-30"), None);
    }

    #[test]
    fn human_dates_fall_back_to_the_raw_value() {
        assert_eq!(
            format_display_date("2024-03-05", DateStyle::Human),
            "March 5, 2024"
        );
        assert_eq!(format_display_date("soon", DateStyle::Human), "soon");
        assert_eq!(format_display_date("2024-03-05", DateStyle::Iso), "2024-03-05");
    }

    #[test]
    fn urls_normalize_to_paths_without_trailing_slash() {
        assert_eq!(normalize_url("/posts/intro/"), "/posts/intro");
        assert_eq!(normalize_url("/posts/intro"), "/posts/intro");
        assert_eq!(normalize_url("https://example.com/posts/intro/"), "/posts/intro");
    }

    #[test]
    fn relative_and_absolute_urls_share_one_encoding() {
        assert_eq!(normalize_url("/posts/café/"), "/posts/caf%C3%A9");
        assert_eq!(normalize_url("/posts/caf%C3%A9"), "/posts/caf%C3%A9");
        assert_eq!(normalize_url("/posts/two words/"), "/posts/two%20words");
        assert_eq!(
            normalize_url("https://example.com/posts/café/"),
            normalize_url("/posts/café")
        );
    }
}
