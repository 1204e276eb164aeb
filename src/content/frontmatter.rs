//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::FrontMatterError;

/// Custom deserializer that accepts any YAML/JSON scalar as a string
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ScalarString;

    impl<'de> Visitor<'de> for ScalarString {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ScalarString)
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string", default)]
    pub title: Option<String>,

    /// Kept as a raw value: YAML timestamps, plain strings and junk all land here
    pub date: Option<serde_yaml::Value>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some(first_line) = content.split_inclusive('\n').next() else {
            return Ok((FrontMatter::default(), content));
        };

        match first_line.trim_end() {
            "---" => Self::parse_yaml(content, first_line.len()),
            ";;;" => Self::parse_json(content, first_line.len()),
            // No front-matter found
            _ => Ok((FrontMatter::default(), content)),
        }
    }

    fn parse_yaml(content: &str, start: usize) -> Result<(Self, &str), FrontMatterError> {
        let (yaml_content, remaining) = split_block(content, start, &["---", "..."])
            .ok_or(FrontMatterError::Unclosed("---"))?;

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm: FrontMatter = serde_yaml::from_str(yaml_content)?;
        Ok((fm, remaining))
    }

    fn parse_json(content: &str, start: usize) -> Result<(Self, &str), FrontMatterError> {
        let (json_content, remaining) =
            split_block(content, start, &[";;;"]).ok_or(FrontMatterError::Unclosed(";;;"))?;

        if json_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm: FrontMatter = serde_json::from_str(json_content)?;
        Ok((fm, remaining))
    }

    /// Resolve the calendar date of the post, if the front-matter carries one
    pub fn parse_date(&self) -> Option<NaiveDate> {
        match self.date.as_ref()? {
            serde_yaml::Value::String(s) => parse_date_string(s),
            _ => None,
        }
    }
}

/// Split `content[start..]` at the first line equal to one of `closers`.
/// Returns (block, remaining_content)
fn split_block<'a>(content: &'a str, start: usize, closers: &[&str]) -> Option<(&'a str, &'a str)> {
    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        if closers.contains(&line.trim_end()) {
            let block = &content[start..offset];
            let remaining = content[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Some((block, remaining));
        }
        offset += line.len();
    }
    None
}

/// Parse a plain `YYYY-MM-DD` date, or the date part of a YAML timestamp
fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }

    let timestamp_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in timestamp_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}
