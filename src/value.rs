//! Conversions from domain types into template [`Value`]s, plus the date
//! formats the templates see.

use crate::config::Author;
use crate::feed::SiteEntry;
use crate::page::Link;
use chrono::{DateTime, SecondsFormat, Utc};
use gtmpl::Value;
use std::collections::HashMap;

/// Builds a [`Value::Object`] from key/value pairs.
pub(crate) fn object<const N: usize>(pairs: [(&str, Value); N]) -> Value {
    let mut m: HashMap<String, Value> = HashMap::with_capacity(N);
    for (key, value) in pairs {
        m.insert(key.to_owned(), value);
    }
    Value::Object(m)
}

pub(crate) fn string<S: Into<String>>(s: S) -> Value {
    Value::String(s.into())
}

/// Absent values become [`Value::Nil`] so `{{if .key}}` works in templates.
pub(crate) fn optional<S: Into<String>>(s: Option<S>) -> Value {
    match s {
        Some(s) => string(s),
        None => Value::Nil,
    }
}

pub(crate) fn array<'a, T: 'a, I>(items: I) -> Value
where
    I: IntoIterator<Item = &'a T>,
    &'a T: Into<Value>,
{
    Value::Array(items.into_iter().map(Into::into).collect())
}

/// `YYYY-MM-DD`, as used by sitemaps and page templates.
pub fn ymd(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// RFC 3339, as used by Atom.
pub fn rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// RFC 2822, as used by RSS.
pub fn rfc2822(date: DateTime<Utc>) -> String {
    date.to_rfc2822()
}

impl From<&Link> for Value {
    /// Converts a navigation [`Link`] into `{url, title}`.
    fn from(link: &Link) -> Value {
        object([("url", string(&link.url)), ("title", string(&link.title))])
    }
}

impl From<&Author> for Value {
    /// Converts an [`Author`] into `{name, email}`.
    fn from(author: &Author) -> Value {
        object([
            ("name", string(&author.name)),
            ("email", optional(author.email.as_deref())),
        ])
    }
}

impl From<&SiteEntry> for Value {
    /// Converts a [`SiteEntry`] into an object usable by both sitemap
    /// (`loc`, `lastmod`, `priority`, `changefreq`) and feed (`url`, `title`,
    /// `updated`, `pub_date`) templates.
    fn from(entry: &SiteEntry) -> Value {
        object([
            ("url", string(&entry.url)),
            ("loc", string(&entry.url)),
            ("title", string(&entry.title)),
            ("lastmod", string(ymd(entry.modified_at))),
            ("updated", string(rfc3339(entry.modified_at))),
            ("pub_date", string(rfc2822(entry.modified_at))),
            ("priority", optional(entry.priority)),
            ("changefreq", optional(entry.changefreq)),
        ])
    }
}
