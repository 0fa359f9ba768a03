//! Fake collaborators for unit tests. [`FakeTemplates`] renders a compact,
//! deterministic summary of the variables it receives, so tests can assert on
//! exactly what the pipeline handed to each template.

use crate::config::{Author, Config};
use crate::markdown::Markdown;
use crate::template::{self, Templates};
use gtmpl::Value;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;

pub fn site_config() -> Config {
    Config {
        source_directory: Some(PathBuf::from("posts")),
        output_directory: Some(PathBuf::from("out")),
        template_directory: Some(PathBuf::from("templates")),
        base_url: Some(String::from("https://example.com/")),
        name: Some(String::from("Example Blog")),
        description: None,
        author: Some(Author {
            name: String::from("John Example"),
            email: Some(String::from("john@example.org")),
        }),
    }
}

/// Wraps the Markdown in brackets instead of converting it.
pub struct FakeMarkdown;

impl Markdown for FakeMarkdown {
    fn transform(&self, text: &str) -> String {
        format!("[{}]", text)
    }
}

pub struct FakeTemplates {
    available: HashSet<&'static str>,
    pub rendered: RefCell<Vec<String>>,
}

impl Default for FakeTemplates {
    fn default() -> Self {
        FakeTemplates::with(&[])
    }
}

impl FakeTemplates {
    /// `post.html` and `page.html` plus the given optional templates.
    pub fn with(optional: &[&'static str]) -> Self {
        let mut available: HashSet<&'static str> = ["post.html", "page.html"].into_iter().collect();
        available.extend(optional.iter().copied());
        FakeTemplates {
            available,
            rendered: RefCell::new(Vec::new()),
        }
    }
}

fn field(value: &Value, key: &str) -> String {
    match value {
        Value::Object(m) => match m.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Nil) | None => String::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| field(item, "url"))
                .collect::<Vec<_>>()
                .join(","),
            Some(other) => format!("{:?}", other),
        },
        _ => String::new(),
    }
}

fn items<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    match value {
        Value::Object(m) => match m.get(key) {
            Some(Value::Array(items)) => items,
            _ => &[],
        },
        _ => &[],
    }
}

impl Templates for FakeTemplates {
    fn render(&self, name: &str, vars: Value) -> template::Result<String> {
        if !self.available.contains(name) {
            return Err(template::Error::NotFound {
                name: name.to_owned(),
                directory: PathBuf::from("fake"),
            });
        }
        self.rendered.borrow_mut().push(name.to_owned());
        Ok(match name {
            "post.html" => format!(
                "post(title={} modified_at={} post={})",
                field(&vars, "title"),
                field(&vars, "modified_at"),
                field(&vars, "post"),
            ),
            "page.html" => format!(
                "page(title={} canonical={} links={} article={})",
                field(&vars, "title"),
                field(&vars, "canonical"),
                field(&vars, "links"),
                field(&vars, "article"),
            ),
            "sitemap.xml" => format!(
                "sitemap({})",
                items(&vars, "urls")
                    .iter()
                    .map(|url| format!(
                        "{}|{}|{}|{}",
                        field(url, "loc"),
                        field(url, "lastmod"),
                        field(url, "priority"),
                        field(url, "changefreq"),
                    ))
                    .collect::<Vec<_>>()
                    .join(";")
            ),
            _ => format!(
                "{}(updated={} entries={})",
                name,
                field(&vars, "updated"),
                field(&vars, "entries"),
            ),
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.available.contains(name)
    }
}
