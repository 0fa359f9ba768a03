//! Markdown-to-HTML conversion. The pipeline only needs a single
//! `transform(text) -> html` capability, captured by the [`Markdown`] trait;
//! [`MarkdownExtra`] implements it on top of [`pulldown_cmark`].

use pulldown_cmark::{html, Options, Parser};

/// Converts a complete Markdown document into HTML.
pub trait Markdown {
    fn transform(&self, text: &str) -> String;
}

/// A [`Markdown`] converter with the "extra" syntax enabled: tables,
/// footnotes and definition lists, plus strikethrough and `{#id .class}`
/// heading attributes.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownExtra;

impl MarkdownExtra {
    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_DEFINITION_LIST);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        options
    }
}

impl Markdown for MarkdownExtra {
    fn transform(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(text, Self::options()));
        out
    }
}
