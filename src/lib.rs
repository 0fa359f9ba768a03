//! The library code for the `oblog` static blog generator. A run turns a flat
//! directory of Markdown posts into one HTML page per post, an `index.html`
//! duplicating the latest public post, and optionally a sitemap and Atom/RSS
//! feeds. It happens in three steps:
//!
//! 1. Loading posts from source files on disk ([`crate::parser`],
//!    [`crate::post`])
//! 2. Planning every output file ([`crate::build::plan_site`]), which renders
//!    each post through the `post.html` and `page.html` templates
//!    ([`crate::page`]) and assembles the sitemap and feeds
//!    ([`crate::feed`])
//! 3. Writing the plan to disk ([`crate::write`])
//!
//! A post's title is the first line of its source file. Titles containing
//! `+DRAFT+` mark drafts: they're still rendered, but under a filename nobody
//! can guess, and nothing links to them.
//!
//! Markdown conversion and templating sit behind the [`markdown::Markdown`]
//! and [`template::Templates`] traits.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod feed;
pub mod markdown;
pub mod page;
pub mod parser;
pub mod post;
pub mod template;
pub mod value;
pub mod write;

#[cfg(test)]
mod test_helpers;
