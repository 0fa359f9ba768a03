//! Discovers post sources and puts them into canonical order. Authors prefix
//! source files with a running number (`1-first.md`, `2-second.md`, ...);
//! files are sorted naturally on that name and then reversed so the
//! highest-numbered (newest) post comes first. The resulting order drives the
//! index page, the navigation list and the feeds.

use crate::post::{self, Post, INDEX_PAGE};
use log::debug;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The suffix of post source files.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Lists the Markdown files directly inside `source_directory` (no recursion)
/// in canonical order. Hidden files are skipped. Fails with
/// [`Error::NoContent`] if there are none.
pub fn discover(source_directory: &Path) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for result in WalkDir::new(source_directory).min_depth(1).max_depth(1) {
        let entry = result?;
        let file_name = entry.file_name().to_string_lossy();
        if entry.file_type().is_file()
            && !file_name.starts_with('.')
            && file_name.ends_with(MARKDOWN_EXTENSION)
        {
            sources.push(entry.into_path());
        }
    }

    if sources.is_empty() {
        return Err(Error::NoContent {
            directory: source_directory.to_owned(),
        });
    }

    canonical_order(&mut sources);
    Ok(sources)
}

/// Sorts `sources` naturally by file name, then reverses them.
pub fn canonical_order(sources: &mut [PathBuf]) {
    sources.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    sources.reverse();
}

fn file_name(path: &Path) -> std::borrow::Cow<'_, str> {
    match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => path.to_string_lossy(),
    }
}

/// Loads a [`Post`] for each source, preserving order. Fails with
/// [`Error::DuplicateSlug`] as soon as two posts derive the same output
/// filename, or a post derives [`INDEX_PAGE`].
pub fn parse_posts(sources: &[PathBuf]) -> Result<Vec<Post>> {
    let mut seen: HashSet<String> = HashSet::with_capacity(sources.len() + 1);
    seen.insert(INDEX_PAGE.to_owned());
    let mut posts = Vec::with_capacity(sources.len());
    for source in sources {
        let post = Post::load(source)?;
        debug!(
            "loaded `{}` as {}",
            source.display(),
            post.output_filename()
        );
        if !seen.insert(post.output_filename().to_owned()) {
            return Err(Error::DuplicateSlug {
                title: post.title().to_owned(),
                filename: post.output_filename().to_owned(),
            });
        }
        posts.push(post);
    }
    Ok(posts)
}

/// Compares two strings the way a person would: runs of ASCII digits compare
/// by numeric value (`9` < `10`, leading zeros ignored) and everything else
/// compares character by character. Strings that are equal under those rules
/// fall back to plain comparison so the order is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut left, mut right) = (a, b);
    loop {
        match (left.chars().next(), right.chars().next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let (l_digits, l_rest) = split_digits(left);
                let (r_digits, r_rest) = split_digits(right);
                match compare_numbers(l_digits, r_digits) {
                    Ordering::Equal => {
                        left = l_rest;
                        right = r_rest;
                    }
                    ordering => return ordering,
                }
            }
            (Some(l), Some(r)) => match l.cmp(&r) {
                Ordering::Equal => {
                    left = &left[l.len_utf8()..];
                    right = &right[r.len_utf8()..];
                }
                ordering => return ordering,
            },
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

// Compares two digit runs by value without parsing, so arbitrarily long runs
// can't overflow.
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Represents the result of discovering and loading posts.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error discovering or loading posts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the source directory holds no Markdown files.
    #[error("no Markdown files found in `{}`", directory.display())]
    NoContent { directory: PathBuf },

    /// Returned when two posts would be written to the same file.
    #[error("titles resulting in identical filenames found: \"{title}\" ({filename})")]
    DuplicateSlug { title: String, filename: String },

    /// Returned when a post can't be loaded.
    #[error(transparent)]
    Post(#[from] post::Error),

    /// Returned when the source directory can't be listed.
    #[error("listing post sources")]
    Discover(#[from] walkdir::Error),
}
