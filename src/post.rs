//! Defines the [`Post`] type and the rules for deriving a post's output
//! filename from its title. A post is backed by a single Markdown source file
//! whose first line is the title. Titles containing [`DRAFT_MARKER`] mark the
//! post as a draft: it is still rendered, but at an obscured filename, and it
//! is left out of navigation, the sitemap and the feeds.

use crate::markdown::Markdown;
use chrono::{DateTime, Utc};
use sha1::{Digest, Sha1};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// If this token appears anywhere in a post's title, the post is a draft.
pub const DRAFT_MARKER: &str = "+DRAFT+";

/// The extension of every rendered page.
pub const HTML_EXTENSION: &str = ".html";

/// The home page's filename. It duplicates the latest public post's page, so
/// no post may claim it.
pub const INDEX_PAGE: &str = "index.html";

/// The rendered body of a post. Rendering happens at most once per [`Post`].
#[derive(Debug)]
enum Html {
    Unrendered,
    Rendered(String),
}

/// One blog entry.
#[derive(Debug)]
pub struct Post {
    /// The Markdown file backing the post.
    source_path: PathBuf,

    /// The full, raw Markdown source, title line included.
    markdown: String,

    /// The first line of the source, verbatim (including any draft marker).
    title: String,

    /// The source file's last-modified time.
    modified_at: SystemTime,

    /// `false` when the title contains [`DRAFT_MARKER`].
    is_public: bool,

    /// See [`derive_filename`].
    output_filename: String,

    html: Html,
}

impl Post {
    /// Reads a post from `source_path`. Fails with [`Error::SourceRead`] if
    /// the file can't be read or its modification time can't be determined.
    pub fn load(source_path: &Path) -> Result<Post> {
        let read_error = |source| Error::SourceRead {
            path: source_path.to_owned(),
            source,
        };
        let markdown = fs::read_to_string(source_path).map_err(read_error)?;
        let modified_at = fs::metadata(source_path)
            .and_then(|metadata| metadata.modified())
            .map_err(read_error)?;
        Ok(Post::new(source_path.to_owned(), markdown, modified_at))
    }

    /// Builds a post from already-read parts. The title, draft flag and
    /// output filename are derived here, once.
    pub fn new(source_path: PathBuf, markdown: String, modified_at: SystemTime) -> Post {
        let title = match markdown.find('\n') {
            Some(end) => markdown[..end].to_owned(),
            None => markdown.clone(),
        };
        let is_public = !title.contains(DRAFT_MARKER);
        let output_filename = derive_filename(&title, is_public);
        Post {
            source_path,
            markdown,
            title,
            modified_at,
            is_public,
            output_filename,
            html: Html::Unrendered,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn output_filename(&self) -> &str {
        &self.output_filename
    }

    pub fn modified_at(&self) -> SystemTime {
        self.modified_at
    }

    /// The modification time as a UTC date-time, for feeds and the sitemap.
    pub fn modified_date(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.modified_at)
    }

    /// Returns the post's HTML body, converting the raw Markdown with
    /// `markdown` on first access. Later calls return the cached result and
    /// never call `markdown` again.
    pub fn html(&mut self, markdown: &dyn Markdown) -> &str {
        if let Html::Unrendered = self.html {
            self.html = Html::Rendered(markdown.transform(&self.markdown));
        }
        let Html::Rendered(html) = &self.html else {
            return "";
        };
        html
    }
}

/// Derives a URL-safe output filename from a post title:
///
/// 1. lower-case the title (Unicode-aware);
/// 2. transliterate to ASCII, dropping characters with no equivalent;
/// 3. replace each run of characters that are neither letters nor digits
///    with a single `-`;
/// 4. for drafts, append `-` and the hex SHA-1 of the raw title (the
///    `-` is shared with a trailing one from step 3, never doubled);
/// 5. append [`HTML_EXTENSION`].
///
/// The result depends only on `title` and `is_public`.
pub fn derive_filename(title: &str, is_public: bool) -> String {
    let ascii = deunicode::deunicode_with_tofu(&title.to_lowercase(), "");

    let mut filename = String::with_capacity(ascii.len() + HTML_EXTENSION.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            filename.push(c.to_ascii_lowercase());
        } else if !filename.ends_with('-') {
            filename.push('-');
        }
    }

    if !is_public {
        if !filename.ends_with('-') {
            filename.push('-');
        }
        filename.push_str(&hex::encode(Sha1::digest(title.as_bytes())));
    }
    filename.push_str(HTML_EXTENSION);
    filename
}

/// Represents the result of loading a [`Post`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Post`] from disk.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a source file can't be read or its modification time
    /// is unavailable.
    #[error("reading post source `{}`", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;
    use std::time::{Duration, UNIX_EPOCH};

    struct CountingMarkdown {
        calls: Cell<usize>,
    }

    impl Markdown for CountingMarkdown {
        fn transform(&self, text: &str) -> String {
            self.calls.set(self.calls.get() + 1);
            format!("<p>{}</p>", text)
        }
    }

    fn post(markdown: &str) -> Post {
        Post::new(
            PathBuf::from("1-post.md"),
            markdown.to_owned(),
            UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        )
    }

    #[test]
    fn test_title_is_first_line_verbatim() {
        let p = post("  Hello, *World*  \nbody\nmore");
        assert_eq!("  Hello, *World*  ", p.title());
        assert!(p.is_public());
    }

    #[test]
    fn test_title_without_newline() {
        assert_eq!("Only a title", post("Only a title").title());
    }

    #[test]
    fn test_draft_marker_anywhere_in_title() {
        assert!(!post("My Secret +DRAFT+\nbody").is_public());
        assert!(!post("+DRAFT+ early\nbody").is_public());
        assert!(post("Not a draft\n+DRAFT+ in the body").is_public());
    }

    #[test]
    fn test_derive_filename_public() {
        assert_eq!("hello-world.html", derive_filename("Hello, World", true));
        assert_eq!("hello-world-.html", derive_filename("Hello  World!!", true));
        assert_eq!("2021-in-review.html", derive_filename("2021 in review", true));
    }

    #[test]
    fn test_derive_filename_transliterates() {
        assert_eq!("creme-brulee.html", derive_filename("Crème Brûlée", true));
        assert_eq!("strasse.html", derive_filename("STRAßE", true));
    }

    #[test]
    fn test_derive_filename_collapses_dashes() {
        assert_eq!("a-b.html", derive_filename("a -- - b", true));
        assert_eq!("-leading.html", derive_filename("--leading", true));
    }

    #[test]
    fn test_derive_filename_is_deterministic() {
        for title in ["Hello", "Ünïcödé title", "日本語のタイトル", "", "a+DRAFT+b"] {
            assert_eq!(derive_filename(title, true), derive_filename(title, true));
            assert_eq!(derive_filename(title, false), derive_filename(title, false));
        }
    }

    #[test]
    fn test_derive_filename_charset() {
        for title in ["Ωmega & alpha", "日本語のタイトル", "tab\there", "emoji 🎉 post", "--x--"] {
            let filename = derive_filename(title, true);
            let stem = filename.strip_suffix(HTML_EXTENSION).unwrap();
            assert!(!stem.contains("--"), "{:?} -> {:?}", title, filename);
            assert!(
                stem.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "{:?} -> {:?}",
                title,
                filename
            );
        }
    }

    #[test]
    fn test_draft_filename_has_sha1_of_raw_title() {
        let title = "My Secret +DRAFT+";
        let filename = derive_filename(title, false);
        let digest = hex::encode(Sha1::digest(title.as_bytes()));
        assert_eq!(40, digest.len());
        assert_eq!(format!("my-secret-draft-{}.html", digest), filename);
        assert!(!filename.contains("--"));
    }

    #[test]
    fn test_drafts_with_same_slug_differ() {
        let a = derive_filename("Same Title +DRAFT+", false);
        let b = derive_filename("same title +DRAFT+", false);
        assert_ne!(a, b);
        assert_eq!(
            derive_filename("Same Title +DRAFT+", true),
            derive_filename("same title +DRAFT+", true)
        );
    }

    #[test]
    fn test_html_is_rendered_once() {
        let markdown = CountingMarkdown {
            calls: Cell::new(0),
        };
        let mut p = post("Title\n\nBody");
        let first = p.html(&markdown).to_owned();
        let second = p.html(&markdown).to_owned();
        assert_eq!(first, second);
        assert_eq!("<p>Title\n\nBody</p>", first);
        assert_eq!(1, markdown.calls.get());
    }

    #[test]
    fn test_load_missing_file() {
        match Post::load(Path::new("./does/not/exist.md")) {
            Err(Error::SourceRead { path, .. }) => {
                assert_eq!(PathBuf::from("./does/not/exist.md"), path)
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.title().to_owned())),
        }
    }
}
