//! Run configuration. A [`Config`] is built once, usually from an
//! `oblog.yaml` project file, and validated into a [`Site`] at the start of
//! [`crate::build::build_site`]. For example:
//!
//! ```yaml
//! source_directory: posts
//! output_directory: public
//! template_directory: templates
//! base_url: https://example.com/
//! name: Example Blog
//! description: Notes and such
//! author:
//!   name: John Example
//!   email: john@example.org
//! ```
//!
//! Relative paths in a project file are resolved against the directory that
//! contains it.

use serde::Deserialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "oblog.yaml";

/// The author credited in the feeds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// Everything a generation run needs to know. Paths and the base URL are
/// required; `name`, `description` and `author` only affect the feeds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The directory holding the Markdown sources.
    pub source_directory: Option<PathBuf>,

    /// The directory the site is written into. Every `*.html` file in it is
    /// removed at the start of a run.
    pub output_directory: Option<PathBuf>,

    /// The directory holding `post.html`, `page.html` and, optionally,
    /// `sitemap.xml`, `atom.xml` and `rss.xml`.
    pub template_directory: Option<PathBuf>,

    /// The absolute URL the site is served from, e.g.
    /// `https://example.com/blog`.
    pub base_url: Option<String>,

    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<Author>,
}

impl Config {
    /// Looks for [`PROJECT_FILE`] in `dir` and then in each of its ancestors,
    /// loading the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let start = fs::canonicalize(dir).map_err(|source| Error::Io {
            path: dir.to_owned(),
            source,
        })?;
        let mut dir: &Path = &start;
        loop {
            let path = dir.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path);
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => {
                    return Err(Error::ProjectFileNotFound {
                        start: start.clone(),
                    })
                }
            }
        }
    }

    /// Loads a project file, resolving its relative paths against the
    /// file's own directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        let config: Config = serde_yaml::from_reader(file).map_err(|source| Error::Yaml {
            path: path.to_owned(),
            source,
        })?;
        Ok(match path.parent() {
            Some(root) => config.relative_to(root),
            None => config,
        })
    }

    fn relative_to(self, root: &Path) -> Config {
        let resolve = |dir: Option<PathBuf>| dir.map(|dir| root.join(dir));
        Config {
            source_directory: resolve(self.source_directory),
            output_directory: resolve(self.output_directory),
            template_directory: resolve(self.template_directory),
            ..self
        }
    }

    /// Checks that every required setting is present and returns a [`Site`]
    /// view over them. Fails with [`Error::Missing`] naming the first absent
    /// setting, or [`Error::InvalidBaseUrl`] if the base URL isn't an
    /// absolute URL.
    pub fn site(&self) -> Result<Site<'_>> {
        fn required<'a, T: ?Sized>(value: Option<&'a T>, field: &'static str) -> Result<&'a T> {
            value.ok_or(Error::Missing { field })
        }

        let source_directory = required(self.source_directory.as_deref(), "source_directory")?;
        let template_directory =
            required(self.template_directory.as_deref(), "template_directory")?;
        let output_directory = required(self.output_directory.as_deref(), "output_directory")?;
        let base_url = required(self.base_url.as_deref(), "base_url")?;

        if let Err(source) = Url::parse(base_url) {
            return Err(Error::InvalidBaseUrl {
                url: base_url.to_owned(),
                source,
            });
        }

        Ok(Site {
            source_directory,
            output_directory,
            template_directory,
            base_url: base_url.trim_end_matches('/'),
            name: self.name.as_deref(),
            description: self.description.as_deref(),
            author: self.author.as_ref(),
        })
    }
}

/// A validated view of a [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub source_directory: &'a Path,
    pub output_directory: &'a Path,
    pub template_directory: &'a Path,

    /// The base URL without trailing slashes.
    pub base_url: &'a str,

    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub author: Option<&'a Author>,
}

impl Site<'_> {
    /// The absolute URL of an output file.
    pub fn url(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url, filename)
    }

    /// The absolute URL of the site root.
    pub fn home_page(&self) -> String {
        format!("{}/", self.base_url)
    }
}

/// Represents the result of loading or validating a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a configuration problem.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a required setting hasn't been provided.
    #[error("configuration is missing `{field}`")]
    Missing { field: &'static str },

    /// Returned when the base URL can't be parsed.
    #[error("invalid base URL `{url}`")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Returned when no project file exists in a directory or its ancestors.
    #[error("could not find `oblog.yaml` in `{}` or any parent directory", start.display())]
    ProjectFileNotFound { start: PathBuf },

    /// Returned for I/O problems while locating or opening a project file.
    #[error("opening project file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Returned when a project file isn't valid.
    #[error("loading project file `{}`", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
