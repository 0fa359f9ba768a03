//! The side-effecting half of a run: removing stale pages and writing planned
//! [`Output`]s to disk. Writes aren't transactional; if one fails, the files
//! already written stay in place until the next full rebuild replaces them.

use crate::post::HTML_EXTENSION;
use log::debug;
use std::fs::{self, File};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// A planned output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Where the file goes.
    pub path: PathBuf,

    pub content: String,

    /// The modification time to give the file once written. `None` leaves
    /// the time of writing.
    pub modified_at: Option<SystemTime>,
}

/// Writes into a single output directory.
pub struct Writer<'a> {
    output_directory: &'a Path,
}

impl<'a> Writer<'a> {
    pub fn new(output_directory: &'a Path) -> Writer<'a> {
        Writer { output_directory }
    }

    /// Lists every HTML file or symlink directly inside the output directory.
    /// A missing directory has no stale pages.
    pub fn stale_pages(&self) -> Result<Vec<PathBuf>> {
        if !self.output_directory.exists() {
            return Ok(Vec::new());
        }

        let mut pages = Vec::new();
        for result in WalkDir::new(self.output_directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = result.map_err(|err| Error::List {
                path: self.output_directory.to_owned(),
                source: err.into(),
            })?;
            if (entry.file_type().is_file() || entry.path_is_symlink())
                && entry.file_name().to_string_lossy().ends_with(HTML_EXTENSION)
            {
                pages.push(entry.into_path());
            }
        }
        Ok(pages)
    }

    /// Deletes `paths`.
    pub fn remove(&self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            debug!("removing `{}`", path.display());
            fs::remove_file(path).map_err(|source| Error::Remove {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Writes one output and stamps its modification time.
    pub fn write(&self, output: &Output) -> Result<()> {
        let write_error = |source| Error::Write {
            path: output.path.clone(),
            source,
        };
        let mut file = File::create(&output.path).map_err(write_error)?;
        file.write_all(output.content.as_bytes())
            .map_err(write_error)?;
        if let Some(modified_at) = output.modified_at {
            file.set_modified(modified_at)
                .map_err(|source| Error::Timestamp {
                    path: output.path.clone(),
                    source,
                })?;
        }
        debug!("wrote `{}`", output.path.display());
        Ok(())
    }

    /// Creates the output directory if needed and writes `outputs` in order,
    /// stopping at the first failure.
    pub fn write_all(&self, outputs: &[Output]) -> Result<()> {
        fs::create_dir_all(self.output_directory).map_err(|source| Error::Write {
            path: self.output_directory.to_owned(),
            source,
        })?;
        outputs.iter().try_for_each(|output| self.write(output))
    }
}

/// The result of a fallible write operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error touching the output directory.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the output directory can't be listed.
    #[error("listing output directory `{}`", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Returned when a stale page can't be deleted.
    #[error("removing `{}`", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Returned when an output file can't be written.
    #[error("writing `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Returned when an output file's modification time can't be set.
    #[error("setting modification time of `{}`", path.display())]
    Timestamp {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_stale_pages() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("b.html"), "")?;
        fs::write(dir.path().join("a.html"), "")?;
        fs::write(dir.path().join("sitemap.xml"), "")?;
        fs::write(dir.path().join("style.css"), "")?;
        fs::create_dir(dir.path().join("nested"))?;
        fs::write(dir.path().join("nested").join("c.html"), "")?;

        let writer = Writer::new(dir.path());
        let stale = writer.stale_pages()?;
        assert_eq!(
            vec![dir.path().join("a.html"), dir.path().join("b.html")],
            stale
        );

        writer.remove(&stale)?;
        assert!(!dir.path().join("a.html").exists());
        assert!(dir.path().join("sitemap.xml").exists());
        assert!(dir.path().join("nested").join("c.html").exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_pages_include_symlinks() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("elsewhere.txt");
        fs::write(&target, "kept")?;
        std::os::unix::fs::symlink(&target, dir.path().join("linked.html"))?;
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling.html"))?;

        let writer = Writer::new(dir.path());
        let stale = writer.stale_pages()?;
        assert_eq!(
            vec![dir.path().join("dangling.html"), dir.path().join("linked.html")],
            stale
        );

        writer.remove(&stale)?;
        assert!(fs::symlink_metadata(dir.path().join("linked.html")).is_err());
        assert!(fs::symlink_metadata(dir.path().join("dangling.html")).is_err());
        assert_eq!("kept", fs::read_to_string(&target)?);
        Ok(())
    }

    #[test]
    fn test_stale_pages_missing_directory() -> Result<()> {
        let writer = Writer::new(Path::new("./does/not/exist"));
        assert!(writer.stale_pages()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_write_sets_modification_time() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let output_directory = dir.path().join("public");
        let modified_at = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        let writer = Writer::new(&output_directory);

        writer.write_all(&[Output {
            path: output_directory.join("post.html"),
            content: String::from("<p>hi</p>"),
            modified_at: Some(modified_at),
        }])?;

        let path = output_directory.join("post.html");
        assert_eq!("<p>hi</p>", fs::read_to_string(&path)?);
        assert_eq!(modified_at, fs::metadata(&path)?.modified()?);
        Ok(())
    }
}
