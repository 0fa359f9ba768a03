//! The template-engine seam. Templates are addressed by logical name
//! (`post.html`, `page.html`, `sitemap.xml`, ...) and rendered with a
//! [`Value`] holding their variables. [`TemplateDirectory`] resolves names to
//! files in a directory and renders them with [`gtmpl`] (Go-template syntax).

use gtmpl::{Context, Template, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

/// Renders named templates.
pub trait Templates {
    /// Renders the template called `name` with `vars`.
    fn render(&self, name: &str, vars: Value) -> Result<String>;

    /// Reports whether a template called `name` is available. Optional
    /// outputs are skipped when this returns `false`.
    fn exists(&self, name: &str) -> bool;
}

/// Loads templates from files in a directory, parsing each one the first
/// time it's rendered and reusing the parsed template afterwards.
pub struct TemplateDirectory {
    root: PathBuf,
    parsed: RefCell<HashMap<String, Rc<Template>>>,
}

impl TemplateDirectory {
    pub fn new<P: Into<PathBuf>>(root: P) -> TemplateDirectory {
        TemplateDirectory {
            root: root.into(),
            parsed: RefCell::new(HashMap::new()),
        }
    }

    fn template(&self, name: &str) -> Result<Rc<Template>> {
        if let Some(template) = self.parsed.borrow().get(name) {
            return Ok(Rc::clone(template));
        }

        let path = self.root.join(name);
        let contents = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound {
                    name: name.to_owned(),
                    directory: self.root.clone(),
                }
            } else {
                Error::Read { path, source }
            }
        })?;

        let mut template = Template::default();
        template
            .parse(&contents)
            .map_err(|message| Error::Parse {
                name: name.to_owned(),
                message,
            })?;

        let template = Rc::new(template);
        self.parsed
            .borrow_mut()
            .insert(name.to_owned(), Rc::clone(&template));
        Ok(template)
    }
}

impl Templates for TemplateDirectory {
    fn render(&self, name: &str, vars: Value) -> Result<String> {
        let template = self.template(name)?;
        let execute_error = |message| Error::Execute {
            name: name.to_owned(),
            message,
        };
        let context = Context::from(vars).map_err(execute_error)?;
        let mut out: Vec<u8> = Vec::new();
        template.execute(&mut out, &context).map_err(execute_error)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn exists(&self, name: &str) -> bool {
        self.parsed.borrow().contains_key(name) || self.root.join(name).is_file()
    }
}

/// The result of a fallible templating operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or executing a template.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a required template file doesn't exist.
    #[error("template `{name}` not found in `{}`", directory.display())]
    NotFound { name: String, directory: PathBuf },

    /// Returned for I/O problems while reading a template file.
    #[error("reading template file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Returned when a template file isn't a valid template.
    #[error("parsing template `{name}`: {message}")]
    Parse { name: String, message: String },

    /// Returned when a template fails while rendering.
    #[error("rendering template `{name}`: {message}")]
    Execute { name: String, message: String },
}
