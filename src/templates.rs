//! Template rendering backed by minijinja.
//!
//! Templates are loaded lazily from a directory and cached by the environment after first use.

use std::path::{Path, PathBuf};

use minijinja::{path_loader, Environment, ErrorKind};
use serde::Serialize;
use tracing::debug;

use crate::error::TemplateError;

pub struct Templates {
    dir: PathBuf,
    env: Environment<'static>,
}

impl Templates {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        let dir = dir.into();
        let mut env = Environment::new();
        env.set_loader(path_loader(&dir));
        Self { dir, env }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Render `name` with `context`.
    ///
    /// # Errors
    ///
    /// * [`TemplateError::NotFound`] - no such template under the templates directory
    /// * [`TemplateError::Render`] - syntax or evaluation error
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, TemplateError> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => TemplateError::NotFound(name.to_string()),
            _ => TemplateError::Render {
                name: name.to_string(),
                source: e,
            },
        })?;
        let rendered = template.render(context).map_err(|source| TemplateError::Render {
            name: name.to_string(),
            source,
        })?;
        debug!(template = %name, bytes = rendered.len(), "Template rendered");
        Ok(rendered)
    }
}
