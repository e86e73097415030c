//! HTML page rendering with `minijinja`.
//!
//! Templates are compiled into the binary. A directory may override any of
//! them by providing a file with the same relative name.

use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use minijinja::Environment;
use serde::Serialize;
use std::io;
use thiserror::Error;
use tracing::debug;

/// Template for the question index.
pub const INDEX_TEMPLATE: &str = "polls/index.html";
/// Template for the voting form.
pub const DETAIL_TEMPLATE: &str = "polls/detail.html";
/// Template for the vote tallies.
pub const RESULTS_TEMPLATE: &str = "polls/results.html";
/// Template for the administrative question list.
pub const ADMIN_LIST_TEMPLATE: &str = "admin/question_list.html";
/// Template for the question add and change forms.
pub const QUESTION_FORM_TEMPLATE: &str = "admin/question_form.html";

const EMBEDDED_TEMPLATES: [(&str, &str); 6] = [
    ("base.html", include_str!("templates/base.html")),
    (INDEX_TEMPLATE, include_str!("templates/polls/index.html")),
    (DETAIL_TEMPLATE, include_str!("templates/polls/detail.html")),
    (RESULTS_TEMPLATE, include_str!("templates/polls/results.html")),
    (
        ADMIN_LIST_TEMPLATE,
        include_str!("templates/admin/question_list.html"),
    ),
    (
        QUESTION_FORM_TEMPLATE,
        include_str!("templates/admin/question_form.html"),
    ),
];

/// Errors raised while loading or rendering templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A template failed to parse or render.
    #[error("template '{name}' failed: {source}")]
    Render {
        /// Template name.
        name: String,
        /// Underlying `minijinja` error.
        #[source]
        source: minijinja::Error,
    },

    /// The override directory could not be read.
    #[error("failed to read template override '{path}': {source}")]
    Io {
        /// Path of the override, relative to the template directory.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Renders the site's HTML pages.
#[derive(Debug)]
pub struct PageRenderer {
    environment: Environment<'static>,
}

impl PageRenderer {
    /// Creates a renderer using only the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Render`] when an embedded template fails to
    /// parse.
    pub fn embedded() -> Result<Self, TemplateError> {
        let mut environment = Environment::new();
        for (name, source) in EMBEDDED_TEMPLATES {
            environment
                .add_template(name, source)
                .map_err(|err| TemplateError::Render {
                    name: name.to_owned(),
                    source: err,
                })?;
        }
        Ok(Self { environment })
    }

    /// Creates a renderer whose templates may be replaced by files in
    /// `directory`.
    ///
    /// Names missing from the directory keep their embedded version.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Io`] when the directory or an override cannot
    /// be read and [`TemplateError::Render`] when an override fails to parse.
    pub fn with_overrides(directory: &str) -> Result<Self, TemplateError> {
        let mut renderer = Self::embedded()?;
        let dir = Dir::open_ambient_dir(directory, ambient_authority()).map_err(|source| {
            TemplateError::Io {
                path: directory.to_owned(),
                source,
            }
        })?;

        for (name, _) in EMBEDDED_TEMPLATES {
            let source = match dir.read_to_string(name) {
                Ok(source) => source,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(TemplateError::Io {
                        path: name.to_owned(),
                        source,
                    });
                }
            };
            debug!(template = name, "using template override");
            renderer
                .environment
                .add_template_owned(name, source)
                .map_err(|err| TemplateError::Render {
                    name: name.to_owned(),
                    source: err,
                })?;
        }
        Ok(renderer)
    }

    /// Renders `name` with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Render`] when the template is unknown or
    /// rendering fails.
    pub fn render(&self, name: &str, context: impl Serialize) -> Result<String, TemplateError> {
        self.environment
            .get_template(name)
            .and_then(|template| template.render(context))
            .map_err(|source| TemplateError::Render {
                name: name.to_owned(),
                source,
            })
    }
}
