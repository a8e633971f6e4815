//! Template engine seam and its Tera implementation.

use std::error::Error as StdError;
use std::path::PathBuf;

use tera::{Context, Tera};

use super::{DataModel, TemplateError, TemplateResult, TemplateStore};
use crate::config::TemplatesConfig;

/// Fixed engine options, built once at startup and never mutated.
///
/// Templates and output are always UTF-8. Rendering failures are always
/// returned to the caller. Undefined variables and loops over missing
/// collections are hard errors in Tera, so there is no knob for them here.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Directory templates are resolved from
    pub base_dir: PathBuf,
    /// HTML autoescaping of `{{ }}` output (off: templates produce JSON)
    pub autoescape: bool,
}

impl EngineOptions {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            autoescape: false,
        }
    }
}

impl From<&TemplatesConfig> for EngineOptions {
    fn from(config: &TemplatesConfig) -> Self {
        Self::new(config.path.clone())
    }
}

/// Resolve templates by name and render them against a data model.
pub trait TemplateEngine: Send + Sync {
    /// A parsed template ready to render
    type Handle: Send;

    /// Load and parse the named template
    fn resolve(&self, name: &str) -> TemplateResult<Self::Handle>;

    /// Render a resolved template against a data model
    fn render(&self, template: &Self::Handle, model: &DataModel) -> TemplateResult<String>;
}

/// A template parsed into its own Tera instance
pub struct TeraTemplate {
    name: String,
    tera: Tera,
}

impl TeraTemplate {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Tera-backed engine reading templates from a `TemplateStore` on every resolve
pub struct TeraEngine {
    store: TemplateStore,
    options: EngineOptions,
}

impl TeraEngine {
    /// Create the engine, creating the base directory if it is missing
    pub fn new(options: EngineOptions) -> TemplateResult<Self> {
        let store = TemplateStore::open(&options.base_dir)?;
        Ok(Self { store, options })
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }
}

impl TemplateEngine for TeraEngine {
    type Handle = TeraTemplate;

    fn resolve(&self, name: &str) -> TemplateResult<TeraTemplate> {
        let source = self.store.load(name)?;

        let mut tera = Tera::default();
        if !self.options.autoescape {
            tera.autoescape_on(vec![]);
        }

        tera.add_raw_template(name, &source)
            .map_err(|e| TemplateError::Syntax {
                name: name.to_string(),
                message: error_chain(&e),
            })?;

        Ok(TeraTemplate {
            name: name.to_string(),
            tera,
        })
    }

    fn render(&self, template: &TeraTemplate, model: &DataModel) -> TemplateResult<String> {
        let render_error = |e: tera::Error| TemplateError::Render {
            name: template.name.clone(),
            message: error_chain(&e),
        };

        let context = Context::from_serialize(model).map_err(render_error)?;
        template.tera.render(&template.name, &context).map_err(render_error)
    }
}

/// Flatten an error and its sources into one message.
///
/// Tera keeps the useful part ("Variable `x` not found") in the source chain.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
