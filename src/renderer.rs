//! Template rendering with the filter catalog installed.
//! Wraps a MiniJinja environment whose filters and globals come from the
//! template options of a host configuration.
use log::debug;
use minijinja::Environment;

use crate::error::{Error, Result};
use crate::plugin::{HostConfig, Plugin, PipenFilters, TemplateOpts};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with every filter of the catalog installed as both
    /// a filter and a global.
    pub fn new() -> Self {
        let mut config = HostConfig::default();
        PipenFilters::new().on_setup(&mut config);
        Self::from_config(&config)
    }

    /// Creates a renderer from the template options of a host configuration
    /// that plugins have already been set up on.
    pub fn from_config(config: &HostConfig) -> Self {
        let mut env = Environment::new();
        if let Some(opts) = &config.template_opts {
            opts.install(&mut env);
        }
        Self { env }
    }

    /// Creates a renderer from explicit template options.
    pub fn with_template_opts(opts: &TemplateOpts) -> Self {
        let mut env = Environment::new();
        opts.install(&mut env);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if the template does not parse or a filter
    ///   fails during rendering
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        debug!("Rendering template of {} bytes", template.len());
        self.env.render_str(template, context).map_err(Error::MinijinjaError)
    }
}
