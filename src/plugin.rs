//! Plugin lifecycle hook.
//! Merges the filter registry into the template options of a host
//! configuration, keeping any entries the user registered first.

use indexmap::IndexMap;
use log::debug;
use minijinja::Environment;

use crate::registry::{registry, Filter, Slot};

/// Named callables registered in one template slot.
pub type FilterMap = IndexMap<String, Filter>;

/// Template options of the host configuration.
#[derive(Debug, Clone, Default)]
pub struct TemplateOpts {
    /// Callables installed as template filters (`{{ x | name }}`)
    pub filters: Option<FilterMap>,
    /// Callables installed as template globals (`{{ name(x) }}`)
    pub globals: Option<FilterMap>,
}

impl TemplateOpts {
    /// Installs both slots into a template environment.
    pub fn install(&self, env: &mut Environment<'static>) {
        for (slot, entries) in [(Slot::Filters, &self.filters), (Slot::Globals, &self.globals)] {
            for (name, filter) in entries.iter().flatten() {
                filter.install(env, slot, name.as_str());
            }
        }
    }
}

/// Host configuration handed to plugins before any rendering.
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    pub template_opts: Option<TemplateOpts>,
}

/// A plugin of the host framework.
pub trait Plugin {
    /// Plugin name, used in log messages.
    fn name(&self) -> &str;

    /// Runs once when the host is set up, before any template is rendered.
    fn on_setup(&self, config: &mut HostConfig);
}

/// The plugin registering every filter of this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipenFilters;

impl PipenFilters {
    pub fn new() -> Self {
        Self
    }
}

/// Registry entries in registration order with `user` entries on top.
fn merge_slot(user: Option<FilterMap>) -> FilterMap {
    let mut merged: FilterMap =
        registry().iter().map(|(name, filter)| (name.to_string(), filter)).collect();
    if let Some(user) = user {
        for (name, filter) in user {
            debug!("Keeping user-provided '{name}' over the default");
            merged.insert(name, filter);
        }
    }
    merged
}

impl Plugin for PipenFilters {
    fn name(&self) -> &str {
        "filters"
    }

    fn on_setup(&self, config: &mut HostConfig) {
        let opts = config.template_opts.get_or_insert_with(TemplateOpts::default);
        opts.filters = Some(merge_slot(opts.filters.take()));
        opts.globals = Some(merge_slot(opts.globals.take()));
        debug!("Plugin '{}' registered {} filters in both slots", self.name(), registry().len());
    }
}
