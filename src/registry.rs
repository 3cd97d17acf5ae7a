//! The filter registry.
//!
//! Filters are plain Rust functions with minijinja-compatible signatures. A
//! [`Filter`] is a copyable handle that knows how to install one of them into
//! an [`Environment`], either as a filter (`{{ x | ext }}`) or as a global
//! function (`{{ ext(x) }}`). The [`Registry`] maps every name and alias to a
//! handle and is built once, on first use, by [`registry`].

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use log::debug;
use minijinja::Environment;

/// Where a filter is installed in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Installed with `Environment::add_filter`
    Filters,
    /// Installed with `Environment::add_function`
    Globals,
}

/// Installs a concrete function under a name into one slot of an environment.
pub type Installer = fn(&mut Environment<'static>, Slot, String);

/// Handle to an installable filter function.
///
/// Create one with the [`filter!`](crate::filter) macro.
#[derive(Clone, Copy)]
pub struct Filter {
    install: Installer,
}

impl Filter {
    pub const fn new(install: Installer) -> Self {
        Self { install }
    }

    /// Installs the function into `env` under `name`.
    pub fn install(&self, env: &mut Environment<'static>, slot: Slot, name: impl Into<String>) {
        (self.install)(env, slot, name.into())
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").finish_non_exhaustive()
    }
}

/// Wraps a function with a minijinja-compatible signature into a [`Filter`].
///
/// # Example
/// ```
/// use pipen_filters::filter;
///
/// fn shout(value: String) -> String {
///     value.to_uppercase()
/// }
///
/// let mut env = minijinja::Environment::new();
/// filter!(shout).install(&mut env, pipen_filters::registry::Slot::Filters, "shout");
/// assert_eq!(env.render_str("{{ 'a' | shout }}", ()).unwrap(), "A");
/// ```
#[macro_export]
macro_rules! filter {
    ($func:path) => {
        $crate::registry::Filter::new(
            |env: &mut $crate::minijinja::Environment<'static>,
             slot: $crate::registry::Slot,
             name: ::std::string::String| match slot {
                $crate::registry::Slot::Filters => env.add_filter(name, $func),
                $crate::registry::Slot::Globals => env.add_function(name, $func),
            },
        )
    };
}

/// Name → filter mapping with aliases.
#[derive(Debug, Default)]
pub struct Registry {
    entries: IndexMap<&'static str, Filter>,
    aliases: IndexMap<&'static str, Vec<&'static str>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `filter` under `name` and every alias.
    ///
    /// A later registration of an already known name replaces the earlier one.
    pub fn add(&mut self, name: &'static str, aliases: &[&'static str], filter: Filter) -> &mut Self {
        self.entries.insert(name, filter);
        for alias in aliases {
            self.entries.insert(*alias, filter);
        }
        self.aliases.insert(name, aliases.to_vec());
        self
    }

    /// Looks a filter up by exact name or alias.
    pub fn get(&self, name: &str) -> Option<Filter> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Every name and alias, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Filter)> + '_ {
        self.entries.iter().map(|(name, filter)| (*name, *filter))
    }

    /// Primary names with their aliases, in registration order.
    pub fn groups(&self) -> impl Iterator<Item = (&'static str, &[&'static str])> + '_ {
        self.aliases.iter().map(|(name, aliases)| (*name, aliases.as_slice()))
    }

    /// Number of names, aliases included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Installs every entry into one slot of `env`.
    pub fn install(&self, env: &mut Environment<'static>, slot: Slot) {
        for (name, filter) in self.iter() {
            filter.install(env, slot, name);
        }
    }
}

/// The default registry, built on first access and read-only afterwards.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let registry = crate::filters::default_registry();
        debug!("Registered {} filter names", registry.len());
        registry
    })
}
