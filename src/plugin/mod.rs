//! Plugin definitions and the registry the extraction pass reads from.
//!
//! A plugin is a declarative rule set describing how route declarations look in
//! one source ecosystem. Plugins are plain data: the matcher only interprets their
//! capture-group conventions, so adding a framework never means adding code.
//!
//! # Example
//!
//! ```no_run
//! use routes_from_source::plugin::{get_plugin, loader::PluginStore};
//! use std::path::PathBuf;
//!
//! let report = PluginStore::load_with_builtins(&[PathBuf::from("./plugins")]);
//! let express = get_plugin(&report.registry, "express").unwrap();
//! println!("{} handles {:?}", express.name, express.extensions);
//! ```

pub mod builtin;
pub mod loader;

use crate::error::{Error, Result};
use crate::route::HttpMethod;
use log::debug;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Default number of lines after a route declaration searched for query/body hints.
pub const DEFAULT_WINDOW_LINES: usize = 30;

/// A validated, compiled plugin.
#[derive(Debug, Clone)]
pub struct Plugin {
    /// Unique lower-case key
    pub name: String,
    pub description: String,
    /// Dot-prefixed, lower-case file suffixes; never empty
    pub extensions: Vec<String>,
    /// Extraction rules, applied in declaration order; never empty
    pub patterns: Vec<Pattern>,
    /// Optional expression whose group 1 is a path prefix for later declarations
    pub base_regex: Option<Regex>,
    /// Expressions whose group 1 is a query key
    pub query_regex: Vec<Regex>,
    /// Expressions whose group 1 is a body field
    pub body_regex: Vec<Regex>,
    /// Size of the query/body search window, in lines
    pub window_lines: usize,
}

impl Plugin {
    /// Parse and validate a plugin from YAML source.
    ///
    /// Individually broken patterns are dropped (and logged) as long as at least one
    /// pattern survives.
    pub fn from_yaml(source: &str) -> Result<Self> {
        let mut warnings = Vec::new();
        loader::load_from_str(source, Path::new("<inline>"), &mut warnings)
    }

    /// Whether the file's name ends with one of this plugin's extensions.
    pub fn handles(&self, path: &Path) -> bool {
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_lowercase(),
            None => return false,
        };
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }
}

/// One regex-based extraction rule.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Fixed verb; `None` means the verb is captured from the match
    pub method: Option<HttpMethod>,
    pub route_regex: Regex,
    /// Applied to the path; group 1 of every match is a placeholder name
    pub param_regex: Option<Regex>,
    /// Explicit capture group holding the method token
    pub method_group: Option<usize>,
    /// Explicit capture group holding the path template
    pub path_group: Option<usize>,
    /// Verb used when the method group did not take part in a match
    pub default_method: Option<HttpMethod>,
}

impl Pattern {
    /// Capture group carrying the method token, if any.
    ///
    /// With no fixed method and at least two groups, group 1 is the method by convention.
    pub fn method_group(&self) -> Option<usize> {
        if self.method.is_some() {
            return None;
        }
        self.method_group
            .or_else(|| (self.route_regex.captures_len() > 2).then_some(1))
    }

    /// Capture group carrying the path. Defaults to the last group, or the whole
    /// match for an expression without groups.
    pub fn path_group(&self) -> usize {
        self.path_group
            .unwrap_or_else(|| self.route_regex.captures_len().saturating_sub(1))
    }
}

/// Name-keyed set of plugins, built once per run and read-only afterwards.
///
/// Iteration is in name order, which keeps auto-mode output stable between runs.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Plugin>,
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from already validated plugins; the first plugin with a given
    /// name wins.
    pub fn from_plugins(plugins: impl IntoIterator<Item = Plugin>) -> Self {
        let mut registry = Self::new();
        for plugin in plugins {
            registry.insert(plugin);
        }
        registry
    }

    /// Registers the plugin unless its name is already taken. Returns whether it was added.
    pub(crate) fn insert(&mut self, plugin: Plugin) -> bool {
        if self.plugins.contains_key(&plugin.name) {
            debug!("Plugin '{}' already registered, keeping the first one", plugin.name);
            return false;
        }
        self.plugins.insert(plugin.name.clone(), plugin);
        true
    }

    pub fn get(&self, name: &str) -> Result<&Plugin> {
        get_plugin(self, name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(&name.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// Every plugin claiming the file's extension, in name order.
    pub fn plugins_for(&self, path: &Path) -> Vec<&Plugin> {
        self.plugins.values().filter(|p| p.handles(path)).collect()
    }

    /// Union of all registered extensions.
    pub fn extensions(&self) -> BTreeSet<String> {
        self.plugins
            .values()
            .flat_map(|p| p.extensions.iter().cloned())
            .collect()
    }
}

/// Look up a plugin by name.
///
/// # Errors
///
/// Returns [`Error::PluginNotFound`] when `name` is empty or not registered.
pub fn get_plugin<'a>(registry: &'a PluginRegistry, name: &str) -> Result<&'a Plugin> {
    let key = name.trim().to_lowercase();
    if key.is_empty() {
        return Err(Error::PluginNotFound(String::new()));
    }
    registry
        .plugins
        .get(&key)
        .ok_or_else(|| Error::PluginNotFound(name.to_string()))
}
