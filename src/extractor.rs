//! Extraction pass over a whole project tree.
//!
//! Composes the [`FileScanner`], plugin selection, the [`PatternMatcher`] and the
//! [`RouteNormalizer`]. Files are processed in parallel, but results are collected back
//! in traversal order, so two runs over an unchanged tree give identical output.
//!
//! # Example
//!
//! ```no_run
//! use routes_from_source::extractor::{FrameworkSelector, RouteExtractor};
//! use routes_from_source::plugin::loader::PluginStore;
//! use std::path::Path;
//!
//! let report = PluginStore::load_with_builtins(&[]);
//! let extractor = RouteExtractor::new(&report.registry);
//! let extraction = extractor
//!     .extract(Path::new("./my-project"), &FrameworkSelector::Auto)
//!     .unwrap();
//! for route in &extraction.routes {
//!     println!("{} {}", route.method, route.path);
//! }
//! ```

use crate::error::Result;
use crate::matcher::PatternMatcher;
use crate::normalizer::RouteNormalizer;
use crate::plugin::{Plugin, PluginRegistry};
use crate::route::Route;
use crate::scanner::FileScanner;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which plugins apply to a file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FrameworkSelector {
    /// Every plugin claiming the file's extension
    #[default]
    Auto,
    /// One named plugin, applied to every scanned file regardless of extension
    Plugin(String),
}

impl FromStr for FrameworkSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(FrameworkSelector::from(s))
    }
}

impl From<&str> for FrameworkSelector {
    fn from(s: &str) -> Self {
        let name = s.trim().to_lowercase();
        if name == "auto" {
            FrameworkSelector::Auto
        } else {
            FrameworkSelector::Plugin(name)
        }
    }
}

impl fmt::Display for FrameworkSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameworkSelector::Auto => f.write_str("auto"),
            FrameworkSelector::Plugin(name) => f.write_str(name),
        }
    }
}

/// Outcome of one extraction pass.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Routes in file-processing order, then pattern/occurrence order within a file.
    /// Duplicates are kept.
    pub routes: Vec<Route>,
    pub files_scanned: usize,
    /// Files that yielded at least one route
    pub files_with_routes: usize,
    /// Inaccessible directories and unreadable files
    pub warnings: Vec<String>,
}

/// Runs extraction against a read-only plugin registry.
pub struct RouteExtractor<'a> {
    registry: &'a PluginRegistry,
}

impl<'a> RouteExtractor<'a> {
    pub fn new(registry: &'a PluginRegistry) -> Self {
        Self { registry }
    }

    /// Extracts routes from every candidate file under `root`.
    ///
    /// Per-file read failures are reported in [`Extraction::warnings`] and skipped.
    ///
    /// # Errors
    ///
    /// - [`Error::PluginNotFound`](crate::error::Error::PluginNotFound) when the selector
    ///   names a plugin that is not registered
    /// - [`Error::RootUnreadable`](crate::error::Error::RootUnreadable) when `root`
    ///   cannot be walked
    pub fn extract(&self, root: &Path, selector: &FrameworkSelector) -> Result<Extraction> {
        let explicit = match selector {
            FrameworkSelector::Auto => None,
            FrameworkSelector::Plugin(name) => Some(self.registry.get(name)?),
        };
        info!("Extracting routes from {} (framework: {})", root.display(), selector);

        let scan = FileScanner::for_registry(root.to_path_buf(), self.registry).scan()?;
        info!("Found {} candidate files", scan.files.len());

        let mut extraction = self.extract_files(&scan.files, explicit);
        let mut warnings = scan.warnings;
        warnings.append(&mut extraction.warnings);
        extraction.warnings = warnings;

        info!(
            "Extracted {} routes from {} of {} files",
            extraction.routes.len(),
            extraction.files_with_routes,
            extraction.files_scanned
        );
        Ok(extraction)
    }

    /// Runs the per-file stage over `files`, keeping their order.
    ///
    /// `explicit` is applied to every file; without it each file gets the plugins
    /// claiming its extension. A file that cannot be read adds a warning and nothing
    /// else.
    pub fn extract_files(&self, files: &[PathBuf], explicit: Option<&Plugin>) -> Extraction {
        let per_file: Vec<(Vec<Route>, Option<String>)> = files
            .par_iter()
            .map(|path| {
                let plugins = match explicit {
                    Some(plugin) => vec![plugin],
                    None => self.registry.plugins_for(path),
                };
                match Self::extract_file(path, &plugins) {
                    Ok(routes) => (routes, None),
                    Err(e) => {
                        let warning = format!("Skipping {}: {}", path.display(), e);
                        warn!("{}", warning);
                        (Vec::new(), Some(warning))
                    }
                }
            })
            .collect();

        let mut extraction = Extraction {
            files_scanned: files.len(),
            ..Extraction::default()
        };
        for (routes, warning) in per_file {
            if !routes.is_empty() {
                extraction.files_with_routes += 1;
            }
            extraction.routes.extend(routes);
            extraction.warnings.extend(warning);
        }
        extraction
    }

    /// Reads one file and applies the given plugins to it, in order.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub fn extract_file(path: &Path, plugins: &[&Plugin]) -> std::io::Result<Vec<Route>> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);
        let routes = Self::extract_content(&content, plugins);
        if !routes.is_empty() {
            debug!("{}: {} route(s)", path.display(), routes.len());
        }
        Ok(routes)
    }

    /// Applies each plugin to `content` and concatenates the results.
    pub fn extract_content(content: &str, plugins: &[&Plugin]) -> Vec<Route> {
        plugins
            .iter()
            .flat_map(|plugin| {
                let occurrences = PatternMatcher::match_content(content, plugin);
                RouteNormalizer::normalize_all(occurrences, plugin, content)
            })
            .collect()
    }
}

/// Convenience wrapper returning only the routes.
pub fn extract(root: &Path, registry: &PluginRegistry, selector: &FrameworkSelector) -> Result<Vec<Route>> {
    RouteExtractor::new(registry)
        .extract(root, selector)
        .map(|extraction| extraction.routes)
}
