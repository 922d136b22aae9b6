//! YAML plugin loader: parses, validates and compiles plugin definitions.
//!
//! Expressions are compiled once at load time. Nothing in here is fatal to a whole
//! load: a broken file, plugin or pattern is skipped and reported as a warning.

use super::builtin;
use super::{Pattern, Plugin, PluginRegistry, DEFAULT_WINDOW_LINES};
use crate::error::{Error, Result};
use crate::route::HttpMethod;
use log::{debug, info, warn};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory under a project root holding project-specific plugins.
pub const PROJECT_PLUGIN_DIR: &str = "plugins";

/// Hidden alternative to [`PROJECT_PLUGIN_DIR`], searched right after it.
pub const HIDDEN_PROJECT_PLUGIN_DIR: &str = ".routes/plugins";

/// Plugin file as written on disk.
#[derive(Debug, Default, Deserialize)]
pub struct PluginDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<PatternDef>,
    #[serde(default)]
    pub base_regex: Option<String>,
    #[serde(default)]
    pub query_regex: Vec<String>,
    #[serde(default)]
    pub body_regex: Vec<String>,
    #[serde(default)]
    pub window_lines: Option<usize>,
}

/// One entry of a plugin's `patterns` list.
#[derive(Debug, Default, Deserialize)]
pub struct PatternDef {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub route_regex: String,
    #[serde(default)]
    pub param_regex: Option<String>,
    #[serde(default)]
    pub method_group: Option<usize>,
    #[serde(default)]
    pub path_group: Option<usize>,
    #[serde(default)]
    pub default_method: Option<String>,
}

/// Outcome of loading plugins from a set of search paths.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub registry: PluginRegistry,
    /// Directories that contributed at least one registered plugin
    pub loaded_dirs: Vec<PathBuf>,
    /// Everything that was skipped, and why
    pub warnings: Vec<String>,
}

/// Discovers plugin files in search directories and builds a registry from them.
pub struct PluginStore;

impl PluginStore {
    /// Loads every `.yml`/`.yaml` file directly inside each search path.
    ///
    /// Paths are visited in the given order and files within a directory in file-name
    /// order; the first plugin registered under a name wins. Missing directories are
    /// skipped silently.
    pub fn load(search_paths: &[PathBuf]) -> LoadReport {
        let mut report = LoadReport::default();

        for dir in search_paths {
            if !dir.is_dir() {
                debug!("Plugin directory not present: {}", dir.display());
                continue;
            }

            let mut contributed = false;
            for file in plugin_files(dir, &mut report.warnings) {
                match load_from_file(&file, &mut report.warnings) {
                    Ok(plugin) => {
                        let name = plugin.name.clone();
                        if report.registry.insert(plugin) {
                            debug!("Registered plugin '{}' from {}", name, file.display());
                            contributed = true;
                        } else {
                            push_warning(
                                &mut report.warnings,
                                format!(
                                    "Skipping {}: plugin '{}' is already registered",
                                    file.display(),
                                    name
                                ),
                            );
                        }
                    }
                    Err(e) => push_warning(&mut report.warnings, format!("Skipping plugin: {}", e)),
                }
            }

            if contributed {
                report.loaded_dirs.push(dir.clone());
            }
        }

        info!(
            "Loaded {} plugin(s) from {} director{}",
            report.registry.len(),
            report.loaded_dirs.len(),
            if report.loaded_dirs.len() == 1 { "y" } else { "ies" }
        );
        report
    }

    /// Like [`PluginStore::load`], then registers each built-in plugin whose name no
    /// search path provided.
    pub fn load_with_builtins(search_paths: &[PathBuf]) -> LoadReport {
        let mut report = Self::load(search_paths);
        for (name, source) in builtin::builtin_plugins() {
            let origin = PathBuf::from(format!("<builtin:{}>", name));
            match load_from_str(source, &origin, &mut report.warnings) {
                Ok(plugin) => {
                    report.registry.insert(plugin);
                }
                Err(e) => push_warning(
                    &mut report.warnings,
                    format!("Failed to load built-in plugin '{}': {}", name, e),
                ),
            }
        }
        report
    }
}

/// Default search paths for a project, highest precedence first.
///
/// `extra` directories (from the command line) come first, then the project's
/// `plugins/` and `.routes/plugins/` directories, the user config directory and
/// finally the directory next to the executable.
pub fn default_search_paths(project_root: &Path, extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = extra.to_vec();
    paths.push(project_root.join(PROJECT_PLUGIN_DIR));
    paths.push(project_root.join(HIDDEN_PROJECT_PLUGIN_DIR));
    if let Some(config) = dirs::config_dir() {
        paths.push(config.join(env!("CARGO_PKG_NAME")).join("plugins"));
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(exe_dir.join("plugins"));
    }
    paths
}

/// Read and compile one plugin file.
pub fn load_from_file(path: &Path, warnings: &mut Vec<String>) -> Result<Plugin> {
    let content = fs::read_to_string(path).map_err(|e| Error::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;
    load_from_str(&content, path, warnings)
}

/// Parse and compile plugin YAML. `origin` is only used in messages.
pub fn load_from_str(source: &str, origin: &Path, warnings: &mut Vec<String>) -> Result<Plugin> {
    let def: PluginDef = serde_yaml::from_str(source).map_err(|e| Error::Config {
        file: origin.to_path_buf(),
        message: e.to_string(),
    })?;
    compile_def(def, warnings)
}

/// Validate a parsed definition and compile its expressions.
pub fn compile_def(def: PluginDef, warnings: &mut Vec<String>) -> Result<Plugin> {
    let name = def.name.trim().to_lowercase();
    if name.is_empty() {
        return Err(Error::Validation {
            plugin: String::new(),
            message: "missing name".to_string(),
        });
    }

    let extensions = normalize_extensions(&def.extensions);
    if extensions.is_empty() {
        return Err(Error::Validation {
            plugin: name,
            message: "no extensions declared".to_string(),
        });
    }
    if def.patterns.is_empty() {
        return Err(Error::Validation {
            plugin: name,
            message: "no patterns declared".to_string(),
        });
    }

    let mut patterns = Vec::with_capacity(def.patterns.len());
    for (index, pattern_def) in def.patterns.into_iter().enumerate() {
        match compile_pattern(pattern_def, &name) {
            Ok(pattern) => patterns.push(pattern),
            Err(e) => push_warning(
                warnings,
                format!("Dropping pattern #{} of plugin '{}': {}", index + 1, name, e),
            ),
        }
    }
    if patterns.is_empty() {
        return Err(Error::Validation {
            plugin: name,
            message: "none of its patterns are usable".to_string(),
        });
    }

    let base_regex = def
        .base_regex
        .as_deref()
        .and_then(|expr| compile_optional(expr, &name, "base_regex", warnings));
    let query_regex = def
        .query_regex
        .iter()
        .filter_map(|expr| compile_optional(expr, &name, "query_regex", warnings))
        .collect();
    let body_regex = def
        .body_regex
        .iter()
        .filter_map(|expr| compile_optional(expr, &name, "body_regex", warnings))
        .collect();

    Ok(Plugin {
        name,
        description: def.description.trim().to_string(),
        extensions,
        patterns,
        base_regex,
        query_regex,
        body_regex,
        window_lines: def.window_lines.unwrap_or(DEFAULT_WINDOW_LINES),
    })
}

fn compile_pattern(def: PatternDef, plugin: &str) -> Result<Pattern> {
    let route_regex = compile(&def.route_regex)?;
    let param_regex = match def.param_regex.as_deref().map(str::trim) {
        Some(expr) if !expr.is_empty() => Some(compile(expr)?),
        _ => None,
    };

    let method = parse_verb(def.method.as_deref(), plugin)?;
    let default_method = parse_verb(def.default_method.as_deref(), plugin)?;

    let groups = route_regex.captures_len();
    for (label, group) in [("method_group", def.method_group), ("path_group", def.path_group)] {
        if let Some(index) = group {
            if index >= groups {
                return Err(Error::Validation {
                    plugin: plugin.to_string(),
                    message: format!(
                        "{} {} out of range, expression has {} group(s)",
                        label,
                        index,
                        groups - 1
                    ),
                });
            }
        }
    }

    Ok(Pattern {
        method,
        route_regex,
        param_regex,
        method_group: def.method_group,
        path_group: def.path_group,
        default_method,
    })
}

/// Empty or absent means "no fixed verb"; anything else must be canonical.
fn parse_verb(token: Option<&str>, plugin: &str) -> Result<Option<HttpMethod>> {
    match token.map(str::trim) {
        None | Some("") => Ok(None),
        Some(verb) => verb.parse::<HttpMethod>().map(Some).map_err(|e| Error::Validation {
            plugin: plugin.to_string(),
            message: e.to_string(),
        }),
    }
}

fn compile(expr: &str) -> Result<Regex> {
    if expr.trim().is_empty() {
        return Err(Error::RegexCompile {
            pattern: expr.to_string(),
            message: "empty expression".to_string(),
        });
    }
    Regex::new(expr).map_err(|e| Error::RegexCompile {
        pattern: expr.to_string(),
        message: e.to_string(),
    })
}

fn compile_optional(
    expr: &str,
    plugin: &str,
    field: &str,
    warnings: &mut Vec<String>,
) -> Option<Regex> {
    match compile(expr) {
        Ok(regex) => Some(regex),
        Err(e) => {
            push_warning(
                warnings,
                format!("Dropping {} of plugin '{}': {}", field, plugin, e),
            );
            None
        }
    }
}

fn normalize_extensions(raw: &[String]) -> Vec<String> {
    let mut extensions: Vec<String> = Vec::new();
    for ext in raw {
        let ext = ext.trim().to_lowercase();
        if ext.is_empty() || ext == "." {
            continue;
        }
        let ext = if ext.starts_with('.') { ext } else { format!(".{}", ext) };
        if !extensions.contains(&ext) {
            extensions.push(ext);
        }
    }
    extensions
}

/// `.yml`/`.yaml` files directly inside `dir`, sorted by file name.
fn plugin_files(dir: &Path, warnings: &mut Vec<String>) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                let is_yaml = path
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));
                if entry.file_type().is_file() && is_yaml {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => push_warning(warnings, format!("Failed to access plugin path: {}", e)),
        }
    }
    files
}

fn push_warning(warnings: &mut Vec<String>, warning: String) {
    warn!("{}", warning);
    warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEST_PLUGIN: &str = r#"name: test
description: Test plugin
extensions:
  - .test
patterns:
  - method: GET
    route_regex: 'test\.(get|post)\([''"]([^''"]+)[''"]'
    param_regex: ':(\w+)'
"#;

    fn write_plugin(dir: &Path, file: &str, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_load_plugins_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        write_plugin(temp_dir.path(), "test.yml", TEST_PLUGIN);

        let report = PluginStore::load(&[temp_dir.path().to_path_buf()]);

        let plugin = report.registry.get("test").unwrap();
        assert_eq!(plugin.name, "test");
        assert_eq!(plugin.extensions, vec![".test".to_string()]);
        assert_eq!(plugin.patterns.len(), 1);
        assert_eq!(plugin.patterns[0].method, Some(HttpMethod::Get));
        assert_eq!(report.loaded_dirs, vec![temp_dir.path().to_path_buf()]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_invalid_yaml_does_not_block_valid_plugins() {
        let temp_dir = TempDir::new().unwrap();
        write_plugin(temp_dir.path(), "invalid.yml", "invalid: yaml: content: [unclosed");
        write_plugin(temp_dir.path(), "test.yml", TEST_PLUGIN);

        let report = PluginStore::load(&[temp_dir.path().to_path_buf()]);

        assert_eq!(report.registry.len(), 1);
        assert!(report.registry.contains("test"));
        assert!(!report.registry.contains("invalid"));
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_missing_extensions_rejected() {
        let mut warnings = Vec::new();
        let yaml = r#"name: noext
description: Plugin without extensions
patterns:
  - method: GET
    route_regex: 'test'
"#;

        let result = load_from_str(yaml, Path::new("noext.yml"), &mut warnings);

        assert!(matches!(result, Err(Error::Validation { plugin, .. }) if plugin == "noext"));
    }

    #[test]
    fn test_missing_name_and_patterns_rejected() {
        let mut warnings = Vec::new();

        let no_name = "extensions: [.js]\npatterns:\n  - route_regex: 'x'\n";
        assert!(load_from_str(no_name, Path::new("a.yml"), &mut warnings).is_err());

        let no_patterns = "name: empty\nextensions: [.js]\n";
        assert!(load_from_str(no_patterns, Path::new("b.yml"), &mut warnings).is_err());
    }

    #[test]
    fn test_broken_pattern_dropped_individually() {
        let mut warnings = Vec::new();
        let yaml = r#"name: Mixed
extensions: [js, .JS, .ts]
patterns:
  - method: GET
    route_regex: 'app\.get\((unclosed'
  - method: GET
    route_regex: 'app\.get\(''([^'']+)'''
  - method: FETCH
    route_regex: 'app\.fetch\(''([^'']+)'''
"#;

        let plugin = load_from_str(yaml, Path::new("mixed.yml"), &mut warnings).unwrap();

        assert_eq!(plugin.name, "mixed");
        assert_eq!(plugin.extensions, vec![".js".to_string(), ".ts".to_string()]);
        assert_eq!(plugin.patterns.len(), 1);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_plugin_dropped_when_all_patterns_broken() {
        let mut warnings = Vec::new();
        let yaml = "name: broken\nextensions: [.js]\npatterns:\n  - route_regex: '(('\n";

        let result = load_from_str(yaml, Path::new("broken.yml"), &mut warnings);

        assert!(matches!(result, Err(Error::Validation { .. })));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_out_of_range_group_drops_pattern() {
        let mut warnings = Vec::new();
        let yaml = r#"name: groups
extensions: [.js]
patterns:
  - route_regex: 'get\(''([^'']+)'''
    path_group: 3
  - route_regex: 'post\(''([^'']+)'''
    method: POST
"#;

        let plugin = load_from_str(yaml, Path::new("groups.yml"), &mut warnings).unwrap();

        assert_eq!(plugin.patterns.len(), 1);
        assert_eq!(plugin.patterns[0].method, Some(HttpMethod::Post));
    }

    #[test]
    fn test_first_directory_wins_on_duplicate_names() {
        let project = TempDir::new().unwrap();
        let install = TempDir::new().unwrap();
        write_plugin(project.path(), "test.yml", &TEST_PLUGIN.replace("Test plugin", "Project copy"));
        write_plugin(install.path(), "test.yml", TEST_PLUGIN);

        let report = PluginStore::load(&[
            project.path().to_path_buf(),
            install.path().to_path_buf(),
        ]);

        assert_eq!(report.registry.get("test").unwrap().description, "Project copy");
        assert_eq!(report.loaded_dirs, vec![project.path().to_path_buf()]);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_missing_search_path_is_skipped() {
        let report = PluginStore::load(&[PathBuf::from("/nonexistent/plugins/dir")]);

        assert!(report.registry.is_empty());
        assert!(report.loaded_dirs.is_empty());
    }

    #[test]
    fn test_builtins_fill_missing_names_only() {
        let temp_dir = TempDir::new().unwrap();
        let custom_express = TEST_PLUGIN.replace("name: test", "name: express");
        write_plugin(temp_dir.path(), "express.yaml", &custom_express);

        let report = PluginStore::load_with_builtins(&[temp_dir.path().to_path_buf()]);

        assert_eq!(report.registry.get("express").unwrap().extensions, vec![".test".to_string()]);
        assert!(report.registry.contains("flask"));
        assert!(report.registry.contains("laravel"));
    }

    #[test]
    fn test_default_search_paths_order() {
        let extra = vec![PathBuf::from("/opt/custom-plugins")];
        let paths = default_search_paths(Path::new("/work/project"), &extra);

        assert_eq!(paths[0], PathBuf::from("/opt/custom-plugins"));
        assert_eq!(paths[1], PathBuf::from("/work/project/plugins"));
        assert_eq!(paths[2], PathBuf::from("/work/project/.routes/plugins"));
    }

    #[test]
    fn test_project_plugins_directory_is_found() {
        let project = TempDir::new().unwrap();
        write_plugin(&project.path().join("plugins"), "test.yml", TEST_PLUGIN);

        let report = PluginStore::load(&default_search_paths(project.path(), &[]));

        let plugin = report.registry.get("test").unwrap();
        assert_eq!(plugin.extensions, vec![".test".to_string()]);
        assert!(report.loaded_dirs.contains(&project.path().join("plugins")));
    }

    #[test]
    fn test_fixed_method_is_parsed_case_insensitively() {
        let yaml = TEST_PLUGIN.replace("method: GET", "method: delete");
        let mut warnings = Vec::new();

        let plugin = load_from_str(&yaml, Path::new("verb.yml"), &mut warnings).unwrap();

        assert_eq!(plugin.patterns[0].method, Some(HttpMethod::Delete));
    }
}
