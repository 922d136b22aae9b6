use crate::error::{Error, Result};
use crate::plugin::PluginRegistry;
use log::{debug, warn};
use std::collections::{BTreeSet, VecDeque};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names never descended into, at any depth.
///
/// Version-control metadata, vendored dependencies, virtualenvs and build outputs.
pub const IGNORED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".bzr",
    ".idea",
    ".vscode",
    ".gradle",
    ".next",
    ".nuxt",
    ".tox",
    ".venv",
    "venv",
    "__pycache__",
    "node_modules",
    "bower_components",
    "vendor",
    "target",
    "build",
    "dist",
    "bin",
    "obj",
    "coverage",
];

/// File scanner for traversing project directories.
///
/// The `FileScanner` walks a project breadth-first and collects every file whose name
/// ends with one of the configured extensions, pruning [`IGNORED_DIRS`] before
/// descending.
///
/// # Example
///
/// ```no_run
/// use routes_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project"), [".js", ".py"]);
/// let result = scanner.scan().unwrap();
/// println!("Found {} candidate files", result.files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    extensions: BTreeSet<String>,
}

/// Result of directory scanning operation.
///
/// Contains the list of discovered files and any warnings encountered during scanning.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Candidate files in breadth-first order: a directory's files come before the
    /// files of any deeper directory
    pub files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    ///
    /// # Arguments
    ///
    /// * `root_path` - The root directory to scan
    /// * `extensions` - File suffixes to collect, such as `.js`; matched case-insensitively
    pub fn new<I, S>(root_path: PathBuf, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            root_path,
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Creates a scanner collecting every extension claimed by a registered plugin.
    pub fn for_registry(root_path: PathBuf, registry: &PluginRegistry) -> Self {
        Self {
            root_path,
            extensions: registry.extensions(),
        }
    }

    /// Walks the directory tree and collects candidate files.
    ///
    /// Entries within a directory are visited in file-name order. Symbolic links
    /// are not followed. Subdirectories that cannot be read are recorded as warnings and
    /// skipped; scanning continues.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RootUnreadable`] if the root does not exist, is not a directory,
    /// or cannot be listed.
    pub fn scan(&self) -> Result<ScanResult> {
        self.check_root()?;

        let mut result = ScanResult::default();
        let mut queue = VecDeque::new();
        queue.push_back(self.root_path.clone());

        while let Some(dir) = queue.pop_front() {
            for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
                match entry {
                    Ok(entry) => {
                        let file_type = entry.file_type();
                        if file_type.is_dir() {
                            if is_ignored_dir(entry.file_name()) {
                                debug!("Pruning ignored directory: {}", entry.path().display());
                                continue;
                            }
                            queue.push_back(entry.into_path());
                        } else if file_type.is_file() && self.has_wanted_extension(entry.path()) {
                            result.files.push(entry.into_path());
                        }
                    }
                    Err(e) => {
                        // Record warning for inaccessible directories/files
                        let warning = format!("Failed to access path: {}", e);
                        warn!("{}", warning);
                        result.warnings.push(warning);
                    }
                }
            }
        }

        debug!(
            "Scanned {}: {} candidate file(s)",
            self.root_path.display(),
            result.files.len()
        );
        Ok(result)
    }

    fn check_root(&self) -> Result<()> {
        let unreadable = |message: String| Error::RootUnreadable {
            path: self.root_path.clone(),
            message,
        };

        let metadata = fs::metadata(&self.root_path).map_err(|e| unreadable(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(unreadable("not a directory".to_string()));
        }
        fs::read_dir(&self.root_path).map_err(|e| unreadable(e.to_string()))?;
        Ok(())
    }

    fn has_wanted_extension(&self, path: &Path) -> bool {
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_lowercase(),
            None => return false,
        };
        self.extensions
            .iter()
            .any(|ext| file_name.ends_with(ext.as_str()))
    }
}

fn is_ignored_dir(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    IGNORED_DIRS.iter().any(|ignored| *ignored == name)
}
