use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for route extraction
///
/// Errors scoped to a single plugin file, pattern or source file are absorbed by the
/// component that hit them and surfaced as warnings. Only the variants that make a
/// whole operation meaningless reach the caller.
#[derive(Debug)]
pub enum Error {
    /// A plugin configuration file could not be read or parsed
    Config { file: PathBuf, message: String },
    /// A parsed plugin breaks a structural rule (no extensions, no usable patterns, ...)
    Validation { plugin: String, message: String },
    /// An explicitly requested plugin is not registered
    PluginNotFound(String),
    /// The traversal root does not exist or is not a readable directory
    RootUnreadable { path: PathBuf, message: String },
    /// A plugin expression failed to compile
    RegexCompile { pattern: String, message: String },
    IoError(std::io::Error),
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Config { file, message } => {
                write!(f, "invalid plugin file {}: {}", file.display(), message)
            }
            Error::Validation { plugin, message } => {
                write!(f, "invalid plugin '{}': {}", plugin, message)
            }
            Error::PluginNotFound(name) if name.is_empty() => {
                write!(f, "plugin not found: no plugin name given")
            }
            Error::PluginNotFound(name) => write!(f, "plugin not found: {}", name),
            Error::RootUnreadable { path, message } => {
                write!(f, "cannot read project root {}: {}", path.display(), message)
            }
            Error::RegexCompile { pattern, message } => {
                write!(f, "invalid expression '{}': {}", pattern, message)
            }
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON: {}", err))
    }
}
