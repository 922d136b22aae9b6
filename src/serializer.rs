//! Serialization helpers for export artifacts.
//!
//! JSON rendering for the collection formats and writing finished artifacts to disk.

use crate::error::Result;
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serializes a value to pretty-printed JSON.
///
/// # Errors
///
/// Returns [`Error::SerializationError`](crate::error::Error::SerializationError) if
/// serialization fails.
///
/// # Example
///
/// ```
/// use routes_from_source::route::{HttpMethod, Route};
/// use routes_from_source::serializer::serialize_json;
///
/// let routes = vec![Route::new("/users", HttpMethod::Get)];
/// let json = serialize_json(&routes).unwrap();
/// assert!(json.contains("\"GET\""));
/// ```
pub fn serialize_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    debug!("Serializing artifact to JSON");
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does. Missing parent
/// directories are created.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content)?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
