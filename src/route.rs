//! Canonical route records produced by extraction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single HTTP endpoint declared somewhere in the scanned project.
///
/// `path` is the raw template as written in the source, placeholders included
/// (`/users/:id`, `/users/{id}`, `/users/<int:id>`), so exporters can reproduce
/// the original form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// The URL path template
    pub path: String,
    /// The HTTP method for this route
    pub method: HttpMethod,
    /// Path placeholder names, unique, in the order they appear in `path`
    pub params: Vec<String>,
    /// Query string keys read near the declaration (best effort)
    pub query: Vec<String>,
    /// Body fields read near the declaration (best effort)
    pub body: Vec<String>,
}

impl Route {
    /// Create a new Route with no query or body hints
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            params: Vec::new(),
            query: Vec::new(),
            body: Vec::new(),
        }
    }
}

/// The canonical HTTP verbs a route may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
    ];

    /// Upper-case wire name of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Whether requests with this method conventionally carry a body
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a token is not one of the canonical verbs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown HTTP method '{}'", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        HttpMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}
