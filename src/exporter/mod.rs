//! Exporters turning a route list into API-client artifacts.
//!
//! Every exporter takes `(routes, base_url, env_label)` and produces a self-contained
//! document. URLs are `base_url` joined with the route path, with every placeholder
//! replaced by an example token; body-carrying methods get an example JSON payload
//! built from the route's body fields.
//!
//! # Supported Formats
//!
//! - **Postman**: v2.1 collection, see [`postman::generate_postman_collection`]
//! - **Insomnia**: v4 export, see [`insomnia::generate_insomnia_export`]
//! - **HTTPie**: desktop collection, see [`httpie::generate_httpie_export`]
//! - **cURL**: bash script or Markdown, see [`curl`]

pub mod curl;
pub mod httpie;
pub mod insomnia;
pub mod postman;

use crate::error::Result;
use crate::matcher::join_base;
use crate::route::Route;
use crate::serializer::serialize_json;
use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

/// Placeholder syntaxes: `:id`, `{id}`, `{id:\d+}`, `{id?}`, `<int:id>`, `<id>`, `*path`.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:[^:<>]+:)?(\w+)>|\{(\w+)\??(?::[^}]*)?\}|:(\w+)|\*(\w+)")
        .expect("placeholder expression is valid")
});

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Postman collection (JSON)
    Postman,
    /// Insomnia export (JSON)
    Insomnia,
    /// HTTPie collection (JSON)
    Httpie,
    /// Bash script of curl commands
    Curl,
    /// Markdown document with curl examples
    Markdown,
    /// The raw route list (JSON)
    Json,
}

impl ExportFormat {
    /// Renders `routes` in this format.
    pub fn render(&self, routes: &[Route], base_url: &str, env_label: &str) -> Result<String> {
        let content = match self {
            ExportFormat::Postman => serialize_json(&postman::generate_postman_collection(
                routes, base_url, env_label,
            ))?,
            ExportFormat::Insomnia => serialize_json(&insomnia::generate_insomnia_export(
                routes, base_url, env_label,
            ))?,
            ExportFormat::Httpie => serialize_json(&httpie::generate_httpie_export(
                routes, base_url, env_label,
            ))?,
            ExportFormat::Curl => curl::generate_curl_script(routes, base_url, env_label),
            ExportFormat::Markdown => curl::generate_curl_markdown(routes, base_url),
            ExportFormat::Json => serialize_json(routes)?,
        };
        Ok(content)
    }
}

/// Example token for a placeholder: `1` for id-like names, `example` otherwise.
pub fn example_value(name: &str) -> &'static str {
    // `user_id` and camelCase `userId` count, words such as `paid` do not
    let id_like = name.eq_ignore_ascii_case("id")
        || name.to_lowercase().ends_with("_id")
        || name.ends_with("Id")
        || name.ends_with("ID");
    if id_like {
        "1"
    } else {
        "example"
    }
}

/// Replaces every placeholder in `path` with an example token.
pub fn substitute_placeholders(path: &str) -> String {
    PLACEHOLDER
        .replace_all(path, |caps: &Captures| {
            let name = (1..=4)
                .find_map(|i| caps.get(i))
                .map(|m| m.as_str())
                .unwrap_or_default();
            example_value(name).to_string()
        })
        .into_owned()
}

/// Full example URL: `base_url` joined with the substituted path.
pub fn example_url(base_url: &str, path: &str) -> String {
    join_base(base_url.trim(), &substitute_placeholders(path))
}

/// Example URL including a query string built from the route's query keys.
pub fn example_url_with_query(base_url: &str, route: &Route) -> String {
    let url = example_url(base_url, &route.path);
    if route.query.is_empty() {
        return url;
    }
    let query: Vec<String> = route
        .query
        .iter()
        .map(|key| format!("{}={}", key, example_value(key)))
        .collect();
    format!("{}?{}", url, query.join("&"))
}

/// JSON object with one example string per body field, in field order.
pub fn example_body(fields: &[String]) -> Value {
    let mut object = Map::new();
    for field in fields {
        object.insert(field.clone(), Value::String("example".to_string()));
    }
    Value::Object(object)
}

/// Pretty-printed example payload for a route, if its method carries a body.
pub fn example_payload(route: &Route) -> Option<String> {
    if !route.method.carries_body() {
        return None;
    }
    serde_json::to_string_pretty(&example_body(&route.body)).ok()
}

/// Display name for a route, e.g. `GET /users/:id`.
pub fn route_name(route: &Route) -> String {
    format!("{} {}", route.method, route.path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::HttpMethod;

    #[test]
    fn test_substitute_all_placeholder_styles() {
        assert_eq!(substitute_placeholders("/users/:id"), "/users/1");
        assert_eq!(substitute_placeholders("/users/{id}/posts/{slug}"), "/users/1/posts/example");
        assert_eq!(substitute_placeholders("/users/<int:user_id>/"), "/users/1/");
        assert_eq!(substitute_placeholders("/files/{path:.*}"), "/files/example");
        assert_eq!(substitute_placeholders("/users/{id?}"), "/users/1");
        assert_eq!(substitute_placeholders("/static/*filepath"), "/static/example");
        assert_eq!(substitute_placeholders("/orgs/{orgId}"), "/orgs/1");
        assert_eq!(substitute_placeholders("/plain"), "/plain");
    }

    #[test]
    fn test_example_value_id_detection() {
        assert_eq!(example_value("id"), "1");
        assert_eq!(example_value("user_id"), "1");
        assert_eq!(example_value("userId"), "1");
        assert_eq!(example_value("paid"), "example");
        assert_eq!(example_value("name"), "example");
    }

    #[test]
    fn test_example_url_joins_base() {
        assert_eq!(example_url("http://localhost:3000", "/users/:id"), "http://localhost:3000/users/1");
        assert_eq!(example_url("http://localhost:8000/", "users/"), "http://localhost:8000/users/");
        assert_eq!(example_url("", "/users"), "/users");
    }

    #[test]
    fn test_query_string() {
        let mut route = Route::new("/products", HttpMethod::Get);
        route.query = vec!["page".to_string(), "size".to_string()];

        assert_eq!(
            example_url_with_query("http://api", &route),
            "http://api/products?page=example&size=example"
        );
    }

    #[test]
    fn test_payload_only_for_body_methods() {
        let mut post = Route::new("/users", HttpMethod::Post);
        post.body = vec!["name".to_string(), "email".to_string()];
        let get = Route::new("/users", HttpMethod::Get);

        let payload = example_payload(&post).unwrap();
        assert!(payload.contains("\"name\": \"example\""));
        assert!(payload.contains("\"email\""));
        assert!(example_payload(&get).is_none());
        assert_eq!(example_payload(&Route::new("/x", HttpMethod::Put)).unwrap(), "{}");
    }

    #[test]
    fn test_render_json_route_list() {
        let routes = vec![Route::new("/users", HttpMethod::Get)];

        let json = ExportFormat::Json.render(&routes, "http://api", "dev").unwrap();

        assert!(json.contains("\"path\": \"/users\""));
        assert!(json.contains("\"method\": \"GET\""));
    }
}
