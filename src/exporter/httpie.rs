use super::{example_payload, example_url, example_value, route_name};
use crate::route::Route;
use log::debug;
use serde::{Deserialize, Serialize};

/// HTTPie desktop collection export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpieExport {
    pub meta: Meta,
    pub entry: Entry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub format: String,
    pub version: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub name: String,
    pub url: String,
    pub method: String,
    pub headers: Vec<KeyValue>,
    #[serde(rename = "queryParams")]
    pub query_params: Vec<KeyValue>,
    pub body: Body,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyValue {
    pub name: String,
    pub value: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    #[serde(rename = "type")]
    pub body_type: String,
    pub text: TextBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBody {
    pub value: String,
    pub format: String,
}

fn key_value(name: &str, value: &str) -> KeyValue {
    KeyValue {
        name: name.to_string(),
        value: value.to_string(),
        enabled: true,
    }
}

/// Builds an HTTPie collection with one request per route.
///
/// Query keys go into `queryParams` rather than the URL.
pub fn generate_httpie_export(routes: &[Route], base_url: &str, env_label: &str) -> HttpieExport {
    debug!("Building HTTPie export with {} routes", routes.len());

    let requests = routes
        .iter()
        .map(|route| {
            let payload = example_payload(route);
            let headers = if payload.is_some() {
                vec![key_value("Content-Type", "application/json")]
            } else {
                Vec::new()
            };
            let body = match payload {
                Some(value) => Body {
                    body_type: "text".to_string(),
                    text: TextBody {
                        value,
                        format: "application/json".to_string(),
                    },
                },
                None => Body {
                    body_type: "none".to_string(),
                    text: TextBody {
                        value: String::new(),
                        format: "application/json".to_string(),
                    },
                },
            };

            Request {
                name: route_name(route),
                url: example_url(base_url, &route.path),
                method: route.method.to_string(),
                headers,
                query_params: route
                    .query
                    .iter()
                    .map(|key| key_value(key, example_value(key)))
                    .collect(),
                body,
            }
        })
        .collect();

    HttpieExport {
        meta: Meta {
            format: "httpie".to_string(),
            version: "1.0.0".to_string(),
            content_type: "collection".to_string(),
        },
        entry: Entry {
            name: format!("API routes ({})", env_label),
            requests,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::HttpMethod;

    #[test]
    fn test_generate_httpie_export() {
        let routes = vec![Route::new("/users", HttpMethod::Get)];

        let export = generate_httpie_export(&routes, "/test", "dev");

        assert_eq!(export.meta.format, "httpie");
        assert_eq!(export.entry.requests.len(), 1);
        assert_eq!(export.entry.requests[0].url, "/test/users");
        assert_eq!(export.entry.requests[0].body.body_type, "none");
    }

    #[test]
    fn test_query_and_body() {
        let mut route = Route::new("/search/<term>", HttpMethod::Patch);
        route.query = vec!["limit".to_string()];
        route.body = vec!["tags".to_string()];

        let export = generate_httpie_export(&[route], "http://api", "dev");

        let request = &export.entry.requests[0];
        assert_eq!(request.url, "http://api/search/example");
        assert_eq!(request.query_params[0].name, "limit");
        assert_eq!(request.body.body_type, "text");
        assert!(request.body.text.value.contains("\"tags\""));
    }
}
