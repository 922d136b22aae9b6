use super::{example_payload, example_url_with_query, example_value, route_name};
use crate::route::Route;
use log::debug;
use serde::{Deserialize, Serialize};

const POSTMAN_SCHEMA: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Postman collection (format v2.1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanCollection {
    pub info: Info,
    pub item: Vec<Item>,
    /// Collection variables; `baseUrl` carries the base URL
    pub variable: Vec<Variable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: String,
}

/// One request in the collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub request: Request,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub header: Vec<Header>,
    pub url: Url,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Url {
    pub raw: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub query: Vec<QueryParam>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

/// Raw JSON request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub mode: String,
    pub raw: String,
    pub options: BodyOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyOptions {
    pub raw: RawOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOptions {
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
}

/// Builds a Postman collection with one item per route, in route order.
pub fn generate_postman_collection(routes: &[Route], base_url: &str, env_label: &str) -> PostmanCollection {
    debug!("Building Postman collection with {} routes", routes.len());

    let item = routes
        .iter()
        .map(|route| {
            let body = example_payload(route).map(|raw| Body {
                mode: "raw".to_string(),
                raw,
                options: BodyOptions {
                    raw: RawOptions {
                        language: "json".to_string(),
                    },
                },
            });
            let header = if body.is_some() {
                vec![Header {
                    key: "Content-Type".to_string(),
                    value: "application/json".to_string(),
                }]
            } else {
                Vec::new()
            };

            Item {
                name: route_name(route),
                request: Request {
                    method: route.method.to_string(),
                    header,
                    url: Url {
                        raw: example_url_with_query(base_url, route),
                        query: route
                            .query
                            .iter()
                            .map(|key| QueryParam {
                                key: key.clone(),
                                value: example_value(key).to_string(),
                            })
                            .collect(),
                    },
                    body,
                },
            }
        })
        .collect();

    PostmanCollection {
        info: Info {
            name: format!("API routes ({})", env_label),
            description: Some(format!("Generated from source, base URL {}", base_url)),
            schema: POSTMAN_SCHEMA.to_string(),
        },
        item,
        variable: vec![Variable {
            key: "baseUrl".to_string(),
            value: base_url.to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::HttpMethod;

    fn routes() -> Vec<Route> {
        let mut list = Route::new("/users", HttpMethod::Get);
        list.query = vec!["page".to_string()];
        let mut create = Route::new("/users/:id", HttpMethod::Post);
        create.params = vec!["id".to_string()];
        create.body = vec!["name".to_string(), "email".to_string()];
        vec![list, create]
    }

    #[test]
    fn test_generate_postman_collection() {
        let collection = generate_postman_collection(&routes(), "http://localhost:3000", "dev");

        assert!(!collection.info.name.is_empty());
        assert!(collection.info.name.contains("dev"));
        assert_eq!(collection.item.len(), 2);

        let get = &collection.item[0].request;
        assert_eq!(get.method, "GET");
        assert_eq!(get.url.raw, "http://localhost:3000/users?page=example");
        assert_eq!(get.url.query.len(), 1);
        assert!(get.body.is_none());
        assert!(get.header.is_empty());

        let post = &collection.item[1].request;
        assert_eq!(post.url.raw, "http://localhost:3000/users/1");
        let body = post.body.as_ref().unwrap();
        assert!(body.raw.contains("\"email\""));
        assert_eq!(post.header[0].value, "application/json");
    }

    #[test]
    fn test_collection_serializes_schema() {
        let collection = generate_postman_collection(&routes(), "/test", "dev");

        let json = serde_json::to_string(&collection).unwrap();

        assert!(json.contains("collection/v2.1.0"));
        assert!(json.contains("\"baseUrl\""));
    }
}
