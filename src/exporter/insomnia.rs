use super::{example_payload, example_url_with_query, route_name};
use crate::route::Route;
use log::debug;
use serde::{Deserialize, Serialize};

const WORKSPACE_ID: &str = "wrk_routes";
const ENVIRONMENT_ID: &str = "env_routes";

/// Insomnia export document (format v4)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsomniaExport {
    #[serde(rename = "_type")]
    pub export_type: String,
    #[serde(rename = "__export_format")]
    pub export_format: u32,
    #[serde(rename = "__export_source")]
    pub export_source: String,
    pub resources: Vec<Resource>,
}

/// A workspace, environment or request resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_type")]
    pub resource_type: String,
    #[serde(rename = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub headers: Vec<Header>,
    /// Environment variables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Resource {
    fn new(id: String, resource_type: &str, parent_id: Option<&str>, name: String) -> Self {
        Self {
            id,
            resource_type: resource_type.to_string(),
            parent_id: parent_id.map(str::to_string),
            name,
            method: None,
            url: None,
            body: None,
            headers: Vec::new(),
            data: None,
        }
    }
}

/// Builds an Insomnia export: one workspace, one environment holding the base URL,
/// then one request per route.
pub fn generate_insomnia_export(routes: &[Route], base_url: &str, env_label: &str) -> InsomniaExport {
    debug!("Building Insomnia export with {} routes", routes.len());

    let mut resources = Vec::with_capacity(routes.len() + 2);
    resources.push(Resource::new(
        WORKSPACE_ID.to_string(),
        "workspace",
        None,
        format!("API routes ({})", env_label),
    ));

    let mut environment = Resource::new(
        ENVIRONMENT_ID.to_string(),
        "environment",
        Some(WORKSPACE_ID),
        env_label.to_string(),
    );
    environment.data = Some(serde_json::json!({ "base_url": base_url }));
    resources.push(environment);

    for (index, route) in routes.iter().enumerate() {
        let mut request = Resource::new(
            format!("req_{}", index + 1),
            "request",
            Some(WORKSPACE_ID),
            route_name(route),
        );
        request.method = Some(route.method.to_string());
        request.url = Some(example_url_with_query(base_url, route));
        if let Some(text) = example_payload(route) {
            request.body = Some(RequestBody {
                mime_type: "application/json".to_string(),
                text,
            });
            request.headers.push(Header {
                name: "Content-Type".to_string(),
                value: "application/json".to_string(),
            });
        }
        resources.push(request);
    }

    InsomniaExport {
        export_type: "export".to_string(),
        export_format: 4,
        export_source: format!("{}:{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        resources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::HttpMethod;

    #[test]
    fn test_generate_insomnia_export() {
        let routes = vec![Route::new("/api/users", HttpMethod::Get)];

        let export = generate_insomnia_export(&routes, "/test", "dev");

        assert_eq!(export.export_type, "export");
        assert_eq!(export.export_format, 4);
        assert_eq!(export.resources.len(), 3);

        let request = &export.resources[2];
        assert_eq!(request.resource_type, "request");
        assert_eq!(request.method.as_deref(), Some("GET"));
        assert_eq!(request.url.as_deref(), Some("/test/api/users"));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_body_methods_get_payload() {
        let mut route = Route::new("/users/{id}", HttpMethod::Put);
        route.body = vec!["name".to_string()];

        let export = generate_insomnia_export(&[route], "http://api", "prod");

        let request = &export.resources[2];
        assert_eq!(request.url.as_deref(), Some("http://api/users/1"));
        assert!(request.body.as_ref().unwrap().text.contains("\"name\""));

        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("\"_type\":\"export\""));
        assert!(json.contains("\"parentId\":\"wrk_routes\""));
    }
}
