//! Turns raw occurrences into canonical [`Route`] records.

use crate::matcher::RawOccurrence;
use crate::plugin::Plugin;
use crate::route::{HttpMethod, Route};
use log::debug;
use regex::Regex;

/// Canonicalizes raw matches.
///
/// Path templates are passed through verbatim; framework differences are handled only
/// through the plugin's query/body expressions.
pub struct RouteNormalizer;

impl RouteNormalizer {
    /// Builds a route from one occurrence, or `None` when it cannot satisfy the route
    /// invariants (unrecognised method, empty path). Unknown verbs are discarded, never
    /// defaulted.
    ///
    /// `content` is the file the occurrence was found in; the occurrence's window is
    /// scanned with the plugin's query and body expressions.
    pub fn normalize(occurrence: RawOccurrence, plugin: &Plugin, content: &str) -> Option<Route> {
        let method = match occurrence.method.parse::<HttpMethod>() {
            Ok(method) => method,
            Err(e) => {
                debug!("Discarding '{}' from {}: {}", occurrence.path, plugin.name, e);
                return None;
            }
        };
        if occurrence.path.is_empty() {
            debug!("Discarding {} route with empty path from {}", method, plugin.name);
            return None;
        }

        let window = content.get(occurrence.window.clone()).unwrap_or_default();
        let query = keys_in_source_order(&plugin.query_regex, window);
        let body = keys_in_source_order(&plugin.body_regex, window);

        Some(Route {
            path: occurrence.path,
            method,
            params: occurrence.params,
            query,
            body,
        })
    }

    /// Normalizes a batch, keeping the input order and dropping rejects.
    pub fn normalize_all(
        occurrences: Vec<RawOccurrence>,
        plugin: &Plugin,
        content: &str,
    ) -> Vec<Route> {
        occurrences
            .into_iter()
            .filter_map(|occurrence| Self::normalize(occurrence, plugin, content))
            .collect()
    }
}

/// Group 1 of every match of every expression, ordered by position in `text`, first
/// occurrence kept.
fn keys_in_source_order(regexes: &[Regex], text: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = regexes
        .iter()
        .flat_map(|regex| regex.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .filter(|m| !m.as_str().is_empty())
        .map(|m| (m.start(), m.as_str()))
        .collect();
    found.sort_by_key(|(offset, _)| *offset);

    let mut keys: Vec<String> = Vec::new();
    for (_, key) in found {
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::PatternMatcher;

    fn plugin() -> Plugin {
        Plugin::from_yaml(
            r#"name: express
extensions: [.js]
patterns:
  - route_regex: '(?:app|router)\.(\w+)\(\s*''([^'']+)'''
    param_regex: ':(\w+)'
query_regex:
  - 'req\.query\.(\w+)'
  - 'req\.query\[''(\w+)''\]'
body_regex:
  - 'req\.body\.(\w+)'
"#,
        )
        .unwrap()
    }

    fn occurrence(method: &str, path: &str) -> RawOccurrence {
        RawOccurrence {
            method: method.to_string(),
            path: path.to_string(),
            params: Vec::new(),
            span: 0..0,
            window: 0..0,
        }
    }

    #[test]
    fn test_method_is_upper_cased() {
        let route = RouteNormalizer::normalize(occurrence("patch", "/users"), &plugin(), "").unwrap();

        assert_eq!(route.method, HttpMethod::Patch);
        assert_eq!(route.path, "/users");
    }

    #[test]
    fn test_unknown_method_is_discarded() {
        assert!(RouteNormalizer::normalize(occurrence("use", "/static"), &plugin(), "").is_none());
        assert!(RouteNormalizer::normalize(occurrence("", "/users"), &plugin(), "").is_none());
    }

    #[test]
    fn test_empty_path_is_discarded() {
        assert!(RouteNormalizer::normalize(occurrence("GET", ""), &plugin(), "").is_none());
    }

    #[test]
    fn test_placeholders_are_preserved() {
        for path in ["/users/:id", "/users/{id}", "/users/<int:id>"] {
            let route = RouteNormalizer::normalize(occurrence("GET", path), &plugin(), "").unwrap();
            assert_eq!(route.path, path);
        }
    }

    #[test]
    fn test_query_and_body_from_window() {
        let content = r#"
app.get('/products', (req, res) => {
  const page = req.query.page;
  const size = req.query.size;
  const again = req.query.page;
});

router.post('/users/:id', (req, res) => {
  const { id } = req.params;
  const name = req.body.name;
  const email = req.body.email;
});

app.use('/static', serve);
"#;
        let plugin = plugin();
        let occurrences = PatternMatcher::match_content(content, &plugin);
        assert_eq!(occurrences.len(), 3);

        let routes = RouteNormalizer::normalize_all(occurrences, &plugin, content);

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].query, vec!["page".to_string(), "size".to_string()]);
        assert!(routes[0].body.is_empty());
        assert_eq!(routes[1].method, HttpMethod::Post);
        assert_eq!(routes[1].params, vec!["id".to_string()]);
        assert_eq!(routes[1].body, vec!["name".to_string(), "email".to_string()]);
        assert!(routes[1].query.is_empty());
    }

    #[test]
    fn test_hints_follow_source_order_across_expressions() {
        let content = r#"
app.get('/products', (req, res) => {
  const size = req.query['size'];
  const page = req.query.page;
  const again = req.query['page'];
});
"#;
        let plugin = plugin();
        let occurrences = PatternMatcher::match_content(content, &plugin);

        let routes = RouteNormalizer::normalize_all(occurrences, &plugin, content);

        assert_eq!(routes[0].query, vec!["size".to_string(), "page".to_string()]);
    }

    #[test]
    fn test_no_hints_yields_empty_sets() {
        let content = "app.get('/ping', (req, res) => res.send('pong'));";
        let plugin = plugin();
        let occurrences = PatternMatcher::match_content(content, &plugin);

        let routes = RouteNormalizer::normalize_all(occurrences, &plugin, content);

        assert_eq!(routes.len(), 1);
        assert!(routes[0].query.is_empty());
        assert!(routes[0].body.is_empty());
    }
}
