//! cURL renderings: an executable bash script and a Markdown reference.

use super::{example_payload, example_url_with_query, route_name};
use crate::route::Route;
use serde_json::Value;
use std::fmt::Write;

/// Compact JSON for a `-d` argument; the pretty form is kept for Markdown.
fn compact(payload: &str) -> String {
    serde_json::from_str::<Value>(payload)
        .map(|value| value.to_string())
        .unwrap_or_else(|_| payload.to_string())
}

/// Single-quotes `text` for bash; embedded `'` become `'\''`.
fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

/// Variable the script reads its base URL from.
const BASE_URL_VAR: &str = "$BASE_URL";

/// Shell word for the request URL. With `base_url = None` the URL starts with a
/// double-quoted `$BASE_URL`; everything taken from the source is single-quoted so
/// the shell never expands it.
fn url_word(route: &Route, base_url: Option<&str>) -> String {
    match base_url {
        Some(base) => shell_quote(&example_url_with_query(base, route)),
        None => {
            let url = example_url_with_query(BASE_URL_VAR, route);
            let rest = url.strip_prefix(BASE_URL_VAR).unwrap_or(&url);
            if rest.is_empty() {
                format!("\"{}\"", BASE_URL_VAR)
            } else {
                format!("\"{}\"{}", BASE_URL_VAR, shell_quote(rest))
            }
        }
    }
}

fn curl_command(route: &Route, base_url: Option<&str>, continuation: &str) -> String {
    let mut command = format!("curl -X {} {}", route.method, url_word(route, base_url));
    if let Some(payload) = example_payload(route) {
        command.push_str(continuation);
        command.push_str("-H \"Content-Type: application/json\"");
        command.push_str(continuation);
        command.push_str(&format!("-d {}", shell_quote(&compact(&payload))));
    }
    command
}

/// Bash script issuing one curl command per route.
///
/// The base URL is read from `$BASE_URL` and falls back to `base_url`.
pub fn generate_curl_script(routes: &[Route], base_url: &str, env_label: &str) -> String {
    let mut script = String::new();
    let _ = writeln!(script, "#!/usr/bin/env bash");
    let _ = writeln!(script, "# API requests ({})", env_label);
    let _ = writeln!(script, "# Generated by {}", env!("CARGO_PKG_NAME"));
    let _ = writeln!(script, "set -euo pipefail");
    let _ = writeln!(script);
    let _ = writeln!(script, "if [ -z \"${{BASE_URL:-}}\" ]; then");
    let _ = writeln!(script, "  BASE_URL={}", shell_quote(base_url));
    let _ = writeln!(script, "fi");

    for route in routes {
        let _ = writeln!(script);
        let _ = writeln!(script, "# {}", route_name(route).replace('\n', " "));
        let _ = writeln!(script, "{}", curl_command(route, None, " \\\n  "));
    }
    script
}

/// Markdown document with an index table and a curl example per route.
pub fn generate_curl_markdown(routes: &[Route], base_url: &str) -> String {
    let mut doc = String::new();
    let _ = writeln!(doc, "# API Reference");
    let _ = writeln!(doc);
    let _ = writeln!(doc, "Base URL: `{}`", base_url);
    let _ = writeln!(doc);
    let _ = writeln!(doc, "| Method | Path |");
    let _ = writeln!(doc, "|--------|------|");
    for route in routes {
        let _ = writeln!(doc, "| {} | `{}` |", route.method, route.path);
    }

    for route in routes {
        let _ = writeln!(doc);
        let _ = writeln!(doc, "## {}", route_name(route));
        let _ = writeln!(doc);
        if !route.params.is_empty() {
            let _ = writeln!(doc, "Path parameters: {}", code_list(&route.params));
            let _ = writeln!(doc);
        }
        if !route.query.is_empty() {
            let _ = writeln!(doc, "Query parameters: {}", code_list(&route.query));
            let _ = writeln!(doc);
        }
        if let Some(payload) = example_payload(route) {
            let _ = writeln!(doc, "Example body:");
            let _ = writeln!(doc);
            let _ = writeln!(doc, "```json\n{}\n```", payload);
            let _ = writeln!(doc);
        }
        let _ = writeln!(doc, "```bash\n{}\n```", curl_command(route, Some(base_url), " \\\n  "));
    }
    doc
}

fn code_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("`{}`", item))
        .collect::<Vec<_>>()
        .join(", ")
}
