//! Plugin-driven pattern matching over raw file content.
//!
//! Matching is purely textual: comments and string literals are not recognised, so a
//! route declaration that is commented out is still reported. Results are a best
//! effort and carry no completeness guarantee.

use crate::plugin::{Pattern, Plugin};
use log::trace;
use regex::{Captures, Regex};
use std::ops::Range;

/// An unnormalized route match, before the method is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOccurrence {
    /// Method token as captured (or fixed by the pattern); may be empty or bogus
    pub method: String,
    /// Path template, already prefixed with the applicable base path
    pub path: String,
    /// Placeholder names from the path, unique, left to right
    pub params: Vec<String>,
    /// Byte range of the route match within the file
    pub span: Range<usize>,
    /// Byte range searched for query and body hints
    pub window: Range<usize>,
}

/// Applies a plugin's patterns to file content.
pub struct PatternMatcher;

impl PatternMatcher {
    /// Extracts every raw occurrence the plugin's patterns find in `content`.
    ///
    /// Patterns are applied in declaration order; within a pattern, matches are reported
    /// in textual order. A method token naming several verbs (`'GET', 'POST'`) yields
    /// one occurrence per verb.
    pub fn match_content(content: &str, plugin: &Plugin) -> Vec<RawOccurrence> {
        let bases = base_paths(content, plugin.base_regex.as_ref());

        let mut occurrences = Vec::new();
        for pattern in &plugin.patterns {
            for caps in pattern.route_regex.captures_iter(content) {
                let Some(whole) = caps.get(0) else { continue };

                let fragment = caps
                    .get(pattern.path_group())
                    .map(|m| m.as_str().trim())
                    .unwrap_or_default();
                let path = join_base(base_before(&bases, whole.start()), fragment);
                let params = extract_params(pattern.param_regex.as_ref(), &path);

                for method in method_tokens(pattern, &caps) {
                    trace!("{}: {} {} at {}", plugin.name, method, path, whole.start());
                    occurrences.push(RawOccurrence {
                        method,
                        path: path.clone(),
                        params: params.clone(),
                        span: whole.range(),
                        window: whole.end()..whole.end(),
                    });
                }
            }
        }

        assign_windows(content, &mut occurrences, plugin.window_lines);
        occurrences
    }
}

/// Scans `regex` over `text`, collecting group 1 of every match, de-duplicated,
/// in first-seen order.
pub fn collect_group_one(regex: &Regex, text: &str, into: &mut Vec<String>) {
    for caps in regex.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            let value = m.as_str();
            if !value.is_empty() && !into.iter().any(|v| v == value) {
                into.push(value.to_string());
            }
        }
    }
}

/// Joins a base path and a route fragment with exactly one `/` at the seam.
pub fn join_base(base: &str, fragment: &str) -> String {
    if base.is_empty() {
        return fragment.to_string();
    }
    if fragment.is_empty() {
        return base.to_string();
    }
    match (base.ends_with('/'), fragment.starts_with('/')) {
        (true, true) => format!("{}{}", base, &fragment[1..]),
        (false, false) => format!("{}/{}", base, fragment),
        _ => format!("{}{}", base, fragment),
    }
}

fn extract_params(param_regex: Option<&Regex>, path: &str) -> Vec<String> {
    let mut params = Vec::new();
    if let Some(regex) = param_regex {
        collect_group_one(regex, path, &mut params);
    }
    params
}

fn method_tokens(pattern: &Pattern, caps: &Captures) -> Vec<String> {
    if let Some(method) = pattern.method {
        return vec![method.as_str().to_string()];
    }

    let captured: Vec<String> = pattern
        .method_group()
        .and_then(|group| caps.get(group))
        .map(|m| {
            m.as_str()
                .split(|c: char| !c.is_ascii_alphabetic())
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if !captured.is_empty() {
        return captured;
    }
    // Left empty when there is no default; the normalizer discards it.
    vec![pattern
        .default_method
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()]
}

/// `(match start, prefix)` for every base declaration, in textual order.
fn base_paths(content: &str, base_regex: Option<&Regex>) -> Vec<(usize, String)> {
    let Some(regex) = base_regex else {
        return Vec::new();
    };
    regex
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let prefix = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            Some((whole.start(), prefix.to_string()))
        })
        .collect()
}

/// Prefix of the nearest base declaration starting before `offset`.
fn base_before(bases: &[(usize, String)], offset: usize) -> &str {
    let index = bases.partition_point(|(start, _)| *start < offset);
    match index {
        0 => "",
        i => bases[i - 1].1.as_str(),
    }
}

/// Each window runs from the end of its match for `lines` lines, cut short by the next
/// route match of the same plugin.
fn assign_windows(content: &str, occurrences: &mut [RawOccurrence], lines: usize) {
    let mut starts: Vec<usize> = occurrences.iter().map(|o| o.span.start).collect();
    starts.sort_unstable();
    starts.dedup();

    for occurrence in occurrences.iter_mut() {
        let start = occurrence.span.end;
        let line_end = content[start..]
            .match_indices('\n')
            .nth(lines)
            .map(|(i, _)| start + i)
            .unwrap_or(content.len());
        let next_route = starts
            .iter()
            .copied()
            .find(|s| *s > occurrence.span.start)
            .unwrap_or(content.len());
        let end = line_end.min(next_route).max(start);
        occurrence.window = start..end;
    }
}
