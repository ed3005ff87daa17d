//! # Route Selection
//!
//! Turns a route snapshot into the ordered list of (route, verb) pairs a
//! generation run works through.
//!
//! ## Rules
//!
//! - URIs get a leading `/` and lose every optional-segment marker (`?`):
//!   tests always target the fully-qualified form, so `users/{id?}` becomes
//!   `/users/{id}`.
//! - An optional prefix filter is a literal anchor on the normalized URI.
//!   It is compared with `starts_with`, so regex metacharacters in the
//!   filter carry no special meaning.
//! - Each retained route expands into one entry per distinct declared verb.
//!   `HEAD` is dropped as a protocol artifact; verbs outside
//!   GET/POST/PUT/PATCH/DELETE are skipped as unsupported.
//! - Output follows the snapshot's route order, then declared verb order.
//!   That order is a convenience within one run, not a correctness property.

use std::fmt;

use serde::Serialize;

use routegen_core::{classify_verb, HttpMethod, Route, RouteTable, VerbClass};

/// One (route, verb) pair selected for generation.
#[derive(Debug, Clone)]
pub struct SelectedRoute<'a> {
    /// Position of the route in the snapshot.
    pub index: usize,
    pub route: &'a Route,
    /// Normalized URI.
    pub uri: String,
    pub method: HttpMethod,
}

/// Why a route (or one of its verbs) produced no TestCase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Normalized URI does not start with the prefix filter.
    FilteredOut,
    /// `HEAD`: no distinct test value over GET.
    ProtocolVerb { verb: String },
    /// A verb outside the five semantic ones.
    UnsupportedVerb { verb: String },
    /// The route declares no verbs at all.
    NoVerbs,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilteredOut => f.write_str("outside prefix filter"),
            Self::ProtocolVerb { verb } => write!(f, "{verb} is a protocol artifact"),
            Self::UnsupportedVerb { verb } => write!(f, "{verb} is not a supported verb"),
            Self::NoVerbs => f.write_str("no verbs declared"),
        }
    }
}

/// A skipped route or verb, with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRoute {
    pub uri: String,
    pub reason: SkipReason,
}

/// Result of selecting over a whole snapshot.
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    pub entries: Vec<SelectedRoute<'a>>,
    pub skipped: Vec<SkippedRoute>,
}

/// Applies URI normalization, the prefix filter and verb expansion.
#[derive(Debug, Clone, Default)]
pub struct RouteSelector {
    prefix: Option<String>,
}

impl RouteSelector {
    /// An empty prefix behaves like no filter.
    pub fn new(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Select every (route, verb) pair from the snapshot.
    pub fn select<'a>(&self, table: &'a RouteTable) -> Selection<'a> {
        let mut selection = Selection::default();

        for (index, route) in table.routes.iter().enumerate() {
            let uri = normalize_uri(&route.uri);

            if let Some(prefix) = &self.prefix {
                if !matches_prefix(&uri, prefix) {
                    tracing::trace!(%uri, %prefix, "route outside prefix filter");
                    selection.skipped.push(SkippedRoute {
                        uri,
                        reason: SkipReason::FilteredOut,
                    });
                    continue;
                }
            }

            if route.methods.is_empty() {
                selection.skipped.push(SkippedRoute {
                    uri,
                    reason: SkipReason::NoVerbs,
                });
                continue;
            }

            let mut seen: Vec<HttpMethod> = Vec::new();
            for verb in &route.methods {
                match classify_verb(verb) {
                    VerbClass::Semantic(method) => {
                        if seen.contains(&method) {
                            continue;
                        }
                        seen.push(method);
                        selection.entries.push(SelectedRoute {
                            index,
                            route,
                            uri: uri.clone(),
                            method,
                        });
                    }
                    VerbClass::ProtocolArtifact => {
                        tracing::trace!(%uri, "dropping HEAD");
                        selection.skipped.push(SkippedRoute {
                            uri: uri.clone(),
                            reason: SkipReason::ProtocolVerb {
                                verb: "HEAD".to_string(),
                            },
                        });
                    }
                    VerbClass::Unsupported(verb) => {
                        tracing::debug!(%uri, %verb, "skipping unsupported verb");
                        selection.skipped.push(SkippedRoute {
                            uri: uri.clone(),
                            reason: SkipReason::UnsupportedVerb { verb },
                        });
                    }
                }
            }
        }

        tracing::debug!(
            selected = selection.entries.len(),
            skipped = selection.skipped.len(),
            "route selection complete"
        );
        selection
    }
}

/// Prepend a leading `/` and strip optional-segment markers.
pub fn normalize_uri(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = trimmed.replace('?', "");
    if stripped.starts_with('/') {
        stripped
    } else {
        format!("/{stripped}")
    }
}

/// Literal prefix match on a normalized URI.
pub fn matches_prefix(uri: &str, prefix: &str) -> bool {
    uri.starts_with(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use routegen_core::RouteAction;

    fn route(uri: &str, methods: &[&str]) -> Route {
        Route {
            uri: uri.to_string(),
            methods: methods.iter().map(|m| m.to_string()).collect(),
            middleware: vec![],
            action: RouteAction::default(),
        }
    }

    fn table(routes: Vec<Route>) -> RouteTable {
        RouteTable { routes }
    }

    #[test]
    fn normalize_strips_optional_markers_and_adds_slash() {
        assert_eq!(normalize_uri("users/{id?}"), "/users/{id}");
        assert_eq!(normalize_uri("/users/{id?}/posts/{post?}"), "/users/{id}/posts/{post}");
        assert_eq!(normalize_uri("/"), "/");
        assert_eq!(normalize_uri(""), "/");
    }

    #[test]
    fn optional_segment_and_head_excluded() {
        let t = table(vec![route("/users/{id?}", &["GET", "POST", "HEAD"])]);
        let selection = RouteSelector::new(None).select(&t);
        let pairs: Vec<(&str, HttpMethod)> = selection
            .entries
            .iter()
            .map(|e| (e.uri.as_str(), e.method))
            .collect();
        assert_eq!(
            pairs,
            [("/users/{id}", HttpMethod::Get), ("/users/{id}", HttpMethod::Post)]
        );
        assert_eq!(
            selection.skipped,
            [SkippedRoute {
                uri: "/users/{id}".into(),
                reason: SkipReason::ProtocolVerb { verb: "HEAD".into() }
            }]
        );
    }

    #[test]
    fn verbs_are_uppercased_and_deduplicated() {
        let t = table(vec![route("/a", &["get", "GET", "patch"])]);
        let selection = RouteSelector::new(None).select(&t);
        let methods: Vec<HttpMethod> = selection.entries.iter().map(|e| e.method).collect();
        assert_eq!(methods, [HttpMethod::Get, HttpMethod::Patch]);
    }

    #[test]
    fn prefix_filter_is_literal() {
        let t = table(vec![
            route("api/users", &["GET"]),
            route("web/home", &["GET"]),
            route("apiXusers", &["GET"]),
        ]);
        let selection = RouteSelector::new(Some("/api/")).select(&t);
        assert_eq!(selection.entries.len(), 1);
        assert_eq!(selection.entries[0].uri, "/api/users");
        assert_eq!(
            selection
                .skipped
                .iter()
                .filter(|s| s.reason == SkipReason::FilteredOut)
                .count(),
            2
        );
    }

    #[test]
    fn metacharacters_in_filter_are_not_patterns() {
        let t = table(vec![route("/v1.0/items", &["GET"]), route("/v1x0/items", &["GET"])]);
        let selection = RouteSelector::new(Some("/v1.0")).select(&t);
        assert_eq!(selection.entries.len(), 1);
        assert_eq!(selection.entries[0].uri, "/v1.0/items");
    }

    #[test]
    fn filter_applies_to_normalized_uri() {
        let t = table(vec![route("reports/{year?}", &["GET"])]);
        let selection = RouteSelector::new(Some("/reports/{year}")).select(&t);
        assert_eq!(selection.entries.len(), 1);
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let selector = RouteSelector::new(Some(""));
        assert!(selector.prefix().is_none());
        let t = table(vec![route("/a", &["GET"]), route("/b", &["DELETE"])]);
        assert_eq!(selector.select(&t).entries.len(), 2);
    }

    #[test]
    fn options_and_empty_verbs_are_skipped_with_reason() {
        let t = table(vec![route("/a", &["OPTIONS"]), route("/b", &[])]);
        let selection = RouteSelector::new(None).select(&t);
        assert!(selection.entries.is_empty());
        assert_eq!(
            selection.skipped[0].reason,
            SkipReason::UnsupportedVerb {
                verb: "OPTIONS".into()
            }
        );
        assert_eq!(selection.skipped[1].reason, SkipReason::NoVerbs);
    }

    #[test]
    fn preserves_snapshot_order() {
        let t = table(vec![route("/z", &["GET"]), route("/a", &["GET"])]);
        let selection = RouteSelector::new(None).select(&t);
        let indices: Vec<usize> = selection.entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, [0, 1]);
        assert_eq!(selection.entries[0].uri, "/z");
    }

    #[test]
    fn skip_reason_display() {
        assert_eq!(SkipReason::FilteredOut.to_string(), "outside prefix filter");
        assert_eq!(
            SkipReason::UnsupportedVerb { verb: "TRACE".into() }.to_string(),
            "TRACE is not a supported verb"
        );
    }
}
