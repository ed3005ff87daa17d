//! # Route Snapshot
//!
//! The host application's route table, captured as an explicit value. The
//! pipeline never looks routes up from ambient state: callers load a
//! [`RouteTable`] (JSON or YAML) and pass it in, which keeps generation a
//! pure function of its input.
//!
//! ## Validation Capability
//!
//! Handler parameters are described by [`ParameterSpec`]. A parameter whose
//! type is a validation request carries its resolved rule mapping, exposed
//! through the [`ValidationSource`] trait. The extractor only ever asks that
//! trait; how the host resolved the rules is not the core's concern.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RouteGenError;
use crate::rules::RuleMapping;

/// Snapshot of every registered route, in the router's enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// One registered route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// URI template, e.g. `api/users/{id?}`.
    pub uri: String,
    /// Verbs the route answers, as reported (any case).
    #[serde(default)]
    pub methods: Vec<String>,
    /// Middleware names in application order.
    #[serde(default)]
    pub middleware: Vec<String>,
    #[serde(default)]
    pub action: RouteAction,
}

/// The handler bound to a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteAction {
    /// `Class@method` reference; absent for closures.
    #[serde(default)]
    pub uses: Option<String>,
    /// Declared handler parameters, in signature order.
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

/// One declared handler parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(default)]
    pub name: Option<String>,
    /// Declared type, when the host reports one.
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    /// Rules declared by the parameter type, present only for validation requests.
    #[serde(default)]
    pub validation: Option<RuleMapping>,
}

/// Capability of a handler parameter that declares validation rules.
pub trait ValidationSource {
    /// The field → rule-token mapping, or `None` if this is not a validation request.
    fn validation_rules(&self) -> Option<&RuleMapping>;
}

impl ValidationSource for ParameterSpec {
    fn validation_rules(&self) -> Option<&RuleMapping> {
        self.validation.as_ref()
    }
}

/// How a route's handler reference resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerRef<'a> {
    /// A string-encoded `Class@method` reference.
    Action { class: &'a str, method: &'a str },
    /// A closure; no signature to inspect.
    Closure,
    /// A string without an `@method` part.
    Opaque(&'a str),
}

impl RouteAction {
    /// Resolve the handler reference.
    pub fn handler(&self) -> HandlerRef<'_> {
        match self.uses.as_deref().map(str::trim) {
            None | Some("") | Some("Closure") => HandlerRef::Closure,
            Some(reference) => match reference.split_once('@') {
                Some((class, method)) if !class.is_empty() && !method.is_empty() => {
                    HandlerRef::Action { class, method }
                }
                _ => HandlerRef::Opaque(reference),
            },
        }
    }

    /// The reference as the router would print it (`Closure` for closures).
    pub fn reference(&self) -> &str {
        match self.uses.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => r,
            _ => "Closure",
        }
    }
}

impl RouteTable {
    /// Parse a JSON snapshot.
    pub fn from_json_str(content: &str) -> Result<Self, RouteGenError> {
        serde_json::from_str(content)
            .map_err(|e| RouteGenError::Snapshot(format!("invalid JSON snapshot: {e}")))
    }

    /// Parse a YAML snapshot.
    pub fn from_yaml_str(content: &str) -> Result<Self, RouteGenError> {
        serde_yaml::from_str(content)
            .map_err(|e| RouteGenError::Snapshot(format!("invalid YAML snapshot: {e}")))
    }

    /// Load a snapshot file, choosing the parser by extension (`.yaml`/`.yml`
    /// → YAML, anything else → JSON). The path `-` reads JSON from stdin.
    pub fn load(path: &Path) -> Result<Self, RouteGenError> {
        if path.as_os_str() == "-" {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|e| RouteGenError::Snapshot(format!("reading stdin: {e}")))?;
            return Self::from_json_str(&content);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            RouteGenError::Snapshot(format!("reading {}: {e}", path.display()))
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }
}
