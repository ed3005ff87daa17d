//! # TestCase Descriptor
//!
//! The canonical, language-neutral description of one endpoint's expected
//! valid and invalid request scenarios. Built once per (route, verb) by the
//! case builder, consumed once by the suite formatter, then dropped.
//!
//! ## Invariants
//!
//! - `happy_payload` holds one entry per declared field, plus the
//!   `<field>_confirmation` companion of every `confirmed` field.
//! - Every failure payload is the happy payload with exactly one field
//!   mutated (or omitted), so a failing test isolates its cause.
//! - Descriptors are immutable once built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::method::HttpMethod;

/// Request body: field name → sample value, ordered by field name.
pub type Payload = BTreeMap<String, Value>;

/// Suffix of the companion field a `confirmed` rule checks against.
pub const CONFIRMATION_SUFFIX: &str = "_confirmation";

/// Status class a failure scenario is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusHint {
    ValidationError,
    Unauthorized,
}

impl StatusHint {
    /// HTTP status code the host framework answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError => 422,
            Self::Unauthorized => 401,
        }
    }
}

/// Why a synthesized value could not be checked locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnverifiedReason {
    /// Depends on rows in an external store (`unique`, `exists`).
    ExternalStore { table: String },
    /// No generic construction satisfies the pattern.
    PatternInfeasible { pattern: String },
    /// The declared bounds contradict each other.
    Unsatisfiable { detail: String },
    /// Tokens the synthesizer has no strategy for.
    UnrecognizedRule { tokens: Vec<String> },
    /// A date bound relative to "now" or to another field.
    RelativeDate { reference: String },
}

impl UnverifiedReason {
    /// One-line description used in generated comments.
    pub fn describe(&self) -> String {
        match self {
            Self::ExternalStore { table } => {
                format!("depends on existing rows in '{table}'; not checked")
            }
            Self::PatternInfeasible { pattern } => {
                format!("no generic sample for pattern '{pattern}'; best-effort literal")
            }
            Self::Unsatisfiable { detail } => format!("contradictory rules: {detail}"),
            Self::UnrecognizedRule { tokens } => {
                format!("unrecognized rules: {}", tokens.join(", "))
            }
            Self::RelativeDate { reference } => {
                format!("date bound '{reference}' is not a literal date")
            }
        }
    }
}

/// One rule-violation scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureScenario {
    /// Field whose rule is violated.
    pub violated_field: String,
    /// Raw token that the mutation violates (e.g. `min:18`).
    pub violated_rule: String,
    /// Happy payload with only `violated_field` mutated.
    pub payload: Payload,
    pub expected_status: StatusHint,
}

impl FailureScenario {
    /// Whether this scenario omits the violated field entirely.
    pub fn omits_field(&self) -> bool {
        !self.payload.contains_key(&self.violated_field)
    }
}

/// Rule-derived description of one endpoint under one verb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub controller_name: String,
    pub action_name: String,
    /// Normalized URI template (optional markers removed).
    pub uri: String,
    pub method: HttpMethod,
    pub requires_auth: bool,
    /// Guard named by an `auth:<guard>` middleware, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_guard: Option<String>,
    pub happy_payload: Payload,
    pub failure_payloads: Vec<FailureScenario>,
    /// Fields whose happy value could not be verified locally.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unverified: BTreeMap<String, UnverifiedReason>,
    /// Fields left out of failure generation (no checkable rule).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unchecked_fields: Vec<String>,
}

impl TestCase {
    /// Happy path plus every failure scenario.
    pub fn scenario_count(&self) -> usize {
        1 + self.failure_payloads.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_case() -> TestCase {
        let mut happy = Payload::new();
        happy.insert("email".into(), json!("user@example.com"));
        let mut missing = happy.clone();
        missing.remove("email");
        TestCase {
            controller_name: "User".into(),
            action_name: "Store".into(),
            uri: "/api/users".into(),
            method: HttpMethod::Post,
            requires_auth: true,
            auth_guard: Some("api".into()),
            happy_payload: happy,
            failure_payloads: vec![FailureScenario {
                violated_field: "email".into(),
                violated_rule: "required".into(),
                payload: missing,
                expected_status: StatusHint::ValidationError,
            }],
            unverified: BTreeMap::new(),
            unchecked_fields: vec![],
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(StatusHint::ValidationError.status_code(), 422);
        assert_eq!(StatusHint::Unauthorized.status_code(), 401);
    }

    #[test]
    fn omission_is_detected() {
        let case = sample_case();
        assert!(case.failure_payloads[0].omits_field());
        assert_eq!(case.scenario_count(), 2);
    }

    #[test]
    fn descriptor_json_shape() {
        let value = serde_json::to_value(sample_case()).unwrap();
        assert_eq!(value["method"], "POST");
        assert_eq!(value["failure_payloads"][0]["expected_status"], "VALIDATION_ERROR");
        assert!(value.get("unverified").is_none());
        assert!(value.get("unchecked_fields").is_none());
    }

    #[test]
    fn unverified_reason_is_tagged() {
        let reason = UnverifiedReason::ExternalStore {
            table: "users".into(),
        };
        let value = serde_json::to_value(&reason).unwrap();
        assert_eq!(value, json!({"reason": "external_store", "table": "users"}));
        assert!(reason.describe().contains("users"));
    }
}
