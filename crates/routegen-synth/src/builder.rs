//! # Test Case Builder
//!
//! Assembles one [`TestCase`] per (route, verb) from the route's metadata
//! and rule mapping.
//!
//! ## Construction
//!
//! 1. Every declared field gets a synthesized valid value (happy payload).
//! 2. `same:<other>` fields copy the final value of `<other>`.
//! 3. Every `confirmed` field gets its `<field>_confirmation` companion.
//! 4. Each field contributes its failure scenarios: the happy payload with
//!    that one field omitted or replaced. Fields with no checkable rule are
//!    recorded in `unchecked_fields` instead.
//!
//! A replaced field carries its dependents along, so the scenario fails on
//! the replaced value alone: the `_confirmation` companion of a `confirmed`
//! field, and every field that is (transitively) `same:` it. An omitted
//! field takes its `same:` followers with it; an absent optional field is
//! not validated further, while a required follower still reports its own
//! omission.

use std::collections::{BTreeMap, BTreeSet};

use routegen_core::{
    FailureScenario, HttpMethod, Payload, RuleMapping, StatusHint, TestCase, UnverifiedReason,
    CONFIRMATION_SUFFIX,
};

use crate::synthesizer::{diverge, Mutation, RuleValueSynthesizer, Violation};

/// Everything the builder needs to know about one (route, verb).
#[derive(Debug, Clone, Copy)]
pub struct CaseInput<'a> {
    pub uri: &'a str,
    pub method: HttpMethod,
    pub controller_name: &'a str,
    pub action_name: &'a str,
    pub rules: &'a RuleMapping,
    pub requires_auth: bool,
    pub auth_guard: Option<&'a str>,
}

/// Builds test case descriptors.
#[derive(Debug, Clone, Default)]
pub struct TestCaseBuilder {
    synthesizer: RuleValueSynthesizer,
}

fn companion(field: &str) -> String {
    format!("{field}{CONFIRMATION_SUFFIX}")
}

impl TestCaseBuilder {
    pub fn new(synthesizer: RuleValueSynthesizer) -> Self {
        Self { synthesizer }
    }

    /// Build the descriptor for one (route, verb).
    pub fn build(&self, input: CaseInput<'_>) -> TestCase {
        let mut happy = Payload::new();
        let mut unverified = BTreeMap::new();
        let mut confirmed = BTreeSet::new();
        let mut mirrors: Vec<(&str, String)> = Vec::new();

        for (field, rules) in input.rules.iter() {
            let sample = self.synthesizer.synthesize_valid(rules.tokens());
            if let Some(reason) = sample.unverified {
                unverified.insert(field.to_string(), reason);
            }
            if sample.confirmed {
                confirmed.insert(field);
            }
            if let Some(other) = sample.mirror_of {
                mirrors.push((field, other));
            }
            happy.insert(field.to_string(), sample.value);
        }

        resolve_mirrors(&mut happy, &mirrors, &mut unverified);

        for field in &confirmed {
            if let Some(value) = happy.get(*field).cloned() {
                happy.insert(companion(field), value);
            }
        }

        let mut failure_payloads = Vec::new();
        let mut unchecked_fields = Vec::new();
        for (field, rules) in input.rules.iter() {
            match self.synthesizer.violations(field, rules.tokens()) {
                Ok(violations) => failure_payloads.extend(
                    violations
                        .into_iter()
                        .map(|v| scenario(&happy, field, v, &confirmed, &mirrors)),
                ),
                Err(err) => {
                    tracing::debug!(
                        uri = input.uri,
                        field,
                        error = %err,
                        "field excluded from failure scenarios"
                    );
                    unchecked_fields.push(field.to_string());
                }
            }
        }

        TestCase {
            controller_name: input.controller_name.to_string(),
            action_name: input.action_name.to_string(),
            uri: input.uri.to_string(),
            method: input.method,
            requires_auth: input.requires_auth,
            auth_guard: input.auth_guard.map(str::to_string),
            happy_payload: happy,
            failure_payloads,
            unverified,
            unchecked_fields,
        }
    }
}

/// Copy referenced values into `same:` fields; chains settle within
/// `mirrors.len()` passes.
fn resolve_mirrors(
    happy: &mut Payload,
    mirrors: &[(&str, String)],
    unverified: &mut BTreeMap<String, UnverifiedReason>,
) {
    for _ in 0..mirrors.len() {
        for (field, other) in mirrors {
            if let Some(value) = happy.get(other).cloned() {
                happy.insert(field.to_string(), value);
            }
        }
    }
    for (field, other) in mirrors {
        if !happy.contains_key(other) {
            unverified.insert(
                field.to_string(),
                UnverifiedReason::Unsatisfiable {
                    detail: format!("same:{other} names an undeclared field"),
                },
            );
        }
    }
}

/// Fields that must track `field`'s value: everything `same:` it,
/// directly or through a chain.
fn followers<'a>(field: &str, mirrors: &[(&'a str, String)]) -> Vec<&'a str> {
    let mut found: Vec<&'a str> = Vec::new();
    let mut frontier = vec![field.to_string()];
    while let Some(target) = frontier.pop() {
        for (follower, other) in mirrors {
            if *other == target && *follower != field && !found.contains(follower) {
                found.push(*follower);
                frontier.push(follower.to_string());
            }
        }
    }
    found
}

/// Set every target, and the companion of each confirmed one, to `value`.
fn assign(
    payload: &mut Payload,
    targets: &[&str],
    value: serde_json::Value,
    confirmed: &BTreeSet<&str>,
) {
    for &target in targets {
        if confirmed.contains(target) {
            payload.insert(companion(target), value.clone());
        }
        payload.insert(target.to_string(), value.clone());
    }
}

fn scenario(
    happy: &Payload,
    field: &str,
    violation: Violation,
    confirmed: &BTreeSet<&str>,
    mirrors: &[(&str, String)],
) -> FailureScenario {
    let mut payload = happy.clone();
    match violation.mutation {
        Mutation::Omit => {
            payload.remove(field);
            for follower in followers(field, mirrors) {
                payload.remove(follower);
            }
        }
        Mutation::Replace(value) => {
            let mut targets = vec![field];
            targets.extend(followers(field, mirrors));
            assign(&mut payload, &targets, value, confirmed);
        }
        Mutation::MismatchConfirmation => {
            let current = payload.get(field).map(diverge).unwrap_or_default();
            payload.insert(companion(field), current);
        }
        Mutation::DivergeFrom(other) => {
            let reference = payload.get(&other).or_else(|| payload.get(field));
            let value = reference.map(diverge).unwrap_or_default();
            let mut targets = vec![field];
            targets.extend(followers(field, mirrors).into_iter().filter(|f| *f != other));
            assign(&mut payload, &targets, value, confirmed);
        }
    }
    FailureScenario {
        violated_field: field.to_string(),
        violated_rule: violation.rule,
        payload,
        expected_status: StatusHint::ValidationError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routegen_core::RuleList;
    use serde_json::json;

    fn mapping(pairs: &[(&str, &str)]) -> RuleMapping {
        pairs
            .iter()
            .map(|(f, r)| (f.to_string(), RuleList::from_piped(r)))
            .collect()
    }

    fn build(rules: &RuleMapping) -> TestCase {
        TestCaseBuilder::default().build(CaseInput {
            uri: "/api/users",
            method: HttpMethod::Post,
            controller_name: "User",
            action_name: "Store",
            rules,
            requires_auth: false,
            auth_guard: None,
        })
    }

    /// Fields whose value differs between the happy payload and `payload`.
    fn changed_fields(happy: &Payload, payload: &Payload) -> Vec<String> {
        happy
            .keys()
            .chain(payload.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|k| happy.get(*k) != payload.get(*k))
            .cloned()
            .collect()
    }

    #[test]
    fn email_and_age_scenarios() {
        let rules = mapping(&[
            ("email", "required|email"),
            ("age", "integer|min:18|max:65"),
        ]);
        let case = build(&rules);

        assert_eq!(case.happy_payload["email"], json!("user@example.com"));
        let age = case.happy_payload["age"].as_i64().unwrap();
        assert!((18..=65).contains(&age));

        let below = case
            .failure_payloads
            .iter()
            .find(|s| s.violated_field == "age")
            .unwrap();
        assert!(below.payload["age"].as_i64().unwrap() < 18);
        assert_eq!(below.payload["email"], case.happy_payload["email"]);
        assert_eq!(below.violated_rule, "min:18");

        let omitted = case
            .failure_payloads
            .iter()
            .find(|s| s.violated_field == "email" && s.omits_field())
            .unwrap();
        assert_eq!(omitted.payload["age"], case.happy_payload["age"]);
        assert_eq!(omitted.violated_rule, "required");
    }

    #[test]
    fn required_fields_each_get_an_omission() {
        let rules = mapping(&[("name", "required"), ("title", "required")]);
        let case = build(&rules);
        assert_eq!(case.failure_payloads.len(), 2);
        for scenario in &case.failure_payloads {
            assert!(scenario.omits_field());
            assert_eq!(scenario.payload.len(), 1);
            assert_eq!(scenario.expected_status, StatusHint::ValidationError);
        }
    }

    #[test]
    fn every_failure_changes_exactly_one_field() {
        let rules = mapping(&[
            ("email", "required|email|max:64"),
            ("age", "required|integer|between:18,65"),
            ("role", "in:admin,editor"),
            ("code", "regex:/^[A-Z]{3}$/"),
            ("tags", "array|min:1"),
            ("email_again", "same:email"),
        ]);
        let case = build(&rules);
        assert!(!case.failure_payloads.is_empty());
        for scenario in &case.failure_payloads {
            let mut expected = vec![scenario.violated_field.clone()];
            if scenario.violated_field == "email" {
                expected.push("email_again".to_string());
            }
            expected.sort();
            assert_eq!(
                changed_fields(&case.happy_payload, &scenario.payload),
                expected
            );
            if scenario.violated_field != "email_again" {
                assert_eq!(scenario.payload.get("email_again"), scenario.payload.get("email"));
            }
        }
    }

    #[test]
    fn same_followers_track_their_target_in_failures() {
        let rules = mapping(&[
            ("email", "required|email|max:64"),
            ("email_again", "required|same:email"),
            ("email_third", "same:email_again"),
        ]);
        let case = build(&rules);
        assert_eq!(case.happy_payload["email_third"], case.happy_payload["email"]);

        let omitted = case
            .failure_payloads
            .iter()
            .find(|s| s.violated_field == "email" && s.omits_field())
            .unwrap();
        assert!(!omitted.payload.contains_key("email"));
        assert!(!omitted.payload.contains_key("email_again"));
        assert!(!omitted.payload.contains_key("email_third"));

        let too_long = case
            .failure_payloads
            .iter()
            .find(|s| s.violated_rule == "max:64")
            .unwrap();
        assert!(too_long.payload["email"].as_str().unwrap().len() > 64);
        assert_eq!(too_long.payload["email_again"], too_long.payload["email"]);
        assert_eq!(too_long.payload["email_third"], too_long.payload["email"]);

        // Diverging the middle of the chain drags its own follower along.
        let diverged = case
            .failure_payloads
            .iter()
            .find(|s| s.violated_rule == "same:email")
            .unwrap();
        assert_eq!(diverged.payload["email"], case.happy_payload["email"]);
        assert_ne!(diverged.payload["email_again"], diverged.payload["email"]);
        assert_eq!(diverged.payload["email_third"], diverged.payload["email_again"]);
    }

    #[test]
    fn mutual_same_fields_still_diverge() {
        let rules = mapping(&[("a", "string|same:b"), ("b", "string|same:a")]);
        let case = build(&rules);
        let diverging = case
            .failure_payloads
            .iter()
            .filter(|s| s.violated_rule.starts_with("same:"));
        for scenario in diverging {
            assert_ne!(scenario.payload["a"], scenario.payload["b"]);
        }
    }

    #[test]
    fn uniqueness_only_fields_are_excluded() {
        let rules = mapping(&[("slug", "unique:posts,slug"), ("title", "required")]);
        let case = build(&rules);
        assert_eq!(case.unchecked_fields, ["slug"]);
        assert!(case.happy_payload.contains_key("slug"));
        assert!(case
            .failure_payloads
            .iter()
            .all(|s| s.violated_field != "slug"));
        assert!(matches!(
            case.unverified.get("slug"),
            Some(UnverifiedReason::ExternalStore { .. })
        ));
    }

    #[test]
    fn empty_mapping_yields_happy_path_only() {
        let case = build(&RuleMapping::new());
        assert!(case.happy_payload.is_empty());
        assert!(case.failure_payloads.is_empty());
        assert_eq!(case.scenario_count(), 1);
    }

    #[test]
    fn confirmed_fields_carry_a_companion() {
        let rules = mapping(&[("password", "required|string|min:8|confirmed")]);
        let case = build(&rules);
        assert_eq!(
            case.happy_payload["password"],
            case.happy_payload["password_confirmation"]
        );

        let short = case
            .failure_payloads
            .iter()
            .find(|s| s.violated_rule == "min:8")
            .unwrap();
        assert_eq!(short.payload["password"], short.payload["password_confirmation"]);
        assert!(short.payload["password"].as_str().unwrap().len() < 8);
    }

    #[test]
    fn confirmation_mismatch_changes_only_the_companion() {
        let rules = mapping(&[("pin", "string|confirmed")]);
        let case = build(&rules);
        let mismatch = case
            .failure_payloads
            .iter()
            .find(|s| s.violated_rule == "confirmed")
            .unwrap();
        assert_eq!(mismatch.payload["pin"], case.happy_payload["pin"]);
        assert_ne!(mismatch.payload["pin_confirmation"], mismatch.payload["pin"]);
        assert!(!mismatch.omits_field());
    }

    #[test]
    fn same_fields_mirror_and_diverge() {
        let rules = mapping(&[
            ("email", "required|email"),
            ("email_again", "required|same:email"),
        ]);
        let case = build(&rules);
        assert_eq!(case.happy_payload["email_again"], case.happy_payload["email"]);

        let diverged = case
            .failure_payloads
            .iter()
            .find(|s| s.violated_rule == "same:email")
            .unwrap();
        assert_ne!(diverged.payload["email_again"], diverged.payload["email"]);
    }

    #[test]
    fn same_on_undeclared_field_is_unsatisfiable() {
        let rules = mapping(&[("copy", "same:ghost")]);
        let case = build(&rules);
        assert!(matches!(
            case.unverified.get("copy"),
            Some(UnverifiedReason::Unsatisfiable { .. })
        ));
    }

    #[test]
    fn carries_route_identity() {
        let rules = RuleMapping::new();
        let case = TestCaseBuilder::default().build(CaseInput {
            uri: "/api/posts/{post}",
            method: HttpMethod::Delete,
            controller_name: "Post",
            action_name: "Destroy",
            rules: &rules,
            requires_auth: true,
            auth_guard: Some("api"),
        });
        assert_eq!(case.uri, "/api/posts/{post}");
        assert_eq!(case.method, HttpMethod::Delete);
        assert!(case.requires_auth);
        assert_eq!(case.auth_guard.as_deref(), Some("api"));
    }
}
