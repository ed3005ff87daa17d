//! # Rule Value Synthesizer
//!
//! Pure, deterministic mapping from one field's rule tokens to a value that
//! satisfies every token at once, and to the mutations that break exactly
//! one of them.
//!
//! ## Valid values
//!
//! The value kind picks a base generator (`"sample"`, `42`, `42.5`, `true`,
//! `["sample"]`, `2024-01-15`, `user@example.com`, `https://example.com`).
//! Bounds then re-target the base into range: magnitude for numeric kinds,
//! item count for arrays, character length otherwise. `in:` picks the first
//! member, `regex:` builds a minimal match, and `not_in:` moves the value
//! to the nearest candidate that still fits. Values that cannot be checked
//! locally are returned anyway, flagged with an [`UnverifiedReason`].
//! Lengths never exceed [`MAX_SYNTHESIZED_LENGTH`].
//!
//! ## Violations
//!
//! A field yields the omission scenario when `required`, plus at most one
//! value violation, chosen by rank:
//!
//! ```text
//! bounds > membership > pattern > date range > confirmed > same > type
//! ```
//!
//! Uniqueness and existence checks never produce a violation: breaking them
//! would need the external store.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde_json::Value;

use routegen_core::{RouteGenError, UnverifiedReason, ValueKind};

use crate::pattern;
use crate::profile::{DateBound, FieldProfile, Measure};

/// Base string value.
pub const BASE_STRING: &str = "sample";
/// Base integer value.
pub const BASE_INTEGER: i64 = 42;
/// Base non-integer number value.
pub const BASE_NUMBER: f64 = 42.5;
/// Base email address.
pub const BASE_EMAIL: &str = "user@example.com";
/// Base URL.
pub const BASE_URL: &str = "https://example.com";

const EMAIL_DOMAIN: &str = "@example.com";
const SHORT_EMAIL_DOMAIN: &str = "@b.co";
const SHORT_URL: &str = "http://a.co";
const ISO_DATE: &str = "%Y-%m-%d";

/// Longest string or array the synthesizer builds. Longer targets are
/// clamped (valid values) or skipped (length violations).
pub const MAX_SYNTHESIZED_LENGTH: usize = 4096;

/// Strings tried when a valid value must avoid a `not_regex` pattern.
const ANTI_PATTERN_FALLBACKS: [&str; 4] = ["Sample", "value1", "x", "0"];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default()
}

/// A synthesized valid value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub value: Value,
    /// Set when the value could not be checked against every token.
    pub unverified: Option<UnverifiedReason>,
    /// The field is `confirmed`: its companion must carry the same value.
    pub confirmed: bool,
    /// The field is `same:<other>`: the builder copies `<other>`'s value.
    pub mirror_of: Option<String>,
}

/// How a failure scenario changes the happy payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Remove the field.
    Omit,
    /// Replace the field's value.
    Replace(Value),
    /// Keep the field, make its `_confirmation` companion differ.
    MismatchConfirmation,
    /// Make the field differ from the named field.
    DivergeFrom(String),
}

/// One rule violation for a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Raw token being violated.
    pub rule: String,
    pub mutation: Mutation,
}

impl Violation {
    fn replace(rule: impl Into<String>, value: Value) -> Self {
        Self {
            rule: rule.into(),
            mutation: Mutation::Replace(value),
        }
    }
}

/// Maps rule tokens to valid and invalid sample values.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleValueSynthesizer;

impl RuleValueSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// A value satisfying every token simultaneously.
    pub fn synthesize_valid<S: AsRef<str>>(&self, tokens: &[S]) -> Sample {
        self.valid_for(&FieldProfile::from_tokens(tokens))
    }

    /// The primary violation of a field: its highest-ranked value violation,
    /// else omission when required.
    ///
    /// Fails with `UnsupportedRule` when neither applies; such a field is
    /// left out of failure generation.
    pub fn synthesize_invalid<S: AsRef<str>>(
        &self,
        field: &str,
        tokens: &[S],
    ) -> Result<Violation, RouteGenError> {
        let profile = FieldProfile::from_tokens(tokens);
        self.value_violation(&profile)
            .or_else(|| profile.required.then(omission))
            .ok_or_else(|| unsupported(field, tokens))
    }

    /// Every failure scenario of a field: omission when required, then the
    /// highest-ranked value violation.
    pub fn violations<S: AsRef<str>>(
        &self,
        field: &str,
        tokens: &[S],
    ) -> Result<Vec<Violation>, RouteGenError> {
        let profile = FieldProfile::from_tokens(tokens);
        let mut out = Vec::with_capacity(2);
        if profile.required {
            out.push(omission());
        }
        if let Some(violation) = self.value_violation(&profile) {
            out.push(violation);
        }
        if out.is_empty() {
            return Err(unsupported(field, tokens));
        }
        Ok(out)
    }

    // ─── Valid values ────────────────────────────────────────────────

    fn valid_for(&self, p: &FieldProfile) -> Sample {
        let mut reasons: Vec<UnverifiedReason> = Vec::new();

        if p.bounds_contradict() {
            reasons.push(UnverifiedReason::Unsatisfiable {
                detail: "lower bound exceeds upper bound".to_string(),
            });
        }

        let mut value = match &p.members {
            Some((members, _)) => {
                let excluded = excluded(p);
                match members.iter().find(|m| !excluded.contains(m)) {
                    Some(member) => coerce(member, p.kind),
                    None => {
                        reasons.push(UnverifiedReason::Unsatisfiable {
                            detail: "every in: member is also excluded".to_string(),
                        });
                        members
                            .first()
                            .map(|m| coerce(m, p.kind))
                            .unwrap_or_else(|| Value::from(BASE_STRING))
                    }
                }
            }
            None => self.base_value(p, &mut reasons),
        };

        if let Value::String(s) = &mut value {
            if p.members.is_none() && excluded(p).contains(s) {
                match string_avoiding(p, s) {
                    Some(other) => *s = other,
                    None => reasons.push(UnverifiedReason::Unsatisfiable {
                        detail: "no string within the bounds avoids every not_in: member"
                            .to_string(),
                    }),
                }
            }
            if let Some((anti, _)) = &p.anti_pattern {
                if pattern::is_match(anti, s) == Some(true) {
                    match ANTI_PATTERN_FALLBACKS
                        .iter()
                        .find(|c| pattern::is_match(anti, c) == Some(false))
                    {
                        Some(fallback) => *s = fallback.to_string(),
                        None => reasons.push(UnverifiedReason::PatternInfeasible {
                            pattern: anti.clone(),
                        }),
                    }
                }
            }
        }

        for bound in [&p.after, &p.before].into_iter().flatten() {
            if let DateBound::Relative { reference, .. } = bound {
                reasons.push(UnverifiedReason::RelativeDate {
                    reference: reference.clone(),
                });
            }
        }
        if let Some(external) = &p.external {
            reasons.push(UnverifiedReason::ExternalStore {
                table: external.table.clone(),
            });
        }
        if !p.unrecognized.is_empty() {
            reasons.push(UnverifiedReason::UnrecognizedRule {
                tokens: p.unrecognized.clone(),
            });
        }

        Sample {
            value,
            unverified: reasons.into_iter().next(),
            confirmed: p.confirmed,
            mirror_of: p.same.clone(),
        }
    }

    fn base_value(&self, p: &FieldProfile, reasons: &mut Vec<UnverifiedReason>) -> Value {
        match p.kind {
            Some(ValueKind::Integer) => {
                let (lo, hi) = integer_range(p);
                if let (Some(lo), Some(hi)) = (lo, hi) {
                    if lo > hi && !p.bounds_contradict() {
                        reasons.push(UnverifiedReason::Unsatisfiable {
                            detail: "no integer between the bounds".to_string(),
                        });
                    }
                }
                match integer_in_range(p) {
                    Some(v) => Value::from(v),
                    None => {
                        reasons.push(not_in_exhausted());
                        Value::from(clamped_integer(p))
                    }
                }
            }
            Some(ValueKind::Number) => match number_in_range(p) {
                Some(v) => number_value(v),
                None => {
                    reasons.push(not_in_exhausted());
                    number_value(clamped_number(p))
                }
            },
            Some(ValueKind::Boolean) => Value::Bool(true),
            Some(ValueKind::Array) => {
                Value::Array(vec![Value::from(BASE_STRING); valid_length(p, 1, reasons)])
            }
            Some(ValueKind::Date) => Value::String(valid_date(p, reasons)),
            Some(ValueKind::Email) => {
                let n = valid_length(p, BASE_EMAIL.len(), reasons);
                if n <= SHORT_EMAIL_DOMAIN.len() {
                    reasons.push(UnverifiedReason::Unsatisfiable {
                        detail: format!("no email address fits in {n} characters"),
                    });
                }
                Value::String(email_of_length(n))
            }
            Some(ValueKind::Url) => {
                let n = valid_length(p, BASE_URL.len(), reasons);
                if n < SHORT_URL.len() {
                    reasons.push(UnverifiedReason::Unsatisfiable {
                        detail: format!("no URL fits in {n} characters"),
                    });
                }
                Value::String(url_of_length(n))
            }
            Some(ValueKind::String) | None => Value::String(valid_string(p, reasons)),
        }
    }

    // ─── Violations ──────────────────────────────────────────────────

    fn value_violation(&self, p: &FieldProfile) -> Option<Violation> {
        bound_violation(p)
            .or_else(|| membership_violation(p))
            .or_else(|| pattern_violation(p))
            .or_else(|| date_violation(p))
            .or_else(|| {
                p.confirmed.then(|| Violation {
                    rule: "confirmed".to_string(),
                    mutation: Mutation::MismatchConfirmation,
                })
            })
            .or_else(|| {
                p.same.as_ref().map(|other| Violation {
                    rule: format!("same:{other}"),
                    mutation: Mutation::DivergeFrom(other.clone()),
                })
            })
            .or_else(|| type_violation(p))
    }
}

fn omission() -> Violation {
    Violation {
        rule: "required".to_string(),
        mutation: Mutation::Omit,
    }
}

fn unsupported<S: AsRef<str>>(field: &str, tokens: &[S]) -> RouteGenError {
    RouteGenError::UnsupportedRule {
        field: field.to_string(),
        tokens: tokens.iter().map(|t| t.as_ref().to_string()).collect(),
    }
}

/// A value guaranteed to differ from `value`, of the same shape where possible.
pub fn diverge(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(format!("{s}-mismatch")),
        Value::Bool(b) => Value::Bool(!b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Value::from(i.wrapping_add(1)),
            None => Value::from(n.as_f64().unwrap_or(0.0) + 1.0),
        },
        _ => Value::from("mismatch"),
    }
}

fn excluded(p: &FieldProfile) -> &[String] {
    p.excluded.as_ref().map(|(e, _)| e.as_slice()).unwrap_or(&[])
}

/// Interpret a declared member string under the field's kind.
fn coerce(member: &str, kind: Option<ValueKind>) -> Value {
    match kind {
        Some(ValueKind::Integer) => member
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(member)),
        Some(ValueKind::Number) => member
            .parse::<f64>()
            .map(number_value)
            .unwrap_or_else(|_| Value::from(member)),
        Some(ValueKind::Boolean) => match member {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            other => Value::from(other),
        },
        _ => Value::from(member),
    }
}

/// Integral floats become JSON integers.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

fn integer_range(p: &FieldProfile) -> (Option<i64>, Option<i64>) {
    (
        p.lower().map(|v| v.ceil() as i64),
        p.upper().map(|v| v.floor() as i64),
    )
}

fn not_in_exhausted() -> UnverifiedReason {
    UnverifiedReason::Unsatisfiable {
        detail: "every value within the bounds is excluded by not_in:".to_string(),
    }
}

/// Whether a numeric value equals one of the `not_in:` members.
fn is_excluded_number(p: &FieldProfile, v: f64) -> bool {
    excluded(p)
        .iter()
        .any(|m| m.trim().parse::<f64>().map_or(false, |e| e == v))
}

/// The base integer clamped into the bounds.
fn clamped_integer(p: &FieldProfile) -> i64 {
    let (lo, hi) = integer_range(p);
    let mut v = BASE_INTEGER;
    if let Some(lo) = lo {
        v = v.max(lo);
    }
    if let Some(hi) = hi {
        v = v.min(hi);
    }
    v
}

/// The integer nearest the clamped base that the bounds allow and `not_in:`
/// does not exclude. Searches upward, then downward.
fn integer_in_range(p: &FieldProfile) -> Option<i64> {
    let (lo, hi) = integer_range(p);
    let start = clamped_integer(p);
    let tries = excluded(p).len() + 1;
    let allowed = |v: &i64| {
        lo.map_or(true, |lo| *v >= lo)
            && hi.map_or(true, |hi| *v <= hi)
            && !is_excluded_number(p, *v as f64)
    };
    let up = (0..tries as i64).map_while(|k| start.checked_add(k));
    let down = (1..tries as i64).map_while(|k| start.checked_sub(k));
    up.chain(down).find(allowed)
}

/// The base number clamped into the bounds.
fn clamped_number(p: &FieldProfile) -> f64 {
    let mut v = BASE_NUMBER;
    if let Some(lo) = p.lower() {
        v = v.max(lo);
    }
    if let Some(hi) = p.upper() {
        v = v.min(hi);
    }
    v
}

/// Like [`integer_in_range`] for non-integer numbers, stepping by halves.
fn number_in_range(p: &FieldProfile) -> Option<f64> {
    let start = clamped_number(p);
    let tries = excluded(p).len() + 1;
    let allowed = |v: &f64| {
        p.lower().map_or(true, |lo| *v >= lo)
            && p.upper().map_or(true, |hi| *v <= hi)
            && !is_excluded_number(p, *v)
    };
    let up = (0..tries).map(|k| start + k as f64 * 0.5);
    let down = (1..tries).map(|k| start - k as f64 * 0.5);
    up.chain(down).find(allowed)
}

/// A string near `s` that is not excluded and still fits the length bounds
/// and the `regex:` pattern. Appends a counter when there is room, else
/// overwrites the tail with it.
fn string_avoiding(p: &FieldProfile, s: &str) -> Option<String> {
    let excluded = excluded(p);
    let chars: Vec<char> = s.chars().collect();
    if p.kind == Some(ValueKind::Date) {
        return None;
    }
    let fits = |candidate: &str| {
        let len = candidate.chars().count() as f64;
        p.lower().map_or(true, |lo| len >= lo)
            && p.upper().map_or(true, |hi| len <= hi)
            && p
                .pattern
                .as_ref()
                .map_or(true, |(pat, _)| pattern::is_match(pat, candidate) != Some(false))
            && !excluded.iter().any(|e| e == candidate)
    };
    (1..=excluded.len() + 1).find_map(|n| {
        let suffix = n.to_string();
        let appended = format!("{s}{suffix}");
        if fits(&appended) {
            return Some(appended);
        }
        let keep = chars.len().checked_sub(suffix.len())?;
        let overwritten: String = chars[..keep].iter().collect::<String>() + &suffix;
        fits(&overwritten).then_some(overwritten)
    })
}

/// [`target_length`], clamped to [`MAX_SYNTHESIZED_LENGTH`] and flagged
/// when the bounds demand more.
fn valid_length(p: &FieldProfile, base: usize, reasons: &mut Vec<UnverifiedReason>) -> usize {
    let n = target_length(p, base);
    if n > MAX_SYNTHESIZED_LENGTH {
        reasons.push(UnverifiedReason::Unsatisfiable {
            detail: format!(
                "length {n} exceeds the synthesis limit of {MAX_SYNTHESIZED_LENGTH}"
            ),
        });
        return MAX_SYNTHESIZED_LENGTH;
    }
    n
}

/// Length (or count) nearest to `base` that the bounds allow.
fn target_length(p: &FieldProfile, base: usize) -> usize {
    let mut n = base;
    if let Some(lo) = p.lower() {
        n = n.max(lo.max(0.0).ceil() as usize);
    }
    if let Some(hi) = p.upper() {
        n = n.min(hi.max(0.0).floor() as usize);
    }
    n
}

fn string_of_length(n: usize) -> String {
    BASE_STRING.chars().cycle().take(n).collect()
}

/// An email address of exactly `n` characters (plain filler below six).
fn email_of_length(n: usize) -> String {
    if n > EMAIL_DOMAIN.len() {
        let local: String = "user".chars().cycle().take(n - EMAIL_DOMAIN.len()).collect();
        format!("{local}{EMAIL_DOMAIN}")
    } else if n > SHORT_EMAIL_DOMAIN.len() {
        format!("{}{SHORT_EMAIL_DOMAIN}", "u".repeat(n - SHORT_EMAIL_DOMAIN.len()))
    } else {
        "u".repeat(n)
    }
}

/// A URL of exactly `n` characters (plain filler below the shortest URL).
fn url_of_length(n: usize) -> String {
    let (base, n) = if n >= BASE_URL.len() {
        (BASE_URL, n)
    } else if n >= SHORT_URL.len() {
        (SHORT_URL, n)
    } else {
        return "h".repeat(n);
    };
    match n - base.len() {
        0 => base.to_string(),
        extra => format!("{base}/{}", "p".repeat(extra - 1)),
    }
}

fn valid_string(p: &FieldProfile, reasons: &mut Vec<UnverifiedReason>) -> String {
    if let Some((pat, _)) = &p.pattern {
        match pattern::sample(pat) {
            Some(s) => {
                let len = s.chars().count() as f64;
                let fits = p.lower().map_or(true, |lo| len >= lo)
                    && p.upper().map_or(true, |hi| len <= hi);
                if !fits {
                    reasons.push(UnverifiedReason::PatternInfeasible {
                        pattern: pat.clone(),
                    });
                }
                return s;
            }
            None => reasons.push(UnverifiedReason::PatternInfeasible {
                pattern: pat.clone(),
            }),
        }
    }
    string_of_length(valid_length(p, BASE_STRING.len(), reasons))
}

fn valid_date(p: &FieldProfile, reasons: &mut Vec<UnverifiedReason>) -> String {
    let mut date = base_date();
    let after = match &p.after {
        Some(DateBound::Literal { date, .. }) => Some(*date),
        _ => None,
    };
    let before = match &p.before {
        Some(DateBound::Literal { date, .. }) => Some(*date),
        _ => None,
    };
    if let Some(after) = after {
        if date <= after {
            date = after.succ_opt().unwrap_or(after);
        }
    }
    if let Some(before) = before {
        if date >= before {
            date = before.pred_opt().unwrap_or(before);
        }
    }
    if let (Some(after), Some(before)) = (after, before) {
        if after.succ_opt().map_or(true, |next| next >= before) {
            reasons.push(UnverifiedReason::Unsatisfiable {
                detail: format!("no date after {after} and before {before}"),
            });
        }
    }
    format_date(date, p.date_format.as_deref(), reasons)
}

/// Render a date with a PHP-style `date_format`, falling back to ISO.
fn format_date(
    date: NaiveDate,
    php_format: Option<&str>,
    reasons: &mut Vec<UnverifiedReason>,
) -> String {
    let iso = date.format(ISO_DATE).to_string();
    let Some(php_format) = php_format else {
        return iso;
    };
    let (Some(strftime), Some(datetime)) = (php_to_strftime(php_format), date.and_hms_opt(9, 30, 0))
    else {
        reasons.push(UnverifiedReason::UnrecognizedRule {
            tokens: vec![format!("date_format:{php_format}")],
        });
        return iso;
    };
    let mut out = String::new();
    match write!(out, "{}", datetime.format(&strftime)) {
        Ok(()) => out,
        Err(_) => iso,
    }
}

/// Translate PHP `date()` format characters into chrono strftime.
fn php_to_strftime(php: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = php.chars();
    while let Some(c) = chars.next() {
        let directive = match c {
            'Y' => "%Y",
            'y' => "%y",
            'm' => "%m",
            'n' => "%-m",
            'd' => "%d",
            'j' => "%-d",
            'H' => "%H",
            'G' => "%-H",
            'h' => "%I",
            'g' => "%-I",
            'i' => "%M",
            's' => "%S",
            'A' => "%p",
            'a' => "%P",
            'D' => "%a",
            'l' => "%A",
            'M' => "%b",
            'F' => "%B",
            'U' => "%s",
            '%' => "%%",
            '\\' => {
                match chars.next()? {
                    '%' => out.push_str("%%"),
                    escaped => out.push(escaped),
                }
                continue;
            }
            other if other.is_ascii_alphabetic() => return None,
            other => {
                out.push(other);
                continue;
            }
        };
        out.push_str(directive);
    }
    Some(out)
}

// ─── Violation strategies ────────────────────────────────────────────

/// Length violations longer than [`MAX_SYNTHESIZED_LENGTH`] are skipped so
/// the next-ranked violation applies.
fn bound_violation(p: &FieldProfile) -> Option<Violation> {
    if let Some(size) = &p.size {
        if let Some(value) = above(p, size.value) {
            return Some(Violation::replace(&size.rule, value));
        }
    }
    if let Some(min) = &p.min {
        if let Some(value) = below(p, min.value) {
            return Some(Violation::replace(&min.rule, value));
        }
    }
    let max = p.max.as_ref()?;
    above(p, max.value).map(|value| Violation::replace(&max.rule, value))
}

/// A value measuring strictly less than `min`, if one exists.
fn below(p: &FieldProfile, min: f64) -> Option<Value> {
    match p.measure() {
        Measure::Magnitude if p.kind == Some(ValueKind::Integer) => {
            Some(Value::from((min.ceil() as i64).saturating_sub(1)))
        }
        Measure::Magnitude => Some(number_value(min - 1.0)),
        Measure::Length | Measure::Count if min > 0.0 => {
            value_of_length(p, min.ceil() as usize - 1)
        }
        _ => None,
    }
}

/// A value measuring strictly more than `max`, if one fits the length limit.
fn above(p: &FieldProfile, max: f64) -> Option<Value> {
    match p.measure() {
        Measure::Magnitude if p.kind == Some(ValueKind::Integer) => {
            Some(Value::from((max.floor() as i64).saturating_add(1)))
        }
        Measure::Magnitude => Some(number_value(max + 1.0)),
        Measure::Length | Measure::Count => {
            value_of_length(p, (max.max(-1.0).floor() + 1.0) as usize)
        }
    }
}

fn value_of_length(p: &FieldProfile, n: usize) -> Option<Value> {
    if n > MAX_SYNTHESIZED_LENGTH {
        return None;
    }
    Some(match p.kind {
        Some(ValueKind::Array) => Value::Array(vec![Value::from(BASE_STRING); n]),
        Some(ValueKind::Email) => Value::String(email_of_length(n)),
        Some(ValueKind::Url) => Value::String(url_of_length(n)),
        _ => Value::String(string_of_length(n)),
    })
}

fn membership_violation(p: &FieldProfile) -> Option<Violation> {
    if let Some((members, rule)) = &p.members {
        return Some(Violation::replace(rule, absent_value(members, p.kind)));
    }
    let (excluded, rule) = p.excluded.as_ref()?;
    let first = excluded.first()?;
    Some(Violation::replace(rule, coerce(first, p.kind)))
}

/// A value guaranteed not to be one of `members`.
fn absent_value(members: &[String], kind: Option<ValueKind>) -> Value {
    if kind.map_or(false, |k| k.is_numeric()) {
        let mut candidate = members
            .iter()
            .filter_map(|m| m.parse::<f64>().ok())
            .fold(0.0_f64, f64::max)
            .floor() as i64
            + 1;
        while members.contains(&candidate.to_string()) {
            candidate += 1;
        }
        return Value::from(candidate);
    }
    let mut candidate = "invalid".to_string();
    let mut n = 1;
    while members.contains(&candidate) {
        candidate = format!("invalid{n}");
        n += 1;
    }
    Value::String(candidate)
}

fn pattern_violation(p: &FieldProfile) -> Option<Violation> {
    if let Some((pat, rule)) = &p.pattern {
        if let Some(s) = pattern::non_matching(pat) {
            return Some(Violation::replace(rule, Value::String(s)));
        }
    }
    let (anti, rule) = p.anti_pattern.as_ref()?;
    pattern::sample(anti).map(|s| Violation::replace(rule, Value::String(s)))
}

fn date_violation(p: &FieldProfile) -> Option<Violation> {
    [&p.after, &p.before]
        .into_iter()
        .flatten()
        .find_map(|bound| match bound {
            DateBound::Literal { date, rule } => {
                let mut ignored = Vec::new();
                let value = format_date(*date, p.date_format.as_deref(), &mut ignored);
                Some(Violation::replace(rule, Value::String(value)))
            }
            DateBound::Relative { .. } => None,
        })
}

fn type_violation(p: &FieldProfile) -> Option<Violation> {
    let kind = p.kind?;
    let rule = p
        .kind_rule
        .clone()
        .or_else(|| p.date_format.as_ref().map(|f| format!("date_format:{f}")))
        .unwrap_or_else(|| kind.as_str().to_string());
    let value = match kind {
        ValueKind::String => Value::from(12345),
        ValueKind::Integer => Value::from("not-an-integer"),
        ValueKind::Number => Value::from("not-a-number"),
        ValueKind::Boolean => Value::from("not-a-boolean"),
        ValueKind::Array => Value::from("not-an-array"),
        ValueKind::Date => Value::from("not-a-date"),
        ValueKind::Email => Value::from("not-an-email"),
        ValueKind::Url => Value::from("not-a-url"),
    };
    Some(Violation::replace(rule, value))
}
