//! # Field Profiles
//!
//! Folds one field's rule tokens into a single [`FieldProfile`]: the value
//! kind, presence, bounds, membership, pattern, cross-field and date
//! constraints the synthesizer has to satisfy (or break) at once. Every
//! constraint remembers the raw token it came from so failure scenarios can
//! name the rule they violate.

use chrono::NaiveDate;

use routegen_core::{RuleToken, ValueKind};

/// What `min`/`max`/`size` measure for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Numeric value (integer and number kinds).
    Magnitude,
    /// Character length (strings and everything string-shaped).
    Length,
    /// Item count (arrays).
    Count,
}

/// A numeric bound and the token that declared it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub rule: String,
}

/// A date bound: a literal date, or a reference that cannot be resolved locally.
#[derive(Debug, Clone, PartialEq)]
pub enum DateBound {
    Literal { date: NaiveDate, rule: String },
    Relative { reference: String, rule: String },
}

/// A constraint that depends on an external store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCheck {
    pub table: String,
    pub rule: String,
}

/// All constraints declared for one field.
#[derive(Debug, Clone, Default)]
pub struct FieldProfile {
    pub kind: Option<ValueKind>,
    /// Raw token that declared `kind`.
    pub kind_rule: Option<String>,
    pub required: bool,
    pub nullable: bool,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
    pub size: Option<Bound>,
    pub members: Option<(Vec<String>, String)>,
    pub excluded: Option<(Vec<String>, String)>,
    pub pattern: Option<(String, String)>,
    pub anti_pattern: Option<(String, String)>,
    pub confirmed: bool,
    pub same: Option<String>,
    pub after: Option<DateBound>,
    pub before: Option<DateBound>,
    pub date_format: Option<String>,
    pub external: Option<ExternalCheck>,
    pub unrecognized: Vec<String>,
    /// Whether any token is checkable without external state.
    pub checkable: bool,
}

/// Kinds ordered from most to least specific; the first declared match wins.
const KIND_PRECEDENCE: [ValueKind; 8] = [
    ValueKind::Email,
    ValueKind::Url,
    ValueKind::Date,
    ValueKind::Integer,
    ValueKind::Number,
    ValueKind::Boolean,
    ValueKind::Array,
    ValueKind::String,
];

fn rank(kind: ValueKind) -> usize {
    KIND_PRECEDENCE
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(KIND_PRECEDENCE.len())
}

impl FieldProfile {
    /// Build a profile from raw tokens.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut profile = FieldProfile::default();

        for raw in tokens {
            let raw = raw.as_ref().trim();
            let token = RuleToken::parse(raw);
            profile.checkable |= token.is_checkable();
            let rule = raw.to_string();

            match token {
                RuleToken::Required => profile.required = true,
                RuleToken::Nullable => profile.nullable = true,
                RuleToken::Sometimes => {}
                RuleToken::Kind(kind) => {
                    if profile.kind.map_or(true, |current| rank(kind) < rank(current)) {
                        profile.kind = Some(kind);
                        profile.kind_rule = Some(rule);
                    }
                }
                RuleToken::Min(value) => profile.min = Some(Bound { value, rule }),
                RuleToken::Max(value) => profile.max = Some(Bound { value, rule }),
                RuleToken::Between(lo, hi) => {
                    profile.min = Some(Bound {
                        value: lo,
                        rule: rule.clone(),
                    });
                    profile.max = Some(Bound { value: hi, rule });
                }
                RuleToken::Size(value) => profile.size = Some(Bound { value, rule }),
                RuleToken::In(members) => {
                    if profile.members.is_none() {
                        profile.members = Some((members, rule));
                    }
                }
                RuleToken::NotIn(members) => match &mut profile.excluded {
                    Some((existing, _)) => existing.extend(members),
                    None => profile.excluded = Some((members, rule)),
                },
                RuleToken::Regex(pattern) => profile.pattern = Some((pattern, rule)),
                RuleToken::NotRegex(pattern) => profile.anti_pattern = Some((pattern, rule)),
                RuleToken::Confirmed => profile.confirmed = true,
                RuleToken::Same(other) => profile.same = Some(other),
                RuleToken::After(reference) => profile.after = Some(date_bound(reference, rule)),
                RuleToken::Before(reference) => {
                    profile.before = Some(date_bound(reference, rule))
                }
                RuleToken::DateFormat(format) => profile.date_format = Some(format),
                RuleToken::Unique { table, .. } | RuleToken::Exists { table, .. } => {
                    if profile.external.is_none() {
                        profile.external = Some(ExternalCheck { table, rule });
                    }
                }
                RuleToken::Unrecognized(raw) => profile.unrecognized.push(raw),
            }
        }

        let implies_date =
            profile.date_format.is_some() || profile.after.is_some() || profile.before.is_some();
        if implies_date && profile.kind.map_or(true, |k| k == ValueKind::String) {
            profile.kind = Some(ValueKind::Date);
        }

        profile
    }

    /// What bounds measure for this field.
    pub fn measure(&self) -> Measure {
        match self.kind {
            Some(kind) if kind.is_numeric() => Measure::Magnitude,
            Some(ValueKind::Array) => Measure::Count,
            _ => Measure::Length,
        }
    }

    /// Lower bound, taking `size` as an exact bound.
    pub fn lower(&self) -> Option<f64> {
        self.size.as_ref().or(self.min.as_ref()).map(|b| b.value)
    }

    /// Upper bound, taking `size` as an exact bound.
    pub fn upper(&self) -> Option<f64> {
        self.size.as_ref().or(self.max.as_ref()).map(|b| b.value)
    }

    /// Whether the declared bounds cannot all hold.
    pub fn bounds_contradict(&self) -> bool {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) if min.value > max.value => true,
            _ => match (&self.size, &self.min, &self.max) {
                (Some(size), Some(min), _) if size.value < min.value => true,
                (Some(size), _, Some(max)) if size.value > max.value => true,
                _ => false,
            },
        }
    }
}

fn date_bound(reference: String, rule: String) -> DateBound {
    match NaiveDate::parse_from_str(reference.trim(), "%Y-%m-%d") {
        Ok(date) => DateBound::Literal { date, rule },
        Err(_) => DateBound::Relative { reference, rule },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_presence_kind_and_bounds() {
        let p = FieldProfile::from_tokens(&["required", "integer", "min:18", "max:65"]);
        assert!(p.required);
        assert_eq!(p.kind, Some(ValueKind::Integer));
        assert_eq!(p.measure(), Measure::Magnitude);
        assert_eq!(p.lower(), Some(18.0));
        assert_eq!(p.upper(), Some(65.0));
        assert_eq!(p.min.as_ref().unwrap().rule, "min:18");
        assert!(p.checkable);
    }

    #[test]
    fn between_sets_both_bounds() {
        let p = FieldProfile::from_tokens(&["between:3,8"]);
        assert_eq!(p.lower(), Some(3.0));
        assert_eq!(p.upper(), Some(8.0));
        assert_eq!(p.max.as_ref().unwrap().rule, "between:3,8");
        assert_eq!(p.measure(), Measure::Length);
    }

    #[test]
    fn specific_kind_beats_string() {
        let p = FieldProfile::from_tokens(&["string", "email"]);
        assert_eq!(p.kind, Some(ValueKind::Email));
        assert_eq!(p.kind_rule.as_deref(), Some("email"));
    }

    #[test]
    fn array_bounds_count_items() {
        let p = FieldProfile::from_tokens(&["array", "min:2"]);
        assert_eq!(p.measure(), Measure::Count);
    }

    #[test]
    fn date_tokens_imply_date_kind() {
        let p = FieldProfile::from_tokens(&["after:2024-01-01"]);
        assert_eq!(p.kind, Some(ValueKind::Date));
        assert!(matches!(p.after, Some(DateBound::Literal { .. })));

        let relative = FieldProfile::from_tokens(&["date", "before:tomorrow"]);
        assert!(matches!(relative.before, Some(DateBound::Relative { .. })));
    }

    #[test]
    fn uniqueness_only_is_not_checkable() {
        let p = FieldProfile::from_tokens(&["unique:users,email"]);
        assert!(!p.checkable);
        assert_eq!(p.external.as_ref().unwrap().table, "users");
    }

    #[test]
    fn unrecognized_tokens_are_kept() {
        let p = FieldProfile::from_tokens(&["image", "dimensions:min_width=100"]);
        assert_eq!(p.unrecognized, ["image", "dimensions:min_width=100"]);
        assert!(!p.checkable);
    }

    #[test]
    fn contradictory_bounds() {
        assert!(FieldProfile::from_tokens(&["min:10", "max:5"]).bounds_contradict());
        assert!(FieldProfile::from_tokens(&["size:3", "min:5"]).bounds_contradict());
        assert!(!FieldProfile::from_tokens(&["min:1", "max:5"]).bounds_contradict());
    }

    #[test]
    fn not_in_lists_accumulate() {
        let p = FieldProfile::from_tokens(&["not_in:a,b", "not_in:c"]);
        let (members, rule) = p.excluded.unwrap();
        assert_eq!(members, ["a", "b", "c"]);
        assert_eq!(rule, "not_in:a,b");
    }
}
