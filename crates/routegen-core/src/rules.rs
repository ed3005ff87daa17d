//! # Declarative Rule Tokens
//!
//! A validation request declares, per field, an ordered list of rule tokens
//! such as `required`, `min:18` or `in:draft,published`. This module holds
//! the raw declaration ([`RuleMapping`], [`RuleList`]) exactly as the host
//! reports it, and parses individual tokens into [`RuleToken`] for the
//! synthesizer.
//!
//! ## Token Grammar
//!
//! `name[:params]`. Params split on `,`, except for `regex` and `not_regex`
//! whose whole remainder is a delimited pattern (`/^[a-z]+$/i`). A token
//! that cannot be parsed (unknown name, non-numeric bound) becomes
//! [`RuleToken::Unrecognized`] and never aborts generation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ─── Raw Declarations ────────────────────────────────────────────────

/// The raw token list declared for one field.
///
/// Deserializes from either the array form (`["required", "email"]`) or
/// the pipe-delimited form (`"required|email"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRuleList", into = "Vec<String>")]
pub struct RuleList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRuleList {
    Piped(String),
    Tokens(Vec<String>),
}

impl From<RawRuleList> for RuleList {
    fn from(raw: RawRuleList) -> Self {
        match raw {
            RawRuleList::Piped(s) => RuleList::from_piped(&s),
            RawRuleList::Tokens(tokens) => RuleList(tokens),
        }
    }
}

impl From<RuleList> for Vec<String> {
    fn from(list: RuleList) -> Self {
        list.0
    }
}

impl RuleList {
    /// Build from already-split tokens.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RuleList(tokens.into_iter().map(Into::into).collect())
    }

    /// Split a `required|email|max:255` declaration.
    pub fn from_piped(declaration: &str) -> Self {
        RuleList(
            declaration
                .split('|')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Raw tokens in declaration order.
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Parse every token.
    pub fn parse(&self) -> Vec<RuleToken> {
        self.0.iter().map(|t| RuleToken::parse(t)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Field name → raw rule tokens, as declared by one validation request.
///
/// Held sorted by field name so that every downstream payload is
/// deterministic for a given snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleMapping(BTreeMap<String, RuleList>);

impl RuleMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or replace) the rules of one field.
    pub fn insert(&mut self, field: impl Into<String>, rules: RuleList) {
        self.0.insert(field.into(), rules);
    }

    pub fn get(&self, field: &str) -> Option<&RuleList> {
        self.0.get(field)
    }

    /// Fields and their rule lists, ordered by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleList)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F: Into<String>> FromIterator<(F, RuleList)> for RuleMapping {
    fn from_iter<T: IntoIterator<Item = (F, RuleList)>>(iter: T) -> Self {
        RuleMapping(iter.into_iter().map(|(f, r)| (f.into(), r)).collect())
    }
}

// ─── Parsed Tokens ───────────────────────────────────────────────────

/// The base type a field's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Date,
    Email,
    Url,
}

impl ValueKind {
    /// Whether `min`/`max`/`size` bound the numeric value rather than a length or count.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Number)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "numeric",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Date => "date",
            Self::Email => "email",
            Self::Url => "url",
        }
    }
}

/// One parsed declarative constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleToken {
    Required,
    Nullable,
    Sometimes,
    Kind(ValueKind),
    Min(f64),
    Max(f64),
    Between(f64, f64),
    Size(f64),
    In(Vec<String>),
    NotIn(Vec<String>),
    /// Pattern in `regex` crate syntax, delimiters and flags already translated.
    Regex(String),
    NotRegex(String),
    /// A `<field>_confirmation` companion must equal this field.
    Confirmed,
    /// The field must equal another field.
    Same(String),
    After(String),
    Before(String),
    DateFormat(String),
    /// Must not already exist in an external store.
    Unique { table: String, column: Option<String> },
    /// Must already exist in an external store.
    Exists { table: String, column: Option<String> },
    /// Kept verbatim; no synthesis strategy.
    Unrecognized(String),
}

impl RuleToken {
    /// Parse one raw token. Never fails; see [`RuleToken::Unrecognized`].
    pub fn parse(raw: &str) -> RuleToken {
        let raw = raw.trim();
        let (name, params) = match raw.split_once(':') {
            Some((n, p)) => (n.trim().to_ascii_lowercase(), Some(p)),
            None => (raw.to_ascii_lowercase(), None),
        };
        let list = || -> Vec<String> {
            params
                .map(|p| p.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default()
        };
        let number = || params.and_then(|p| p.trim().parse::<f64>().ok());
        let unrecognized = || RuleToken::Unrecognized(raw.to_string());

        match (name.as_str(), params) {
            ("required", None) => RuleToken::Required,
            ("nullable", None) => RuleToken::Nullable,
            ("sometimes", None) => RuleToken::Sometimes,
            ("string", None) => RuleToken::Kind(ValueKind::String),
            ("integer" | "int", None) => RuleToken::Kind(ValueKind::Integer),
            ("numeric" | "number" | "decimal", _) => RuleToken::Kind(ValueKind::Number),
            ("boolean" | "bool", None) => RuleToken::Kind(ValueKind::Boolean),
            ("array", _) => RuleToken::Kind(ValueKind::Array),
            ("date", None) => RuleToken::Kind(ValueKind::Date),
            ("email", _) => RuleToken::Kind(ValueKind::Email),
            ("url", _) => RuleToken::Kind(ValueKind::Url),
            ("min", Some(_)) => number().map(RuleToken::Min).unwrap_or_else(unrecognized),
            ("max", Some(_)) => number().map(RuleToken::Max).unwrap_or_else(unrecognized),
            ("size", Some(_)) => number().map(RuleToken::Size).unwrap_or_else(unrecognized),
            ("between", Some(_)) => match list().as_slice() {
                [lo, hi] => match (lo.parse::<f64>(), hi.parse::<f64>()) {
                    (Ok(lo), Ok(hi)) => RuleToken::Between(lo, hi),
                    _ => unrecognized(),
                },
                _ => unrecognized(),
            },
            ("in", Some(_)) => RuleToken::In(list()),
            ("not_in", Some(_)) => RuleToken::NotIn(list()),
            ("regex", Some(p)) => RuleToken::Regex(translate_pattern(p)),
            ("not_regex", Some(p)) => RuleToken::NotRegex(translate_pattern(p)),
            ("confirmed", None) => RuleToken::Confirmed,
            ("same", Some(p)) if !p.trim().is_empty() => RuleToken::Same(p.trim().to_string()),
            ("after", Some(p)) => RuleToken::After(p.trim().to_string()),
            ("before", Some(p)) => RuleToken::Before(p.trim().to_string()),
            ("date_format", Some(p)) => RuleToken::DateFormat(p.trim().to_string()),
            ("unique", Some(_)) | ("exists", Some(_)) => {
                let mut parts = list().into_iter();
                let table = parts.next().unwrap_or_default();
                let column = parts.next().filter(|c| !c.is_empty() && c != "NULL");
                if name == "unique" {
                    RuleToken::Unique { table, column }
                } else {
                    RuleToken::Exists { table, column }
                }
            }
            _ => unrecognized(),
        }
    }

    /// Whether a violation of this token can be observed without external state.
    pub fn is_checkable(&self) -> bool {
        !matches!(
            self,
            Self::Nullable
                | Self::Sometimes
                | Self::Unique { .. }
                | Self::Exists { .. }
                | Self::Unrecognized(_)
        )
    }

    /// Short rule name, as it appears before the `:`.
    pub fn name(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Nullable => "nullable",
            Self::Sometimes => "sometimes",
            Self::Kind(kind) => kind.as_str(),
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::Between(..) => "between",
            Self::Size(_) => "size",
            Self::In(_) => "in",
            Self::NotIn(_) => "not_in",
            Self::Regex(_) => "regex",
            Self::NotRegex(_) => "not_regex",
            Self::Confirmed => "confirmed",
            Self::Same(_) => "same",
            Self::After(_) => "after",
            Self::Before(_) => "before",
            Self::DateFormat(_) => "date_format",
            Self::Unique { .. } => "unique",
            Self::Exists { .. } => "exists",
            Self::Unrecognized(raw) => raw.split(':').next().unwrap_or(raw),
        }
    }
}

/// Strip `/…/flags` style delimiters and turn PCRE flags into an inline group.
fn translate_pattern(declared: &str) -> String {
    let declared = declared.trim();
    let mut chars = declared.chars();
    let Some(delim) = chars.next() else {
        return String::new();
    };
    if delim.is_alphanumeric() || delim == '\\' || delim.is_whitespace() {
        return declared.to_string();
    }
    let closing = match delim {
        '(' => ')',
        '{' => '}',
        '[' => ']',
        '<' => '>',
        other => other,
    };
    let Some(end) = declared.rfind(closing).filter(|&i| i > 0) else {
        return declared.to_string();
    };
    let body = &declared[delim.len_utf8()..end];
    let flags: String = declared[end + closing.len_utf8()..]
        .chars()
        .filter(|c| matches!(c, 'i' | 'm' | 's' | 'x'))
        .collect();
    if flags.is_empty() {
        body.to_string()
    } else {
        format!("(?{flags}){body}")
    }
}
