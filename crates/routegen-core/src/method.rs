//! # HTTP Verbs
//!
//! Classifies the verbs a router reports for a route. Only five verbs are
//! semantic entry points worth a generated test; `HEAD` is a protocol
//! artifact (GET headers, no body) and everything else is unsupported.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A verb that gets its own TestCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// All semantic verbs, in declaration order.
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    /// Uppercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Name with only the first letter capitalized, used in test names.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Patch => "Patch",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one verb reported by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerbClass {
    /// A verb that maps to a TestCase.
    Semantic(HttpMethod),
    /// `HEAD`: same response headers as GET without a body.
    ProtocolArtifact,
    /// Any other verb (e.g. `OPTIONS`), carried uppercased.
    Unsupported(String),
}

/// Classify a raw verb, case-insensitively.
pub fn classify_verb(raw: &str) -> VerbClass {
    let upper = raw.trim().to_ascii_uppercase();
    if upper == "HEAD" {
        return VerbClass::ProtocolArtifact;
    }
    HttpMethod::ALL
        .into_iter()
        .find(|m| m.as_str() == upper)
        .map(VerbClass::Semantic)
        .unwrap_or(VerbClass::Unsupported(upper))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(classify_verb("get"), VerbClass::Semantic(HttpMethod::Get));
        assert_eq!(classify_verb("Patch"), VerbClass::Semantic(HttpMethod::Patch));
        assert_eq!(classify_verb(" delete "), VerbClass::Semantic(HttpMethod::Delete));
    }

    #[test]
    fn head_is_a_protocol_artifact() {
        assert_eq!(classify_verb("HEAD"), VerbClass::ProtocolArtifact);
        assert_eq!(classify_verb("head"), VerbClass::ProtocolArtifact);
    }

    #[test]
    fn options_is_unsupported() {
        assert_eq!(
            classify_verb("options"),
            VerbClass::Unsupported("OPTIONS".to_string())
        );
    }

    #[test]
    fn serde_uses_uppercase_names() {
        let json = serde_json::to_string(&HttpMethod::Patch).unwrap();
        assert_eq!(json, "\"PATCH\"");
        let back: HttpMethod = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(back, HttpMethod::Delete);
    }
}
