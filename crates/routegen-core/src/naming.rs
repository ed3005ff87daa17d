//! # Handler Naming
//!
//! Derives the controller and action names used to group and label
//! generated tests from a fully-qualified handler reference such as
//! `App\Http\Controllers\UserProfileController@showAvatar`.
//!
//! ## Compatibility Note
//!
//! Names are split at every uppercase boundary and the segments are then
//! rejoined with [`SEGMENT_JOINER`], which is the empty string. The split is
//! therefore invisible in the result (`UserProfile` stays `UserProfile`).
//! This is the naming convention existing output files and tooling key on;
//! it is intentional, not a bug. [`humanize`] exposes the same segments
//! joined with spaces for descriptions.

/// Conventional class-name suffix dropped from controller names.
pub const CONTROLLER_SUFFIX: &str = "Controller";

/// Separator used when rejoining case-boundary segments. Must stay empty.
pub const SEGMENT_JOINER: &str = "";

/// Controller name used for closure handlers.
pub const CLOSURE_CONTROLLER: &str = "Closure";

/// Split an identifier immediately before every uppercase character.
///
/// Empty segments are dropped, so `"UserProfile"` yields `["User", "Profile"]`.
pub fn split_case_boundaries(ident: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (idx, ch) in ident.char_indices() {
        if ch.is_uppercase() && idx > start {
            segments.push(&ident[start..idx]);
            start = idx;
        }
    }
    if start < ident.len() {
        segments.push(&ident[start..]);
    }
    segments
}

fn rejoin(ident: &str) -> String {
    split_case_boundaries(ident)
        .join(SEGMENT_JOINER)
        .trim()
        .to_string()
}

/// Controller name: last namespace segment, class part only, without the
/// trailing `Controller` suffix.
///
/// Idempotent: applying it to its own output returns the same name.
pub fn controller_name(reference: &str) -> String {
    let last = reference.rsplit('\\').next().unwrap_or(reference);
    let class = last.split_once('@').map_or(last, |(class, _)| class);

    let mut name = class.trim();
    while let Some(stripped) = name.strip_suffix(CONTROLLER_SUFFIX) {
        if stripped.trim().is_empty() {
            break;
        }
        name = stripped.trim();
    }
    rejoin(name)
}

/// Action name: the method after `@`, first character uppercased.
///
/// Returns `None` when the reference has no `@method` part.
pub fn action_name(reference: &str) -> Option<String> {
    let (_, method) = reference.split_once('@')?;
    let method = method.trim();
    if method.is_empty() {
        return None;
    }
    Some(rejoin(&upper_first(method)))
}

/// Action name for a closure route, built from its literal URI segments.
///
/// `/api/status` → `ApiStatus`; `/` → `Root`. Path parameters are skipped.
pub fn closure_action_name(uri: &str) -> String {
    let name: String = uri
        .split('/')
        .filter(|seg| !seg.is_empty() && !seg.starts_with('{'))
        .map(pascal_case)
        .collect();
    if name.is_empty() {
        "Root".to_string()
    } else {
        name
    }
}

/// Case-boundary segments joined with spaces: `UserProfile` → `User Profile`.
pub fn humanize(name: &str) -> String {
    split_case_boundaries(name).join(" ")
}

/// PascalCase a field or path segment: `email_address` → `EmailAddress`,
/// `items.*.name` → `ItemsName`.
pub fn pascal_case(raw: &str) -> String {
    raw.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(upper_first)
        .collect()
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Transforming an already-transformed controller name is a no-op.
        #[test]
        fn controller_name_idempotent(reference in "[A-Za-z\\\\@ ]{0,40}") {
            let once = controller_name(&reference);
            let twice = controller_name(&once);
            prop_assert_eq!(once, twice);
        }

        /// Rejoining the case-boundary split reproduces the input.
        #[test]
        fn split_then_rejoin_is_identity(ident in "[A-Za-z0-9]{0,30}") {
            let joined = split_case_boundaries(&ident).join(SEGMENT_JOINER);
            prop_assert_eq!(joined, ident);
        }
    }
}
