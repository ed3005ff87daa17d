//! # routegen-routes: Route Selection & Metadata
//!
//! The first two stages of the generation pipeline:
//!
//! - [`selector`] expands a [`routegen_core::RouteTable`] into ordered
//!   (route, verb) pairs, normalizing URIs and applying the prefix filter.
//! - [`extractor`] derives controller/action names, auth requirement and
//!   the raw validation-rule mapping for one route.
//!
//! Neither stage fails: unresolvable handlers and missing validation
//! sources degrade to an empty rule mapping and are carried on the
//! metadata for the run summary.

pub mod extractor;
pub mod selector;

pub use extractor::{auth_guard, extract, form_rules, requires_auth, RouteMetadata};
pub use selector::{
    matches_prefix, normalize_uri, RouteSelector, SelectedRoute, Selection, SkipReason,
    SkippedRoute,
};
