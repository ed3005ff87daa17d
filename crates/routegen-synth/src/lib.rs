//! # routegen-synth: Value Synthesis & Case Building
//!
//! Turns a field → rule-token mapping into concrete request payloads.
//!
//! - [`profile`] folds one field's tokens into a [`FieldProfile`].
//! - [`pattern`] builds strings that match (or miss) a `regex:` rule.
//! - [`synthesizer`] produces a valid value per field and the ranked
//!   violations that break exactly one rule.
//! - [`builder`] assembles the happy payload and the single-field failure
//!   scenarios into a [`routegen_core::TestCase`].
//!
//! ## Key Design Principles
//!
//! 1. **Deterministic.** The same tokens always yield the same values; no
//!    randomness, no clock. Relative dates are flagged, never resolved.
//!
//! 2. **Never fatal.** Unknown or contradictory rules produce a best-effort
//!    value plus an [`routegen_core::UnverifiedReason`]; they do not abort
//!    the run.
//!
//! 3. **One cause per failure.** Every failure payload differs from the
//!    happy payload in one field, so a failing assertion names its rule.

pub mod builder;
pub mod pattern;
pub mod profile;
pub mod synthesizer;

pub use builder::{CaseInput, TestCaseBuilder};
pub use profile::{FieldProfile, Measure};
pub use synthesizer::{diverge, Mutation, RuleValueSynthesizer, Sample, Violation};
