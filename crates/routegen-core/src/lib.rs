//! # routegen-core: Foundational Types for routegen
//!
//! This crate holds the data model every other routegen crate speaks:
//! the route snapshot handed in by the caller, the raw and parsed
//! validation rule tokens, the handler naming transform, the TestCase
//! descriptor, and the error taxonomy. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Explicit snapshot input.** The route table is a value
//!    ([`RouteTable`]) passed in at call time, never fetched from ambient
//!    global state. Tests build snapshots inline.
//!
//! 2. **Capability, not reflection.** A handler parameter that declares
//!    validation rules exposes them through [`ValidationSource`]; the core
//!    never inspects types dynamically.
//!
//! 3. **Raw tokens are kept verbatim.** [`RuleMapping`] stores the tokens
//!    exactly as declared. Parsing into [`RuleToken`] happens at synthesis
//!    time and never drops or rewrites the declaration.
//!
//! 4. **Deterministic ordering.** Rule mappings and payloads are ordered by
//!    field name, so the same snapshot always produces the same output.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `routegen-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod case;
pub mod error;
pub mod method;
pub mod naming;
pub mod route;
pub mod rules;

// Re-export primary types for ergonomic imports.
pub use case::{
    FailureScenario, Payload, StatusHint, TestCase, UnverifiedReason, CONFIRMATION_SUFFIX,
};
pub use error::RouteGenError;
pub use method::{classify_verb, HttpMethod, VerbClass};
pub use route::{HandlerRef, ParameterSpec, Route, RouteAction, RouteTable, ValidationSource};
pub use rules::{RuleList, RuleMapping, RuleToken, ValueKind};
