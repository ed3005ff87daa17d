//! # routegen-emit: Test Suite Output
//!
//! The last pipeline stage. [`TestSuiteFormatter`] buffers
//! [`routegen_core::TestCase`] descriptors grouped by controller and, on
//! flush, writes one file per controller:
//!
//! - [`phpunit`]: a Laravel feature test class `<Controller>Test.php`.
//! - [`json`]: the descriptors as `<Controller>.json`.
//!
//! Flushing fully replaces each controller's file. It never merges with
//! hand-edited content.
//!
//! ## Crate Policy
//!
//! - The only fatal error is `OutputWriteFailure` (plus `Serialization` for
//!   the JSON format); rendering itself cannot fail.
//! - No `.unwrap()` outside tests.

pub mod formatter;
pub mod json;
pub mod phpunit;

pub use formatter::{
    EmitConfig, FlushReport, FormatterState, OutputFormat, TestSuiteFormatter,
    DEFAULT_AUTH_USER_MODEL, DEFAULT_NAMESPACE, DEFAULT_OUTPUT_DIR,
};
