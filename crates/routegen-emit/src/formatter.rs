//! # Test Suite Formatter
//!
//! Buffers [`TestCase`] descriptors grouped by controller and writes one
//! file per controller on [`TestSuiteFormatter::flush`].
//!
//! ## State Machine
//!
//! ```text
//! Empty ──format──▶ Buffering ──format──▶ Buffering
//!   │                   │
//!   └──────flush────────┴──────▶ Flushed (formatter consumed)
//! ```
//!
//! `flush` takes the formatter by value, so a flushed formatter cannot be
//! fed again. Each controller file is fully replaced on flush; files of
//! controllers absent from the run are left alone.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use routegen_core::{RouteGenError, TestCase};

use crate::{json, phpunit};

/// Default output directory, relative to the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "tests/Feature";
/// Default namespace of generated feature classes.
pub const DEFAULT_NAMESPACE: &str = "Tests\\Feature";
/// Default authenticatable model used by `actingAs`.
pub const DEFAULT_AUTH_USER_MODEL: &str = "\\App\\Models\\User";

/// Generated file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PHPUnit feature test classes.
    #[default]
    Phpunit,
    /// Pretty-printed TestCase descriptors.
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phpunit => "phpunit",
            Self::Json => "json",
        }
    }

    /// File name for one controller's suite.
    pub fn file_name(&self, controller: &str) -> String {
        match self {
            Self::Phpunit => format!("{controller}Test.php"),
            Self::Json => format!("{controller}.json"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phpunit" => Ok(Self::Phpunit),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected phpunit or json)")),
        }
    }
}

/// Output policy for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    pub output_dir: PathBuf,
    /// Gate each case on the success of the previous one in its file.
    pub sequential: bool,
    pub format: OutputFormat,
    /// Base namespace; subdirectories below `Feature` are appended.
    pub namespace: String,
    pub auth_user_model: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sequential: false,
            format: OutputFormat::default(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            auth_user_model: DEFAULT_AUTH_USER_MODEL.to_string(),
        }
    }
}

/// Observable formatter state before flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatterState {
    Empty,
    Buffering,
}

/// What a flush wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Files written, in controller order.
    pub files: Vec<PathBuf>,
    /// Test cases rendered across all files.
    pub cases: usize,
}

/// Buffers cases per controller and writes them out once.
#[derive(Debug)]
pub struct TestSuiteFormatter {
    config: EmitConfig,
    suites: BTreeMap<String, Vec<TestCase>>,
}

impl TestSuiteFormatter {
    pub fn new(config: EmitConfig) -> Self {
        Self {
            config,
            suites: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &EmitConfig {
        &self.config
    }

    pub fn state(&self) -> FormatterState {
        if self.suites.is_empty() {
            FormatterState::Empty
        } else {
            FormatterState::Buffering
        }
    }

    /// Buffer one case under its controller.
    pub fn format(&mut self, case: TestCase) {
        tracing::debug!(
            controller = %case.controller_name,
            action = %case.action_name,
            method = %case.method,
            uri = %case.uri,
            "buffered test case"
        );
        self.suites
            .entry(case.controller_name.clone())
            .or_default()
            .push(case);
    }

    /// Render one controller's suite without writing it.
    pub fn render(&self, controller: &str) -> Result<Option<String>, RouteGenError> {
        self.suites
            .get(controller)
            .map(|cases| self.render_suite(controller, cases))
            .transpose()
    }

    fn render_suite(&self, controller: &str, cases: &[TestCase]) -> Result<String, RouteGenError> {
        match self.config.format {
            OutputFormat::Phpunit => Ok(phpunit::render(controller, cases, &self.config)),
            OutputFormat::Json => json::render(controller, cases, self.config.sequential),
        }
    }

    /// Write every buffered suite, replacing existing files.
    ///
    /// An empty formatter writes nothing and does not create the directory.
    pub fn flush(self) -> Result<FlushReport, RouteGenError> {
        let mut report = FlushReport::default();
        if self.suites.is_empty() {
            tracing::info!("no test cases buffered; nothing written");
            return Ok(report);
        }

        let dir = &self.config.output_dir;
        std::fs::create_dir_all(dir).map_err(|source| RouteGenError::OutputWriteFailure {
            path: dir.clone(),
            source,
        })?;

        for (controller, cases) in &self.suites {
            let contents = self.render_suite(controller, cases)?;
            let path = dir.join(self.config.format.file_name(controller));
            write_file(&path, &contents)?;
            tracing::info!(path = %path.display(), cases = cases.len(), "wrote test suite");
            report.cases += cases.len();
            report.files.push(path);
        }
        Ok(report)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), RouteGenError> {
    std::fs::write(path, contents).map_err(|source| RouteGenError::OutputWriteFailure {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use routegen_core::{HttpMethod, Payload};
    use std::collections::BTreeMap;

    fn case(controller: &str, action: &str, uri: &str) -> TestCase {
        TestCase {
            controller_name: controller.into(),
            action_name: action.into(),
            uri: uri.into(),
            method: HttpMethod::Get,
            requires_auth: false,
            auth_guard: None,
            happy_payload: Payload::new(),
            failure_payloads: vec![],
            unverified: BTreeMap::new(),
            unchecked_fields: vec![],
        }
    }

    fn config(dir: &Path, format: OutputFormat) -> EmitConfig {
        EmitConfig {
            output_dir: dir.to_path_buf(),
            format,
            ..EmitConfig::default()
        }
    }

    #[test]
    fn state_transitions() {
        let mut formatter = TestSuiteFormatter::new(EmitConfig::default());
        assert_eq!(formatter.state(), FormatterState::Empty);
        formatter.format(case("User", "Index", "/users"));
        assert_eq!(formatter.state(), FormatterState::Buffering);
    }

    #[test]
    fn one_file_per_controller() {
        let tmp = tempfile::tempdir().unwrap();
        let mut formatter = TestSuiteFormatter::new(config(tmp.path(), OutputFormat::Phpunit));
        formatter.format(case("User", "Index", "/users"));
        formatter.format(case("User", "Show", "/users/{user}"));
        formatter.format(case("Post", "Index", "/posts"));
        let report = formatter.flush().unwrap();

        assert_eq!(report.cases, 3);
        assert_eq!(
            report.files,
            [tmp.path().join("PostTest.php"), tmp.path().join("UserTest.php")]
        );
        let user = std::fs::read_to_string(tmp.path().join("UserTest.php")).unwrap();
        assert!(user.contains("class UserTest extends TestCase"));
        assert!(user.contains("testIndexSucceeds"));
        assert!(user.contains("testShowSucceeds"));
    }

    #[test]
    fn second_flush_fully_replaces_file() {
        let tmp = tempfile::tempdir().unwrap();

        let mut first = TestSuiteFormatter::new(config(tmp.path(), OutputFormat::Phpunit));
        first.format(case("User", "Index", "/users"));
        first.format(case("User", "Destroy", "/users/{user}"));
        first.format(case("Post", "Index", "/posts"));
        first.flush().unwrap();

        let mut second = TestSuiteFormatter::new(config(tmp.path(), OutputFormat::Phpunit));
        second.format(case("User", "Show", "/users/{user}"));
        second.flush().unwrap();

        let user = std::fs::read_to_string(tmp.path().join("UserTest.php")).unwrap();
        assert!(user.contains("testShowSucceeds"));
        assert!(!user.contains("testIndexSucceeds"));
        assert!(!user.contains("testDestroySucceeds"));
        assert!(tmp.path().join("PostTest.php").exists());
    }

    #[test]
    fn json_format_writes_descriptors() {
        let tmp = tempfile::tempdir().unwrap();
        let mut formatter = TestSuiteFormatter::new(config(tmp.path(), OutputFormat::Json));
        formatter.format(case("User", "Index", "/users"));
        let report = formatter.flush().unwrap();

        assert_eq!(report.files, [tmp.path().join("User.json")]);
        let raw = std::fs::read_to_string(&report.files[0]).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["controller"], "User");
        assert_eq!(doc["cases"][0]["uri"], "/users");
    }

    #[test]
    fn empty_flush_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("never-created");
        let report = TestSuiteFormatter::new(config(&out, OutputFormat::Phpunit))
            .flush()
            .unwrap();
        assert!(report.files.is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn unwritable_directory_is_output_write_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut formatter =
            TestSuiteFormatter::new(config(&blocker.join("tests"), OutputFormat::Phpunit));
        formatter.format(case("User", "Index", "/users"));
        let err = formatter.flush().unwrap_err();
        assert!(matches!(err, RouteGenError::OutputWriteFailure { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn render_without_writing() {
        let mut formatter = TestSuiteFormatter::new(EmitConfig::default());
        formatter.format(case("User", "Index", "/users"));
        assert!(formatter.render("User").unwrap().unwrap().contains("UserTest"));
        assert!(formatter.render("Missing").unwrap().is_none());
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!("phpunit".parse::<OutputFormat>().unwrap(), OutputFormat::Phpunit);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.file_name("User"), "User.json");
    }
}
