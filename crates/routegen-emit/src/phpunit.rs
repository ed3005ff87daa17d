//! # PHPUnit Rendering
//!
//! Renders one controller's cases as a Laravel feature test class. Each
//! case becomes a happy-path test, one test per failure scenario, and, when
//! the route requires authorization, a test that the unauthenticated
//! request is refused.
//!
//! Test method names are unique within the class; a collision gets a
//! numeric suffix. In sequential mode every test after the first carries
//! `@depends` on its predecessor.

use std::collections::BTreeSet;
use std::path::{Component, Path};

use serde_json::Value;

use routegen_core::naming::{humanize, pascal_case};
use routegen_core::{FailureScenario, Payload, RuleToken, StatusHint, TestCase};

use crate::formatter::EmitConfig;

/// Value substituted for every `{param}` in the request URI.
pub const PATH_PARAMETER_FILL: &str = "1";

/// Directory component under which subdirectories become sub-namespaces.
const FEATURE_DIR: &str = "Feature";

struct Emitter {
    output: String,
    indent: usize,
}

impl Emitter {
    fn new() -> Self {
        Emitter {
            output: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, s: &str) {
        if s.is_empty() {
            self.output.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn blank(&mut self) {
        self.output.push('\n');
    }
}

/// One test method before rendering.
struct TestMethod<'a> {
    name: String,
    case: &'a TestCase,
    summary: String,
    payload: &'a Payload,
    kind: TestKind<'a>,
}

enum TestKind<'a> {
    Happy,
    Failure(&'a FailureScenario),
    Unauthenticated,
}

/// Render a feature test class for one controller.
pub fn render(controller: &str, cases: &[TestCase], config: &EmitConfig) -> String {
    let methods = plan(cases);
    let mut e = Emitter::new();

    e.line("<?php");
    e.blank();
    e.line(&format!(
        "namespace {};",
        namespace_for(&config.namespace, &config.output_dir)
    ));
    e.blank();
    e.line("use Tests\\TestCase;");
    e.blank();
    e.line("/**");
    e.line(&format!(
        " * {} endpoints, generated from the application's route table.",
        humanize(controller)
    ));
    e.line(" *");
    e.line(" * Regenerating replaces this file; hand edits are not preserved.");
    e.line(" */");
    e.line(&format!("class {controller}Test extends TestCase"));
    e.line("{");
    e.indent += 1;

    let mut previous: Option<&str> = None;
    for (i, method) in methods.iter().enumerate() {
        if i > 0 {
            e.blank();
        }
        let depends = if config.sequential { previous } else { None };
        emit_method(&mut e, method, depends, config);
        previous = Some(method.name.as_str());
    }

    e.indent -= 1;
    e.line("}");
    e.output
}

/// Lay out every test method of the class, with unique names.
fn plan(cases: &[TestCase]) -> Vec<TestMethod<'_>> {
    let mut taken = BTreeSet::new();
    let mut methods = Vec::new();

    for case in cases {
        let action = pascal_case(&case.action_name);
        let endpoint = format!("{} {}", case.method, case.uri);

        methods.push(TestMethod {
            name: unique_name(&mut taken, format!("test{action}Succeeds")),
            case,
            summary: format!("{endpoint} accepts a valid payload."),
            payload: &case.happy_payload,
            kind: TestKind::Happy,
        });

        for scenario in &case.failure_payloads {
            let field = pascal_case(&scenario.violated_field);
            let (base, summary) = if scenario.omits_field() {
                (
                    format!("test{action}FailsWithout{field}"),
                    format!("{endpoint} rejects a payload without '{}'.", scenario.violated_field),
                )
            } else {
                let rule = pascal_case(RuleToken::parse(&scenario.violated_rule).name());
                (
                    format!("test{action}Rejects{field}{rule}"),
                    format!(
                        "{endpoint} rejects '{}' violating {}.",
                        scenario.violated_field, scenario.violated_rule
                    ),
                )
            };
            methods.push(TestMethod {
                name: unique_name(&mut taken, base),
                case,
                summary,
                payload: &scenario.payload,
                kind: TestKind::Failure(scenario),
            });
        }

        if case.requires_auth {
            methods.push(TestMethod {
                name: unique_name(&mut taken, format!("test{action}RequiresAuthentication")),
                case,
                summary: format!("{endpoint} refuses unauthenticated requests."),
                payload: &case.happy_payload,
                kind: TestKind::Unauthenticated,
            });
        }
    }
    methods
}

fn unique_name(taken: &mut BTreeSet<String>, base: String) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn emit_method(e: &mut Emitter, method: &TestMethod<'_>, depends: Option<&str>, config: &EmitConfig) {
    let case = method.case;

    e.line("/**");
    e.line(&format!(" * {}", docblock_safe(&method.summary)));
    if matches!(method.kind, TestKind::Happy) {
        for (field, reason) in &case.unverified {
            e.line(&format!(
                " * Unverified '{}': {}.",
                docblock_safe(field),
                docblock_safe(&reason.describe())
            ));
        }
        if !case.unchecked_fields.is_empty() {
            e.line(&format!(
                " * No failure test for: {}.",
                docblock_safe(&case.unchecked_fields.join(", "))
            ));
        }
    }
    if let Some(previous) = depends {
        e.line(" *");
        e.line(&format!(" * @depends {previous}"));
    }
    e.line(" */");
    e.line(&format!("public function {}(): void", method.name));
    e.line("{");
    e.indent += 1;

    emit_payload(e, method.payload);
    e.blank();

    let request = format!(
        "->json('{}', {}, $payload);",
        case.method,
        php_string(&fill_path_parameters(&case.uri))
    );
    let authenticated = case.requires_auth && !matches!(method.kind, TestKind::Unauthenticated);
    if authenticated {
        let guard = case
            .auth_guard
            .as_deref()
            .map(|g| format!(", {}", php_string(g)))
            .unwrap_or_default();
        e.line(&format!(
            "$response = $this->actingAs({}::factory()->create(){guard})",
            config.auth_user_model
        ));
        e.indent += 1;
        e.line(&request);
        e.indent -= 1;
    } else {
        e.line(&format!("$response = $this{request}"));
    }
    e.blank();

    match method.kind {
        TestKind::Happy => e.line("$response->assertSuccessful();"),
        TestKind::Failure(scenario) => {
            e.line(&format!(
                "$response->assertStatus({});",
                scenario.expected_status.status_code()
            ));
            e.line(&format!(
                "$response->assertJsonValidationErrors([{}]);",
                php_string(&scenario.violated_field)
            ));
        }
        TestKind::Unauthenticated => e.line(&format!(
            "$response->assertStatus({});",
            StatusHint::Unauthorized.status_code()
        )),
    }

    e.indent -= 1;
    e.line("}");
}

fn emit_payload(e: &mut Emitter, payload: &Payload) {
    if payload.is_empty() {
        e.line("$payload = [];");
        return;
    }
    e.line("$payload = [");
    e.indent += 1;
    for (field, value) in payload {
        e.line(&format!("{} => {},", php_string(field), php_value(value)));
    }
    e.indent -= 1;
    e.line("];");
}

/// Namespace for a class written to `output_dir`: the base namespace plus
/// every directory below the last `Feature` component.
pub fn namespace_for(base: &str, output_dir: &Path) -> String {
    let parts: Vec<String> = output_dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let Some(feature) = parts.iter().rposition(|p| p == FEATURE_DIR) else {
        return base.to_string();
    };
    let mut namespace = base.to_string();
    for part in &parts[feature + 1..] {
        let segment = pascal_case(part);
        if !segment.is_empty() {
            namespace.push('\\');
            namespace.push_str(&segment);
        }
    }
    namespace
}

/// Replace every `{param}` with [`PATH_PARAMETER_FILL`].
pub fn fill_path_parameters(uri: &str) -> String {
    let mut out = String::with_capacity(uri.len());
    let mut rest = uri;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str(PATH_PARAMETER_FILL);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Single-quoted PHP string literal.
pub fn php_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// PHP literal for a JSON value.
pub fn php_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => php_string(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(php_value).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{} => {}", php_string(k), php_value(v)))
                .collect();
            format!("[{}]", inner.join(", "))
        }
    }
}

fn docblock_safe(s: &str) -> String {
    s.replace("*/", "*\\/")
}
