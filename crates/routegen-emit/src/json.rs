//! JSON suite rendering: the descriptors themselves, one document per controller.

use serde::Serialize;

use routegen_core::{RouteGenError, TestCase};

#[derive(Serialize)]
struct SuiteDocument<'a> {
    controller: &'a str,
    sequential: bool,
    cases: &'a [TestCase],
}

/// Pretty-printed suite document with a trailing newline.
pub fn render(controller: &str, cases: &[TestCase], sequential: bool) -> Result<String, RouteGenError> {
    let doc = SuiteDocument {
        controller,
        sequential,
        cases,
    };
    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use routegen_core::{HttpMethod, Payload};
    use std::collections::BTreeMap;

    #[test]
    fn document_shape() {
        let case = TestCase {
            controller_name: "Post".into(),
            action_name: "Index".into(),
            uri: "/posts".into(),
            method: HttpMethod::Get,
            requires_auth: false,
            auth_guard: None,
            happy_payload: Payload::new(),
            failure_payloads: vec![],
            unverified: BTreeMap::new(),
            unchecked_fields: vec![],
        };
        let raw = render("Post", &[case.clone()], true).unwrap();
        assert!(raw.ends_with("}\n"));

        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["controller"], "Post");
        assert_eq!(doc["sequential"], true);
        let cases: Vec<TestCase> = serde_json::from_value(doc["cases"].clone()).unwrap();
        assert_eq!(cases, [case]);
    }
}
