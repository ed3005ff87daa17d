//! # Route Metadata Extraction
//!
//! Derives, for one route, everything the case builder needs: controller
//! and action names, the middleware list, whether an authorization
//! middleware is attached, and the raw validation-rule mapping of the bound
//! handler.
//!
//! ## Rule Source
//!
//! Only string `Class@method` handlers have a signature to look at. The
//! first declared parameter that exposes [`ValidationSource::validation_rules`]
//! supplies the mapping, copied verbatim. Two degradations are recovered
//! here and reported on the metadata, never raised:
//!
//! - closures and references without `@method` → `UnresolvableHandler`
//! - no validation-bearing parameter → `NoValidationSource`
//!
//! Both yield an empty mapping, so the route still gets a happy-path case.

use routegen_core::naming::{
    action_name, closure_action_name, controller_name, CLOSURE_CONTROLLER,
};
use routegen_core::{HandlerRef, Route, RouteAction, RouteGenError, RuleMapping, ValidationSource};

/// Substring that marks an authorization middleware.
pub const AUTH_MIDDLEWARE_MARKER: &str = "auth";

/// Everything derived from one route.
#[derive(Debug)]
pub struct RouteMetadata {
    pub controller_name: String,
    pub action_name: String,
    pub middlewares: Vec<String>,
    pub rules: RuleMapping,
    pub requires_auth: bool,
    /// Guard from an `auth:<guard>` middleware.
    pub auth_guard: Option<String>,
    /// Recovered degradation, if the rules could not be resolved.
    pub issue: Option<RouteGenError>,
}

/// Extract metadata for a route whose URI has already been normalized.
pub fn extract(route: &Route, uri: &str) -> RouteMetadata {
    let reference = route.action.reference();
    let (controller, action) = match route.action.handler() {
        HandlerRef::Closure => (CLOSURE_CONTROLLER.to_string(), closure_action_name(uri)),
        HandlerRef::Action { .. } | HandlerRef::Opaque(_) => (
            controller_name(reference),
            action_name(reference).unwrap_or_else(|| closure_action_name(uri)),
        ),
    };

    let (rules, issue) = match form_rules(&route.action) {
        Ok(rules) => (rules, None),
        Err(err) => {
            match &err {
                RouteGenError::UnresolvableHandler { .. } => {
                    tracing::debug!(%uri, %reference, "handler is not reflectable; empty rule mapping");
                }
                _ => {
                    tracing::debug!(%uri, %reference, "no validation request parameter; empty rule mapping");
                }
            }
            (RuleMapping::new(), Some(err))
        }
    };

    RouteMetadata {
        controller_name: controller,
        action_name: action,
        middlewares: route.middleware.clone(),
        requires_auth: requires_auth(&route.middleware),
        auth_guard: auth_guard(&route.middleware),
        rules,
        issue,
    }
}

/// Resolve the validation-rule mapping of a route's handler.
pub fn form_rules(action: &RouteAction) -> Result<RuleMapping, RouteGenError> {
    match action.handler() {
        HandlerRef::Closure | HandlerRef::Opaque(_) => Err(RouteGenError::UnresolvableHandler {
            reference: action.reference().to_string(),
        }),
        HandlerRef::Action { .. } => action
            .parameters
            .iter()
            .find_map(|p| p.validation_rules())
            .cloned()
            .ok_or_else(|| RouteGenError::NoValidationSource {
                reference: action.reference().to_string(),
            }),
    }
}

/// Whether any middleware name contains `auth`.
pub fn requires_auth(middlewares: &[String]) -> bool {
    middlewares
        .iter()
        .any(|m| m.contains(AUTH_MIDDLEWARE_MARKER))
}

/// Guard named by the first `auth:<guard>[,<guard>…]` middleware.
pub fn auth_guard(middlewares: &[String]) -> Option<String> {
    middlewares.iter().find_map(|m| {
        let (name, params) = m.split_once(':')?;
        if name.trim() != AUTH_MIDDLEWARE_MARKER {
            return None;
        }
        params
            .split(',')
            .map(str::trim)
            .find(|g| !g.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use routegen_core::{ParameterSpec, RuleList};

    fn rules(pairs: &[(&str, &str)]) -> RuleMapping {
        pairs
            .iter()
            .map(|(f, r)| (f.to_string(), RuleList::from_piped(r)))
            .collect()
    }

    fn action_route(uses: Option<&str>, parameters: Vec<ParameterSpec>, mw: &[&str]) -> Route {
        Route {
            uri: "/api/users".into(),
            methods: vec!["POST".into()],
            middleware: mw.iter().map(|m| m.to_string()).collect(),
            action: RouteAction {
                uses: uses.map(str::to_string),
                parameters,
            },
        }
    }

    fn request_param(mapping: RuleMapping) -> ParameterSpec {
        ParameterSpec {
            name: Some("request".into()),
            type_name: Some("App\\Http\\Requests\\StoreUser".into()),
            validation: Some(mapping),
        }
    }

    #[test]
    fn extracts_names_and_rules() {
        let mapping = rules(&[("email", "required|email")]);
        let route = action_route(
            Some("App\\Http\\Controllers\\UserProfileController@updateAvatar"),
            vec![request_param(mapping.clone())],
            &["api"],
        );
        let meta = extract(&route, "/api/users");
        assert_eq!(meta.controller_name, "UserProfile");
        assert_eq!(meta.action_name, "UpdateAvatar");
        assert_eq!(meta.rules, mapping);
        assert!(meta.issue.is_none());
    }

    #[test]
    fn first_validation_parameter_wins() {
        let first = rules(&[("a", "required")]);
        let second = rules(&[("b", "required")]);
        let plain = ParameterSpec {
            name: Some("id".into()),
            type_name: Some("int".into()),
            validation: None,
        };
        let route = action_route(
            Some("PostController@update"),
            vec![plain, request_param(first.clone()), request_param(second)],
            &[],
        );
        assert_eq!(form_rules(&route.action).unwrap(), first);
    }

    #[test]
    fn closure_yields_unresolvable_handler() {
        let route = action_route(None, vec![], &[]);
        let meta = extract(&route, "/api/status");
        assert_eq!(meta.controller_name, "Closure");
        assert_eq!(meta.action_name, "ApiStatus");
        assert!(meta.rules.is_empty());
        assert!(matches!(
            meta.issue,
            Some(RouteGenError::UnresolvableHandler { .. })
        ));
    }

    #[test]
    fn missing_request_parameter_is_no_validation_source() {
        let route = action_route(Some("UserController@index"), vec![], &[]);
        let meta = extract(&route, "/api/users");
        assert!(meta.rules.is_empty());
        assert!(matches!(
            meta.issue,
            Some(RouteGenError::NoValidationSource { ref reference }) if reference == "UserController@index"
        ));
    }

    #[test]
    fn opaque_reference_uses_class_name() {
        let route = action_route(Some("App\\Http\\Controllers\\DashboardController"), vec![], &[]);
        let meta = extract(&route, "/dashboard");
        assert_eq!(meta.controller_name, "Dashboard");
        assert_eq!(meta.action_name, "Dashboard");
        assert!(matches!(
            meta.issue,
            Some(RouteGenError::UnresolvableHandler { .. })
        ));
    }

    #[test]
    fn auth_middleware_detection() {
        let auth = vec!["auth:api".to_string()];
        let throttle = vec!["throttle:60,1".to_string()];
        assert!(requires_auth(&auth));
        assert!(!requires_auth(&throttle));
        assert!(requires_auth(&["web".to_string(), "auth".to_string()]));
        assert!(!requires_auth(&[]));
    }

    #[test]
    fn auth_guard_parsing() {
        assert_eq!(auth_guard(&["auth:api".to_string()]).as_deref(), Some("api"));
        assert_eq!(
            auth_guard(&["auth:sanctum,web".to_string()]).as_deref(),
            Some("sanctum")
        );
        assert_eq!(auth_guard(&["auth".to_string()]), None);
        assert_eq!(auth_guard(&["throttle:60,1".to_string()]), None);
    }

    #[test]
    fn metadata_carries_auth_flags() {
        let route = action_route(Some("UserController@store"), vec![], &["auth:api"]);
        let meta = extract(&route, "/api/users");
        assert!(meta.requires_auth);
        assert_eq!(meta.auth_guard.as_deref(), Some("api"));
        assert_eq!(meta.middlewares, ["auth:api"]);
    }
}
