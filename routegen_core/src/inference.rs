//! Path parameter and request body inference.

use crate::type_mapping::ParamTypeMapping;
use crate::types::{BodyExpression, Param, ResolvedRoute, Route};
use tracing::trace;

/// Prefix marking a path segment as a parameter, as in `/items/:id`.
pub const PARAM_MARKER: char = ':';

/// Type of path parameters without a configured type.
pub const ANY_PATH_TYPE: &str = "impl ::std::fmt::Display";

/// Type of the synthesized request body parameter.
pub const ANY_BODY_TYPE: &str = "impl ::serde::Serialize";

pub const BODY_PARAM_NAME: &str = "body";

/// Names taken by the fixed parameters of every generated client method.
const FIXED_PARAM_NAMES: &[&str] = &[BODY_PARAM_NAME, "ctx", "result", "params"];

/// Strict and reserved Rust keywords, which cannot be used as identifiers.
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Resolves path parameters, their types and the body of one route.
pub fn infer_route(route: &Route, types: &ParamTypeMapping) -> ResolvedRoute {
    let mut path_params = Vec::new();
    let mut segments = Vec::new();

    for segment in route.path_template.split('/') {
        let Some(original_name) = segment.strip_prefix(PARAM_MARKER) else {
            segments.push(escape_format(segment));
            continue;
        };

        segments.push("{}".to_string());
        let param = Param {
            name: legal_var_name(original_name),
            original_name: original_name.to_string(),
            ty: types.get(original_name).unwrap_or(ANY_PATH_TYPE).to_string(),
        };
        trace!(
            "Path parameter {} -> {}: {}",
            param.original_name, param.name, param.ty
        );
        path_params.push(param);
    }

    let path = format!("/{}", segments.join("/").trim_start_matches('/'));

    let mut params = path_params.clone();
    let body = if route.method.carries_body() {
        params.push(Param {
            name: BODY_PARAM_NAME.to_string(),
            original_name: String::new(),
            ty: ANY_BODY_TYPE.to_string(),
        });
        BodyExpression::Body
    } else {
        BodyExpression::Nil
    };

    ResolvedRoute {
        method: route.method,
        name: route.handler_name.clone(),
        path_template: route.path_template.clone(),
        path,
        path_params,
        params,
        body,
    }
}

pub fn infer_routes(routes: &[Route], types: &ParamTypeMapping) -> Vec<ResolvedRoute> {
    routes.iter().map(|route| infer_route(route, types)).collect()
}

/// Turns a raw path parameter name into a legal, non-clashing identifier.
///
/// `publish_id` becomes `publishId`, `type` becomes `typ`, other keywords and
/// the fixed method parameters get a trailing underscore (`body_`).
pub fn legal_var_name(raw: &str) -> String {
    let sanitized: String = raw
        .chars()
        .map(|c| if c == '-' || c == '.' { '_' } else { c })
        .collect();
    let name = snake_to_camel(&sanitized);

    if name == "type" {
        return "typ".to_string();
    }
    if RUST_KEYWORDS.contains(&name.as_str()) || FIXED_PARAM_NAMES.contains(&name.as_str()) {
        return format!("{name}_");
    }
    name
}

/// `publish_id` -> `publishId`. A leading underscore is dropped and empty
/// pieces from doubled underscores are skipped.
fn snake_to_camel(s: &str) -> String {
    let mut pieces = s.strip_prefix('_').unwrap_or(s).split('_');
    let mut out = pieces.next().unwrap_or_default().to_string();

    for piece in pieces.filter(|p| !p.is_empty()) {
        let mut chars = piece.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn escape_format(segment: &str) -> String {
    segment.replace('{', "{{").replace('}', "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpMethod;
    use pretty_assertions::assert_eq;

    fn route(method: HttpMethod, path: &str) -> Route {
        Route {
            method,
            path_template: path.to_string(),
            receiver: "DefaultItemController".to_string(),
            handler_name: "GetItem".to_string(),
        }
    }

    fn names(params: &[Param]) -> Vec<&str> {
        params.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_placeholders_match_params() {
        let resolved = infer_route(
            &route(HttpMethod::Get, "/apps/:app_id/envs/:env/items"),
            &ParamTypeMapping::new(),
        );

        assert_eq!(resolved.path, "/apps/{}/envs/{}/items");
        assert_eq!(resolved.path.matches("{}").count(), resolved.path_params.len());
        assert_eq!(names(&resolved.path_params), vec!["appId", "env"]);
        assert_eq!(resolved.path_params[0].original_name, "app_id");
        assert_eq!(resolved.path_template, "/apps/:app_id/envs/:env/items");
    }

    #[test]
    fn test_no_params() {
        let resolved = infer_route(&route(HttpMethod::Get, "/health"), &ParamTypeMapping::new());
        assert_eq!(resolved.path, "/health");
        assert!(resolved.path_params.is_empty());
        assert!(resolved.params.is_empty());
    }

    #[test]
    fn test_body_for_put_and_post() {
        for method in [HttpMethod::Put, HttpMethod::Post] {
            let resolved = infer_route(&route(method, "/items/:id"), &ParamTypeMapping::new());
            assert_eq!(resolved.body, BodyExpression::Body);
            assert_eq!(names(&resolved.params), vec!["id", "body"]);
            assert_eq!(resolved.params.last().unwrap().ty, ANY_BODY_TYPE);
        }
    }

    #[test]
    fn test_no_body_for_other_methods() {
        for method in [
            HttpMethod::Get,
            HttpMethod::Delete,
            HttpMethod::Head,
            HttpMethod::Options,
            HttpMethod::Trace,
            HttpMethod::Patch,
        ] {
            let resolved = infer_route(&route(method, "/items/:id"), &ParamTypeMapping::new());
            assert_eq!(resolved.body, BodyExpression::Nil);
            assert_eq!(names(&resolved.params), vec!["id"]);
        }
    }

    #[test]
    fn test_body_param_collision() {
        let resolved = infer_route(&route(HttpMethod::Post, "/docs/:body"), &ParamTypeMapping::new());
        assert_eq!(names(&resolved.params), vec!["body_", "body"]);
        assert_eq!(resolved.path_params[0].original_name, "body");
    }

    #[test]
    fn test_type_mapping_wins_over_default() {
        let types = ParamTypeMapping::parse("id:u64;env:String").unwrap();
        let resolved = infer_route(&route(HttpMethod::Get, "/items/:id/:env/:other"), &types);

        let tys: Vec<&str> = resolved.path_params.iter().map(|p| p.ty.as_str()).collect();
        assert_eq!(tys, vec!["u64", "String", ANY_PATH_TYPE]);
    }

    #[test]
    fn test_leading_slashes_normalized() {
        let types = ParamTypeMapping::new();
        assert_eq!(infer_route(&route(HttpMethod::Get, "//api/x"), &types).path, "/api/x");
        assert_eq!(infer_route(&route(HttpMethod::Get, "api/x"), &types).path, "/api/x");
        assert_eq!(infer_route(&route(HttpMethod::Get, ":id"), &types).path, "/{}");
    }

    #[test]
    fn test_braces_are_escaped() {
        let resolved = infer_route(&route(HttpMethod::Get, "/a{b}/:id"), &ParamTypeMapping::new());
        assert_eq!(resolved.path, "/a{{b}}/{}");
    }

    #[test]
    fn test_legal_var_name() {
        assert_eq!(legal_var_name("publish_id"), "publishId");
        assert_eq!(legal_var_name("type"), "typ");
        assert_eq!(legal_var_name("body"), "body_");
        assert_eq!(legal_var_name("ctx"), "ctx_");
        assert_eq!(legal_var_name("match"), "match_");
        assert_eq!(legal_var_name("_private"), "private");
        assert_eq!(legal_var_name("a__b"), "aB");
        assert_eq!(legal_var_name("app-id"), "appId");
        assert_eq!(legal_var_name("_type"), "typ");
    }
}
