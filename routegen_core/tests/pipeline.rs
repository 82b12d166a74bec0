use pretty_assertions::assert_eq;
use routegen_core::{
    AnnotateOptions, BodyExpression, GeneratorConfig, HttpMethod, ParamTypeMapping, Vocabulary,
    annotate_source, apply_names, discover_routes, extract_routes_from_source, generate_client,
    generate_code, infer_route,
};
use syn::{FnArg, ImplItem, Item, Pat};

const ROUTERS: &str = r#"
use beego;
use routable::*;

pub fn init() {
    let ns = beego::new_namespace(
        "/api",
        [
            beego::ns_namespace(
                "/v1",
                [
                    beego::ns_router(
                        "/apps/:app_id/versions",
                        &controllers::VersionController {},
                        mapping_methods([
                            GET(controllers::DefaultVersionController::list),
                            POST(controllers::DefaultVersionController::create),
                        ]),
                    ),
                    beego::ns_router(
                        "/apps/:app_id/versions/:type",
                        &controllers::VersionController {},
                        mapping_methods([
                            GET(controllers::DefaultVersionController::get),
                            PUT(controllers::DefaultVersionController::update),
                            DELETE(controllers::DefaultVersionController::delete),
                        ]),
                    ),
                ],
            ),
        ],
    );
    beego::add_namespace(ns);

    let jobs = beego::new_namespace(
        "/jobs",
        vec![beego::ns_router(
            "/:publish_id/sync",
            &controllers::JobController {},
            mapping_methods(vec![POST(controllers::DefaultJobController::sync_all)]),
        )],
    );
    beego::add_namespace(jobs);
}
"#;

/// Method name and non-receiver argument names of each method in the
/// generated `impl Api for Client` block.
fn impl_methods(code: &str) -> Vec<(String, Vec<String>)> {
    let file = syn::parse_file(code).unwrap();
    let Item::Mod(module) = &file.items[0] else {
        panic!("expected a module");
    };
    let items = &module.content.as_ref().unwrap().1;
    let item_impl = items
        .iter()
        .find_map(|item| match item {
            Item::Impl(i)
                if i
                    .trait_
                    .as_ref()
                    .is_some_and(|(_, path, _)| path.is_ident("Api")) =>
            {
                Some(i)
            }
            _ => None,
        })
        .unwrap();

    item_impl
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(f) => Some(f),
            _ => None,
        })
        .map(|f| {
            let args = f
                .sig
                .inputs
                .iter()
                .filter_map(|arg| match arg {
                    FnArg::Typed(t) => match t.pat.as_ref() {
                        Pat::Ident(p) => Some(p.ident.to_string()),
                        _ => None,
                    },
                    _ => None,
                })
                .collect();
            (f.sig.ident.to_string(), args)
        })
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_discovery_flattens_namespaces() {
    let routes = extract_routes_from_source(ROUTERS, &Vocabulary::default()).unwrap();
    let found: Vec<(HttpMethod, &str)> = routes
        .iter()
        .map(|r| (r.method, r.path_template.as_str()))
        .collect();

    assert_eq!(
        found,
        vec![
            (HttpMethod::Get, "/api/v1/apps/:app_id/versions"),
            (HttpMethod::Post, "/api/v1/apps/:app_id/versions"),
            (HttpMethod::Get, "/api/v1/apps/:app_id/versions/:type"),
            (HttpMethod::Put, "/api/v1/apps/:app_id/versions/:type"),
            (HttpMethod::Delete, "/api/v1/apps/:app_id/versions/:type"),
            (HttpMethod::Post, "/jobs/:publish_id/sync"),
        ]
    );
}

#[test]
fn test_full_pipeline() {
    let config = GeneratorConfig::builder().param_types("app_id:u64").build();
    let routes = discover_routes(ROUTERS, &config).unwrap();
    let code = generate_client(&routes, &config).unwrap();

    assert_eq!(
        impl_methods(&code),
        vec![
            ("list_version".to_string(), strings(&["ctx", "appId", "result", "params"])),
            (
                "create_version".to_string(),
                strings(&["ctx", "appId", "body", "result", "params"])
            ),
            (
                "get_version".to_string(),
                strings(&["ctx", "appId", "typ", "result", "params"])
            ),
            (
                "update_version".to_string(),
                strings(&["ctx", "appId", "typ", "body", "result", "params"])
            ),
            (
                "delete_version".to_string(),
                strings(&["ctx", "appId", "typ", "result", "params"])
            ),
            (
                "sync_all".to_string(),
                strings(&["ctx", "publishId", "body", "result", "params"])
            ),
        ]
    );
    assert!(code.contains("appId: u64"));
    assert!(code.contains(r#""{}/api/v1/apps/{}/versions/{}""#));
}

#[test]
fn test_placeholders_match_path_params() {
    let mut routes = extract_routes_from_source(ROUTERS, &Vocabulary::default()).unwrap();
    apply_names(&mut routes);

    for route in &routes {
        let resolved = infer_route(route, &ParamTypeMapping::new());
        assert_eq!(resolved.path.matches("{}").count(), resolved.path_params.len());
        assert!(resolved.path.starts_with('/') && !resolved.path.starts_with("//"));

        let has_body = resolved.params.iter().any(|p| p.name == "body");
        assert_eq!(has_body, route.method.carries_body());
        assert_eq!(resolved.body == BodyExpression::Body, has_body);
    }
}

#[test]
fn test_annotated_source_generates_same_client() {
    let delimited = r#"
pub fn init() {
    let ns = beego::new_namespace(
        "/api",
        [beego::ns_router("/items/:id", &controllers::ItemController {}, "get:get;put:update")],
    );
    beego::add_namespace(ns);
}
"#;
    let structured = r#"
pub fn init() {
    let ns = beego::new_namespace(
        "/api",
        [beego::ns_router(
            "/items/:id",
            &controllers::ItemController {},
            mapping_methods([
                GET(controllers::DefaultItemController::get),
                PUT(controllers::DefaultItemController::update),
            ]),
        )],
    );
    beego::add_namespace(ns);
}
"#;

    let annotated = annotate_source(delimited, &Vocabulary::default(), &AnnotateOptions::default())
        .unwrap();
    let config = GeneratorConfig::default();

    let from_annotated = generate_client(&discover_routes(&annotated, &config).unwrap(), &config);
    let from_structured = generate_client(&discover_routes(structured, &config).unwrap(), &config);
    assert_eq!(from_annotated.unwrap(), from_structured.unwrap());

    // Before annotation nothing is discovered.
    assert!(discover_routes(delimited, &config).unwrap().is_empty());
}

#[test]
fn test_generate_code_is_deterministic() {
    let routes = discover_routes(ROUTERS, &GeneratorConfig::default()).unwrap();
    let first = generate_code("client", "Api", &routes, &ParamTypeMapping::new()).unwrap();
    let second = generate_code("client", "Api", &routes, &ParamTypeMapping::new()).unwrap();
    assert_eq!(first, second);
}
