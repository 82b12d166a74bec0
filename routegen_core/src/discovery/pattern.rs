//! Structural recognition of registration calls.
//!
//! Everything that inspects `syn` node kinds lives here; the walker, the
//! accumulator and the annotator only see `Pattern` and plain strings.

use crate::config::Vocabulary;
use crate::types::HttpMethod;
use crate::{Result, RoutegenError};
use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{Expr, ExprCall, Lit, Macro, Member, Path, Token};

/// What a call expression means to route discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    RootNamespace,
    SubNamespace,
    RouteRegistration,
    Other,
}

/// One `VERB(receiver::handler)` entry of a method mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub method: HttpMethod,
    pub receiver: String,
    pub handler: String,
}

/// Classifies a call by callee name and argument count.
///
/// Calls with too few arguments are `Other` and are left to ordinary
/// traversal.
pub fn classify(call: &ExprCall, vocabulary: &Vocabulary) -> Pattern {
    let Some(path) = callee_path(call) else {
        return Pattern::Other;
    };

    let Some(name) = qualified_name(path, &vocabulary.qualifier) else {
        return Pattern::Other;
    };

    let arity = call.args.len();
    if name == vocabulary.root_namespace && arity >= 1 {
        Pattern::RootNamespace
    } else if name == vocabulary.sub_namespace && arity >= 1 {
        Pattern::SubNamespace
    } else if name == vocabulary.router && arity >= 2 {
        Pattern::RouteRegistration
    } else {
        Pattern::Other
    }
}

/// Returns the path of a call whose callee is a plain path expression.
pub fn callee_path(call: &ExprCall) -> Option<&Path> {
    match call.func.as_ref() {
        Expr::Path(expr_path) if expr_path.qself.is_none() => Some(&expr_path.path),
        _ => None,
    }
}

/// For a path ending in `<qualifier>::<name>`, returns `name`.
fn qualified_name(path: &Path, qualifier: &str) -> Option<String> {
    let segments: Vec<_> = path.segments.iter().collect();
    let [.., qualifier_segment, name_segment] = segments.as_slice() else {
        return None;
    };
    if qualifier_segment.ident != qualifier {
        return None;
    }
    Some(name_segment.ident.to_string())
}

/// Whether `expr` is a call to the method-mapping combinator.
pub fn as_combinator_call<'a>(expr: &'a Expr, vocabulary: &Vocabulary) -> Option<&'a ExprCall> {
    let Expr::Call(call) = expr else {
        return None;
    };
    let last = callee_path(call)?.segments.last()?;
    (last.ident == vocabulary.combinator).then_some(call)
}

/// Extracts the value of a string literal argument.
pub fn string_literal(expr: &Expr, what: &str) -> Result<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(s) => Ok(s.value()),
            _ => Err(shape_error(what, "a string literal", expr)),
        },
        Expr::Paren(paren) => string_literal(&paren.expr, what),
        Expr::Group(group) => string_literal(&group.expr, what),
        _ => Err(shape_error(what, "a string literal", expr)),
    }
}

/// Whether `expr` is a string literal, without failing on other kinds.
pub fn is_string_literal(expr: &Expr) -> bool {
    matches!(expr, Expr::Lit(expr_lit) if matches!(expr_lit.lit, Lit::Str(_)))
}

/// Parses the elements of a `vec![a, b, c]` invocation. Other macros, and
/// `vec![x; n]`, yield `None`.
pub fn vec_macro_elements(mac: &Macro) -> Option<Punctuated<Expr, Token![,]>> {
    if !mac.path.is_ident("vec") {
        return None;
    }
    mac.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)
        .ok()
}

/// Flattens array literals, references to arrays and `vec!` bodies into a
/// single argument list.
pub fn flatten_args<'a>(args: impl IntoIterator<Item = &'a Expr>) -> Vec<Expr> {
    let mut flat = Vec::new();
    for arg in args {
        flatten_into(arg, &mut flat);
    }
    flat
}

fn flatten_into(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Array(array) => array.elems.iter().for_each(|e| flatten_into(e, out)),
        Expr::Reference(reference) if matches!(*reference.expr, Expr::Array(_)) => {
            flatten_into(&reference.expr, out)
        }
        Expr::Macro(expr_macro) => match vec_macro_elements(&expr_macro.mac) {
            Some(elements) => elements.iter().for_each(|e| flatten_into(e, out)),
            None => out.push(expr.clone()),
        },
        _ => out.push(expr.clone()),
    }
}

/// Parses `VERB(handler)` into a binding.
pub fn parse_binding(expr: &Expr) -> Result<Binding> {
    let Expr::Call(call) = expr else {
        return Err(shape_error("method binding", "a call like `GET(handler)`", expr));
    };

    let verb = callee_path(call)
        .and_then(Path::get_ident)
        .ok_or_else(|| shape_error("method binding", "a verb identifier callee", expr))?;
    let method = HttpMethod::parse(&verb.to_string())?;

    if call.args.len() != 1 {
        return Err(shape_error(
            "method binding",
            "exactly one handler argument",
            expr,
        ));
    }

    let (receiver, handler) = handler_reference(&call.args[0])?;
    Ok(Binding {
        method,
        receiver,
        handler,
    })
}

/// Splits `module::Receiver::method` or `module::Receiver.method` into
/// `(Receiver, method)`.
pub fn handler_reference(expr: &Expr) -> Result<(String, String)> {
    match expr {
        Expr::Path(expr_path) if expr_path.path.segments.len() >= 2 => {
            let segments = &expr_path.path.segments;
            let receiver = &segments[segments.len() - 2].ident;
            let handler = &segments[segments.len() - 1].ident;
            Ok((receiver.to_string(), handler.to_string()))
        }
        Expr::Field(field) => {
            let (Expr::Path(base), Member::Named(handler)) = (field.base.as_ref(), &field.member)
            else {
                return Err(shape_error("handler reference", "`Receiver.method`", expr));
            };
            let receiver = base
                .path
                .segments
                .last()
                .ok_or_else(|| shape_error("handler reference", "a receiver path", expr))?;
            Ok((receiver.ident.to_string(), handler.to_string()))
        }
        _ => Err(shape_error(
            "handler reference",
            "a path like `controllers::DefaultItemController::list`",
            expr,
        )),
    }
}

/// Extracts the receiver type path from `&module::Type {}` (or `&module::Type`,
/// with or without the reference).
pub fn receiver_type_path(expr: &Expr) -> Result<Path> {
    match expr {
        Expr::Reference(reference) => receiver_type_path(&reference.expr),
        Expr::Struct(expr_struct) if expr_struct.qself.is_none() => Ok(expr_struct.path.clone()),
        Expr::Path(expr_path) if expr_path.qself.is_none() => Ok(expr_path.path.clone()),
        _ => Err(shape_error(
            "router receiver",
            "a controller value like `&controllers::ItemController {}`",
            expr,
        )),
    }
}

pub fn render_tokens(node: &impl ToTokens) -> String {
    node.to_token_stream().to_string()
}

fn shape_error(what: &str, expected: &str, found: &Expr) -> RoutegenError {
    RoutegenError::shape(format!(
        "{what}: expected {expected}, found `{}`",
        render_tokens(found)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn call(expr: Expr) -> ExprCall {
        match expr {
            Expr::Call(call) => call,
            other => panic!("not a call: {}", render_tokens(&other)),
        }
    }

    #[test]
    fn test_classify_patterns() {
        let vocabulary = Vocabulary::default();

        let root = call(parse_quote!(beego::new_namespace("/api")));
        let sub = call(parse_quote!(beego::ns_namespace("/v1", x)));
        let router = call(parse_quote!(crate::beego::ns_router("/items", &Items {})));
        let other = call(parse_quote!(other::ns_router("/items", &Items {})));

        assert_eq!(classify(&root, &vocabulary), Pattern::RootNamespace);
        assert_eq!(classify(&sub, &vocabulary), Pattern::SubNamespace);
        assert_eq!(classify(&router, &vocabulary), Pattern::RouteRegistration);
        assert_eq!(classify(&other, &vocabulary), Pattern::Other);
    }

    #[test]
    fn test_classify_wrong_arity_is_other() {
        let vocabulary = Vocabulary::default();
        let router = call(parse_quote!(beego::ns_router("/items")));
        let namespace = call(parse_quote!(beego::new_namespace()));
        let bare = call(parse_quote!(ns_router("/items", c, m)));

        assert_eq!(classify(&router, &vocabulary), Pattern::Other);
        assert_eq!(classify(&namespace, &vocabulary), Pattern::Other);
        assert_eq!(classify(&bare, &vocabulary), Pattern::Other);
    }

    #[test]
    fn test_string_literal() {
        let lit: Expr = parse_quote!("/items/:id");
        assert_eq!(string_literal(&lit, "path").unwrap(), "/items/:id");

        let not_lit: Expr = parse_quote!(PATH);
        let err = string_literal(&not_lit, "path").unwrap_err();
        assert!(matches!(err, RoutegenError::Shape { .. }));
    }

    #[test]
    fn test_parse_binding_path_and_field_forms() {
        let path: Expr = parse_quote!(GET(controllers::DefaultItemController::list));
        let field: Expr = parse_quote!(POST(controllers::DefaultItemController.create));

        assert_eq!(
            parse_binding(&path).unwrap(),
            Binding {
                method: HttpMethod::Get,
                receiver: "DefaultItemController".to_string(),
                handler: "list".to_string(),
            }
        );
        let binding = parse_binding(&field).unwrap();
        assert_eq!(binding.method, HttpMethod::Post);
        assert_eq!(binding.receiver, "DefaultItemController");
        assert_eq!(binding.handler, "create");
    }

    #[test]
    fn test_parse_binding_unknown_verb() {
        let expr: Expr = parse_quote!(FETCH(controllers::Items::list));
        assert!(matches!(
            parse_binding(&expr),
            Err(RoutegenError::UnknownMethod(ref m)) if m == "FETCH"
        ));
    }

    #[test]
    fn test_parse_binding_shape_errors() {
        let no_args: Expr = parse_quote!(GET());
        let bare_handler: Expr = parse_quote!(GET(list));
        let not_call: Expr = parse_quote!("get:list");

        for expr in [no_args, bare_handler, not_call] {
            assert!(matches!(
                parse_binding(&expr),
                Err(RoutegenError::Shape { .. })
            ));
        }
    }

    #[test]
    fn test_flatten_args() {
        let array: Expr = parse_quote!([a, b]);
        let reference: Expr = parse_quote!(&[c]);
        let vec_macro: Expr = parse_quote!(vec![d, [e]]);
        let plain: Expr = parse_quote!(f);

        let flat = flatten_args([&array, &reference, &vec_macro, &plain]);
        let rendered: Vec<String> = flat.iter().map(render_tokens).collect();
        assert_eq!(rendered, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_receiver_type_path() {
        let expr: Expr = parse_quote!(&controllers::ItemController {});
        let path = receiver_type_path(&expr).unwrap();
        assert_eq!(path.segments.len(), 2);
        assert_eq!(path.segments[1].ident, "ItemController");

        let bad: Expr = parse_quote!(make_controller());
        assert!(receiver_type_path(&bad).is_err());
    }
}
