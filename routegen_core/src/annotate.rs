//! Rewrites delimited method mappings into structured bindings.
//!
//! `beego::ns_router("/x", &c::ItemController {}, "get:list;post:create")`
//! becomes
//! `beego::ns_router("/x", &c::ItemController {}, mapping_methods([GET(c::DefaultItemController::list), POST(c::DefaultItemController::create)]))`
//! and the file gains a glob import of the combinator crate.

use crate::config::{AnnotateOptions, Vocabulary};
use crate::discovery::pattern::{self, Pattern};
use crate::types::HttpMethod;
use crate::{Result, RoutegenError};
use proc_macro2::Span;
use quote::{ToTokens, quote};
use syn::visit_mut::{self, VisitMut};
use syn::{Expr, ExprCall, File, Ident, Item, Macro, Path, PathArguments, UseTree};
use tracing::{debug, info, trace};

/// What one annotation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotateReport {
    /// Router registrations seen, annotated or not.
    pub routers: usize,
    /// Registrations whose delimited mapping was replaced.
    pub rewritten: usize,
    pub import_added: bool,
}

impl AnnotateReport {
    pub fn changed(&self) -> bool {
        self.rewritten > 0 || self.import_added
    }
}

/// Annotates `file` in place.
pub fn annotate(
    file: &mut File,
    vocabulary: &Vocabulary,
    options: &AnnotateOptions,
) -> Result<AnnotateReport> {
    let combinator = syn::parse_str::<Ident>(&vocabulary.combinator)
        .map_err(|_| RoutegenError::invalid_config_value("discovery.combinator", &vocabulary.combinator))?;

    let mut annotator = Annotator {
        vocabulary,
        options,
        combinator,
        routers: 0,
        rewritten: 0,
        error: None,
    };
    annotator.visit_file_mut(file);

    if let Some(err) = annotator.error {
        return Err(err);
    }

    let mut report = AnnotateReport {
        routers: annotator.routers,
        rewritten: annotator.rewritten,
        import_added: false,
    };
    if report.routers > 0 {
        report.import_added = ensure_glob_import(file, &options.import_path)?;
    }

    info!(
        "Annotated {} of {} routers (import added: {})",
        report.rewritten, report.routers, report.import_added
    );
    Ok(report)
}

/// Parses, annotates and re-prints `source`.
pub fn annotate_source(
    source: &str,
    vocabulary: &Vocabulary,
    options: &AnnotateOptions,
) -> Result<String> {
    let mut file = syn::parse_file(source)?;
    annotate(&mut file, vocabulary, options)?;
    Ok(prettyplease::unparse(&file))
}

struct Annotator<'a> {
    vocabulary: &'a Vocabulary,
    options: &'a AnnotateOptions,
    combinator: Ident,
    routers: usize,
    rewritten: usize,
    error: Option<RoutegenError>,
}

impl Annotator<'_> {
    fn rewrite(&self, call: &ExprCall) -> Result<Expr> {
        let receiver = pattern::receiver_type_path(&call.args[1])?;
        let mapping = pattern::string_literal(&call.args[2], "method mapping")?;
        let instance = default_instance_path(&receiver, &self.options.default_prefix)?;

        let mut bindings = Vec::new();
        for entry in mapping.split(';').filter(|entry| !entry.trim().is_empty()) {
            let fields: Vec<&str> = entry.split(':').collect();
            let [verb, handler] = fields.as_slice() else {
                return Err(RoutegenError::shape(format!(
                    "method mapping entry `{entry}`: expected `verb:handler`"
                )));
            };

            let method = HttpMethod::parse(&verb.trim().to_uppercase())?;
            let handler = syn::parse_str::<Ident>(handler.trim()).map_err(|_| {
                RoutegenError::shape(format!(
                    "method mapping entry `{entry}`: `{}` is not a handler name",
                    handler.trim()
                ))
            })?;
            trace!("Binding {} to {}", method, handler);

            let verb = Ident::new(method.as_str(), Span::call_site());
            bindings.push(quote! { #verb(#instance::#handler) });
        }

        let combinator = &self.combinator;
        Ok(syn::parse2(quote! { #combinator([#(#bindings),*]) })?)
    }
}

impl VisitMut for Annotator<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if self.error.is_some() {
            return;
        }

        if let Expr::Call(call) = expr
            && pattern::classify(call, self.vocabulary) == Pattern::RouteRegistration
        {
            self.routers += 1;
            if call.args.len() >= 3 && pattern::is_string_literal(&call.args[2]) {
                match self.rewrite(call) {
                    Ok(mapping) => {
                        debug!("Rewrote router {}", pattern::render_tokens(&call.args[0]));
                        call.args[2] = mapping;
                        self.rewritten += 1;
                    }
                    Err(err) => self.error = Some(err),
                }
            }
            return;
        }

        visit_mut::visit_expr_mut(self, expr);
    }

    fn visit_macro_mut(&mut self, mac: &mut Macro) {
        if self.error.is_some() {
            return;
        }

        let Some(mut elements) = pattern::vec_macro_elements(mac) else {
            return;
        };

        let before = (self.routers, self.rewritten);
        for expr in elements.iter_mut() {
            self.visit_expr_mut(expr);
        }
        if (self.routers, self.rewritten) != before {
            mac.tokens = elements.to_token_stream();
        }
    }
}

/// `controllers::ItemController` -> `controllers::DefaultItemController`.
fn default_instance_path(receiver: &Path, prefix: &str) -> Result<Path> {
    let mut path = receiver.clone();
    let last = path
        .segments
        .last_mut()
        .ok_or_else(|| RoutegenError::shape("router receiver has an empty path"))?;
    let name = format!("{prefix}{}", last.ident);
    last.ident = syn::parse_str::<Ident>(&name)
        .map_err(|_| RoutegenError::invalid_config_value("annotate.default_prefix", prefix))?;
    last.arguments = PathArguments::None;
    Ok(path)
}

/// Adds `use <import_path>::*;` after the last top-level `use` unless the file
/// already glob-imports exactly that path.
fn ensure_glob_import(file: &mut File, import_path: &str) -> Result<bool> {
    let path = syn::parse_str::<Path>(import_path)
        .map_err(|_| RoutegenError::invalid_config_value("annotate.import_path", import_path))?;

    let wanted: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    let already_imported = file.items.iter().any(|item| match item {
        Item::Use(item_use) => {
            item_use.leading_colon.is_some() == path.leading_colon.is_some()
                && imports_glob(&item_use.tree, &mut Vec::new(), &wanted)
        }
        _ => false,
    });
    if already_imported {
        return Ok(false);
    }

    let item: Item = syn::parse2(quote! { use #path::*; })?;
    let position = file
        .items
        .iter()
        .rposition(|item| matches!(item, Item::Use(_)))
        .map_or(0, |index| index + 1);
    file.items.insert(position, item);
    debug!("Added `use {}::*;`", import_path);
    Ok(true)
}

fn imports_glob(tree: &UseTree, prefix: &mut Vec<String>, wanted: &[String]) -> bool {
    match tree {
        UseTree::Path(use_path) => {
            prefix.push(use_path.ident.to_string());
            let found = imports_glob(&use_path.tree, prefix, wanted);
            prefix.pop();
            found
        }
        UseTree::Group(group) => group
            .items
            .iter()
            .any(|tree| imports_glob(tree, prefix, wanted)),
        UseTree::Glob(_) => prefix.as_slice() == wanted,
        UseTree::Name(_) | UseTree::Rename(_) => false,
    }
}
