//! Route discovery over registration source.
//!
//! A `syn::visit::Visit` walker classifies each call expression with
//! [`pattern::classify`] and drives a [`RouteAccumulator`]. Router calls are
//! consumed whole: the walker never descends into their arguments.

pub mod accumulator;
pub mod pattern;

pub use accumulator::{PendingRouter, RouteAccumulator};
pub use pattern::{Binding, Pattern};

use crate::config::Vocabulary;
use crate::types::Route;
use crate::{Result, RoutegenError};
use syn::visit::{self, Visit};
use syn::{ExprCall, Macro};
use tracing::{debug, info, warn};

/// Walks `file` and returns every registered route in source order.
pub fn extract_routes(file: &syn::File, vocabulary: &Vocabulary) -> Result<Vec<Route>> {
    let mut walker = RouteWalker::new(vocabulary);
    walker.visit_file(file);

    if let Some(err) = walker.error {
        return Err(err);
    }

    let routes = walker.accumulator.finish();
    info!("Discovered {} routes", routes.len());
    Ok(routes)
}

/// Parses `source` and extracts its routes. Parse failures are fatal.
pub fn extract_routes_from_source(source: &str, vocabulary: &Vocabulary) -> Result<Vec<Route>> {
    let file = syn::parse_file(source)?;
    extract_routes(&file, vocabulary)
}

struct RouteWalker<'v> {
    vocabulary: &'v Vocabulary,
    accumulator: RouteAccumulator,
    error: Option<RoutegenError>,
}

impl<'v> RouteWalker<'v> {
    fn new(vocabulary: &'v Vocabulary) -> Self {
        Self {
            vocabulary,
            accumulator: RouteAccumulator::new(),
            error: None,
        }
    }

    fn handle(&mut self, call: &ExprCall, pattern: Pattern) -> Result<()> {
        match pattern {
            Pattern::RootNamespace => {
                let path = pattern::string_literal(&call.args[0], "namespace path")?;
                debug!("Found root namespace {:?}", path);
                self.accumulator.root_namespace(&path);
            }
            Pattern::SubNamespace => {
                let path = pattern::string_literal(&call.args[0], "namespace path")?;
                debug!("Found sub namespace {:?}", path);
                self.accumulator.sub_namespace(&path);
            }
            Pattern::RouteRegistration => {
                let router = self.router(call)?;
                self.accumulator.register(router);
            }
            Pattern::Other => {}
        }
        Ok(())
    }

    fn router(&self, call: &ExprCall) -> Result<PendingRouter> {
        let path = pattern::string_literal(&call.args[0], "router path")?;
        let mut bindings = Vec::new();
        let mut delimited = false;

        for arg in call.args.iter().skip(1) {
            if let Some(combinator) = pattern::as_combinator_call(arg, self.vocabulary) {
                for element in pattern::flatten_args(&combinator.args) {
                    bindings.push(pattern::parse_binding(&element)?);
                }
            } else if pattern::is_string_literal(arg) {
                delimited = true;
            }
        }

        if bindings.is_empty() && delimited {
            warn!(
                "Router {:?} still uses delimited string bindings; run `routegen annotate` first",
                path
            );
        }

        debug!("Found router {:?} with {} bindings", path, bindings.len());
        Ok(PendingRouter { path, bindings })
    }
}

impl<'ast> Visit<'ast> for RouteWalker<'_> {
    fn visit_expr_call(&mut self, call: &'ast ExprCall) {
        if self.error.is_some() {
            return;
        }

        let pattern = pattern::classify(call, self.vocabulary);
        if let Err(err) = self.handle(call, pattern) {
            self.error = Some(err);
            return;
        }

        // The router's arguments were consumed by the match above.
        if pattern == Pattern::RouteRegistration {
            return;
        }

        visit::visit_expr_call(self, call);
    }

    fn visit_macro(&mut self, mac: &'ast Macro) {
        if self.error.is_some() {
            return;
        }

        if let Some(elements) = pattern::vec_macro_elements(mac) {
            for expr in &elements {
                Visit::visit_expr(self, expr);
            }
        }
    }
}
