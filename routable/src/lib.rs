//! Structured method bindings for route registration.
//!
//! Registrations name their handlers as typed paths,
//! `mapping_methods([GET(DefaultItemController::list)])`, and this crate turns
//! them back into the delimited form routers take: `"get:list"`.

use std::fmt;

/// One HTTP verb bound to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpMethod {
    verb: &'static str,
    handler: String,
}

impl HttpMethod {
    pub fn new(verb: &'static str, handler: impl Into<String>) -> Self {
        Self {
            verb,
            handler: handler.into(),
        }
    }

    pub fn verb(&self) -> &'static str {
        self.verb
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.verb, self.handler)
    }
}

/// Last path segment of a function item's type name, i.e. the handler name.
fn handler_name<F>() -> String {
    let full = std::any::type_name::<F>();
    // Generic items carry a `<..>` suffix.
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::")
        .next()
        .unwrap_or(base)
        .to_string()
}

macro_rules! verbs {
    ($($name:ident => $verb:literal),* $(,)?) => {
        $(
            #[allow(non_snake_case)]
            #[doc = concat!("Binds `", $verb, "` to `handler`.")]
            pub fn $name<F>(_handler: F) -> HttpMethod {
                HttpMethod::new($verb, handler_name::<F>())
            }
        )*
    };
}

verbs! {
    GET => "get",
    POST => "post",
    PUT => "put",
    DELETE => "delete",
    HEAD => "head",
    OPTIONS => "options",
    TRACE => "trace",
    PATCH => "patch",
}

/// Joins bindings into the `verb:handler;verb:handler` mapping string.
pub fn mapping_methods(bindings: impl IntoIterator<Item = HttpMethod>) -> String {
    bindings
        .into_iter()
        .map(|binding| binding.to_string())
        .collect::<Vec<_>>()
        .join(";")
}
