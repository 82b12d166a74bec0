//! Client module rendering.
//!
//! Builds the generated module as a token stream with `quote!`, validates it
//! by parsing it back into a `syn::File` and prints it with `prettyplease`.

use crate::inference::infer_routes;
use crate::type_mapping::ParamTypeMapping;
use crate::types::{ResolvedRoute, Route};
use crate::{Result, RoutegenError};
use convert_case::{Case, Casing};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use std::collections::HashSet;
use syn::{Ident, LitStr, Type};
use tracing::{debug, info, trace};

pub const GENERATED_HEADER: &str = "// Code generated by routegen. DO NOT EDIT.\n\n";

/// Items every generated module defines; the client trait cannot reuse them.
const SUPPORT_ITEM_NAMES: &[&str] = &[
    "CallContext",
    "RequestOptions",
    "ApiError",
    "Error",
    "Envelope",
    "Client",
];

/// Infers parameters for every route and renders the client module.
pub fn generate_code(
    module_name: &str,
    client_name: &str,
    routes: &[Route],
    types: &ParamTypeMapping,
) -> Result<String> {
    let resolved = infer_routes(routes, types);
    render(module_name, client_name, &resolved)
}

/// Renders and formats the client module for already resolved routes.
///
/// # Errors
///
/// `RoutegenError::Render` for duplicate method names and
/// `RoutegenError::Format` when a name or type is not valid Rust.
pub fn render(module_name: &str, client_name: &str, routes: &[ResolvedRoute]) -> Result<String> {
    info!(
        "Rendering module {} with client {} for {} routes",
        module_name,
        client_name,
        routes.len()
    );

    let tokens = render_module(module_name, client_name, routes)?;
    let file = syn::parse2::<syn::File>(tokens)
        .map_err(|e| RoutegenError::format(format!("generated code does not parse: {e}")))?;

    let code = format!("{GENERATED_HEADER}{}", prettyplease::unparse(&file));
    debug!("Generated {} bytes", code.len());
    Ok(code)
}

pub fn render_module(
    module_name: &str,
    client_name: &str,
    routes: &[ResolvedRoute],
) -> Result<TokenStream> {
    let module = ident(module_name)?;
    let client = ident(client_name)?;
    if SUPPORT_ITEM_NAMES.contains(&client_name) {
        return Err(RoutegenError::render(format!(
            "client name `{client_name}` clashes with a generated item"
        )));
    }

    let mut seen = HashSet::new();
    let mut trait_methods = Vec::with_capacity(routes.len());
    let mut impl_methods = Vec::with_capacity(routes.len());

    for route in routes {
        let method_name = route.name.to_case(Case::Snake);
        if !seen.insert(method_name.clone()) {
            return Err(RoutegenError::render(format!(
                "duplicate client method `{}` ({} {})",
                method_name, route.method, route.path_template
            )));
        }
        trace!("Rendering {} {} as {}", route.method, route.path, method_name);

        let (signature, body) = render_method(&method_name, route)?;
        trait_methods.push(quote! { #signature; });
        impl_methods.push(quote! { #signature #body });
    }

    let support = support_items();

    Ok(quote! {
        pub mod #module {
            #![allow(dead_code, non_snake_case)]

            #support

            #[allow(async_fn_in_trait)]
            pub trait #client {
                #(#trait_methods)*
            }

            impl #client for Client {
                #(#impl_methods)*
            }
        }
    })
}

/// Returns the shared signature and the implementation body of one method.
fn render_method(method_name: &str, route: &ResolvedRoute) -> Result<(TokenStream, TokenStream)> {
    let name = ident(method_name)?;

    let mut seen = HashSet::new();
    let mut args = Vec::with_capacity(route.params.len());
    for param in &route.params {
        if !seen.insert(param.name.as_str()) {
            return Err(RoutegenError::render(format!(
                "duplicate parameter `{}` in `{}` ({} {})",
                param.name, method_name, route.method, route.path_template
            )));
        }
        let param_name = ident(&param.name)?;
        let ty = syn::parse_str::<Type>(&param.ty).map_err(|e| {
            RoutegenError::format(format!("invalid type `{}` for `{}`: {e}", param.ty, param.name))
        })?;
        args.push(quote! { #param_name: #ty });
    }

    let path_args = route
        .path_params
        .iter()
        .map(|param| ident(&param.name))
        .collect::<Result<Vec<_>>>()?;

    let doc = format!(" `{} {}`", route.method, route.path_template);
    let signature = quote! {
        #[doc = #doc]
        async fn #name<R: DeserializeOwned>(
            &self,
            ctx: &CallContext,
            #(#args,)*
            result: &mut R,
            params: &[RequestOptions],
        ) -> Result<(), Error>
    };

    let url_format = LitStr::new(&format!("{{}}{}", route.path), Span::call_site());
    let verb = Ident::new(route.method.as_str(), Span::call_site());
    let attach_body = if route.body.is_nil() {
        quote! {}
    } else {
        quote! { let builder = builder.body(encode(&body)?); }
    };

    let body = quote! {
        {
            let url = format!(#url_format, self.endpoint #(, #path_args)*);
            let builder = self.http.request(::reqwest::Method::#verb, url);
            #attach_body
            self.dispatch(ctx, builder, result, params).await
        }
    };

    Ok((signature, body))
}

fn ident(name: &str) -> Result<Ident> {
    syn::parse_str::<Ident>(name)
        .map_err(|_| RoutegenError::format(format!("`{name}` is not a valid Rust identifier")))
}

/// Types and helpers every generated module carries.
fn support_items() -> TokenStream {
    quote! {
        use ::serde::de::DeserializeOwned;
        use ::serde::{Deserialize, Serialize};
        use ::std::collections::BTreeMap;
        use ::std::time::Duration;

        /// Deadline and cancellation for one call.
        #[derive(Debug, Clone, Default)]
        pub struct CallContext {
            pub timeout: Option<Duration>,
            pub cancel: Option<::tokio_util::sync::CancellationToken>,
        }

        /// Extra headers and query parameters for one call.
        #[derive(Debug, Clone, Default)]
        pub struct RequestOptions {
            pub headers: Vec<(String, String)>,
            pub query: Vec<(String, String)>,
        }

        impl RequestOptions {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                self.headers.push((name.into(), value.into()));
                self
            }

            pub fn with_headers<K: Into<String>, V: Into<String>>(
                mut self,
                headers: impl IntoIterator<Item = (K, V)>,
            ) -> Self {
                self.headers
                    .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
                self
            }

            pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
                self.query.push((key.into(), value.into()));
                self
            }

            pub fn with_queries<K: Into<String>, V: Into<String>>(
                mut self,
                queries: impl IntoIterator<Item = (K, V)>,
            ) -> Self {
                self.query
                    .extend(queries.into_iter().map(|(k, v)| (k.into(), v.into())));
                self
            }
        }

        /// Failure reported by the server through a non-zero envelope code.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct ApiError {
            pub code: i64,
            pub message: String,
        }

        impl ::std::fmt::Display for ApiError {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match ::serde_json::to_string(self) {
                    Ok(json) => f.write_str(&json),
                    Err(_) => write!(f, "code {}: {}", self.code, self.message),
                }
            }
        }

        impl ::std::error::Error for ApiError {}

        #[derive(Debug, ::thiserror::Error)]
        pub enum Error {
            #[error(transparent)]
            Api(#[from] ApiError),
            #[error("transport error: {0}")]
            Transport(#[from] ::reqwest::Error),
            #[error("codec error: {0}")]
            Codec(#[from] ::serde_json::Error),
            #[error("call cancelled")]
            Cancelled,
        }

        #[derive(Deserialize)]
        struct Envelope<R> {
            #[serde(default)]
            code: i64,
            #[serde(default)]
            message: String,
            result: Option<R>,
        }

        /// Serializes a request body as one line of JSON.
        pub fn encode(body: &impl Serialize) -> Result<Vec<u8>, Error> {
            let mut bytes = ::serde_json::to_vec(body)?;
            bytes.push(b'\n');
            Ok(bytes)
        }

        #[derive(Debug, Clone)]
        pub struct Client {
            endpoint: String,
            http: ::reqwest::Client,
        }

        impl Client {
            /// Creates a client for `endpoint`. Without an explicit HTTP client a
            /// default one is used.
            pub fn new(endpoint: impl Into<String>, http: Option<::reqwest::Client>) -> Self {
                Self {
                    endpoint: endpoint.into(),
                    http: http.unwrap_or_default(),
                }
            }

            pub fn endpoint(&self) -> &str {
                &self.endpoint
            }

            async fn dispatch<R: DeserializeOwned>(
                &self,
                ctx: &CallContext,
                mut builder: ::reqwest::RequestBuilder,
                result: &mut R,
                params: &[RequestOptions],
            ) -> Result<(), Error> {
                for options in params {
                    for (name, value) in &options.headers {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                }
                if let Some(timeout) = ctx.timeout {
                    builder = builder.timeout(timeout);
                }
                let mut request = builder.build()?;

                let mut query: BTreeMap<String, String> = request
                    .url()
                    .query_pairs()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect();
                let mut query_changed = false;
                for options in params {
                    for (key, value) in &options.query {
                        query.insert(key.clone(), value.clone());
                        query_changed = true;
                    }
                }
                if query_changed {
                    request
                        .url_mut()
                        .query_pairs_mut()
                        .clear()
                        .extend_pairs(query.iter());
                }

                let send = self.http.execute(request);
                let response = match &ctx.cancel {
                    Some(token) => ::tokio::select! {
                        _ = token.cancelled() => return Err(Error::Cancelled),
                        response = send => response?,
                    },
                    None => send.await?,
                };

                let bytes = response.bytes().await?;
                let envelope: Envelope<R> = ::serde_json::from_slice(&bytes)?;
                if envelope.code != 0 {
                    return Err(ApiError {
                        code: envelope.code,
                        message: envelope.message,
                    }
                    .into());
                }
                if let Some(value) = envelope.result {
                    *result = value;
                }
                Ok(())
            }
        }
    }
}
