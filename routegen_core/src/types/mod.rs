use crate::{Result, RoutegenError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The HTTP verbs a route can be bound to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Trace,
    Patch,
}

impl HttpMethod {
    /// Parses an exact upper case verb identifier such as `GET`.
    pub fn parse(token: &str) -> Result<Self> {
        HttpMethod::from_str(token).map_err(|_| RoutegenError::UnknownMethod(token.to_string()))
    }

    /// Whether requests with this verb carry a body parameter.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Put | HttpMethod::Post)
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// One HTTP method bound to one path template and one handler, as found in
/// registration source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub method: HttpMethod,
    /// Full path template including the namespace prefix, e.g. `/api/items/:id`.
    pub path_template: String,
    /// Type name of the handler's receiver, e.g. `DefaultItemController`.
    pub receiver: String,
    /// Client method name. Starts as the raw handler identifier.
    pub handler_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    /// Legal Rust identifier used in the generated signature.
    pub name: String,
    /// Path segment text without the marker, used for type lookup.
    pub original_name: String,
    /// Rust type rendered in the generated signature.
    pub ty: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyExpression {
    Body,
    Nil,
}

impl BodyExpression {
    pub fn as_str(self) -> &'static str {
        match self {
            BodyExpression::Body => "body",
            BodyExpression::Nil => "nil",
        }
    }

    pub fn is_nil(self) -> bool {
        self == BodyExpression::Nil
    }
}

impl fmt::Display for BodyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route after parameter inference. Immutable input to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    pub method: HttpMethod,
    pub name: String,
    /// The template as discovered, before placeholder substitution.
    pub path_template: String,
    /// `format!` string with one `{}` per path parameter.
    pub path: String,
    pub path_params: Vec<Param>,
    pub params: Vec<Param>,
    pub body: BodyExpression,
}
