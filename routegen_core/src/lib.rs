// Routegen - typed HTTP client generation from route registration source

pub mod annotate;
pub mod config;
pub mod discovery;
pub mod error;
pub mod inference;
pub mod naming;
pub mod pipeline;
pub mod render;
pub mod type_mapping;
pub mod types;

// Re-export commonly used items for convenience
pub use annotate::{AnnotateReport, annotate, annotate_source};
pub use config::{AnnotateOptions, GeneratorConfig, Vocabulary};
pub use discovery::{extract_routes, extract_routes_from_source};
pub use error::{Result, RoutegenError};
pub use inference::infer_route;
pub use naming::{apply_names, resolve_name};
pub use pipeline::{discover_routes, generate_client};
pub use render::{generate_code, render};
pub use type_mapping::ParamTypeMapping;
pub use types::{BodyExpression, HttpMethod, Param, ResolvedRoute, Route};
