//! Config-driven entry points chaining discovery, naming and rendering.

use crate::config::GeneratorConfig;
use crate::discovery::extract_routes_from_source;
use crate::naming::apply_names;
use crate::render::generate_code;
use crate::types::Route;
use crate::Result;
use tracing::debug;

/// Extracts routes from one source file and, if enabled, resolves their
/// client method names.
pub fn discover_routes(source: &str, config: &GeneratorConfig) -> Result<Vec<Route>> {
    let mut routes = extract_routes_from_source(source, &config.vocabulary)?;
    if config.auto_name {
        debug!("Resolving names for {} routes", routes.len());
        apply_names(&mut routes);
    }
    Ok(routes)
}

/// Renders the client for routes gathered from any number of files.
///
/// The type mapping is validated before anything is rendered.
pub fn generate_client(routes: &[Route], config: &GeneratorConfig) -> Result<String> {
    let types = config.type_mapping()?;
    generate_code(&config.module_name, &config.client_name, routes, &types)
}
