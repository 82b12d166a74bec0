//! Params command - shows how path parameters will be named and typed.

use crate::cli::{Cli, OutputFormat, ParamsArgs};
use crate::load_config;
use crate::sources::collect_sources;
use routegen_core::error::Result;
use routegen_core::inference::infer_routes;
use routegen_core::types::ResolvedRoute;
use routegen_core::discover_routes;
use std::fs;
use std::io::{self, Write};
use tracing::info;

/// Runs the params command.
pub fn run(cli: &Cli, args: ParamsArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    if args.param_types.is_some() {
        config.param_types = args.param_types.clone();
    }
    let types = config.type_mapping()?;

    let mut resolved = Vec::new();
    for file in collect_sources(&args.input)? {
        let source = fs::read_to_string(&file)?;
        let routes = discover_routes(&source, &config).map_err(|e| e.in_file(&file))?;
        resolved.extend(infer_routes(&routes, &types));
    }
    info!("Resolved {} routes", resolved.len());

    let rendered = match args.format {
        OutputFormat::Plain => plain(&resolved),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&resolved)?),
    };
    io::stdout().write_all(rendered.as_bytes())?;
    Ok(())
}

/// One `METHOD PATH_TEMPLATE ORIGINAL_NAME` line per path parameter.
fn plain(routes: &[ResolvedRoute]) -> String {
    let mut out = String::new();
    for route in routes {
        for param in &route.path_params {
            out.push_str(&format!(
                "{} {} {}\n",
                route.method, route.path_template, param.original_name
            ));
        }
    }
    out
}
