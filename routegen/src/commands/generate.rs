//! Generate command - discovers routes and renders the client module.

use crate::cli::{Cli, GenerateArgs};
use crate::output::write_atomic;
use crate::sources::collect_sources;
use crate::load_config;
use routegen_core::config::{GeneratorConfig, GeneratorConfigBuilder};
use routegen_core::error::Result;
use routegen_core::{discover_routes, generate_client};
use std::fs;
use std::io::{self, Write};
use tracing::{debug, info};

/// Runs the generate command.
pub fn run(cli: &Cli, args: GenerateArgs) -> Result<()> {
    info!("Starting client generation");

    let config = apply_overrides(load_config(cli)?, &args);
    // Fail on a malformed mapping before touching any input.
    let types = config.type_mapping()?;
    debug!("Loaded {} parameter type mappings", types.len());

    let files = collect_sources(&args.input)?;
    let mut routes = Vec::new();
    for file in &files {
        let source = fs::read_to_string(file)?;
        let found = discover_routes(&source, &config).map_err(|e| e.in_file(file))?;
        debug!("{}: {} routes", file.display(), found.len());
        routes.extend(found);
    }
    info!("Discovered {} routes in {} files", routes.len(), files.len());

    let code = generate_client(&routes, &config)?;

    match &args.output {
        Some(path) => {
            write_atomic(path, &code)?;
            info!("Wrote client to {}", path.display());
        }
        None => io::stdout().write_all(code.as_bytes())?,
    }

    Ok(())
}

fn apply_overrides(config: GeneratorConfig, args: &GenerateArgs) -> GeneratorConfig {
    let mut builder = GeneratorConfigBuilder::from_config(config);
    if let Some(module) = &args.module {
        builder = builder.module_name(module);
    }
    if let Some(name) = &args.name {
        builder = builder.client_name(name);
    }
    if let Some(types) = &args.param_types {
        builder = builder.param_types(types);
    }
    if args.no_auto_name {
        builder = builder.auto_name(false);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_config() {
        let config = GeneratorConfig::builder()
            .module_name("from_file")
            .param_types("id:u8")
            .build();
        let args = GenerateArgs {
            input: vec![PathBuf::from("routers.rs")],
            output: None,
            module: Some("from_flag".to_string()),
            name: None,
            param_types: None,
            no_auto_name: true,
        };

        let merged = apply_overrides(config, &args);
        assert_eq!(merged.module_name, "from_flag");
        assert_eq!(merged.client_name, "Api");
        assert_eq!(merged.param_types.as_deref(), Some("id:u8"));
        assert!(!merged.auto_name);
    }
}
