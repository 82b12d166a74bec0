//! The routegen command-line tool.

pub mod cli;
pub mod commands;
pub mod output;
pub mod sources;

use cli::{Cli, Commands};
use routegen_core::config::GeneratorConfig;
use routegen_core::error::{Result, RoutegenError};
use tracing::{debug, info};

/// Loads the configuration named on the command line, or searches upward for
/// `routegen.toml`. No file at all means defaults.
pub fn load_config(cli: &Cli) -> Result<GeneratorConfig> {
    if let Some(path) = &cli.config {
        info!("Loading configuration from {}", path.display());
        return GeneratorConfig::from_toml_path(path);
    }

    match GeneratorConfig::from_toml() {
        Ok(config) => Ok(config),
        Err(RoutegenError::ConfigNotFound { search_start }) => {
            debug!(
                "No configuration found above {}, using defaults",
                search_start.display()
            );
            Ok(GeneratorConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Dispatches to the selected command. Returns `false` when the command ran
/// but some of its inputs failed.
pub fn run(cli: Cli) -> Result<bool> {
    match cli.command.clone() {
        Commands::Generate(args) => commands::generate::run(&cli, args).map(|_| true),
        Commands::Annotate(args) => commands::annotate::run(&cli, args).map(|failed| failed == 0),
        Commands::Params(args) => commands::params::run(&cli, args).map(|_| true),
        Commands::Init(args) => commands::init::run(&cli, args).map(|_| true),
    }
}
