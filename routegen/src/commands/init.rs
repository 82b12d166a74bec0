//! Init command - writes a starter routegen.toml.

use crate::cli::{Cli, InitArgs};
use routegen_core::config::CONFIG_FILE_NAME;
use routegen_core::error::Result;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub const DEFAULT_CONFIG: &str = r#"# routegen configuration

[discovery]
# Path segment qualifying the registration calls, as in `beego::ns_router`.
qualifier = "beego"
new_namespace = "new_namespace"
ns_namespace = "ns_namespace"
ns_router = "ns_router"
combinator = "mapping_methods"
# Derive client method names such as `GetVersion` from generic handler names.
auto_name = true

[generate]
module = "client"
client_name = "Api"
# Path parameter types: "name,name:type;name:type". Others take any Display value.
# param_types = "id:u64"

[annotate]
import_path = "routable"
default_prefix = "Default"
"#;

/// Runs the init command.
pub fn run(_cli: &Cli, args: InitArgs) -> Result<()> {
    init_in(Path::new("."), args.force)
}

fn init_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        error!("{} already exists. Use --force to overwrite.", CONFIG_FILE_NAME);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)?;
    info!("Created {}", config_path.display());
    Ok(())
}
