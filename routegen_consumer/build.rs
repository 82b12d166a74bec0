//! Generates the client module from `routes.rs` into `OUT_DIR`.

use routegen_core::{GeneratorConfig, discover_routes, generate_client};
use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-changed=routes.rs");

    let config = GeneratorConfig::builder()
        .module_name("client")
        .client_name("Api")
        .param_types("id:u64")
        .build();

    let source = fs::read_to_string("routes.rs")?;
    let routes = discover_routes(&source, &config)?;
    let code = generate_client(&routes, &config)?;

    let dest = Path::new(&env::var("OUT_DIR")?).join("client.rs");
    fs::write(dest, code)?;
    Ok(())
}
