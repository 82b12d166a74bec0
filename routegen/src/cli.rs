//! Command-line interface definitions for routegen.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// routegen - typed HTTP clients from route registration source
#[derive(Parser, Debug)]
#[command(name = "routegen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to routegen.toml configuration file
    #[arg(short, long, global = true, env = "ROUTEGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate a typed client from route registration source
    Generate(GenerateArgs),

    /// Rewrite delimited method mappings into structured bindings
    Annotate(AnnotateArgs),

    /// List the path parameters of every discovered route
    Params(ParamsArgs),

    /// Initialize a new routegen.toml configuration file
    Init(InitArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Registration source files or directories
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name of the generated module (overrides config)
    #[arg(long)]
    pub module: Option<String>,

    /// Name of the generated client trait (overrides config)
    #[arg(long)]
    pub name: Option<String>,

    /// Path parameter types, e.g. "id,item_id:u64;env:String" (overrides config)
    #[arg(long)]
    pub param_types: Option<String>,

    /// Keep raw handler names as client method names
    #[arg(long)]
    pub no_auto_name: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AnnotateArgs {
    /// Registration source files or directories
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Rewrite files in place instead of printing them
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ParamsArgs {
    /// Registration source files or directories
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Path parameter types (overrides config)
    #[arg(long)]
    pub param_types: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `METHOD PATH PARAM` line per path parameter
    Plain,
    /// Resolved routes as JSON
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing routegen.toml
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "routegen",
            "-vv",
            "generate",
            "--input",
            "src/routers",
            "--output",
            "client.rs",
            "--no-auto-name",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.input, vec![PathBuf::from("src/routers")]);
        assert_eq!(args.output, Some(PathBuf::from("client.rs")));
        assert!(args.no_auto_name);
    }

    #[test]
    fn test_parse_params_format() {
        let cli = Cli::try_parse_from(["routegen", "params", "-i", "a.rs", "--format", "json"])
            .unwrap();
        let Commands::Params(args) = cli.command else {
            panic!("expected params");
        };
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["routegen", "annotate"]).is_err());
    }
}
