//! Annotate command - rewrites delimited method mappings in place.

use crate::cli::{AnnotateArgs, Cli};
use crate::load_config;
use crate::output::write_atomic;
use crate::sources::collect_sources;
use routegen_core::config::GeneratorConfig;
use routegen_core::error::{Result, RoutegenError};
use routegen_core::{AnnotateReport, annotate};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Runs the annotate command and returns the number of files that failed.
///
/// A failing file is reported and skipped; the remaining files are still
/// processed.
pub fn run(cli: &Cli, args: AnnotateArgs) -> Result<usize> {
    let config = load_config(cli)?;
    let files = collect_sources(&args.input)?;
    info!("Annotating {} files", files.len());

    let mut failed = 0;
    let mut changed = 0;
    for file in &files {
        match annotate_file(file, &config, args.overwrite) {
            Ok(report) if report.changed() => changed += 1,
            Ok(_) => debug!("{}: nothing to annotate", file.display()),
            Err(err) => {
                error!("{}", err);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        warn!("{} of {} files could not be annotated", failed, files.len());
    }
    info!("Annotated {} files", changed);
    Ok(failed)
}

fn annotate_file(path: &Path, config: &GeneratorConfig, overwrite: bool) -> Result<AnnotateReport> {
    let source = fs::read_to_string(path)?;
    let mut file = syn::parse_file(&source).map_err(|e| RoutegenError::from(e).in_file(path))?;
    let report =
        annotate(&mut file, &config.vocabulary, &config.annotate).map_err(|e| e.in_file(path))?;
    let annotated = prettyplease::unparse(&file);

    if !overwrite {
        io::stdout().write_all(annotated.as_bytes())?;
    } else if report.changed() {
        write_atomic(path, &annotated)?;
        info!(
            "{}: rewrote {} of {} routers",
            path.display(),
            report.rewritten,
            report.routers
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routers.rs");
        fs::write(
            &path,
            r#"fn init() { beego::ns_router("/x", &c::ItemController {}, "get:list"); }"#,
        )
        .unwrap();

        let report = annotate_file(&path, &GeneratorConfig::default(), true).unwrap();
        assert_eq!(report.rewritten, 1);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("use routable::*;"));
        assert!(written.contains("DefaultItemController::list"));
    }

    #[test]
    fn test_unchanged_file_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.rs");
        let source = "fn main(){let x=1;}";
        fs::write(&path, source).unwrap();

        annotate_file(&path, &GeneratorConfig::default(), true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), source);
    }

    #[test]
    fn test_parse_failure_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.rs");
        fs::write(&path, "fn init( {").unwrap();

        let err = annotate_file(&path, &GeneratorConfig::default(), true).unwrap_err();
        assert!(matches!(err, RoutegenError::ParseError { ref file, .. } if file == &path));
    }
}
