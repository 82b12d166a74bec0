//! Input file discovery.

use routegen_core::{Result, RoutegenError};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Expands the given files and directories into `.rs` files.
///
/// Files are kept in argument order; directory contents are walked
/// recursively in file name order.
pub fn collect_sources(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let before = files.len();
            files.extend(
                WalkDir::new(input)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.into_path())
                    .filter(|path| is_rust_source(path)),
            );
            debug!(
                "Found {} source files under {}",
                files.len() - before,
                input.display()
            );
        } else if input.is_file() {
            trace!("Adding {}", input.display());
            files.push(input.clone());
        } else {
            return Err(RoutegenError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("input {} does not exist", input.display()),
            )));
        }
    }

    Ok(files)
}

fn is_rust_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "rs")
}
