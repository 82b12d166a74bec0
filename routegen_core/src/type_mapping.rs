//! Parameter name to Rust type table.
//!
//! Built once from a configuration string such as
//! `publish_id,app_id:i64;env:String` and passed by reference into
//! inference. Nothing mutates it after construction.

use crate::{Result, RoutegenError};
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamTypeMapping {
    types: HashMap<String, String>,
}

impl ParamTypeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `name(,name)*:type(;name(,name)*:type)*`.
    ///
    /// Empty `;` entries are skipped. An entry without a `:`, an
    /// empty parameter name, or a type that is not a valid Rust type is a
    /// configuration error.
    pub fn parse(source: &str) -> Result<Self> {
        let mut mapping = Self::new();

        for entry in source.split(';') {
            if entry.trim().is_empty() {
                continue;
            }

            // Types may be paths (`uuid::Uuid`), so only the first `:` separates.
            let Some((names, ty)) = entry.split_once(':') else {
                return Err(RoutegenError::invalid_config_value(
                    "param_types",
                    format!(
                        "{entry} (entries must look like \"publish_id,app_id:i64;env:String\")"
                    ),
                ));
            };

            let ty = ty.trim();
            syn::parse_str::<syn::Type>(ty).map_err(|e| {
                RoutegenError::invalid_config_value("param_types", format!("{ty}: {e}"))
            })?;

            for name in names.split(',') {
                let name = name.trim();
                if name.is_empty() {
                    return Err(RoutegenError::invalid_config_value(
                        "param_types",
                        format!("{entry} (empty parameter name)"),
                    ));
                }
                trace!("Mapping parameter {} to {}", name, ty);
                mapping.insert(name, ty);
            }
        }

        debug!("Parsed {} parameter type mappings", mapping.len());
        Ok(mapping)
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: impl Into<String>) {
        self.types.insert(name.into(), ty.into());
    }

    /// Looks up the configured type for a raw path parameter name.
    pub fn get(&self, original_name: &str) -> Option<&str> {
        self.types.get(original_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
