//! Generator configuration.
//!
//! Values come from `routegen.toml` (searched upward from the working
//! directory), from the builder, or from CLI overrides applied on top.

use crate::error::{Result, RoutegenError};
use crate::type_mapping::ParamTypeMapping;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "routegen.toml";

/// Names of the registration calls the walker recognizes.
///
/// A call matches when its callee path ends in `<qualifier>::<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub qualifier: String,
    pub root_namespace: String,
    pub sub_namespace: String,
    pub router: String,
    /// Method-mapping combinator, matched on the last path segment only.
    pub combinator: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            qualifier: "beego".to_string(),
            root_namespace: "new_namespace".to_string(),
            sub_namespace: "ns_namespace".to_string(),
            router: "ns_router".to_string(),
            combinator: "mapping_methods".to_string(),
        }
    }
}

/// Settings for the registration annotator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateOptions {
    /// Crate path glob-imported into annotated files.
    pub import_path: String,
    /// Prefix of the default instance a handler is referenced through.
    pub default_prefix: String,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            import_path: "routable".to_string(),
            default_prefix: "Default".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub vocabulary: Vocabulary,

    /// Run the name resolver over discovered handler names.
    pub auto_name: bool,

    /// Name of the generated module.
    pub module_name: String,

    /// Name of the generated client trait.
    pub client_name: String,

    /// Raw parameter type mapping, e.g. `publish_id,app_id:i64;env:String`.
    pub param_types: Option<String>,

    pub annotate: AnnotateOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            auto_name: true,
            module_name: "client".to_string(),
            client_name: "Api".to_string(),
            param_types: None,
            annotate: AnnotateOptions::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `routegen.toml`, searching upward from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `RoutegenError::ConfigNotFound` if no file is found and
    /// `RoutegenError::Toml`/`InvalidConfigValue` if it cannot be parsed.
    pub fn from_toml() -> Result<Self> {
        let start_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_toml_search(&start_dir)
    }

    /// Loads configuration from a specific file.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!("Loading configuration from {:?}", path);

        Self::parse_toml(&content)
    }

    /// Searches for `routegen.toml` starting from the given directory.
    pub fn from_toml_search(start_dir: &Path) -> Result<Self> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::from_toml_path(&config_path);
            }

            if !current.pop() {
                return Err(RoutegenError::ConfigNotFound {
                    search_start: start_dir.to_path_buf(),
                });
            }
        }
    }

    /// Parses TOML content into a config, starting from defaults.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let value: toml::Value = toml::from_str(content)?;

        let mut config = Self::default();

        // [discovery]
        if let Some(discovery) = value.get("discovery").and_then(|v| v.as_table()) {
            let vocabulary = &mut config.vocabulary;
            read_string(discovery, "discovery", "qualifier", &mut vocabulary.qualifier)?;
            read_string(
                discovery,
                "discovery",
                "new_namespace",
                &mut vocabulary.root_namespace,
            )?;
            read_string(
                discovery,
                "discovery",
                "ns_namespace",
                &mut vocabulary.sub_namespace,
            )?;
            read_string(discovery, "discovery", "ns_router", &mut vocabulary.router)?;
            read_string(discovery, "discovery", "combinator", &mut vocabulary.combinator)?;

            if let Some(v) = discovery.get("auto_name") {
                config.auto_name = v.as_bool().ok_or_else(|| {
                    RoutegenError::invalid_config_value("discovery.auto_name", v.to_string())
                })?;
            }
        }

        // [generate]
        if let Some(generate) = value.get("generate").and_then(|v| v.as_table()) {
            read_string(generate, "generate", "module", &mut config.module_name)?;
            read_string(generate, "generate", "client_name", &mut config.client_name)?;

            if generate.contains_key("param_types") {
                let mut types = String::new();
                read_string(generate, "generate", "param_types", &mut types)?;
                config.param_types = Some(types);
            }
        }

        // [annotate]
        if let Some(annotate) = value.get("annotate").and_then(|v| v.as_table()) {
            read_string(
                annotate,
                "annotate",
                "import_path",
                &mut config.annotate.import_path,
            )?;
            read_string(
                annotate,
                "annotate",
                "default_prefix",
                &mut config.annotate.default_prefix,
            )?;
        }

        Ok(config)
    }

    /// Builds the parameter type table. Fails before any generation runs if
    /// the mapping string is malformed.
    pub fn type_mapping(&self) -> Result<ParamTypeMapping> {
        match &self.param_types {
            Some(types) => ParamTypeMapping::parse(types),
            None => Ok(ParamTypeMapping::new()),
        }
    }

    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }
}

fn read_string(
    table: &toml::Table,
    section: &str,
    key: &str,
    target: &mut String,
) -> Result<()> {
    if let Some(v) = table.get(key) {
        let s = v.as_str().ok_or_else(|| {
            RoutegenError::invalid_config_value(format!("{section}.{key}"), v.to_string())
        })?;
        *target = s.to_string();
    }
    Ok(())
}

/// Builder for creating a `GeneratorConfig` programmatically.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
        }
    }

    /// Starts from an existing config, e.g. one loaded from TOML.
    pub fn from_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.config.vocabulary.qualifier = qualifier.into();
        self
    }

    pub fn vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.config.vocabulary = vocabulary;
        self
    }

    pub fn auto_name(mut self, enabled: bool) -> Self {
        self.config.auto_name = enabled;
        self
    }

    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.config.module_name = name.into();
        self
    }

    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.config.client_name = name.into();
        self
    }

    pub fn param_types(mut self, types: impl Into<String>) -> Self {
        self.config.param_types = Some(types.into());
        self
    }

    pub fn import_path(mut self, path: impl Into<String>) -> Self {
        self.config.annotate.import_path = path.into();
        self
    }

    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}
