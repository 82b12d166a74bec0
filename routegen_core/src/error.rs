use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutegenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in file {file}: {message}")]
    ParseError { file: PathBuf, message: String },

    #[error("Syn parse error: {0}")]
    SynParse(String),

    #[error("Unexpected registration shape: {message}")]
    Shape { message: String },

    #[error("Unknown HTTP method: {0}")]
    UnknownMethod(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found (searched upward from {search_start})")]
    ConfigNotFound { search_start: PathBuf },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidConfigValue { key: String, value: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Format error: {0}")]
    Format(String),
}

impl From<syn::Error> for RoutegenError {
    fn from(err: syn::Error) -> Self {
        RoutegenError::SynParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RoutegenError>;

impl RoutegenError {
    pub fn parse_error(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        RoutegenError::ParseError {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn shape(message: impl Into<String>) -> Self {
        RoutegenError::Shape {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        RoutegenError::Config(message.into())
    }

    pub fn invalid_config_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        RoutegenError::InvalidConfigValue {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        RoutegenError::Render(message.into())
    }

    pub fn format(message: impl Into<String>) -> Self {
        RoutegenError::Format(message.into())
    }

    /// Attaches a file path to errors raised while processing that file.
    pub fn in_file(self, file: impl Into<PathBuf>) -> Self {
        match self {
            RoutegenError::SynParse(message) => RoutegenError::parse_error(file, message),
            RoutegenError::Shape { message } => RoutegenError::parse_error(file, message),
            RoutegenError::UnknownMethod(method) => {
                RoutegenError::parse_error(file, format!("unknown HTTP method `{method}`"))
            }
            other => other,
        }
    }
}
