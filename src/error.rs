use miette::Diagnostic;
use thiserror::Error;

/// Main error type for mapstyle operations.
///
/// These are the fatal conditions. Anything recoverable goes into
/// [`crate::diagnostics::Diagnostics`] instead and translation continues.
#[derive(Error, Diagnostic, Debug)]
pub enum MapstyleError {
    #[error("IO error: {0}")]
    #[diagnostic(code(mapstyle::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(mapstyle::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(mapstyle::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Expression error: {message}")]
    #[diagnostic(code(mapstyle::expression))]
    Expression {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Expected a single layer but found {count}")]
    #[diagnostic(
        code(mapstyle::layer::multiple),
        help("Use read_multi_styles (or `convert --multi`) for Mapfiles with several layers")
    )]
    MultipleLayers { count: usize },

    #[error("No LAYER block found")]
    #[diagnostic(code(mapstyle::layer::missing))]
    NoLayers,

    #[error("Layer '{layer}' has unsupported type '{kind}'")]
    #[diagnostic(
        code(mapstyle::layer::unsupported),
        help("Supported layer types are POINT, LINE, POLYGON, RASTER and ANNOTATION")
    )]
    UnsupportedLayerType { layer: String, kind: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(mapstyle::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Serialization error: {0}")]
    #[diagnostic(code(mapstyle::serialize))]
    Serialize(#[from] serde_json::Error),

    #[error("Check failed: {message}")]
    #[diagnostic(code(mapstyle::check))]
    Check {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, MapstyleError>;
