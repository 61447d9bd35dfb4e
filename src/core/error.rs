use std::path::PathBuf;
use thiserror::Error;

/// Construction-time failures. Per-keystroke rejections are not errors, see
/// [`crate::controller::EditOutcome`].
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("a mask pattern is required")]
    MissingPattern,

    #[error("pattern \"{pattern}\" does not contain any editable characters")]
    NoEditableCharacters { pattern: String },

    #[error("pattern \"{pattern}\" ends with a raw escape character")]
    TrailingEscape { pattern: String },

    #[error("format character token {token:?} must be exactly one character")]
    InvalidFormatToken { token: String },

    #[error("placeholder {placeholder:?} must be a single printable character")]
    InvalidPlaceholder { placeholder: char },

    #[error("invalid regex {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("pattern has {slots} data slots but the current value needs {required}")]
    PatternTooNarrow { slots: usize, required: usize },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML options: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON options: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
