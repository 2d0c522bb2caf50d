use thiserror::Error;

/// Errors that can occur while generating template source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Block '{block_id}' contains more than one stage with id '{stage_id}'")]
    DuplicateStageId { block_id: String, stage_id: String },

    #[error("Failed to write template source: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Errors that can occur while previewing a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("Template backend '{0}' is unavailable")]
    BackendUnavailable(String),

    #[error("Template rendering failed: {0}")]
    Render(#[from] BackendError),
}

/// Errors raised by a template backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("Unbalanced directive: {0}")]
    UnbalancedDirective(String),

    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by structural edits on a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Block '{0}' not found")]
    BlockNotFound(String),

    #[error("Stage '{stage_id}' not found in block '{block_id}'")]
    StageNotFound { block_id: String, stage_id: String },

    #[error("Scheme '{0}' not found")]
    SchemeNotFound(String),

    #[error("Stage order for block '{block_id}' is not a permutation of its stages: {message}")]
    InvalidStageOrder { block_id: String, message: String },

    #[error("Stage '{stage_id}' would contain more than one condition group with id '{group_id}'")]
    DuplicateGroupId { stage_id: String, group_id: String },
}

/// Errors that can occur while reading a variable catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse variable YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Variable YAML must be a mapping at the top level")]
    NotAMapping,
}

/// Errors that can occur when loading sample data.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse sample data JSON: {0}")]
    Json(#[from] serde_json::Error),
}
