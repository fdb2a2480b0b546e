use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("empty input: nothing to convert")]
    EmptyInput,

    #[error("malformed JSON input: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("unrecognized report shape: no `diagnostics` array at the top level")]
    InvalidShape,

    #[error("no input file given and stdin is not piped")]
    NoInput,

    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteOutput {
        path: String,
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
