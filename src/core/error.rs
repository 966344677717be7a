use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input file not found: {path}. Did you mean to supply --input-rootfile?")]
    MissingInput { path: String },

    #[error("Remote file not found: {path}")]
    MissingRemoteFile { path: String },

    #[error("Command failed with exit code {exit_code}: {command}\n{stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::MissingInput { .. } => "MISSING_INPUT",
            Error::MissingRemoteFile { .. } => "MISSING_REMOTE_FILE",
            Error::CommandFailed { .. } => "COMMAND_FAILED",
            Error::Http(_) => "HTTP_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }
    }
}
