use std::path::PathBuf;
use thiserror::Error;

// Errors raised by every remote client
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("HTTP error: {status_code} - {message}")]
    HttpStatus { status_code: u16, message: String },

    // Store API envelope reported a non-2xx code
    #[error("Status code not OK: {code} {message} ({description})")]
    MetaStatus {
        code: i64,
        message: String,
        description: String,
    },

    // Session ajax payload carried a non-zero returnCode
    #[error("Return code {code} {message}")]
    ReturnCode { code: i64, message: String },

    #[error("Error logging in: {0}")]
    LoginFailed(String),

    #[error("JSON parse error in {tag}: {message}")]
    JsonParseError { tag: String, message: String },

    #[error("XML parse error: {0}")]
    XmlParseError(String),

    #[error("Request signing error: {0}")]
    SigningError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::NetworkError(_) | ApiError::Timeout(_) => true,
            ApiError::HttpStatus { status_code, .. } => *status_code >= 500 || *status_code == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return ApiError::HttpStatus {
                status_code: status.as_u16(),
                message: e.to_string(),
            };
        }
        ApiError::NetworkError(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("Cannot read credentials file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse credentials file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Credentials have no `{0}` section")]
    MissingSection(&'static str),

    #[error("{}", .0.join("\n"))]
    Invalid(Vec<String>),
}
