use std::fmt;

#[derive(Debug)]
pub enum FetchError {
    Request(String),
    Status { status: u16, preview: String },
    NonJsonResponse(String),
    Parse(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::Request(msg) => write!(f, "Request error: {}", msg),
            FetchError::Status { status, preview } => {
                write!(f, "Upstream returned {}: {}", status, preview)
            }
            FetchError::NonJsonResponse(preview) => write!(f, "Non-JSON response: {}", preview),
            FetchError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
