use thiserror::Error;

/// Why a single title could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    #[error("no detail page found for '{0}'")]
    NotFound(String),

    #[error("malformed page: {0}")]
    MalformedPage(String),

    #[error("page source unavailable: {0}")]
    Unavailable(String),
}

impl AcquireError {
    pub fn kind(&self) -> &'static str {
        match self {
            AcquireError::NotFound(_) => "not_found",
            AcquireError::MalformedPage(_) => "malformed_page",
            AcquireError::Unavailable(_) => "unavailable",
        }
    }
}
