use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RhError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The backing store aborted the operation under concurrent load.
    #[error("Contention: {0}")]
    Contention(String),

    #[error("System error: {0}")]
    SystemError(String),
}

pub type Result<T> = std::result::Result<T, RhError>;

impl RhError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn contention(message: impl Into<String>) -> Self {
        Self::Contention(message.into())
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self::SystemError(message.into())
    }

    pub fn is_contention(&self) -> bool {
        matches!(self, Self::Contention(_))
    }

    /// Only contention is transient; everything else is final for the call.
    pub fn is_retryable(&self) -> bool {
        self.is_contention()
    }
}

impl From<serde_json::Error> for RhError {
    fn from(err: serde_json::Error) -> Self {
        Self::SystemError(format!("JSON error: {err}"))
    }
}

impl From<std::io::Error> for RhError {
    fn from(err: std::io::Error) -> Self {
        Self::SystemError(format!("I/O error: {err}"))
    }
}

impl From<tokio::task::JoinError> for RhError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::SystemError(format!("Background task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_contention_is_retryable() {
        assert!(RhError::contention("aborted").is_retryable());
        assert!(!RhError::system("boom").is_retryable());
        assert!(!RhError::not_found("uac").is_retryable());
        assert!(!RhError::bad_request("type").is_retryable());
    }

    #[test]
    fn test_json_errors_become_system_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(RhError::from(err), RhError::SystemError(_)));
    }
}
