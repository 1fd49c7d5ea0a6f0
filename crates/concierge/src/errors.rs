use thiserror::Error;

/// Failures talking to the conversational backend, before any stream is read
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Conversation not found")]
    SessionNotFound,

    #[error("Backend responded with status {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}

/// Reasons a stream stopped before producing a usable answer
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Stream transport failed: {0}")]
    Transport(String),

    #[error("Turn timed out")]
    Timeout,

    #[error("Turn was cancelled")]
    Cancelled,
}

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Invalid voice request: {0}")]
    InvalidRequest(String),

    #[error("Voice backend responded with status {0}")]
    Status(u16),

    #[error("Voice backend transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TtsError {
    #[error("Invalid speech request: {0}")]
    InvalidInput(String),

    #[error("Speech provider rejected the credential (status {0})")]
    Unauthorized(u16),

    #[error("Speech provider responded with status {0}")]
    Status(u16),

    #[error("Speech provider transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl TtsError {
    /// Credential rejection is the only failure class that warrants a fallback attempt
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, TtsError::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_messages() {
        assert_eq!(
            BackendError::SessionNotFound.to_string(),
            "Conversation not found"
        );
        assert_eq!(
            BackendError::Status(502).to_string(),
            "Backend responded with status 502"
        );
    }

    #[test]
    fn test_only_unauthorized_is_auth_rejection() {
        assert!(TtsError::Unauthorized(401).is_auth_rejection());
        assert!(TtsError::Unauthorized(403).is_auth_rejection());
        assert!(!TtsError::Status(500).is_auth_rejection());
        assert!(!TtsError::InvalidInput("empty".to_string()).is_auth_rejection());
    }
}
