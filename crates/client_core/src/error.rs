use thiserror::Error;

pub const NO_SOURCE_SELECTED: &str = "Please select a file or enter a URL.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server responded with status {status}")]
    Server { status: u16, message: Option<String> },
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ClientError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Text shown to the user. Transport failures and server errors without a
    /// body use `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        let detail = match self {
            ClientError::Validation(message) => message.as_str(),
            ClientError::Server {
                message: Some(message),
                ..
            } => message.as_str(),
            ClientError::Server { message: None, .. } | ClientError::Transport(_) => fallback,
        };
        format!("Error: {detail}")
    }
}
