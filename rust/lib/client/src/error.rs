/// Client-side API error.
///
/// The backend reports failures three ways: a broken transport, a non-2xx
/// HTTP status, or a well-formed body whose `status` is not `"success"`.
/// Unparseable bodies land in `Decode`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("decode: {0}")]
    Decode(String),

    #[error("upload: {0}")]
    Multipart(String),
}

impl ApiError {
    /// Message suitable for a transient on-screen notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Network error. Check your connection.".into(),
            ApiError::Server { status, .. } => format!("Server error ({status})"),
            ApiError::Rejected(msg) if msg.is_empty() => "Request failed".into(),
            ApiError::Rejected(msg) => msg.clone(),
            ApiError::Decode(_) => "Unexpected response from server".into(),
            ApiError::Multipart(msg) => format!("Could not read image: {msg}"),
        }
    }
}
