/// Errors surfaced to callers of the library.
///
/// Malformed model output is never an error: the parsing core degrades to safe
/// defaults. These variants cover caller contract violations and the transport.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no raw text available for evidence file {file_id}")]
    MissingSource { file_id: String },
    #[error("evidence file {name} is virtual and cannot be processed")]
    VirtualFile { name: String },
    #[error("AI service rejected the API key")]
    AuthFailed,
    #[error("AI service error: {status} - {body}")]
    Api { status: u16, body: String },
    #[error("AI service returned no text content")]
    EmptyResponse,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify a non-success response the way the service reports bad keys.
    pub fn from_status(status: u16, body: String) -> Self {
        let lower = body.to_lowercase();
        if status == 401
            || status == 403
            || lower.contains("api_key_invalid")
            || lower.contains("invalid api key")
        {
            Error::AuthFailed
        } else {
            Error::Api { status, body }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_auth() {
        assert!(matches!(Error::from_status(401, String::new()), Error::AuthFailed));
        assert!(matches!(Error::from_status(403, String::new()), Error::AuthFailed));
        assert!(matches!(
            Error::from_status(400, "API_KEY_INVALID: bad key".to_string()),
            Error::AuthFailed
        ));
    }

    #[test]
    fn test_from_status_other() {
        match Error::from_status(500, "boom".to_string()) {
            Error::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
