//! Maps [`hibp_verifier::Error`] (plus this adapter's own parsing failures)
//! onto HTTP status codes, rather than leaking library errors into bodies.

use http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error(transparent)]
    Engine(#[from] hibp_verifier::Error),

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("not found")]
    NotFound,
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Engine(hibp_verifier::Error::MalformedRequest(_)) => StatusCode::BAD_REQUEST,
            HttpError::Engine(hibp_verifier::Error::InvalidRange { .. }) => StatusCode::BAD_REQUEST,
            HttpError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn body(&self) -> String {
        format!("{self}\n")
    }
}
