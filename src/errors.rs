use thiserror::Error;

/// Everything that can go wrong while turning one datagram into a
/// store entry. All variants are logged and the datagram dropped;
/// none of them stop the receive loop.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("payload is not valid UTF-8")]
    InvalidEncoding,

    #[error("malformed field token {0:?}")]
    MalformedToken(String),

    #[error("store root is not a JSON object")]
    NotAnObject,

    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
