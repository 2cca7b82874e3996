use thiserror::Error;

/// Failures of a single generation round trip.
///
/// None of these ever reach a caller of the resolver; they are logged and
/// replaced by a fallback recipe at the resolution boundary.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GenerationError::Malformed(e.to_string())
        } else {
            GenerationError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
