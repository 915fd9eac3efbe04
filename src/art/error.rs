use thiserror::Error;

/// Why a single art candidate could not be used
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] Box<ureq::Error>),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("empty body")]
    Empty,

    #[error("body larger than {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("not an image: {0}")]
    NotAnImage(String),

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => FetchError::Status(code),
            other => FetchError::Transport(Box::new(other)),
        }
    }
}
