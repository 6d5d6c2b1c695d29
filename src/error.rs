use std::io;

/// Everything that can go wrong while talking to the module.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying byte stream failed.
    #[error("stream I/O error")]
    Io(#[from] io::Error),
    /// The deadline elapsed before the expected reply was seen.
    #[error("timed out waiting for the module")]
    Timeout,
    /// The module answered with an explicit failure terminator.
    #[error("module reported failure: {0}")]
    ResponseFailed(String),
    /// A reply arrived but could not be understood.
    #[error("malformed response: {0}")]
    Protocol(String),
}

pub type Result<T> = core::result::Result<T, Error>;
