use thiserror::Error;

/// Error type for layered_nn
#[derive(Debug, Error)]
pub enum Error {
    /// A values list does not have one value per neuron of the layer it is fed to.
    #[error("expected {expected} values, got {actual}")]
    DimensionErr { expected: usize, actual: usize },

    /// The network cannot be built or wired as requested.
    #[error("invalid topology: {0}")]
    TopologyErr(String),

    /// A persisted weight list is missing fields or holds something that is not a number.
    #[error("invalid weight format: {0}")]
    FormatErr(String),

    /// Reading or writing a weight file failed.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Error::IoErr(io),
            _ => Error::FormatErr(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
