use fc_core::FcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("formation error: {0}")]
    Formation(#[from] FcError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
