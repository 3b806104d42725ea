//! Error types for barrage

use thiserror::Error;

/// Core barrage errors
///
/// All four kinds are permanent for the given input: there is no retry
/// logic anywhere in the core, failures surface to the boundary as-is.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrageError {
    #[error("not authorized")]
    NotAuthorized,

    #[error("not exist")]
    NotExist,

    #[error("ill format")]
    IllFormat,

    #[error("already exist")]
    AlreadyExist,
}

/// Result type for barrage operations
pub type BarrageResult<T> = Result<T, BarrageError>;
