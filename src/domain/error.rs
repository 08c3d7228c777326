use thiserror::Error;

/// Linescope unified error type
///
/// Session operations never surface this type; they resolve to an
/// [`OpOutcome`](crate::core::event::OpOutcome) at the operation boundary.
/// This covers the CLI, config, and output layers.
#[derive(Error, Debug)]
pub enum LinescopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Output error: {0}")]
    Output(String),
}

pub type LinescopeResult<T> = Result<T, LinescopeError>;
