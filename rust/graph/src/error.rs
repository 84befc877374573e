use thiserror::Error;

/// Result type for store and graph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a model
#[derive(Error, Debug)]
pub enum Error {
    #[error("No instance line with id #{0}")]
    LineNotFound(u32),

    #[error("Expected a reference value at #{id} argument {index}")]
    ExpectedRef { id: u32, index: usize },

    #[error("Expected a list value at #{id} argument {index}")]
    ExpectedList { id: u32, index: usize },

    #[error("Line #{id} carries {found} arguments, expected {expected}")]
    ArgumentCount {
        id: u32,
        expected: usize,
        found: usize,
    },

    #[error("Core parser error: {0}")]
    Core(#[from] stepline_core::Error),
}
