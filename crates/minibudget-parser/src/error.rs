//! Error types for minibudget-parser

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Syntax error at {location}: {message}")]
    SyntaxError {
        location: String,
        message: String,
    },

    #[error("Invalid import format: {message}")]
    InvalidFormat { message: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}

/// Result type with ParseError
pub type ParseResult<T> = Result<T, ParseError>;
