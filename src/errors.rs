//! Error types for the converter

use std::fmt;

use thiserror::Error;

/// Which side of an exchange a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Incoming body being decoded
    Read,
    /// Outgoing body being encoded
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Read => f.write_str("read"),
            Direction::Write => f.write_str("write"),
        }
    }
}

/// Failure reported by a [`JsonCodec`](crate::codec::JsonCodec).
///
/// Never leaves the converter: every codec failure is wrapped into
/// [`ConverterError::MessageNotReadable`] or [`ConverterError::MessageNotWritable`].
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl CodecError {
    /// Create a codec error from an arbitrary message
    pub fn custom(msg: impl Into<String>) -> Self {
        CodecError::Custom(msg.into())
    }
}

/// Main error type for the converter
#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid media type '{value}': {reason}")]
    InvalidMediaType {
        value: String,
        reason: String,
    },

    #[error("Unsupported charset on {direction}: {label}")]
    UnsupportedCharset {
        label: String,
        direction: Direction,
    },

    #[error("{message}")]
    MessageNotReadable {
        message: String,
        #[source]
        source: CodecError,
    },

    #[error("{message}")]
    MessageNotWritable {
        message: String,
        #[source]
        source: CodecError,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        ConverterError::Configuration(msg.into())
    }

    /// Create an invalid media type error
    pub fn invalid_media_type(value: impl Into<String>, reason: impl Into<String>) -> Self {
        ConverterError::InvalidMediaType {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported charset error for a message read or written
    pub fn unsupported_charset(label: impl Into<String>, direction: Direction) -> Self {
        ConverterError::UnsupportedCharset {
            label: label.into(),
            direction,
        }
    }

    /// Wrap a decode failure
    pub fn not_readable(source: CodecError) -> Self {
        ConverterError::MessageNotReadable {
            message: format!("Could not read JSON: {}", source),
            source,
        }
    }

    /// Wrap an encode failure
    pub fn not_writable(source: CodecError) -> Self {
        ConverterError::MessageNotWritable {
            message: format!("Could not write JSON: {}", source),
            source,
        }
    }

    /// Whether the error was caused by the request payload rather than the server
    ///
    /// An unknown charset is only the client's fault when it came with the
    /// body being read.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ConverterError::MessageNotReadable { .. }
                | ConverterError::UnsupportedCharset {
                    direction: Direction::Read,
                    ..
                }
        )
    }
}

pub type Result<T> = std::result::Result<T, ConverterError>;
