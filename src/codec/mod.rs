//! Pluggable JSON codecs
//!
//! The converter never parses or writes JSON itself. It hands a UTF-8
//! character stream to a [`JsonCodec`] and translates whatever the codec
//! reports into converter errors.

pub mod json;

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CodecError;

pub use json::SerdeJsonCodec;

/// A mapper between Rust values and JSON text
///
/// Implementations must be shareable between request threads.
pub trait JsonCodec: Send + Sync {
    /// Decode a `T` from a UTF-8 reader
    fn decode<T: DeserializeOwned>(&self, reader: &mut dyn Read) -> Result<T, CodecError>;

    /// Encode `value` as UTF-8 JSON into `writer`
    fn encode<T: Serialize + ?Sized>(&self, value: &T, writer: &mut dyn Write) -> Result<(), CodecError>;
}
