//! serde_json backed codec

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::JsonCodec;
use crate::errors::CodecError;

/// Default codec: plain `serde_json`, optionally pretty printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerdeJsonCodec {
    pretty: bool,
}

impl SerdeJsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec that indents its output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl JsonCodec for SerdeJsonCodec {
    fn decode<T: DeserializeOwned>(&self, reader: &mut dyn Read) -> Result<T, CodecError> {
        Ok(serde_json::from_reader(reader)?)
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T, writer: &mut dyn Write) -> Result<(), CodecError> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, value)?;
        } else {
            serde_json::to_writer(writer, value)?;
        }
        Ok(())
    }
}
