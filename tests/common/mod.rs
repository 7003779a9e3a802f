//! Common test utilities for converter integration tests
//!
//! - tracing setup driven by `RUST_LOG`
//! - fixture payload types
//! - codecs that fail on purpose

#![allow(dead_code)]

use std::io::{Read, Write};
use std::sync::Once;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use json_converter::{CodecError, JsonCodec};

/// Unicode payload exercising non-ASCII transcoding
pub const UNICODE: &str = "ěščřžýáíé こんにちは 🦀";

/// Latin-1 compatible text
pub const LATIN1: &str = "café crème";

static TRACING: Once = Once::new();

/// Install a fmt subscriber once per test binary
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub tags: Vec<String>,
}

impl Person {
    pub fn sample(name: &str) -> Self {
        Self {
            name: name.to_string(),
            age: 42,
            tags: vec!["admin".to_string(), "ops".to_string()],
        }
    }
}

/// Codec failing every call with a fixed message
#[derive(Debug, Clone, Default)]
pub struct FailingCodec {
    pub message: &'static str,
}

impl FailingCodec {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl JsonCodec for FailingCodec {
    fn decode<T: DeserializeOwned>(&self, _reader: &mut dyn Read) -> Result<T, CodecError> {
        Err(CodecError::custom(self.message))
    }

    fn encode<T: Serialize + ?Sized>(&self, _value: &T, _writer: &mut dyn Write) -> Result<(), CodecError> {
        Err(CodecError::custom(self.message))
    }
}

/// Codec that writes a partial body before failing
#[derive(Debug, Clone, Default)]
pub struct TruncatingCodec;

impl JsonCodec for TruncatingCodec {
    fn decode<T: DeserializeOwned>(&self, reader: &mut dyn Read) -> Result<T, CodecError> {
        let mut prefix = [0u8; 1];
        reader.read_exact(&mut prefix)?;
        Err(CodecError::custom("input truncated"))
    }

    fn encode<T: Serialize + ?Sized>(&self, _value: &T, writer: &mut dyn Write) -> Result<(), CodecError> {
        writer.write_all(b"{\"partial\":")?;
        Err(CodecError::custom("value not representable"))
    }
}
