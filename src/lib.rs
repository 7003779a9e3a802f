//! Media-type aware HTTP message converter for pluggable JSON codecs
//!
//! A [`CodecConverter`] plugs a type-preserving JSON mapper into a host
//! framework's content negotiation: it decides which media types it reads and
//! writes, resolves the body charset from `Content-Type`, and delegates the
//! actual (de)serialization to an injected [`JsonCodec`].
//!
//! # Module Organization
//!
//! - [`converter`] - Converter contracts and the codec-backed converter
//! - [`media_type`] - Media types, wildcard matching, built-in constants
//! - [`charset`] - Charset resolution and transcoding
//! - [`codec`] - The codec seam and its serde_json implementation
//! - [`message`] - Input/output message abstractions
//! - [`config`] - TOML configuration
//! - [`errors`] - Error types (ConverterError, CodecError, Direction, Result)
//!
//! # Example
//!
//! ```
//! use json_converter::{BufferedOutputMessage, CodecConverter, HttpMessageConverter, MediaType};
//!
//! let converter = CodecConverter::replacing_json_converters(true);
//! let vendor: MediaType = "application/vnd.api+json".parse().unwrap();
//! assert!(converter.can_read::<Vec<u32>>(Some(&vendor)));
//!
//! let mut output = BufferedOutputMessage::new();
//! converter.write(&vec![1u32, 2], None, &mut output).unwrap();
//! assert_eq!(output.body_bytes(), b"[1,2]");
//! ```

pub mod charset;
pub mod codec;
pub mod config;
pub mod converter;
pub mod errors;
pub mod media_type;
pub mod message;

pub use charset::{Charset, DEFAULT_CHARSET};
pub use codec::{JsonCodec, SerdeJsonCodec};
pub use config::ConverterConfig;
pub use converter::{CodecConverter, GenericHttpMessageConverter, HttpMessageConverter, SupportedMediaTypes};
pub use errors::{CodecError, ConverterError, Direction, Result};
pub use media_type::MediaType;
pub use message::{BufferedInputMessage, BufferedOutputMessage, HttpInputMessage, HttpOutputMessage};
