//! Message converter contracts
//!
//! [`HttpMessageConverter`] is the class-based contract a host framework
//! drives during content negotiation. [`GenericHttpMessageConverter`] adds the
//! variants that carry the declaring context of the target type. Both are thin
//! facades: [`CodecConverter`] answers them with one predicate, one read path
//! and one write path.

pub mod codec_converter;
pub mod supported;

use std::any::TypeId;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::Result;
use crate::media_type::MediaType;
use crate::message::{HttpInputMessage, HttpOutputMessage};

pub use codec_converter::CodecConverter;
pub use supported::SupportedMediaTypes;

/// A converter between message bodies and Rust values
pub trait HttpMessageConverter {
    /// Media types this converter handles, the default first
    fn supported_media_types(&self) -> &[MediaType];

    /// Whether values of type `T` are handled at all
    fn supports<T: ?Sized + 'static>(&self) -> bool;

    /// Whether a `T` can be read from a body of `media_type`
    fn can_read<T: ?Sized + 'static>(&self, media_type: Option<&MediaType>) -> bool;

    /// Whether a `T` can be written as `media_type`
    fn can_write<T: ?Sized + 'static>(&self, media_type: Option<&MediaType>) -> bool;

    /// Read a `T` from the input message
    fn read<T: DeserializeOwned + 'static>(&self, input: &mut dyn HttpInputMessage) -> Result<T>;

    /// Write `value` to the output message
    ///
    /// `content_type` is the type chosen by negotiation, if any. It is used
    /// only when the output has no `Content-Type` yet.
    fn write<T: Serialize + ?Sized + 'static>(
        &self,
        value: &T,
        content_type: Option<&MediaType>,
        output: &mut dyn HttpOutputMessage,
    ) -> Result<()>;
}

/// Converter variants aware of the context declaring the target type
pub trait GenericHttpMessageConverter: HttpMessageConverter {
    fn can_read_type<T: ?Sized + 'static>(&self, context: Option<TypeId>, media_type: Option<&MediaType>) -> bool;

    fn can_write_type<T: ?Sized + 'static>(&self, context: Option<TypeId>, media_type: Option<&MediaType>) -> bool;

    fn read_type<T: DeserializeOwned + 'static>(
        &self,
        context: Option<TypeId>,
        input: &mut dyn HttpInputMessage,
    ) -> Result<T>;

    fn write_type<T: Serialize + ?Sized + 'static>(
        &self,
        value: &T,
        content_type: Option<&MediaType>,
        output: &mut dyn HttpOutputMessage,
    ) -> Result<()>;
}
