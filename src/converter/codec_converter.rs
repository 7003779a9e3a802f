//! Converter delegating bodies to a [`JsonCodec`]
//!
//! Two modes are built in:
//!
//! - dedicated (`CodecConverter::new()`): reads and writes only
//!   `application/yagson`, so it can sit next to other JSON converters;
//! - replacing (`CodecConverter::replacing_json_converters(true)`): accepts
//!   every JSON media type and writes `application/json` by default.

use std::any::{type_name, TypeId};
use std::io::{BufWriter, Write};
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::supported::SupportedMediaTypes;
use super::{GenericHttpMessageConverter, HttpMessageConverter};
use crate::charset::{self, DEFAULT_CHARSET};
use crate::codec::{JsonCodec, SerdeJsonCodec};
use crate::errors::{CodecError, ConverterError, Direction, Result};
use crate::media_type::{
    self, MediaType, ALL, APPLICATION_JSON, APPLICATION_JSON_PLUS, APPLICATION_OCTET_STREAM,
    APPLICATION_YAGSON,
};
use crate::message::{HttpInputMessage, HttpOutputMessage};

/// Media-type aware adapter around a shared JSON codec
///
/// The converter is `Sync` whenever the codec is, so one instance serves all
/// request threads. Swapping the codec takes `&mut self` and therefore
/// happens while the converter is being set up, never under traffic.
#[derive(Debug)]
pub struct CodecConverter<C = SerdeJsonCodec> {
    supported: SupportedMediaTypes,
    codec: Arc<C>,
}

impl CodecConverter<SerdeJsonCodec> {
    /// Converter bound to the dedicated `application/yagson` media type
    pub fn new() -> Self {
        Self::replacing_json_converters(false)
    }

    /// With `true`, a converter meant to be the only JSON converter: it
    /// accepts `application/json`, `application/*+json` and
    /// `application/yagson`, and writes `application/json` by default.
    /// With `false`, same as [`CodecConverter::new`].
    pub fn replacing_json_converters(replaces_json_converters: bool) -> Self {
        let supported = if replaces_json_converters {
            SupportedMediaTypes::builtin(vec![
                APPLICATION_JSON.clone(),
                APPLICATION_JSON_PLUS.clone(),
                APPLICATION_YAGSON.clone(),
            ])
        } else {
            SupportedMediaTypes::builtin(vec![APPLICATION_YAGSON.clone()])
        };
        Self::from_parts(supported, SerdeJsonCodec::default())
    }

    /// Converter with custom media types, stored as given
    pub fn with_media_types(default: MediaType, others: impl IntoIterator<Item = MediaType>) -> Result<Self> {
        let supported = SupportedMediaTypes::new(default, others)?;
        Ok(Self::from_parts(supported, SerdeJsonCodec::default()))
    }

    /// Converter with custom media types given as strings
    ///
    /// Entries without a charset get `UTF-8`.
    pub fn parse_media_types<S: AsRef<str>>(default: &str, others: &[S]) -> Result<Self> {
        let supported = SupportedMediaTypes::parse(default, others)?;
        Ok(Self::from_parts(supported, SerdeJsonCodec::default()))
    }
}

impl Default for CodecConverter<SerdeJsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: JsonCodec> CodecConverter<C> {
    pub fn from_parts(supported: SupportedMediaTypes, codec: impl Into<Arc<C>>) -> Self {
        debug!(
            default_type = %supported.default_type(),
            count = supported.len(),
            codec = type_name::<C>(),
            "converter configured"
        );
        Self {
            supported,
            codec: codec.into(),
        }
    }

    /// Same media types, different codec type
    pub fn with_codec<D: JsonCodec>(self, codec: D) -> CodecConverter<D> {
        CodecConverter::from_parts(self.supported, codec)
    }

    pub fn codec(&self) -> &Arc<C> {
        &self.codec
    }

    /// Replace the codec used by subsequent reads and writes
    pub fn set_codec(&mut self, codec: impl Into<Arc<C>>) {
        self.codec = codec.into();
        debug!(codec = type_name::<C>(), "codec replaced");
    }

    pub fn supported(&self) -> &SupportedMediaTypes {
        &self.supported
    }

    /// The media type written when nothing more specific was chosen
    pub fn default_media_type(&self) -> &MediaType {
        self.supported.default_type()
    }

    /// The single read/write predicate
    pub fn accepts(&self, media_type: Option<&MediaType>) -> bool {
        self.supported.accepts(media_type)
    }

    /// Pick the media type to write for an `Accept` header
    ///
    /// An empty list means "anything". Returns `None` when no supported type
    /// is acceptable. Wildcard results such as `*/*` resolve to the default.
    pub fn negotiate(&self, accept: &[MediaType]) -> Option<MediaType> {
        let anything = [ALL.clone()];
        let acceptable = if accept.is_empty() { &anything[..] } else { accept };

        let mut candidates = Vec::new();
        for requested in acceptable.iter().filter(|m| m.quality() > 0.0) {
            for produced in &self.supported {
                if requested.is_compatible_with(produced) {
                    candidates.push(most_specific(requested, produced));
                }
            }
        }
        media_type::sort_by_specificity_and_quality(&mut candidates);

        for candidate in candidates {
            if candidate.is_concrete() {
                return Some(candidate.without_quality());
            }
            if candidate.is_wildcard_type() || candidate.type_() == self.default_media_type().type_() {
                return Some(self.default_media_type().clone());
            }
        }
        None
    }

    /// Populate `Content-Type` on an outbound message that has none
    ///
    /// A concrete `content_type` wins, except `application/octet-stream`;
    /// otherwise the default media type is used. The charset defaults to
    /// `UTF-8`.
    pub fn add_default_headers(&self, headers: &mut HeaderMap, content_type: Option<&MediaType>) -> Result<()> {
        if headers.contains_key(CONTENT_TYPE) {
            return Ok(());
        }
        let chosen = match content_type {
            Some(mt) if mt.is_concrete() && !is_octet_stream(mt) => mt.clone().without_quality(),
            _ => self.default_media_type().clone(),
        };
        let chosen = if chosen.charset().is_some() {
            chosen
        } else {
            chosen.with_charset_param(DEFAULT_CHARSET)
        };

        let rendered = chosen.to_string();
        let value = HeaderValue::from_str(&rendered)
            .map_err(|e| ConverterError::invalid_media_type(rendered.as_str(), e.to_string()))?;
        headers.insert(CONTENT_TYPE, value);
        Ok(())
    }

    /// Decode the body of `input` as a `T`
    pub fn read_with_type<T: DeserializeOwned>(&self, input: &mut dyn HttpInputMessage) -> Result<T> {
        let charset = charset::resolve(input.headers(), Direction::Read)?;
        trace!(target_type = type_name::<T>(), charset = %charset, "reading message body");

        let decoded = if charset.is_utf8() {
            self.codec.decode::<T>(input.body())
        } else {
            let mut raw = Vec::new();
            input.body().read_to_end(&mut raw)?;
            let text = charset.decode(&raw);
            let mut reader = text.as_bytes();
            self.codec.decode::<T>(&mut reader)
        };

        decoded.map_err(|e| {
            warn!(target_type = type_name::<T>(), error = %e, "message body not readable");
            ConverterError::not_readable(e)
        })
    }

    /// Encode `value` into the body of `output`
    pub fn write_with_type<T: Serialize + ?Sized>(
        &self,
        value: &T,
        content_type: Option<&MediaType>,
        output: &mut dyn HttpOutputMessage,
    ) -> Result<()> {
        self.add_default_headers(output.headers_mut(), content_type)?;
        let charset = charset::resolve(output.headers(), Direction::Write)?;
        trace!(target_type = type_name::<T>(), charset = %charset, "writing message body");

        if charset.is_utf8() {
            let mut writer = BufWriter::new(output.body());
            self.codec
                .encode(value, &mut writer)
                .map_err(|e| not_writable::<T>(e))?;
            writer.flush()?;
        } else {
            let mut utf8 = Vec::new();
            self.codec
                .encode(value, &mut utf8)
                .map_err(|e| not_writable::<T>(e))?;
            let text = String::from_utf8(utf8)
                .map_err(|e| not_writable::<T>(CodecError::custom(format!("codec produced invalid UTF-8: {}", e))))?;
            let body = output.body();
            body.write_all(&charset.encode_json(&text))?;
            body.flush()?;
        }
        Ok(())
    }
}

fn not_writable<T: ?Sized>(error: CodecError) -> ConverterError {
    warn!(target_type = type_name::<T>(), error = %error, "message body not writable");
    ConverterError::not_writable(error)
}

fn is_octet_stream(media_type: &MediaType) -> bool {
    media_type.type_() == APPLICATION_OCTET_STREAM.type_()
        && media_type.subtype() == APPLICATION_OCTET_STREAM.subtype()
}

/// The more specific of a requested and a produced type, carrying the
/// requested quality
fn most_specific(requested: &MediaType, produced: &MediaType) -> MediaType {
    if requested.specificity() > produced.specificity() {
        requested.clone()
    } else {
        match requested.parameter("q") {
            Some(q) => produced.clone().with_parameter("q", q),
            None => produced.clone(),
        }
    }
}

impl<C: JsonCodec> HttpMessageConverter for CodecConverter<C> {
    fn supported_media_types(&self) -> &[MediaType] {
        self.supported.as_slice()
    }

    fn supports<T: ?Sized + 'static>(&self) -> bool {
        true
    }

    fn can_read<T: ?Sized + 'static>(&self, media_type: Option<&MediaType>) -> bool {
        self.accepts(media_type)
    }

    fn can_write<T: ?Sized + 'static>(&self, media_type: Option<&MediaType>) -> bool {
        self.accepts(media_type)
    }

    fn read<T: DeserializeOwned + 'static>(&self, input: &mut dyn HttpInputMessage) -> Result<T> {
        self.read_with_type(input)
    }

    fn write<T: Serialize + ?Sized + 'static>(
        &self,
        value: &T,
        content_type: Option<&MediaType>,
        output: &mut dyn HttpOutputMessage,
    ) -> Result<()> {
        self.write_with_type(value, content_type, output)
    }
}

impl<C: JsonCodec> GenericHttpMessageConverter for CodecConverter<C> {
    fn can_read_type<T: ?Sized + 'static>(&self, _context: Option<TypeId>, media_type: Option<&MediaType>) -> bool {
        self.accepts(media_type)
    }

    fn can_write_type<T: ?Sized + 'static>(&self, _context: Option<TypeId>, media_type: Option<&MediaType>) -> bool {
        self.accepts(media_type)
    }

    fn read_type<T: DeserializeOwned + 'static>(
        &self,
        _context: Option<TypeId>,
        input: &mut dyn HttpInputMessage,
    ) -> Result<T> {
        self.read_with_type(input)
    }

    fn write_type<T: Serialize + ?Sized + 'static>(
        &self,
        value: &T,
        content_type: Option<&MediaType>,
        output: &mut dyn HttpOutputMessage,
    ) -> Result<()> {
        self.write_with_type(value, content_type, output)
    }
}
