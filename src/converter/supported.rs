//! The ordered set of media types a converter reads and writes

use std::slice;

use crate::charset::DEFAULT_CHARSET;
use crate::errors::{ConverterError, Result};
use crate::media_type::MediaType;

/// Supported media types, the first being the default
///
/// The default is written as `Content-Type` when nothing else was chosen, so
/// it must be concrete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedMediaTypes {
    types: Vec<MediaType>,
}

impl SupportedMediaTypes {
    /// Build from typed media types, stored exactly as given
    pub fn new(default: MediaType, others: impl IntoIterator<Item = MediaType>) -> Result<Self> {
        if default.is_wildcard_type() || default.is_wildcard_subtype() {
            return Err(ConverterError::configuration(format!(
                "The default MediaType must not contain wildcards: {}",
                default
            )));
        }
        let mut types = vec![default];
        types.extend(others);
        Ok(Self { types })
    }

    /// Built-in sets whose default is known to be concrete
    pub(crate) fn builtin(types: Vec<MediaType>) -> Self {
        debug_assert!(types.first().is_some_and(MediaType::is_concrete));
        Self { types }
    }

    /// Build from media type strings
    ///
    /// Every entry without a `charset` parameter gets [`DEFAULT_CHARSET`].
    pub fn parse<S: AsRef<str>>(default: &str, others: &[S]) -> Result<Self> {
        let default = with_default_charset(MediaType::parse(default)?);
        let others = others
            .iter()
            .map(|s| MediaType::parse(s.as_ref()).map(with_default_charset))
            .collect::<Result<Vec<_>>>()?;
        Self::new(default, others)
    }

    /// The media type used when a response has no explicit content type
    pub fn default_type(&self) -> &MediaType {
        // non-empty by construction
        &self.types[0]
    }

    pub fn as_slice(&self) -> &[MediaType] {
        &self.types
    }

    pub fn iter(&self) -> slice::Iter<'_, MediaType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether a message of `media_type` can be handled
    ///
    /// An absent media type is accepted: the peer asserted nothing, so the
    /// body is handled on a best-effort basis.
    pub fn accepts(&self, media_type: Option<&MediaType>) -> bool {
        match media_type {
            None => true,
            Some(candidate) => self.types.iter().any(|supported| supported.is_compatible_with(candidate)),
        }
    }
}

impl<'a> IntoIterator for &'a SupportedMediaTypes {
    type Item = &'a MediaType;
    type IntoIter = slice::Iter<'a, MediaType>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

fn with_default_charset(media_type: MediaType) -> MediaType {
    if media_type.charset().is_some() {
        media_type
    } else {
        media_type.with_charset_param(DEFAULT_CHARSET)
    }
}
