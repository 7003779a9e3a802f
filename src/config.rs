//! Converter configuration (TOML format)
//!
//! ```toml
//! replaces_json_converters = false
//! pretty = false
//!
//! # optional custom media types, overriding the mode above
//! default_media_type = "application/vnd.acme+json"
//! media_types = ["application/*+json"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::codec::SerdeJsonCodec;
use crate::converter::{CodecConverter, SupportedMediaTypes};
use crate::errors::{ConverterError, Result};

/// Settings for building a [`CodecConverter`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Accept every JSON media type instead of only `application/yagson`
    pub replaces_json_converters: bool,
    /// Custom default media type; takes precedence over the mode flag
    pub default_media_type: Option<String>,
    /// Additional media types, used with `default_media_type`
    pub media_types: Vec<String>,
    /// Indent written JSON
    pub pretty: bool,
}

impl ConverterConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConverterError::Config(format!("Invalid config TOML: {}", e)))?;
        if config.default_media_type.is_none() && !config.media_types.is_empty() {
            return Err(ConverterError::Config(
                "media_types requires default_media_type".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no converter config, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConverterError::Config(format!("Failed to read config: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Build the configured converter
    pub fn build(&self) -> Result<CodecConverter<SerdeJsonCodec>> {
        let codec = if self.pretty {
            SerdeJsonCodec::pretty()
        } else {
            SerdeJsonCodec::new()
        };

        let converter = match &self.default_media_type {
            Some(default) => {
                let supported = SupportedMediaTypes::parse(default, &self.media_types)?;
                CodecConverter::from_parts(supported, codec)
            }
            None => {
                let mut converter = CodecConverter::replacing_json_converters(self.replaces_json_converters);
                converter.set_codec(codec);
                converter
            }
        };
        Ok(converter)
    }
}
