//! MIME media types
//!
//! A [`MediaType`] is an immutable `(type, subtype, parameters)` value with
//! the wildcard matching rules used for HTTP content negotiation.
//! Parsing is delegated to the `mime` crate.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use mime::Mime;
use once_cell::sync::Lazy;

use crate::charset::DEFAULT_CHARSET;
use crate::errors::{ConverterError, Result};

const WILDCARD: &str = "*";
const PARAM_CHARSET: &str = "charset";
const PARAM_QUALITY: &str = "q";

/// `application/yagson;charset=UTF-8`, the dedicated media type
pub static APPLICATION_YAGSON: Lazy<MediaType> =
    Lazy::new(|| MediaType::with_charset("application", "yagson", DEFAULT_CHARSET));

/// `application/json;charset=UTF-8`
pub static APPLICATION_JSON: Lazy<MediaType> =
    Lazy::new(|| MediaType::with_charset("application", "json", DEFAULT_CHARSET));

/// `application/*+json;charset=UTF-8`, any JSON-based vendor type
pub static APPLICATION_JSON_PLUS: Lazy<MediaType> =
    Lazy::new(|| MediaType::with_charset("application", "*+json", DEFAULT_CHARSET));

/// `application/octet-stream`
pub static APPLICATION_OCTET_STREAM: Lazy<MediaType> =
    Lazy::new(|| MediaType::new("application", "octet-stream"));

/// `*/*`
pub static ALL: Lazy<MediaType> = Lazy::new(|| MediaType::new(WILDCARD, WILDCARD));

/// A media type such as `application/json;charset=UTF-8`
#[derive(Debug, Clone)]
pub struct MediaType {
    type_: String,
    subtype: String,
    parameters: IndexMap<String, String>,
}

impl MediaType {
    /// Create a media type without parameters. Type and subtype are lowercased.
    pub fn new(type_: &str, subtype: &str) -> Self {
        Self {
            type_: type_.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            parameters: IndexMap::new(),
        }
    }

    /// Create a media type carrying a `charset` parameter
    pub fn with_charset(type_: &str, subtype: &str, charset: &str) -> Self {
        Self::new(type_, subtype).with_parameter(PARAM_CHARSET, charset)
    }

    /// Copy of this media type with `name` set to `value`
    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Copy of this media type with its charset replaced
    pub fn with_charset_param(self, charset: &str) -> Self {
        self.with_parameter(PARAM_CHARSET, charset)
    }

    /// Copy of this media type without the `q` parameter
    pub fn without_quality(mut self) -> Self {
        self.parameters.shift_remove(PARAM_QUALITY);
        self
    }

    /// Parse a single media type such as `application/json; charset=utf-8`
    ///
    /// A lone `*` is accepted as `*/*`.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConverterError::invalid_media_type(value, "media type must not be empty"));
        }
        let source = if trimmed == WILDCARD { "*/*" } else { trimmed };

        let mime: Mime = source
            .parse()
            .map_err(|e: mime::FromStrError| ConverterError::invalid_media_type(value, e.to_string()))?;

        let mut media_type = Self::new(mime.type_().as_str(), mime.subtype().as_str());
        if let Some(suffix) = mime.suffix() {
            media_type.subtype = format!("{}+{}", media_type.subtype, suffix.as_str().to_ascii_lowercase());
        }
        if media_type.type_ == WILDCARD && media_type.subtype != WILDCARD {
            return Err(ConverterError::invalid_media_type(
                value,
                "wildcard type is legal only in '*/*'",
            ));
        }
        // `mime` validates the syntax but folds some values (charset) to
        // lowercase, so names and values are taken from the source text
        for (name, param) in raw_parameters(source) {
            media_type = media_type.with_parameter(name, &param);
        }
        Ok(media_type)
    }

    /// Parse a comma separated list, as found in `Accept` headers
    pub fn parse_list(value: &str) -> Result<Vec<Self>> {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::parse)
            .collect()
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Structured syntax suffix, e.g. `json` for `application/vnd.api+json`
    pub fn suffix(&self) -> Option<&str> {
        self.subtype.rsplit_once('+').map(|(_, suffix)| suffix)
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `charset` parameter as written
    pub fn charset(&self) -> Option<&str> {
        self.parameter(PARAM_CHARSET)
    }

    /// The `q` parameter, defaulting to 1.0
    pub fn quality(&self) -> f32 {
        self.parameter(PARAM_QUALITY)
            .and_then(|q| q.trim().parse::<f32>().ok())
            .map(|q| q.clamp(0.0, 1.0))
            .unwrap_or(1.0)
    }

    pub fn is_wildcard_type(&self) -> bool {
        self.type_ == WILDCARD
    }

    /// `*` or `*+suffix`
    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == WILDCARD || self.subtype.starts_with("*+")
    }

    /// Neither type nor subtype is a wildcard
    pub fn is_concrete(&self) -> bool {
        !self.is_wildcard_type() && !self.is_wildcard_subtype()
    }

    /// Rank used when sorting negotiation candidates: `*/*` < `type/*` <
    /// `type/*+suffix` < `type/subtype`
    pub fn specificity(&self) -> u8 {
        if self.is_wildcard_type() {
            0
        } else if self.subtype == WILDCARD {
            1
        } else if self.is_wildcard_subtype() {
            2
        } else {
            3
        }
    }

    /// Whether this media type includes `other`
    ///
    /// Inclusion is directional: `text/*` includes `text/plain` but not the
    /// other way round.
    pub fn includes(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() {
            return true;
        }
        if self.type_ != other.type_ {
            return false;
        }
        if self.subtype == other.subtype {
            return true;
        }
        if !self.is_wildcard_subtype() {
            return false;
        }
        match self.suffix() {
            None => true,
            Some(this_suffix) => {
                other.subtype == this_suffix || other.suffix() == Some(this_suffix)
            }
        }
    }

    /// Whether this media type is compatible with `other`
    ///
    /// Unlike [`includes`](Self::includes) the relation is symmetric:
    /// `application/*+json` and `application/vnd.api+json` are compatible in
    /// both directions.
    pub fn is_compatible_with(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() || other.is_wildcard_type() {
            return true;
        }
        if self.type_ != other.type_ {
            return false;
        }
        if self.subtype == other.subtype {
            return true;
        }
        if !self.is_wildcard_subtype() && !other.is_wildcard_subtype() {
            return false;
        }
        if self.subtype == WILDCARD || other.subtype == WILDCARD {
            return true;
        }
        let this_suffix = self.suffix();
        let other_suffix = other.suffix();
        if self.is_wildcard_subtype() {
            if let Some(suffix) = this_suffix {
                return other.subtype == suffix || other_suffix == Some(suffix);
            }
        }
        if other.is_wildcard_subtype() {
            if let Some(suffix) = other_suffix {
                return self.subtype == suffix || this_suffix == Some(suffix);
            }
        }
        false
    }
}

/// Sort negotiation candidates: highest quality first, then most specific
pub fn sort_by_specificity_and_quality(media_types: &mut [MediaType]) {
    media_types.sort_by(|a, b| {
        b.quality()
            .partial_cmp(&a.quality())
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.specificity().cmp(&a.specificity()))
            .then_with(|| b.parameters.len().cmp(&a.parameters.len()))
    });
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.type_ == other.type_
            && self.subtype == other.subtype
            && self.parameters.len() == other.parameters.len()
            && self.parameters.iter().all(|(name, value)| {
                other.parameters.get(name).is_some_and(|theirs| {
                    if name == PARAM_CHARSET {
                        theirs.eq_ignore_ascii_case(value)
                    } else {
                        theirs == value
                    }
                })
            })
    }
}

impl Eq for MediaType {}

impl FromStr for MediaType {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.parameters {
            let needs_quotes = value.is_empty()
                || value
                    .chars()
                    .any(|c| c.is_ascii_whitespace() || "()<>@,;:\\\"/[]?={}".contains(c));
            if needs_quotes {
                write!(f, ";{}=\"{}\"", name, value.replace('"', "\\\""))?;
            } else {
                write!(f, ";{}={}", name, value)?;
            }
        }
        Ok(())
    }
}

/// Split the `;name=value` parameters off an already validated media type,
/// unquoting quoted-string values
fn raw_parameters(source: &str) -> Vec<(&str, String)> {
    let Some((_, mut rest)) = source.split_once(';') else {
        return Vec::new();
    };
    let mut params = Vec::new();
    loop {
        rest = rest.trim_start_matches(|c: char| c == ';' || c.is_ascii_whitespace());
        let Some((name, after)) = rest.split_once('=') else {
            break;
        };
        let name = name.trim();
        let after = after.trim_start();
        let (value, remainder) = match after.strip_prefix('"') {
            Some(quoted) => {
                let mut value = String::new();
                let mut chars = quoted.char_indices();
                let mut end = quoted.len();
                while let Some((i, c)) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some((_, escaped)) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        '"' => {
                            end = i + 1;
                            break;
                        }
                        _ => value.push(c),
                    }
                }
                (value, &quoted[end..])
            }
            None => {
                let end = after.find(';').unwrap_or(after.len());
                (after[..end].trim_end().to_string(), &after[end..])
            }
        };
        if !name.is_empty() {
            params.push((name, value));
        }
        rest = remainder;
    }
    params
}
