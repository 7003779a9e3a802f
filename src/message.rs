//! HTTP message abstractions consumed by converters
//!
//! A converter only needs headers and a raw body stream. These traits are
//! implemented for `http::Request`/`http::Response` with blocking bodies and
//! for the in-memory messages below.

use std::io::{Cursor, Read, Write};

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue};

/// An inbound message: request body for servers, response body for clients
pub trait HttpInputMessage {
    fn headers(&self) -> &HeaderMap;

    /// Raw body bytes
    fn body(&mut self) -> &mut dyn Read;
}

/// An outbound message
pub trait HttpOutputMessage {
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Raw body sink
    fn body(&mut self) -> &mut dyn Write;
}

impl<B: Read> HttpInputMessage for http::Request<B> {
    fn headers(&self) -> &HeaderMap {
        http::Request::headers(self)
    }

    fn body(&mut self) -> &mut dyn Read {
        self.body_mut()
    }
}

impl<B: Read> HttpInputMessage for http::Response<B> {
    fn headers(&self) -> &HeaderMap {
        http::Response::headers(self)
    }

    fn body(&mut self) -> &mut dyn Read {
        self.body_mut()
    }
}

impl<B: Write> HttpOutputMessage for http::Request<B> {
    fn headers(&self) -> &HeaderMap {
        http::Request::headers(self)
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        http::Request::headers_mut(self)
    }

    fn body(&mut self) -> &mut dyn Write {
        self.body_mut()
    }
}

impl<B: Write> HttpOutputMessage for http::Response<B> {
    fn headers(&self) -> &HeaderMap {
        http::Response::headers(self)
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        http::Response::headers_mut(self)
    }

    fn body(&mut self) -> &mut dyn Write {
        self.body_mut()
    }
}

/// Input message over an in-memory body
#[derive(Debug, Default)]
pub struct BufferedInputMessage {
    headers: HeaderMap,
    body: Cursor<Vec<u8>>,
}

impl BufferedInputMessage {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            headers: HeaderMap::new(),
            body: Cursor::new(body.into()),
        }
    }

    /// Set a header, replacing any previous value
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set `Content-Type` from a static string
    pub fn with_content_type(self, content_type: &'static str) -> Self {
        self.with_header(CONTENT_TYPE, HeaderValue::from_static(content_type))
    }

    /// Number of body bytes not read yet
    pub fn remaining(&self) -> usize {
        let len = self.body.get_ref().len() as u64;
        len.saturating_sub(self.body.position()) as usize
    }
}

impl HttpInputMessage for BufferedInputMessage {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn body(&mut self) -> &mut dyn Read {
        &mut self.body
    }
}

/// Output message collecting its body in memory
#[derive(Debug, Default)]
pub struct BufferedOutputMessage {
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedOutputMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any previous value
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set `Content-Type` from a static string
    pub fn with_content_type(self, content_type: &'static str) -> Self {
        self.with_header(CONTENT_TYPE, HeaderValue::from_static(content_type))
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Split into headers and body
    pub fn into_parts(self) -> (HeaderMap, Vec<u8>) {
        (self.headers, self.body)
    }
}

impl HttpOutputMessage for BufferedOutputMessage {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn body(&mut self) -> &mut dyn Write {
        &mut self.body
    }
}
