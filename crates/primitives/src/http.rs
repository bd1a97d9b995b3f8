//! HTTP values exchanged with the transport and consumed by the renderers.

use serde::{ser::SerializeMap, Serialize, Serializer};
use std::{borrow::Cow, fmt, str::FromStr};

/// The synthetic header entry carrying the status line of a response, e.g. `200 OK`.
///
/// Transports must always add it to the headers of the responses they return.
pub const STATUS_LINE_HEADER: &str = "http/1.1";

/// The HTTP verbs supported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
}

impl Verb {
    /// All supported verbs.
    pub const ALL: [Self; 7] =
        [Self::Get, Self::Post, Self::Put, Self::Patch, Self::Delete, Self::Head, Self::Options];

    /// Returns the method name as sent on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Returns true if requests with this verb carry the caller's body.
    pub const fn sends_body(&self) -> bool {
        !matches!(self, Self::Get | Self::Head)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method name that does not map to any [`Verb`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method {0:?}")]
pub struct UnknownVerb(pub String);

impl FromStr for Verb {
    type Err = UnknownVerb;

    /// Parses an upper-case method name. `OPTION` is accepted for [`Verb::Options`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" | "OPTION" => Self::Options,
            _ => return Err(UnknownVerb(s.to_string())),
        })
    }
}

/// An ordered list of header name/value pairs.
///
/// Names are compared case-sensitively and the insertion order is kept, so headers render in the
/// order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList(Vec<(String, String)>);

impl HeaderList {
    /// Returns an empty [`HeaderList`].
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the value of the header with exactly this name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Returns true if a header with exactly this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets a header. An existing header with the same name is overwritten in place, otherwise
    /// the header is appended.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.0.push((name, value)),
        }
    }

    /// Appends a header without checking for an existing entry.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Returns an iterator over the headers in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderList {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for HeaderList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// The body of a response, either as received or already decoded to text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum ResponseBody {
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Decoded text.
    Text(String),
}

impl ResponseBody {
    /// Returns the body as text, decoding bytes lossily.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes),
            Self::Text(text) => Cow::Borrowed(text),
        }
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl Serialize for ResponseBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_text())
    }
}

/// A response returned by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HttpResponse {
    /// The status code. Zero for the empty response returned when no request was issued.
    pub status: u16,
    /// The headers, including the [`STATUS_LINE_HEADER`] entry.
    pub headers: HeaderList,
    /// The body, absent if the response carried none.
    pub body: Option<ResponseBody>,
}

impl HttpResponse {
    /// Returns a new [`HttpResponse`] with the provided status, no headers and no body.
    pub fn new(status: u16) -> Self {
        Self { status, ..Default::default() }
    }

    /// Appends a header to the response.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the body of the response.
    pub fn with_body(mut self, body: impl Into<ResponseBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns the status line carried by the synthetic [`STATUS_LINE_HEADER`] entry.
    pub fn status_line(&self) -> Option<&str> {
        self.headers.get(STATUS_LINE_HEADER)
    }

    /// Returns true for a 2xx status.
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the body as text, empty if there is none.
    pub fn text(&self) -> Cow<'_, str> {
        self.body.as_ref().map(ResponseBody::as_text).unwrap_or_default()
    }

    /// Deserializes the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.text())
    }

    /// Returns a single-line JSON rendering of the whole response, used in error reports.
    pub fn snapshot(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}
