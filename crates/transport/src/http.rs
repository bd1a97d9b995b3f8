use crate::{Transport, TransportError};
use harness_primitives::{HeaderList, HttpResponse, ResponseBody, Verb, STATUS_LINE_HEADER};
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;

/// A [`Transport`] backed by a `reqwest` client.
///
/// Absolute URLs are requested as is. Paths are resolved against the base URL, if one was
/// configured with [`HttpTransport::with_base`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    /// The base URL paths are resolved against, without a trailing slash.
    base: Option<String>,
    /// The inner reqwest client.
    inner: Client,
}

impl HttpTransport {
    /// Creates a new [`HttpTransport`] without a base URL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [`HttpTransport`] resolving paths against the provided base url.
    pub fn with_base(mut base: String) -> Self {
        // If base ends with a slash, remove it
        if base.ends_with('/') {
            base.remove(base.len() - 1);
        }
        Self { base: Some(base), inner: Client::new() }
    }

    /// Replaces the inner client with one enforcing the provided request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, TransportError> {
        self.inner = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Returns the base URL, if any.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Returns the URL to request for the provided absolute URL or path.
    fn resolve(&self, url: &str) -> String {
        match &self.base {
            Some(base) if !is_absolute(url) => {
                if url.starts_with('/') {
                    format!("{base}{url}")
                } else {
                    format!("{base}/{url}")
                }
            }
            _ => url.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        verb: Verb,
        url: &str,
        body: Option<&str>,
        headers: &HeaderList,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.resolve(url);
        tracing::debug!(target: "harness::transport", %verb, %url, "sending request");

        let mut request = self.inner.request(method(verb), &url);
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }
        if let Some(body) = body.filter(|_| verb.sends_body()) {
            request = request.body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status();

        let mut headers = HeaderList::new();
        headers.append(STATUS_LINE_HEADER, status_line(status));
        for (name, value) in response.headers() {
            headers.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }

        let body = if verb == Verb::Head {
            None
        } else {
            Some(ResponseBody::Bytes(response.bytes().await?.to_vec()))
        };
        tracing::trace!(target: "harness::transport", %url, status = status.as_u16(), "received response");

        Ok(HttpResponse { status: status.as_u16(), headers, body })
    }
}

/// Returns true if the url carries its own scheme.
fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Maps a [`Verb`] to the reqwest method.
fn method(verb: Verb) -> Method {
    match verb {
        Verb::Get => Method::GET,
        Verb::Post => Method::POST,
        Verb::Put => Method::PUT,
        Verb::Patch => Method::PATCH,
        Verb::Delete => Method::DELETE,
        Verb::Head => Method::HEAD,
        Verb::Options => Method::OPTIONS,
    }
}

/// Returns the status line text for the status, e.g. `200 OK`.
pub(crate) fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}
