use crate::{http::status_line, Transport, TransportError};
use harness_primitives::{HeaderList, HttpResponse, Verb, STATUS_LINE_HEADER};
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};

/// Returns a response with the provided status and text body, carrying the status line header.
pub fn response(status: u16, body: &str) -> HttpResponse {
    let line = StatusCode::from_u16(status)
        .map(status_line)
        .unwrap_or_else(|_| status.to_string());
    HttpResponse::new(status).with_header(STATUS_LINE_HEADER, line).with_body(body)
}

/// A request observed by the [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// The verb of the request.
    pub verb: Verb,
    /// The requested URL, as passed by the caller.
    pub url: String,
    /// The body of the request.
    pub body: Option<String>,
    /// The headers of the request.
    pub headers: HeaderList,
}

/// A mock implementation of the [`Transport`] trait.
///
/// Every request is recorded. URLs registered with [`MockTransport::with_error`] fail with a
/// [`TransportError`]. Responses are looked up by verb and URL first, then by URL alone, and fall
/// back to the default response (`200 OK` with an empty body).
#[derive(Debug)]
pub struct MockTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    by_verb: HashMap<(Verb, String), HttpResponse>,
    by_url: HashMap<String, HttpResponse>,
    failing: HashSet<String>,
    default: HttpResponse,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            requests: Mutex::default(),
            by_verb: HashMap::new(),
            by_url: HashMap::new(),
            failing: HashSet::new(),
            default: response(200, ""),
        }
    }
}

impl MockTransport {
    /// Returns a new [`MockTransport`] answering every request with `200 OK`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every request to the URL with the response.
    pub fn with_response(mut self, url: impl Into<String>, response: HttpResponse) -> Self {
        self.by_url.insert(url.into(), response);
        self
    }

    /// Answers requests with the verb to the URL with the response.
    pub fn with_verb_response(
        mut self,
        verb: Verb,
        url: impl Into<String>,
        response: HttpResponse,
    ) -> Self {
        self.by_verb.insert((verb, url.into()), response);
        self
    }

    /// Fails every request to the URL with a transport error, as a dropped connection would.
    pub fn with_error(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    /// Sets the response returned for requests without a configured response.
    pub fn with_default_response(mut self, response: HttpResponse) -> Self {
        self.default = response;
        self
    }

    /// Returns the requests observed so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Returns the URLs requested with the verb, in order.
    pub fn urls(&self, verb: Verb) -> Vec<String> {
        self.requests.lock().iter().filter(|r| r.verb == verb).map(|r| r.url.clone()).collect()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        verb: Verb,
        url: &str,
        body: Option<&str>,
        headers: &HeaderList,
    ) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(RecordedRequest {
            verb,
            url: url.to_string(),
            body: body.map(ToString::to_string),
            headers: headers.clone(),
        });

        if self.failing.contains(url) {
            return Err(transport_error(url))
        }

        let response = self
            .by_verb
            .get(&(verb, url.to_string()))
            .or_else(|| self.by_url.get(url))
            .unwrap_or(&self.default);
        Ok(response.clone())
    }
}

/// Returns a transport error for the URL.
///
/// The error is produced by reqwest itself, from a request whose URL cannot be parsed.
fn transport_error(url: &str) -> TransportError {
    match reqwest::Client::new().get("http://[").build() {
        Err(err) => err.into(),
        Ok(_) => unreachable!("request to an unparsable URL built for {url}"),
    }
}
