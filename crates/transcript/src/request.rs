use crate::{ResponseFormat, ResponseRenderer, TranscriptError, TranscriptSink};
use harness_primitives::{HeaderList, HttpResponse, Inspector, PrettyInspector, Verb};
use harness_transport::Transport;
use serde_json::Value;

/// The port shown in the target of recorded `curl` commands.
pub const DEFAULT_ADMIN_PORT: u16 = 8529;

/// The prompt and command starting a recorded request.
const CURL_PROMPT: &str = "shell> curl ";

/// The body of a recorded request.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum RequestBody {
    /// A body sent and shown as is.
    Text(String),
    /// A structured body, sent and shown as rendered by the inspector.
    Json(Value),
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Issues requests and records them as `curl` commands.
#[derive(Debug, Clone)]
pub struct TranscriptRecorder<T, I = PrettyInspector> {
    transport: T,
    renderer: ResponseRenderer<I>,
    inspector: I,
    admin_port: u16,
}

impl<T: Transport> TranscriptRecorder<T> {
    /// Returns a new [`TranscriptRecorder`] issuing requests through the transport.
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            renderer: ResponseRenderer::new(),
            inspector: PrettyInspector,
            admin_port: DEFAULT_ADMIN_PORT,
        }
    }
}

impl<T: Transport, I: Inspector + Clone> TranscriptRecorder<T, I> {
    /// Replaces the inspector used for structured request bodies and response bodies.
    pub fn with_inspector<J: Inspector + Clone>(self, inspector: J) -> TranscriptRecorder<T, J> {
        TranscriptRecorder {
            transport: self.transport,
            renderer: ResponseRenderer::with_inspector(inspector.clone()),
            inspector,
            admin_port: self.admin_port,
        }
    }

    /// Sets the port shown in the target of the recorded commands.
    pub fn with_admin_port(mut self, admin_port: u16) -> Self {
        self.admin_port = admin_port;
        self
    }

    /// Issues the request and writes its request block to the sink.
    ///
    /// An `accept: application/json` header is added unless the caller set `Accept` or `accept`.
    /// A method that maps to no [`Verb`] issues no request: the command is still recorded, without
    /// a `-X` flag, and an empty response is returned.
    pub async fn record_request(
        &self,
        sink: &mut impl TranscriptSink,
        method: &str,
        url: &str,
        body: Option<RequestBody>,
        headers: Option<HeaderList>,
    ) -> Result<HttpResponse, TranscriptError> {
        let (body, structured) = match body {
            Some(RequestBody::Text(text)) => (text, false),
            Some(RequestBody::Json(value)) => (self.inspector.inspect(&value), true),
            None => (String::new(), false),
        };

        let mut headers = headers.unwrap_or_default();
        if !headers.contains("Accept") && !headers.contains("accept") {
            headers.insert("accept", "application/json");
        }

        let verb = match method.parse::<Verb>() {
            Ok(verb) => Some(verb),
            Err(err) => {
                tracing::warn!(target: "harness::transcript", %err, url, "no request issued");
                None
            }
        };
        let response = match verb {
            Some(verb) => {
                tracing::debug!(target: "harness::transcript", %verb, url, "recording request");
                let body = (!body.is_empty()).then_some(body.as_str());
                self.transport.request(verb, url, body, &headers).await?
            }
            None => HttpResponse::default(),
        };

        let mut curl = CURL_PROMPT.to_string();
        if let Some(verb) = verb.filter(|verb| *verb != Verb::Get) {
            curl.push_str(&format!("-X {verb} "));
        }
        for (name, value) in headers.iter() {
            curl.push_str(&format!("--header '{name}: {value}' "));
        }
        if !body.is_empty() {
            curl.push_str("--data-binary @- ");
        }
        curl.push_str(&format!("--dump - http://localhost:{}{url}", self.admin_port));
        sink.shell(&curl);

        if !body.is_empty() {
            sink.raw(" <<EOF\n");
            if structured {
                sink.structured(&body);
            } else {
                sink.raw(&body);
            }
            sink.raw("\nEOF");
        }
        sink.raw("\n\n");

        Ok(response)
    }

    /// Issues the request, then writes its request block and its response block rendered in the
    /// provided format.
    pub async fn record_exchange(
        &self,
        sink: &mut impl TranscriptSink,
        method: &str,
        url: &str,
        body: Option<RequestBody>,
        headers: Option<HeaderList>,
        format: ResponseFormat,
    ) -> Result<HttpResponse, TranscriptError> {
        let response = self.record_request(sink, method, url, body, headers).await?;
        self.renderer.render(format, sink, &response)?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingSink, SinkEvent};
    use harness_transport::test_utils::{response, MockTransport};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_should_record_get_without_method_flag() -> eyre::Result<()> {
        let mock = Arc::new(MockTransport::new());
        let recorder = TranscriptRecorder::new(mock.clone());
        let mut sink = RecordingSink::default();

        recorder.record_request(&mut sink, "GET", "/_api/version", None, None).await?;

        assert_eq!(
            sink.events(),
            [
                SinkEvent::Shell(
                    "shell> curl --header 'accept: application/json' --dump - http://localhost:8529/_api/version"
                        .to_string()
                ),
                SinkEvent::Raw("\n\n".to_string()),
            ]
        );
        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].verb, Verb::Get);
        assert_eq!(requests[0].body, None);
        assert_eq!(requests[0].headers.get("accept"), Some("application/json"));

        Ok(())
    }

    #[tokio::test]
    async fn test_should_record_text_body_as_here_document() -> eyre::Result<()> {
        let mock = Arc::new(MockTransport::new());
        let recorder = TranscriptRecorder::new(mock.clone()).with_admin_port(8530);
        let mut sink = RecordingSink::default();
        let headers: HeaderList = [("Accept", "text/plain")].into_iter().collect();

        recorder
            .record_request(&mut sink, "POST", "/_api/cursor", Some("RETURN 1".into()), Some(headers))
            .await?;

        assert_eq!(
            sink.events(),
            [
                SinkEvent::Shell(
                    "shell> curl -X POST --header 'Accept: text/plain' --data-binary @- --dump - http://localhost:8530/_api/cursor"
                        .to_string()
                ),
                SinkEvent::Raw(" <<EOF\n".to_string()),
                SinkEvent::Raw("RETURN 1".to_string()),
                SinkEvent::Raw("\nEOF".to_string()),
                SinkEvent::Raw("\n\n".to_string()),
            ]
        );
        assert_eq!(mock.requests()[0].body.as_deref(), Some("RETURN 1"));

        Ok(())
    }

    #[tokio::test]
    async fn test_should_record_json_body_as_structured_text() -> eyre::Result<()> {
        let mock = Arc::new(MockTransport::new());
        let recorder = TranscriptRecorder::new(mock.clone());
        let mut sink = RecordingSink::default();

        recorder
            .record_request(
                &mut sink,
                "PUT",
                "/_api/ttl/properties",
                Some(json!({"frequency": 30000}).into()),
                None,
            )
            .await?;

        let pretty = "{\n  \"frequency\": 30000\n}";
        assert_eq!(sink.structured_text(), vec![pretty]);
        assert_eq!(mock.requests()[0].body.as_deref(), Some(pretty));

        Ok(())
    }

    #[tokio::test]
    async fn test_should_not_issue_unknown_methods() -> eyre::Result<()> {
        let mock = Arc::new(MockTransport::new());
        let recorder = TranscriptRecorder::new(mock.clone());
        let mut sink = RecordingSink::default();

        let response =
            recorder.record_request(&mut sink, "TRACE", "/_api/version", None, None).await?;

        assert_eq!(response, HttpResponse::default());
        assert!(mock.requests().is_empty());
        assert_eq!(
            sink.text(),
            "shell> curl --header 'accept: application/json' --dump - http://localhost:8529/_api/version\n\n"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_should_dispatch_every_verb() -> eyre::Result<()> {
        let mock = Arc::new(MockTransport::new());
        let recorder = TranscriptRecorder::new(mock.clone());

        for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS", "OPTION"] {
            let mut sink = RecordingSink::default();
            recorder.record_request(&mut sink, method, "/", None, None).await?;
        }

        let verbs: Vec<_> = mock.requests().into_iter().map(|r| r.verb).collect();
        assert_eq!(
            verbs,
            vec![
                Verb::Get,
                Verb::Post,
                Verb::Put,
                Verb::Patch,
                Verb::Delete,
                Verb::Head,
                Verb::Options,
                Verb::Options
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_should_return_response_unchanged() -> eyre::Result<()> {
        let expected = response(202, "{\"error\":false}").with_header("location", "/_api/job/1");
        let mock = MockTransport::new().with_response("/_api/job", expected.clone());
        let recorder = TranscriptRecorder::new(mock);
        let mut sink = RecordingSink::default();

        let response = recorder.record_request(&mut sink, "DELETE", "/_api/job", None, None).await?;

        assert_eq!(response, expected);
        Ok(())
    }
}
