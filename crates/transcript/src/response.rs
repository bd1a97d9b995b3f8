use crate::{TranscriptError, TranscriptSink};
use harness_primitives::{HeaderList, HttpResponse, Inspector, PrettyInspector, STATUS_LINE_HEADER};
use serde_json::Value;

/// The rendering applied to a response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResponseFormat {
    /// The body as an escaped string literal.
    #[default]
    Raw,
    /// The body as text, line by line.
    Plain,
    /// The body decoded as a single JSON document.
    Json,
    /// The body decoded as one JSON document per line.
    #[value(name = "jsonl", alias = "json-lines")]
    JsonLines,
}

/// Writes the status line and the headers of a response.
///
/// The status line comes from the synthetic [`STATUS_LINE_HEADER`] entry and is always written
/// first, the other headers follow in the order of the list. Nothing is written if the entry is
/// missing.
pub fn render_headers(
    sink: &mut impl TranscriptSink,
    headers: &HeaderList,
) -> Result<(), TranscriptError> {
    let status_line = headers.get(STATUS_LINE_HEADER).ok_or(TranscriptError::MissingStatusLine)?;
    sink.raw(&format!("HTTP/1.1 {status_line}\n"));

    for (name, value) in headers.iter().filter(|(name, _)| *name != STATUS_LINE_HEADER) {
        sink.raw(&format!("{name}: {value}\n"));
    }
    Ok(())
}

/// Renders response blocks of transcripts.
///
/// Renderers only read the response: the caller's value is never modified.
#[derive(Debug, Clone, Default)]
pub struct ResponseRenderer<I = PrettyInspector> {
    inspector: I,
}

impl ResponseRenderer {
    /// Returns a [`ResponseRenderer`] printing values as indented JSON.
    pub const fn new() -> Self {
        Self { inspector: PrettyInspector }
    }
}

impl<I: Inspector> ResponseRenderer<I> {
    /// Returns a [`ResponseRenderer`] printing values with the inspector.
    pub const fn with_inspector(inspector: I) -> Self {
        Self { inspector }
    }

    /// Renders the response in the provided format.
    pub fn render(
        &self,
        format: ResponseFormat,
        sink: &mut impl TranscriptSink,
        response: &HttpResponse,
    ) -> Result<(), TranscriptError> {
        match format {
            ResponseFormat::Raw => self.render_raw(sink, response),
            ResponseFormat::Plain => self.render_plain(sink, response),
            ResponseFormat::Json => self.render_json(sink, response),
            ResponseFormat::JsonLines => self.render_json_lines(sink, response),
        }
    }

    /// Renders the headers and the body as an escaped string literal.
    pub fn render_raw(
        &self,
        sink: &mut impl TranscriptSink,
        response: &HttpResponse,
    ) -> Result<(), TranscriptError> {
        let body = response.body.as_ref().map(|body| Value::String(body.as_text().into_owned()));
        self.render_value(sink, &response.headers, body.as_ref())
    }

    /// Renders the headers and the body as text, one structured call per line.
    ///
    /// Lines are split on `\r\n`, `\r` and `\n`. A line break ending the body does not open an
    /// extra empty line, and an empty body is written once as an empty line.
    pub fn render_plain(
        &self,
        sink: &mut impl TranscriptSink,
        response: &HttpResponse,
    ) -> Result<(), TranscriptError> {
        render_headers(sink, &response.headers)?;
        sink.raw("\n");

        if let Some(body) = &response.body {
            for line in split_lines(&body.as_text()) {
                sink.structured(line);
                sink.raw("\n");
            }
        }
        Ok(())
    }

    /// Renders the headers and the body decoded as JSON, all of it as structured text.
    ///
    /// The body is decoded before anything is written, so a malformed body leaves the sink
    /// untouched.
    pub fn render_json(
        &self,
        sink: &mut impl TranscriptSink,
        response: &HttpResponse,
    ) -> Result<(), TranscriptError> {
        let value = serde_json::from_str::<Value>(&response.text()).map_err(|source| {
            TranscriptError::ResponseBodyDecode { source, response: Box::new(response.clone()) }
        })?;
        self.render_value(&mut AllStructured(sink), &response.headers, Some(&value))
    }

    /// Renders the headers and every non-empty line of the body decoded as JSON.
    ///
    /// Lines are decoded one after the other: lines preceding a malformed line have already been
    /// written when the error is returned.
    pub fn render_json_lines(
        &self,
        sink: &mut impl TranscriptSink,
        response: &HttpResponse,
    ) -> Result<(), TranscriptError> {
        render_headers(sink, &response.headers)?;
        sink.raw("\n");

        let text = response.text();
        for (index, line) in text.split('\n').enumerate().filter(|(_, line)| !line.is_empty()) {
            let value = serde_json::from_str::<Value>(line).map_err(|source| {
                tracing::debug!(target: "harness::transcript", index, "malformed JSON line");
                TranscriptError::JsonLineDecode {
                    index,
                    line: line.to_string(),
                    source,
                    response: Box::new(response.clone()),
                }
            })?;
            sink.structured(&self.inspector.inspect(&value));
            sink.raw("\n");
        }
        Ok(())
    }

    fn render_value(
        &self,
        sink: &mut impl TranscriptSink,
        headers: &HeaderList,
        body: Option<&Value>,
    ) -> Result<(), TranscriptError> {
        render_headers(sink, headers)?;
        sink.raw("\n");

        if let Some(body) = body {
            sink.structured(&self.inspector.inspect(body));
            sink.raw("\n");
        }
        Ok(())
    }
}

/// Forwards raw text to the structured channel of the inner sink.
struct AllStructured<'a, S>(&'a mut S);

impl<S: TranscriptSink> TranscriptSink for AllStructured<'_, S> {
    fn shell(&mut self, text: &str) {
        self.0.shell(text);
    }

    fn raw(&mut self, text: &str) {
        self.0.structured(text);
    }

    fn structured(&mut self, text: &str) {
        self.0.structured(text);
    }
}

/// Splits text on `\r\n`, `\r` and `\n`, dropping the empty segment after a final line break.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(['\r', '\n']) {
        lines.push(&rest[..pos]);
        let len = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[pos + len..];
    }
    if !rest.is_empty() || lines.is_empty() {
        lines.push(rest);
    }
    lines
}
