use colored::Colorize;
use std::io::{self, Write};

/// The output of a transcript.
///
/// Text is passed verbatim, line breaks included, so implementations only decide where it goes
/// and how it is styled.
#[auto_impl::auto_impl(&mut, Box)]
pub trait TranscriptSink {
    /// Receives the shell command reproducing a request.
    fn shell(&mut self, text: &str);
    /// Receives plain text: here-document delimiters, status line, headers and line breaks.
    fn raw(&mut self, text: &str);
    /// Receives payload text: request and response bodies.
    fn structured(&mut self, text: &str);
}

/// A single call made to a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// A [`TranscriptSink::shell`] call.
    Shell(String),
    /// A [`TranscriptSink::raw`] call.
    Raw(String),
    /// A [`TranscriptSink::structured`] call.
    Structured(String),
}

/// A [`TranscriptSink`] keeping every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    /// Returns the recorded calls.
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Returns the text of the structured calls.
    pub fn structured_text(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Structured(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns the concatenation of all recorded text.
    pub fn text(&self) -> String {
        self.events
            .iter()
            .map(|event| match event {
                SinkEvent::Shell(text) | SinkEvent::Raw(text) | SinkEvent::Structured(text) => {
                    text.as_str()
                }
            })
            .collect()
    }
}

impl TranscriptSink for RecordingSink {
    fn shell(&mut self, text: &str) {
        self.events.push(SinkEvent::Shell(text.to_string()));
    }

    fn raw(&mut self, text: &str) {
        self.events.push(SinkEvent::Raw(text.to_string()));
    }

    fn structured(&mut self, text: &str) {
        self.events.push(SinkEvent::Structured(text.to_string()));
    }
}

/// A [`TranscriptSink`] collecting the transcript as unstyled text.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    buffer: String,
}

impl BufferSink {
    /// Returns the collected text.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Returns the collected text, consuming the sink.
    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl TranscriptSink for BufferSink {
    fn shell(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn raw(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn structured(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// A [`TranscriptSink`] writing to a terminal, commands in bold and payloads in cyan.
///
/// Writing stops at the first I/O error, which is reported by [`ConsoleSink::finish`].
#[derive(Debug)]
pub struct ConsoleSink<W> {
    writer: W,
    error: Option<io::Error>,
}

impl ConsoleSink<io::Stdout> {
    /// Returns a [`ConsoleSink`] writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Returns a [`ConsoleSink`] writing to the writer.
    pub const fn new(writer: W) -> Self {
        Self { writer, error: None }
    }

    /// Flushes the writer and returns the first error met while writing, if any.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err)
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write(&mut self, text: impl std::fmt::Display) {
        if self.error.is_some() {
            return
        }
        if let Err(err) = write!(self.writer, "{text}") {
            self.error = Some(err);
        }
    }
}

impl<W: Write> TranscriptSink for ConsoleSink<W> {
    fn shell(&mut self, text: &str) {
        self.write(text.bold());
    }

    fn raw(&mut self, text: &str) {
        self.write(text);
    }

    fn structured(&mut self, text: &str) {
        self.write(text.cyan());
    }
}
