use serde_json::Value;

/// Converts structured values into human-readable text for transcripts and logs.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait Inspector {
    /// Returns the textual rendering of the value.
    fn inspect(&self, value: &Value) -> String;
}

/// An [`Inspector`] printing values as indented JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyInspector;

impl Inspector for PrettyInspector {
    fn inspect(&self, value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}
