//! The in-progress representation of one SSE frame.

use axum::response::sse::Event;
use uuid::Uuid;

/// One SSE frame under construction: a generated event id, the protocol
/// event name, and the ordered `data:` lines of the payload.
///
/// The envelope performs no semantic checks; each emitter is responsible
/// for assembling a payload that satisfies its own grammar before the
/// envelope is dispatched.
#[derive(Debug)]
pub struct EventEnvelope {
    id: String,
    name: Option<&'static str>,
    data_lines: Vec<String>,
}

impl EventEnvelope {
    /// Create an envelope with a freshly generated event id.
    pub(crate) fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: None,
            data_lines: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    pub fn data_lines(&self) -> &[String] {
        &self.data_lines
    }

    /// Set the protocol event name. Called exactly once per emit.
    pub(crate) fn set_name(&mut self, name: &'static str) {
        self.name = Some(name);
    }

    /// Append one data line. Order is significant in the wire format:
    /// selector and mode lines must precede content lines.
    pub(crate) fn push_line(&mut self, line: impl Into<String>) {
        self.data_lines.push(line.into());
    }

    /// Split `raw` on line breaks, trim each line, drop blanks, and append
    /// one `prefix`-ed data line per remaining line. Keeps arbitrary
    /// whitespace in rendered template output from corrupting the
    /// line-oriented frame.
    pub(crate) fn push_multiline(&mut self, prefix: &str, raw: &str) {
        for line in raw.lines() {
            let line = line.trim();
            if !line.is_empty() {
                self.data_lines.push(format!("{prefix}{line}"));
            }
        }
    }

    /// Convert into a framed SSE event ready for transport.
    pub(crate) fn into_event(self) -> Event {
        let mut event = Event::default().id(self.id);
        if let Some(name) = self.name {
            event = event.event(name);
        }
        if !self.data_lines.is_empty() {
            // axum splits the joined payload back into one `data:` line
            // per source line.
            event = event.data(self.data_lines.join("\n"));
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_a_uuid_assigned_at_construction() {
        let envelope = EventEnvelope::new();
        assert!(
            Uuid::parse_str(envelope.id()).is_ok(),
            "envelope id should be a valid UUID"
        );
        assert!(envelope.data_lines().is_empty());
    }

    #[test]
    fn test_push_line_preserves_insertion_order() {
        let mut envelope = EventEnvelope::new();
        envelope.push_line("mode append");
        envelope.push_line("selector body");
        envelope.push_line("elements <div></div>");
        assert_eq!(
            envelope.data_lines(),
            ["mode append", "selector body", "elements <div></div>"]
        );
    }

    #[test]
    fn test_push_multiline_trims_and_drops_blank_lines() {
        let mut envelope = EventEnvelope::new();
        envelope.push_multiline(
            "elements ",
            "  <div>\n\n   <span>hi</span>\t\n</div>  \n\n",
        );
        assert_eq!(
            envelope.data_lines(),
            [
                "elements <div>",
                "elements <span>hi</span>",
                "elements </div>"
            ]
        );
    }

    #[test]
    fn test_set_name_records_the_event_name() {
        let mut envelope = EventEnvelope::new();
        assert_eq!(envelope.name(), None);
        envelope.set_name("datastar-patch-signals");
        assert_eq!(envelope.name(), Some("datastar-patch-signals"));
    }
}
