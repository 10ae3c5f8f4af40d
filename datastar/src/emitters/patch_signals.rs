use serde_json::{Map, Value};

use crate::connections::{dispatch, ConnectionSet, DeliveryReport};
use crate::envelope::EventEnvelope;
use crate::error::{Error, UsageErrorKind};

const EVENT_NAME: &str = "datastar-patch-signals";

/// Emitter for `datastar-patch-signals` events: push updated reactive
/// signal values to the client.
///
/// At least one signal must be set before [`PatchSignals::emit`].
pub struct PatchSignals {
    envelope: EventEnvelope,
    connections: ConnectionSet,
    signals: Map<String, Value>,
    only_if_missing: Option<bool>,
}

impl PatchSignals {
    pub(crate) fn new(connections: ConnectionSet) -> Self {
        Self {
            envelope: EventEnvelope::new(),
            connections,
            signals: Map::new(),
            only_if_missing: None,
        }
    }

    /// Only patch signals the client does not already have.
    pub fn only_if_missing(mut self, only_if_missing: bool) -> Self {
        self.only_if_missing = Some(only_if_missing);
        self
    }

    /// Set one signal. Last write wins for a repeated name.
    pub fn signal(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.signals.insert(name.into(), value.into());
        self
    }

    /// Validate, assemble the payload, and send it to every connection.
    pub fn emit(mut self) -> Result<DeliveryReport, Error> {
        self.assemble()?;
        Ok(dispatch(self.envelope, &self.connections))
    }

    fn assemble(&mut self) -> Result<(), Error> {
        if self.signals.is_empty() {
            return Err(Error::usage(UsageErrorKind::NoSignals));
        }
        self.envelope.set_name(EVENT_NAME);
        if let Some(only_if_missing) = self.only_if_missing {
            self.envelope
                .push_line(format!("onlyIfMissing {only_if_missing}"));
        }
        let json = serde_json::to_string(&self.signals)?;
        self.envelope.push_line(format!("signals {json}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support;
    use serde_json::json;

    #[test]
    fn test_empty_signal_map_is_a_usage_error_before_any_send() {
        let (set, mut rx) = test_support::single_set();

        let error = test_support::factory("")
            .patch_signals(set)
            .emit()
            .unwrap_err();

        assert_eq!(error.error_kind, ErrorKind::Usage(UsageErrorKind::NoSignals));
        assert!(rx.try_recv().is_err(), "nothing may be sent on a failed emit");
    }

    #[test]
    fn test_signals_collapse_into_exactly_one_json_line() {
        let (set, _rx) = test_support::single_set();

        let mut emitter = test_support::factory("")
            .patch_signals(set)
            .signal("a", 1)
            .signal("b", "x");
        emitter.assemble().unwrap();

        assert_eq!(emitter.envelope.name(), Some("datastar-patch-signals"));
        let lines = emitter.envelope.data_lines();
        assert_eq!(lines.len(), 1, "no onlyIfMissing line when the flag was never set");
        let json = lines[0]
            .strip_prefix("signals ")
            .expect("the payload line must carry the signals prefix");
        let parsed: Value = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, json!({"a": 1, "b": "x"}));
    }

    #[test]
    fn test_only_if_missing_line_precedes_the_signals_line() {
        let (set, _rx) = test_support::single_set();

        let mut emitter = test_support::factory("")
            .patch_signals(set)
            .only_if_missing(true)
            .signal("count", 3);
        emitter.assemble().unwrap();

        assert_eq!(
            emitter.envelope.data_lines(),
            ["onlyIfMissing true", "signals {\"count\":3}"]
        );
    }

    #[test]
    fn test_repeated_signal_name_keeps_the_last_value() {
        let (set, _rx) = test_support::single_set();

        let mut emitter = test_support::factory("")
            .patch_signals(set)
            .signal("count", 1)
            .signal("count", 2);
        emitter.assemble().unwrap();

        assert_eq!(emitter.envelope.data_lines(), ["signals {\"count\":2}"]);
    }

    #[test]
    fn test_emit_delivers_to_every_connection() {
        let (set, mut receivers) = test_support::connection_set(2);

        let report = test_support::factory("")
            .patch_signals(set)
            .signal("ready", true)
            .emit()
            .unwrap();

        assert_eq!(report.attempted, 2);
        assert!(report.is_complete());
        for rx in &mut receivers {
            assert!(rx.try_recv().is_ok());
        }
    }
}
