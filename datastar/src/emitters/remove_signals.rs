use crate::connections::{dispatch, ConnectionSet, DeliveryReport};
use crate::envelope::EventEnvelope;
use crate::error::{Error, UsageErrorKind};

const EVENT_NAME: &str = "datastar-remove-signals";

/// Emitter for `datastar-remove-signals` events: remove client signals
/// matching the configured paths.
///
/// At least one path must be set before [`RemoveSignals::emit`].
pub struct RemoveSignals {
    envelope: EventEnvelope,
    connections: ConnectionSet,
    paths: Vec<String>,
}

impl RemoveSignals {
    pub(crate) fn new(connections: ConnectionSet) -> Self {
        Self {
            envelope: EventEnvelope::new(),
            connections,
            paths: Vec::new(),
        }
    }

    /// Add a signal path to remove, e.g. `user.name`.
    pub fn path(mut self, path: &str) -> Self {
        self.paths.push(path.trim().to_owned());
        self
    }

    /// Validate, assemble the payload, and send it to every connection.
    pub fn emit(mut self) -> Result<DeliveryReport, Error> {
        self.assemble()?;
        Ok(dispatch(self.envelope, &self.connections))
    }

    fn assemble(&mut self) -> Result<(), Error> {
        if self.paths.is_empty() {
            return Err(Error::usage(UsageErrorKind::NoPaths));
        }
        self.envelope.set_name(EVENT_NAME);
        for path in &self.paths {
            self.envelope.push_line(format!("paths {path}"));
        }
        Ok(())
    }
}
