use crate::connections::{dispatch, ConnectionSet, DeliveryReport};
use crate::envelope::EventEnvelope;
use crate::error::{Error, UsageErrorKind};

const EVENT_NAME: &str = "datastar-remove-fragments";

/// Emitter for `datastar-remove-fragments` events: remove every element
/// matching the configured selectors from the DOM.
///
/// At least one selector must be set before [`RemoveFragments::emit`].
pub struct RemoveFragments {
    envelope: EventEnvelope,
    connections: ConnectionSet,
    selectors: Vec<String>,
}

impl RemoveFragments {
    pub(crate) fn new(connections: ConnectionSet) -> Self {
        Self {
            envelope: EventEnvelope::new(),
            connections,
            selectors: Vec::new(),
        }
    }

    /// Add a CSS selector for an element to remove.
    pub fn selector(mut self, selector: &str) -> Self {
        self.selectors.push(selector.trim().to_owned());
        self
    }

    /// Validate, assemble the payload, and send it to every connection.
    pub fn emit(mut self) -> Result<DeliveryReport, Error> {
        self.assemble()?;
        Ok(dispatch(self.envelope, &self.connections))
    }

    fn assemble(&mut self) -> Result<(), Error> {
        if self.selectors.is_empty() {
            return Err(Error::usage(UsageErrorKind::NoSelectors));
        }
        self.envelope.set_name(EVENT_NAME);
        for selector in &self.selectors {
            self.envelope.push_line(format!("selector {selector}"));
        }
        Ok(())
    }
}
