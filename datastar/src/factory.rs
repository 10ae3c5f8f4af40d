//! Entry point for constructing event emitters.

use std::sync::Arc;

use crate::connections::ConnectionSet;
use crate::emitters::{
    ExecuteScript, PatchElements, PatchSignals, RemoveFragments, RemoveSignals,
};
use crate::render::{MessageSource, TemplateRenderer};

/// Constructs Datastar event emitters bound to a target connection set.
///
/// Holds the collaborators shared by every emitter: the template renderer,
/// the template file suffix, and the message source backing localization.
/// One instance is built at application startup and shared; every call
/// returns a fresh single-use emitter.
pub struct Datastar {
    renderer: Arc<dyn TemplateRenderer>,
    template_suffix: String,
    messages: Arc<dyn MessageSource>,
}

impl Datastar {
    pub fn new(
        renderer: Arc<dyn TemplateRenderer>,
        template_suffix: impl Into<String>,
        messages: Arc<dyn MessageSource>,
    ) -> Self {
        Self {
            renderer,
            template_suffix: template_suffix.into(),
            messages,
        }
    }

    /// Patch, replace, or remove DOM elements.
    pub fn patch_elements(&self, connections: ConnectionSet) -> PatchElements {
        PatchElements::new(
            self.renderer.clone(),
            self.template_suffix.clone(),
            self.messages.clone(),
            connections,
        )
    }

    /// Push updated signal values to the client.
    pub fn patch_signals(&self, connections: ConnectionSet) -> PatchSignals {
        PatchSignals::new(connections)
    }

    /// Inject and run JavaScript on the client.
    pub fn execute_script(&self, connections: ConnectionSet) -> ExecuteScript {
        ExecuteScript::new(connections)
    }

    /// Remove elements matching CSS selectors.
    pub fn remove_fragments(&self, connections: ConnectionSet) -> RemoveFragments {
        RemoveFragments::new(connections)
    }

    /// Remove signals matching paths.
    pub fn remove_signals(&self, connections: ConnectionSet) -> RemoveSignals {
        RemoveSignals::new(connections)
    }
}
