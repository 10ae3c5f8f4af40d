use std::sync::Arc;

use serde_json::Value;

use crate::connections::{dispatch, ConnectionSet, DeliveryReport};
use crate::envelope::EventEnvelope;
use crate::error::{EncodingErrorKind, Error, UsageErrorKind};
use crate::patch_mode::PatchMode;
use crate::render::{Localizer, MessageSource, TemplateAttributes, TemplateRenderer};

const EVENT_NAME: &str = "datastar-patch-elements";

/// Emitter for `datastar-patch-elements` events: patch, replace, or remove
/// DOM content identified by a selector.
///
/// A template is required for every patch mode except
/// [`PatchMode::Remove`]. Single use: configure fluently, then call
/// [`PatchElements::emit`] once.
pub struct PatchElements {
    envelope: EventEnvelope,
    connections: ConnectionSet,
    renderer: Arc<dyn TemplateRenderer>,
    template_suffix: String,
    messages: Arc<dyn MessageSource>,
    attributes: TemplateAttributes,
    template: Option<String>,
    selector: Option<String>,
    patch_mode: Option<PatchMode>,
    use_view_transition: Option<bool>,
}

impl PatchElements {
    pub(crate) fn new(
        renderer: Arc<dyn TemplateRenderer>,
        template_suffix: String,
        messages: Arc<dyn MessageSource>,
        connections: ConnectionSet,
    ) -> Self {
        Self {
            envelope: EventEnvelope::new(),
            connections,
            renderer,
            template_suffix,
            messages,
            attributes: TemplateAttributes::default(),
            template: None,
            selector: None,
            patch_mode: None,
            use_view_transition: None,
        }
    }

    /// The template to render the patched elements from. The configured
    /// template suffix is appended to `name`.
    pub fn template(mut self, name: &str) -> Self {
        self.template = Some(format!("{}{}", name, self.template_suffix));
        self
    }

    /// Like [`PatchElements::template`], additionally binding a
    /// [`Localizer`] for `locale` into the attributes so the template can
    /// resolve language-specific text.
    pub fn localized_template(mut self, name: &str, locale: &str) -> Self {
        self.template = Some(format!("{}{}", name, self.template_suffix));
        self.attributes
            .bind_localizer(Localizer::new(self.messages.clone(), locale));
        self
    }

    /// Add an attribute for template rendering. Re-setting a key
    /// overwrites the previous value.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key, value.into());
        self
    }

    /// Target element(s) of the patch as a CSS selector. Multiple selectors
    /// can be given as a comma separated list.
    pub fn selector(mut self, selector: &str) -> Self {
        self.selector = Some(selector.trim().to_owned());
        self
    }

    /// The patch mode. When unset, no mode line is written and the client
    /// falls back to `outer`.
    pub fn patch_mode(mut self, patch_mode: PatchMode) -> Self {
        self.patch_mode = Some(patch_mode);
        self
    }

    /// Whether the client should wrap the patch in a view transition.
    pub fn use_view_transition(mut self, use_view_transition: bool) -> Self {
        self.use_view_transition = Some(use_view_transition);
        self
    }

    /// Validate, assemble the payload, and send it to every connection.
    pub fn emit(mut self) -> Result<DeliveryReport, Error> {
        self.assemble()?;
        Ok(dispatch(self.envelope, &self.connections))
    }

    fn assemble(&mut self) -> Result<(), Error> {
        if self.patch_mode != Some(PatchMode::Remove) && self.template.is_none() {
            return Err(Error::usage(UsageErrorKind::MissingTemplate));
        }
        self.envelope.set_name(EVENT_NAME);
        if let Some(patch_mode) = self.patch_mode {
            self.envelope.push_line(patch_mode.data_line());
        }
        if let Some(selector) = self.selector.as_deref().filter(|s| !s.is_empty()) {
            self.envelope.push_line(format!("selector {selector}"));
        }
        if let Some(use_view_transition) = self.use_view_transition {
            self.envelope
                .push_line(format!("useViewTransition {use_view_transition}"));
        }
        if let Some(template) = &self.template {
            let html = self
                .renderer
                .render(template, &self.attributes)
                .map_err(|err| Error::encoding(EncodingErrorKind::TemplateRender, err))?;
            self.envelope.push_multiline("elements ", &html);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::render::RenderError;
    use crate::test_support;
    use crate::Datastar;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_missing_template_is_a_usage_error_before_any_send() {
        let factory = test_support::factory("<div></div>");
        let (set, mut rx) = test_support::single_set();

        let error = factory
            .patch_elements(set)
            .patch_mode(PatchMode::Inner)
            .emit()
            .unwrap_err();

        assert_eq!(
            error.error_kind,
            ErrorKind::Usage(UsageErrorKind::MissingTemplate)
        );
        assert!(rx.try_recv().is_err(), "nothing may be sent on a failed emit");
    }

    #[test]
    fn test_remove_mode_needs_no_template() {
        let factory = test_support::factory("<div></div>");
        let (set, mut rx) = test_support::single_set();

        let report = factory
            .patch_elements(set)
            .patch_mode(PatchMode::Remove)
            .selector("#toast")
            .emit()
            .unwrap();

        assert!(report.is_complete());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_payload_lines_are_assembled_in_grammar_order() {
        let factory = test_support::factory("  <div id=\"card\">\n\n  <p>hi</p>\n</div>  ");
        let (set, _rx) = test_support::single_set();

        let mut emitter = factory
            .patch_elements(set)
            .template("card")
            .selector("  #main  ")
            .patch_mode(PatchMode::Inner)
            .use_view_transition(true);
        emitter.assemble().unwrap();

        assert_eq!(emitter.envelope.name(), Some("datastar-patch-elements"));
        assert_eq!(
            emitter.envelope.data_lines(),
            [
                "mode inner",
                "selector #main",
                "useViewTransition true",
                "elements <div id=\"card\">",
                "elements <p>hi</p>",
                "elements </div>"
            ]
        );
    }

    #[test]
    fn test_renderer_is_invoked_exactly_once_with_suffixed_name() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let renderer: Arc<dyn TemplateRenderer> = Arc::new(
            |template: &str, _: &TemplateAttributes| -> Result<String, RenderError> {
                CALLS.fetch_add(1, Ordering::SeqCst);
                assert_eq!(template, "card.html");
                Ok("<div></div>".to_owned())
            },
        );
        let factory = Datastar::new(renderer, ".html", test_support::no_messages());
        let (set, _rx) = test_support::single_set();

        factory.patch_elements(set).template("card").emit().unwrap();

        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_renderer_failure_is_a_fatal_encoding_fault() {
        let renderer: Arc<dyn TemplateRenderer> = Arc::new(
            |_: &str, _: &TemplateAttributes| -> Result<String, RenderError> {
                Err("template not found".into())
            },
        );
        let factory = Datastar::new(renderer, ".html", test_support::no_messages());
        let (set, mut rx) = test_support::single_set();

        let error = factory.patch_elements(set).template("card").emit().unwrap_err();

        assert_eq!(
            error.error_kind,
            ErrorKind::Encoding(EncodingErrorKind::TemplateRender)
        );
        assert!(rx.try_recv().is_err(), "nothing may be sent on a failed emit");
    }

    #[test]
    fn test_localized_template_binds_a_localizer_for_the_renderer() {
        let renderer: Arc<dyn TemplateRenderer> = Arc::new(
            |_: &str, attributes: &TemplateAttributes| -> Result<String, RenderError> {
                let localizer = attributes.localizer().expect("localizer must be bound");
                let heading = localizer.lookup("card.heading").unwrap();
                Ok(format!("<h2>{heading}</h2>"))
            },
        );
        let messages: Arc<dyn MessageSource> = Arc::new(|key: &str, locale: &str| {
            (key == "card.heading" && locale == "de").then(|| "Karte".to_owned())
        });
        let factory = Datastar::new(renderer, ".html", messages);
        let (set, _rx) = test_support::single_set();

        let mut emitter = factory.patch_elements(set).localized_template("card", "de");
        emitter.assemble().unwrap();

        assert_eq!(emitter.envelope.data_lines(), ["elements <h2>Karte</h2>"]);
    }

    #[test]
    fn test_blank_selector_produces_no_selector_line() {
        let factory = test_support::factory("<div></div>");
        let (set, _rx) = test_support::single_set();

        let mut emitter = factory.patch_elements(set).template("card").selector("   ");
        emitter.assemble().unwrap();

        assert_eq!(emitter.envelope.data_lines(), ["elements <div></div>"]);
    }
}
