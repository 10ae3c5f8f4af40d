use crate::connections::{dispatch, ConnectionSet, DeliveryReport};
use crate::envelope::EventEnvelope;
use crate::error::{Error, UsageErrorKind};
use crate::patch_mode::PatchMode;

const EVENT_NAME: &str = "datastar-patch-elements";
const AUTO_REMOVE_EFFECT: &str = " data-effect=\"el.remove()\"";

/// Emitter that injects and runs a `<script>` tag on the client.
///
/// Rides on the `datastar-patch-elements` wire shape (append mode, `body`
/// selector). The script tag has no backing template, so the element lines
/// are assembled by hand instead of through the renderer.
pub struct ExecuteScript {
    envelope: EventEnvelope,
    connections: ConnectionSet,
    scripts: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
    auto_remove: Option<bool>,
}

impl ExecuteScript {
    pub(crate) fn new(connections: ConnectionSet) -> Self {
        Self {
            envelope: EventEnvelope::new(),
            connections,
            scripts: Vec::new(),
            attributes: Vec::new(),
            auto_remove: None,
        }
    }

    /// Remove the script tag from the DOM after it has executed.
    pub fn auto_remove(mut self, auto_remove: bool) -> Self {
        self.auto_remove = Some(auto_remove);
        self
    }

    /// Add a script tag attribute, rendered as `name="value"`.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), Some(value.into())));
        self
    }

    /// Add a valueless (boolean) script tag attribute.
    pub fn boolean_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push((name.into(), None));
        self
    }

    /// Add one line of JavaScript. At least one line is required.
    pub fn script(mut self, script: impl Into<String>) -> Self {
        self.scripts.push(script.into());
        self
    }

    /// Validate, assemble the payload, and send it to every connection.
    pub fn emit(mut self) -> Result<DeliveryReport, Error> {
        self.assemble()?;
        Ok(dispatch(self.envelope, &self.connections))
    }

    fn assemble(&mut self) -> Result<(), Error> {
        if self.scripts.is_empty() {
            return Err(Error::usage(UsageErrorKind::NoScripts));
        }
        if self.scripts.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::usage(UsageErrorKind::BlankScriptLine));
        }
        if self.attributes.iter().any(|(name, _)| name.trim().is_empty()) {
            return Err(Error::usage(UsageErrorKind::BlankAttributeName));
        }
        self.envelope.set_name(EVENT_NAME);
        self.envelope.push_line(PatchMode::Append.data_line());
        self.envelope.push_line("selector body");
        self.envelope.push_line(format!("elements {}", self.open_tag()));
        for script in &self.scripts {
            self.envelope.push_multiline("elements ", script);
        }
        self.envelope.push_line("elements </script>");
        Ok(())
    }

    fn open_tag(&self) -> String {
        let mut tag = String::from("<script");
        if self.auto_remove == Some(true) {
            tag.push_str(AUTO_REMOVE_EFFECT);
        }
        for (name, value) in &self.attributes {
            tag.push(' ');
            tag.push_str(name);
            if let Some(value) = value {
                tag.push_str("=\"");
                tag.push_str(value);
                tag.push('"');
            }
        }
        tag.push('>');
        tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support;

    #[test]
    fn test_no_scripts_is_a_usage_error_before_any_send() {
        let (set, mut rx) = test_support::single_set();

        let error = test_support::factory("")
            .execute_script(set)
            .emit()
            .unwrap_err();

        assert_eq!(error.error_kind, ErrorKind::Usage(UsageErrorKind::NoScripts));
        assert!(rx.try_recv().is_err(), "nothing may be sent on a failed emit");
    }

    #[test]
    fn test_blank_script_line_is_rejected() {
        let (set, _rx) = test_support::single_set();

        let error = test_support::factory("")
            .execute_script(set)
            .script("   ")
            .emit()
            .unwrap_err();

        assert_eq!(
            error.error_kind,
            ErrorKind::Usage(UsageErrorKind::BlankScriptLine)
        );
    }

    #[test]
    fn test_blank_attribute_name_is_rejected() {
        let (set, _rx) = test_support::single_set();

        let error = test_support::factory("")
            .execute_script(set)
            .script("console.log(1)")
            .attribute(" ", "module")
            .emit()
            .unwrap_err();

        assert_eq!(
            error.error_kind,
            ErrorKind::Usage(UsageErrorKind::BlankAttributeName)
        );
    }

    #[test]
    fn test_single_script_line_produces_the_exact_wire_payload() {
        let (set, _rx) = test_support::single_set();

        let mut emitter = test_support::factory("")
            .execute_script(set)
            .script("console.log(1)");
        emitter.assemble().unwrap();

        assert_eq!(emitter.envelope.name(), Some("datastar-patch-elements"));
        assert_eq!(
            emitter.envelope.data_lines(),
            [
                "mode append",
                "selector body",
                "elements <script>",
                "elements console.log(1)",
                "elements </script>"
            ]
        );
    }

    #[test]
    fn test_auto_remove_injects_the_effect_before_other_attributes() {
        let (set, _rx) = test_support::single_set();

        let mut emitter = test_support::factory("")
            .execute_script(set)
            .auto_remove(true)
            .attribute("type", "module")
            .boolean_attribute("defer")
            .script("init()");
        emitter.assemble().unwrap();

        assert_eq!(
            emitter.envelope.data_lines()[2],
            "elements <script data-effect=\"el.remove()\" type=\"module\" defer>"
        );
    }

    #[test]
    fn test_auto_remove_false_adds_no_effect_attribute() {
        let (set, _rx) = test_support::single_set();

        let mut emitter = test_support::factory("")
            .execute_script(set)
            .auto_remove(false)
            .script("init()");
        emitter.assemble().unwrap();

        assert_eq!(emitter.envelope.data_lines()[2], "elements <script>");
    }

    #[test]
    fn test_script_lines_keep_their_order() {
        let (set, _rx) = test_support::single_set();

        let mut emitter = test_support::factory("")
            .execute_script(set)
            .script("const a = 1;")
            .script("console.log(a);");
        emitter.assemble().unwrap();

        assert_eq!(
            &emitter.envelope.data_lines()[3..5],
            ["elements const a = 1;", "elements console.log(a);"]
        );
    }
}
