//! Collaborator contracts for template rendering and localization.
//!
//! The crate assumes nothing about the technology behind these contracts:
//! any template engine can sit behind [`TemplateRenderer`] and any message
//! catalog behind [`MessageSource`]. Plain functions satisfy both traits
//! through blanket implementations.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Boxed error produced by a template renderer.
pub type RenderError = Box<dyn StdError + Send + Sync>;

/// Renders a named template against a set of attributes.
pub trait TemplateRenderer: Send + Sync {
    fn render(
        &self,
        template: &str,
        attributes: &TemplateAttributes,
    ) -> Result<String, RenderError>;
}

impl<F> TemplateRenderer for F
where
    F: Fn(&str, &TemplateAttributes) -> Result<String, RenderError> + Send + Sync,
{
    fn render(
        &self,
        template: &str,
        attributes: &TemplateAttributes,
    ) -> Result<String, RenderError> {
        self(template, attributes)
    }
}

/// Locale-scoped key → text resolver.
pub trait MessageSource: Send + Sync {
    /// Resolve `key` for `locale`, or `None` when no message exists.
    fn message(&self, key: &str, locale: &str) -> Option<String>;
}

impl<F> MessageSource for F
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync,
{
    fn message(&self, key: &str, locale: &str) -> Option<String> {
        self(key, locale)
    }
}

/// A message source pinned to one locale, handed to templates that need
/// language-specific text.
#[derive(Clone)]
pub struct Localizer {
    messages: Arc<dyn MessageSource>,
    locale: String,
}

impl Localizer {
    pub(crate) fn new(messages: Arc<dyn MessageSource>, locale: impl Into<String>) -> Self {
        Self {
            messages,
            locale: locale.into(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Resolve a message key in this localizer's locale.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.messages.message(key, &self.locale)
    }
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("locale", &self.locale)
            .finish()
    }
}

/// Attributes passed to the template renderer: one JSON value per attribute
/// name, plus an optional localizer slot bound when the caller requested a
/// localized template.
#[derive(Debug, Clone, Default)]
pub struct TemplateAttributes {
    values: HashMap<String, Value>,
    localizer: Option<Localizer>,
}

impl TemplateAttributes {
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub(crate) fn bind_localizer(&mut self, localizer: Localizer) {
        self.localizer = Some(localizer);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    pub fn localizer(&self) -> Option<&Localizer> {
        self.localizer.as_ref()
    }
}
