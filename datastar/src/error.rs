//! Error types for the `datastar` crate.
use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for event encoding.
///
/// Errors are modeled as a root struct holding a tree of `error_kind`
/// enums, with the originating error (if any) preserved in `source`.
/// Delivery faults are deliberately not represented here: a failed send is
/// isolated per connection, logged, and reported through
/// [`crate::DeliveryReport`]. `Error` covers only the faults that abort an
/// emit before any send is attempted.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// The major categories of errors that can occur while encoding an event.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// A caller bug: a required field is missing or empty at emit time.
    Usage(UsageErrorKind),
    /// Payload encoding failed after required-field validation passed.
    Encoding(EncodingErrorKind),
}

/// The kinds of caller bugs detected before payload assembly.
#[derive(Debug, PartialEq)]
pub enum UsageErrorKind {
    /// A connection set must contain at least one connection.
    EmptyConnectionSet,
    /// Every patch mode except `Remove` requires a template.
    MissingTemplate,
    /// A signal patch must carry at least one signal.
    NoSignals,
    /// A script event must carry at least one script line.
    NoScripts,
    /// Script lines must not be blank.
    BlankScriptLine,
    /// Script tag attribute names must not be blank.
    BlankAttributeName,
    /// A fragment removal must carry at least one selector.
    NoSelectors,
    /// A signal removal must carry at least one path.
    NoPaths,
}

/// The kinds of encoding failures that can abort an emit.
#[derive(Debug, PartialEq)]
pub enum EncodingErrorKind {
    /// The template renderer collaborator failed.
    TemplateRender,
    /// The signal map could not be serialized to JSON.
    SignalSerialization,
}

impl Error {
    pub(crate) fn usage(kind: UsageErrorKind) -> Self {
        Self {
            source: None,
            error_kind: ErrorKind::Usage(kind),
        }
    }

    pub(crate) fn encoding(
        kind: EncodingErrorKind,
        source: Box<dyn StdError + Send + Sync>,
    ) -> Self {
        Self {
            source: Some(source),
            error_kind: ErrorKind::Encoding(kind),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Datastar Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::encoding(EncodingErrorKind::SignalSerialization, Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors_carry_no_source() {
        let error = Error::usage(UsageErrorKind::NoSignals);
        assert!(error.source.is_none());
        assert_eq!(error.error_kind, ErrorKind::Usage(UsageErrorKind::NoSignals));
    }

    #[test]
    fn test_serde_json_errors_translate_to_signal_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: Error = json_err.into();
        assert_eq!(
            error.error_kind,
            ErrorKind::Encoding(EncodingErrorKind::SignalSerialization)
        );
        assert!(error.source.is_some());
    }
}
