//! DOM merge strategies for element patches.

/// The patch mode applied by the client when it receives a patch-elements
/// event. The client defaults to [`PatchMode::Outer`] when no mode line is
/// present in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    /// Patch the element's outerHTML with morphing.
    Outer,
    /// Patch the element's innerHTML with morphing.
    Inner,
    /// Replace the element's outerHTML.
    Replace,
    /// Prepend the element to the target's children.
    Prepend,
    /// Append the element to the target's children.
    Append,
    /// Insert the element before the target as a sibling.
    Before,
    /// Insert the element after the target as a sibling.
    After,
    /// Remove the target element.
    Remove,
}

impl PatchMode {
    /// The complete `mode` data line for this strategy.
    pub(crate) fn data_line(self) -> &'static str {
        match self {
            PatchMode::Outer => "mode outer",
            PatchMode::Inner => "mode inner",
            PatchMode::Replace => "mode replace",
            PatchMode::Prepend => "mode prepend",
            PatchMode::Append => "mode append",
            PatchMode::Before => "mode before",
            PatchMode::After => "mode after",
            PatchMode::Remove => "mode remove",
        }
    }
}
