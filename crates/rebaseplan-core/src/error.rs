use thiserror::Error;

/// Failures surfaced by a [`crate::VcsPort`] or by the engine itself.
#[derive(Debug, Error)]
pub enum VcsError {
    /// A named branch, tag or revision does not resolve.
    #[error("unknown reference: {name}")]
    UnknownReference { name: String },

    /// The underlying version-control operation exited with a failure status.
    ///
    /// `diagnostics` is the tool's captured output, kept verbatim.
    #[error("{operation} failed: {diagnostics}")]
    CommandFailed {
        operation: String,
        diagnostics: String,
    },

    /// A selection pattern matched nothing where at least one branch was expected.
    #[error("no branches match {}", patterns.join(" "))]
    AmbiguousSelection { patterns: Vec<String> },
}

impl VcsError {
    pub fn unknown(name: impl Into<String>) -> Self {
        VcsError::UnknownReference { name: name.into() }
    }

    pub fn failed(operation: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        VcsError::CommandFailed {
            operation: operation.into(),
            diagnostics: diagnostics.into(),
        }
    }

    pub fn is_unknown_reference(&self) -> bool {
        matches!(self, VcsError::UnknownReference { .. })
    }
}
