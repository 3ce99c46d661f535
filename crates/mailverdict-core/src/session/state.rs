//! Session state snapshots.

use crate::model::ClassificationResult;

/// Where a session is in its lifecycle.
///
/// The result only exists in [`Phase::Success`] and the error message only in
/// [`Phase::Failed`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    /// Nothing submitted, or cleared.
    #[default]
    Idle,
    /// A request is in flight.
    Submitting,
    /// The latest submission was classified.
    Success(ClassificationResult),
    /// The latest submission failed; holds the user-facing message.
    Failed(String),
}

impl Phase {
    /// Short name of the phase, for log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Success(_) => "success",
            Self::Failed(_) => "failed",
        }
    }
}

/// A snapshot of a classification session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub(super) phase: Phase,
    pub(super) generation: u64,
    pub(super) copied: bool,
    pub(super) copy_generation: u64,
}

impl SessionState {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Returns true while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Submitting)
    }

    /// Returns true when nothing is shown.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// The current result, present only after a successful submission.
    #[must_use]
    pub const fn result(&self) -> Option<&ClassificationResult> {
        match &self.phase {
            Phase::Success(result) => Some(result),
            _ => None,
        }
    }

    /// The current error message, present only after a failed submission.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Whether the suggestion was just copied.
    #[must_use]
    pub const fn copied(&self) -> bool {
        self.copied
    }

    /// Id of the latest submission. Increases on every accepted submit.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// What became of one `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// The draft had nothing to classify (or was ambiguous); the session was
    /// not touched.
    Skipped,
    /// The outcome was stored in the session.
    Settled,
    /// A newer submit or a clear happened first; the outcome was dropped.
    Superseded,
}
