//! Classification session state machine.
//!
//! A [`Session`] owns the lifecycle of one classifier widget:
//!
//! ```text
//! Idle ──submit──▶ Submitting ──▶ Success(result)
//!   ▲                  │      └──▶ Failed(message)
//!   └──────clear───────┴────────────────┘
//! ```
//!
//! Every accepted `submit` takes a new generation id. When a request
//! resolves, its outcome is stored only if no later `submit` or `clear`
//! happened in the meantime, so the session always shows the outcome of the
//! most recently issued submission. Requests are never cancelled; a
//! superseded request runs to completion and its outcome is dropped.
//!
//! Adapters observe changes through [`Session::subscribe`].
//!
//! # Example
//!
//! ```ignore
//! use mailverdict_core::{Session, RequestDraft, ClassificationClient};
//!
//! let session = Session::new(ClassificationClient::from_env()?);
//! session.submit(RequestDraft::text(body).with_language("pt")).await;
//!
//! if let Some(result) = session.snapshot().result() {
//!     println!("{} ({}%)", result.category, result.confidence_percent());
//! }
//! ```

mod state;

pub use state::{Phase, SessionState, SubmitStatus};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mailverdict_client::{ClassificationRequest, RequestDraft, ValidationError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::classifier::Classifier;
use crate::clipboard::Clipboard;
use crate::error::{Error, Result};
use crate::model::ClassificationResult;
use crate::normalize::normalize;

/// How long the "copied" flag stays up after copying the suggestion.
pub const COPIED_DISPLAY_WINDOW: Duration = Duration::from_secs(2);

/// Handle to one classification session.
///
/// Cloning the handle shares the session.
#[derive(Debug)]
pub struct Session<C> {
    classifier: Arc<C>,
    state: Arc<watch::Sender<SessionState>>,
}

impl<C> Clone for Session<C> {
    fn clone(&self) -> Self {
        Self {
            classifier: Arc::clone(&self.classifier),
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: Classifier> Session<C> {
    /// Creates an idle session.
    #[must_use]
    pub fn new(classifier: C) -> Self {
        Self::from_shared(Arc::new(classifier))
    }

    /// Creates an idle session over a shared classifier.
    #[must_use]
    pub fn from_shared(classifier: Arc<C>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            classifier,
            state: Arc::new(state),
        }
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Returns a receiver that is notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Returns true while a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Submits a draft for classification.
    ///
    /// A draft without input (or with both text and a file) is ignored and the
    /// returned future resolves to [`SubmitStatus::Skipped`] without any
    /// network call. Otherwise the session moves to
    /// [`Phase::Submitting`] right away, before the returned future is polled,
    /// and the future performs the request and settles the session.
    ///
    /// Errors never escape: they end up as the session's error message.
    pub fn submit(
        &self,
        draft: RequestDraft,
    ) -> impl Future<Output = SubmitStatus> + Send + use<C> {
        let accepted = match draft.into_request() {
            Ok(request) => Some(self.begin(request)),
            Err(ValidationError::MissingInput) => {
                debug!("nothing to classify, submit ignored");
                None
            }
            Err(e @ ValidationError::AmbiguousInput) => {
                warn!(reason = %e, "submit ignored");
                None
            }
        };

        let classifier = Arc::clone(&self.classifier);
        let state = Arc::clone(&self.state);

        async move {
            let Some((request, generation)) = accepted else {
                return SubmitStatus::Skipped;
            };
            let outcome = classify(classifier.as_ref(), &request).await;
            settle(&state, generation, outcome)
        }
    }

    /// Resets the session to idle.
    ///
    /// Any result, error or copied flag is discarded and an in-flight request
    /// will not be applied. Input buffers belong to the adapter and must be
    /// cleared there. Clearing an idle session changes nothing.
    pub fn clear(&self) {
        let mut from = None;
        self.state.send_if_modified(|state| {
            if state.is_idle() && !state.copied {
                return false;
            }
            if state.is_loading() {
                state.generation += 1;
            }
            from = Some(state.phase.name());
            state.phase = Phase::Idle;
            state.copied = false;
            true
        });
        if let Some(from) = from {
            debug!(from, "session cleared");
        }
    }

    /// Copies the suggested response to `clipboard`.
    ///
    /// Returns `Ok(false)` without touching the clipboard unless the session
    /// holds a result. On success the copied flag is raised; see
    /// [`Session::expire_copied`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Clipboard`] if the clipboard write fails.
    pub fn copy_suggestion<B: Clipboard + ?Sized>(&self, clipboard: &mut B) -> Result<bool> {
        let Some(suggestion) = self
            .state
            .borrow()
            .result()
            .map(|result| result.suggested_response.clone())
        else {
            return Ok(false);
        };

        if let Err(e) = clipboard.set_text(&suggestion) {
            warn!(error = %e, "failed to copy suggestion");
            return Err(Error::Clipboard(e));
        }

        self.state.send_modify(|state| {
            state.copied = true;
            state.copy_generation += 1;
        });
        debug!(chars = suggestion.chars().count(), "suggestion copied");
        Ok(true)
    }

    /// Lowers the copied flag after [`COPIED_DISPLAY_WINDOW`].
    ///
    /// A copy made while waiting keeps the flag up; that copy's own
    /// `expire_copied` lowers it later.
    pub fn expire_copied(&self) -> impl Future<Output = ()> + Send + use<C> {
        let state = Arc::clone(&self.state);
        let copy_generation = state.borrow().copy_generation;

        async move {
            tokio::time::sleep(COPIED_DISPLAY_WINDOW).await;
            state.send_if_modified(|state| {
                if state.copied && state.copy_generation == copy_generation {
                    state.copied = false;
                    true
                } else {
                    false
                }
            });
        }
    }

    /// Lowers the copied flag immediately.
    pub fn dismiss_copied(&self) {
        self.state.send_if_modified(|state| std::mem::take(&mut state.copied));
    }

    /// Moves to `Submitting` and returns the request with its generation.
    fn begin(&self, request: ClassificationRequest) -> (ClassificationRequest, u64) {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.phase = Phase::Submitting;
            state.copied = false;
            generation = state.generation;
        });
        debug!(generation, endpoint = ?request.endpoint(), "submission started");
        (request, generation)
    }
}

async fn classify<C: Classifier>(
    classifier: &C,
    request: &ClassificationRequest,
) -> Result<ClassificationResult> {
    let raw = classifier.classify(request).await?;
    normalize(raw, request.submitted_text())
}

/// Stores an outcome if its submission is still the latest one.
fn settle(
    state: &watch::Sender<SessionState>,
    generation: u64,
    outcome: Result<ClassificationResult>,
) -> SubmitStatus {
    match &outcome {
        Ok(result) => info!(
            generation,
            category = %result.category,
            confidence = result.confidence,
            "classification succeeded"
        ),
        Err(e) => warn!(generation, kind = e.kind(), error = %e, "classification failed"),
    }

    let applied = state.send_if_modified(|state| {
        if state.generation != generation || !state.is_loading() {
            return false;
        }
        state.phase = match outcome {
            Ok(result) => Phase::Success(result),
            Err(e) => Phase::Failed(e.user_message()),
        };
        true
    });

    if applied {
        SubmitStatus::Settled
    } else {
        let phase = state.borrow().phase().name();
        debug!(generation, phase, "outcome superseded, dropped");
        SubmitStatus::Superseded
    }
}
