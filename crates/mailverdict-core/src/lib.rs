//! # mailverdict-core
//!
//! Core logic for the `MailVerdict` email classifier.
//!
//! This crate provides:
//! - **Session** - the submit/clear lifecycle of one classifier, observable
//!   through a watch channel
//! - **Normalization** - one [`ClassificationResult`] out of the service's text
//!   and file payloads
//! - **Clipboard** - an injected capability for copying the suggested reply
//!
//! HTTP concerns live in `mailverdict-client`; the types needed to drive a
//! session are re-exported here.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod classifier;
pub mod clipboard;
mod error;
pub mod model;
mod normalize;
pub mod session;

pub use classifier::Classifier;
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use error::{Error, Result};
pub use model::{ClassificationResult, ExtractedFile};
pub use normalize::normalize;
pub use session::{COPIED_DISPLAY_WINDOW, Phase, Session, SessionState, SubmitStatus};

pub use mailverdict_client::{
    Category, ClassificationClient, ClassificationRequest, ClientConfig, FileUpload, Language,
    RawResponse, RequestDraft,
};
