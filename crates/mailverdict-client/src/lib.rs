//! # mailverdict-client
//!
//! HTTP client for the `MailVerdict` email classification service.
//!
//! ## Features
//!
//! - **Two endpoints**: JSON for pasted text, multipart for uploaded files
//! - **Typed responses**: success bodies are decoded into a tagged
//!   [`RawResponse`] according to the endpoint that was called
//! - **Error mapping**: non-success statuses surface the service's `detail`
//!   message, or a fixed fallback per endpoint
//! - **Locale mapping**: UI language codes are mapped to service locale tags
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailverdict_client::{ClassificationClient, ClientConfig, RequestDraft};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClassificationClient::new(ClientConfig::new("http://localhost:8000")?)?;
//!
//!     let request = RequestDraft::text("Meeting at 10am, please confirm")
//!         .with_language("en")
//!         .into_request()?;
//!
//!     let response = client.classify(&request).await?;
//!     println!("{}", response.fields().category);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
pub mod config;
mod error;
pub mod locale;
pub mod request;
pub mod response;

pub use client::ClassificationClient;
pub use config::{API_URL_ENV, ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result, ValidationError};
pub use locale::{Language, map_locale};
pub use request::{ClassificationRequest, Endpoint, FileUpload, RequestDraft};
pub use response::{Category, ClassificationFields, FileClassification, RawResponse};
