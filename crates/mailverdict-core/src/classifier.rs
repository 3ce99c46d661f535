//! The seam between the session and the classification service.

use std::future::Future;

use mailverdict_client::{ClassificationClient, ClassificationRequest, RawResponse};

/// Something that can classify a request.
///
/// Implemented by [`ClassificationClient`]; tests and alternative transports
/// provide their own.
pub trait Classifier: Send + Sync {
    /// Sends one request and returns the decoded, endpoint-tagged response.
    fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> impl Future<Output = mailverdict_client::Result<RawResponse>> + Send;
}

impl Classifier for ClassificationClient {
    fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> impl Future<Output = mailverdict_client::Result<RawResponse>> + Send {
        Self::classify(self, request)
    }
}
