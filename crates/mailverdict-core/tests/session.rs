//! Integration tests for the classification session.
//!
//! A scripted classifier stands in for the HTTP client: each call takes the
//! next pending reply, and the test decides when (and in which order) the
//! replies arrive.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tokio_test::{assert_pending, assert_ready_eq, task};

use mailverdict_client::{ClassificationFields, Error as ClientError, FileClassification};
use mailverdict_core::{
    Category, ClassificationRequest, Classifier, Clipboard, ClipboardError, ExtractedFile,
    FileUpload, MemoryClipboard, Phase, RawResponse, RequestDraft, Session, SubmitStatus,
};

type Reply = mailverdict_client::Result<RawResponse>;

/// Classifier whose replies are fed by the test.
#[derive(Default)]
struct ScriptedClassifier {
    pending: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    requests: Mutex<Vec<ClassificationRequest>>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    /// Queues a reply slot and returns its sender.
    fn expect_call(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back(rx);
        tx
    }

    /// Queues a reply that is already available.
    fn reply_with(&self, reply: Reply) {
        let _ = self.expect_call().send(reply);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for ScriptedClassifier {
    fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> impl Future<Output = Reply> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let next = self.pending.lock().unwrap().pop_front();
        async move {
            let rx = next.expect("unexpected classify call");
            rx.await.expect("reply sender dropped")
        }
    }
}

struct BrokenClipboard;

impl Clipboard for BrokenClipboard {
    fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::new("no display"))
    }
}

fn session() -> (Session<ScriptedClassifier>, Arc<ScriptedClassifier>) {
    let classifier = Arc::new(ScriptedClassifier::default());
    (Session::from_shared(Arc::clone(&classifier)), classifier)
}

fn fields(category: Category, reply: &str) -> ClassificationFields {
    ClassificationFields {
        category,
        confidence: 0.92,
        suggested_response: reply.into(),
        reasoning: "Solicita ação objetiva.".into(),
        processed_at: "2024-01-01T10:00:00Z".into(),
    }
}

#[tokio::test]
async fn test_empty_submit_is_noop() {
    let (session, classifier) = session();
    let mut rx = session.subscribe();

    let status = session.submit(RequestDraft::new()).await;
    assert_eq!(status, SubmitStatus::Skipped);

    let status = session.submit(RequestDraft::text("")).await;
    assert_eq!(status, SubmitStatus::Skipped);

    assert!(session.snapshot().is_idle());
    assert_eq!(classifier.calls(), 0);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_ambiguous_submit_is_noop() {
    let (session, classifier) = session();
    let draft = RequestDraft::text("body").with_file(FileUpload::new("a.eml", "x"));

    assert_eq!(session.submit(draft).await, SubmitStatus::Skipped);
    assert!(session.snapshot().is_idle());
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn test_text_submission_succeeds() {
    let (session, classifier) = session();
    classifier.reply_with(Ok(RawResponse::Text(fields(Category::Productive, "Confirmado."))));

    let text = "Reunião às 10h, favor confirmar presença";
    let status = session.submit(RequestDraft::text(text).with_language("pt")).await;
    assert_eq!(status, SubmitStatus::Settled);

    let state = session.snapshot();
    let result = state.result().unwrap();
    assert_eq!(result.category, Category::Productive);
    assert_eq!(result.source_content, text);
    assert_eq!(result.suggested_response, "Confirmado.");
    assert_eq!(result.extracted_file, None);
    assert_eq!(state.error_message(), None);
    assert!(!state.is_loading());

    let sent = classifier.requests.lock().unwrap();
    assert_eq!(sent[0].locale(), Some("pt-BR"));
}

#[tokio::test]
async fn test_file_submission_uses_server_metadata() {
    let (session, classifier) = session();
    classifier.reply_with(Ok(RawResponse::File(FileClassification {
        filename: "notes.txt".into(),
        size: 128,
        content_extracted: "Please review the attached report.".into(),
        classification: fields(Category::Unproductive, "Thanks!"),
    })));

    let upload = FileUpload::new("notes.txt", vec![b'x'; 128]);
    let status = session.submit(RequestDraft::file(upload)).await;
    assert_eq!(status, SubmitStatus::Settled);

    let state = session.snapshot();
    let result = state.result().unwrap();
    assert_eq!(result.source_content, "Please review the attached report.");
    assert_eq!(
        result.extracted_file,
        Some(ExtractedFile {
            filename: "notes.txt".into(),
            size_bytes: 128,
        })
    );
}

#[tokio::test]
async fn test_service_error_detail_is_shown() {
    let (session, classifier) = session();
    classifier.reply_with(Err(ClientError::service(500, "model unavailable")));

    let status = session.submit(RequestDraft::text("hi")).await;
    assert_eq!(status, SubmitStatus::Settled);

    let state = session.snapshot();
    assert_eq!(state.phase(), &Phase::Failed("model unavailable".into()));
    assert_eq!(state.error_message(), Some("model unavailable"));
    assert!(state.result().is_none());
}

#[tokio::test]
async fn test_unusable_response_fails_submission() {
    let (session, classifier) = session();
    let mut bad = fields(Category::Productive, "ok");
    bad.confidence = 1.5;
    classifier.reply_with(Ok(RawResponse::Text(bad)));

    session.submit(RequestDraft::text("hi")).await;
    let state = session.snapshot();
    assert!(matches!(state.phase(), Phase::Failed(_)));
    assert!(state.result().is_none());
}

#[tokio::test]
async fn test_odd_timestamp_keeps_the_verdict() {
    let (session, classifier) = session();
    let mut reply = fields(Category::Unproductive, "Obrigado!");
    reply.processed_at = "2024-01-01T10:00:00+0000".into();
    classifier.reply_with(Ok(RawResponse::Text(reply)));

    session.submit(RequestDraft::text("Feliz natal!")).await;
    let state = session.snapshot();
    let result = state.result().unwrap();
    assert_eq!(result.category, Category::Unproductive);
    assert_eq!(result.processed_at.to_rfc3339(), "2024-01-01T10:00:00+00:00");

    let mut reply = fields(Category::Productive, "Ok.");
    reply.processed_at = "sometime".into();
    classifier.reply_with(Ok(RawResponse::Text(reply)));

    session.submit(RequestDraft::text("Status?")).await;
    assert_eq!(session.snapshot().result().unwrap().suggested_response, "Ok.");
}

#[tokio::test]
async fn test_submit_moves_to_submitting_before_polling() {
    let (session, classifier) = session();
    let reply = classifier.expect_call();
    assert_eq!(session.snapshot().phase().name(), "idle");

    let future = session.submit(RequestDraft::text("hi"));
    assert!(session.is_loading());
    assert_eq!(session.snapshot().phase().name(), "submitting");
    assert_eq!(session.snapshot().generation(), 1);

    let mut future = task::spawn(future);
    assert_pending!(future.poll());
    assert!(session.is_loading());

    reply
        .send(Ok(RawResponse::Text(fields(Category::Productive, "ok"))))
        .unwrap();
    assert_ready_eq!(future.poll(), SubmitStatus::Settled);
    assert!(session.snapshot().result().is_some());
    assert_eq!(session.snapshot().phase().name(), "success");
}

#[tokio::test]
async fn test_new_submit_discards_previous_result() {
    let (session, classifier) = session();
    classifier.reply_with(Err(ClientError::service(503, "busy")));
    session.submit(RequestDraft::text("first")).await;
    assert!(session.snapshot().error_message().is_some());

    let _reply = classifier.expect_call();
    let _pending = session.submit(RequestDraft::text("second"));

    let state = session.snapshot();
    assert!(state.is_loading());
    assert_eq!(state.error_message(), None);
    assert!(state.result().is_none());
}

#[tokio::test]
async fn test_latest_submission_wins_when_earlier_resolves_last() {
    let (session, classifier) = session();
    let first_reply = classifier.expect_call();
    let second_reply = classifier.expect_call();

    let mut first = task::spawn(session.submit(RequestDraft::text("first email")));
    assert_pending!(first.poll());
    let mut second = task::spawn(session.submit(RequestDraft::text("second email")));
    assert_pending!(second.poll());

    second_reply
        .send(Ok(RawResponse::Text(fields(Category::Unproductive, "second"))))
        .unwrap();
    assert_ready_eq!(second.poll(), SubmitStatus::Settled);

    first_reply
        .send(Ok(RawResponse::Text(fields(Category::Productive, "first"))))
        .unwrap();
    assert_ready_eq!(first.poll(), SubmitStatus::Superseded);

    let state = session.snapshot();
    let result = state.result().unwrap();
    assert_eq!(result.suggested_response, "second");
    assert_eq!(result.source_content, "second email");
    assert_eq!(classifier.calls(), 2);
}

#[tokio::test]
async fn test_stale_failure_does_not_overwrite_success() {
    let (session, classifier) = session();
    let first_reply = classifier.expect_call();
    classifier.reply_with(Ok(RawResponse::Text(fields(Category::Productive, "ok"))));

    let mut first = task::spawn(session.submit(RequestDraft::text("one")));
    assert_pending!(first.poll());
    assert_eq!(
        session.submit(RequestDraft::text("two")).await,
        SubmitStatus::Settled
    );

    first_reply
        .send(Err(ClientError::service(500, "late failure")))
        .unwrap();
    assert_ready_eq!(first.poll(), SubmitStatus::Superseded);
    assert!(session.snapshot().result().is_some());
}

#[tokio::test]
async fn test_clear_resets_and_is_idempotent() {
    let (session, classifier) = session();
    classifier.reply_with(Ok(RawResponse::Text(fields(Category::Productive, "ok"))));
    session.submit(RequestDraft::text("hi")).await;

    session.clear();
    let once = session.snapshot();
    session.clear();
    let twice = session.snapshot();

    assert_eq!(once, twice);
    assert!(twice.is_idle());
    assert!(twice.result().is_none());
    assert!(twice.error_message().is_none());
}

#[tokio::test]
async fn test_clear_drops_in_flight_outcome() {
    let (session, classifier) = session();
    let reply = classifier.expect_call();

    let mut pending = task::spawn(session.submit(RequestDraft::text("hi")));
    assert_pending!(pending.poll());
    session.clear();
    assert!(session.snapshot().is_idle());

    reply
        .send(Ok(RawResponse::Text(fields(Category::Productive, "ok"))))
        .unwrap();
    assert_ready_eq!(pending.poll(), SubmitStatus::Superseded);
    assert!(session.snapshot().is_idle());
}

#[tokio::test]
async fn test_subscribers_see_transitions() {
    let (session, classifier) = session();
    let mut rx = session.subscribe();
    classifier.reply_with(Ok(RawResponse::Text(fields(Category::Productive, "ok"))));

    let future = session.submit(RequestDraft::text("hi"));
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_loading());

    future.await;
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().result().is_some());
}

#[tokio::test]
async fn test_copy_suggestion() {
    let (session, classifier) = session();
    let mut clipboard = MemoryClipboard::new();

    assert!(!session.copy_suggestion(&mut clipboard).unwrap());
    assert_eq!(clipboard.contents(), None);

    classifier.reply_with(Ok(RawResponse::Text(fields(Category::Productive, "Confirmado."))));
    session.submit(RequestDraft::text("hi")).await;

    assert!(session.copy_suggestion(&mut clipboard).unwrap());
    assert_eq!(clipboard.contents(), Some("Confirmado."));
    assert!(session.snapshot().copied());

    session.dismiss_copied();
    assert!(!session.snapshot().copied());
}

#[tokio::test]
async fn test_copy_failure_is_reported() {
    let (session, classifier) = session();
    classifier.reply_with(Ok(RawResponse::Text(fields(Category::Productive, "ok"))));
    session.submit(RequestDraft::text("hi")).await;

    let err = session.copy_suggestion(&mut BrokenClipboard).unwrap_err();
    assert_eq!(err.kind(), "clipboard");
    assert!(!session.snapshot().copied());
}

#[tokio::test]
async fn test_copy_on_failed_session_is_noop() {
    let (session, classifier) = session();
    classifier.reply_with(Err(ClientError::service(500, "down")));
    session.submit(RequestDraft::text("hi")).await;

    let mut clipboard = MemoryClipboard::new();
    assert!(!session.copy_suggestion(&mut clipboard).unwrap());
    assert_eq!(clipboard.contents(), None);
}

#[tokio::test(start_paused = true)]
async fn test_copied_flag_expires_after_window() {
    let (session, classifier) = session();
    classifier.reply_with(Ok(RawResponse::Text(fields(Category::Productive, "ok"))));
    session.submit(RequestDraft::text("hi")).await;

    let mut clipboard = MemoryClipboard::new();
    session.copy_suggestion(&mut clipboard).unwrap();
    let expire = session.expire_copied();
    assert!(session.snapshot().copied());

    expire.await;
    assert!(!session.snapshot().copied());
}

#[tokio::test(start_paused = true)]
async fn test_recopy_keeps_flag_up() {
    let (session, classifier) = session();
    classifier.reply_with(Ok(RawResponse::Text(fields(Category::Productive, "ok"))));
    session.submit(RequestDraft::text("hi")).await;

    let mut clipboard = MemoryClipboard::new();
    session.copy_suggestion(&mut clipboard).unwrap();
    let first_expiry = session.expire_copied();

    session.copy_suggestion(&mut clipboard).unwrap();
    let second_expiry = session.expire_copied();

    first_expiry.await;
    assert!(session.snapshot().copied());

    second_expiry.await;
    assert!(!session.snapshot().copied());
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let (first, first_classifier) = session();
    let (second, _) = session();
    first_classifier.reply_with(Ok(RawResponse::Text(fields(Category::Productive, "ok"))));

    first.submit(RequestDraft::text("hi")).await;
    assert!(first.snapshot().result().is_some());
    assert!(second.snapshot().is_idle());
}
