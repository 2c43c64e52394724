//! End-to-end session flows against the canned API implementation.
//!
//! These tests drive the public crate surface the way an application shell
//! would: one session context, one conversation session, one ingestion
//! controller, all sharing the notification store.

use std::sync::Arc;

use ragdesk::api::types::UploadRequest;
use ragdesk::chat::models::{events, FeedbackVerdict, Role};
use ragdesk::documents::models::DocumentStatus;
use ragdesk::{
    ConversationSession, DocumentIngestionController, MockApiClient, NotificationStore,
    SessionContext,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ragdesk=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn build_session(
    api: &MockApiClient,
    notifications: NotificationStore,
) -> (ConversationSession, events::ChatEventReceiver) {
    let (tx, rx) = events::channel();
    let context = SessionContext::new(
        "http://localhost/api/v1".to_string(),
        "test-token".to_string(),
    );
    let session = ConversationSession::new(Arc::new(api.clone()), context, notifications, tx);
    (session, rx)
}

#[tokio::test]
async fn chat_and_ingestion_share_a_session() {
    init_tracing();

    let api = MockApiClient::new();
    let notifications = NotificationStore::default();
    let (session, _events) = build_session(&api, notifications.clone());
    let controller = DocumentIngestionController::new(Arc::new(api.clone()), notifications.clone());
    controller.hydrate().await.unwrap();

    // upload runs while the chat send is still possible — independent resources
    let doc_id = controller
        .upload(UploadRequest {
            file_name: "handbook.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: vec![0u8; 128],
            title: None,
            description: Some("Employee handbook".to_string()),
            tag_ids: vec!["tag-0".to_string()],
        })
        .await;

    session.send_message("What does RAG mean?").await;

    {
        let store = session.store();
        let store = store.lock();
        let messages = store.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role(), Role::Assistant);
        assert!(!messages[1].sources().is_empty());
    }

    // ingestion completes via a later status read
    api.set_document_status(&doc_id, DocumentStatus::Processed, 1.0, None);
    controller.poll_status(&doc_id).await;
    {
        let registry = controller.registry();
        let registry = registry.lock();
        assert_eq!(
            registry.get(&doc_id).unwrap().status(),
            DocumentStatus::Processed
        );
        assert_eq!(registry.get(&doc_id).unwrap().title(), "handbook");
    }

    // feedback on the assistant reply sticks, once
    let assistant_id = {
        let store = session.store();
        let store = store.lock();
        store.messages()[1].id().to_string()
    };
    session
        .submit_feedback(&assistant_id, FeedbackVerdict::Positive)
        .await;
    session
        .submit_feedback(&assistant_id, FeedbackVerdict::Negative)
        .await;
    assert_eq!(
        session.feedback().lock().verdict(&assistant_id),
        Some(FeedbackVerdict::Positive)
    );

    assert!(notifications.entries().is_empty());
}

#[tokio::test]
async fn failures_degrade_to_visible_state() {
    init_tracing();

    let api = MockApiClient::new();
    let notifications = NotificationStore::default();
    let (session, _events) = build_session(&api, notifications.clone());
    let controller = DocumentIngestionController::new(Arc::new(api.clone()), notifications.clone());

    api.fail_sends(true);
    session.send_message("hello there").await;

    api.fail_uploads(true);
    let doc_id = controller
        .upload(UploadRequest {
            file_name: "broken.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: vec![0u8; 16],
            title: None,
            description: None,
            tag_ids: Vec::new(),
        })
        .await;

    // both failures are visible, nothing crashed, partial state retained
    assert_eq!(notifications.error_count(), 2);
    {
        let store = session.store();
        let store = store.lock();
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].content(), "hello there");
    }
    {
        let registry = controller.registry();
        let registry = registry.lock();
        assert_eq!(
            registry.get(&doc_id).unwrap().status(),
            DocumentStatus::Failed
        );
    }

    // the failed upload is recoverable through the normal reprocess path
    api.fail_uploads(false);
    assert!(controller.reprocess(&doc_id).await);
    let registry = controller.registry();
    let registry = registry.lock();
    assert_eq!(
        registry.get(&doc_id).unwrap().status(),
        DocumentStatus::Processing
    );
}
