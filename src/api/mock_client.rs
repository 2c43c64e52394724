use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use super::client::{BoxFuture, KnowledgeBaseApi};
use super::error::{ApiError, ApiResult};
use super::types::{
    DocumentRecord, DocumentStatusReport, FeedbackRequest, FeedbackResponse, ReprocessAck,
    SendMessageRequest, SendMessageResponse, UploadRequest,
};
use crate::chat::models::Source;
use crate::documents::models::{DocumentStatus, Tag};

/// Canned in-memory implementation of the API client.
///
/// Useful for testing and development: responses are generated from a small
/// set of topics, uploads are acknowledged with server-style records, and
/// failures or latency can be injected per operation. The session and
/// controllers run the exact same state machine against this as against
/// `HttpApiClient`.
#[derive(Clone)]
pub struct MockApiClient {
    state: Arc<MockState>,
}

struct MockState {
    counter: AtomicU64,
    tags: Mutex<Vec<Tag>>,
    documents: Mutex<Vec<DocumentRecord>>,
    statuses: Mutex<HashMap<String, DocumentStatusReport>>,
    conversation_ids: Mutex<HashMap<String, String>>,
    assign_server_ids: AtomicBool,
    upload_status: Mutex<DocumentStatus>,
    send_gate: Mutex<Option<Arc<Semaphore>>>,
    recorded_sends: Mutex<Vec<SendMessageRequest>>,
    recorded_feedback: Mutex<Vec<FeedbackRequest>>,
    recorded_uploads: Mutex<Vec<UploadRequest>>,
    fail_send: AtomicBool,
    fail_feedback: AtomicBool,
    fail_upload: AtomicBool,
    fail_reprocess: AtomicBool,
    fail_status: AtomicBool,
}

fn simulated_failure() -> ApiError {
    ApiError::Api {
        status: 500,
        detail: "simulated failure".to_string(),
    }
}

/// Topical response generator. Sources are attached only for the RAG topic.
fn generate_response(query: &str) -> (String, Vec<Source>) {
    let query = query.to_lowercase();

    if query.contains("rag") {
        return (
            "RAG (Retrieval-Augmented Generation) combines a retrieval system with a \
             generative model. It first retrieves relevant documents from a corpus and \
             then generates text based on both the query and the retrieved information."
                .to_string(),
            canned_sources(),
        );
    }
    if query.contains("hello") || query.contains("hi") {
        return (
            "Hello! How can I help you today? You can ask me questions about documents \
             in your knowledge base."
                .to_string(),
            Vec::new(),
        );
    }
    if query.contains("document") || query.contains("upload") {
        return (
            "You can upload documents through the Documents section. After uploading, \
             documents are processed and indexed to make their content searchable."
                .to_string(),
            Vec::new(),
        );
    }
    if query.contains("tag") {
        return (
            "Tags help you organize your documents and filter context when asking \
             questions. When chatting, you can select a tag to focus the assistant's \
             answers on documents with that tag."
                .to_string(),
            Vec::new(),
        );
    }
    (
        "I'm your knowledge-base assistant. Ask me questions about any uploaded \
         documents and I'll provide answers with source citations."
            .to_string(),
        Vec::new(),
    )
}

fn canned_sources() -> Vec<Source> {
    vec![
        Source {
            id: "source-1".into(),
            title: "Introduction to RAG".into(),
            page: Some(12),
            content: "RAG combines retrieval systems with generative AI models.".into(),
            score: 0.92,
            document_id: "doc-1".into(),
        },
        Source {
            id: "source-2".into(),
            title: "Advanced RAG Techniques".into(),
            page: Some(45),
            content: "Modern RAG systems often use vector databases for efficient retrieval."
                .into(),
            score: 0.87,
            document_id: "doc-2".into(),
        },
    ]
}

impl MockApiClient {
    pub fn new() -> Self {
        Self {
            state: Arc::new(MockState {
                counter: AtomicU64::new(0),
                tags: Mutex::new(Self::fixture_tags()),
                documents: Mutex::new(Vec::new()),
                statuses: Mutex::new(HashMap::new()),
                conversation_ids: Mutex::new(HashMap::new()),
                assign_server_ids: AtomicBool::new(false),
                upload_status: Mutex::new(DocumentStatus::Processing),
                send_gate: Mutex::new(None),
                recorded_sends: Mutex::new(Vec::new()),
                recorded_feedback: Mutex::new(Vec::new()),
                recorded_uploads: Mutex::new(Vec::new()),
                fail_send: AtomicBool::new(false),
                fail_feedback: AtomicBool::new(false),
                fail_upload: AtomicBool::new(false),
                fail_reprocess: AtomicBool::new(false),
                fail_status: AtomicBool::new(false),
            }),
        }
    }

    /// The development tag fixtures.
    pub fn fixture_tags() -> Vec<Tag> {
        ["#FF5733", "#33A8FF", "#33FF57", "#CB33FF", "#FFC533"]
            .iter()
            .enumerate()
            .map(|(i, color)| Tag {
                id: format!("tag-{i}"),
                name: format!("Tag {}", i + 1),
                color: color.to_string(),
                description: None,
            })
            .collect()
    }

    pub fn seed_tags(&self, tags: Vec<Tag>) {
        *self.state.tags.lock() = tags;
    }

    pub fn seed_documents(&self, documents: Vec<DocumentRecord>) {
        *self.state.documents.lock() = documents;
    }

    /// Make the mock hand out its own canonical conversation ids instead of
    /// echoing the client's provisional ones.
    pub fn assign_server_ids(&self) {
        self.state.assign_server_ids.store(true, Ordering::Relaxed);
    }

    /// Initial status reported on upload acknowledgements.
    pub fn set_upload_status(&self, status: DocumentStatus) {
        *self.state.upload_status.lock() = status;
    }

    pub fn set_document_status(
        &self,
        id: &str,
        status: DocumentStatus,
        progress: f32,
        error: Option<String>,
    ) {
        self.state.statuses.lock().insert(
            id.to_string(),
            DocumentStatusReport {
                id: id.to_string(),
                status,
                progress,
                error,
            },
        );
    }

    /// Hold every send until a permit is added to the semaphore, so tests
    /// can observe the in-flight window deterministically.
    pub fn gate_sends(&self, gate: Arc<Semaphore>) {
        *self.state.send_gate.lock() = Some(gate);
    }

    pub fn fail_sends(&self, fail: bool) {
        self.state.fail_send.store(fail, Ordering::Relaxed);
    }

    pub fn fail_feedback(&self, fail: bool) {
        self.state.fail_feedback.store(fail, Ordering::Relaxed);
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.state.fail_upload.store(fail, Ordering::Relaxed);
    }

    pub fn fail_reprocess(&self, fail: bool) {
        self.state.fail_reprocess.store(fail, Ordering::Relaxed);
    }

    pub fn fail_status(&self, fail: bool) {
        self.state.fail_status.store(fail, Ordering::Relaxed);
    }

    pub fn sent_requests(&self) -> Vec<SendMessageRequest> {
        self.state.recorded_sends.lock().clone()
    }

    pub fn feedback_requests(&self) -> Vec<FeedbackRequest> {
        self.state.recorded_feedback.lock().clone()
    }

    pub fn uploads(&self) -> Vec<UploadRequest> {
        self.state.recorded_uploads.lock().clone()
    }

    fn canonical_conversation_id(state: &MockState, requested: &str) -> String {
        if !state.assign_server_ids.load(Ordering::Relaxed) {
            return requested.to_string();
        }

        let mut map = state.conversation_ids.lock();
        if let Some(canonical) = map.get(requested) {
            return canonical.clone();
        }
        if map.values().any(|v| v == requested) {
            // already the canonical id
            return requested.to_string();
        }
        let canonical = format!("conv-srv-{}", state.counter.fetch_add(1, Ordering::Relaxed));
        map.insert(requested.to_string(), canonical.clone());
        canonical
    }
}

impl Default for MockApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBaseApi for MockApiClient {
    fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> BoxFuture<'static, ApiResult<SendMessageResponse>> {
        let state = self.state.clone();

        Box::pin(async move {
            let gate = state.send_gate.lock().clone();
            if let Some(gate) = gate {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
            }

            if state.fail_send.load(Ordering::Relaxed) {
                return Err(simulated_failure());
            }

            state.recorded_sends.lock().push(request.clone());

            let conversation_id =
                MockApiClient::canonical_conversation_id(&state, &request.conversation_id);
            let (content, sources) = generate_response(&request.message);

            Ok(SendMessageResponse {
                id: format!("msg-srv-{}", state.counter.fetch_add(1, Ordering::Relaxed)),
                content,
                sources,
                conversation_id,
            })
        })
    }

    fn submit_feedback(
        &self,
        request: FeedbackRequest,
    ) -> BoxFuture<'static, ApiResult<FeedbackResponse>> {
        let state = self.state.clone();

        Box::pin(async move {
            if state.fail_feedback.load(Ordering::Relaxed) {
                return Err(simulated_failure());
            }

            state.recorded_feedback.lock().push(request.clone());

            Ok(FeedbackResponse {
                id: format!("fb-{}", state.counter.fetch_add(1, Ordering::Relaxed)),
                status: "recorded".to_string(),
            })
        })
    }

    fn upload_document(
        &self,
        request: UploadRequest,
    ) -> BoxFuture<'static, ApiResult<DocumentRecord>> {
        let state = self.state.clone();

        Box::pin(async move {
            if state.fail_upload.load(Ordering::Relaxed) {
                return Err(simulated_failure());
            }

            state.recorded_uploads.lock().push(request.clone());

            let title = request
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| {
                    Path::new(&request.file_name)
                        .file_stem()
                        .and_then(|stem| stem.to_str())
                        .unwrap_or(&request.file_name)
                        .to_string()
                });
            let tags: Vec<Tag> = {
                let known = state.tags.lock();
                request
                    .tag_ids
                    .iter()
                    .filter_map(|id| known.iter().find(|t| &t.id == id).cloned())
                    .collect()
            };
            let now = Utc::now();

            let record = DocumentRecord {
                id: format!("doc-srv-{}", state.counter.fetch_add(1, Ordering::Relaxed)),
                title,
                description: request.description.clone(),
                file_name: request.file_name.clone(),
                file_size: request.bytes.len() as u64,
                mime_type: request.mime_type.clone(),
                status: *state.upload_status.lock(),
                created_at: now,
                updated_at: now,
                user_id: Some("user-1".to_string()),
                tags,
            };

            state.documents.lock().insert(0, record.clone());
            Ok(record)
        })
    }

    fn reprocess_document(&self, id: &str) -> BoxFuture<'static, ApiResult<ReprocessAck>> {
        let state = self.state.clone();
        let id = id.to_string();

        Box::pin(async move {
            if state.fail_reprocess.load(Ordering::Relaxed) {
                return Err(simulated_failure());
            }
            Ok(ReprocessAck { id })
        })
    }

    fn document_status(&self, id: &str) -> BoxFuture<'static, ApiResult<DocumentStatusReport>> {
        let state = self.state.clone();
        let id = id.to_string();

        Box::pin(async move {
            if state.fail_status.load(Ordering::Relaxed) {
                return Err(simulated_failure());
            }

            let report = state.statuses.lock().get(&id).cloned();
            Ok(report.unwrap_or(DocumentStatusReport {
                id,
                status: DocumentStatus::Processed,
                progress: 1.0,
                error: None,
            }))
        })
    }

    fn list_documents(&self) -> BoxFuture<'static, ApiResult<Vec<DocumentRecord>>> {
        let state = self.state.clone();
        Box::pin(async move { Ok(state.documents.lock().clone()) })
    }

    fn list_tags(&self) -> BoxFuture<'static, ApiResult<Vec<Tag>>> {
        let state = self.state.clone();
        Box::pin(async move { Ok(state.tags.lock().clone()) })
    }

    fn delete_document(&self, id: &str) -> BoxFuture<'static, ApiResult<()>> {
        let state = self.state.clone();
        let id = id.to_string();

        Box::pin(async move {
            state.documents.lock().retain(|d| d.id != id);
            Ok(())
        })
    }
}
