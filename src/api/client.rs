use std::future::Future;
use std::pin::Pin;

use super::error::ApiResult;
use super::types::{
    DocumentRecord, DocumentStatusReport, FeedbackRequest, FeedbackResponse, ReprocessAck,
    SendMessageRequest, SendMessageResponse, UploadRequest,
};
use crate::documents::models::Tag;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Client trait over the knowledge-base REST API.
///
/// Transport (and everything behind it — retrieval, ranking, ingestion
/// workers, storage) is an external collaborator. Implementations never
/// touch client-side stores; the session and controllers own all state
/// mutation. The state machines above this seam are identical whether the
/// latency is real (`HttpApiClient`) or simulated (`MockApiClient`).
pub trait KnowledgeBaseApi: Send + Sync + 'static {
    /// Run one retrieval+generation round trip.
    fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> BoxFuture<'static, ApiResult<SendMessageResponse>>;

    /// Record a feedback verdict for an assistant message.
    fn submit_feedback(
        &self,
        request: FeedbackRequest,
    ) -> BoxFuture<'static, ApiResult<FeedbackResponse>>;

    /// Start ingesting a new file; resolves once the upload is accepted,
    /// not when ingestion completes.
    fn upload_document(
        &self,
        request: UploadRequest,
    ) -> BoxFuture<'static, ApiResult<DocumentRecord>>;

    /// Ask the pipeline to re-ingest a failed document.
    fn reprocess_document(&self, id: &str) -> BoxFuture<'static, ApiResult<ReprocessAck>>;

    /// Poll one document's ingestion status.
    fn document_status(&self, id: &str) -> BoxFuture<'static, ApiResult<DocumentStatusReport>>;

    fn list_documents(&self) -> BoxFuture<'static, ApiResult<Vec<DocumentRecord>>>;

    fn list_tags(&self) -> BoxFuture<'static, ApiResult<Vec<Tag>>>;

    fn delete_document(&self, id: &str) -> BoxFuture<'static, ApiResult<()>>;
}
