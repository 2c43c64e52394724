use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::api::client::KnowledgeBaseApi;
use crate::api::types::{DocumentRecord, UploadRequest};
use crate::documents::models::{Document, DocumentRegistry, DocumentStatus};
use crate::notifications::{NotificationLevel, NotificationStore};

/// Orchestrates the document side of the session: upload with optimistic
/// registry insertion, the ingestion status state machine, and
/// user-triggered reprocessing.
///
/// Status changes funnel through `DocumentRegistry::apply_status`, which
/// enforces the transition table — a misbehaving caller can at worst cause
/// a no-op, never a corrupt state. Uploads are independent resources:
/// several may run concurrently with each other and with chat sends.
#[derive(Clone)]
pub struct DocumentIngestionController {
    api: Arc<dyn KnowledgeBaseApi>,
    registry: Arc<Mutex<DocumentRegistry>>,
    notifications: NotificationStore,
}

impl DocumentIngestionController {
    pub fn new(api: Arc<dyn KnowledgeBaseApi>, notifications: NotificationStore) -> Self {
        Self {
            api,
            registry: Arc::new(Mutex::new(DocumentRegistry::new())),
            notifications,
        }
    }

    pub fn registry(&self) -> Arc<Mutex<DocumentRegistry>> {
        self.registry.clone()
    }

    /// Populate the registry from the server: tag set first, then the
    /// document list (insert-or-replace by id, so hydrating twice is safe).
    /// A missing tag list is tolerated — uploads then resolve against an
    /// empty set; a missing document list is an error for the caller.
    pub async fn hydrate(&self) -> Result<()> {
        match self.api.list_tags().await {
            Ok(tags) => {
                debug!(count = tags.len(), "Loaded tags");
                self.registry.lock().set_tags(tags);
            }
            Err(error) => warn!(error = %error, "Failed to load tags"),
        }

        let records = self
            .api
            .list_documents()
            .await
            .context("Failed to load documents")?;
        info!(count = records.len(), "Loaded documents");

        let mut registry = self.registry.lock();
        for record in records {
            let document = document_from_record(&mut registry, record);
            registry.upsert(document);
        }
        Ok(())
    }

    /// Start ingesting a new file.
    ///
    /// The document is constructed with status `processing` and prepended
    /// to the registry before the request is dispatched, so it appears at
    /// the head of the list immediately. Only the initiating request is
    /// awaited — completion arrives later via `poll_status`. Returns the
    /// document's id (canonical when the upload was accepted, provisional
    /// when it failed).
    pub async fn upload(&self, request: UploadRequest) -> String {
        let (provisional_id, resolved_tags) = {
            let mut registry = self.registry.lock();
            let tag_ids = registry.resolve_tag_ids(&request.tag_ids);
            let document = Document::new_upload(
                request.file_name.clone(),
                request.bytes.len() as u64,
                request.mime_type.clone(),
                request.title.clone(),
                request.description.clone(),
                tag_ids.clone(),
            );
            let id = document.id().to_string();
            registry.prepend(document);
            (id, tag_ids)
        };
        info!(document_id = %provisional_id, file_name = %request.file_name, "Upload started");

        // the wire carries the resolved set only
        let request = UploadRequest {
            tag_ids: resolved_tags.into_iter().collect(),
            ..request
        };

        match self.api.upload_document(request).await {
            Ok(record) => {
                let canonical_id = record.id.clone();
                let mut registry = self.registry.lock();
                registry.reconcile_document_id(
                    &provisional_id,
                    canonical_id.clone(),
                    record.user_id.clone(),
                );
                for tag in &record.tags {
                    registry.upsert_tag(tag.clone());
                }
                // Adopt the server's initial status where the table allows
                // it; a `pending` acknowledgement leaves the optimistic
                // `processing` in place until the next status read.
                registry.apply_status(&canonical_id, record.status, None);
                canonical_id
            }
            Err(error) => {
                warn!(document_id = %provisional_id, error = %error, "Upload failed");
                self.registry.lock().apply_status(
                    &provisional_id,
                    DocumentStatus::Failed,
                    Some(error.to_string()),
                );
                self.notifications
                    .push(NotificationLevel::Error, "Failed to upload document");
                provisional_id
            }
        }
    }

    /// Restart ingestion for a failed document. A no-op for any other
    /// status — including a reprocess already in flight, which makes
    /// concurrent invocation idempotent. Returns whether a reprocess was
    /// started.
    pub async fn reprocess(&self, document_id: &str) -> bool {
        let prior_error = {
            let mut registry = self.registry.lock();
            let current = registry
                .get(document_id)
                .map(|doc| (doc.status(), doc.last_error().map(str::to_string)));
            match current {
                Some((DocumentStatus::Failed, prior)) => {
                    registry.apply_status(document_id, DocumentStatus::Processing, None);
                    prior
                }
                Some((status, _)) => {
                    debug!(document_id = %document_id, ?status, "Reprocess ignored");
                    return false;
                }
                None => {
                    debug!(document_id = %document_id, "Reprocess ignored: unknown document");
                    return false;
                }
            }
        };
        info!(document_id = %document_id, "Reprocess started");

        if let Err(error) = self.api.reprocess_document(document_id).await {
            warn!(document_id = %document_id, error = %error, "Reprocess request failed");
            self.registry.lock().apply_status(
                document_id,
                DocumentStatus::Failed,
                prior_error.or_else(|| Some(error.to_string())),
            );
            self.notifications
                .push(NotificationLevel::Error, "Failed to reprocess document");
        }
        true
    }

    /// Read one document's ingestion status and advance the state machine.
    /// Poll failures are left for the next cycle; illegal reported
    /// transitions are ignored.
    pub async fn poll_status(&self, document_id: &str) {
        match self.api.document_status(document_id).await {
            Ok(report) => {
                debug!(
                    document_id = %document_id,
                    status = ?report.status,
                    progress = report.progress,
                    "Status report"
                );
                self.registry
                    .lock()
                    .apply_status(document_id, report.status, report.error);
            }
            Err(error) => {
                warn!(document_id = %document_id, error = %error, "Status poll failed");
            }
        }
    }

    /// Remove a document from the registry and the server. Source
    /// citations already attached to messages keep their snapshot.
    pub async fn delete(&self, document_id: &str) {
        let removed = self.registry.lock().remove_document(document_id);
        if !removed {
            debug!(document_id = %document_id, "Delete ignored: unknown document");
            return;
        }

        if let Err(error) = self.api.delete_document(document_id).await {
            warn!(document_id = %document_id, error = %error, "Delete request failed");
            self.notifications
                .push(NotificationLevel::Error, "Failed to delete document");
        }
    }
}

/// Convert a server record into a registry document, upserting the tag
/// entities it carries so documents only ever hold tag ids.
fn document_from_record(registry: &mut DocumentRegistry, record: DocumentRecord) -> Document {
    for tag in &record.tags {
        registry.upsert_tag(tag.clone());
    }
    Document::from_server(
        record.id,
        record.title,
        record.description,
        record.file_name,
        record.file_size,
        record.mime_type,
        record.status,
        record.created_at,
        record.updated_at,
        record.user_id,
        record.tags.iter().map(|t| t.id.clone()).collect(),
    )
}
