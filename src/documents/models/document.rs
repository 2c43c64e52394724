use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ingestion lifecycle status.
///
/// `pending` is only ever observed on server records (a queued ingestion
/// the worker has not picked up yet); the client itself never sets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Processed,
    Failed,
}

impl DocumentStatus {
    /// The exhaustive ingestion transition table. `failed → processing` is
    /// the user-triggered reprocess; the other two are pipeline signals.
    /// Everything else, including anything out of `pending` or `processed`,
    /// is not a transition.
    pub fn may_transition_to(self, next: DocumentStatus) -> bool {
        matches!(
            (self, next),
            (DocumentStatus::Processing, DocumentStatus::Processed)
                | (DocumentStatus::Processing, DocumentStatus::Failed)
                | (DocumentStatus::Failed, DocumentStatus::Processing)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    /// Display token (hex color or theme name); opaque to this crate.
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A document in the knowledge base.
///
/// Tags are referenced by id and resolved against the registry's shared tag
/// set — a document never owns tag entities. Status changes go through the
/// registry so the transition table is enforced in one place.
#[derive(Clone, Debug)]
pub struct Document {
    id: String,
    title: String,
    description: Option<String>,
    file_name: String,
    file_size: u64,
    mime_type: String,
    status: DocumentStatus,
    /// Ingestion error detail, set alongside `Failed` and cleared when a
    /// reprocess is accepted.
    last_error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_id: Option<String>,
    tag_ids: BTreeSet<String>,
    provisional: bool,
}

impl Document {
    /// Build the optimistic document for a fresh upload: provisional id,
    /// status `processing`, title defaulting to the file's base name.
    pub fn new_upload(
        file_name: String,
        file_size: u64,
        mime_type: String,
        title: Option<String>,
        description: Option<String>,
        tag_ids: BTreeSet<String>,
    ) -> Self {
        let title = title.filter(|t| !t.trim().is_empty()).unwrap_or_else(|| {
            Path::new(&file_name)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(&file_name)
                .to_string()
        });
        let now = Utc::now();

        Self {
            id: format!("doc-{}", uuid::Uuid::new_v4()),
            title,
            description,
            file_name,
            file_size,
            mime_type,
            status: DocumentStatus::Processing,
            last_error: None,
            created_at: now,
            updated_at: now,
            user_id: None,
            tag_ids,
            provisional: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn tag_ids(&self) -> &BTreeSet<String> {
        &self.tag_ids
    }

    pub fn is_provisional(&self) -> bool {
        self.provisional
    }

    pub(crate) fn set_tags(&mut self, tag_ids: BTreeSet<String>) {
        self.tag_ids = tag_ids;
        self.touch();
    }

    pub(crate) fn remove_tag(&mut self, tag_id: &str) {
        if self.tag_ids.remove(tag_id) {
            self.touch();
        }
    }

    /// Apply a requested status transition. Illegal transitions are a
    /// no-op and return false. The error detail is adopted only when the
    /// new status is `failed` and cleared when a reprocess is accepted.
    pub(crate) fn apply_transition(
        &mut self,
        next: DocumentStatus,
        error: Option<String>,
    ) -> bool {
        if !self.status.may_transition_to(next) {
            return false;
        }
        self.status = next;
        self.last_error = match next {
            DocumentStatus::Failed => error,
            _ => None,
        };
        self.touch();
        true
    }

    pub(crate) fn reconcile(&mut self, canonical_id: String, user_id: Option<String>) {
        self.id = canonical_id;
        if user_id.is_some() {
            self.user_id = user_id;
        }
        self.provisional = false;
        self.touch();
    }

    /// Construct from a server record; the record's status is adopted
    /// verbatim (this is the only path by which `pending` enters).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_server(
        id: String,
        title: String,
        description: Option<String>,
        file_name: String,
        file_size: u64,
        mime_type: String,
        status: DocumentStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        user_id: Option<String>,
        tag_ids: BTreeSet<String>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            file_name,
            file_size,
            mime_type,
            status,
            last_error: None,
            created_at,
            updated_at,
            user_id,
            tag_ids,
            provisional: false,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
