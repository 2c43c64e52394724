//! Wire shapes for the knowledge-base REST API. Field names follow the
//! server contract exactly; domain enums (`Role`, `DocumentStatus`,
//! `FeedbackVerdict`) serialize to the same lowercase strings the server
//! uses, so they double as their own wire representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::models::{FeedbackVerdict, Source};
use crate::documents::models::{DocumentStatus, Tag};

/// Body of `POST /chat/messages`.
#[derive(Clone, Debug, Serialize)]
pub struct SendMessageRequest {
    pub message: String,
    pub conversation_id: String,
    /// Omitted from the wire entirely when no filter is selected — "no
    /// filter" and "empty filter" must be indistinguishable server-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_filter: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SendMessageResponse {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub conversation_id: String,
}

/// Body of `POST /chat/feedback`.
#[derive(Clone, Debug, Serialize)]
pub struct FeedbackRequest {
    pub message_id: String,
    pub feedback_type: FeedbackVerdict,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FeedbackResponse {
    pub id: String,
    pub status: String,
}

/// Multipart payload for `POST /documents`. Tag ids are comma-joined into
/// a single `tags` field on the wire.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag_ids: Vec<String>,
}

/// Document record as returned by the documents endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// `GET /documents/{id}/status` — drives the ingestion state machine while
/// a document is `processing`.
#[derive(Clone, Debug, Deserialize)]
pub struct DocumentStatusReport {
    pub id: String,
    pub status: DocumentStatus,
    #[serde(default)]
    pub progress: f32,
    #[serde(default)]
    pub error: Option<String>,
}

/// Acknowledgement of `POST /documents/{id}/reprocess`. The actual status
/// change arrives via a later status read, not this body.
#[derive(Clone, Debug, Deserialize)]
pub struct ReprocessAck {
    pub id: String,
}

/// Standard list envelope used by the documents and tags endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_filter_absent_when_none() {
        let request = SendMessageRequest {
            message: "hello".into(),
            conversation_id: "conv-1".into(),
            context_filter: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("context_filter").is_none());
    }

    #[test]
    fn test_context_filter_present_when_selected() {
        let request = SendMessageRequest {
            message: "hello".into(),
            conversation_id: "conv-1".into(),
            context_filter: Some("tag-1".into()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["context_filter"], "tag-1");
    }

    #[test]
    fn test_feedback_request_wire_format() {
        let request = FeedbackRequest {
            message_id: "msg-1".into(),
            feedback_type: FeedbackVerdict::Positive,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["feedback_type"], "positive");
    }

    #[test]
    fn test_send_response_defaults_sources_to_empty() {
        let response: SendMessageResponse = serde_json::from_str(
            r#"{"id":"m1","content":"answer","conversation_id":"c1"}"#,
        )
        .unwrap();
        assert!(response.sources.is_empty());
    }
}
