use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A cited excerpt from a document, attached to an assistant message.
///
/// Immutable once attached. The owning `document_id` is a display-only
/// snapshot: deleting the document later does not invalidate sources that
/// were already rendered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    pub content: String,
    /// Relevance in [0, 1], as scored by retrieval.
    pub score: f64,
    #[serde(rename = "documentId")]
    pub document_id: String,
}

/// One entry in a conversation's append-only message sequence.
///
/// Content is fixed at construction; there are no mutating accessors.
/// Sources keep the order retrieval returned them in (descending
/// relevance) and are never re-sorted client-side.
#[derive(Clone, Debug)]
pub struct Message {
    id: String,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
    sources: Vec<Source>,
    author_name: Option<String>,
    author_avatar: Option<String>,
}

impl Message {
    /// Build a user message with a locally generated id, for optimistic
    /// insertion before any network interaction.
    pub fn user(content: String) -> Self {
        Self {
            id: format!("msg-{}", uuid::Uuid::new_v4()),
            role: Role::User,
            content,
            created_at: Utc::now(),
            sources: Vec::new(),
            author_name: None,
            author_avatar: None,
        }
    }

    /// Build an assistant message from a completed retrieval+generation
    /// round trip. The id is the server's.
    pub fn assistant(id: String, content: String, sources: Vec<Source>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content,
            created_at: Utc::now(),
            sources,
            author_name: None,
            author_avatar: None,
        }
    }

    pub fn with_author(mut self, name: Option<String>, avatar: Option<String>) -> Self {
        self.author_name = name;
        self.author_avatar = avatar;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author_name.as_deref()
    }

    pub fn author_avatar(&self) -> Option<&str> {
        self.author_avatar.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_has_no_sources() {
        let msg = Message::user("How does retrieval work?".to_string());
        assert_eq!(msg.role(), Role::User);
        assert!(msg.sources().is_empty());
        assert!(msg.id().starts_with("msg-"));
    }

    #[test]
    fn test_assistant_message_keeps_source_order() {
        let sources = vec![
            Source {
                id: "s1".into(),
                title: "Intro".into(),
                page: Some(12),
                content: "excerpt".into(),
                score: 0.92,
                document_id: "doc-1".into(),
            },
            Source {
                id: "s2".into(),
                title: "Advanced".into(),
                page: None,
                content: "excerpt".into(),
                score: 0.87,
                document_id: "doc-2".into(),
            },
        ];
        let msg = Message::assistant("srv-1".into(), "answer".into(), sources);
        assert_eq!(msg.sources()[0].id, "s1");
        assert_eq!(msg.sources()[1].id, "s2");
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
