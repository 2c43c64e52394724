//! Client-side session core for a document-grounded AI assistant.
//!
//! Owns the state with real ordering and lifecycle concerns — the chat
//! conversation (optimistic inserts, reply correlation, one-shot feedback)
//! and the document ingestion pipeline (`pending → processing →
//! {processed, failed}` with user-triggered reprocessing). The REST API is
//! an external collaborator behind [`api::KnowledgeBaseApi`]; rendering is
//! somebody else's problem, fed by store snapshots, events, and
//! notifications.

pub mod api;
pub mod chat;
pub mod documents;
pub mod notifications;
pub mod session;

pub use api::{HttpApiClient, KnowledgeBaseApi, MockApiClient};
pub use chat::ConversationSession;
pub use documents::DocumentIngestionController;
pub use notifications::{Notification, NotificationLevel, NotificationStore};
pub use session::SessionContext;
