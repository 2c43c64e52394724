use chrono::{DateTime, Utc};

/// Metadata for a single conversation, as shown in the conversation list.
///
/// Conversations are created client-side with a provisional id the moment
/// the first message is sent; the id is rewritten once the server assigns
/// the canonical one (see `ConversationStore::reconcile_id`).
#[derive(Clone, Debug)]
pub struct Conversation {
    id: String,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    message_count: usize,
    provisional: bool,
}

impl Conversation {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            created_at: Utc::now(),
            updated_at: None,
            message_count: 0,
            provisional: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn message_count(&self) -> usize {
        self.message_count
    }

    /// Whether the id is still the locally generated one.
    pub fn is_provisional(&self) -> bool {
        self.provisional
    }

    pub(crate) fn reconcile(&mut self, canonical_id: String) {
        self.id = canonical_id;
        self.provisional = false;
        self.touch();
    }

    pub(crate) fn bump_message_count(&mut self, by: usize) {
        self.message_count += by;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
