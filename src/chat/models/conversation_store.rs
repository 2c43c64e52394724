use tracing::debug;

use super::conversation::Conversation;
use super::message::Message;

/// Store for the conversation list and the active conversation's message
/// sequence.
///
/// The list is kept most-recent-first: new conversations are prepended.
/// Messages are an append-only sequence; entries are never reordered or
/// rewritten after insertion. The store does no locking of its own — the
/// owning session wraps it in a mutex and never holds the guard across a
/// suspension point.
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active_id: Option<String>,
    messages: Vec<Message>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: Vec::new(),
            active_id: None,
            messages: Vec::new(),
        }
    }

    /// Prepend a new conversation and make it active. The message sequence
    /// is reset for the fresh conversation.
    pub fn create_conversation(&mut self, id: String, title: String) {
        self.conversations.insert(0, Conversation::new(id.clone(), title));
        self.active_id = Some(id);
        self.messages.clear();
    }

    /// All conversations, most-recent-first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id() == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Switch the active conversation. Clears the message sequence; the
    /// caller is responsible for loading the new conversation's history.
    pub fn set_active(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.active_id = Some(id.to_string());
            self.messages.clear();
            true
        } else {
            false
        }
    }

    pub fn clear_active(&mut self) {
        self.active_id = None;
        self.messages.clear();
    }

    /// Append a message to the active conversation's sequence.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The active conversation's messages, in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn bump_message_count(&mut self, id: &str, by: usize) {
        if let Some(conv) = self.conversations.iter_mut().find(|c| c.id() == id) {
            conv.bump_message_count(by);
        }
    }

    /// Rewrite a provisional conversation id with the server-assigned
    /// canonical one, updating the active-id reference if it pointed at the
    /// provisional id. Returns whether anything was rewritten.
    pub fn reconcile_id(&mut self, provisional: &str, canonical: String) -> bool {
        let Some(conv) = self
            .conversations
            .iter_mut()
            .find(|c| c.id() == provisional && c.is_provisional())
        else {
            return false;
        };

        debug!(provisional = %provisional, canonical = %canonical, "Reconciling conversation id");
        conv.reconcile(canonical.clone());

        if self.active_id.as_deref() == Some(provisional) {
            self.active_id = Some(canonical);
        }
        true
    }

    /// Remove a conversation (explicit user deletion). If it was active,
    /// the store is left with no active conversation so the next send
    /// starts a fresh one.
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id() != id);
        let removed = self.conversations.len() != before;

        if removed && self.active_id.as_deref() == Some(id) {
            self.clear_active();
        }
        removed
    }

    pub fn count(&self) -> usize {
        self.conversations.len()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::models::message::Role;

    #[test]
    fn test_create_prepends_and_activates() {
        let mut store = ConversationStore::new();
        store.create_conversation("conv-1".into(), "First".into());
        store.create_conversation("conv-2".into(), "Second".into());

        assert_eq!(store.conversations()[0].id(), "conv-2");
        assert_eq!(store.conversations()[1].id(), "conv-1");
        assert_eq!(store.active_id(), Some("conv-2"));
        assert!(store.messages().is_empty());
    }

    #[test]
    fn test_messages_append_in_order() {
        let mut store = ConversationStore::new();
        store.create_conversation("conv-1".into(), "Chat".into());
        store.push_message(Message::user("one".into()));
        store.push_message(Message::assistant("srv-1".into(), "two".into(), vec![]));

        let messages = store.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), Role::User);
        assert_eq!(messages[1].role(), Role::Assistant);
    }

    #[test]
    fn test_bump_message_count() {
        let mut store = ConversationStore::new();
        store.create_conversation("conv-1".into(), "Chat".into());
        store.bump_message_count("conv-1", 2);

        let conv = store.get("conv-1").unwrap();
        assert_eq!(conv.message_count(), 2);
        assert!(conv.updated_at().is_some());
    }

    #[test]
    fn test_reconcile_rewrites_id_and_active_reference() {
        let mut store = ConversationStore::new();
        store.create_conversation("conv-local".into(), "Chat".into());

        assert!(store.reconcile_id("conv-local", "conv-srv".into()));
        assert_eq!(store.active_id(), Some("conv-srv"));
        assert!(store.get("conv-local").is_none());
        assert!(!store.get("conv-srv").unwrap().is_provisional());

        // a second reconcile against the old id finds nothing
        assert!(!store.reconcile_id("conv-local", "conv-other".into()));
    }

    #[test]
    fn test_delete_active_clears_selection() {
        let mut store = ConversationStore::new();
        store.create_conversation("conv-1".into(), "Chat".into());
        store.push_message(Message::user("hello".into()));

        assert!(store.delete_conversation("conv-1"));
        assert_eq!(store.active_id(), None);
        assert!(store.messages().is_empty());
        assert_eq!(store.count(), 0);
    }
}
