use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::document::{Document, DocumentStatus, Tag};

/// Registry owning the document set and the shared tag set.
///
/// Documents are kept newest-first. Tag entities live only here; documents
/// reference them by id, so tag and document lifecycles stay decoupled —
/// deleting a tag strips the association and nothing else. Like the
/// conversation store, the registry does no locking of its own.
pub struct DocumentRegistry {
    documents: Vec<Document>,
    tags: HashMap<String, Tag>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            tags: HashMap::new(),
        }
    }

    /// Documents, newest-first.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id() == id)
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.get(id)
    }

    pub fn tags(&self) -> Vec<&Tag> {
        self.tags.values().collect()
    }

    /// Replace the tag set (hydration from the server).
    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        self.tags = tags.into_iter().map(|t| (t.id.clone(), t)).collect();
    }

    pub fn upsert_tag(&mut self, tag: Tag) {
        self.tags.insert(tag.id.clone(), tag);
    }

    /// Delete a tag entity and strip it from every document's tag set.
    /// Documents themselves are never deleted here.
    pub fn remove_tag(&mut self, tag_id: &str) -> bool {
        let removed = self.tags.remove(tag_id).is_some();
        if removed {
            for doc in &mut self.documents {
                doc.remove_tag(tag_id);
            }
        }
        removed
    }

    /// Keep only ids that resolve against the current tag set. Unresolvable
    /// ids are dropped — they cannot correspond to real tags client-side.
    pub fn resolve_tag_ids(&self, ids: &[String]) -> BTreeSet<String> {
        ids.iter()
            .filter(|id| self.tags.contains_key(*id))
            .cloned()
            .collect()
    }

    /// Prepend an optimistically constructed document.
    pub fn prepend(&mut self, document: Document) {
        self.documents.insert(0, document);
    }

    /// Insert-or-replace a server-sourced document by id, preserving list
    /// position on replace. Used by hydration so repeated loads do not
    /// duplicate entries.
    pub fn upsert(&mut self, document: Document) {
        match self.documents.iter_mut().find(|d| d.id() == document.id()) {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
    }

    pub fn remove_document(&mut self, id: &str) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.id() != id);
        self.documents.len() != before
    }

    /// Rewrite a provisional document id with the server-assigned one.
    pub fn reconcile_document_id(
        &mut self,
        provisional: &str,
        canonical: String,
        user_id: Option<String>,
    ) -> bool {
        match self
            .documents
            .iter_mut()
            .find(|d| d.id() == provisional && d.is_provisional())
        {
            Some(doc) => {
                debug!(provisional = %provisional, canonical = %canonical, "Reconciling document id");
                doc.reconcile(canonical, user_id);
                true
            }
            None => false,
        }
    }

    /// Request a status transition for one document. Illegal transitions —
    /// including anything for an unknown document — are a no-op. Returns
    /// whether an effective transition happened.
    pub fn apply_status(
        &mut self,
        id: &str,
        next: DocumentStatus,
        error: Option<String>,
    ) -> bool {
        match self.get_mut(id) {
            Some(doc) => {
                let from = doc.status();
                let applied = doc.apply_transition(next, error);
                if applied {
                    debug!(document_id = %id, ?from, to = ?next, "Document status transition");
                } else {
                    debug!(document_id = %id, ?from, requested = ?next, "Ignoring illegal status transition");
                }
                applied
            }
            None => false,
        }
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }
}

impl Default for DocumentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tag(id: &str, name: &str) -> Tag {
        Tag {
            id: id.into(),
            name: name.into(),
            color: "#33A8FF".into(),
            description: None,
        }
    }

    fn server_doc(id: &str, status: DocumentStatus, tag_ids: &[&str]) -> Document {
        Document::from_server(
            id.into(),
            format!("Document {id}"),
            None,
            format!("{id}.pdf"),
            2048,
            "application/pdf".into(),
            status,
            Utc::now(),
            Utc::now(),
            Some("user-1".into()),
            tag_ids.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[test]
    fn test_resolve_drops_unknown_tag_ids() {
        let mut registry = DocumentRegistry::new();
        registry.set_tags(vec![tag("tag-1", "Research")]);

        let resolved =
            registry.resolve_tag_ids(&["tag-1".to_string(), "tag-ghost".to_string()]);
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains("tag-1"));
    }

    #[test]
    fn test_remove_tag_strips_association_only() {
        let mut registry = DocumentRegistry::new();
        registry.set_tags(vec![tag("tag-1", "Research"), tag("tag-2", "Legal")]);
        registry.upsert(server_doc("doc-1", DocumentStatus::Processed, &["tag-1", "tag-2"]));

        assert!(registry.remove_tag("tag-1"));

        assert_eq!(registry.count(), 1);
        let doc = registry.get("doc-1").unwrap();
        assert!(!doc.tag_ids().contains("tag-1"));
        assert!(doc.tag_ids().contains("tag-2"));
    }

    #[test]
    fn test_upsert_replaces_by_id_without_duplicating() {
        let mut registry = DocumentRegistry::new();
        registry.upsert(server_doc("doc-1", DocumentStatus::Pending, &[]));
        registry.upsert(server_doc("doc-2", DocumentStatus::Processed, &[]));
        registry.upsert(server_doc("doc-1", DocumentStatus::Processed, &[]));

        assert_eq!(registry.count(), 2);
        assert_eq!(registry.documents()[0].id(), "doc-1");
        assert_eq!(
            registry.get("doc-1").unwrap().status(),
            DocumentStatus::Processed
        );
    }

    #[test]
    fn test_apply_status_enforces_transition_table() {
        let mut registry = DocumentRegistry::new();
        registry.upsert(server_doc("doc-1", DocumentStatus::Processing, &[]));

        // processed is terminal for the attempt
        assert!(registry.apply_status("doc-1", DocumentStatus::Processed, None));
        assert!(!registry.apply_status("doc-1", DocumentStatus::Processing, None));
        assert!(!registry.apply_status("doc-1", DocumentStatus::Failed, None));

        // unknown documents are a no-op, not a panic
        assert!(!registry.apply_status("doc-missing", DocumentStatus::Processed, None));
    }

    #[test]
    fn test_reconcile_document_id() {
        let mut registry = DocumentRegistry::new();
        let doc = Document::new_upload(
            "report.pdf".into(),
            1024,
            "application/pdf".into(),
            None,
            None,
            BTreeSet::new(),
        );
        let local_id = doc.id().to_string();
        registry.prepend(doc);

        assert!(registry.reconcile_document_id(&local_id, "doc-srv-1".into(), Some("user-1".into())));
        assert!(registry.get(&local_id).is_none());

        let doc = registry.get("doc-srv-1").unwrap();
        assert!(!doc.is_provisional());
        assert_eq!(doc.user_id(), Some("user-1"));
    }
}
