/// Selection of the retrieval grounding context: all documents, or the
/// documents carrying one tag.
///
/// Pure state — no network, no async. The session reads the selection at
/// send time only, so switching the filter never affects already-rendered
/// messages.
#[derive(Clone, Debug, Default)]
pub struct ContextFilterSelector {
    selected: Option<String>,
}

impl ContextFilterSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_tag(&mut self, tag_id: String) {
        self.selected = Some(tag_id);
    }

    /// Back to "all documents".
    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_all_documents() {
        let selector = ContextFilterSelector::new();
        assert_eq!(selector.selected(), None);
    }

    #[test]
    fn test_latest_selection_wins() {
        let mut selector = ContextFilterSelector::new();
        selector.select_tag("tag-1".into());
        selector.select_tag("tag-2".into());
        assert_eq!(selector.selected(), Some("tag-2"));

        selector.clear();
        assert_eq!(selector.selected(), None);
    }
}
