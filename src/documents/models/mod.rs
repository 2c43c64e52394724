pub mod document;
pub mod document_registry;

pub use document::{Document, DocumentStatus, Tag};
pub use document_registry::DocumentRegistry;
