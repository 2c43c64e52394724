pub mod context_filter;
pub mod conversation;
pub mod conversation_store;
pub mod events;
pub mod feedback_tracker;
pub mod message;

pub use context_filter::ContextFilterSelector;
pub use conversation::Conversation;
pub use conversation_store::ConversationStore;
pub use events::{ChatEvent, ChatEventReceiver, ChatEventSender};
pub use feedback_tracker::{FeedbackState, FeedbackTracker, FeedbackVerdict};
pub use message::{Message, Role, Source};
