use tokio::sync::mpsc;

/// Fire-and-forget UI effects emitted by the session for decoupled
/// consumption. Each variant is tagged with the conversation it concerns so
/// subscribers can filter. Delivery is best-effort: a dropped receiver
/// never fails a send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEvent {
    ConversationCreated { conversation_id: String },
    NavigateToConversation { conversation_id: String },
    ScrollToLatest { conversation_id: String },
}

pub type ChatEventSender = mpsc::UnboundedSender<ChatEvent>;
pub type ChatEventReceiver = mpsc::UnboundedReceiver<ChatEvent>;

pub fn channel() -> (ChatEventSender, ChatEventReceiver) {
    mpsc::unbounded_channel()
}
