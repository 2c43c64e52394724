use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::api::client::KnowledgeBaseApi;
use crate::api::types::{FeedbackRequest, SendMessageRequest};
use crate::chat::models::{
    ChatEvent, ChatEventSender, ContextFilterSelector, ConversationStore, FeedbackTracker,
    FeedbackVerdict, Message, Role,
};
use crate::chat::services::synthesize_title;
use crate::notifications::{NotificationLevel, NotificationStore};
use crate::session::SessionContext;

/// Orchestrates one user's chat session: conversation creation on demand,
/// optimistic message insertion, assistant-reply correlation, and one-shot
/// feedback capture.
///
/// All mutation happens in short critical sections on the session's stores;
/// no lock is ever held across a network round trip. The per-conversation
/// in-flight set is the `isLoading` signal the input surface gates on — one
/// outstanding exchange per conversation, while sends in other
/// conversations and document uploads proceed independently.
#[derive(Clone)]
pub struct ConversationSession {
    api: Arc<dyn KnowledgeBaseApi>,
    context: SessionContext,
    store: Arc<Mutex<ConversationStore>>,
    feedback: Arc<Mutex<FeedbackTracker>>,
    filter: Arc<Mutex<ContextFilterSelector>>,
    notifications: NotificationStore,
    events: ChatEventSender,
    /// Conversation ids with a send awaiting its assistant reply.
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ConversationSession {
    pub fn new(
        api: Arc<dyn KnowledgeBaseApi>,
        context: SessionContext,
        notifications: NotificationStore,
        events: ChatEventSender,
    ) -> Self {
        Self {
            api,
            context,
            store: Arc::new(Mutex::new(ConversationStore::new())),
            feedback: Arc::new(Mutex::new(FeedbackTracker::new())),
            filter: Arc::new(Mutex::new(ContextFilterSelector::new())),
            notifications,
            events,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn store(&self) -> Arc<Mutex<ConversationStore>> {
        self.store.clone()
    }

    pub fn feedback(&self) -> Arc<Mutex<FeedbackTracker>> {
        self.feedback.clone()
    }

    pub fn filter(&self) -> Arc<Mutex<ContextFilterSelector>> {
        self.filter.clone()
    }

    /// Whether the active conversation has an exchange in flight.
    pub fn is_loading(&self) -> bool {
        let active = self.store.lock().active_id().map(str::to_string);
        match active {
            Some(id) => self.in_flight.lock().contains(&id),
            None => false,
        }
    }

    pub fn is_loading_for(&self, conversation_id: &str) -> bool {
        self.in_flight.lock().contains(conversation_id)
    }

    /// Turn a raw input string into a durable exchange.
    ///
    /// Phases:
    /// 1. Synchronous: validate, create the conversation if none is active,
    ///    append the user message, raise the loading flag.
    /// 2. Dispatch the retrieval+generation request, carrying the context
    ///    filter selected at this moment.
    /// 3. On success append the assistant reply (correlated by the returned
    ///    conversation id); on failure keep the user message and raise a
    ///    notification. Either way the loading flag clears.
    pub async fn send_message(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("Ignoring empty message");
            return;
        }

        // PHASE 1: resolve the target conversation, gate concurrent sends,
        // insert the user message before any network interaction.
        let conversation_id = {
            let mut store = self.store.lock();

            let conversation_id = match store.active_id() {
                Some(id) => {
                    let id = id.to_string();
                    if self.in_flight.lock().contains(&id) {
                        debug!(conversation_id = %id, "Send rejected: reply still in flight");
                        return;
                    }
                    id
                }
                None => {
                    let id = format!("conv-{}", uuid::Uuid::new_v4());
                    let title = synthesize_title(trimmed);
                    info!(conversation_id = %id, title = %title, "Creating conversation on first message");
                    store.create_conversation(id.clone(), title);

                    let _ = self.events.send(ChatEvent::ConversationCreated {
                        conversation_id: id.clone(),
                    });
                    let _ = self.events.send(ChatEvent::NavigateToConversation {
                        conversation_id: id.clone(),
                    });
                    id
                }
            };

            let message = Message::user(trimmed.to_string()).with_author(
                self.context.user_name().map(str::to_string),
                self.context.user_avatar().map(str::to_string),
            );
            store.push_message(message);
            self.in_flight.lock().insert(conversation_id.clone());
            conversation_id
        };
        let _ = self.events.send(ChatEvent::ScrollToLatest {
            conversation_id: conversation_id.clone(),
        });

        // PHASE 2: dispatch, with the filter read at send time.
        let context_filter = self.filter.lock().selected().map(str::to_string);
        let request = SendMessageRequest {
            message: trimmed.to_string(),
            conversation_id: conversation_id.clone(),
            context_filter,
        };

        debug!(conversation_id = %conversation_id, "Dispatching retrieval+generation request");
        let result = self.api.send_message(request).await;

        // PHASE 3: correlate the reply or surface the failure.
        match result {
            Ok(response) => {
                let canonical_id = response.conversation_id.clone();
                {
                    let mut store = self.store.lock();
                    if canonical_id != conversation_id {
                        store.reconcile_id(&conversation_id, canonical_id.clone());
                    }

                    // Append only when the exchange's conversation is still
                    // the one on display; a conversation switched away from
                    // keeps running, its result simply unobserved.
                    if store.active_id() == Some(canonical_id.as_str()) {
                        store.push_message(Message::assistant(
                            response.id,
                            response.content,
                            response.sources,
                        ));
                    } else {
                        debug!(conversation_id = %canonical_id, "Reply resolved for an inactive conversation");
                    }
                    store.bump_message_count(&canonical_id, 2);
                }
                let _ = self.events.send(ChatEvent::ScrollToLatest {
                    conversation_id: canonical_id,
                });
            }
            Err(error) => {
                // The optimistic user message stays: losing typed text is
                // worse than a visible gap where the reply should be.
                warn!(conversation_id = %conversation_id, error = %error, "Send failed");
                self.notifications
                    .push(NotificationLevel::Error, "Failed to send message");
            }
        }

        self.in_flight.lock().remove(&conversation_id);
    }

    /// Record a one-shot feedback verdict for an assistant message.
    ///
    /// The verdict is set optimistically and reverted if the request fails —
    /// the one place a visible revert occurs, since feedback carries no
    /// user-authored content to protect. Repeat submissions and submissions
    /// against non-assistant messages fall through silently.
    pub async fn submit_feedback(&self, message_id: &str, verdict: FeedbackVerdict) {
        let is_assistant = self
            .store
            .lock()
            .messages()
            .iter()
            .any(|m| m.id() == message_id && m.role() == Role::Assistant);
        if !is_assistant {
            debug!(message_id = %message_id, "Feedback ignored: not an assistant message");
            return;
        }

        if !self.feedback.lock().begin(message_id, verdict) {
            debug!(message_id = %message_id, "Feedback ignored: verdict already recorded");
            return;
        }

        let request = FeedbackRequest {
            message_id: message_id.to_string(),
            feedback_type: verdict,
        };

        match self.api.submit_feedback(request).await {
            Ok(response) => {
                debug!(message_id = %message_id, status = %response.status, "Feedback recorded");
                self.feedback.lock().confirm(message_id);
            }
            Err(error) => {
                warn!(message_id = %message_id, error = %error, "Feedback failed, reverting");
                self.feedback.lock().revert(message_id);
                self.notifications
                    .push(NotificationLevel::Error, "Failed to submit feedback");
            }
        }
    }
}
