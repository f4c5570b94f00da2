//! Sending chat messages.

use tracing::{debug, warn};
use uuid::Uuid;

use pocket_shared::constants::{QUICK_PROMPT_CONTEXT_CHARS, SEND_FAILED_MESSAGE};
use pocket_shared::{ChatMessage, ChatRole, ChatSession};

use crate::error::{ClientError, Result};
use crate::state::AppState;

/// Result of [`AppState::send_message`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Input was blank; nothing happened.
    Ignored,
    /// Today's free quota is used up; route to the paywall.
    Blocked,
    /// The coach replied.
    Delivered(ChatMessage),
    /// The reply failed; the inline error turn was appended instead.
    Failed(ChatMessage),
}

/// Canned follow-ups offered under the chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickPrompt {
    Summarize,
    NextStep,
    MakeItSmaller,
    OneQuestion,
}

impl QuickPrompt {
    pub const ALL: [QuickPrompt; 4] = [
        QuickPrompt::Summarize,
        QuickPrompt::NextStep,
        QuickPrompt::MakeItSmaller,
        QuickPrompt::OneQuestion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QuickPrompt::Summarize => "Summarize",
            QuickPrompt::NextStep => "Next step",
            QuickPrompt::MakeItSmaller => "Make it smaller",
            QuickPrompt::OneQuestion => "One question",
        }
    }

    /// The message actually sent, carrying a slice of the last reply as
    /// context when there is one.
    pub fn message(&self, session: Option<&ChatSession>) -> String {
        match session.and_then(ChatSession::last_assistant) {
            Some(last) => {
                let context: String = last.content.chars().take(QUICK_PROMPT_CONTEXT_CHARS).collect();
                format!("Context: {context}...\n\n{}", self.label())
            }
            None => self.label().to_string(),
        }
    }
}

/// `{u|a|e}-{millis}-{suffix}`; the suffix keeps ids unique within a millisecond.
fn message_id(prefix: char, now_ms: i64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{now_ms}-{}", &suffix[..8])
}

impl AppState {
    /// Send `text` to the coach and record both turns.
    ///
    /// The user turn is written before the reply is requested, so it
    /// survives a failed or slow reply.  Reply failures never surface as
    /// errors: they become an assistant turn with a fixed apology.
    pub async fn send_message(&mut self, coach_id: &str, text: &str) -> Result<SendOutcome> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        let coach = self
            .find_coach(coach_id)
            .ok_or_else(|| ClientError::CoachNotFound(coach_id.to_string()))?;

        if !self.can_send_message() {
            debug!(coach = %coach.id, count = self.daily_message_count(), "Daily quota reached");
            return Ok(SendOutcome::Blocked);
        }

        let now = self.clock().now_millis();
        let session = self
            .chat_session(&coach.id)
            .cloned()
            .unwrap_or_else(|| ChatSession::new(coach.id.clone(), now));
        let prior = session.history();

        let user_message = ChatMessage {
            id: message_id('u', now),
            role: ChatRole::User,
            content: trimmed.to_string(),
            timestamp: now,
        };
        let session = session.with_message(user_message, now);
        self.update_chat_session(&coach.id, session.clone()).await?;
        self.increment_daily_message_count().await?;

        let reply = self
            .replies
            .reply(&coach, self.user_profile(), trimmed, &prior)
            .await;

        let now = self.clock().now_millis();
        let (reply_message, delivered) = match reply {
            Ok(content) => (
                ChatMessage {
                    id: message_id('a', now),
                    role: ChatRole::Assistant,
                    content,
                    timestamp: now,
                },
                true,
            ),
            Err(e) => {
                warn!(coach = %coach.id, error = %e, "Chat send failed");
                (
                    ChatMessage {
                        id: message_id('e', now),
                        role: ChatRole::Assistant,
                        content: SEND_FAILED_MESSAGE.to_string(),
                        timestamp: now,
                    },
                    false,
                )
            }
        };

        let session = session.with_message(reply_message.clone(), now);
        self.update_chat_session(&coach.id, session).await?;

        Ok(if delivered {
            SendOutcome::Delivered(reply_message)
        } else {
            SendOutcome::Failed(reply_message)
        })
    }

    pub async fn send_quick_prompt(
        &mut self,
        coach_id: &str,
        prompt: QuickPrompt,
    ) -> Result<SendOutcome> {
        let text = prompt.message(self.chat_session(coach_id));
        self.send_message(coach_id, &text).await
    }
}
