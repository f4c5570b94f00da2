//! Chat replies: canned coaching lines, or an OpenAI-compatible completion
//! call that falls back to them on any failure.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pocket_shared::constants::MAX_HISTORY_MESSAGES;
use pocket_shared::{ChatTurn, Coach, UserProfile};

use crate::config::ClientConfig;
use crate::error::ChatError;

pub const MOCK_REPLIES: [&str; 10] = [
    "Start with one tiny step. What's the smallest action you could take in the next 10 minutes?",
    "Clarity comes from constraints. What's the one outcome that would make today a win?",
    "Let's break it down. What's the first decision you need to make?",
    "Focus on the system, not the goal. What habit would make this easier?",
    "Take a breath. What's actually in your control right now?",
    "One question to consider: What would you do if you knew you couldn't fail?",
    "Small steps compound. What's one thing you can do before the day ends?",
    "Your next step doesn't need to be perfect. It just needs to be next. What's that step?",
    "What would your future self thank you for doing today?",
    "Let's make it concrete. What's the very next action?",
];

/// Anything that can answer as a coach.
#[async_trait]
pub trait ReplySource: Send + Sync {
    async fn reply(
        &self,
        coach: &Coach,
        profile: Option<&UserProfile>,
        user_message: &str,
        history: &[ChatTurn],
    ) -> Result<String, ChatError>;
}

pub fn mock_reply() -> String {
    MOCK_REPLIES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(MOCK_REPLIES[0])
        .to_string()
}

pub fn build_system_prompt(coach: &Coach, profile: Option<&UserProfile>) -> String {
    let rules = coach.style_rules.join("\n");
    let context = match profile {
        Some(p) => format!(
            "User context - use sparingly to personalize:\nValues: {}\nGoals: {}\nConstraints: {}",
            p.values.as_deref().unwrap_or("Not set"),
            p.goals.as_deref().unwrap_or("Not set"),
            p.constraints.as_deref().unwrap_or("Not set"),
        ),
        None => String::new(),
    };

    format!(
        "You are \"{}\". {}\n\nStyle and rules:\n{}\n{}\n\nKeep responses concise (2-4 sentences). Be direct and supportive. Ask one clarifying question when helpful.",
        coach.name, coach.long_description, rules, context
    )
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ChatClient {
    http: Client,
    /// Present only when real replies are enabled.
    api_key: Option<String>,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: Client::new(),
            api_key: config
                .real_chat_enabled()
                .then(|| config.openai_api_key.clone())
                .flatten(),
            endpoint: format!(
                "{}/chat/completions",
                config.openai_base_url.trim_end_matches('/')
            ),
            model: config.openai_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    pub fn is_real(&self) -> bool {
        self.api_key.is_some()
    }

    /// Produce a coach reply.  Never fails; every error path degrades to a
    /// mock reply.
    pub async fn send_chat_message(
        &self,
        coach: &Coach,
        profile: Option<&UserProfile>,
        user_message: &str,
        history: &[ChatTurn],
    ) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return mock_reply();
        };

        match self
            .request_completion(api_key, coach, profile, user_message, history)
            .await
        {
            Ok(Some(content)) => content.trim().to_string(),
            Ok(None) => MOCK_REPLIES[0].to_string(),
            Err(e) => {
                warn!(error = %e, coach = %coach.id, "Completion request failed, falling back to mock");
                mock_reply()
            }
        }
    }

    async fn request_completion(
        &self,
        api_key: &str,
        coach: &Coach,
        profile: Option<&UserProfile>,
        user_message: &str,
        history: &[ChatTurn],
    ) -> Result<Option<String>, ChatError> {
        let system_prompt = build_system_prompt(coach, profile);
        let recent = &history[history.len().saturating_sub(MAX_HISTORY_MESSAGES)..];

        let mut messages = Vec::with_capacity(recent.len() + 2);
        messages.push(WireMessage {
            role: "system",
            content: &system_prompt,
        });
        messages.extend(recent.iter().map(|turn| WireMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));
        messages.push(WireMessage {
            role: "user",
            content: user_message,
        });

        let body = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(coach = %coach.id, turns = recent.len(), "Requesting completion");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::MalformedResponse(e.to_string()))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content))
    }
}

#[async_trait]
impl ReplySource for ChatClient {
    async fn reply(
        &self,
        coach: &Coach,
        profile: Option<&UserProfile>,
        user_message: &str,
        history: &[ChatTurn],
    ) -> Result<String, ChatError> {
        Ok(self
            .send_chat_message(coach, profile, user_message, history)
            .await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use pocket_shared::catalog::seeded_coaches;
    use pocket_shared::ChatRole;

    use super::*;
    use crate::config::AiMode;

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    fn coach() -> Coach {
        seeded_coaches()[0].clone()
    }

    fn history(n: usize) -> Vec<ChatTurn> {
        (0..n)
            .map(|i| ChatTurn {
                role: if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant },
                content: format!("turn {i}"),
            })
            .collect()
    }

    fn real_config(base_url: &str) -> ClientConfig {
        ClientConfig {
            ai_mode: AiMode::Real,
            openai_api_key: Some("sk-test".into()),
            openai_base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    async fn spawn_stub(status: StatusCode, reply: Value) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route(
                "/v1/chat/completions",
                post(
                    move |State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let auth = headers
                                .get("authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(String::from);
                            seen.lock().unwrap().push((auth, body));
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1"), seen)
    }

    #[test]
    fn prompt_without_profile_has_no_context() {
        let prompt = build_system_prompt(&coach(), None);
        assert!(prompt.starts_with("You are \"Atomic Habits Coach\". "));
        assert!(prompt.contains("Style and rules:\nFocus on identity"));
        assert!(!prompt.contains("User context"));
        assert!(prompt.ends_with("Ask one clarifying question when helpful."));
    }

    #[test]
    fn prompt_marks_unset_profile_fields() {
        let profile = UserProfile {
            goals: Some("run a marathon".into()),
            ..Default::default()
        };
        let prompt = build_system_prompt(&coach(), Some(&profile));
        assert!(prompt.contains("Values: Not set\nGoals: run a marathon\nConstraints: Not set"));
    }

    #[tokio::test]
    async fn mock_mode_returns_canned_reply() {
        let client = ChatClient::new(&ClientConfig::default());
        assert!(!client.is_real());

        let profile = UserProfile {
            values: Some("honesty".into()),
            ..Default::default()
        };
        for profile in [None, Some(&profile)] {
            for hist in [history(0), history(3)] {
                let reply = client.send_chat_message(&coach(), profile, "hi", &hist).await;
                assert!(MOCK_REPLIES.contains(&reply.as_str()));
            }
        }
    }

    #[tokio::test]
    async fn real_mode_without_key_stays_mock() {
        let config = ClientConfig {
            ai_mode: AiMode::Real,
            ..Default::default()
        };
        let client = ChatClient::new(&config);
        assert!(!client.is_real());
        let reply = client.send_chat_message(&coach(), None, "hi", &[]).await;
        assert!(MOCK_REPLIES.contains(&reply.as_str()));
    }

    #[test]
    fn key_without_real_mode_stays_mock() {
        let config = ClientConfig {
            openai_api_key: Some("sk-test".into()),
            ..Default::default()
        };
        assert!(!ChatClient::new(&config).is_real());

        let config = ClientConfig {
            ai_mode: AiMode::Real,
            ..config
        };
        assert!(ChatClient::new(&config).is_real());
    }

    #[tokio::test]
    async fn real_mode_sends_trailing_history() {
        let (base, seen) = spawn_stub(
            StatusCode::OK,
            json!({"choices": [{"message": {"content": "  Pick one habit.  "}}]}),
        )
        .await;
        let client = ChatClient::new(&real_config(&base));
        assert!(client.is_real());

        let reply = client
            .send_chat_message(&coach(), None, "help me", &history(25))
            .await;
        assert_eq!(reply, "Pick one habit.");

        let seen = seen.lock().unwrap();
        let (auth, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 256);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), MAX_HISTORY_MESSAGES + 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"], "turn 5");
        assert_eq!(messages[MAX_HISTORY_MESSAGES]["content"], "turn 24");
        assert_eq!(messages[MAX_HISTORY_MESSAGES + 1]["role"], "user");
        assert_eq!(messages[MAX_HISTORY_MESSAGES + 1]["content"], "help me");
    }

    #[tokio::test]
    async fn empty_choice_uses_first_mock_reply() {
        let (base, _) = spawn_stub(StatusCode::OK, json!({"choices": []})).await;
        let client = ChatClient::new(&real_config(&base));
        let reply = client.send_chat_message(&coach(), None, "hi", &[]).await;
        assert_eq!(reply, MOCK_REPLIES[0]);
    }

    #[tokio::test]
    async fn server_error_falls_back_to_mock() {
        let (base, seen) = spawn_stub(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": {"message": "boom"}}),
        )
        .await;
        let client = ChatClient::new(&real_config(&base));
        let reply = client.send_chat_message(&coach(), None, "hi", &[]).await;
        assert!(MOCK_REPLIES.contains(&reply.as_str()));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back_to_mock() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ChatClient::new(&real_config(&format!("http://{addr}/v1")));
        let reply = client.reply(&coach(), None, "hi", &[]).await.unwrap();
        assert!(MOCK_REPLIES.contains(&reply.as_str()));
    }
}
