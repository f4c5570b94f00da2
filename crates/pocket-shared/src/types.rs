//! Domain records persisted by the store and shown by the client.
//!
//! Field names serialize in camelCase so the JSON written to the key-value
//! store keeps the `updatedAt` / `longDescription` / `styleRules` shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{CUSTOM_COACH_ID_PREFIX, STARTER_PROMPT_COUNT};
use crate::error::CoachError;

// ---------------------------------------------------------------------------
// User profile
// ---------------------------------------------------------------------------

/// Free-text context the user shares with every coach.  Absent fields mean
/// "not provided".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
    /// Epoch milliseconds, stamped by the store on every save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl UserProfile {
    /// Compare the user-editable fields, ignoring `updated_at`.
    pub fn same_content(&self, other: &UserProfile) -> bool {
        self.values == other.values
            && self.goals == other.goals
            && self.constraints == other.constraints
    }
}

// ---------------------------------------------------------------------------
// Coach
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CoachCategory {
    Habits,
    Focus,
    Decisions,
    Systems,
    Creativity,
    Mindset,
    Career,
    Relationships,
}

impl CoachCategory {
    pub const ALL: [CoachCategory; 8] = [
        CoachCategory::Habits,
        CoachCategory::Focus,
        CoachCategory::Decisions,
        CoachCategory::Systems,
        CoachCategory::Creativity,
        CoachCategory::Mindset,
        CoachCategory::Career,
        CoachCategory::Relationships,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CoachCategory::Habits => "habits",
            CoachCategory::Focus => "focus",
            CoachCategory::Decisions => "decisions",
            CoachCategory::Systems => "systems",
            CoachCategory::Creativity => "creativity",
            CoachCategory::Mindset => "mindset",
            CoachCategory::Career => "career",
            CoachCategory::Relationships => "relationships",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CoachCategory::Habits => "Habits",
            CoachCategory::Focus => "Focus",
            CoachCategory::Decisions => "Decisions",
            CoachCategory::Systems => "Systems",
            CoachCategory::Creativity => "Creativity",
            CoachCategory::Mindset => "Mindset",
            CoachCategory::Career => "Career",
            CoachCategory::Relationships => "Relationships",
        }
    }
}

impl fmt::Display for CoachCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CoachCategory {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoachCategory::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| CoachError::UnknownCategory(s.to_string()))
    }
}

/// A persona definition that conditions chat replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
    pub id: String,
    pub name: String,
    pub tagline: String,
    pub long_description: String,
    pub style_rules: Vec<String>,
    pub starter_prompts: Vec<String>,
    pub category: CoachCategory,
    pub is_pro: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_custom: bool,
}

/// Starter prompts given to every user-created coach.
pub const CUSTOM_STARTER_PROMPTS: [&str; STARTER_PROMPT_COUNT] = [
    "What should I focus on first?",
    "Give me one small step",
    "Help me think this through",
    "What would you do in my place?",
    "Summarize my options",
];

/// The raw form input used to create a custom coach.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoachDraft {
    pub name: String,
    pub tone: String,
    pub purpose: String,
    /// One rule per line; blank lines are dropped.
    pub rules: String,
}

impl CoachDraft {
    /// Build a custom coach from the draft, using `created_at_ms` for the id.
    pub fn into_coach(self, created_at_ms: i64) -> Result<Coach, CoachError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoachError::MissingName);
        }

        let purpose = self.purpose.trim();
        let tone = self.tone.trim();

        let tagline = if purpose.is_empty() {
            "Your custom coach".to_string()
        } else {
            purpose.to_string()
        };
        let long_description = if purpose.is_empty() {
            let tone = if tone.is_empty() { "supportive" } else { tone };
            format!("A coach that matches your style: {tone}.")
        } else {
            purpose.to_string()
        };

        let style_rules = self
            .rules
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        Ok(Coach {
            id: custom_coach_id(created_at_ms),
            name: name.to_string(),
            tagline,
            long_description,
            style_rules,
            starter_prompts: CUSTOM_STARTER_PROMPTS.iter().map(|s| s.to_string()).collect(),
            category: CoachCategory::Habits,
            is_pro: false,
            is_custom: true,
        })
    }
}

pub fn custom_coach_id(created_at_ms: i64) -> String {
    format!("{CUSTOM_COACH_ID_PREFIX}{created_at_ms}")
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A single chat turn.  Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// The role/content pair forwarded to a reply provider as history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl From<&ChatMessage> for ChatTurn {
    fn from(m: &ChatMessage) -> Self {
        Self {
            role: m.role,
            content: m.content.clone(),
        }
    }
}

/// The transcript with one coach.  Messages are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub coach_id: String,
    pub messages: Vec<ChatMessage>,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

impl ChatSession {
    pub fn new(coach_id: impl Into<String>, now_ms: i64) -> Self {
        Self {
            coach_id: coach_id.into(),
            messages: Vec::new(),
            updated_at: now_ms,
        }
    }

    /// Return a copy of this session with `message` appended.
    ///
    /// The timestamp is raised to the previous message's if the clock went
    /// backwards, keeping the transcript in non-decreasing order.
    pub fn with_message(&self, mut message: ChatMessage, now_ms: i64) -> Self {
        if let Some(last) = self.messages.last() {
            message.timestamp = message.timestamp.max(last.timestamp);
        }
        let mut messages = self.messages.clone();
        messages.push(message);
        Self {
            coach_id: self.coach_id.clone(),
            messages,
            updated_at: now_ms,
        }
    }

    pub fn last_assistant(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant)
    }

    pub fn history(&self) -> Vec<ChatTurn> {
        self.messages.iter().map(ChatTurn::from).collect()
    }
}

// ---------------------------------------------------------------------------
// Onboarding
// ---------------------------------------------------------------------------

/// Whether the user has finished onboarding.  `Unknown` until the persisted
/// flag has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnboardingState {
    #[default]
    Unknown,
    NotDone,
    Done,
}

impl From<bool> for OnboardingState {
    fn from(done: bool) -> Self {
        if done {
            Self::Done
        } else {
            Self::NotDone
        }
    }
}
