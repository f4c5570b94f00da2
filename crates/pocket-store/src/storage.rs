//! Typed records on top of a [`KeyValueStore`].
//!
//! Store errors from the adapter propagate to the caller.  Stored text that
//! fails to decode is logged and replaced by the record's empty value
//! (`None`, an empty list, or an empty map).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use pocket_shared::{ChatSession, Coach, UserProfile};

use crate::clock::Clock;
use crate::error::Result;
use crate::kv::KeyValueStore;

/// Persisted keys, all under the `@pocketcoach/` namespace.
pub mod keys {
    pub const ONBOARDING_DONE: &str = "@pocketcoach/onboarding_done";
    pub const USER_PROFILE: &str = "@pocketcoach/user_profile";
    pub const CUSTOM_COACHES: &str = "@pocketcoach/custom_coaches";
    pub const CHAT_SESSIONS: &str = "@pocketcoach/chat_sessions";
    pub const DAILY_MESSAGE_COUNT: &str = "@pocketcoach/daily_message_count";
    pub const DAILY_MESSAGE_DATE: &str = "@pocketcoach/daily_message_date";

    pub const ALL: [&str; 6] = [
        ONBOARDING_DONE,
        USER_PROFILE,
        CUSTOM_COACHES,
        CHAT_SESSIONS,
        DAILY_MESSAGE_COUNT,
        DAILY_MESSAGE_DATE,
    ];
}

/// Chat transcripts keyed by coach id.
pub type ChatSessions = BTreeMap<String, ChatSession>;

#[derive(Clone)]
pub struct Storage {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl Storage {
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { kv, clock }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // ------------------------------------------------------------------
    // Onboarding
    // ------------------------------------------------------------------

    pub async fn get_onboarding_done(&self) -> Result<bool> {
        let value = self.kv.get_item(keys::ONBOARDING_DONE).await?;
        Ok(value.as_deref() == Some("true"))
    }

    pub async fn set_onboarding_done(&self, done: bool) -> Result<()> {
        let value = if done { "true" } else { "false" };
        self.kv.set_item(keys::ONBOARDING_DONE, value).await
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    pub async fn get_user_profile(&self) -> Result<Option<UserProfile>> {
        let raw = self.kv.get_item(keys::USER_PROFILE).await?;
        Ok(decode_or(keys::USER_PROFILE, raw, None))
    }

    /// Save the profile, stamping `updated_at` with the current time.
    /// Returns the record as written.
    pub async fn set_user_profile(&self, profile: &UserProfile) -> Result<UserProfile> {
        let stamped = UserProfile {
            updated_at: Some(self.clock.now_millis()),
            ..profile.clone()
        };
        let json = serde_json::to_string(&stamped)?;
        self.kv.set_item(keys::USER_PROFILE, &json).await?;
        Ok(stamped)
    }

    // ------------------------------------------------------------------
    // Custom coaches
    // ------------------------------------------------------------------

    pub async fn get_custom_coaches(&self) -> Result<Vec<Coach>> {
        let raw = self.kv.get_item(keys::CUSTOM_COACHES).await?;
        Ok(decode_or(keys::CUSTOM_COACHES, raw, Vec::new()))
    }

    pub async fn set_custom_coaches(&self, coaches: &[Coach]) -> Result<()> {
        let json = serde_json::to_string(coaches)?;
        self.kv.set_item(keys::CUSTOM_COACHES, &json).await
    }

    // ------------------------------------------------------------------
    // Chat sessions
    // ------------------------------------------------------------------

    pub async fn get_chat_sessions(&self) -> Result<ChatSessions> {
        let raw = self.kv.get_item(keys::CHAT_SESSIONS).await?;
        Ok(decode_or(keys::CHAT_SESSIONS, raw, ChatSessions::new()))
    }

    pub async fn set_chat_sessions(&self, sessions: &ChatSessions) -> Result<()> {
        let json = serde_json::to_string(sessions)?;
        self.kv.set_item(keys::CHAT_SESSIONS, &json).await
    }

    // ------------------------------------------------------------------
    // Daily message counter
    // ------------------------------------------------------------------

    /// Messages sent today.  A counter stored for any other calendar day
    /// reads as 0; storage is left untouched.
    pub async fn get_daily_message_count(&self) -> Result<u32> {
        self.count_for_today(&self.clock.today()).await
    }

    /// Bump today's counter and return the new value.
    ///
    /// Read-modify-write over two keys: concurrent callers can lose updates.
    pub async fn increment_daily_message_count(&self) -> Result<u32> {
        let today = self.clock.today();
        let count = self.count_for_today(&today).await?.saturating_add(1);

        self.kv.set_item(keys::DAILY_MESSAGE_DATE, &today).await?;
        self.kv
            .set_item(keys::DAILY_MESSAGE_COUNT, &count.to_string())
            .await?;

        debug!(count, day = %today, "daily message count incremented");
        Ok(count)
    }

    async fn count_for_today(&self, today: &str) -> Result<u32> {
        let stored_date = self.kv.get_item(keys::DAILY_MESSAGE_DATE).await?;
        if stored_date.as_deref() != Some(today) {
            return Ok(0);
        }

        let raw = self.kv.get_item(keys::DAILY_MESSAGE_COUNT).await?;
        Ok(raw.as_deref().map(parse_count).unwrap_or(0))
    }
}

/// Reads the leading decimal digits, so `"5abc"` counts as 5.  Anything
/// without a usable digit prefix counts as 0.
fn parse_count(raw: &str) -> u32 {
    let text = raw.trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());

    text[..end].parse().unwrap_or_else(|_| {
        warn!(value = raw, "ignoring malformed daily message count");
        0
    })
}

fn decode_or<T: DeserializeOwned>(key: &str, raw: Option<String>, default: T) -> T {
    match raw.as_deref() {
        None | Some("") => default,
        Some(text) => serde_json::from_str(text).unwrap_or_else(|e| {
            warn!(key, error = %e, "discarding malformed stored record");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local, TimeZone};
    use pocket_shared::{ChatMessage, ChatRole, CoachCategory};

    use super::*;
    use crate::clock::FixedClock;
    use crate::kv::MemoryStore;

    fn setup() -> (Storage, Arc<MemoryStore>, Arc<FixedClock>) {
        let kv = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(
            Local.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap(),
        ));
        let storage = Storage::new(kv.clone(), clock.clone());
        (storage, kv, clock)
    }

    fn coach(id: &str) -> Coach {
        Coach {
            id: id.into(),
            name: "Test".into(),
            tagline: "Tag".into(),
            long_description: "Desc".into(),
            style_rules: vec![],
            starter_prompts: vec![],
            category: CoachCategory::Habits,
            is_pro: false,
            is_custom: true,
        }
    }

    #[test]
    fn keys_share_namespace() {
        for key in keys::ALL {
            assert!(key.starts_with(pocket_shared::constants::STORAGE_KEY_PREFIX));
        }
    }

    #[tokio::test]
    async fn onboarding_defaults_to_false() {
        let (storage, _, _) = setup();
        assert!(!storage.get_onboarding_done().await.unwrap());

        storage.set_onboarding_done(true).await.unwrap();
        assert!(storage.get_onboarding_done().await.unwrap());

        storage.set_onboarding_done(false).await.unwrap();
        assert!(!storage.get_onboarding_done().await.unwrap());
    }

    #[tokio::test]
    async fn onboarding_stored_as_literal() {
        let (storage, kv, _) = setup();
        storage.set_onboarding_done(true).await.unwrap();
        assert_eq!(
            kv.get_item(keys::ONBOARDING_DONE).await.unwrap().as_deref(),
            Some("true")
        );
    }

    #[tokio::test]
    async fn profile_round_trip_stamps_updated_at() {
        let (storage, _, clock) = setup();
        assert_eq!(storage.get_user_profile().await.unwrap(), None);

        let profile = UserProfile {
            values: Some("honesty".into()),
            goals: Some("ship fast".into()),
            constraints: Some("no backend".into()),
            updated_at: None,
        };
        storage.set_user_profile(&profile).await.unwrap();

        let got = storage.get_user_profile().await.unwrap().unwrap();
        assert!(got.same_content(&profile));
        assert_eq!(got.updated_at, Some(clock.now_millis()));
    }

    #[tokio::test]
    async fn malformed_records_fall_back_to_defaults() {
        let (storage, kv, _) = setup();
        kv.set_item(keys::USER_PROFILE, "not valid json {").await.unwrap();
        kv.set_item(keys::CUSTOM_COACHES, "[{").await.unwrap();
        kv.set_item(keys::CHAT_SESSIONS, "{\"x\": 3}").await.unwrap();

        assert_eq!(storage.get_user_profile().await.unwrap(), None);
        assert!(storage.get_custom_coaches().await.unwrap().is_empty());
        assert!(storage.get_chat_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn count_reads_leading_digits() {
        let (storage, kv, clock) = setup();
        kv.set_item(keys::DAILY_MESSAGE_DATE, &clock.today()).await.unwrap();
        kv.set_item(keys::DAILY_MESSAGE_COUNT, "5abc").await.unwrap();
        assert_eq!(storage.get_daily_message_count().await.unwrap(), 5);
        assert_eq!(storage.increment_daily_message_count().await.unwrap(), 6);

        kv.set_item(keys::DAILY_MESSAGE_COUNT, "abc").await.unwrap();
        assert_eq!(storage.get_daily_message_count().await.unwrap(), 0);
    }

    #[test]
    fn parse_count_edge_cases() {
        assert_eq!(parse_count("3"), 3);
        assert_eq!(parse_count("  12 "), 12);
        assert_eq!(parse_count("+4"), 4);
        assert_eq!(parse_count("7.9"), 7);
        assert_eq!(parse_count("-2"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("99999999999"), 0);
    }

    #[tokio::test]
    async fn custom_coaches_round_trip() {
        let (storage, _, _) = setup();
        assert!(storage.get_custom_coaches().await.unwrap().is_empty());

        storage.set_custom_coaches(&[coach("c1")]).await.unwrap();
        let got = storage.get_custom_coaches().await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "Test");
    }

    #[tokio::test]
    async fn chat_sessions_round_trip() {
        let (storage, _, _) = setup();
        let session = ChatSession::new("atomic-habits", 10).with_message(
            ChatMessage {
                id: "u-1".into(),
                role: ChatRole::User,
                content: "hi".into(),
                timestamp: 10,
            },
            10,
        );
        let mut sessions = ChatSessions::new();
        sessions.insert(session.coach_id.clone(), session.clone());

        storage.set_chat_sessions(&sessions).await.unwrap();
        let got = storage.get_chat_sessions().await.unwrap();
        assert_eq!(got.get("atomic-habits"), Some(&session));
    }

    #[tokio::test]
    async fn daily_count_starts_at_zero() {
        let (storage, _, _) = setup();
        assert_eq!(storage.get_daily_message_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn increment_is_sequential_within_a_day() {
        let (storage, _, _) = setup();
        for expected in 1..=5 {
            let count = storage.increment_daily_message_count().await.unwrap();
            assert_eq!(count, expected);
            assert_eq!(storage.get_daily_message_count().await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn count_resets_on_new_day_without_writing() {
        let (storage, kv, clock) = setup();
        storage.increment_daily_message_count().await.unwrap();
        storage.increment_daily_message_count().await.unwrap();

        clock.advance(Duration::days(1));
        assert_eq!(storage.get_daily_message_count().await.unwrap(), 0);
        // The stale record is still on disk until the next increment.
        assert_eq!(
            kv.get_item(keys::DAILY_MESSAGE_COUNT).await.unwrap().as_deref(),
            Some("2")
        );

        assert_eq!(storage.increment_daily_message_count().await.unwrap(), 1);
        assert_eq!(
            kv.get_item(keys::DAILY_MESSAGE_DATE).await.unwrap(),
            Some(clock.today())
        );
    }

    #[tokio::test]
    async fn garbage_count_reads_as_zero() {
        let (storage, kv, clock) = setup();
        kv.set_item(keys::DAILY_MESSAGE_DATE, &clock.today()).await.unwrap();
        kv.set_item(keys::DAILY_MESSAGE_COUNT, "lots").await.unwrap();
        assert_eq!(storage.get_daily_message_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn works_over_sqlite() {
        let db = Arc::new(crate::Database::open_in_memory().unwrap());
        let storage = Storage::new(db, Arc::new(crate::clock::SystemClock));
        storage.set_onboarding_done(true).await.unwrap();
        assert!(storage.get_onboarding_done().await.unwrap());
        assert_eq!(storage.increment_daily_message_count().await.unwrap(), 1);
    }
}
