//! Application state container.
//!
//! [`AppState`] holds everything loaded from storage plus the entitlement
//! flag.  Construct one per process (or per test), call [`AppState::load`],
//! then drive it through its mutators.  Every mutator writes through the
//! store first and only updates memory once the write has succeeded.

use std::sync::Arc;

use tracing::{debug, info, warn};

use pocket_shared::catalog::seeded_coaches;
use pocket_shared::constants::FREE_DAILY_MESSAGES;
use pocket_shared::{ChatSession, Coach, OnboardingState, UserProfile};
use pocket_store::storage::ChatSessions;
use pocket_store::{Clock, StoreError, Storage};

use crate::ai_client::ReplySource;
use crate::entitlements::is_pro_user;
use crate::error::{ClientError, Result};
use crate::purchases::PurchaseProvider;

/// Central application state.
pub struct AppState {
    onboarding: OnboardingState,
    user_profile: Option<UserProfile>,
    custom_coaches: Vec<Coach>,
    chat_sessions: ChatSessions,
    is_pro: bool,
    daily_message_count: u32,
    is_loading: bool,

    pub(crate) storage: Storage,
    pub(crate) purchases: Arc<dyn PurchaseProvider>,
    pub(crate) replies: Arc<dyn ReplySource>,
}

impl AppState {
    /// Create a new, unloaded state.
    pub fn new(
        storage: Storage,
        purchases: Arc<dyn PurchaseProvider>,
        replies: Arc<dyn ReplySource>,
    ) -> Self {
        Self {
            onboarding: OnboardingState::Unknown,
            user_profile: None,
            custom_coaches: Vec::new(),
            chat_sessions: ChatSessions::new(),
            is_pro: false,
            daily_message_count: 0,
            is_loading: true,
            storage,
            purchases,
            replies,
        }
    }

    /// Load every persisted value and the entitlement flag concurrently.
    ///
    /// A failed read is logged and leaves the defaults in place; loading is
    /// marked complete either way.
    pub async fn load(&mut self) {
        let storage = &self.storage;
        let purchases = self.purchases.as_ref();

        let loaded = tokio::try_join!(
            storage.get_onboarding_done(),
            storage.get_user_profile(),
            storage.get_custom_coaches(),
            storage.get_chat_sessions(),
            storage.get_daily_message_count(),
            async { Ok::<_, StoreError>(is_pro_user(purchases).await) },
        );

        match loaded {
            Ok((onboarding, profile, custom_coaches, chat_sessions, daily_count, is_pro)) => {
                self.onboarding = onboarding.into();
                self.user_profile = profile;
                self.custom_coaches = custom_coaches;
                self.chat_sessions = chat_sessions;
                self.daily_message_count = daily_count;
                self.is_pro = is_pro;
                info!(
                    onboarding = ?self.onboarding,
                    custom_coaches = self.custom_coaches.len(),
                    sessions = self.chat_sessions.len(),
                    daily_count,
                    is_pro,
                    "App state loaded"
                );
            }
            Err(e) => warn!(error = %e, "App state load failed"),
        }

        self.is_loading = false;
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    pub fn onboarding(&self) -> OnboardingState {
        self.onboarding
    }

    pub fn user_profile(&self) -> Option<&UserProfile> {
        self.user_profile.as_ref()
    }

    pub fn custom_coaches(&self) -> &[Coach] {
        &self.custom_coaches
    }

    pub fn chat_sessions(&self) -> &ChatSessions {
        &self.chat_sessions
    }

    pub fn chat_session(&self, coach_id: &str) -> Option<&ChatSession> {
        self.chat_sessions.get(coach_id)
    }

    pub fn is_pro(&self) -> bool {
        self.is_pro
    }

    pub fn daily_message_count(&self) -> u32 {
        self.daily_message_count
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        self.storage.clock()
    }

    /// Built-in coaches followed by custom ones in creation order.
    pub fn all_coaches(&self) -> Vec<Coach> {
        seeded_coaches()
            .iter()
            .chain(self.custom_coaches.iter())
            .cloned()
            .collect()
    }

    pub fn find_coach(&self, id: &str) -> Option<Coach> {
        seeded_coaches()
            .iter()
            .chain(self.custom_coaches.iter())
            .find(|c| c.id == id)
            .cloned()
    }

    /// Pro users always may; free users only while under today's quota.
    pub fn can_send_message(&self) -> bool {
        self.is_pro || self.daily_message_count < FREE_DAILY_MESSAGES
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    pub async fn set_onboarding_done(&mut self, done: bool) -> Result<()> {
        self.storage.set_onboarding_done(done).await?;
        self.onboarding = done.into();
        Ok(())
    }

    pub async fn set_user_profile(&mut self, profile: UserProfile) -> Result<()> {
        let saved = self.storage.set_user_profile(&profile).await?;
        self.user_profile = Some(saved);
        Ok(())
    }

    /// Append a custom coach.  The id must not collide with any existing
    /// coach.
    pub async fn add_custom_coach(&mut self, coach: Coach) -> Result<()> {
        if self.find_coach(&coach.id).is_some() {
            return Err(ClientError::DuplicateCoachId(coach.id));
        }

        let mut next = self.custom_coaches.clone();
        next.push(Coach {
            is_custom: true,
            ..coach
        });

        self.storage.set_custom_coaches(&next).await?;
        self.custom_coaches = next;
        Ok(())
    }

    /// Replace the session for `coach_id` and write the whole map back.
    pub async fn update_chat_session(&mut self, coach_id: &str, session: ChatSession) -> Result<()> {
        let mut next = self.chat_sessions.clone();
        next.insert(coach_id.to_string(), session);

        self.storage.set_chat_sessions(&next).await?;
        self.chat_sessions = next;
        Ok(())
    }

    pub async fn refresh_pro(&mut self) {
        self.is_pro = is_pro_user(self.purchases.as_ref()).await;
        debug!(is_pro = self.is_pro, "Entitlement refreshed");
    }

    pub async fn refresh_daily_count(&mut self) -> Result<()> {
        self.daily_message_count = self.storage.get_daily_message_count().await?;
        Ok(())
    }

    pub async fn increment_daily_message_count(&mut self) -> Result<u32> {
        let count = self.storage.increment_daily_message_count().await?;
        self.daily_message_count = count;
        Ok(count)
    }
}
