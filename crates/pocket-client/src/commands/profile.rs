use tracing::info;

use pocket_shared::UserProfile;

use crate::analytics::{track, Event};
use crate::error::Result;
use crate::state::AppState;

impl AppState {
    /// Mark onboarding as finished.
    pub async fn complete_onboarding(&mut self) -> Result<()> {
        self.set_onboarding_done(true).await?;
        track(Event::OnboardingComplete, None);
        info!("Onboarding complete");
        Ok(())
    }

    /// Save the profile form.  Blank fields are stored as unset.
    pub async fn save_profile(
        &mut self,
        values: &str,
        goals: &str,
        constraints: &str,
    ) -> Result<()> {
        let profile = UserProfile {
            values: field(values),
            goals: field(goals),
            constraints: field(constraints),
            updated_at: None,
        };
        self.set_user_profile(profile).await?;
        track(Event::ProfileUpdated, None);
        Ok(())
    }
}

fn field(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
