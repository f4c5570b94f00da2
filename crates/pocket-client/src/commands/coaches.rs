use serde_json::json;
use tracing::info;

use pocket_shared::{custom_coach_id, Coach, CoachDraft};

use crate::analytics::{track, Event};
use crate::error::{ClientError, Result};
use crate::state::AppState;

/// What the coach detail view needs to render.
#[derive(Debug, Clone)]
pub struct CoachView {
    pub coach: Coach,
    pub needs_pro: bool,
}

impl AppState {
    /// Whether `coach` is locked behind the paywall for this user.
    pub fn needs_pro(&self, coach: &Coach) -> bool {
        coach.is_pro && !self.is_pro()
    }

    pub fn view_coach(&self, coach_id: &str) -> Result<CoachView> {
        let coach = self
            .find_coach(coach_id)
            .ok_or_else(|| ClientError::CoachNotFound(coach_id.to_string()))?;
        track(Event::ViewCoach, Some(json!({ "coachId": coach.id })));
        Ok(CoachView {
            needs_pro: self.needs_pro(&coach),
            coach,
        })
    }

    /// Open a chat with the coach.  Returns `false` when the coach is locked
    /// and the caller should route to the paywall instead.
    pub fn start_chat(&self, coach_id: &str) -> Result<bool> {
        let view = self.view_coach(coach_id)?;
        if view.needs_pro {
            return Ok(false);
        }
        track(Event::StartChat, Some(json!({ "coachId": view.coach.id })));
        Ok(true)
    }

    /// Create and persist a coach from the form draft.
    ///
    /// The id comes from the creation timestamp, bumped past any id already
    /// taken.
    pub async fn create_custom_coach(&mut self, draft: CoachDraft) -> Result<Coach> {
        let mut created_at = self.clock().now_millis();
        while self.find_coach(&custom_coach_id(created_at)).is_some() {
            created_at += 1;
        }

        let coach = draft.into_coach(created_at)?;
        self.add_custom_coach(coach.clone()).await?;

        track(Event::CreateCoach, Some(json!({ "coachId": coach.id })));
        info!(coach = %coach.id, name = %coach.name, "Custom coach created");
        Ok(coach)
    }
}
