//! Product analytics events.
//!
//! Events are emitted as debug-level tracing records under the `analytics`
//! target; no data leaves the device.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ViewCoach,
    StartChat,
    PaywallView,
    PurchaseSuccess,
    RestoreSuccess,
    CreateCoach,
    ProfileUpdated,
    OnboardingComplete,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ViewCoach => "view_coach",
            Event::StartChat => "start_chat",
            Event::PaywallView => "paywall_view",
            Event::PurchaseSuccess => "purchase_success",
            Event::RestoreSuccess => "restore_success",
            Event::CreateCoach => "create_coach",
            Event::ProfileUpdated => "profile_updated",
            Event::OnboardingComplete => "onboarding_complete",
        }
    }
}

pub fn track(event: Event, props: Option<Value>) {
    match props {
        Some(props) => tracing::debug!(target: "analytics", event = event.name(), %props, "event"),
        None => tracing::debug!(target: "analytics", event = event.name(), "event"),
    }
}
