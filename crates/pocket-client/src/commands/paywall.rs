use serde_json::json;
use tracing::{debug, info, warn};

use pocket_shared::entitlement::{check_pro_entitlement, CustomerInfo, Package};

use crate::analytics::{track, Event};
use crate::error::{PurchaseError, Result};
use crate::state::AppState;

impl AppState {
    /// Packages in the current offering.  Empty when the provider has no
    /// current offering.
    pub async fn load_paywall(&self) -> Result<Vec<Package>> {
        let offerings = self.purchases.get_offerings().await.map_err(|e| {
            warn!(error = %e, "Offerings load failed");
            e
        })?;

        let Some(current) = offerings.current else {
            debug!("No current offering");
            return Ok(Vec::new());
        };

        track(
            Event::PaywallView,
            Some(json!({ "offeringId": current.identifier })),
        );
        Ok(current.available_packages)
    }

    /// Buy `package_id`.  Returns whether the user is now pro.
    pub async fn purchase(&mut self, package_id: &str) -> Result<bool> {
        match self.purchases.purchase_package(package_id).await {
            Ok(info) => Ok(self.apply_snapshot(&info, Event::PurchaseSuccess).await),
            Err(PurchaseError::Cancelled) => {
                debug!(package = package_id, "Purchase cancelled by user");
                Err(PurchaseError::Cancelled.into())
            }
            Err(e) => {
                warn!(package = package_id, error = %e, "Purchase failed");
                track(Event::PaywallView, Some(json!({ "error": e.to_string() })));
                Err(e.into())
            }
        }
    }

    /// Restore earlier purchases.  Returns whether the user is now pro.
    pub async fn restore_purchases(&mut self) -> Result<bool> {
        let info = self.purchases.restore_purchases().await.map_err(|e| {
            warn!(error = %e, "Restore failed");
            e
        })?;
        Ok(self.apply_snapshot(&info, Event::RestoreSuccess).await)
    }

    /// Success is only reported once the snapshot actually carries pro.
    async fn apply_snapshot(&mut self, info: &CustomerInfo, success: Event) -> bool {
        if !check_pro_entitlement(info) {
            return self.is_pro();
        }

        track(success, None);
        self.refresh_pro().await;
        info!(is_pro = self.is_pro(), "Entitlement updated from store");
        self.is_pro()
    }
}
