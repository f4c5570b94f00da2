use tracing::debug;

use pocket_shared::entitlement::check_pro_entitlement;

use crate::purchases::PurchaseProvider;

/// Ask the provider whether the user holds the pro entitlement.
///
/// Never fails: any provider error reads as "not pro".
pub async fn is_pro_user(provider: &dyn PurchaseProvider) -> bool {
    match provider.get_customer_info().await {
        Ok(info) => check_pro_entitlement(&info),
        Err(e) => {
            debug!(error = %e, "Entitlement check failed; treating user as free");
            false
        }
    }
}
