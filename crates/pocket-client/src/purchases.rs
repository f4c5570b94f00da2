//! Boundary to the external subscription provider.
//!
//! The provider SDK is opaque: it hands back customer snapshots and the
//! packages on offer.  Without an API key for the current platform the
//! client runs with [`UnconfiguredPurchases`], so every purchase feature is
//! silently disabled.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use pocket_shared::entitlement::{CustomerInfo, Offerings};

use crate::config::{ClientConfig, Platform};
use crate::error::PurchaseError;

#[async_trait]
pub trait PurchaseProvider: Send + Sync {
    async fn configure(&self, api_key: &str) -> Result<(), PurchaseError>;

    async fn get_customer_info(&self) -> Result<CustomerInfo, PurchaseError>;

    async fn get_offerings(&self) -> Result<Offerings, PurchaseError>;

    async fn purchase_package(&self, package_id: &str) -> Result<CustomerInfo, PurchaseError>;

    async fn restore_purchases(&self) -> Result<CustomerInfo, PurchaseError>;
}

/// Stand-in used when no provider key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredPurchases;

#[async_trait]
impl PurchaseProvider for UnconfiguredPurchases {
    async fn configure(&self, _api_key: &str) -> Result<(), PurchaseError> {
        Err(PurchaseError::NotConfigured)
    }

    async fn get_customer_info(&self) -> Result<CustomerInfo, PurchaseError> {
        Err(PurchaseError::NotConfigured)
    }

    async fn get_offerings(&self) -> Result<Offerings, PurchaseError> {
        Err(PurchaseError::NotConfigured)
    }

    async fn purchase_package(&self, _package_id: &str) -> Result<CustomerInfo, PurchaseError> {
        Err(PurchaseError::NotConfigured)
    }

    async fn restore_purchases(&self) -> Result<CustomerInfo, PurchaseError> {
        Err(PurchaseError::NotConfigured)
    }
}

/// Configure `provider` with the platform's key.
///
/// Returns [`UnconfiguredPurchases`] when no key is set.  A failed
/// `configure` call is logged and the provider is returned as is.
pub async fn init_purchases(
    provider: Arc<dyn PurchaseProvider>,
    config: &ClientConfig,
    platform: Platform,
) -> Arc<dyn PurchaseProvider> {
    let Some(api_key) = config.purchases_api_key(platform) else {
        debug!(?platform, "No purchases API key; subscription features disabled");
        return Arc::new(UnconfiguredPurchases);
    };

    match provider.configure(api_key).await {
        Ok(()) => info!(?platform, "Purchases configured"),
        Err(e) => warn!(?platform, error = %e, "Purchases configure failed"),
    }
    provider
}
