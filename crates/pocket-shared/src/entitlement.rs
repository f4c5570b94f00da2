use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::PRO_ENTITLEMENT_ID;

// Snapshot handed back by the purchase provider
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default)]
    pub entitlements: Entitlements,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Entitlements {
    /// Active grants keyed by entitlement identifier.  A `null` entry is
    /// treated the same as a missing one.
    #[serde(default)]
    pub active: HashMap<String, Option<EntitlementInfo>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementInfo {
    #[serde(default)]
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

impl CustomerInfo {
    /// Snapshot with the given entitlement active.
    pub fn with_active(identifier: &str) -> Self {
        let mut info = Self::default();
        info.entitlements.active.insert(
            identifier.to_string(),
            Some(EntitlementInfo {
                identifier: identifier.to_string(),
                ..Default::default()
            }),
        );
        info
    }
}

/// A purchasable package offered on the paywall.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub identifier: String,
    pub product_title: String,
    pub price_string: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offering {
    pub identifier: String,
    pub available_packages: Vec<Package>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Offerings {
    pub current: Option<Offering>,
}

pub fn entitlement_id() -> &'static str {
    PRO_ENTITLEMENT_ID
}

/// True iff the snapshot carries a non-null active `pro` entitlement.
pub fn check_pro_entitlement(info: &CustomerInfo) -> bool {
    matches!(info.entitlements.active.get(PRO_ENTITLEMENT_ID), Some(Some(_)))
}
