//! Fakes for the external providers, shared by the unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pocket_shared::constants::PRO_ENTITLEMENT_ID;
use pocket_shared::entitlement::{CustomerInfo, Offering, Offerings, Package};
use pocket_shared::{ChatTurn, Coach, UserProfile};

use crate::ai_client::ReplySource;
use crate::error::{ChatError, PurchaseError};
use crate::purchases::PurchaseProvider;

pub struct FakePurchases {
    info: Mutex<Option<CustomerInfo>>,
    grants_on_purchase: bool,
    user_cancels: bool,
    has_offering: bool,
    configured_with: Mutex<Option<String>>,
}

impl FakePurchases {
    fn with(info: Option<CustomerInfo>, grants_on_purchase: bool) -> Self {
        Self {
            info: Mutex::new(info),
            grants_on_purchase,
            user_cancels: false,
            has_offering: true,
            configured_with: Mutex::new(None),
        }
    }

    pub fn pro() -> Self {
        Self::with(Some(CustomerInfo::with_active(PRO_ENTITLEMENT_ID)), true)
    }

    pub fn free() -> Self {
        Self::with(Some(CustomerInfo::default()), true)
    }

    /// Free user whose purchases complete without granting pro.
    pub fn free_no_grant() -> Self {
        Self::with(Some(CustomerInfo::default()), false)
    }

    pub fn failing() -> Self {
        Self::with(None, false)
    }

    /// Free user who backs out of the store sheet.
    pub fn cancelling() -> Self {
        Self {
            user_cancels: true,
            ..Self::free()
        }
    }

    /// Free user with nothing on offer.
    pub fn no_offering() -> Self {
        Self {
            has_offering: false,
            ..Self::free()
        }
    }

    pub fn configured_with(&self) -> Option<String> {
        self.configured_with.lock().unwrap().clone()
    }

    fn snapshot(&self) -> Result<CustomerInfo, PurchaseError> {
        self.info
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| PurchaseError::Provider("offline".into()))
    }
}

#[async_trait]
impl PurchaseProvider for FakePurchases {
    async fn configure(&self, api_key: &str) -> Result<(), PurchaseError> {
        *self.configured_with.lock().unwrap() = Some(api_key.to_string());
        Ok(())
    }

    async fn get_customer_info(&self) -> Result<CustomerInfo, PurchaseError> {
        self.snapshot()
    }

    async fn get_offerings(&self) -> Result<Offerings, PurchaseError> {
        self.snapshot()?;
        if !self.has_offering {
            return Ok(Offerings::default());
        }
        Ok(Offerings {
            current: Some(Offering {
                identifier: "default".into(),
                available_packages: vec![
                    Package {
                        identifier: "$rc_monthly".into(),
                        product_title: "Pocket Coach Pro (Monthly)".into(),
                        price_string: "$4.99".into(),
                    },
                    Package {
                        identifier: "$rc_annual".into(),
                        product_title: "Pocket Coach Pro (Annual)".into(),
                        price_string: "$29.99".into(),
                    },
                ],
            }),
        })
    }

    async fn purchase_package(&self, package_id: &str) -> Result<CustomerInfo, PurchaseError> {
        let offerings = self.get_offerings().await?;
        let known = offerings
            .current
            .iter()
            .flat_map(|o| o.available_packages.iter())
            .any(|p| p.identifier == package_id);
        if !known {
            return Err(PurchaseError::UnknownPackage(package_id.to_string()));
        }
        if self.user_cancels {
            return Err(PurchaseError::Cancelled);
        }
        if self.grants_on_purchase {
            *self.info.lock().unwrap() = Some(CustomerInfo::with_active(PRO_ENTITLEMENT_ID));
        }
        self.snapshot()
    }

    async fn restore_purchases(&self) -> Result<CustomerInfo, PurchaseError> {
        self.snapshot()
    }
}

/// Reply source that records the history it was given.
#[derive(Default)]
pub struct ScriptedReplies {
    fail: bool,
    seen: Mutex<Vec<Vec<ChatTurn>>>,
}

impl ScriptedReplies {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn histories(&self) -> Vec<Vec<ChatTurn>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySource for ScriptedReplies {
    async fn reply(
        &self,
        coach: &Coach,
        _profile: Option<&UserProfile>,
        user_message: &str,
        history: &[ChatTurn],
    ) -> Result<String, ChatError> {
        self.seen.lock().unwrap().push(history.to_vec());
        if self.fail {
            return Err(ChatError::Network("connection reset".into()));
        }
        Ok(format!("{} heard: {user_message}", coach.name))
    }
}

/// Records `analytics` events emitted on the current thread while the
/// guard returned by [`capture_analytics`] is alive.
#[derive(Clone, Default)]
pub struct CapturedEvents {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedEvents {
    pub fn lines(&self) -> Vec<String> {
        let buf = self.buf.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Event names in emission order.
    pub fn names(&self) -> Vec<String> {
        self.lines()
            .iter()
            .filter_map(|line| {
                let rest = &line[line.find("event=\"")? + 7..];
                Some(rest[..rest.find('"')?].to_string())
            })
            .collect()
    }
}

impl io::Write for CapturedEvents {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route `analytics` records into a buffer.  Use from a current-thread
/// runtime (the `#[tokio::test]` default) so every event lands here.
pub fn capture_analytics() -> (CapturedEvents, tracing::subscriber::DefaultGuard) {
    let captured = CapturedEvents::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("analytics=debug"))
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (captured, guard)
}
