//! Per-tenant view over the visitor's session.
//!
//! One browser session can visit several storefronts, so every key is
//! namespaced by tenant id.

use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    error::AppResult,
    storefront::{cart::Cart, checkout::CheckoutMethod},
};

/// Session key prefixes.
pub mod keys {
    /// Cart lines for one tenant.
    pub const CART: &str = "cart";

    /// Selected delivery/pickup method for one tenant.
    pub const CHECKOUT_METHOD: &str = "checkout_method";
}

#[derive(Debug, Clone)]
pub struct TenantSession {
    session: Session,
    tenant_id: Uuid,
}

impl TenantSession {
    pub fn new(session: Session, tenant_id: Uuid) -> Self {
        Self { session, tenant_id }
    }

    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    fn key(&self, prefix: &str) -> String {
        format!("{prefix}.{}", self.tenant_id)
    }

    pub async fn load_cart(&self) -> AppResult<Cart> {
        let cart = self
            .session
            .get::<Cart>(&self.key(keys::CART))
            .await?
            .unwrap_or_default();
        Ok(cart)
    }

    pub async fn save_cart(&self, cart: &Cart) -> AppResult<()> {
        let key = self.key(keys::CART);
        if cart.is_empty() {
            self.session.remove_value(&key).await?;
        } else {
            self.session.insert(&key, cart).await?;
        }
        Ok(())
    }

    pub async fn load_method(&self) -> AppResult<CheckoutMethod> {
        let method = self
            .session
            .get::<CheckoutMethod>(&self.key(keys::CHECKOUT_METHOD))
            .await?
            .unwrap_or_default();
        Ok(method)
    }

    pub async fn save_method(&self, method: CheckoutMethod) -> AppResult<()> {
        let key = self.key(keys::CHECKOUT_METHOD);
        if method == CheckoutMethod::Unset {
            self.session.remove_value(&key).await?;
        } else {
            self.session.insert(&key, method).await?;
        }
        Ok(())
    }

    /// Drop the cart and method after a completed checkout.
    pub async fn clear_checkout(&self) -> AppResult<()> {
        self.session.remove_value(&self.key(keys::CART)).await?;
        self.session
            .remove_value(&self.key(keys::CHECKOUT_METHOD))
            .await?;
        Ok(())
    }
}
