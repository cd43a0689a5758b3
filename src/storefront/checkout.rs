//! Delivery/pickup choice for the checkout flow.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Tenant,
    storefront::cart::Cart,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMethod {
    #[default]
    Unset,
    Delivery,
    Pickup,
}

impl CheckoutMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMethod::Unset => "unset",
            CheckoutMethod::Delivery => "delivery",
            CheckoutMethod::Pickup => "pickup",
        }
    }
}

impl fmt::Display for CheckoutMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fulfilment methods a tenant currently offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailableMethods {
    pub delivery: bool,
    pub pickup: bool,
}

impl AvailableMethods {
    pub fn for_tenant(tenant: &Tenant) -> Self {
        Self {
            delivery: tenant.offers_delivery,
            pickup: tenant.offers_pickup,
        }
    }

    pub fn offers(&self, method: CheckoutMethod) -> bool {
        match method {
            CheckoutMethod::Unset => false,
            CheckoutMethod::Delivery => self.delivery,
            CheckoutMethod::Pickup => self.pickup,
        }
    }

    /// The single offered method, if exactly one is offered.
    pub fn only(&self) -> Option<CheckoutMethod> {
        match (self.delivery, self.pickup) {
            (true, false) => Some(CheckoutMethod::Delivery),
            (false, true) => Some(CheckoutMethod::Pickup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CheckoutOptions {
    pub has_delivery: bool,
    pub has_pickup: bool,
    pub current_method: CheckoutMethod,
}

/// Stored method plus the tenant's offer, as one small state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSelector {
    current: CheckoutMethod,
    available: AvailableMethods,
}

impl MethodSelector {
    pub fn new(current: CheckoutMethod, available: AvailableMethods) -> Self {
        Self { current, available }
    }

    pub fn current(&self) -> CheckoutMethod {
        self.current
    }

    /// Switch to `method`. On failure the current state is kept.
    pub fn select(&mut self, method: CheckoutMethod) -> AppResult<CheckoutMethod> {
        if !self.available.offers(method) {
            return Err(AppError::MethodUnavailable(method));
        }
        self.current = method;
        Ok(self.current)
    }

    /// Drop a stored method the tenant no longer offers. Runs on every read so
    /// the current method never disagrees with the offer.
    /// Returns `true` when the state changed.
    pub fn revalidate(&mut self) -> bool {
        if self.current != CheckoutMethod::Unset && !self.available.offers(self.current) {
            self.current = CheckoutMethod::Unset;
            return true;
        }
        false
    }

    /// Re-validate on entry to the method step.
    ///
    /// A stored method the tenant stopped offering falls back to `Unset`, and
    /// `Unset` moves to the only offered method when there is exactly one.
    /// Returns `true` when the state changed.
    pub fn enter_step(&mut self) -> bool {
        let before = self.current;
        self.revalidate();
        if self.current == CheckoutMethod::Unset {
            if let Some(only) = self.available.only() {
                self.current = only;
            }
        }
        self.current != before
    }

    pub fn options(&self) -> CheckoutOptions {
        CheckoutOptions {
            has_delivery: self.available.delivery,
            has_pickup: self.available.pickup,
            current_method: self.current,
        }
    }
}

/// Everything needed to place an order once the checks have passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProceedTicket {
    pub user_id: Uuid,
    pub method: CheckoutMethod,
    pub total: i64,
}

/// Gate for the final checkout step. Checks run in order: empty cart, missing
/// user, method no longer offered, order minimum. Nothing is mutated.
pub fn ensure_can_proceed(
    cart: &Cart,
    user_id: Option<Uuid>,
    selector: &MethodSelector,
    minimum_order_amount: i64,
) -> AppResult<ProceedTicket> {
    if cart.is_empty() {
        return Err(AppError::EmptyCart);
    }
    let user_id = user_id.ok_or(AppError::Unauthenticated)?;

    let method = selector.current();
    if !selector.available.offers(method) {
        return Err(AppError::MethodUnavailable(method));
    }

    let total = cart.total();
    if total < minimum_order_amount {
        return Err(AppError::BelowMinimumOrder {
            minimum: minimum_order_amount,
            total,
        });
    }

    Ok(ProceedTicket {
        user_id,
        method,
        total,
    })
}
