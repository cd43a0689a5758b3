use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::storefront::CartSummary;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub meal_id: Uuid,
    pub component_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    /// Zero or less removes the line.
    pub quantity: i32,
}

/// Result of a cart write. `error` carries a stock or availability problem;
/// the cart itself is then returned unchanged.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartUpdate {
    pub cart: CartSummary,
    pub error: Option<String>,
}
