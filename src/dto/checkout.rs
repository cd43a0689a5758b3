use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storefront::{CheckoutMethod, CheckoutOptions};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectMethodRequest {
    pub method: CheckoutMethod,
}

/// Result of a method selection. On `error` the previous choice is kept.
#[derive(Debug, Serialize, ToSchema)]
pub struct MethodUpdate {
    pub options: CheckoutOptions,
    pub error: Option<String>,
}
