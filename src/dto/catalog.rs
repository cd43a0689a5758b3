use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Component, Meal},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMealRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateComponentRequest {
    pub name: String,
    pub price: i64,
    /// Leave empty for components whose stock is not tracked.
    pub stock: Option<i32>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl CreateMealRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".into()));
        }
        Ok(())
    }
}

impl CreateComponentRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".into()));
        }
        if self.price < 0 {
            return Err(AppError::BadRequest("price cannot be negative".into()));
        }
        if self.stock.is_some_and(|s| s < 0) {
            return Err(AppError::BadRequest("stock cannot be negative".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockAdjustRequest {
    pub delta: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MealWithComponents {
    pub meal: Meal,
    pub components: Vec<Component>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Menu {
    pub items: Vec<MealWithComponents>,
}
