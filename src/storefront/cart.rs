//! Session-held shopping cart for one tenant.
//!
//! A cart is a list of component lines, unique by component id. Quantities
//! stay within `1..=max`; a line that would drop to zero is removed instead.
//! Totals are never stored, [`Cart::summary`] recomputes them on each read.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Default cap on the quantity of a single component line.
pub const MAX_QUANTITY_PER_COMPONENT: i32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub component_id: Uuid,
    pub meal_id: Uuid,
    pub component_name: String,
    pub meal_name: String,
    pub quantity: i32,
    /// Price per unit in minor currency units, taken from the component.
    pub unit_price: i64,
}

impl CartItem {
    pub fn line_total(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }
}

/// Catalog view of a component, as needed to put it into a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartComponent {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub name: String,
    pub meal_name: String,
    pub price: i64,
    pub stock: Option<i32>,
    /// Both the component and its meal are orderable.
    pub available: bool,
}

impl CartComponent {
    fn ensure_orderable(&self, quantity: i32) -> AppResult<()> {
        if !self.available {
            return Err(AppError::ComponentUnavailable(format!(
                "{} is currently unavailable",
                self.name
            )));
        }
        if let Some(stock) = self.stock {
            if quantity > stock {
                return Err(AppError::ComponentUnavailable(format!(
                    "Only {} of {} left in stock",
                    stock.max(0),
                    self.name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, component_id: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|i| i.component_id == component_id)
    }

    /// Add `quantity` units of a component.
    ///
    /// An existing line is incremented and capped at `max`; otherwise a new
    /// line is inserted. Stock and availability are checked against the
    /// resulting quantity, and a failed check leaves the cart untouched.
    pub fn add(
        &mut self,
        component: &CartComponent,
        quantity: i32,
        max: i32,
    ) -> AppResult<&CartItem> {
        if quantity <= 0 {
            return Err(AppError::BadRequest(
                "quantity must be greater than 0".to_string(),
            ));
        }

        let current = self.get(component.id).map_or(0, |item| item.quantity);
        let next = current.saturating_add(quantity).min(max);
        component.ensure_orderable(next)?;

        let index = match self.position(component.id) {
            Some(index) => index,
            None => {
                self.items.push(CartItem {
                    component_id: component.id,
                    meal_id: component.meal_id,
                    component_name: component.name.clone(),
                    meal_name: component.meal_name.clone(),
                    quantity: 0,
                    unit_price: component.price,
                });
                self.items.len() - 1
            }
        };

        let item = &mut self.items[index];
        item.quantity = next;
        item.unit_price = component.price;
        item.component_name.clone_from(&component.name);
        item.meal_name.clone_from(&component.meal_name);
        Ok(&self.items[index])
    }

    /// Set the quantity of a line already in the cart.
    ///
    /// `quantity <= 0` removes the line. Larger values are capped at `max`
    /// without error.
    pub fn update_quantity(
        &mut self,
        component: &CartComponent,
        quantity: i32,
        max: i32,
    ) -> AppResult<Option<&CartItem>> {
        if quantity <= 0 {
            self.remove(component.id)?;
            return Ok(None);
        }

        let index = self.position(component.id).ok_or(AppError::NotFound)?;
        let next = quantity.min(max);
        component.ensure_orderable(next)?;

        let item = &mut self.items[index];
        item.quantity = next;
        item.unit_price = component.price;
        Ok(Some(&self.items[index]))
    }

    pub fn remove(&mut self, component_id: Uuid) -> AppResult<CartItem> {
        let index = self.position(component_id).ok_or(AppError::NotFound)?;
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Bring every line in line with the current catalog.
    ///
    /// Lines whose component is missing or unavailable are dropped, prices and
    /// names are refreshed, and quantities are clamped to `max` and to tracked
    /// stock. Returns `true` when anything changed.
    pub fn refresh(&mut self, catalog: &HashMap<Uuid, CartComponent>, max: i32) -> bool {
        let before = self.clone();

        self.items.retain_mut(|item| {
            let Some(component) = catalog.get(&item.component_id) else {
                return false;
            };
            if !component.available {
                return false;
            }
            let limit = component.stock.map_or(max, |stock| stock.min(max));
            if limit <= 0 {
                return false;
            }
            item.quantity = item.quantity.min(limit);
            item.unit_price = component.price;
            item.meal_id = component.meal_id;
            item.component_name.clone_from(&component.name);
            item.meal_name.clone_from(&component.meal_name);
            true
        });

        *self != before
    }

    pub fn total(&self) -> i64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn summary(&self) -> CartSummary {
        let mut meals: Vec<CartMeal> = Vec::new();
        for item in &self.items {
            match meals.iter_mut().find(|m| m.meal_id == item.meal_id) {
                Some(meal) => {
                    meal.quantity += item.quantity;
                    meal.subtotal += item.line_total();
                }
                None => meals.push(CartMeal {
                    meal_id: item.meal_id,
                    meal_name: item.meal_name.clone(),
                    quantity: item.quantity,
                    subtotal: item.line_total(),
                }),
            }
        }

        CartSummary {
            count: self.items.len(),
            total: self.total(),
            items: self.items.clone(),
            meals,
        }
    }

    fn position(&self, component_id: Uuid) -> Option<usize> {
        self.items.iter().position(|i| i.component_id == component_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartMeal {
    pub meal_id: Uuid,
    pub meal_name: String,
    pub quantity: i32,
    pub subtotal: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartSummary {
    /// Number of distinct component lines.
    pub count: usize,
    pub total: i64,
    pub items: Vec<CartItem>,
    pub meals: Vec<CartMeal>,
}
