use std::collections::HashMap;

use dancy_meals::{
    error::AppError,
    storefront::{Cart, CartComponent, MAX_QUANTITY_PER_COMPONENT},
};
use uuid::Uuid;

const MAX: i32 = MAX_QUANTITY_PER_COMPONENT;

fn component(name: &str, meal_id: Uuid, price: i64, stock: Option<i32>) -> CartComponent {
    CartComponent {
        id: Uuid::new_v4(),
        meal_id,
        name: name.to_string(),
        meal_name: "Jollof Rice".to_string(),
        price,
        stock,
        available: true,
    }
}

#[test]
fn repeated_add_is_capped_at_max() {
    let rice = component("Rice bowl", Uuid::new_v4(), 1200, None);
    let mut cart = Cart::new();

    cart.add(&rice, 6, MAX).expect("first add");
    let item = cart.add(&rice, 7, MAX).expect("second add");

    assert_eq!(item.quantity, MAX);
    assert_eq!(cart.len(), 1);
}

#[test]
fn add_sums_quantities_below_cap() {
    let rice = component("Rice bowl", Uuid::new_v4(), 1200, None);
    let mut cart = Cart::new();

    cart.add(&rice, 2, MAX).expect("add");
    cart.add(&rice, 3, MAX).expect("add");

    assert_eq!(cart.get(rice.id).map(|i| i.quantity), Some(5));
    assert_eq!(cart.total(), 6000);
}

#[test]
fn add_rejects_non_positive_quantity() {
    let rice = component("Rice bowl", Uuid::new_v4(), 1200, None);
    let mut cart = Cart::new();

    assert!(matches!(cart.add(&rice, 0, MAX), Err(AppError::BadRequest(_))));
    assert!(cart.is_empty());
}

#[test]
fn update_to_zero_removes_line() {
    let meal = Uuid::new_v4();
    let rice = component("Rice bowl", meal, 1200, None);
    let plantain = component("Fried plantain", meal, 400, None);
    let mut cart = Cart::new();
    cart.add(&rice, 1, MAX).expect("add");
    cart.add(&plantain, 2, MAX).expect("add");

    let updated = cart.update_quantity(&rice, 0, MAX).expect("update");

    assert!(updated.is_none());
    assert_eq!(cart.len(), 1);
    assert!(cart.get(rice.id).is_none());
}

#[test]
fn update_above_max_is_capped_silently() {
    let rice = component("Rice bowl", Uuid::new_v4(), 1200, None);
    let mut cart = Cart::new();
    cart.add(&rice, 1, MAX).expect("add");

    let item = cart
        .update_quantity(&rice, MAX + 25, MAX)
        .expect("update")
        .expect("line kept");

    assert_eq!(item.quantity, MAX);
}

#[test]
fn update_of_missing_line_is_not_found() {
    let rice = component("Rice bowl", Uuid::new_v4(), 1200, None);
    let mut cart = Cart::new();

    assert!(matches!(
        cart.update_quantity(&rice, 2, MAX),
        Err(AppError::NotFound)
    ));
}

#[test]
fn insufficient_stock_leaves_cart_unchanged() {
    let soup = component("Soup bowl", Uuid::new_v4(), 1500, Some(3));
    let mut cart = Cart::new();
    cart.add(&soup, 2, MAX).expect("add");
    let before = cart.clone();

    let err = cart.add(&soup, 2, MAX).unwrap_err();

    match err {
        AppError::ComponentUnavailable(message) => {
            assert_eq!(message, "Only 3 of Soup bowl left in stock")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(cart, before);
}

#[test]
fn unavailable_component_cannot_be_added() {
    let mut soup = component("Soup bowl", Uuid::new_v4(), 1500, None);
    soup.available = false;
    let mut cart = Cart::new();

    assert!(matches!(
        cart.add(&soup, 1, MAX),
        Err(AppError::ComponentUnavailable(_))
    ));
    assert!(cart.is_empty());
}

#[test]
fn remove_and_clear() {
    let rice = component("Rice bowl", Uuid::new_v4(), 1200, None);
    let mut cart = Cart::new();
    cart.add(&rice, 1, MAX).expect("add");

    let removed = cart.remove(rice.id).expect("remove");
    assert_eq!(removed.component_id, rice.id);
    assert!(matches!(cart.remove(rice.id), Err(AppError::NotFound)));

    cart.add(&rice, 1, MAX).expect("add");
    cart.clear();
    assert!(cart.is_empty());
}

#[test]
fn refresh_follows_catalog_changes() {
    let meal = Uuid::new_v4();
    let rice = component("Rice bowl", meal, 1200, None);
    let soup = component("Soup bowl", meal, 1500, None);
    let gone = component("Old special", meal, 900, None);
    let mut cart = Cart::new();
    cart.add(&rice, 5, MAX).expect("add");
    cart.add(&soup, 2, MAX).expect("add");
    cart.add(&gone, 1, MAX).expect("add");

    let mut catalog = HashMap::new();
    let mut rice_now = rice.clone();
    rice_now.price = 1300;
    rice_now.stock = Some(2);
    let mut soup_now = soup.clone();
    soup_now.available = false;
    catalog.insert(rice.id, rice_now);
    catalog.insert(soup.id, soup_now);

    assert!(cart.refresh(&catalog, MAX));

    assert_eq!(cart.len(), 1);
    let line = cart.get(rice.id).expect("rice kept");
    assert_eq!(line.quantity, 2);
    assert_eq!(line.unit_price, 1300);
    assert!(!cart.refresh(&catalog, MAX));
}

#[test]
fn summary_groups_lines_by_meal() {
    let jollof = Uuid::new_v4();
    let suya = Uuid::new_v4();
    let rice = component("Rice bowl", jollof, 1200, None);
    let plantain = component("Fried plantain", jollof, 400, None);
    let mut skewer = component("Beef skewer", suya, 350, None);
    skewer.meal_name = "Suya Platter".to_string();

    let mut cart = Cart::new();
    cart.add(&rice, 1, MAX).expect("add");
    cart.add(&plantain, 2, MAX).expect("add");
    cart.add(&skewer, 4, MAX).expect("add");

    let summary = cart.summary();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.total, 1200 + 800 + 1400);
    assert_eq!(summary.meals.len(), 2);

    let jollof_line = summary
        .meals
        .iter()
        .find(|m| m.meal_id == jollof)
        .expect("jollof");
    assert_eq!(jollof_line.quantity, 3);
    assert_eq!(jollof_line.subtotal, 2000);
}
