use std::sync::Arc;

use dancy_meals::storefront::{Cart, CartComponent, CheckoutMethod, TenantSession};
use tower_sessions::{MemoryStore, Session};
use uuid::Uuid;

fn session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

fn cart_with_one_line() -> Cart {
    let component = CartComponent {
        id: Uuid::new_v4(),
        meal_id: Uuid::new_v4(),
        name: "Beef skewer".into(),
        meal_name: "Suya Platter".into(),
        price: 350,
        stock: Some(20),
        available: true,
    };
    let mut cart = Cart::new();
    cart.add(&component, 3, 10).expect("add");
    cart
}

#[tokio::test]
async fn carts_are_isolated_per_tenant() {
    let shared = session();
    let first = TenantSession::new(shared.clone(), Uuid::new_v4());
    let second = TenantSession::new(shared, Uuid::new_v4());

    let cart = cart_with_one_line();
    first.save_cart(&cart).await.expect("save");
    first
        .save_method(CheckoutMethod::Delivery)
        .await
        .expect("save method");

    assert_eq!(first.load_cart().await.expect("load"), cart);
    assert!(second.load_cart().await.expect("load").is_empty());
    assert_eq!(
        second.load_method().await.expect("load"),
        CheckoutMethod::Unset
    );
}

#[tokio::test]
async fn saving_empty_cart_drops_the_key() {
    let shared = session();
    let store = TenantSession::new(shared.clone(), Uuid::new_v4());
    store.save_cart(&cart_with_one_line()).await.expect("save");

    store.save_cart(&Cart::new()).await.expect("save empty");

    let key = format!("cart.{}", store.tenant_id());
    let raw: Option<serde_json::Value> = shared.get(&key).await.expect("get");
    assert!(raw.is_none());
}

#[tokio::test]
async fn clear_checkout_removes_cart_and_method() {
    let store = TenantSession::new(session(), Uuid::new_v4());
    store.save_cart(&cart_with_one_line()).await.expect("save");
    store
        .save_method(CheckoutMethod::Pickup)
        .await
        .expect("save method");

    store.clear_checkout().await.expect("clear");

    assert!(store.load_cart().await.expect("load").is_empty());
    assert_eq!(
        store.load_method().await.expect("load"),
        CheckoutMethod::Unset
    );
}
