use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::catalog::{
        CreateComponentRequest, CreateMealRequest, MealWithComponents, Menu, StockAdjustRequest,
    },
    entity::{
        components::{
            ActiveModel as ComponentActive, Column as ComponentCol, Entity as Components,
            Model as ComponentModel,
        },
        meals::{ActiveModel as MealActive, Column as MealCol, Entity as Meals, Model as MealModel},
        tenants::Entity as Tenants,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Component, Meal, Tenant},
    response::{ApiResponse, Meta},
    state::AppState,
    storefront::CartComponent,
};

/// Orderable meals of a tenant, each with its orderable components.
pub async fn list_menu(state: &AppState, tenant: &Tenant) -> AppResult<ApiResponse<Menu>> {
    let rows = Meals::find()
        .filter(MealCol::TenantId.eq(tenant.id))
        .filter(MealCol::IsAvailable.eq(true))
        .order_by_asc(MealCol::Name)
        .find_with_related(Components)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .map(|(meal, components)| MealWithComponents {
            meal: meal_from_entity(meal),
            components: components
                .into_iter()
                .filter(|c| c.is_available && c.stock.is_none_or(|s| s > 0))
                .map(component_from_entity)
                .collect(),
        })
        .filter(|m| !m.components.is_empty())
        .collect();

    Ok(ApiResponse::success("Menu", Menu { items }, Some(Meta::empty())))
}

pub async fn create_meal(
    state: &AppState,
    user: &AuthUser,
    tenant_id: Uuid,
    payload: CreateMealRequest,
) -> AppResult<ApiResponse<Meal>> {
    ensure_admin(user)?;
    payload.validate()?;

    if Tenants::find_by_id(tenant_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let meal = MealActive {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        is_available: Set(payload.is_available),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        Some(tenant_id),
        "meal_create",
        "meals",
        serde_json::json!({ "meal_id": meal.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Meal created",
        meal_from_entity(meal),
        Some(Meta::empty()),
    ))
}

pub async fn create_component(
    state: &AppState,
    user: &AuthUser,
    meal_id: Uuid,
    payload: CreateComponentRequest,
) -> AppResult<ApiResponse<Component>> {
    ensure_admin(user)?;
    payload.validate()?;

    let meal = Meals::find_by_id(meal_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let component = ComponentActive {
        id: Set(Uuid::new_v4()),
        meal_id: Set(meal.id),
        name: Set(payload.name.trim().to_string()),
        price: Set(payload.price),
        stock: Set(payload.stock),
        is_available: Set(payload.is_available),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        Some(meal.tenant_id),
        "component_create",
        "components",
        serde_json::json!({ "component_id": component.id, "meal_id": meal.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Component created",
        component_from_entity(component),
        Some(Meta::empty()),
    ))
}

pub async fn adjust_stock(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: StockAdjustRequest,
) -> AppResult<ApiResponse<Component>> {
    ensure_admin(user)?;
    if payload.delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }

    let txn = state.orm.begin().await?;
    let component = Components::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let Some(stock) = component.stock else {
        return Err(AppError::BadRequest(
            "stock is not tracked for this component".into(),
        ));
    };
    let new_stock = stock + payload.delta;
    if new_stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }

    let mut active: ComponentActive = component.into();
    active.stock = Set(Some(new_stock));
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        None,
        "stock_adjust",
        "components",
        serde_json::json!({ "component_id": updated.id, "delta": payload.delta }),
    )
    .await;

    Ok(ApiResponse::success(
        "Stock updated",
        component_from_entity(updated),
        Some(Meta::empty()),
    ))
}

/// Look up one component for the cart, scoped to the tenant.
pub async fn find_cart_component<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    component_id: Uuid,
) -> AppResult<CartComponent> {
    let found = Components::find_by_id(component_id)
        .find_also_related(Meals)
        .one(conn)
        .await?;

    match found {
        Some((component, Some(meal))) if meal.tenant_id == tenant_id => {
            Ok(cart_component(component, &meal))
        }
        _ => Err(AppError::NotFound),
    }
}

/// Catalog snapshot for the given components; ids of other tenants are left out.
pub async fn load_cart_components<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    ids: &[Uuid],
) -> AppResult<HashMap<Uuid, CartComponent>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = Components::find()
        .filter(ComponentCol::Id.is_in(ids.iter().copied()))
        .find_also_related(Meals)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(component, meal)| {
            let meal = meal.filter(|m| m.tenant_id == tenant_id)?;
            Some((component.id, cart_component(component, &meal)))
        })
        .collect())
}

fn cart_component(component: ComponentModel, meal: &MealModel) -> CartComponent {
    CartComponent {
        id: component.id,
        meal_id: meal.id,
        name: component.name,
        meal_name: meal.name.clone(),
        price: component.price,
        stock: component.stock,
        available: component.is_available && meal.is_available,
    }
}

pub fn meal_from_entity(model: MealModel) -> Meal {
    Meal {
        id: model.id,
        tenant_id: model.tenant_id,
        name: model.name,
        description: model.description,
        is_available: model.is_available,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn component_from_entity(model: ComponentModel) -> Component {
    Component {
        id: model.id,
        meal_id: model.meal_id,
        name: model.name,
        price: model.price,
        stock: model.stock,
        is_available: model.is_available,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
