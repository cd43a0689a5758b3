use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{OrderList, OrderWithItems},
    entity::{
        components::{Column as ComponentCol, Entity as Components},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItem, Tenant},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
    storefront::{Cart, checkout::ProceedTicket},
};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub async fn list_orders(
    state: &AppState,
    tenant: &Tenant,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all()
        .add(OrderCol::TenantId.eq(tenant.id))
        .add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    tenant: &Tenant,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::TenantId.eq(tenant.id))
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Turn a checked cart into a pending order.
///
/// Components are locked for the duration of the transaction so two buyers
/// cannot both take the last unit of tracked stock.
pub async fn place_order(
    state: &AppState,
    tenant: &Tenant,
    ticket: ProceedTicket,
    cart: &Cart,
) -> AppResult<OrderWithItems> {
    let txn = state.orm.begin().await?;

    let ids = lock_order(cart.items().iter().map(|i| i.component_id));
    let stock: HashMap<Uuid, (Option<i32>, bool)> = Components::find()
        .filter(ComponentCol::Id.is_in(ids))
        .order_by_asc(ComponentCol::Id)
        .lock(LockType::Update)
        .all(&txn)
        .await?
        .into_iter()
        .map(|c| (c.id, (c.stock, c.is_available)))
        .collect();

    for item in cart.items() {
        match stock.get(&item.component_id) {
            Some((_, false)) | None => {
                return Err(AppError::ComponentUnavailable(format!(
                    "{} is currently unavailable",
                    item.component_name
                )));
            }
            Some((Some(left), true)) if *left < item.quantity => {
                return Err(AppError::ComponentUnavailable(format!(
                    "Only {} of {} left in stock",
                    left, item.component_name
                )));
            }
            Some(_) => {}
        }
    }

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        tenant_id: Set(tenant.id),
        user_id: Set(ticket.user_id),
        order_number: Set(build_order_number(order_id)),
        checkout_method: Set(ticket.method.as_str().to_string()),
        total_amount: Set(ticket.total),
        status: Set(STATUS_PENDING.into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(cart.len());
    for line in cart.items() {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            component_id: Set(line.component_id),
            meal_id: Set(line.meal_id),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(order_item_from_entity(item));

        Components::update_many()
            .col_expr(
                ComponentCol::Stock,
                Expr::col(ComponentCol::Stock).sub(line.quantity),
            )
            .filter(ComponentCol::Id.eq(line.component_id))
            .filter(ComponentCol::Stock.is_not_null())
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    tracing::info!(
        tenant = %tenant.slug,
        order_number = %order.order_number,
        total = order.total_amount,
        "order placed"
    );
    audit::record(
        &state.pool,
        Some(ticket.user_id),
        Some(tenant.id),
        "checkout",
        "orders",
        serde_json::json!({ "order_id": order.id, "method": order.checkout_method }),
    )
    .await;

    Ok(OrderWithItems {
        order: order_from_entity(order),
        items,
    })
}

/// Move an order out of `pending`. Cancelling puts tracked stock back.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: &str,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    if status != STATUS_CONFIRMED && status != STATUS_CANCELLED {
        return Err(AppError::BadRequest("Invalid order status".into()));
    }

    let txn = state.orm.begin().await?;
    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    if existing.status != STATUS_PENDING {
        return Err(AppError::BadRequest(format!(
            "Order is already {}",
            existing.status
        )));
    }

    let order = if status == STATUS_CANCELLED {
        cancel_order(&txn, existing).await?
    } else {
        let mut active: OrderActive = existing.into();
        active.status = Set(STATUS_CONFIRMED.into());
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?
    };

    txn.commit().await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        Some(order.tenant_id),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

/// Cancel every pending order created before `now - older_than`.
///
/// Safe to run repeatedly: only `pending` orders are touched, and each one
/// is cancelled and restocked in the same transaction.
pub async fn cancel_stale_orders(state: &AppState, older_than: chrono::Duration) -> AppResult<u64> {
    let cutoff = Utc::now() - older_than;
    let txn = state.orm.begin().await?;

    let stale = Orders::find()
        .filter(OrderCol::Status.eq(STATUS_PENDING))
        .filter(OrderCol::CreatedAt.lt(cutoff))
        .order_by_asc(OrderCol::Id)
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    let mut cancelled = 0;
    for order in stale {
        let order = cancel_order(&txn, order).await?;
        tracing::info!(order_number = %order.order_number, "stale order cancelled");
        cancelled += 1;
    }

    txn.commit().await?;
    Ok(cancelled)
}

async fn cancel_order(txn: &DatabaseTransaction, order: OrderModel) -> AppResult<OrderModel> {
    let mut items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(txn)
        .await?;
    items.sort_by_key(|item| item.component_id);

    Components::find()
        .filter(ComponentCol::Id.is_in(lock_order(items.iter().map(|i| i.component_id))))
        .order_by_asc(ComponentCol::Id)
        .lock(LockType::Update)
        .all(txn)
        .await?;

    for item in items {
        Components::update_many()
            .col_expr(
                ComponentCol::Stock,
                Expr::col(ComponentCol::Stock).add(item.quantity),
            )
            .filter(ComponentCol::Id.eq(item.component_id))
            .filter(ComponentCol::Stock.is_not_null())
            .exec(txn)
            .await?;
    }

    let mut active: OrderActive = order.into();
    active.status = Set(STATUS_CANCELLED.into());
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(txn).await?)
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        tenant_id: model.tenant_id,
        user_id: model.user_id,
        order_number: model.order_number,
        checkout_method: model.checkout_method,
        total_amount: model.total_amount,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        component_id: model.component_id,
        meal_id: model.meal_id,
        quantity: model.quantity,
        unit_price: model.unit_price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

/// Component ids in the order their rows are locked. Every transaction that
/// touches stock locks in ascending id order so two of them cannot deadlock.
pub fn lock_order(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub fn build_order_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    let short = &suffix[..8];
    format!("DM-{}-{}", date, short.to_ascii_uppercase())
}
