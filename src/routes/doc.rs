use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartUpdate, UpdateCartItemRequest},
        catalog::{
            CreateComponentRequest, CreateMealRequest, MealWithComponents, Menu,
            StockAdjustRequest,
        },
        checkout::{MethodUpdate, SelectMethodRequest},
        orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
        tenants::{CreateTenantRequest, StorefrontProfile, TenantList, UpdateTenantRequest},
    },
    models::{Component, Meal, Order, OrderItem, Tenant, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, checkout, health, orders, params, storefront},
    storefront::{CartItem, CartSummary, CheckoutMethod, CheckoutOptions, cart::CartMeal},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        storefront::storefront_profile,
        storefront::list_meals,
        cart::cart_summary,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        checkout::checkout_options,
        checkout::select_method,
        checkout::proceed,
        orders::list_orders,
        orders::get_order,
        admin::list_tenants,
        admin::create_tenant,
        admin::update_tenant,
        admin::create_meal,
        admin::create_component,
        admin::adjust_stock,
        admin::update_order_status
    ),
    components(
        schemas(
            User,
            Tenant,
            Meal,
            Component,
            Order,
            OrderItem,
            CartItem,
            CartMeal,
            CartSummary,
            CartUpdate,
            CheckoutMethod,
            CheckoutOptions,
            MethodUpdate,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            AddToCartRequest,
            UpdateCartItemRequest,
            SelectMethodRequest,
            CreateTenantRequest,
            UpdateTenantRequest,
            TenantList,
            StorefrontProfile,
            CreateMealRequest,
            CreateComponentRequest,
            StockAdjustRequest,
            MealWithComponents,
            Menu,
            OrderList,
            OrderWithItems,
            UpdateOrderStatusRequest,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<CartSummary>,
            ApiResponse<CartUpdate>,
            ApiResponse<CheckoutOptions>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<TenantList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Storefront", description = "Tenant profile and menu"),
        (name = "Cart", description = "Session cart of the current storefront"),
        (name = "Checkout", description = "Delivery/pickup choice and order placement"),
        (name = "Orders", description = "Order history"),
        (name = "Admin", description = "Platform administration"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
