use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{response::ApiResponse, storefront::checkout::CheckoutMethod};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Tenant not found")]
    TenantNotFound,

    #[error("Tenant unavailable")]
    TenantUnavailable,

    #[error("{0}")]
    ComponentUnavailable(String),

    #[error("Checkout method {0} is not available")]
    MethodUnavailable(CheckoutMethod),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Login required")]
    Unauthenticated,

    #[error("Order total is below the minimum of {minimum}")]
    BelowMinimumOrder { minimum: i64, total: i64 },

    #[error("Session error")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

/// Where the client is sent when a checkout step cannot continue.
pub const CART_PATH: &str = "/api/cart";
pub const LOGIN_PATH: &str = "/api/auth/login";

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_to: Option<&'static str>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::TenantNotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::TenantUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ComponentUnavailable(_)
            | AppError::MethodUnavailable(_)
            | AppError::BelowMinimumOrder { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EmptyCart | AppError::Unauthenticated => StatusCode::SEE_OTHER,
            AppError::Session(_)
            | AppError::DbError(_)
            | AppError::OrmError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn redirect_to(&self) -> Option<&'static str> {
        match self {
            AppError::EmptyCart => Some(CART_PATH),
            AppError::Unauthenticated => Some(LOGIN_PATH),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Session(err) => tracing::error!(error = %err, "session failure"),
            AppError::DbError(err) => tracing::error!(error = %err, "database failure"),
            AppError::OrmError(err) => tracing::error!(error = %err, "orm failure"),
            AppError::Internal(err) => tracing::error!(error = %err, "internal failure"),
            _ => {}
        }

        let redirect_to = self.redirect_to();
        let message = self.to_string();
        let body = ApiResponse::failure(
            message.clone(),
            ErrorData {
                error: message,
                redirect_to,
            },
        );

        match redirect_to {
            Some(location) => {
                (status, [(header::LOCATION, location)], axum::Json(body)).into_response()
            }
            None => (status, axum::Json(body)).into_response(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
