use std::env;

use crate::storefront::cart::MAX_QUANTITY_PER_COMPONENT;

const DEFAULT_RESERVED_SUBDOMAINS: &[&str] = &["www", "api", "admin", "app"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub main_domain: String,
    pub reserved_subdomains: Vec<String>,
    pub jwt_secret: String,
    pub max_quantity_per_component: i32,
    pub secure_cookie: bool,
    pub order_stale_after_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let main_domain = env::var("APP_MAIN_DOMAIN")
            .map(|d| d.trim().to_ascii_lowercase())
            .unwrap_or_else(|_| "dancymeals.test".to_string());
        let reserved_subdomains = env::var("APP_RESERVED_SUBDOMAINS")
            .map(|raw| parse_list(&raw))
            .unwrap_or_else(|_| {
                DEFAULT_RESERVED_SUBDOMAINS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });
        let max_quantity_per_component = env::var("CART_MAX_QUANTITY_PER_COMPONENT")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(MAX_QUANTITY_PER_COMPONENT);
        let secure_cookie = env::var("SESSION_SECURE_COOKIE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let order_stale_after_minutes = env::var("ORDER_STALE_AFTER_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(60);

        Ok(Self {
            port,
            database_url,
            host,
            main_domain,
            reserved_subdomains,
            jwt_secret,
            max_quantity_per_component,
            secure_cookie,
            order_stale_after_minutes,
        })
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
