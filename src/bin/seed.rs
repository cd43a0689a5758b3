use dancy_meals::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    middleware::auth::{ROLE_ADMIN, ROLE_CLIENT},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&orm_from_pool(&pool)).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin12345", ROLE_ADMIN).await?;
    let client_id = ensure_user(&pool, "client@example.com", "client12345", ROLE_CLIENT).await?;
    let tenant_id = ensure_tenant(&pool, "Mama Dancy's Kitchen", "mama-dancy").await?;
    seed_menu(&pool, tenant_id).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Client ID: {client_id}, Tenant: mama-dancy.{}",
        config.main_domain
    );
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_tenant(pool: &sqlx::PgPool, name: &str, slug: &str) -> anyhow::Result<Uuid> {
    let (tenant_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO tenants (id, name, slug, minimum_order_amount, offers_delivery, offers_pickup)
        VALUES ($1, $2, $3, 1500, TRUE, TRUE)
        ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await?;

    println!("Ensured tenant {slug}");
    Ok(tenant_id)
}

async fn seed_menu(pool: &sqlx::PgPool, tenant_id: Uuid) -> anyhow::Result<()> {
    let existing: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meals WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_one(pool)
        .await?;
    if existing.0 > 0 {
        println!("Menu already seeded");
        return Ok(());
    }

    let menu: [(&str, &str, &[(&str, i64, Option<i32>)]); 3] = [
        (
            "Jollof Rice",
            "Smoky party-style jollof",
            &[("Rice bowl", 1200, Some(40)), ("Fried plantain", 400, None)],
        ),
        (
            "Egusi Soup",
            "Melon seed soup with greens",
            &[("Soup bowl", 1500, Some(25)), ("Pounded yam", 600, Some(30))],
        ),
        (
            "Suya Platter",
            "Spiced grilled beef skewers",
            &[("Beef skewer", 350, Some(100)), ("Onion salad", 200, None)],
        ),
    ];

    for (meal_name, description, components) in menu {
        let meal_id = Uuid::new_v4();
        sqlx::query("INSERT INTO meals (id, tenant_id, name, description) VALUES ($1, $2, $3, $4)")
            .bind(meal_id)
            .bind(tenant_id)
            .bind(meal_name)
            .bind(description)
            .execute(pool)
            .await?;

        for (name, price, stock) in components {
            sqlx::query(
                "INSERT INTO components (id, meal_id, name, price, stock) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::new_v4())
            .bind(meal_id)
            .bind(*name)
            .bind(*price)
            .bind(*stock)
            .execute(pool)
            .await?;
        }
    }

    println!("Seeded menu");
    Ok(())
}
