use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::Utc;
use kitchen_orders_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    models::{Establishment, Ingredient, Product},
    services::schedule::default_schedule,
    store::{DocumentStore, PgDocumentStore},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;
    let store = PgDocumentStore::new(create_orm_conn(&pool));

    let (establishment_id, created) =
        ensure_establishment(&store, "Cantina Demo", "demo@example.com", "demo123").await?;
    if created {
        seed_products(&store, establishment_id).await?;
    }

    println!("Seed completed. Establishment ID: {establishment_id}");
    Ok(())
}

async fn ensure_establishment(
    store: &PgDocumentStore,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<(Uuid, bool)> {
    if let Some(existing) = store.find_establishment_by_email(email).await? {
        println!("Establishment {email} already present");
        return Ok((existing.id, false));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let establishment = Establishment {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        password_hash,
        schedule: default_schedule(),
        created_at: Utc::now(),
    };
    store.insert_establishment(&establishment).await?;

    println!("Created establishment {email}");
    Ok((establishment.id, true))
}

async fn seed_products(store: &PgDocumentStore, establishment_id: Uuid) -> anyhow::Result<()> {
    let products = vec![
        ("X-Burger", 2500, vec![("bread", "🍞"), ("beef", "🥩"), ("cheese", "🧀")]),
        ("Fries", 1200, vec![("potato", "🥔")]),
        ("Lemonade", 800, vec![("lemon", "🍋"), ("ice", "🧊")]),
    ];

    for (name, price, ingredients) in products {
        let product = Product {
            id: Uuid::new_v4(),
            establishment_id,
            category_id: None,
            name: name.to_string(),
            description: None,
            price,
            active: true,
            ingredients: ingredients
                .into_iter()
                .map(|(name, icon)| Ingredient {
                    name: name.to_string(),
                    icon: icon.to_string(),
                })
                .collect(),
            created_at: Utc::now(),
        };
        store.insert_product(&product).await?;
        println!("Seeded product {} ({})", product.name, product.id);
    }

    Ok(())
}
