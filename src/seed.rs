//! Development sample data, loaded with the `--seed` argument.

use log::info;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::Database;
use crate::errors::RepositoryError;

struct SeedItem {
    id: &'static str,
    label: &'static str,
    description: &'static str,
    price: f64,
    image: &'static str,
    alt: &'static str,
    requested_quantity: Option<i32>,
    received_quantity: i32,
    purchase_link: &'static str,
    is_special_fund: bool,
}

const SAMPLE_GUESTS: &[(&str, &str, &str, &str)] = &[
    ("John", "Doe", "john@example.com", "(123) 456-7890"),
    ("Jane", "Smith", "jane@example.com", "(098) 765-4321"),
];

fn sample_items() -> Vec<SeedItem> {
    vec![
        SeedItem {
            id: "family-recipes",
            label: "Family Recipes",
            description: "Share your favorite family recipes with us! We'd love to cook \
                          your cherished dishes in our new home together.",
            price: 0.0,
            image: "https://picsum.photos/seed/recipes/800/600",
            alt: "Handwritten recipe cards",
            requested_quantity: None,
            received_quantity: 0,
            purchase_link: "",
            is_special_fund: false,
        },
        SeedItem {
            id: "honeymoon-fund",
            label: "Honeymoon Fund",
            description: "Help send us on the honeymoon of our dreams. Any contribution \
                          is deeply appreciated!",
            price: 0.0,
            image: "https://picsum.photos/seed/honeymoon/800/600",
            alt: "Beach at sunset",
            requested_quantity: None,
            received_quantity: 0,
            purchase_link: "",
            is_special_fund: true,
        },
        SeedItem {
            id: "kitchenaid-mixer",
            label: "KitchenAid Stand Mixer",
            description: "A classic kitchen essential for baking together. We would love \
                          the Artisan series in any neutral color!",
            price: 350.0,
            image: "https://picsum.photos/seed/mixer/800/600",
            alt: "KitchenAid Stand Mixer",
            requested_quantity: Some(1),
            received_quantity: 0,
            purchase_link: "https://www.williams-sonoma.com",
            is_special_fund: false,
        },
        SeedItem {
            id: "le-creuset",
            label: "Le Creuset Dutch Oven",
            description: "Perfect for cozy soups and stews. The 5.5 quart size in any \
                          color would be wonderful.",
            price: 400.0,
            image: "https://picsum.photos/seed/dutchoven/800/600",
            alt: "Le Creuset Dutch Oven",
            requested_quantity: Some(1),
            received_quantity: 0,
            purchase_link: "https://www.lecreuset.com",
            is_special_fund: false,
        },
        SeedItem {
            id: "towel-set",
            label: "Luxury Bath Towel Set",
            description: "Soft, plush towels for our new home. We prefer white or \
                          neutral tones.",
            price: 120.0,
            image: "https://picsum.photos/seed/towels/800/600",
            alt: "Luxury bath towels",
            requested_quantity: Some(2),
            received_quantity: 1,
            purchase_link: "https://www.parachutehome.com",
            is_special_fund: false,
        },
        SeedItem {
            id: "dyson-vacuum",
            label: "Dyson Vacuum",
            description: "A powerful cordless vacuum to keep our home spotless. The V15 \
                          would be amazing!",
            price: 650.0,
            image: "https://picsum.photos/seed/vacuum/800/600",
            alt: "Dyson cordless vacuum",
            requested_quantity: Some(1),
            received_quantity: 0,
            purchase_link: "https://www.dyson.com",
            is_special_fund: false,
        },
        SeedItem {
            id: "dinner-plates",
            label: "Dinner Plate Set",
            description: "Beautiful everyday dinnerware for hosting friends and family. \
                          Service for 8 preferred.",
            price: 200.0,
            image: "https://picsum.photos/seed/plates/800/600",
            alt: "Ceramic dinner plates",
            requested_quantity: Some(1),
            received_quantity: 0,
            purchase_link: "https://www.crateandbarrel.com",
            is_special_fund: false,
        },
    ]
}

/// Populates the database with sample guests and registry items. Safe to run
/// repeatedly; existing rows are left untouched.
pub async fn seed_sample_data(db: &Database) -> Result<(), RepositoryError> {
    info!("Seeding database with sample data...");
    let pool = db.get_pool();

    for (first_name, last_name, email, phone) in SAMPLE_GUESTS {
        insert_guest(pool, first_name, last_name, email, phone).await?;
        info!("Added guest: {} {}", first_name, last_name);
    }

    for item in sample_items() {
        sqlx::query(
            "INSERT INTO registry_items \
             (id, label, description, price, image, alt, requested_quantity, \
              received_quantity, purchase_link, is_special_fund) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(item.id)
        .bind(item.label)
        .bind(item.description)
        .bind(item.price)
        .bind(item.image)
        .bind(item.alt)
        .bind(item.requested_quantity)
        .bind(item.received_quantity)
        .bind(item.purchase_link)
        .bind(item.is_special_fund)
        .execute(pool)
        .await
        .map_err(RepositoryError::from)?;
        info!("Added registry item: {}", item.label);
    }

    info!("Seed data populated successfully");
    Ok(())
}

async fn insert_guest(
    pool: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "INSERT INTO guests (id, first_name, last_name, email, phone) \
         SELECT $1, $2, $3, $4, $5 \
         WHERE NOT EXISTS (\
             SELECT 1 FROM guests \
             WHERE LOWER(first_name) = LOWER($2) AND LOWER(last_name) = LOWER($3))",
    )
    .bind(Uuid::new_v4())
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(phone)
    .execute(pool)
    .await
    .map_err(RepositoryError::from)?;

    Ok(())
}
