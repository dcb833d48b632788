//! # Seed Data Generator
//!
//! Populates the database with a small catalog and an admin user for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./storefront.db
//! cargo run -p storefront-db --bin seed
//!
//! # Specify database path and admin email
//! cargo run -p storefront-db --bin seed -- --db ./data/storefront.db --admin admin@shop.test
//! ```
//!
//! ## Generated Data
//! - One category per entry of `CATALOG`
//! - Every product in every size, priced base + size addon
//! - One admin user with a fresh UUID v4 id (printed, use it as `x-user-id`)

use std::env;

use storefront_core::{NewProduct, Role};
use storefront_db::{Database, DbConfig};
use uuid::Uuid;

/// Categories and their products with base prices in cents.
const CATALOG: &[(&str, &[(&str, i64)])] = &[
    (
        "Tea",
        &[
            ("Sencha", 899),
            ("Genmaicha", 749),
            ("Earl Grey", 650),
            ("Assam", 599),
            ("Rooibos", 699),
            ("Chamomile", 549),
        ],
    ),
    (
        "Coffee",
        &[
            ("House Blend", 1099),
            ("Colombia Supremo", 1399),
            ("Ethiopia Yirgacheffe", 1599),
            ("Decaf Espresso", 1199),
        ],
    ),
    (
        "Teaware",
        &[
            ("Glass Teapot", 2999),
            ("Cast Iron Kettle", 5499),
            ("Tea Infuser", 899),
            ("Ceramic Mug", 1499),
        ],
    ),
];

/// Size variants: (label, price addon in cents, stock)
const SIZES: &[(&str, i64, i64)] = &[("Small", 0, 40), ("Large", 400, 15)];

const PLACEHOLDER_BASE: &str = "https://images.example.com/products";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./storefront.db");
    let mut admin_email = String::from("admin@storefront.test");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--admin" | "-a" => {
                if i + 1 < args.len() {
                    admin_email = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>       Database file path (default: ./storefront.db)");
                println!("  -a, --admin <EMAIL>   Admin user email (default: admin@storefront.test)");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Storefront Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut generated = 0;
    for (category_name, products) in CATALOG {
        let category = db.categories().insert(category_name).await?;

        for (name, base_price) in products.iter() {
            for (size, addon, stock) in SIZES {
                let full_name = format!("{} ({})", name, size);
                let file_name = full_name
                    .to_lowercase()
                    .replace(|c: char| !c.is_ascii_alphanumeric(), "-");

                let product = NewProduct {
                    name: full_name,
                    description: format!("{} from our {} range.", name, category_name),
                    price_cents: base_price + addon,
                    stock: *stock,
                    category_id: category.id,
                    image_url: format!("{}/{}.png", PLACEHOLDER_BASE, file_name),
                };

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }
                generated += 1;
            }
        }
    }
    println!("✓ Generated {} products", generated);

    let admin_id = Uuid::new_v4().to_string();
    db.users().upsert(&admin_id, &admin_email, "Admin").await?;
    db.users().set_role(&admin_id, Role::Admin).await?;

    println!("✓ Admin user {} ({})", admin_email, admin_id);
    println!("  Send `x-user-id: {}` to use admin endpoints.", admin_id);
    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
