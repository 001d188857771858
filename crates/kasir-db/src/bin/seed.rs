//! # Seed Data Loader
//!
//! Loads the demo catalog into a database file for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./kasir.db (default)
//! cargo run -p kasir-db --bin seed
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! ## Demo Catalog
//! - Minuman: Kopi Gadjah, Teh Tong Tji
//! - Makanan: Indomie, Super Bihun
//! - Obat: Panadol
//!
//! Running it twice is harmless: a database that already has a catalog is
//! left untouched.

use std::env;

use anyhow::Context;
use kasir_core::{CategoryInput, ProductInput};
use kasir_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// `(name, description)`
const CATEGORIES: &[(&str, &str)] = &[
    ("Minuman", "Pelepas dahaga"),
    ("Makanan", "Anti kelaparan"),
    ("Obat", "Obat mujarab"),
];

/// `(name, price, stock, category index into CATEGORIES)`
const PRODUCTS: &[(&str, i64, i64, usize)] = &[
    ("Kopi Gadjah", 2000, 10, 0),
    ("Teh Tong Tji", 1500, 5, 0),
    ("Indomie", 2500, 20, 1),
    ("Super Bihun", 1400, 15, 1),
    ("Panadol", 4700, 2, 2),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./kasir.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kasir POS Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;
    info!(path = %db_path, "Connected, migrations applied");

    let existing = db.products().list().await?.len() + db.categories().list().await?.len();
    if existing > 0 {
        warn!(existing, "Catalog already present, skipping seed");
        return Ok(());
    }

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description) in CATEGORIES {
        let category = db
            .categories()
            .insert(&CategoryInput {
                name: name.to_string(),
                description: description.to_string(),
            })
            .await
            .with_context(|| format!("inserting category {name}"))?;
        category_ids.push(category.id);
    }

    for &(name, price, stock, category) in PRODUCTS {
        let product = db
            .products()
            .insert(&ProductInput {
                name: name.to_string(),
                price,
                stock,
                category_id: category_ids.get(category).copied(),
            })
            .await
            .with_context(|| format!("inserting product {name}"))?;
        info!(id = product.product.id, name, price, stock, "Seeded product");
    }

    info!(
        categories = category_ids.len(),
        products = PRODUCTS.len(),
        "Seed complete"
    );
    db.close().await;

    Ok(())
}
