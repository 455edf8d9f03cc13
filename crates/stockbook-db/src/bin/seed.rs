//! # Seed Data Generator
//!
//! Populates a database with demo products and a movement history for
//! development, then prints the resulting summary and alert list.
//!
//! ## Usage
//! ```bash
//! cargo run -p stockbook-db --bin seed
//!
//! # Specify database path
//! cargo run -p stockbook-db --bin seed -- --db ./data/stockbook.db
//! ```
//!
//! ## Generated Data
//! A small pharmacy-style catalog with varied packaging:
//! - Blister-packed tablets (10 pieces per sheet, several sheets per box)
//! - Loose items (1 piece per "sheet", boxed in dozens)
//!
//! Every balance starts at zero and is built up through ledger movements,
//! so the seeded database satisfies the reconstructability property.

use chrono::{Duration, Utc};
use std::env;

use stockbook_core::alerts::AlertThresholds;
use stockbook_core::{MovementRequest, MovementType, Product, Unit};
use stockbook_db::repository::product::generate_product_id;
use stockbook_db::{Database, DbConfig, MovementFilter};

/// Demo catalog: (sku, name, pieces_per_sheet, sheets_per_box,
/// reorder_level, min_stock_level, expiry offset in days from today).
const CATALOG: &[(&str, &str, i64, i64, i64, i64, Option<i64>)] = &[
    ("PARA-500", "Paracetamol 500mg", 10, 5, 150, 100, Some(240)),
    ("AMOX-250", "Amoxicillin 250mg", 10, 3, 90, 60, Some(180)),
    ("IBU-400", "Ibuprofen 400mg", 10, 10, 200, 120, Some(365)),
    ("CETI-10", "Cetirizine 10mg", 10, 2, 60, 40, Some(20)),
    ("ORS-SACHET", "ORS Sachet", 1, 25, 50, 30, Some(-10)),
    ("VITC-500", "Vitamin C 500mg", 15, 4, 80, 50, None),
    ("BAND-ROLL", "Bandage Roll", 1, 12, 40, 24, None),
    ("SYRP-COUGH", "Cough Syrup 120ml", 1, 6, 30, 18, None),
];

const ACTOR: &str = "seed";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./stockbook_dev.db");

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
                println!("Stockbook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./stockbook_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Stockbook Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Insert catalog rows (balance starts at zero; stock arrives as movements)
    println!();
    println!("Creating products...");

    let today = Utc::now().date_naive();
    let mut product_ids = Vec::new();

    for (sku, name, pieces_per_sheet, sheets_per_box, reorder, min_stock, expiry_offset) in CATALOG
    {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            sku: sku.to_string(),
            name: name.to_string(),
            pieces_per_sheet: *pieces_per_sheet,
            sheets_per_box: *sheets_per_box,
            stock_quantity: 0,
            reorder_level: *reorder,
            min_stock_level: *min_stock,
            expiry_date: expiry_offset.map(|days| today + Duration::days(days)),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;
        product_ids.push(product.id);
    }

    println!("✓ Created {} products", product_ids.len());

    // Build a movement history through the ledger
    println!();
    println!("Applying movements...");

    let mut requests = Vec::new();

    // Opening stock: a few boxes of everything
    for id in &product_ids {
        requests.push(
            MovementRequest::new(id, MovementType::StockIn, 4, Unit::Box, ACTOR)
                .with_reason("opening stock"),
        );
    }

    // A trading day's mix on the first few products
    requests.push(
        MovementRequest::new(&product_ids[0], MovementType::Sale, 2, Unit::Box, ACTOR)
            .with_reference("sale-1001"),
    );
    requests.push(
        MovementRequest::new(&product_ids[0], MovementType::Sale, 3, Unit::Sheet, ACTOR)
            .with_reference("sale-1002"),
    );
    requests.push(
        MovementRequest::new(&product_ids[1], MovementType::Sale, 1, Unit::Box, ACTOR)
            .with_reference("sale-1003"),
    );
    requests.push(
        MovementRequest::new(&product_ids[1], MovementType::Return, 2, Unit::Sheet, ACTOR)
            .with_reference("sale-1003"),
    );
    requests.push(
        MovementRequest::new(&product_ids[2], MovementType::Damage, 5, Unit::Piece, ACTOR)
            .with_reason("dropped carton"),
    );
    requests.push(
        MovementRequest::new(&product_ids[3], MovementType::Adjustment, -12, Unit::Piece, ACTOR)
            .with_reason("cycle count"),
    );
    requests.push(
        MovementRequest::new(&product_ids[4], MovementType::Expired, 1, Unit::Box, ACTOR)
            .with_reason("expired batch write-off"),
    );

    // Sell the cough syrup out completely (4 boxes of 6)
    requests.push(
        MovementRequest::new(&product_ids[7], MovementType::Sale, 24, Unit::Piece, ACTOR)
            .with_reference("sale-1004"),
    );

    let outcomes = db.ledger().bulk_apply(&requests).await;
    let applied = outcomes.iter().filter(|o| o.is_ok()).count();
    for outcome in &outcomes {
        if let Err(e) = outcome {
            eprintln!("  movement failed: {}", e);
        }
    }

    println!("✓ Applied {}/{} movements", applied, outcomes.len());

    // Summaries
    println!();
    println!("Movement summary:");
    let summary = db.movements().summarize(&MovementFilter::default()).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    // Alerts
    println!();
    println!("Current alerts:");
    let alerts = db
        .alerts()
        .evaluate_all(&AlertThresholds::default(), Utc::now())
        .await?;
    if alerts.is_empty() {
        println!("  (none)");
    }
    for alert in &alerts {
        println!("  [{:?}] {}", alert.severity, alert.message);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
