//! # Seed Data Generator
//!
//! Populates the database with a demo account and receipts for development.
//!
//! ## Usage
//! ```bash
//! # 200 receipts for user "demo" (password "demo1234")
//! cargo run -p tally-api --bin seed
//!
//! # Custom amount, database and account
//! cargo run -p tally-api --bin seed -- --count 1000 --db ./data/tally.db --user alice --password s3cret
//! ```
//!
//! ## Generated Receipts
//! - 1 to 6 lines each, drawn from a small grocery catalog
//! - Weighed goods get fractional quantities (e.g. 0.75 kg)
//! - Roughly two thirds cash (tendered rounded up to the next 50.00 or
//!   100.00), the rest card
//! - Timestamps spread over the last 30 days

use std::env;

use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use tally_api::auth::hash_password;
use tally_core::aggregator::{assemble_receipt, LineItemSpec, PaymentSpec};
use tally_core::validation::{validate_password, validate_username};
use tally_db::{Database, DbConfig};

/// (name, price in cents, sold by weight)
const CATALOG: &[(&str, i64, bool)] = &[
    ("Хліб житній", 3250, false),
    ("Батон нарізний", 2890, false),
    ("Молоко 2.5% 900г", 4150, false),
    ("Кефір 1%", 3890, false),
    ("Сир твердий", 42900, true),
    ("Яблука Голден", 4490, true),
    ("Банани", 6990, true),
    ("Картопля", 1890, true),
    ("Вода мінеральна 1.5л", 2450, false),
    ("Кава мелена 250г", 18900, false),
    ("Чай чорний", 8750, false),
    ("Шоколад молочний", 5490, false),
    ("Яйця С1 10шт", 6290, false),
    ("Олія соняшникова", 7190, false),
    ("Гречка 1кг", 5990, false),
];

struct Args {
    count: usize,
    db_path: String,
    username: String,
    password: String,
}

fn parse_args() -> anyhow::Result<Option<Args>> {
    let mut args = Args {
        count: 200,
        db_path: String::from("./tally.db"),
        username: String::from("demo"),
        password: String::from("demo1234"),
    };

    let mut iter = env::args().skip(1);
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--count" | "-c" => {
                let value = iter.next().context("--count needs a value")?;
                args.count = value.parse().with_context(|| format!("invalid count '{}'", value))?;
            }
            "--db" | "-d" => args.db_path = iter.next().context("--db needs a value")?,
            "--user" | "-u" => args.username = iter.next().context("--user needs a value")?,
            "--password" | "-p" => args.password = iter.next().context("--password needs a value")?,
            "--help" | "-h" => {
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>        Number of receipts to generate (default: 200)");
                println!("  -d, --db <PATH>        Database file path (default: ./tally.db)");
                println!("  -u, --user <NAME>      Account to seed (default: demo)");
                println!("  -p, --password <PASS>  Password when the account is created (default: demo1234)");
                println!("  -h, --help             Show this help message");
                return Ok(None);
            }
            other => bail!("unknown argument '{}'", other),
        }
    }

    Ok(Some(args))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    validate_username(&args.username)?;
    validate_password(&args.password)?;

    println!("Tally Seed Data Generator");
    println!("=========================");
    println!("Database: {}", args.db_path);
    println!("Account:  {}", args.username);
    println!("Receipts: {}", args.count);
    println!();

    let db = Database::new(DbConfig::new(&args.db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let user = match db.users().get_by_username(&args.username).await? {
        Some(user) => {
            println!("✓ Reusing existing account '{}'", user.username);
            user
        }
        None => {
            let hash = hash_password(&args.password)?;
            let user = db.users().create(&args.username, &hash).await?;
            println!("✓ Created account '{}'", user.username);
            user
        }
    };

    let existing = db.receipts().count_by_owner(&user.id).await?;
    if existing > 0 {
        println!("  Account already has {} receipts; adding more.", existing);
    }

    let start = std::time::Instant::now();
    let now = Utc::now();

    for n in 0..args.count {
        let items = generate_items(n);
        let payment = generate_payment(n, &items);
        let created_at = now - Duration::minutes(((n * 7919) % (30 * 24 * 60)) as i64);

        let receipt = assemble_receipt(Uuid::new_v4().to_string(), &user.id, &items, &payment, created_at)?;
        db.receipts().insert(&receipt).await?;

        if (n + 1) % 100 == 0 {
            println!("  Generated {} receipts...", n + 1);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} receipts in {:?}", args.count, elapsed);
    println!();
    println!("Log in with: username={} password={}", args.username, args.password);

    db.close().await;
    Ok(())
}

/// Deterministic line items for receipt number `n`.
fn generate_items(n: usize) -> Vec<LineItemSpec> {
    let lines = 1 + (n * 31) % 6;

    (0..lines)
        .map(|i| {
            let (name, price_cents, by_weight) = CATALOG[(n * 13 + i * 7) % CATALOG.len()];
            let quantity = if by_weight {
                // 0.25 .. 2.00 kg in 0.25 steps
                Decimal::new(25 * (1 + ((n + i) % 8) as i64), 2)
            } else {
                Decimal::from(1 + ((n + i) % 3) as i64)
            };
            LineItemSpec::new(name, Decimal::new(price_cents, 2), quantity)
        })
        .collect()
}

/// Two of every three receipts are paid in cash, rounded up to a banknote.
fn generate_payment(n: usize, items: &[LineItemSpec]) -> PaymentSpec {
    if n % 3 == 2 {
        return PaymentSpec::card();
    }

    let total: Decimal = items.iter().map(|i| i.unit_price * i.quantity).sum();
    let note = if total > Decimal::from(100) {
        Decimal::from(100)
    } else {
        Decimal::from(50)
    };
    let tendered = (total / note).ceil() * note;

    PaymentSpec::cash(tendered.max(note))
}
