use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;

use catsverse::{
    Argb, Category, CategoryIcon, CategoryKind, EntityName, PaymentMethod, PaymentMethodIcon,
    Repository, SQLiteCategoryRepository, SQLitePaymentMethodRepository,
    SQLitePreferencesRepository, ThemePreference, initialize_db, setup_logging,
};

/// A utility for creating a test database for CatsVerse.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// Store a dark theme preference instead of following the system.
    #[arg(long)]
    dark: bool,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    setup_logging()?;

    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let connection = Arc::new(Mutex::new(conn));

    println!("Creating categories...");
    let categories = SQLiteCategoryRepository::new(connection.clone());

    for (name, kind, icon, color) in [
        (
            "Salário",
            CategoryKind::Income,
            CategoryIcon::Cash,
            Argb(0xFF4C_AF50),
        ),
        (
            "Supermercado",
            CategoryKind::Expense,
            CategoryIcon::Receipt,
            Argb(0xFFF4_4336),
        ),
        (
            "Transporte",
            CategoryKind::Expense,
            CategoryIcon::Transfer,
            Argb::TRANSPARENT,
        ),
    ] {
        categories.save(&Category {
            id: None,
            name: EntityName::new(name)?,
            kind,
            icon: Some(icon.name().to_owned()),
            color: Some(color),
        })?;
    }

    println!("Creating payment methods...");
    let payment_methods = SQLitePaymentMethodRepository::new(connection.clone());

    for (name, icon) in [
        ("Dinheiro", PaymentMethodIcon::Cash),
        ("Cartão de crédito", PaymentMethodIcon::CreditCard),
        ("Pix", PaymentMethodIcon::Pix),
        ("Boleto", PaymentMethodIcon::BankSlip),
    ] {
        payment_methods.save(&PaymentMethod {
            id: None,
            name: EntityName::new(name)?,
            icon: Some(icon.name().to_owned()),
        })?;
    }

    if args.dark {
        println!("Setting dark theme...");
        SQLitePreferencesRepository::new(connection).set_theme(ThemePreference::Dark)?;
    }

    println!("Success!");

    Ok(())
}
