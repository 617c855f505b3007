use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, Month, OffsetDateTime};

use conta_facil::{
    Category, FixedExpense, PasswordHash, Transaction, TransactionType, ValidatedPassword,
    WishlistItem, create_fixed_expense, create_transaction, create_user, create_wishlist_item,
    initialize_db,
};

/// A utility for creating a test database for the Conta Fácil server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
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

    println!("Creating test user test@example.com with the password 'test'...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("test@example.com", "Teste", password_hash, &conn)?;

    println!("Creating transactions...");

    let today = OffsetDateTime::now_utc().date();
    let transactions = [
        (TransactionType::Income, 3000.0, 0, "Salário", Category::Salario),
        (TransactionType::Expense, 1200.0, 1, "Aluguel", Category::Casa),
        (TransactionType::Expense, 350.75, 3, "Mercado do mês", Category::Supermercado),
        (TransactionType::Expense, 42.5, 5, "Almoço", Category::Alimentacao),
        (TransactionType::Expense, 39.9, 8, "Streaming", Category::Assinatura),
        (TransactionType::Expense, 120.0, 12, "Combustível", Category::Transporte),
        (TransactionType::Income, 250.0, 20, "Pix recebido", Category::Pix),
        (TransactionType::Expense, 80.0, 35, "Veterinário", Category::Cachorro),
        (TransactionType::Expense, 60.0, 40, "Cinema", Category::Lazer),
        (TransactionType::Income, 3000.0, 31, "Salário", Category::Salario),
    ];

    for (transaction_type, amount, days_ago, description, category) in transactions {
        let date = today - Duration::days(days_ago);
        create_transaction(
            user.id,
            Transaction::build(transaction_type, amount, date, description).category(category),
            &conn,
        )?;
    }

    println!("Creating fixed expenses...");

    for (description, amount, month) in [
        ("Aluguel", 1200.0, today.month()),
        ("Internet", 99.9, today.month()),
        ("Academia", 89.0, today.month()),
        ("IPVA", 450.0, Month::January),
    ] {
        create_fixed_expense(user.id, FixedExpense::build(description, amount, month), &conn)?;
    }

    println!("Creating wishlist items...");

    for (description, amount, category) in [
        ("Fone de ouvido", 250.0, Category::Compras),
        ("Curso de inglês", 600.0, Category::Educacao),
        ("Viagem para a praia", 2500.0, Category::Viagem),
    ] {
        create_wishlist_item(
            user.id,
            WishlistItem::build(description, amount).category(category),
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
