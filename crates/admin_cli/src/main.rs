use std::error::Error;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use engine::{AccountKind, Engine, Money, NewTransactionCmd, TransactionStatus};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "rodmar_admin")]
#[command(about = "Admin utilities for RodMar (bootstrap accounts, repair balances)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./rodmar.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Account(Account),
    Transaction(Transaction),
    /// Recompute every cached balance from the ledger.
    Recalculate,
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    Create(AccountCreateArgs),
    List,
}

#[derive(Args, Debug)]
struct AccountCreateArgs {
    #[arg(long)]
    name: String,
    /// One of: mina, comprador, volquetero, rodmar, tercero.
    #[arg(long)]
    kind: String,
}

#[derive(Args, Debug)]
struct Transaction {
    #[command(subcommand)]
    command: TransactionCommand,
}

#[derive(Subcommand, Debug)]
enum TransactionCommand {
    Create(TransactionCreateArgs),
}

#[derive(Args, Debug)]
struct TransactionCreateArgs {
    #[arg(long)]
    origin: Uuid,
    #[arg(long)]
    destination: Uuid,
    /// Decimal COP amount, e.g. "2000000" or "2000000,50".
    #[arg(long)]
    amount: String,
    /// pending or completed.
    #[arg(long, default_value = "completed")]
    status: String,
    #[arg(long)]
    note: Option<String>,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Account(Account {
            command: AccountCommand::Create(args),
        }) => {
            let kind = match AccountKind::try_from(args.kind.as_str()) {
                Ok(kind) => kind,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };

            let account_id = engine.new_account(&args.name, kind).await?;
            println!("created account: {} ({account_id})", args.name);
        }
        Command::Account(Account {
            command: AccountCommand::List,
        }) => {
            for account in engine.list_accounts().await? {
                let archived = if account.archived { " [archived]" } else { "" };
                println!(
                    "{} {:<12} {:<30} {}{archived}",
                    account.id,
                    account.kind.as_str(),
                    account.name,
                    Money::new(account.balance_minor),
                );
            }
        }
        Command::Transaction(Transaction {
            command: TransactionCommand::Create(args),
        }) => {
            let amount = match args.amount.parse::<Money>() {
                Ok(amount) if amount.is_positive() => amount,
                Ok(_) => {
                    eprintln!("amount must be > 0");
                    std::process::exit(2);
                }
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            let status = match TransactionStatus::try_from(args.status.as_str()) {
                Ok(status) => status,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };

            let transaction_id = engine
                .new_transaction(NewTransactionCmd {
                    origin_account_id: args.origin,
                    destination_account_id: args.destination,
                    amount_minor: amount.minor(),
                    status,
                    occurred_at: Utc::now(),
                    voucher: None,
                    note: args.note,
                    created_by: None,
                })
                .await?;
            println!("created transaction: {transaction_id} ({amount}, {})", status.as_str());
        }
        Command::Recalculate => {
            let summary = engine.recalculate_all().await?;
            println!(
                "recalculated {} accounts from {} ledger entries",
                summary.accounts_updated, summary.entries_processed
            );
        }
    }

    Ok(())
}
