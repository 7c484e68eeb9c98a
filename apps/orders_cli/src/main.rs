use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orders::{
    render::{render_orders_text, render_page},
    DeleteOutcome, OrderStore,
};
use shared::{catalog::list_services, domain::NewOrder, error::OrderError};
use storage::open_store;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, prepare_storage_url};

#[derive(Parser, Debug)]
#[command(name = "orderdesk", about = "Take and track service orders")]
struct Cli {
    /// Overrides the configured storage url (`memory:`, `file://DIR`, `sqlite://FILE`).
    #[arg(long)]
    storage_url: Option<String>,
    /// Overrides the key the order collection is stored under.
    #[arg(long)]
    key: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the service catalog.
    Services,
    /// Create an order.
    Create {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Service id from `services`.
        #[arg(long, default_value = "")]
        service: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List orders, newest first.
    List,
    /// Advance an order to its next status.
    Toggle { id: String },
    /// Delete an order after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Write the catalog and orders as an HTML page.
    Render {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(url) = cli.storage_url.clone() {
        settings.storage_url = url;
    }
    if let Some(key) = cli.key.clone() {
        settings.storage_key = key;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(cli.command, &settings.storage_url, &settings.storage_key).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<OrderError>() {
                Some(OrderError::Validation(message)) => eprintln!("{message}"),
                _ => {
                    error!(error = %format!("{err:#}"), "command failed");
                    eprintln!("error: {err:#}");
                }
            }
            ExitCode::from(exit_code_for(&err))
        }
    }
}

async fn run(command: Command, storage_url: &str, storage_key: &str) -> Result<()> {
    match command {
        Command::Services => {
            for service in list_services() {
                println!("{}  {} — {}", service.id, service.title, service.price);
                println!("    {}", service.description);
            }
        }
        Command::Create {
            name,
            email,
            phone,
            service,
            notes,
        } => {
            let store = open_order_store(storage_url, storage_key).await?;
            let order = store
                .create(NewOrder {
                    name,
                    email,
                    phone,
                    service_id: service,
                    notes,
                })
                .await?;
            println!("Заказ создан: {} ({})", order.id, order.service_title);
        }
        Command::List => {
            let store = open_order_store(storage_url, storage_key).await?;
            print!("{}", render_orders_text(&store.load().await?));
        }
        Command::Toggle { id } => {
            let store = open_order_store(storage_url, storage_key).await?;
            match store.toggle_status(&id).await? {
                Some(order) => println!("{}: {}", order.id, order.status.name()),
                None => println!("Заказ {id} не найден."),
            }
        }
        Command::Delete { id, yes } => {
            let store = open_order_store(storage_url, storage_key).await?;
            let confirm = |prompt: &str| yes || prompt_stdin(prompt);
            match store.delete(&id, &confirm).await? {
                DeleteOutcome::Deleted => println!("Заказ {id} удалён."),
                DeleteOutcome::NotFound => println!("Заказ {id} не найден."),
                DeleteOutcome::Cancelled => println!("Удаление отменено."),
            }
        }
        Command::Render { out } => {
            let store = open_order_store(storage_url, storage_key).await?;
            let page = render_page(&store.load().await?);
            match out {
                Some(path) => {
                    std::fs::write(&path, page)
                        .with_context(|| format!("failed to write '{}'", path.display()))?;
                    info!(path = %path.display(), "page written");
                }
                None => print!("{page}"),
            }
        }
    }

    Ok(())
}

async fn open_order_store(storage_url: &str, storage_key: &str) -> Result<OrderStore> {
    let storage_url = prepare_storage_url(storage_url)?;
    let blobs = open_store(&storage_url)
        .await
        .with_context(|| format!("failed to open storage '{storage_url}'"))?;
    info!(%storage_url, key = storage_key, "storage ready");
    Ok(OrderStore::new(blobs, storage_key))
}

fn prompt_stdin(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    is_affirmative(&answer)
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "д" | "да"
    )
}

/// Validation failures exit with 2; everything else is a storage or I/O
/// fault and exits with 1.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<OrderError>()
        .map_or(1, |e| e.code().exit_code())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
