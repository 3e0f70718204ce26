use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use kharcha_store::{CsvStore, ExpenseStore, MemoryStore, SheetsStore};

mod config;
mod event;
mod handlers;

use event::{Event, Reply, SlashCommand};
use handlers::Handlers;

#[derive(Parser, Debug)]
#[command(name = "kharcha", version, about = "Expense-logging bot core")]
struct Cli {
    /// Store backend override: memory, csv or sheets
    #[arg(long)]
    store: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log an expense (structured mode: amount item category)
    Log {
        amount: f64,
        item: String,
        category: String,
    },

    /// Deliver one free-text message: "<amount> <description>"
    Msg { text: String },

    /// Expense summary for a window
    Summary {
        /// today, week or month
        #[arg(long, default_value = "today")]
        period: String,
    },

    /// Write the default config to ~/.kharcha/config.toml
    InitConfig,

    /// Repair the store's header row
    EnsureHeader,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Command::InitConfig = cli.command {
        return config::init_config();
    }

    let cfg = config::load_config()?;
    let store = build_store(&cfg, cli.store.as_deref())?;
    store.ensure_header()?;

    if let Command::EnsureHeader = cli.command {
        println!("Header row OK");
        return Ok(());
    }

    let tz = cfg.timezone()?;
    let handlers = Handlers::new(store, tz, cfg.currency.clone());

    let event = match cli.command {
        Command::Log {
            amount,
            item,
            category,
        } => Event::Slash(SlashCommand::Log {
            amount,
            item,
            category,
        }),
        Command::Msg { text } => Event::Direct { text },
        Command::Summary { period } => Event::Slash(match period.as_str() {
            "today" => SlashCommand::SummaryToday,
            "week" => SlashCommand::SummaryWeek,
            "month" => SlashCommand::SummaryMonth,
            other => SlashCommand::Unknown(format!("summary_{other}")),
        }),
        Command::InitConfig | Command::EnsureHeader => return Ok(()),
    };

    print_reply(&handlers.dispatch(event));
    Ok(())
}

fn build_store(
    cfg: &config::Config,
    override_backend: Option<&str>,
) -> Result<Box<dyn ExpenseStore>> {
    let backend = override_backend.unwrap_or(&cfg.store.backend);
    match backend {
        "memory" => Ok(Box::new(MemoryStore::new())),
        "csv" => Ok(Box::new(CsvStore::new(cfg.csv_path()?))),
        "sheets" => {
            let sheet_id = cfg.sheet_id()?;
            let token = config::sheets_token()?;
            Ok(Box::new(
                SheetsStore::new(sheet_id, token).with_range(cfg.store.range.clone()),
            ))
        }
        other => bail!("unknown store backend: {other} (expected memory, csv or sheets)"),
    }
}

fn print_reply(reply: &Reply) {
    match reply {
        Reply::Text { body, ephemeral } => {
            if *ephemeral {
                println!("(visible only to you)");
            }
            println!("{body}");
        }
        Reply::Card {
            title,
            body,
            footer,
        } => println!("{title}\n\n{body}\n\n{footer}"),
    }
}
