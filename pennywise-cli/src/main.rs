use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use pennywise_core::{MonthLength, SystemClock};
use pennywise_finance::{
    BatchOrder, BudgetSession, SessionOptions, load_recurring_merchants, save_recurring_merchants,
};
use pennywise_ingest::{
    ApiClient, ApiFetcher, Credentials, Snapshot, SnapshotCache, SnapshotFetcher, load_snapshot,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod report;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "pennywise",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PENNYWISE_BUILD_SHA"), ")"),
    about = "Daily spending budget from your bank account"
)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

/// Flags that take precedence over ~/.pennywise/config.toml
#[derive(clap::Args, Debug, Default)]
struct Overrides {
    /// Serve the account snapshot from the cache (filling it on first use)
    #[arg(long, global = true)]
    use_cache: bool,

    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Recurring merchants JSON file
    #[arg(long, global = true)]
    recurring: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    month_length: Option<MonthLengthArg>,

    #[arg(long, global = true, value_enum)]
    batch_order: Option<BatchOrderArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MonthLengthArg {
    Calendar,
    #[value(name = "fixed-29")]
    Fixed29,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BatchOrderArg {
    CalendarDesc,
    FirstSeenReversed,
}

impl From<MonthLengthArg> for MonthLength {
    fn from(arg: MonthLengthArg) -> Self {
        match arg {
            MonthLengthArg::Calendar => MonthLength::Calendar,
            MonthLengthArg::Fixed29 => MonthLength::Fixed29,
        }
    }
}

impl From<BatchOrderArg> for BatchOrder {
    fn from(arg: BatchOrderArg) -> Self {
        match arg {
            BatchOrderArg::CalendarDesc => BatchOrder::CalendarDescending,
            BatchOrderArg::FirstSeenReversed => BatchOrder::FirstSeenReversed,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show balance, projected recurring spend and today's daily budget
    Budget {
        #[arg(long)]
        json: bool,
    },

    /// Show transactions grouped by day, recurring merchants hidden
    Feed {
        #[arg(long)]
        json: bool,
    },

    /// Manage the recurring merchants list
    Recurring {
        #[command(subcommand)]
        command: RecurringCommand,
    },

    /// Manage the cached account snapshot
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// Manage ~/.pennywise/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommand {
    /// Delete the cached balance and transactions so the next run fetches
    Clear,
}

#[derive(Subcommand, Debug)]
enum RecurringCommand {
    List,
    Add { merchant_id: String },
    Remove { merchant_id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config (file plus flags)
    Show,
}

/// Reads credentials from the environment only when a fetch is needed, so
/// a populated cache works without them.
struct EnvApiFetcher {
    client: ApiClient,
}

impl SnapshotFetcher for EnvApiFetcher {
    async fn fetch(&self) -> Result<Snapshot> {
        let credentials = Credentials::from_env()?;
        ApiFetcher::new(self.client.clone(), credentials).fetch().await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = apply_overrides(config::load_config()?, &cli.overrides);

    match cli.command {
        Command::Budget { json } => {
            let session = open_session(&cfg).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report::budget_json(&session)?)?);
            } else {
                print!("{}", report::render_budget(&session)?);
            }
        }

        Command::Feed { json } => {
            let mut session = open_session(&cfg).await?;
            let batches = session.batched_transactions()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&batches)?);
            } else {
                print!("{}", report::render_feed(&batches));
            }
        }

        Command::Recurring { command } => {
            let path = cfg.recurring_path()?;
            let mut merchants = load_recurring_merchants(&path)?;
            match command {
                RecurringCommand::List => {
                    if merchants.is_empty() {
                        println!("No recurring merchants in {}", path.display());
                    }
                    for id in merchants.iter() {
                        println!("{id}");
                    }
                }
                RecurringCommand::Add { merchant_id } => {
                    if !merchants.insert(merchant_id.clone()) {
                        bail!("{merchant_id} is already recurring");
                    }
                    save_recurring_merchants(&path, &merchants)?;
                    println!("Added {merchant_id} to {}", path.display());
                }
                RecurringCommand::Remove { merchant_id } => {
                    if !merchants.remove(&merchant_id) {
                        bail!("{merchant_id} is not in {}", path.display());
                    }
                    save_recurring_merchants(&path, &merchants)?;
                    println!("Removed {merchant_id} from {}", path.display());
                }
            }
        }

        Command::Cache {
            command: CacheCommand::Clear,
        } => {
            let cache = SnapshotCache::new(cfg.cache_config()?.cache_dir);
            cache.clear()?;
            println!("Cleared {}", cache.dir().display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("PENNYWISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_overrides(mut cfg: Config, o: &Overrides) -> Config {
    if o.use_cache {
        cfg.cache.use_cache = true;
    }
    if let Some(dir) = &o.cache_dir {
        cfg.cache.cache_dir = Some(dir.clone());
    }
    if let Some(p) = &o.recurring {
        cfg.budget.recurring_merchants = Some(p.clone());
    }
    if let Some(m) = o.month_length {
        cfg.budget.month_length = m.into();
    }
    if let Some(b) = o.batch_order {
        cfg.budget.batch_order = b.into();
    }
    cfg
}

async fn open_session(cfg: &Config) -> Result<BudgetSession> {
    let clock = SystemClock::from_name(&cfg.budget.timezone)
        .with_context(|| format!("invalid timezone: {}", cfg.budget.timezone))?;
    let recurring = load_recurring_merchants(cfg.recurring_path()?)?;

    let fetcher = EnvApiFetcher {
        client: ApiClient::new(&cfg.api.token_url, &cfg.api.base_url),
    };
    let snapshot = load_snapshot(&cfg.cache_config()?, &fetcher).await?;

    Ok(BudgetSession::new(
        snapshot.summary,
        snapshot.transactions,
        recurring,
        Box::new(clock),
        SessionOptions {
            month_length: cfg.budget.month_length,
            batch_order: cfg.budget.batch_order,
        },
    ))
}
