//! sodme-cli operator entry point.
//!
//! Exit codes are a contract, not an implementation detail: 0 ok, 2 config
//! error, 3 broker unavailable, 4 DB unavailable. `main` runs everything
//! through `run`, which returns a `CliError` carrying the right code —
//! every fallible branch below picks a variant instead of bubbling a bare
//! `anyhow::Error`.

mod commands;

use clap::{Parser, Subcommand};

use commands::{broker, paper, CliError};

#[derive(Parser)]
#[command(name = "sodme")]
#[command(about = "Smart Order & Dynamic Margin Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> broker -> risk...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Broker connectivity commands
    Broker {
        #[command(subcommand)]
        cmd: BrokerCmd,
    },

    /// Paper-trading inspection commands
    Paper {
        #[command(subcommand)]
        cmd: PaperCmd,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    Status,
    Migrate,
}

#[derive(Subcommand)]
enum BrokerCmd {
    /// Resolve credentials from a layered config and confirm the broker
    /// session is reachable by fetching a known instrument's last trade.
    Check {
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,
        #[arg(long, default_value_t = 256265)]
        instrument_token: i64,
    },
}

#[derive(Subcommand)]
enum PaperCmd {
    /// Print a fresh paper broker's starting funds snapshot — a sanity
    /// check that the paper-trading path the daemon boots with is the one
    /// the operator expects, with no network or DB access.
    Seed {
        #[arg(long, default_value_t = 1_00_00_000)]
        available_margin_rupees: i64,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::from_filename(".env.local");
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Db { cmd } => {
            let pool = sodme_db::connect_from_env().await.map_err(CliError::DbUnavailable)?;
            match cmd {
                DbCmd::Status => {
                    let s = sodme_db::status(&pool).await.map_err(CliError::DbUnavailable)?;
                    println!("db_ok={} has_strategies_table={}", s.ok, s.has_strategies_table);
                }
                DbCmd::Migrate => {
                    sodme_db::migrate(&pool).await.map_err(CliError::DbUnavailable)?;
                    println!("migrations_applied=true");
                }
            }
        }

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let (typed, loaded) = sodme_config::load_typed_config(&path_refs).map_err(CliError::Config)?;
            println!("config_hash={}", loaded.config_hash);
            println!("margin_buffer_pct={}", typed.strategy_defaults.margin_buffer_pct);
            println!("orders_per_sec={}", typed.rate_limits.orders_per_sec);
            println!("{}", loaded.canonical_json);
        }

        Commands::Broker { cmd } => match cmd {
            BrokerCmd::Check { config_paths, instrument_token } => {
                broker::check(&config_paths, instrument_token).await?
            }
        },

        Commands::Paper { cmd } => match cmd {
            PaperCmd::Seed { available_margin_rupees } => paper::seed(available_margin_rupees)?,
        },
    }

    Ok(())
}
