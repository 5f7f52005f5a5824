//! Papertrade CLI
//!
//! Runs the simulated stock-trading web server and a handful of small
//! standalone utilities (credit validation, DNA matching, and friends).

use std::io::Read;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use papertrade::server::{self, ServerConfig};
use papertrade::tools::{credit, dna, mario, readability, roster};

/// Papertrade CLI.
#[derive(Parser)]
#[command(name = "papertrade")]
#[command(about = "Simulated stock trading, by way of the web", long_about = None)]
struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "sqlite:./papertrade.db?mode=rwc")]
    database: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the trading web server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Quote provider API key
        #[arg(long, env = "API_KEY")]
        api_key: String,

        /// Override the quote provider base URL
        #[arg(long)]
        quote_api_base: Option<String>,

        /// Secret used to sign session cookies (>= 32 bytes)
        #[arg(long, env = "SESSION_SECRET")]
        session_secret: Option<String>,

        /// Cash granted to newly registered accounts
        #[arg(long, default_value = "10000")]
        starting_cash: Decimal,
    },

    /// Validate a credit card number and report its network
    Credit {
        /// Card number (digits only)
        number: u64,
    },

    /// Match a DNA sequence against a database of STR profiles
    Dna {
        /// CSV of names and STR counts
        csv: PathBuf,

        /// File holding the DNA sequence
        sequence: PathBuf,
    },

    /// Print a double half-pyramid of the given height
    Mario {
        /// Height, between 1 and 8
        height: u32,
    },

    /// Compute the Coleman-Liau reading grade of a text
    Readability {
        /// File to grade; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Manage the student roster database
    Roster {
        /// Roster database file path
        #[arg(short, long, default_value = "sqlite:./students.db?mode=rwc")]
        database: String,

        #[command(subcommand)]
        command: RosterCommands,
    },
}

#[derive(Subcommand)]
enum RosterCommands {
    /// Import students from a CSV of names, houses, and birth years
    Import {
        /// CSV file to import
        csv: PathBuf,
    },

    /// List the students of one house, sorted by name
    House {
        /// House name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            api_key,
            quote_api_base,
            session_secret,
            starting_cash,
        } => {
            let config = ServerConfig {
                bind: SocketAddr::new(host, port),
                database_url: cli.database.clone(),
                api_key,
                quote_api_base,
                session_secret,
                starting_cash,
            };

            server::serve(config).await?;
        }

        Commands::Credit { number } => {
            println!("{}", credit::classify(number));
        }

        Commands::Dna { csv, sequence } => match dna::identify(&csv, &sequence)? {
            Some(name) => println!("{}", name),
            None => println!("No match"),
        },

        Commands::Mario { height } => {
            print!("{}", mario::pyramid(height)?);
        }

        Commands::Readability { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read stdin")?;
                    buf
                }
            };

            println!("{}", readability::grade(&text));
        }

        Commands::Roster { database, command } => {
            let db = roster::RosterDb::new(&database).await?;

            match command {
                RosterCommands::Import { csv } => {
                    let imported = db.import_file(&csv).await?;
                    info!(imported = imported, "Roster import complete");
                    println!("Imported {} students", imported);
                }

                RosterCommands::House { name } => {
                    for student in db.house(&name).await? {
                        println!("{}", student);
                    }
                }
            }
        }
    }

    Ok(())
}
