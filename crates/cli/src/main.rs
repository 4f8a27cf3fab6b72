mod config;
mod journal;
mod play;
mod serve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use pingpong_engine::log::format_timestamp;
use tracing_subscriber::EnvFilter;

use crate::config::{PlayerConfig, DEFAULT_PLAYER_PORT, DEFAULT_TABLE_PORT};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Ping-pong match simulator: player and table services.
#[derive(Parser)]
#[command(
    name = "pingpong",
    version,
    about = "Ping-pong match simulator: player and table services"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Only log warnings and errors (overridden by RUST_LOG)
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the player and table services in one process
    Serve {
        /// Port for the player service
        #[arg(long, default_value_t = DEFAULT_PLAYER_PORT)]
        player_port: u16,
        /// Port for the table service
        #[arg(long, default_value_t = DEFAULT_TABLE_PORT)]
        table_port: u16,
        #[command(flatten)]
        player: PlayerArgs,
    },

    /// Start only the player service
    Player {
        /// Port to listen on
        #[arg(long, default_value_t = DEFAULT_PLAYER_PORT)]
        port: u16,
        /// Base URL of the table service (default: PINGPONG_TABLE_URL or http://127.0.0.1:8889)
        #[arg(long)]
        table_url: Option<String>,
        #[command(flatten)]
        player: PlayerArgs,
    },

    /// Start only the table service
    Table {
        /// Port to listen on
        #[arg(long, default_value_t = DEFAULT_TABLE_PORT)]
        port: u16,
    },

    /// Play one match locally and print its log
    Play {
        /// Match number shown in the header line
        #[arg(long, default_value_t = 1)]
        match_id: u64,
        /// Seed for reproducible matches
        #[arg(long)]
        seed: Option<u64>,
        /// Resolve powers against a running table service instead of in process
        #[arg(long)]
        table_url: Option<String>,
        /// Think time in milliseconds before and after each table call
        #[arg(long, default_value_t = 0)]
        think_ms: u64,
    },
}

/// Settings shared by every command that runs the player service.
#[derive(clap::Args)]
struct PlayerArgs {
    /// JSON-lines file for finished matches (default: in memory)
    #[arg(long)]
    store: Option<PathBuf>,
    /// Directory for hourly CSV match journals
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
    /// Do not write CSV journals
    #[arg(long)]
    no_journal: bool,
    /// Think time in milliseconds before and after each table call
    /// (default: PINGPONG_THINK_MS or 1000)
    #[arg(long)]
    think_ms: Option<u64>,
}

impl PlayerArgs {
    fn into_config(self, port: u16, table_url: String) -> PlayerConfig {
        PlayerConfig {
            port,
            table_url,
            store: self.store,
            log_dir: config::log_dir(self.log_dir, self.no_journal),
            think_time: config::think_time(self.think_ms),
            responder_timeout: config::responder_timeout(),
        }
    }
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match cli.command {
        Commands::Serve {
            player_port,
            table_port,
            player,
        } => {
            let table_url = config::local_table_url(table_port);
            let config = player.into_config(player_port, table_url);
            if let Err(e) = runtime().block_on(serve::start_both(config, table_port)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
        Commands::Player {
            port,
            table_url,
            player,
        } => {
            let table_url = config::table_url(table_url, DEFAULT_TABLE_PORT);
            let config = player.into_config(port, table_url);
            if let Err(e) = runtime().block_on(serve::start_player_service(config)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
        Commands::Table { port } => {
            if let Err(e) = runtime().block_on(serve::start_table_service(port)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
        Commands::Play {
            match_id,
            seed,
            table_url,
            think_ms,
        } => {
            let options = play::PlayOptions {
                match_id,
                seed,
                table_url,
                think_time: std::time::Duration::from_millis(think_ms),
                responder_timeout: config::responder_timeout(),
            };
            match runtime().block_on(play::run_play(options)) {
                Ok(outcome) => match cli.output {
                    OutputFormat::Text => print!("{}", outcome.log_text()),
                    OutputFormat::Json => {
                        let json = serde_json::json!({
                            "match_id": outcome.match_id,
                            "winner": outcome.winner.name(),
                            "match_log": outcome.log_text(),
                            "time": format_timestamp(outcome.completed_at),
                        });
                        let pretty = serde_json::to_string_pretty(&json)
                            .unwrap_or_else(|e| format!("serialization error: {}", e));
                        println!("{}", pretty);
                    }
                },
                Err(e) => {
                    eprintln!("error: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
