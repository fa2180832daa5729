use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "tgw")]
#[command(about = "Trading gateway operator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> account...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Load config, resolve credentials from the environment, print the
    /// redacted connection settings
    ConfigCheck {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Fail when the config carries keys the gateway does not read
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// Feed a recorded callback stream (JSON lines) through a session and
    /// print the normalized events and the requests it issued
    Replay {
        #[arg(long, value_enum)]
        kind: SessionKind,

        /// Recorded callbacks, one JSON object per line
        #[arg(long)]
        input: String,

        /// Contracts (JSON lines) to preload; market-data replays need these
        #[arg(long)]
        contracts: Option<String>,

        #[arg(long, default_value = "REPLAY")]
        gateway_name: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SessionKind {
    Futures,
    Options,
    Md,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Dev convenience; absent in deployments.
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = tgw_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::ConfigCheck {
            config_paths,
            strict,
        } => commands::config::check(&config_paths, strict)?,

        Commands::Replay {
            kind,
            input,
            contracts,
            gateway_name,
        } => commands::replay::run(kind, &input, contracts.as_deref(), &gateway_name)?,
    }

    Ok(())
}
