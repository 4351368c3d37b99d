#![deny(unsafe_code)]

//! fipctl — command-line client for floating IPs on a fipd control plane.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fipctl_config::ClustersConfig;
use fipctl_core::{FipClient, FipResource, UnixTransport};

/// Manage floating IPs held on a fipd control plane.
#[derive(Parser)]
#[command(name = "fipctl", version, about, long_about = None)]
struct Cli {
    /// Path to the cluster configuration file.
    #[arg(short, long, default_value = "fipctl.toml")]
    config: PathBuf,

    /// Cluster to talk to (defaults to `default_cluster` from the config).
    #[arg(long)]
    cluster: Option<String>,

    /// Control-plane socket path; overrides any cluster lookup.
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate new floating IPs.
    Allocate {
        /// Number of addresses to allocate.
        #[arg(long, default_value_t = 1)]
        count: u32,
    },

    /// List currently held floating IPs.
    Ls,

    /// Show one floating IP.
    Get { ip: String },

    /// Attach a human-readable name to a floating IP.
    Name {
        ip: String,

        /// Label to attach.
        #[arg(long)]
        name: String,
    },

    /// Release a floating IP.
    Release { ip: String },

    /// Release every currently held floating IP.
    ReleaseAll,

    /// Configuration inspection commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Display clusters defined in the fipctl config.
    GetClusters,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing subscriber with verbosity level
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    if let Commands::Config { command } = &cli.command {
        return match command {
            ConfigCommands::GetClusters => cmd_get_clusters(&cli.config).await,
        };
    }

    let client = build_client(&cli).await?;

    match &cli.command {
        Commands::Allocate { count } => cmd_allocate(&client, *count).await,
        Commands::Ls => cmd_ls(&client).await,
        Commands::Get { ip } => cmd_get(&client, ip).await,
        Commands::Name { ip, name } => cmd_name(&client, ip, name).await,
        Commands::Release { ip } => cmd_release(&client, ip).await,
        Commands::ReleaseAll => cmd_release_all(&client).await,
        Commands::Config { .. } => unreachable!("handled above"),
    }
}

/// Pick the control-plane socket: `--socket` wins outright, otherwise the
/// cluster config decides.
async fn build_client(cli: &Cli) -> Result<FipClient<UnixTransport>> {
    if let Some(socket) = &cli.socket {
        return Ok(FipClient::connect(socket));
    }
    let config = load_config(&cli.config).await?;
    let socket = config.resolve(cli.cluster.as_deref())?.socket_path.clone();
    Ok(FipClient::connect(socket))
}

async fn load_config(path: &Path) -> Result<ClustersConfig> {
    if path.exists() {
        Ok(ClustersConfig::load(path).await?)
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        Ok(ClustersConfig::default())
    }
}

async fn cmd_allocate(client: &FipClient<UnixTransport>, count: u32) -> Result<()> {
    let fips = client.allocate(count).await?;
    print_fips(&fips);
    Ok(())
}

async fn cmd_ls(client: &FipClient<UnixTransport>) -> Result<()> {
    let fips = client.list().await?;
    print_fips(&fips);
    Ok(())
}

async fn cmd_get(client: &FipClient<UnixTransport>, ip: &str) -> Result<()> {
    let fip = client.get(ip).await?;
    print_fips(std::slice::from_ref(&fip));
    Ok(())
}

async fn cmd_name(client: &FipClient<UnixTransport>, ip: &str, name: &str) -> Result<()> {
    client.name(ip, name).await?;
    println!("{ip} named {name:?}");
    Ok(())
}

async fn cmd_release(client: &FipClient<UnixTransport>, ip: &str) -> Result<()> {
    client.release(ip).await?;
    println!("{ip} released");
    Ok(())
}

async fn cmd_release_all(client: &FipClient<UnixTransport>) -> Result<()> {
    let released = client.release_all().await?;
    for ip in &released {
        println!("{ip} released");
    }
    if released.is_empty() {
        println!("no floating IPs held");
    }
    Ok(())
}

async fn cmd_get_clusters(config_path: &Path) -> Result<()> {
    let config = load_config(config_path).await?;
    println!("NAME");
    for name in config.cluster_names() {
        println!("{name}");
    }
    Ok(())
}

fn print_fips(fips: &[FipResource]) {
    println!("{:<18} NAME", "IP");
    for fip in fips {
        println!("{:<18} {}", fip.ip, fip.name);
    }
}
