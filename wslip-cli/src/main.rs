use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use wslip_core::{observability, paths, NetworkUpdate};

mod commands;

use commands::{assign::AssignOptions, Files};

#[derive(Parser)]
#[command(name = "wslip", version)]
#[command(about = "Stable IP addresses and hosts entries for WSL instances", long_about = None)]
struct Cli {
    /// Config file (default: $WSLIP_CONFIG or ~/.wsl-iphandler-config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Hosts file (default: $WSLIP_HOSTS or the system hosts file)
    #[arg(long, global = true)]
    hosts: Option<PathBuf>,

    /// Keep a timestamped backup of every file that gets rewritten
    #[arg(long, global = true)]
    backup: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign an address (or a dynamic offset) to an instance
    Assign {
        /// WSL instance name
        instance: String,

        /// Use an offset from the adapter's base address instead of a fixed IP
        #[arg(long, conflicts_with_all = ["address", "gateway", "prefix"])]
        dynamic: bool,

        /// Request a specific address
        #[arg(short, long)]
        address: Option<Ipv4Addr>,

        /// Gateway IP of the WSL adapter (stored for later calls)
        #[arg(short, long)]
        gateway: Option<Ipv4Addr>,

        /// Prefix length of the WSL adapter subnet
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=30))]
        prefix: Option<u8>,
    },

    /// Remove an instance's address and hosts entry
    Release {
        /// WSL instance name
        instance: String,

        /// Also drop the network settings when no static address remains
        #[arg(long)]
        clear_network: bool,
    },

    /// List assigned instances
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage the WSL adapter network settings
    #[command(subcommand)]
    Network(NetworkCommands),

    /// Read and edit raw config values
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum NetworkCommands {
    /// Show the resolved network settings
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Store network settings
    Set {
        /// Gateway IP of the WSL adapter
        #[arg(short, long)]
        gateway: Option<Ipv4Addr>,

        /// Prefix length of the WSL adapter subnet
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=30))]
        prefix: Option<u8>,

        /// DNS servers (comma separated or repeated)
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        dns: Option<Vec<Ipv4Addr>>,

        /// Name under which instances reach Windows
        #[arg(long)]
        windows_host: Option<String>,

        /// Windows adapters to follow in dynamic mode (comma separated or repeated)
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        adapters: Option<Vec<String>>,
    },

    /// Drop the network settings
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print a value
    Get {
        section: String,
        key: String,

        /// Printed when the key is not set
        #[arg(long)]
        default: Option<String>,
    },

    /// Store a value
    Set {
        section: String,
        key: String,
        value: String,

        /// Refuse a value that another key of the section already holds
        #[arg(long)]
        unique: bool,
    },

    /// Remove a value
    Remove { section: String, key: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    observability::init(observability::level_for_verbosity(cli.verbose))
        .map_err(|e| anyhow::anyhow!(e))?;

    let files = Files {
        config: cli.config.unwrap_or_else(paths::config_path),
        hosts: cli.hosts.unwrap_or_else(paths::hosts_path),
        backup: cli.backup,
    };
    tracing::debug!(config = %files.config.display(), hosts = %files.hosts.display(), "Resolved files");

    match cli.command {
        Commands::Assign { instance, dynamic, address, gateway, prefix } => {
            let options = AssignOptions { dynamic, address, gateway, prefix_length: prefix };
            commands::assign(&files, &instance, &options)?;
        }

        Commands::Release { instance, clear_network } => {
            commands::release(&files, &instance, clear_network)?;
        }

        Commands::List { json } => {
            commands::list(&files, json)?;
        }

        Commands::Network(cmd) => match cmd {
            NetworkCommands::Show { json } => commands::network::show(&files, json)?,
            NetworkCommands::Set { gateway, prefix, dns, windows_host, adapters } => {
                let update = NetworkUpdate {
                    gateway,
                    prefix_length: prefix,
                    dns_servers: dns,
                    windows_host_name: windows_host,
                    dynamic_adapters: adapters,
                };
                commands::network::set(&files, &update)?;
            }
            NetworkCommands::Clear => commands::network::clear(&files)?,
        },

        Commands::Config(cmd) => match cmd {
            ConfigCommands::Get { section, key, default } => {
                commands::config::get(&files, &section, &key, default.as_deref())?;
            }
            ConfigCommands::Set { section, key, value, unique } => {
                commands::config::set(&files, &section, &key, &value, unique)?;
            }
            ConfigCommands::Remove { section, key } => {
                commands::config::remove(&files, &section, &key)?;
            }
        },
    }

    Ok(())
}
