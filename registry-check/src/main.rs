//! Registry Check CLI Application
//!
//! Serves the public `/check` endpoint, runs one-off checks in-process, and
//! queries a running endpoint. This binary is a thin shell around the
//! registry-check-lib library.

mod client;
mod server;
mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use client::CheckClient;
use registry_check_lib::{
    load_env_config, validate_zones, CachedTemplates, CheckConfig, ConfigManager, DomainChecker,
    EngineConfig, EnvConfig, FileConfig, TableEngine,
};
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ui::{Outcome, Tally};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

const DEFAULT_PORT: u16 = 8080;
const MAX_CONCURRENCY: usize = 100;

/// CLI arguments for registry-check
#[derive(Parser, Debug)]
#[command(name = "registry-check")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Public domain availability endpoint backed by a registry protocol engine")]
#[command(
    long_about = "Serve a public /check endpoint that answers domain availability and pricing tier\nwith a minimal JSON envelope, run the same check locally, or query a running server."
)]
#[command(styles = STYLES)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Show detailed progress and debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the /check endpoint until Ctrl+C or SIGTERM
    Serve {
        /// Listen address
        #[arg(long = "address", value_name = "IP")]
        address: Option<IpAddr>,

        /// Listen port
        #[arg(short = 'p', long = "port", value_name = "PORT")]
        port: Option<u16>,

        #[command(flatten)]
        bridge: BridgeArgs,
    },

    /// Check one domain in-process and print the JSON envelope
    Check {
        /// Domain name to check
        #[arg(value_name = "DOMAIN")]
        domain: String,

        #[command(flatten)]
        bridge: BridgeArgs,
    },

    /// Query a running server for one or more domains
    Query {
        /// Domain names to query
        #[arg(value_name = "DOMAINS", required = true)]
        domains: Vec<String>,

        /// Base URL of the server
        #[arg(
            short = 's',
            long = "server",
            value_name = "URL",
            default_value = "http://127.0.0.1:8080"
        )]
        server: String,

        /// Max concurrent requests (max: 100)
        #[arg(short = 'c', long = "concurrency", default_value = "10")]
        concurrency: usize,

        /// Per-request timeout in seconds
        #[arg(long = "timeout", value_name = "SECS", default_value = "10")]
        timeout: u64,

        /// Output results in JSON format
        #[arg(short = 'j', long = "json")]
        json: bool,
    },
}

/// Options shared by the commands that run the bridge in this process.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BridgeArgs {
    /// Registrar client id the bridge acts as
    #[arg(long = "client-id", value_name = "ID")]
    pub client_id: Option<String>,

    /// Managed zones (comma-separated)
    #[arg(long = "zones", value_name = "ZONES", value_delimiter = ',')]
    pub zones: Option<Vec<String>>,
}

/// Fully resolved settings for the bridge and its listener.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    address: IpAddr,
    port: u16,
    check: CheckConfig,
    engine: EngineConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            check: CheckConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Settings {
    fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_tracing(args.verbose);
    debug!(
        "Registry Check CLI v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,registry_check={level},registry_check_lib={level},tower_http={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    match &args.command {
        Command::Serve { port: Some(0), .. } => {
            Err("Port must be between 1 and 65535".to_string())
        }
        Command::Query {
            server,
            concurrency,
            ..
        } => {
            if *concurrency == 0 || *concurrency > MAX_CONCURRENCY {
                return Err(format!(
                    "Concurrency must be between 1 and {}",
                    MAX_CONCURRENCY
                ));
            }
            if !server.starts_with("http://") && !server.starts_with("https://") {
                return Err(format!(
                    "Server URL must start with http:// or https://, got '{}'",
                    server
                ));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    match &args.command {
        Command::Serve { .. } => {
            let settings = build_settings(&args)?;
            let checker = build_checker(&settings);
            CachedTemplates::warm();
            server::serve(settings.socket_addr(), checker).await
        }
        Command::Check { domain, .. } => {
            let settings = build_settings(&args)?;
            let checker = build_checker(&settings);
            let domain = domain.clone();
            let response =
                tokio::task::spawn_blocking(move || checker.check(Some(domain.as_str()))).await?;
            println!("{}", response.to_json()?);
            Ok(())
        }
        Command::Query {
            domains,
            server,
            concurrency,
            timeout,
            json,
        } => {
            run_query(
                domains.clone(),
                server,
                *concurrency,
                Duration::from_secs(*timeout),
                *json,
                args.verbose,
            )
            .await
        }
    }
}

fn build_checker(settings: &Settings) -> DomainChecker {
    let engine = TableEngine::from_config(&settings.engine);
    DomainChecker::new(settings.check.clone(), Arc::new(engine))
}

/// Query a running server and report as results arrive.
async fn run_query(
    domains: Vec<String>,
    server: &str,
    concurrency: usize,
    timeout: Duration,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    let client = CheckClient::new(server, timeout)?;
    info!(url = client.check_url(), domains = domains.len(), "Querying server");

    let total = domains.len();
    let start_time = Instant::now();
    let mut tally = Tally::default();
    let mut completed = 0usize;

    let results = client
        .query_all(domains, concurrency, |result| {
            tally.add(Outcome::of(result));
            completed += 1;

            if !json {
                let counter = if total > 1 {
                    Some((completed, total))
                } else {
                    None
                };
                ui::print_result(result, verbose, counter);
            }
        })
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if total > 1 {
        println!();
        ui::print_summary(&tally, start_time.elapsed());
    }

    Ok(())
}

/// Build settings from all sources with proper precedence.
///
/// Precedence (highest first): CLI args, `RC_*` environment variables,
/// config file(s), built-in defaults.
fn build_settings(args: &Args) -> Result<Settings, Box<dyn Error>> {
    let mut settings = Settings::default();

    // Create config manager for file discovery
    let config_manager = ConfigManager::new(args.verbose);

    // Step 1: Determine config file path and load config files
    if let Some(explicit_config_path) = &args.config {
        info!(path = %explicit_config_path, "Using explicit config file (CLI --config)");

        let file_config = config_manager
            .load_file(explicit_config_path)
            .map_err(|e| {
                format!(
                    "Failed to load config file '{}': {}",
                    explicit_config_path, e
                )
            })?;

        settings = merge_file_config_into_settings(settings, file_config);
    } else if let Ok(env_config_path) = std::env::var("RC_CONFIG") {
        info!(path = %env_config_path, "Using explicit config file (RC_CONFIG env var)");

        let file_config = config_manager
            .load_file(&env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?;

        settings = merge_file_config_into_settings(settings, file_config);
    } else {
        debug!("Discovering config files...");
        let file_config = config_manager.discover_and_load()?;
        settings = merge_file_config_into_settings(settings, file_config);
    }

    // Step 2: Apply environment variables (RC_*)
    settings = apply_environment_config(settings, load_env_config());

    // Step 3: Apply CLI arguments (highest precedence)
    settings = apply_cli_args_to_settings(settings, &args.command);

    validate_zones(&settings.check.zones)?;
    Ok(settings)
}

/// Merge FileConfig into Settings
fn merge_file_config_into_settings(mut settings: Settings, file_config: FileConfig) -> Settings {
    if let Some(server) = file_config.server {
        // Addresses were validated when the file was loaded
        if let Some(address) = server.address.and_then(|a| a.parse().ok()) {
            settings.address = address;
        }
        if let Some(port) = server.port {
            settings.port = port;
        }
    }

    if let Some(check) = file_config.check {
        if let Some(client_id) = check.client_id {
            settings.check.client_id = client_id;
        }
        if let Some(label) = check.trid_label {
            settings.check.trid_label = label;
        }
        if let Some(zones) = check.zones {
            settings.check.zones = zones;
        }
    }

    if let Some(engine) = file_config.engine {
        settings.engine = engine;
    }

    settings
}

/// Apply environment variables to settings.
fn apply_environment_config(mut settings: Settings, env_config: EnvConfig) -> Settings {
    if let Some(address) = env_config.address.and_then(|a| a.parse().ok()) {
        settings.address = address;
    }
    if let Some(port) = env_config.port {
        settings.port = port;
    }
    if let Some(client_id) = env_config.client_id {
        settings.check.client_id = client_id;
    }
    if let Some(label) = env_config.trid_label {
        settings.check.trid_label = label;
    }
    if let Some(zones) = env_config.zones {
        settings.check.zones = zones;
    }
    settings
}

/// Apply CLI arguments to settings (highest precedence).
fn apply_cli_args_to_settings(mut settings: Settings, command: &Command) -> Settings {
    let bridge = match command {
        Command::Serve {
            address,
            port,
            bridge,
        } => {
            if let Some(address) = address {
                settings.address = *address;
            }
            if let Some(port) = port {
                settings.port = *port;
            }
            bridge
        }
        Command::Check { bridge, .. } => bridge,
        Command::Query { .. } => return settings,
    };

    if let Some(client_id) = &bridge.client_id {
        settings.check.client_id = client_id.clone();
    }
    if let Some(zones) = &bridge.zones {
        settings.check.zones = zones
            .iter()
            .map(|z| z.trim().to_string())
            .filter(|z| !z.is_empty())
            .collect();
    }
    settings
}
