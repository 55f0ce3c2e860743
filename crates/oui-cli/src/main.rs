mod commands;

use anyhow::Result;
use clap::Parser;
use commands::lookup::OutputMode;
use oui_lookup::{Config, LookupEngine};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_PATH: &str = "/etc/oui-lookup/config.yaml";
const CACHE_FILE_NAME: &str = "vendors.json";

/// Look up the manufacturer of MAC addresses from the IEEE OUI registry
#[derive(Parser, Debug)]
#[command(name = "oui", author, version, about, long_about = None)]
struct Cli {
    /// MAC addresses (AA:BB:CC:DD:EE:FF, aa-bb-cc-dd-ee-ff, aabb.ccdd.eeff, ...)
    #[arg(required_unless_present = "update")]
    addresses: Vec<String>,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Directory holding the vendor cache
    #[arg(short = 'd', long)]
    cache_dir: Option<PathBuf>,

    /// Download the registry and rebuild the vendor cache
    #[arg(short, long)]
    update: bool,

    /// Only use the local vendor cache, never the network
    #[arg(short, long, conflicts_with = "update")]
    local: bool,

    /// Registry location (http(s) URL or file:// path) for this run, used
    /// by updates and online lookups alike
    #[arg(short, long)]
    source: Option<String>,

    /// Print the vendor name only
    #[arg(short, long, conflicts_with = "verbose")]
    terse: bool,

    /// Print every vendor field and enable debug logs
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.terse {
            OutputMode::Terse
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "oui=debug,oui_lookup=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = load_config(&cli.config);
    apply_source(&mut config, cli.source.as_deref());
    prepare_cache_path(&mut config, cli.cache_dir.as_deref())?;

    let engine = LookupEngine::new(&config)?;
    if let Err(e) = engine.load_local_database().await {
        debug!("No usable vendor cache yet: {}", e);
    }

    let mode = cli.output_mode();
    if cli.update {
        commands::update::run(&engine, mode).await?;
    } else if !cli.local && engine.is_empty().await {
        info!("Vendor cache is empty, downloading the registry");
        if let Err(e) = commands::update::run(&engine, mode).await {
            warn!("Initial registry download failed: {}", e);
        }
    }

    commands::lookup::run(&engine, &cli.addresses, cli.local, mode).await;

    Ok(())
}

/// Load configuration - try specified path, then current directory, then
/// built-in defaults
fn load_config(path: &str) -> Config {
    let config_path = if Path::new(path).exists() {
        path.to_string()
    } else if path == DEFAULT_CONFIG_PATH && Path::new("config.yaml").exists() {
        debug!("Config not found at {}, using config.yaml", path);
        "config.yaml".to_string()
    } else {
        debug!("No configuration at {}, using defaults", path);
        return Config::default();
    };

    match Config::from_file(&config_path) {
        Ok(cfg) => {
            debug!("Loaded configuration from {}", config_path);
            cfg
        }
        Err(e) => {
            warn!("Failed to load configuration from {}: {}", config_path, e);
            Config::default()
        }
    }
}

fn apply_source(config: &mut Config, source: Option<&str>) {
    if let Some(source) = source {
        debug!("Using registry at {}", source);
        config.registry.url = source.to_string();
    }
}

/// Make sure the cache file's directory exists. When the configured
/// location cannot be created and no directory was given explicitly, fall
/// back to the user's cache directory.
fn prepare_cache_path(config: &mut Config, cache_dir: Option<&Path>) -> Result<()> {
    if let Some(dir) = cache_dir {
        config.cache_path = dir.join(CACHE_FILE_NAME);
    }

    let parent = match config.cache_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => return Ok(()),
    };

    match std::fs::create_dir_all(&parent) {
        Ok(()) => Ok(()),
        Err(e) if cache_dir.is_some() => Err(e.into()),
        Err(e) => {
            let Some(fallback) = user_cache_dir() else {
                return Err(e.into());
            };
            warn!(
                "Cannot use {} ({}), falling back to {}",
                parent.display(),
                e,
                fallback.display()
            );
            std::fs::create_dir_all(&fallback)?;
            config.cache_path = fallback.join(CACHE_FILE_NAME);
            Ok(())
        }
    }
}

fn user_cache_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
        .map(|base| base.join("oui-lookup"))
}
