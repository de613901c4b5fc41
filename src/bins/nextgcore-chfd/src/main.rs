//! NextGCore CHF (Charging Function)
//!
//! The CHF is a 5G core network function responsible for:
//! - Converged charging of subscriber sessions (Nchf_ConvergedCharging)
//! - Allocation of local record sequence numbers for CDRs
//! - Advertising its Nchf services to the NRF

use anyhow::{Context, Result};
use clap::Parser;
use nextgcore_chfd::{chf_context_init, ChfConfig, ChfContext};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// NextGCore CHF - Charging Function
#[derive(Parser, Debug)]
#[command(name = "nextgcore-chfd")]
#[command(author = "NextGCore")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "5G Core Charging Function", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, default_value = "/etc/nextgcore/chf.yaml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'e', long, default_value = "info")]
    log_level: String,

    /// Disable color output
    #[arg(short = 'm', long)]
    no_color: bool,

    /// SBI register address (overrides configuration)
    #[arg(long)]
    sbi_addr: Option<String>,

    /// SBI server port (overrides configuration)
    #[arg(long)]
    sbi_port: Option<u16>,

    /// Maximum number of UEs (overrides configuration)
    #[arg(long)]
    max_ue: Option<usize>,

    /// Interval in seconds between UE load reports
    #[arg(long, default_value = "30")]
    status_interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    log::info!("NextGCore CHF v{} starting...", env!("CARGO_PKG_VERSION"));

    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(shutdown.clone())?;

    let config = load_config(&args)?;
    let ctx = ChfContext::from_config(&config).context("Failed to initialize CHF context")?;
    let ctx = chf_context_init(ctx).context("Failed to install CHF context")?;

    for service in ctx.nf_profile().nf_services {
        log::info!(
            "NF service [{}] instance={} versions={:?} prefix={}",
            service.service_name,
            service.service_instance_id,
            service.uri_versions().collect::<Vec<_>>(),
            service.api_prefix
        );
    }
    log::info!("NRF URI: {}", ctx.identity().nrf_uri);
    log::info!("NextGCore CHF ready");

    run_event_loop_async(&ctx, &args, shutdown).await?;

    log::info!(
        "NextGCore CHF stopped (ue={}, records={}, last_seq={})",
        ctx.ue_pool().count(),
        ctx.cdr_ledger().record_count(),
        ctx.cdr_ledger().last_sequence_number()
    );
    Ok(())
}

/// Load the configuration file, falling back to defaults when it is absent
fn load_config(args: &Args) -> Result<ChfConfig> {
    let mut config = if Path::new(&args.config).exists() {
        log::info!("Loading configuration from {}", args.config);
        ChfConfig::from_file(&args.config)
            .with_context(|| format!("Invalid configuration file {}", args.config))?
    } else {
        log::warn!("Configuration file not found: {} (using defaults)", args.config);
        ChfConfig::default()
    };

    let conf = &mut config.configuration;
    if let Some(addr) = &args.sbi_addr {
        conf.sbi.register_ipv4 = addr.clone();
    }
    if let Some(port) = args.sbi_port {
        conf.sbi.port = port;
    }
    if let Some(max_ue) = args.max_ue {
        conf.max_ue = max_ue;
    }
    config.validate().context("Invalid command line override")?;

    Ok(config)
}

/// Initialize logging
fn init_logging(args: &Args) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    builder.filter_level(level);
    builder.format_timestamp_millis();

    if args.no_color {
        builder.write_style(env_logger::WriteStyle::Never);
    }

    builder.try_init().context("Failed to initialize logger")?;

    Ok(())
}

/// Set up signal handlers for graceful shutdown
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        shutdown.store(true, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    Ok(())
}

/// Async main loop; reports UE load until shutdown
async fn run_event_loop_async(
    ctx: &ChfContext,
    args: &Args,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    log::debug!("Entering async main event loop");

    let report_every = Duration::from_secs(args.status_interval.max(1));
    let mut interval = tokio::time::interval(Duration::from_millis(100));
    let mut since_report = Duration::ZERO;

    while !shutdown.load(Ordering::SeqCst) {
        interval.tick().await;

        since_report += Duration::from_millis(100);
        if since_report >= report_every {
            since_report = Duration::ZERO;
            log::info!(
                "UE load {}% ({} UEs, {} records)",
                ctx.get_ue_load(),
                ctx.ue_pool().count(),
                ctx.cdr_ledger().record_count()
            );
        }
    }

    log::debug!("Exiting async main event loop");
    Ok(())
}
