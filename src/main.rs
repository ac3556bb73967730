//! MemPulse CLI entry point

use anyhow::{Context, Result};
use mempulse::config::cli::Cli;
use mempulse::config::{cli_convert, validator};
use mempulse::output::json;
use mempulse::worker::affinity;
use mempulse::{Orchestrator, Reporter};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;

    init_logging(cli.verbose)?;

    let config = cli_convert::build_config(&cli)?;
    validator::validate_config(&config).context("Configuration validation failed")?;

    if cli.dry_run {
        println!("{}", config);
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    log::debug!("{}", config);
    affinity::warn_if_oversubscribed(config.worker_count);

    let config = Arc::new(config);
    let orchestrator = Orchestrator::new(config.clone(), Arc::new(Reporter::stdout()));

    let stop_flag = orchestrator.stop_handle();
    ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    })
    .context("Error setting Ctrl-C handler")?;

    let start_time = chrono::Utc::now();
    let stats = orchestrator.run()?;
    let end_time = chrono::Utc::now();

    if orchestrator.stop_handle().load(Ordering::Relaxed) {
        log::warn!("Run interrupted; workers stopped early");
    }

    if cli.json {
        let summary = json::build_run_summary(&config, &stats, start_time, end_time);
        println!("{}", json::to_json_string(&summary)?);
    }

    Ok(())
}

/// Route `log` diagnostics to stderr, keeping stdout for the report
fn init_logging(verbose: u8) -> Result<()> {
    let llv = match verbose {
        0 => simplelog::LevelFilter::Warn,
        1 => simplelog::LevelFilter::Info,
        2 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .context("Failed to initialize logger")
}
