use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use trader_core::Timestamp;
use trader_runner::{ClockKind, ClockOverrides, Controller, RunnerConfig, StopSignal};

/// Drive a set of strategies against a paper broker on a clock
#[derive(Parser, Debug)]
#[command(name = "trader", version, about)]
struct Cli {
    /// Load configuration from a JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Clock variant (overrides the config file)
    #[arg(long, value_enum)]
    clock: Option<ClockKind>,

    /// Seconds between ticks
    #[arg(long)]
    interval: Option<f64>,

    /// Simulated clock start (RFC 3339)
    #[arg(long)]
    start: Option<Timestamp>,

    /// Simulated clock stop, exclusive (RFC 3339)
    #[arg(long)]
    stop: Option<Timestamp>,

    /// How often to check whether the tick loop has finished, in ms
    #[arg(long)]
    poll_ms: Option<u64>,
}

impl Cli {
    fn clock_overrides(&self) -> ClockOverrides {
        ClockOverrides {
            kind: self.clock,
            interval_secs: self.interval,
            start: self.start,
            stop: self.stop,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            log::info!("Loading configuration from: {}", path.display());
            RunnerConfig::from_file(path)?
        }
        None => {
            log::info!("Using default configuration");
            RunnerConfig::default()
        }
    };
    config.apply_clock_overrides(&cli.clock_overrides())?;
    if let Some(poll_ms) = cli.poll_ms {
        config.controller.poll_interval_ms = poll_ms;
    }

    let clock = config.build_clock()?;
    let broker = Arc::new(config.build_broker());
    let strategies = config.build_strategies();

    log::info!("Clock: {:?}", config.clock);
    log::info!("Broker: {}", config.broker.name);
    log::info!("Strategies: {}", strategies.len());

    let mut controller =
        Controller::new(clock, broker.clone(), strategies).with_config(config.controller.clone());

    let interrupt = StopSignal::new();
    let on_ctrl_c = interrupt.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("SIGINT received");
            on_ctrl_c.trigger();
        }
    });

    let outcome =
        tokio::task::spawn_blocking(move || controller.run_until_stopped(&interrupt)).await?;

    let journal = broker.journal();
    println!("{} journal entries", journal.len());
    for entry in &journal {
        println!(
            "#{:<6} {:<16} {:<32} {}",
            entry.sequence,
            entry.strategy,
            entry.tick.to_string(),
            entry.note
        );
    }

    match outcome {
        Ok(report) => {
            log::info!(
                "Finished ({:?}): {} ticks, {} operations",
                report.reason,
                report.ticks_executed,
                report.operations_applied
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Tick loop failed: {}", e);
            Err(e.into())
        }
    }
}
