mod cli;

use foldermonitor::{config, logging, monitor::Monitor};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tokio_util::sync::CancellationToken;

async fn watch(config: config::Config) -> Result<()> {
    tracing::info!("Starting folder monitor application");

    let monitor = Monitor::new(&config).map_err(|e| {
        tracing::error!("Error starting folder monitor: {}", e);
        e
    })?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            signal.cancel();
        }
    });

    monitor.run(shutdown).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let _log_file = logging::init(&config.logging, cli.verbose)?;

            // Everything runs on this one thread.
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            rt.block_on(watch(config))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("✓ Configuration is valid");
    println!("  Watch root: {}", config.watch_root.display());
    println!("  Settle delay: {}s", config.settle_delay_secs);
    println!("  Routes: {}", config.routes.len());
    for route in &config.routes {
        let dests: Vec<String> = route
            .destinations
            .iter()
            .map(|d| d.display().to_string())
            .collect();
        println!("    .{} -> {}", route.extension, dests.join(", "));
    }
    println!(
        "  Log file: {}",
        logging::generation_path(&config.logging.directory, &config.logging.file_stem, 0)
            .display()
    );

    Ok(())
}
