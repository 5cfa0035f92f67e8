use clap::Parser;
use cuddlecare::core::ConfigProvider;
use cuddlecare::utils::error::ErrorSeverity;
use cuddlecare::utils::logger;
use cuddlecare::{CareEngine, CliConfig, FlatFileStore};
use std::io;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::High => 1,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    };

    // Without a log file the session still works, just unlogged.
    let _guard = match logger::init_cli_logger(
        cli.verbose,
        config.log_level(),
        Path::new(config.log_directory()),
        config.log_file_name(),
        config.log_json(),
    ) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("⚠️ {}", e.user_friendly_message());
            None
        }
    };

    tracing::info!("Starting cuddlecare");
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    let store = FlatFileStore::from_config(&config);
    let mut engine = CareEngine::new(store);
    engine.run(io::stdin().lock(), io::stdout().lock())?;

    tracing::info!("Session ended");
    Ok(())
}
