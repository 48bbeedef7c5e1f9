use clap::Parser;
use solar_estimator::app::commands::{self, CommandOutput};
use solar_estimator::utils::error::{ErrorSeverity, SolarError};
use solar_estimator::utils::{logger, validation::Validate};
use solar_estimator::CliConfig;

fn exit_with(e: &SolarError) -> ! {
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 依嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting solar-estimator CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let site = match config.site_config() {
        Ok(site) => site,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Loaded {} regions", site.regions.len());

    match commands::run(&config.command, &site).await {
        Ok(CommandOutput::Text(text)) => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
        Ok(CommandOutput::Written(path)) => {
            tracing::info!("📁 Output saved to: {}", path);
            println!("📁 Output saved to: {}", path);
        }
        Ok(CommandOutput::Form(response)) => {
            println!("{} {}", response.status, response.message);
            if !response.is_success() {
                std::process::exit(if response.status >= 500 { 2 } else { 1 });
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
