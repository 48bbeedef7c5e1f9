use crate::config::toml_config::SiteConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, Validate};
use clap::{Parser, Subcommand, ValueEnum};

/// 網站輸入框的面板數上下限
pub const MIN_PANELS: i64 = 1;
pub const MAX_PANELS: i64 = 50;

#[derive(Debug, Clone, Parser)]
#[command(name = "solar-estimator")]
#[command(about = "Solar savings estimator and form dispatcher for cv services")]
pub struct CliConfig {
    /// Path to a TOML site configuration (regions, assumptions, mail)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Estimate cost, savings and payback for a number of panels
    Estimate {
        #[arg(short, long, default_value = "bruxelles")]
        region: String,

        #[arg(short, long, default_value = "9", allow_negative_numbers = true)]
        panels: i64,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the supported regions and their payback tables
    Regions {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Export estimates for a range of panel counts as CSV
    Schedule {
        #[arg(short, long, default_value = "bruxelles")]
        region: String,

        #[arg(long, default_value_t = MIN_PANELS)]
        from: i64,

        #[arg(long, default_value_t = MAX_PANELS)]
        to: i64,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Queue a contact request
    Contact {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        message: String,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },

    /// Queue an appointment request
    Appointment {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        prenom: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct DeliveryArgs {
    /// Directory receiving the outbox/ folder
    #[arg(long, default_value = ".")]
    pub outbox: String,

    /// Log the message instead of queuing it
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn site_config(&self) -> Result<SiteConfig> {
        match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                SiteConfig::from_file(path)
            }
            None => Ok(SiteConfig::default()),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }

        match &self.command {
            Command::Schedule { from, to, .. } => {
                validate_range("from", *from, MIN_PANELS, MAX_PANELS)?;
                validate_range("to", *to, *from, MAX_PANELS)?;
            }
            Command::Contact { delivery, .. } | Command::Appointment { delivery, .. } => {
                validate_path("outbox", &delivery.outbox)?;
            }
            Command::Estimate { .. } | Command::Regions { .. } => {}
        }

        Ok(())
    }
}
