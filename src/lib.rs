pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::{LambdaConfig, S3Storage};

pub use adapters::{mailer::OutboxMailer, storage::LocalStorage};
pub use config::SiteConfig;
pub use crate::core::{estimator::Estimator, form_service::FormService, regions::RegionTable};
pub use domain::model::{EstimateRequest, EstimateResult};
pub use utils::error::{Result, SolarError};
