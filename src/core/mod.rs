pub mod estimator;
pub mod form_service;
pub mod forms;
pub mod regions;

pub use crate::domain::model::{
    Assumptions, EstimateRequest, EstimateResult, RegionProfile, RoiRange,
};
pub use crate::domain::ports::{ConfigProvider, Mailer, Storage};
pub use crate::utils::error::Result;
