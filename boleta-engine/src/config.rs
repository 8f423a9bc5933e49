//! Engine configuration.

use config::{Config as Cfg, File};
use serde::Deserialize;

use service_core::config::Config as CoreConfig;
use service_core::error::AppError;

use crate::batch::DEFAULT_WORKERS;

/// Configuration for the billing engine and batch demo.
#[derive(Debug, Deserialize, Clone)]
pub struct BillingConfig {
    #[serde(flatten)]
    pub core: CoreConfig,
    /// JSON seed dataset driving the demo batch run.
    pub seed_path: Option<String>,
    /// Billing period as `YYYY-MM`; defaults to the current month.
    pub billing_period: Option<String>,
    #[serde(default = "default_batch_workers")]
    pub batch_workers: usize,
}

fn default_batch_workers() -> usize {
    DEFAULT_WORKERS
}

impl BillingConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
