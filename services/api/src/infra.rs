use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use sip_estimator::config::TablesConfig;
use sip_estimator::error::AppError;
use sip_estimator::pricing::PricingTables;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// CSV overrides for the shipped calibration, shared by every subcommand.
/// Command-line paths win over the environment-configured ones.
#[derive(Args, Debug, Default)]
pub(crate) struct TableOverrideArgs {
    /// CSV export replacing the delivery-fee table (City,Aliases,Fee)
    #[arg(long)]
    pub(crate) delivery_csv: Option<PathBuf>,
    /// CSV export replacing the base-rate table (Floors,FirstFloor,RoofType,RatePerM2)
    #[arg(long)]
    pub(crate) base_rates_csv: Option<PathBuf>,
}

pub(crate) fn build_tables(
    overrides: &TableOverrideArgs,
    config: &TablesConfig,
) -> Result<PricingTables, AppError> {
    let mut tables = PricingTables::standard();

    if let Some(path) = overrides
        .delivery_csv
        .as_ref()
        .or(config.delivery_csv.as_ref())
    {
        tables = tables.with_delivery_fees_from_path(path)?;
    }

    if let Some(path) = overrides
        .base_rates_csv
        .as_ref()
        .or(config.base_rates_csv.as_ref())
    {
        tables = tables.with_base_rates_from_path(path)?;
    }

    Ok(tables)
}
