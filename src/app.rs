//! One batch run: read candidates, validate them, persist the working ones

use std::sync::Arc;

use tracing::info;

use crate::checker::{ProxyProbe, Socks5Probe, Validator};
use crate::config::Config;
use crate::error::Result;
use crate::models::ValidationReport;
use crate::repository::{CandidateRepository, ResultRepository};

/// Run a full validation pass with the SOCKS5 probe
///
/// Fails before any probing when the input cannot be read, in which case the
/// output file is left untouched.
pub async fn run(config: &Config) -> Result<ValidationReport> {
    let prober = Arc::new(Socks5Probe::new(config.check.target.clone()));
    info!("Validation target: {}", prober.target().url());

    run_with_prober(config, prober).await
}

/// Run a full validation pass with a caller-supplied probe layer
pub async fn run_with_prober(
    config: &Config,
    prober: Arc<dyn ProxyProbe>,
) -> Result<ValidationReport> {
    let candidates = CandidateRepository::new(&config.files.input).load().await?;
    info!("Found {} proxies to check", candidates.len());

    let validator = Validator::new(config.validator_config(), prober);
    let report = validator.run(candidates).await;

    let results = ResultRepository::new(&config.files.output);
    results.save(report.verified()).await?;

    info!(
        "Found {} working SOCKS5 proxies out of {}",
        report.success_count(),
        report.total()
    );
    info!("Results saved to {}", results.path().display());

    Ok(report)
}
