//! Single-attempt proxy probe
//!
//! Wraps a [`ProxyProbe`] implementation with the hard per-attempt timeout and
//! turns whatever happened into a [`ProbeOutcome`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use hyper::StatusCode;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::error::{CheckError, Result};
use crate::models::{ParsedEndpoint, ProbeOutcome};

/// Network side of a probe
///
/// Implementations route one request through `endpoint` and report the
/// upstream status. They do not retry and do not enforce the timeout.
#[async_trait]
pub trait ProxyProbe: Send + Sync {
    /// Route one validation request through the proxy at `endpoint`
    async fn fetch(&self, endpoint: &ParsedEndpoint) -> Result<StatusCode>;

    /// Get the protocol name for log lines
    fn protocol_name(&self) -> &'static str;
}

/// Run one probe attempt against `endpoint`, parsed from `candidate`
///
/// Never takes longer than `probe_timeout`. Emits exactly one log line.
#[instrument(skip(prober, candidate, accepted_statuses), fields(proxy = %candidate))]
pub async fn probe(
    prober: &dyn ProxyProbe,
    candidate: String,
    endpoint: ParsedEndpoint,
    probe_timeout: Duration,
    accepted_statuses: &[u16],
) -> ProbeOutcome {
    let start = Instant::now();

    let result = match timeout(probe_timeout, prober.fetch(&endpoint)).await {
        Ok(Ok(status)) if accepted_statuses.contains(&status.as_u16()) => Ok(status),
        Ok(Ok(status)) => Err(CheckError::UnexpectedStatus {
            status: status.as_u16(),
        }),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(CheckError::Timeout),
    };

    debug!("Probe of {} finished in {:?}", candidate, start.elapsed());

    match result {
        Ok(_) => {
            info!(
                "Proxy {} - SUCCESS: {} confirmed",
                candidate,
                prober.protocol_name()
            );
            ProbeOutcome::Success {
                candidate,
                endpoint,
            }
        }
        Err(e) => {
            warn!("Proxy {} - FAILED: {}", candidate, e);
            ProbeOutcome::Failure {
                candidate,
                reason: e.to_string(),
            }
        }
    }
}
