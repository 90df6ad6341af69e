//! Validation run orchestration
//!
//! Fans candidates out into one task each, gates network probes through the
//! [`ConcurrencyLimiter`] and collects every outcome into a [`ValidationReport`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{error, info, instrument, warn};

use crate::checker::format;
use crate::checker::limiter::ConcurrencyLimiter;
use crate::checker::probe::{probe, ProxyProbe};
use crate::models::{ProbeOutcome, ValidationReport};

/// Validator configuration
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Maximum number of probes in flight at once
    pub concurrency: usize,
    /// Hard wall-clock budget for a single probe
    pub probe_timeout: Duration,
    /// Upstream status codes that count as a working proxy
    pub accepted_statuses: Vec<u16>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            concurrency: 200,
            probe_timeout: Duration::from_secs(5),
            accepted_statuses: vec![200],
        }
    }
}

/// State shared by every unit of work in one run
struct ValidationContext {
    prober: Arc<dyn ProxyProbe>,
    limiter: ConcurrencyLimiter,
    probe_timeout: Duration,
    accepted_statuses: Vec<u16>,
    report: Mutex<ValidationReport>,
}

impl ValidationContext {
    fn record(&self, outcome: ProbeOutcome) {
        self.report.lock().record(outcome);
    }

    fn finish(&self) -> ValidationReport {
        std::mem::take(&mut *self.report.lock())
    }

    /// Classify one candidate. Format rejections never touch the limiter.
    async fn check(&self, candidate: String) -> ProbeOutcome {
        let endpoint = match format::validate(&candidate) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                warn!("Proxy {} - SKIPPED: {}", candidate, e);
                return ProbeOutcome::RejectedFormat(candidate);
            }
        };

        let _slot = match self.limiter.acquire().await {
            Ok(slot) => slot,
            Err(e) => {
                warn!("Proxy {} - FAILED: {}", candidate, e);
                return ProbeOutcome::Failure {
                    candidate,
                    reason: e.to_string(),
                };
            }
        };

        probe(
            self.prober.as_ref(),
            candidate,
            endpoint,
            self.probe_timeout,
            &self.accepted_statuses,
        )
        .await
    }
}

/// Runs validation rounds over candidate lists
pub struct Validator {
    config: ValidatorConfig,
    prober: Arc<dyn ProxyProbe>,
}

impl Validator {
    pub fn new(config: ValidatorConfig, prober: Arc<dyn ProxyProbe>) -> Self {
        Self { config, prober }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate every candidate and return the frozen report
    ///
    /// Each call starts from an empty accumulator and a fresh limiter.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn run(&self, candidates: Vec<String>) -> ValidationReport {
        let limiter = ConcurrencyLimiter::new(self.config.concurrency);
        let ctx = Arc::new(ValidationContext {
            prober: self.prober.clone(),
            limiter: limiter.clone(),
            probe_timeout: self.config.probe_timeout,
            accepted_statuses: self.config.accepted_statuses.clone(),
            report: Mutex::new(ValidationReport::new(candidates.len())),
        });

        info!(
            "Checking {} candidates with concurrency {} and {:?} timeout",
            candidates.len(),
            limiter.capacity(),
            self.config.probe_timeout
        );

        let handles: Vec<_> = candidates
            .into_iter()
            .map(|candidate| {
                let ctx = ctx.clone();
                let label = candidate.clone();
                let handle = tokio::spawn(async move {
                    let outcome = ctx.check(candidate).await;
                    ctx.record(outcome);
                });
                (label, handle)
            })
            .collect();

        let joined = futures::future::join_all(
            handles
                .into_iter()
                .map(|(label, handle)| async move { (label, handle.await) }),
        )
        .await;

        for (candidate, result) in joined {
            if let Err(e) = result {
                // The task died before recording, so its outcome is recorded here.
                error!("Proxy {} - FAILED: probe task aborted: {}", candidate, e);
                ctx.record(ProbeOutcome::Failure {
                    candidate,
                    reason: format!("probe task aborted: {}", e),
                });
            }
        }

        let report = ctx.finish();
        debug_assert!(report.is_complete());

        info!(
            "Validation round complete: {} verified, {} failed, {} skipped (peak concurrency {})",
            report.success_count(),
            report.failure_count(),
            report.rejected_count(),
            limiter.peak()
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use hyper::StatusCode;

    use crate::error::{CheckError, Result};
    use crate::models::ParsedEndpoint;

    /// Stub probe layer keyed by candidate
    #[derive(Default)]
    struct StubProbe {
        succeed: HashSet<String>,
        panic_on: HashSet<String>,
        hang_on: HashSet<String>,
        delay: Duration,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl StubProbe {
        fn succeeding(addrs: &[&str]) -> Self {
            Self {
                succeed: addrs.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ProxyProbe for StubProbe {
        async fn fetch(&self, endpoint: &ParsedEndpoint) -> Result<StatusCode> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let key = endpoint.to_string();
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.panic_on.contains(&key) {
                panic!("malformed response body from {}", key);
            }
            if self.hang_on.contains(&key) {
                std::future::pending::<()>().await;
            }
            if self.succeed.contains(&key) {
                Ok(StatusCode::OK)
            } else {
                Err(CheckError::ProxyConnectionFailed(
                    "TCP connect failed: Connection refused (os error 111)".to_string(),
                ))
            }
        }

        fn protocol_name(&self) -> &'static str {
            "SOCKS5"
        }
    }

    fn validator(config: ValidatorConfig, prober: Arc<StubProbe>) -> Validator {
        Validator::new(config, prober)
    }

    fn candidates(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_mixed_candidates() {
        let prober = Arc::new(StubProbe::succeeding(&["8.8.8.8:1080"]));
        let validator = validator(ValidatorConfig::default(), prober.clone());

        let report = validator
            .run(candidates(&["8.8.8.8:1080", "bad-format", "127.0.0.1:9"]))
            .await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.verified(), &["8.8.8.8:1080".to_string()]);
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.rejected_count(), 1);
        assert_eq!(report.failure_count(), 1);

        let rejected: Vec<_> = report
            .outcomes()
            .iter()
            .filter(|o| matches!(o, ProbeOutcome::RejectedFormat(_)))
            .collect();
        assert_eq!(
            rejected,
            vec![&ProbeOutcome::RejectedFormat("bad-format".to_string())]
        );

        // Rejected candidates are never probed.
        assert_eq!(prober.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_verified_list_keeps_input_text() {
        // The stub matches on the parsed endpoint, the report keeps what was read.
        let prober = Arc::new(StubProbe::succeeding(&["1.2.3.4:80", "5.6.7.8:1080"]));
        let config = ValidatorConfig {
            concurrency: 1,
            ..Default::default()
        };

        let report = validator(config, prober)
            .run(candidates(&["1.2.3.4:0080", "5.6.7.8:+1080", "9.9.9.9:01"]))
            .await;

        assert_eq!(
            report.verified(),
            &["1.2.3.4:0080".to_string(), "5.6.7.8:+1080".to_string()]
        );
        assert!(report.outcomes().contains(&ProbeOutcome::Failure {
            candidate: "9.9.9.9:01".to_string(),
            reason: "Proxy connection failed: TCP connect failed: Connection refused (os error 111)"
                .to_string(),
        }));
    }

    #[tokio::test]
    async fn test_run_empty_input() {
        let validator = validator(ValidatorConfig::default(), Arc::new(StubProbe::default()));
        let report = validator.run(Vec::new()).await;
        assert_eq!(report.total(), 0);
        assert!(report.verified().is_empty());
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_duplicates_are_probed_independently() {
        let prober = Arc::new(StubProbe::succeeding(&["1.1.1.1:1080"]));
        let validator = validator(ValidatorConfig::default(), prober.clone());

        let report = validator
            .run(candidates(&["1.1.1.1:1080", "1.1.1.1:1080", "1.1.1.1:1080"]))
            .await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.success_count(), 3);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_every_candidate_gets_one_outcome() {
        let raw: Vec<String> = (0..500)
            .map(|i| match i % 4 {
                0 => format!("10.0.{}.{}:1080", i / 256, i % 256),
                1 => format!("host-{}:1080", i),
                2 => format!("10.1.{}.{}:70000", i / 256, i % 256),
                _ => format!("10.2.{}.{}:8080", i / 256, i % 256),
            })
            .collect();
        let succeed: Vec<String> = raw.iter().filter(|c| c.ends_with(":1080")).cloned().collect();
        let succeed_refs: Vec<&str> = succeed.iter().map(String::as_str).collect();
        let prober = Arc::new(StubProbe::succeeding(&succeed_refs));

        let config = ValidatorConfig {
            concurrency: 16,
            ..Default::default()
        };
        let report = validator(config, prober).run(raw.clone()).await;

        assert_eq!(report.total(), raw.len());
        assert_eq!(report.outcomes().len(), raw.len());

        let mut seen: Vec<String> = report
            .outcomes()
            .iter()
            .map(|o| o.candidate().to_string())
            .collect();
        let mut expected = raw.clone();
        seen.sort();
        expected.sort();
        assert_eq!(seen, expected);

        assert_eq!(
            report.success_count(),
            report.outcomes().iter().filter(|o| o.is_success()).count()
        );
        assert_eq!(report.success_count(), 125);
        assert_eq!(report.rejected_count(), 250);
        assert_eq!(report.failure_count(), 125);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let raw: Vec<String> = (0..40).map(|i| format!("10.0.0.{}:1080", i)).collect();
        let prober = Arc::new(StubProbe {
            delay: Duration::from_millis(10),
            ..Default::default()
        });

        let config = ValidatorConfig {
            concurrency: 3,
            ..Default::default()
        };
        let report = validator(config, prober.clone()).run(raw).await;

        assert_eq!(report.total(), 40);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 40);
        assert!(prober.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_runs_do_not_leak_state() {
        let prober = Arc::new(StubProbe::default());
        let validator = validator(ValidatorConfig::default(), prober);
        let input = candidates(&["10.0.0.1:1080", "10.0.0.2:1080", "nope"]);

        let first = validator.run(input.clone()).await;
        let second = validator.run(input).await;

        assert!(first.verified().is_empty());
        assert!(second.verified().is_empty());
        assert_eq!(first.total(), second.total());
        assert_eq!(first.outcomes().len(), 3);
        assert_eq!(second.outcomes().len(), 3);
    }

    #[tokio::test]
    async fn test_panicking_probe_is_isolated() {
        let prober = Arc::new(StubProbe {
            succeed: ["10.0.0.1:1080", "10.0.0.3:1080"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            panic_on: ["10.0.0.2:1080".to_string()].into_iter().collect(),
            ..Default::default()
        });
        let config = ValidatorConfig {
            concurrency: 1,
            ..Default::default()
        };

        let report = validator(config, prober)
            .run(candidates(&["10.0.0.1:1080", "10.0.0.2:1080", "10.0.0.3:1080"]))
            .await;

        assert_eq!(report.total(), 3);
        assert!(report.is_complete());
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 1);

        let failure = report
            .outcomes()
            .iter()
            .find(|o| !o.is_success())
            .unwrap();
        match failure {
            ProbeOutcome::Failure { candidate, reason } => {
                assert_eq!(candidate, "10.0.0.2:1080");
                assert!(reason.contains("probe task aborted"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_hung_probe_times_out_without_blocking_others() {
        let prober = Arc::new(StubProbe {
            succeed: ["10.0.0.2:1080".to_string()].into_iter().collect(),
            hang_on: ["10.0.0.1:1080".to_string()].into_iter().collect(),
            ..Default::default()
        });
        let config = ValidatorConfig {
            concurrency: 1,
            probe_timeout: Duration::from_millis(100),
            ..Default::default()
        };

        let start = std::time::Instant::now();
        let report = validator(config, prober)
            .run(candidates(&["10.0.0.1:1080", "10.0.0.2:1080"]))
            .await;

        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(report.verified(), &["10.0.0.2:1080".to_string()]);
        assert!(report.outcomes().contains(&ProbeOutcome::Failure {
            candidate: "10.0.0.1:1080".to_string(),
            reason: "Operation timed out".to_string(),
        }));
    }
}
