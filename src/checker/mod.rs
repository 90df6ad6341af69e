//! Proxy validation engine
//!
//! This module provides the checking pipeline:
//! - Candidate format validation
//! - SOCKS5 probing with a hard per-attempt timeout
//! - Bounded-concurrency admission
//! - Fan-out orchestration and report aggregation

pub mod format;
pub mod limiter;
pub mod orchestrator;
pub mod probe;
pub mod socks;

pub use format::validate;
pub use limiter::{ConcurrencyLimiter, SlotGuard};
pub use orchestrator::{Validator, ValidatorConfig};
pub use probe::{probe, ProxyProbe};
pub use socks::Socks5Probe;
