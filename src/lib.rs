//! sockscheck - SOCKS5 proxy list validator
//!
//! Checks a list of candidate proxies by routing a real HTTP request through
//! each one and keeps the ones that answer.
//!
//! ## Features
//!
//! - Cheap `ipv4:port` format filter before any network work
//! - Unauthenticated SOCKS5 probe with a hard per-attempt timeout
//! - Bounded concurrency with guaranteed slot release
//! - One outcome per candidate, failures isolated per candidate

pub mod app;
pub mod checker;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;

pub use checker::{Socks5Probe, Validator, ValidatorConfig};
pub use config::Config;
pub use error::{CheckError, Result};
pub use models::{ParsedEndpoint, ProbeOutcome, ValidationReport};
