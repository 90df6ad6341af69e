use crate::checker::ValidatorConfig;
use crate::error::{CheckError, Result};
use crate::models::ProbeTarget;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Probe and concurrency configuration
    pub check: CheckConfig,
    /// Input/output file locations
    pub files: FileConfig,
    /// Logging configuration
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Maximum number of probes in flight (default: 200)
    pub concurrency: usize,
    /// Per-probe timeout in seconds (default: 5)
    pub timeout: u64,
    /// URL requested through every proxy (plain http only)
    pub target: ProbeTarget,
    /// Upstream status codes that mark a proxy as working (default: 200)
    pub accepted_statuses: Vec<u16>,
}

#[derive(Debug, Clone)]
pub struct FileConfig {
    /// Candidate list, one `ip:port` per line
    pub input: String,
    /// Verified list, overwritten on each run
    pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (debug, info, warn, error)
    pub level: String,
    /// Console output format (pretty, json)
    pub format: LogFormat,
    /// Log file mirrored from the console output, `None` when disabled
    pub file: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            check: CheckConfig {
                concurrency: parse_positive("CHECK_CONCURRENCY", "200")? as usize,
                timeout: parse_positive("CHECK_TIMEOUT", "5")?,
                target: ProbeTarget::parse(&get_env_or("CHECK_URL", "http://www.google.com/"))
                    .map_err(|e| match e {
                        CheckError::InvalidConfig(msg) => {
                            CheckError::InvalidConfig(format!("CHECK_URL is not usable: {}", msg))
                        }
                        other => other,
                    })?,
                accepted_statuses: parse_statuses(&get_env_or("CHECK_ACCEPT_STATUS", "200"))?,
            },
            files: FileConfig {
                input: get_env_or("INPUT_FILE", "proxy.txt"),
                output: get_env_or("OUTPUT_FILE", "checked.txt"),
            },
            log: LogConfig {
                level: get_env_or("LOG_LEVEL", "info"),
                format: parse_log_format(&get_env_or("LOG_FORMAT", "pretty"))?,
                file: Some(get_env_or("LOG_FILE", "proxy_check.log"))
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty()),
            },
        })
    }

    /// Build the validator settings for this configuration
    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            concurrency: self.check.concurrency,
            probe_timeout: Duration::from_secs(self.check.timeout),
            accepted_statuses: self.check.accepted_statuses.clone(),
        }
    }
}

fn parse_positive(key: &str, default: &str) -> Result<u64> {
    match get_env_or(key, default).trim().parse::<u64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(CheckError::InvalidConfig(format!(
            "{} must be a positive integer",
            key
        ))),
    }
}

fn parse_statuses(raw: &str) -> Result<Vec<u16>> {
    let statuses = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<u16>() {
            Ok(code) if (100..=599).contains(&code) => Ok(code),
            _ => Err(CheckError::InvalidConfig(format!(
                "CHECK_ACCEPT_STATUS contains invalid status code: {}",
                s
            ))),
        })
        .collect::<Result<Vec<u16>>>()?;

    if statuses.is_empty() {
        return Err(CheckError::InvalidConfig(
            "CHECK_ACCEPT_STATUS must list at least one status code".into(),
        ));
    }

    Ok(statuses)
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
    match raw.trim().to_lowercase().as_str() {
        "pretty" | "text" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(CheckError::InvalidConfig(format!(
            "LOG_FORMAT has unsupported value: {}",
            other
        ))),
    }
}

/// Get environment variable with a default value
fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
