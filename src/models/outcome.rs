use super::ParsedEndpoint;

/// Terminal classification of a single candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The proxy relayed the validation request and got an accepted status
    Success {
        candidate: String,
        endpoint: ParsedEndpoint,
    },
    /// The candidate string is not a valid `ipv4:port`
    RejectedFormat(String),
    /// The probe ran and failed
    Failure { candidate: String, reason: String },
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    /// The candidate string exactly as it was read
    pub fn candidate(&self) -> &str {
        match self {
            ProbeOutcome::Success { candidate, .. }
            | ProbeOutcome::RejectedFormat(candidate)
            | ProbeOutcome::Failure { candidate, .. } => candidate,
        }
    }
}

/// Result of one validation run
///
/// Outcomes and verified endpoints are kept in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    total: usize,
    outcomes: Vec<ProbeOutcome>,
    verified: Vec<String>,
}

impl ValidationReport {
    /// Create an empty report expecting `total` outcomes
    pub fn new(total: usize) -> Self {
        Self {
            total,
            outcomes: Vec::with_capacity(total),
            verified: Vec::new(),
        }
    }

    /// Append a terminal outcome
    pub fn record(&mut self, outcome: ProbeOutcome) {
        if let ProbeOutcome::Success { candidate, .. } = &outcome {
            self.verified.push(candidate.clone());
        }
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Working candidates as read from input, first success first
    pub fn verified(&self) -> &[String] {
        &self.verified
    }

    pub fn outcomes(&self) -> &[ProbeOutcome] {
        &self.outcomes
    }

    pub fn success_count(&self) -> usize {
        self.verified.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ProbeOutcome::RejectedFormat(_)))
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ProbeOutcome::Failure { .. }))
            .count()
    }

    /// Whether every expected candidate has exactly one recorded outcome
    pub fn is_complete(&self) -> bool {
        self.outcomes.len() == self.total
    }
}
