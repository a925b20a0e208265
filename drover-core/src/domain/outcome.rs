//! Attempt outcome domain types

use serde::{Deserialize, Serialize};

/// Why an attempt did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidCredentials,
    /// Captcha, MFA or any other checkpoint raised by the target
    ChallengeRequired,
    ProxyError,
    NetworkTimeout,
    Unknown,
}

impl FailureKind {
    pub const ALL: [FailureKind; 5] = [
        FailureKind::InvalidCredentials,
        FailureKind::ChallengeRequired,
        FailureKind::ProxyError,
        FailureKind::NetworkTimeout,
        FailureKind::Unknown,
    ];
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::InvalidCredentials => write!(f, "InvalidCredentials"),
            FailureKind::ChallengeRequired => write!(f, "ChallengeRequired"),
            FailureKind::ProxyError => write!(f, "ProxyError"),
            FailureKind::NetworkTimeout => write!(f, "NetworkTimeout"),
            FailureKind::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result of one attempt for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "kind", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Failure(FailureKind),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            AttemptOutcome::Success => None,
            AttemptOutcome::Failure(kind) => Some(*kind),
        }
    }
}

impl std::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptOutcome::Success => write!(f, "Success"),
            AttemptOutcome::Failure(kind) => write!(f, "Failure({})", kind),
        }
    }
}

/// Failure counters split by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBreakdown {
    pub invalid_credentials: u64,
    pub challenge_required: u64,
    pub proxy_error: u64,
    pub network_timeout: u64,
    pub unknown: u64,
}

impl FailureBreakdown {
    pub fn record(&mut self, kind: FailureKind) {
        self.add(kind, 1);
    }

    pub fn add(&mut self, kind: FailureKind, count: u64) {
        match kind {
            FailureKind::InvalidCredentials => self.invalid_credentials += count,
            FailureKind::ChallengeRequired => self.challenge_required += count,
            FailureKind::ProxyError => self.proxy_error += count,
            FailureKind::NetworkTimeout => self.network_timeout += count,
            FailureKind::Unknown => self.unknown += count,
        }
    }

    pub fn get(&self, kind: FailureKind) -> u64 {
        match kind {
            FailureKind::InvalidCredentials => self.invalid_credentials,
            FailureKind::ChallengeRequired => self.challenge_required,
            FailureKind::ProxyError => self.proxy_error,
            FailureKind::NetworkTimeout => self.network_timeout,
            FailureKind::Unknown => self.unknown,
        }
    }

    pub fn total(&self) -> u64 {
        FailureKind::ALL.iter().map(|kind| self.get(*kind)).sum()
    }
}
