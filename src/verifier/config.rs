use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::smtp_verify::SmtpProbeOptions;
use crate::validator::{EmailError, ValidationMode};

pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// What to do with an address that fails the syntax check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyntaxPolicy {
    /// Skip it before any network traffic.
    #[default]
    Enforce,
    /// Log the failure and keep going with DNS and SMTP.
    LogOnly,
}

impl FromStr for SyntaxPolicy {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enforce" => Ok(Self::Enforce),
            "log-only" => Ok(Self::LogOnly),
            other => Err(EmailError::Other(format!(
                "unknown syntax policy '{other}', use: enforce|log-only"
            ))),
        }
    }
}

impl fmt::Display for SyntaxPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enforce => f.write_str("enforce"),
            Self::LogOnly => f.write_str("log-only"),
        }
    }
}

/// Everything a run needs besides its input and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    pub validation_mode: ValidationMode,
    pub syntax_policy: SyntaxPolicy,
    pub smtp: SmtpProbeOptions,
    pub dns_timeout: Duration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            validation_mode: ValidationMode::Strict,
            syntax_policy: SyntaxPolicy::Enforce,
            smtp: SmtpProbeOptions::default(),
            dns_timeout: DEFAULT_DNS_TIMEOUT,
        }
    }
}
