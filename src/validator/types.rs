use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Règles appliquées à la partie locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    #[default]
    Strict,
    /// autorise en plus une quoted-string simple
    Relaxed,
}

impl FromStr for ValidationMode {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "relaxed" => Ok(Self::Relaxed),
            other => Err(EmailError::Other(format!(
                "unknown validation mode '{other}', use: strict|relaxed"
            ))),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Relaxed => f.write_str("relaxed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub ok: bool,
    pub reasons: Vec<String>,
}

/// Adresse découpée (local / domaine) avec le domaine ASCII prêt pour le DNS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEmail {
    pub original: String,
    pub local: String,
    pub domain: String,
    pub ascii_domain: String,
    pub mode: ValidationMode,
    pub valid: bool,
    pub reasons: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("address has no '@' separator")]
    MissingAt,
    #[error("address has an empty {0}")]
    EmptyPart(&'static str),
    #[error("{0}")]
    Other(String),
}
