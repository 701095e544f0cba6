//! Syntax validation of a single address.
//!
//! [`normalize_email`] is what the verifier calls: it separates the structural
//! failure (no usable `@` split, reported as [`EmailError`]) from ordinary
//! syntax findings collected in [`NormalizedEmail::reasons`].

mod domain;
mod local;
mod types;

pub use types::{EmailError, NormalizedEmail, ValidationMode, ValidationReport};

use domain::{check_domain, to_ascii_domain};
use local::{is_local_relaxed, is_local_strict};

const MAX_ADDRESS_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

/// Découpe `email` (trim) en partie locale et domaine sur le premier `@`.
pub fn split_address(email: &str) -> Result<(&str, &str), EmailError> {
    let (local, domain) = email.trim().split_once('@').ok_or(EmailError::MissingAt)?;
    if local.is_empty() {
        return Err(EmailError::EmptyPart("local part"));
    }
    if domain.is_empty() {
        return Err(EmailError::EmptyPart("domain"));
    }
    Ok((local, domain))
}

pub fn validate_email(email: &str, mode: ValidationMode) -> ValidationReport {
    let input = email.trim();

    let mut reasons = Vec::new();

    if input.len() > MAX_ADDRESS_LEN {
        reasons.push(format!("total length {} > {MAX_ADDRESS_LEN}", input.len()));
    }

    let parts: Vec<&str> = input.split('@').collect();
    if parts.len() != 2 {
        reasons.push("must contain exactly one '@'".to_string());
        return ValidationReport { ok: false, reasons };
    }
    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        reasons.push(format!(
            "local part length {} invalid (1..={MAX_LOCAL_LEN})",
            local.len()
        ));
    }

    check_domain(domain, &mut reasons);

    let local_ok = match mode {
        ValidationMode::Strict => is_local_strict(local),
        ValidationMode::Relaxed => is_local_relaxed(local),
    };
    if !local_ok {
        reasons.push(format!("invalid local part ({mode} rules)"));
    }

    ValidationReport {
        ok: reasons.is_empty(),
        reasons,
    }
}

/// Valide et renvoie une sortie normalisée (local, domaine, domaine ASCII).
///
/// Seule une adresse sans `@` exploitable est une erreur; les autres défauts
/// de syntaxe passent par `valid`/`reasons`.
pub fn normalize_email(email: &str, mode: ValidationMode) -> Result<NormalizedEmail, EmailError> {
    let (local, domain) = split_address(email)?;
    let ValidationReport { ok, reasons } = validate_email(email, mode);

    Ok(NormalizedEmail {
        original: email.trim().to_string(),
        local: local.to_string(),
        domain: domain.to_lowercase(),
        ascii_domain: to_ascii_domain(domain),
        mode,
        valid: ok,
        reasons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn accepts_basic() {
        let r = validate_email("alice@example.com", ValidationMode::Strict);
        assert!(r.ok, "{:?}", r.reasons);
    }

    #[test]
    fn rejects_double_at() {
        let r = validate_email("a@@b", ValidationMode::Strict);
        assert!(!r.ok);
    }

    #[test]
    fn quoted_local_needs_relaxed() {
        assert!(!validate_email("\"john doe\"@example.com", ValidationMode::Strict).ok);
        assert!(validate_email("\"john doe\"@example.com", ValidationMode::Relaxed).ok);
    }

    #[test]
    fn rejects_overlong_local_part() {
        let email = format!("{}@example.com", "a".repeat(65));
        let r = validate_email(&email, ValidationMode::Strict);
        assert!(r.reasons.iter().any(|r| r.contains("local part length 65")));
    }

    #[test]
    fn split_requires_at() {
        assert_eq!(split_address("nobody"), Err(EmailError::MissingAt));
        assert_eq!(split_address(""), Err(EmailError::MissingAt));
        assert_eq!(
            split_address("@example.com"),
            Err(EmailError::EmptyPart("local part"))
        );
        assert_eq!(split_address("bob@"), Err(EmailError::EmptyPart("domain")));
        assert_eq!(split_address(" bob@x.org "), Ok(("bob", "x.org")));
    }

    #[test]
    fn normalized_has_ascii_domain() {
        let n = normalize_email("alice@exämple.com", ValidationMode::Strict).unwrap();
        assert!(n.valid, "{:?}", n.reasons);
        assert_eq!(n.ascii_domain, "xn--exmple-cua.com");
    }

    #[test]
    fn normalized_keeps_invalid_syntax_as_data() {
        let n = normalize_email("a..b@example.com", ValidationMode::Strict).unwrap();
        assert!(!n.valid);
        assert_eq!(n.local, "a..b");
        assert_eq!(n.ascii_domain, "example.com");
    }

    #[test]
    fn normalize_without_at_is_an_error() {
        let err = normalize_email("not-an-address", ValidationMode::Strict).unwrap_err();
        assert_eq!(err, EmailError::MissingAt);
    }
}
