/// Convertit le domaine en ASCII (IDNA, minuscules). Chaîne vide si la
/// conversion échoue.
pub(crate) fn to_ascii_domain(domain: &str) -> String {
    idna::domain_to_ascii(domain.trim()).unwrap_or_default()
}

/// Valide le domaine: conversion IDNA + checks de labels.
/// Push des raisons invalidantes dans `reasons`.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) {
    if domain.is_empty() {
        reasons.push("domain is empty".to_string());
        return;
    }

    let Ok(ascii) = idna::domain_to_ascii(domain) else {
        reasons.push("domain punycode conversion failed".to_string());
        return;
    };

    if ascii.len() > 253 {
        reasons.push(format!("domain length {} > 253", ascii.len()));
    }

    if !ascii.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }

    for label in ascii.split('.') {
        check_label(label, reasons);
    }
}

fn check_label(label: &str, reasons: &mut Vec<String>) {
    if label.is_empty() {
        reasons.push("empty domain label".to_string());
        return;
    }
    if label.len() > 63 {
        reasons.push(format!("domain label '{label}' length {} > 63", label.len()));
    }
    if label.starts_with('-') || label.ends_with('-') {
        reasons.push(format!("domain label '{label}' cannot start/end with '-'"));
    }
    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        reasons.push(format!("domain label '{label}' has invalid chars"));
    }
}
