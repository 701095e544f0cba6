/// Caractères atext autorisés en plus des alphanumériques ASCII (RFC 5322).
const ATEXT_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

/// Règles strictes: atext ASCII + '.' non initial/terminal, pas de ".."
pub(crate) fn is_local_strict(s: &str) -> bool {
    if s.is_empty() || s.starts_with('.') || s.ends_with('.') || s.contains("..") {
        return false;
    }
    s.chars()
        .all(|c| c == '.' || c.is_ascii_alphanumeric() || ATEXT_SPECIALS.contains(c))
}

/// Règles relaxed: quoted-string simple (sans guillemet interne non échappé),
/// sinon retombe sur `is_local_strict`.
pub(crate) fn is_local_relaxed(s: &str) -> bool {
    match s.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(inner) => !has_bare_quote(inner),
        None => is_local_strict(s),
    }
}

fn has_bare_quote(inner: &str) -> bool {
    let mut escaped = false;
    for c in inner.chars() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return true,
            _ => escaped = false,
        }
    }
    escaped
}
