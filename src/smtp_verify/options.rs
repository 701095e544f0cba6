use std::borrow::Cow;
use std::time::Duration;

/// Envelope sender used when none is configured.
pub const DEFAULT_MAIL_FROM: &str = "info@debug.org";
pub const DEFAULT_SMTP_PORT: u16 = 25;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration knobs for [`SmtpProber`](crate::smtp_verify::SmtpProber).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProbeOptions {
    /// HELO name; empty means the local hostname.
    pub helo_name: String,
    pub mail_from: String,
    pub port: u16,
    /// Connect and per-command timeout, `0` disables it.
    pub timeout_ms: u64,
}

impl Default for SmtpProbeOptions {
    fn default() -> Self {
        Self {
            helo_name: String::new(),
            mail_from: DEFAULT_MAIL_FROM.to_string(),
            port: DEFAULT_SMTP_PORT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl SmtpProbeOptions {
    /// Return the timeout as a [`Duration`]. A zero timeout disables the
    /// connection/read deadline.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }

    /// The name actually sent with `HELO`: [`helo_name`](Self::helo_name)
    /// trimmed, or the local hostname when that is blank.
    pub fn effective_helo(&self) -> Cow<'_, str> {
        let name = self.helo_name.trim();
        if name.is_empty() {
            Cow::Owned(local_hostname())
        } else {
            Cow::Borrowed(name)
        }
    }

    /// `MAIL FROM` argument, `<>` (null sender) when the sender is empty.
    pub fn envelope_sender(&self) -> String {
        format!("MAIL FROM:<{}>", self.mail_from.trim())
    }
}

fn local_hostname() -> String {
    match hostname::get().map(|name| name.into_string()) {
        Ok(Ok(name)) if !name.is_empty() => name,
        _ => {
            tracing::warn!("local hostname unavailable, using 'localhost' for HELO");
            "localhost".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let options = SmtpProbeOptions::default();
        assert_eq!(options.port, 25);
        assert_eq!(options.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(options.envelope_sender(), "MAIL FROM:<info@debug.org>");
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        let options = SmtpProbeOptions {
            timeout_ms: 0,
            ..SmtpProbeOptions::default()
        };
        assert_eq!(options.timeout(), None);
    }

    #[test]
    fn empty_sender_is_null_path() {
        let options = SmtpProbeOptions {
            mail_from: String::new(),
            ..SmtpProbeOptions::default()
        };
        assert_eq!(options.envelope_sender(), "MAIL FROM:<>");
    }

    #[test]
    fn helo_falls_back_to_hostname() {
        let explicit = SmtpProbeOptions {
            helo_name: " checker.example ".to_string(),
            ..SmtpProbeOptions::default()
        };
        assert_eq!(explicit.effective_helo(), "checker.example");
        assert!(!SmtpProbeOptions::default().effective_helo().is_empty());

        let blank = SmtpProbeOptions {
            helo_name: "   ".to_string(),
            ..SmtpProbeOptions::default()
        };
        assert_eq!(blank.effective_helo(), SmtpProbeOptions::default().effective_helo());
    }
}
