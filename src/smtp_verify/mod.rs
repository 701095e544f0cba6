//! SMTP recipient probing.
//!
//! [`SmtpProber`] opens one plain-text connection to a mail exchange, runs
//! `HELO` / `MAIL FROM` / `RCPT TO` / `QUIT` and hands back the `RCPT TO`
//! reply. No message is ever sent.

mod error;
mod options;
mod probe;
mod session;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::SmtpVerifyError;
pub use options::{DEFAULT_MAIL_FROM, DEFAULT_SMTP_PORT, DEFAULT_TIMEOUT_MS, SmtpProbeOptions};
pub use probe::{RecipientProbe, SmtpProber, probe_recipient};
pub use types::{SmtpCommand, SmtpReply};
