use std::net::{SocketAddr, ToSocketAddrs};

use crate::smtp_verify::error::SmtpVerifyError;
use crate::smtp_verify::options::SmtpProbeOptions;
use crate::smtp_verify::session::SmtpSession;
use crate::smtp_verify::types::{SmtpCommand, SmtpReply};

/// Asks a mail exchange whether it accepts a recipient.
pub trait RecipientProbe {
    /// Returns the `RCPT TO` reply. Refusals of earlier commands come back as
    /// [`SmtpVerifyError::CommandRejected`].
    fn probe(&self, exchange: &str, recipient: &str) -> Result<SmtpReply, SmtpVerifyError>;
}

/// Real TCP prober: one connection per call, no TLS, no retry.
#[derive(Debug, Clone)]
pub struct SmtpProber {
    options: SmtpProbeOptions,
    helo: String,
}

impl SmtpProber {
    /// The HELO name is resolved once here, not per address.
    pub fn new(options: SmtpProbeOptions) -> Self {
        let helo = options.effective_helo().into_owned();
        Self { options, helo }
    }

    pub fn options(&self) -> &SmtpProbeOptions {
        &self.options
    }

    pub fn helo(&self) -> &str {
        &self.helo
    }
}

impl RecipientProbe for SmtpProber {
    fn probe(&self, exchange: &str, recipient: &str) -> Result<SmtpReply, SmtpVerifyError> {
        probe_recipient(exchange, recipient, &self.options, &self.helo)
    }
}

/// Run `HELO` / `MAIL FROM` / `RCPT TO` / `QUIT` against `exchange` and
/// return the `RCPT TO` reply.
pub fn probe_recipient(
    exchange: &str,
    recipient: &str,
    options: &SmtpProbeOptions,
    helo: &str,
) -> Result<SmtpReply, SmtpVerifyError> {
    let addresses = resolve_socket_addrs(exchange, options.port)?;
    let mut session = SmtpSession::connect(exchange, &addresses, options.timeout())?;
    session.read_greeting()?;

    expect_positive(&mut session, SmtpCommand::Helo, &format!("HELO {helo}"))?;
    expect_positive(&mut session, SmtpCommand::MailFrom, &options.envelope_sender())?;

    let rcpt = session.send_command(&format!("RCPT TO:<{recipient}>"))?;
    session.quit();
    Ok(rcpt)
}

fn expect_positive(
    session: &mut SmtpSession,
    command: SmtpCommand,
    line: &str,
) -> Result<SmtpReply, SmtpVerifyError> {
    let reply = session.send_command(line)?;
    if reply.is_positive_completion() {
        Ok(reply)
    } else {
        session.quit();
        Err(SmtpVerifyError::CommandRejected { command, reply })
    }
}

fn resolve_socket_addrs(exchange: &str, port: u16) -> Result<Vec<SocketAddr>, SmtpVerifyError> {
    let addresses: Vec<SocketAddr> = (exchange, port)
        .to_socket_addrs()
        .map_err(|source| SmtpVerifyError::Resolve {
            host: exchange.to_string(),
            source,
        })?
        .collect();
    if addresses.is_empty() {
        return Err(SmtpVerifyError::NoAddresses {
            host: exchange.to_string(),
        });
    }
    Ok(addresses)
}
