use std::fmt;

use crate::smtp_verify::{SmtpCommand, SmtpReply};

/// Terminal state of one address. Only [`Outcome::Accepted`] is written to
/// the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted {
        exchange: String,
        reply: SmtpReply,
    },
    /// No usable local-part/domain split.
    MalformedAddress { reason: String },
    SyntaxInvalid { reasons: Vec<String> },
    DomainUnresolvable { domain: String, reason: String },
    /// The server answered a command with an unexpected code.
    SmtpRejected {
        exchange: String,
        command: SmtpCommand,
        reply: SmtpReply,
    },
    /// Connect, greeting, I/O or protocol failure.
    SmtpUnreachable { exchange: String, reason: String },
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { exchange, reply } => write!(f, "accepted by {exchange} ({reply})"),
            Self::MalformedAddress { reason } => write!(f, "malformed address: {reason}"),
            Self::SyntaxInvalid { reasons } => write!(f, "syntax invalid: {}", reasons.join("; ")),
            Self::DomainUnresolvable { domain, reason } => {
                write!(f, "domain {domain} unresolvable: {reason}")
            }
            Self::SmtpRejected {
                exchange,
                command,
                reply,
            } => write!(f, "{command} rejected by {exchange}: {reply}"),
            Self::SmtpUnreachable { exchange, reason } => {
                write!(f, "SMTP server {exchange} unreachable: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_log_lines() {
        let rendered = [
            Outcome::Accepted {
                exchange: "mx1.example.com".into(),
                reply: SmtpReply::new(250, "2.1.5 Ok"),
            },
            Outcome::MalformedAddress {
                reason: "address has no '@' separator".into(),
            },
            Outcome::SyntaxInvalid {
                reasons: vec!["empty domain label".into(), "invalid local part (strict rules)".into()],
            },
            Outcome::DomainUnresolvable {
                domain: "nodomain.invalid".into(),
                reason: "no MX records".into(),
            },
            Outcome::SmtpRejected {
                exchange: "mx1.example.com".into(),
                command: SmtpCommand::RcptTo,
                reply: SmtpReply::new(550, "5.1.1 User unknown\nbye"),
            },
            Outcome::SmtpUnreachable {
                exchange: "mx1.example.com".into(),
                reason: "connection refused".into(),
            },
        ]
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");

        insta::assert_snapshot!(rendered, @r"
        accepted by mx1.example.com (250 2.1.5 Ok)
        malformed address: address has no '@' separator
        syntax invalid: empty domain label; invalid local part (strict rules)
        domain nodomain.invalid unresolvable: no MX records
        RCPT TO rejected by mx1.example.com: 550 5.1.1 User unknown / bye
        SMTP server mx1.example.com unreachable: connection refused
        ");
    }

    #[test]
    fn only_accepted_is_accepted() {
        let rejected = Outcome::SmtpRejected {
            exchange: "mx".into(),
            command: SmtpCommand::RcptTo,
            reply: SmtpReply::new(251, "forwarded"),
        };
        assert!(!rejected.is_accepted());
    }
}
