use thiserror::Error;

use crate::smtp_verify::types::{SmtpCommand, SmtpReply};

#[derive(Debug, Error)]
pub enum SmtpVerifyError {
    #[error("cannot resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no socket address for {host}")]
    NoAddresses { host: String },
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("{command} rejected: {reply}")]
    CommandRejected {
        command: SmtpCommand,
        reply: SmtpReply,
    },
}

impl SmtpVerifyError {
    pub(crate) fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }

    /// `true` when the server answered but refused a command, as opposed to
    /// the dialogue failing.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::CommandRejected { .. })
    }
}
