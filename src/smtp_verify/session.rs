use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use crate::smtp_verify::error::SmtpVerifyError;
use crate::smtp_verify::types::SmtpReply;

/// Longest reply line accepted, CRLF included (RFC 5321 section 4.5.3.1.5).
const MAX_REPLY_LINE: usize = 512;

/// Plain-text SMTP connection to one exchange. Every exchanged line is
/// logged at DEBUG level.
///
/// The timeout bounds a whole reply (greeting or answer to one command), not
/// each individual read.
pub(crate) struct SmtpSession {
    host: String,
    stream: TcpStream,
    reader: BufReader<TcpStream>,
    timeout: Option<Duration>,
}

impl SmtpSession {
    /// Connect to the first reachable address of `host`.
    pub(crate) fn connect(
        host: &str,
        addresses: &[SocketAddr],
        timeout: Option<Duration>,
    ) -> Result<Self, SmtpVerifyError> {
        let mut last_err = None;
        for addr in addresses {
            let connected = match timeout {
                Some(timeout) => TcpStream::connect_timeout(addr, timeout),
                None => TcpStream::connect(addr),
            };
            match connected {
                Ok(stream) => {
                    tracing::debug!(host, %addr, "connected");
                    return Self::from_stream(host, stream, timeout);
                }
                Err(err) => {
                    tracing::debug!(host, %addr, error = %err, "connect failed");
                    last_err = Some(err);
                }
            }
        }
        match last_err {
            Some(source) => Err(SmtpVerifyError::Connect {
                host: host.to_string(),
                source,
            }),
            None => Err(SmtpVerifyError::NoAddresses {
                host: host.to_string(),
            }),
        }
    }

    fn from_stream(
        host: &str,
        stream: TcpStream,
        timeout: Option<Duration>,
    ) -> Result<Self, SmtpVerifyError> {
        stream
            .set_read_timeout(timeout)
            .map_err(SmtpVerifyError::io)?;
        stream
            .set_write_timeout(timeout)
            .map_err(SmtpVerifyError::io)?;
        let reader = BufReader::new(stream.try_clone().map_err(SmtpVerifyError::io)?);
        Ok(Self {
            host: host.to_string(),
            stream,
            reader,
            timeout,
        })
    }

    pub(crate) fn read_greeting(&mut self) -> Result<SmtpReply, SmtpVerifyError> {
        let reply = self.read_reply()?;
        if !reply.is_positive_completion() {
            return Err(SmtpVerifyError::Protocol(format!(
                "unexpected greeting from {}: {reply}",
                self.host
            )));
        }
        Ok(reply)
    }

    /// Send one command line and wait for its reply. A command carrying its
    /// own CR or LF is refused before anything is written.
    pub(crate) fn send_command(&mut self, command: &str) -> Result<SmtpReply, SmtpVerifyError> {
        check_command_line(command)?;
        tracing::debug!(host = %self.host, "C: {command}");
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        self.stream.write_all(&line).map_err(SmtpVerifyError::io)?;
        self.stream.flush().map_err(SmtpVerifyError::io)?;
        self.read_reply()
    }

    /// Best effort: the outcome of the probe is already known.
    pub(crate) fn quit(&mut self) {
        if let Err(err) = self.send_command("QUIT") {
            tracing::debug!(host = %self.host, error = %err, "QUIT failed");
        }
    }

    pub(crate) fn read_reply(&mut self) -> Result<SmtpReply, SmtpVerifyError> {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let mut code = None;
        let mut message_lines = Vec::new();
        loop {
            let raw = self.read_line(deadline)?;
            tracing::debug!(host = %self.host, "S: {raw}");
            let (parsed_code, continuation, text) = parse_reply_line(&raw)?;
            match code {
                Some(existing) if existing != parsed_code => {
                    return Err(SmtpVerifyError::Protocol(format!(
                        "inconsistent reply codes: {existing} vs {parsed_code}"
                    )));
                }
                Some(_) => {}
                None => code = Some(parsed_code),
            }
            message_lines.push(text.to_string());
            if !continuation {
                break;
            }
        }
        let code = code.ok_or_else(|| SmtpVerifyError::Protocol("reply missing code".into()))?;
        Ok(SmtpReply::new(code, message_lines.join("\n")))
    }

    /// Read one line of at most [`MAX_REPLY_LINE`] bytes before `deadline`.
    ///
    /// Takes one buffer fill per iteration so the deadline is checked between
    /// reads, even when the peer drips bytes slower than the timeout.
    fn read_line(&mut self, deadline: Option<Instant>) -> Result<String, SmtpVerifyError> {
        let mut raw = Vec::new();
        loop {
            self.arm_read_timeout(deadline)?;
            let chunk = match self.reader.fill_buf() {
                Ok(chunk) => chunk,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) if is_timeout(&err) => return Err(timed_out(&self.host)),
                Err(err) => return Err(SmtpVerifyError::io(err)),
            };
            if chunk.is_empty() {
                return Err(SmtpVerifyError::io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed while reading reply",
                )));
            }
            // One byte over the limit is enough to tell an overlong line.
            let budget = MAX_REPLY_LINE + 1 - raw.len();
            let (taken, complete) = match chunk.iter().position(|&b| b == b'\n') {
                Some(end) if end < budget => (end + 1, true),
                _ => (chunk.len().min(budget), false),
            };
            raw.extend_from_slice(&chunk[..taken]);
            self.reader.consume(taken);
            if raw.len() > MAX_REPLY_LINE {
                return Err(SmtpVerifyError::Protocol(format!(
                    "reply line from {} longer than {MAX_REPLY_LINE} bytes",
                    self.host
                )));
            }
            if complete {
                break;
            }
        }
        while matches!(raw.last(), Some(b'\n' | b'\r')) {
            raw.pop();
        }
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Shrink the socket read timeout to what is left before `deadline`.
    fn arm_read_timeout(&self, deadline: Option<Instant>) -> Result<(), SmtpVerifyError> {
        let Some(deadline) = deadline else {
            return Ok(());
        };
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(timed_out(&self.host));
        }
        self.stream
            .set_read_timeout(Some(remaining))
            .map_err(SmtpVerifyError::io)
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

fn timed_out(host: &str) -> SmtpVerifyError {
    SmtpVerifyError::io(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("no complete reply from {host} before the deadline"),
    ))
}

fn check_command_line(command: &str) -> Result<(), SmtpVerifyError> {
    if command.contains(['\r', '\n']) {
        return Err(SmtpVerifyError::Protocol(format!(
            "refusing to send command containing a line break: {command:?}"
        )));
    }
    Ok(())
}

/// Split one reply line into `(code, continues, text)`.
fn parse_reply_line(raw: &str) -> Result<(u16, bool, &str), SmtpVerifyError> {
    let code_part = raw
        .get(..3)
        .filter(|part| part.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| SmtpVerifyError::Protocol(format!("invalid reply line: '{raw}'")))?;
    let code = code_part
        .parse::<u16>()
        .map_err(|_| SmtpVerifyError::Protocol(format!("invalid status code: '{code_part}'")))?;
    match raw.as_bytes().get(3) {
        None => Ok((code, false, "")),
        Some(b'-') => Ok((code, true, &raw[4..])),
        Some(b' ') => Ok((code, false, &raw[4..])),
        Some(_) => Err(SmtpVerifyError::Protocol(format!(
            "invalid reply separator: '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smtp_verify::testing::MockServer;

    fn open(port: u16, timeout: Duration) -> SmtpSession {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        SmtpSession::connect("127.0.0.1", &[addr], Some(timeout)).expect("connect")
    }

    #[test]
    fn parses_final_and_continuation_lines() {
        assert_eq!(parse_reply_line("250 OK").unwrap(), (250, false, "OK"));
        assert_eq!(
            parse_reply_line("250-mx.example").unwrap(),
            (250, true, "mx.example")
        );
        assert_eq!(parse_reply_line("221").unwrap(), (221, false, ""));
    }

    #[test]
    fn rejects_garbage_lines() {
        assert!(parse_reply_line("hello").is_err());
        assert!(parse_reply_line("25").is_err());
        assert!(parse_reply_line("250+x").is_err());
    }

    #[test]
    fn drip_fed_reply_stops_at_the_deadline() {
        let server = MockServer::spawn_drip(b"2", Duration::from_millis(100));
        let mut session = open(server.port(), Duration::from_millis(300));

        let started = Instant::now();
        let err = session.read_greeting().expect_err("the line never ends");
        let elapsed = started.elapsed();

        match err {
            SmtpVerifyError::Io { source } => assert_eq!(source.kind(), io::ErrorKind::TimedOut),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
        drop(session);
        server.finish();
    }

    #[test]
    fn overlong_reply_line_is_a_protocol_error() {
        let server = MockServer::spawn_with_greeting(format!("220 {}\r\n", "x".repeat(600)), vec![]);
        let err = open(server.port(), Duration::from_secs(2))
            .read_greeting()
            .expect_err("line too long");
        match err {
            SmtpVerifyError::Protocol(message) => {
                assert!(message.contains("longer than 512 bytes"), "{message}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.finish();
    }

    #[test]
    fn reply_line_of_exactly_512_bytes_is_read() {
        let text = "x".repeat(MAX_REPLY_LINE - "220 \r\n".len());
        let server = MockServer::spawn_with_greeting(format!("220 {text}\r\n"), vec![]);
        let reply = open(server.port(), Duration::from_secs(2))
            .read_greeting()
            .expect("greeting");
        assert_eq!(reply.code, 220);
        assert_eq!(reply.message, text);
        server.finish();
    }

    #[test]
    fn command_with_line_break_is_never_written() {
        let server = MockServer::spawn_then_hangup(vec![]);
        let mut session = open(server.port(), Duration::from_secs(2));
        session.read_greeting().expect("greeting");

        for command in ["RCPT TO:<u@example.com>\rRSET", "NOOP\nQUIT", "HELO x\r\n"] {
            let err = session.send_command(command).expect_err("line break");
            assert!(matches!(err, SmtpVerifyError::Protocol(_)), "{err:?}");
        }
        drop(session);
        server.finish();
    }
}
