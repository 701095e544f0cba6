//! Scripted loopback SMTP server for tests.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub(crate) type Script = Vec<(&'static str, &'static str)>;

const GREETING: &str = "220 mock.smtp.test ESMTP\r\n";

pub(crate) struct MockServer {
    port: u16,
    handle: thread::JoinHandle<()>,
    release: mpsc::Sender<()>,
}

impl MockServer {
    /// One session: greeting, then `(expected command prefix, reply)` pairs.
    pub(crate) fn spawn(script: Script) -> Self {
        Self::spawn_sessions(GREETING, vec![script])
    }

    pub(crate) fn spawn_with_greeting(greeting: impl Into<String>, script: Script) -> Self {
        Self::spawn_sessions(greeting, vec![script])
    }

    /// Accepts one connection per script, in order.
    pub(crate) fn spawn_sessions(greeting: impl Into<String>, scripts: Vec<Script>) -> Self {
        let greeting = greeting.into();
        Self::start(move |listener, _release| {
            for script in scripts {
                let (mut stream, _) = listener.accept().expect("accept");
                handle_session(&mut stream, &greeting, script).expect("mock session");
            }
        })
    }

    /// Like [`spawn`](Self::spawn), then asserts the client hangs up without
    /// sending any further line.
    pub(crate) fn spawn_then_hangup(script: Script) -> Self {
        Self::start(move |listener, _release| {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut reader = handle_session(&mut stream, GREETING, script).expect("mock session");
            let mut extra = String::new();
            reader.read_line(&mut extra).ok();
            assert!(extra.is_empty(), "unexpected line after script: '{extra}'");
        })
    }

    /// Sends `chunk` every `interval` and never a line end, until the client
    /// goes away or [`finish`](Self::finish) is called.
    pub(crate) fn spawn_drip(chunk: &'static [u8], interval: Duration) -> Self {
        Self::start(move |listener, release| {
            let (mut stream, _) = listener.accept().expect("accept");
            while let Err(mpsc::RecvTimeoutError::Timeout) = release.recv_timeout(interval) {
                if stream.write_all(chunk).and_then(|()| stream.flush()).is_err() {
                    break;
                }
            }
        })
    }

    /// Accepts a connection and never answers until [`finish`](Self::finish).
    pub(crate) fn spawn_silent() -> Self {
        Self::start(|listener, release| {
            let (_stream, _) = listener.accept().expect("accept");
            release.recv().ok();
        })
    }

    fn start<F>(serve: F) -> Self
    where
        F: FnOnce(TcpListener, mpsc::Receiver<()>) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let port = listener.local_addr().expect("addr").port();
        let (release, release_rx) = mpsc::channel();
        let handle = thread::spawn(move || serve(listener, release_rx));
        Self {
            port,
            handle,
            release,
        }
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    /// Release a silent server and propagate assertion failures of the
    /// server thread.
    pub(crate) fn finish(self) {
        self.release.send(()).ok();
        self.handle.join().expect("mock server thread");
    }
}

fn handle_session(
    stream: &mut TcpStream,
    greeting: &str,
    script: Script,
) -> io::Result<BufReader<TcpStream>> {
    let mut reader = BufReader::new(stream.try_clone()?);
    stream.write_all(greeting.as_bytes())?;
    stream.flush()?;
    for (expected, response) in script {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        assert!(
            line.starts_with(expected),
            "expected command starting with '{expected}', got '{line}'"
        );
        stream.write_all(response.as_bytes())?;
        stream.flush()?;
    }
    Ok(reader)
}

/// A loopback port with nothing listening on it.
pub(crate) fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("addr").port()
}
