use std::io::IsTerminal;

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

/// Log settings of one run. The subscriber it builds is installed by the
/// caller for the duration of the run only.
#[derive(Debug, Clone, Copy)]
pub struct LogConfig {
    pub verbose: bool,
}

impl LogConfig {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    fn default_directives(&self) -> String {
        let level = self.level().as_str().to_ascii_lowercase();
        format!("mailverify={level},mailverify_cli={level},warn")
    }

    /// `RUST_LOG` wins when set.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directives()))
    }

    /// Stderr subscriber for the run, colored only on a terminal.
    pub fn subscriber(self) -> impl Subscriber + Send + Sync {
        let ansi = std::io::stderr().is_terminal();
        self.subscriber_with(self.filter(), std::io::stderr, ansi)
    }

    /// DEBUG records also carry target, file and line.
    fn subscriber_with<W>(
        self,
        filter: EnvFilter,
        writer: W,
        ansi: bool,
    ) -> impl Subscriber + Send + Sync
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(self.verbose)
                .with_file(self.verbose)
                .with_line_number(self.verbose),
        )
    }

    /// First lines of every run.
    pub fn announce(&self) {
        tracing::info!("Logging level: {}", self.level());
        tracing::info!("Starting application...");
    }
}
