mod args;
mod logging;

use anyhow::{Context, Result};
use mailverify::{Verifier, run_files};

use args::Cli;
use logging::LogConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = LogConfig::new(cli.verbose);
    tracing::subscriber::with_default(log.subscriber(), || run(&cli, &log))
}

fn run(cli: &Cli, log: &LogConfig) -> Result<()> {
    log.announce();

    let config = cli.verifier_config()?;
    tracing::debug!(?config, "configuration");

    let verifier = Verifier::from_config(&config).context("DNS resolver setup failed")?;
    let summary = run_files(&verifier, &cli.inputfile, &cli.outputfile).with_context(|| {
        format!(
            "verification of {} into {} failed",
            cli.inputfile.display(),
            cli.outputfile.display()
        )
    })?;

    tracing::info!(
        accepted = summary.accepted,
        processed = summary.processed,
        "done, verified addresses written to {}",
        cli.outputfile.display()
    );
    Ok(())
}
