use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use mailverify::smtp_verify::{DEFAULT_MAIL_FROM, DEFAULT_SMTP_PORT, DEFAULT_TIMEOUT_MS};
use mailverify::verifier::DEFAULT_DNS_TIMEOUT;
use mailverify::{SmtpProbeOptions, SyntaxPolicy, ValidationMode, VerifierConfig};

/// Vérifie un lot d'adresses (syntaxe, MX, RCPT TO) et écrit celles
/// acceptées dans le fichier de sortie.
#[derive(Parser, Debug)]
#[command(name = "mailverify-cli", version)]
pub struct Cli {
    /// Print more debugging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// fichier texte d'adresses à traiter (une par ligne)
    #[arg(long)]
    pub inputfile: PathBuf,

    /// fichier recevant les adresses vérifiées (créé ou tronqué)
    #[arg(long)]
    pub outputfile: PathBuf,

    /// enveloppe MAIL FROM
    #[arg(long, default_value = DEFAULT_MAIL_FROM)]
    pub sender: String,

    /// nom utilisé pour HELO (par défaut le hostname local)
    #[arg(long)]
    pub helo: Option<String>,

    /// port SMTP du serveur MX
    #[arg(long, default_value_t = DEFAULT_SMTP_PORT)]
    pub port: u16,

    /// timeout connexion + commande SMTP (ms, 0 = aucun)
    #[arg(long = "timeout-ms", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// timeout des requêtes DNS (ms)
    #[arg(long = "dns-timeout-ms", default_value_t = DEFAULT_DNS_TIMEOUT.as_millis() as u64)]
    pub dns_timeout_ms: u64,

    /// mode: strict|relaxed
    #[arg(long, default_value = "strict")]
    pub mode: String,

    /// syntaxe invalide: enforce (ignore l'adresse) | log-only (continue)
    #[arg(long = "syntax-policy", default_value = "enforce")]
    pub syntax_policy: String,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn verifier_config(&self) -> Result<VerifierConfig> {
        let validation_mode: ValidationMode =
            self.mode.parse().context("invalid --mode")?;
        let syntax_policy: SyntaxPolicy = self
            .syntax_policy
            .parse()
            .context("invalid --syntax-policy")?;
        if self.dns_timeout_ms == 0 {
            bail!("--dns-timeout-ms must be greater than 0");
        }

        Ok(VerifierConfig {
            validation_mode,
            syntax_policy,
            smtp: SmtpProbeOptions {
                helo_name: self.helo.clone().unwrap_or_default(),
                mail_from: self.sender.clone(),
                port: self.port,
                timeout_ms: self.timeout_ms,
            },
            dns_timeout: Duration::from_millis(self.dns_timeout_ms),
        })
    }
}
