use trust_dns_resolver::Resolver;

use crate::mx::{self, LookupMx};
use crate::smtp_verify::{RecipientProbe, SmtpCommand, SmtpProber, SmtpVerifyError};
use crate::validator::{NormalizedEmail, ValidationMode, normalize_email};

use super::config::{SyntaxPolicy, VerifierConfig};
use super::outcome::Outcome;

/// Per-address pipeline: syntax → MX lookup → SMTP probe.
///
/// Generic over its DNS and SMTP sides so both can be replaced in tests.
#[derive(Debug)]
pub struct Verifier<R, P> {
    resolver: R,
    prober: P,
    mode: ValidationMode,
    policy: SyntaxPolicy,
}

impl Verifier<Resolver, SmtpProber> {
    /// System resolver with the configured DNS timeout, real SMTP prober.
    pub fn from_config(config: &VerifierConfig) -> Result<Self, mx::Error> {
        let resolver = mx::build_resolver(Some(config.dns_timeout))?;
        let prober = SmtpProber::new(config.smtp.clone());
        tracing::debug!(
            helo = prober.helo(),
            mail_from = %prober.options().mail_from,
            port = prober.options().port,
            "verifier ready"
        );
        Ok(Self::new(
            resolver,
            prober,
            config.validation_mode,
            config.syntax_policy,
        ))
    }
}

impl<R, P> Verifier<R, P>
where
    R: LookupMx,
    P: RecipientProbe,
{
    pub fn new(resolver: R, prober: P, mode: ValidationMode, policy: SyntaxPolicy) -> Self {
        Self {
            resolver,
            prober,
            mode,
            policy,
        }
    }

    pub fn policy(&self) -> SyntaxPolicy {
        self.policy
    }

    /// Run every check on `address` (trimmed first). Never fails: each
    /// failure is one of the [`Outcome`] variants.
    pub fn verify(&self, address: &str) -> Outcome {
        let address = address.trim();

        let normalized = match normalize_email(address, self.mode) {
            Ok(normalized) => normalized,
            Err(err) => {
                return Outcome::MalformedAddress {
                    reason: err.to_string(),
                };
            }
        };

        if normalized.valid {
            tracing::debug!(address, "syntax validated");
        } else {
            match self.policy {
                SyntaxPolicy::Enforce => {
                    return Outcome::SyntaxInvalid {
                        reasons: normalized.reasons,
                    };
                }
                SyntaxPolicy::LogOnly => tracing::info!(
                    address,
                    reasons = %normalized.reasons.join("; "),
                    "syntax not validated, checking anyway"
                ),
            }
        }

        let exchange = match self.primary_exchange(&normalized) {
            Ok(exchange) => exchange,
            Err(outcome) => return outcome,
        };

        self.probe(address, exchange)
    }

    fn primary_exchange(&self, normalized: &NormalizedEmail) -> Result<String, Outcome> {
        let domain = if normalized.ascii_domain.is_empty() {
            mx::normalize_domain(&normalized.domain).map_err(|err| Outcome::DomainUnresolvable {
                domain: normalized.domain.clone(),
                reason: err.to_string(),
            })?
        } else {
            normalized.ascii_domain.clone()
        };

        let unresolvable = |reason: String| Outcome::DomainUnresolvable {
            domain: domain.clone(),
            reason,
        };

        let status = mx::resolve_with(&self.resolver, &domain)
            .map_err(|err| unresolvable(err.to_string()))?;
        match status.primary() {
            Some(primary) => {
                tracing::debug!(%domain, mx = %primary, "MX resolved");
                Ok(primary.exchange.clone())
            }
            None => Err(unresolvable("no MX records".to_string())),
        }
    }

    fn probe(&self, address: &str, exchange: String) -> Outcome {
        match self.prober.probe(&exchange, address) {
            Ok(reply) if reply.code == 250 => Outcome::Accepted { exchange, reply },
            Ok(reply) => Outcome::SmtpRejected {
                exchange,
                command: SmtpCommand::RcptTo,
                reply,
            },
            Err(SmtpVerifyError::CommandRejected { command, reply }) => Outcome::SmtpRejected {
                exchange,
                command,
                reply,
            },
            Err(err) => Outcome::SmtpUnreachable {
                exchange,
                reason: err.to_string(),
            },
        }
    }
}
