use std::time::Duration;

use trust_dns_resolver::Resolver;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::system_conf::read_system_conf;

use super::{Error, MxRecord, MxStatus};

/// Build a blocking resolver from the system configuration. `timeout`
/// overrides the per-query timeout when set.
pub fn build_resolver(timeout: Option<Duration>) -> Result<Resolver, Error> {
    let (config, mut opts) = read_system_conf().map_err(Error::resolver_init)?;
    if let Some(timeout) = timeout {
        opts.timeout = timeout;
    }
    Resolver::new(config, opts).map_err(Error::resolver_init)
}

/// Lookup MX records for an already ASCII domain through `resolver`.
///
/// An empty answer (including NXDOMAIN) is [`MxStatus::NoRecords`]; every
/// other resolver failure is an error. An empty name is never queried.
pub fn resolve_with<R>(resolver: &R, ascii_domain: &str) -> Result<MxStatus, Error>
where
    R: LookupMx + ?Sized,
{
    if ascii_domain.is_empty() {
        return Ok(MxStatus::NoRecords);
    }

    let mut records = match resolver.lookup_mx(ascii_domain) {
        Ok(records) => records,
        Err(err) if matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
            tracing::debug!(domain = ascii_domain, "no MX records found");
            Vec::new()
        }
        Err(source) => {
            return Err(Error::Lookup {
                domain: ascii_domain.to_string(),
                source,
            });
        }
    };

    records.sort();
    records.dedup();
    tracing::debug!(domain = ascii_domain, count = records.len(), "MX lookup done");

    if records.is_empty() {
        Ok(MxStatus::NoRecords)
    } else {
        Ok(MxStatus::Records(records))
    }
}

/// IDNA-encode `domain` (trimmed) for the DNS query.
pub fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim();
    idna::domain_to_ascii(trimmed).map_err(|source| Error::IdnaConversion {
        domain: trimmed.to_string(),
        source,
    })
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

/// Source of MX answers. Implemented for the real resolver; tests plug in a
/// stub.
pub trait LookupMx {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError>;
}

impl LookupMx for Resolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        let lookup = Resolver::mx_lookup(self, domain)?;
        Ok(lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
            .collect())
    }
}
