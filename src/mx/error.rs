use thiserror::Error;
use trust_dns_resolver::error::ResolveError;

/// DNS side failures. Every variant that concerns one domain names it, so the
/// message alone is enough for the skip log.
#[derive(Debug, Error)]
pub enum MxError {
    #[error("cannot convert domain '{domain}' to ASCII")]
    IdnaConversion {
        domain: String,
        #[source]
        source: idna::Errors,
    },
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("MX lookup for {domain} failed: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: ResolveError,
    },
}

impl MxError {
    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    /// The domain the failure is about, if any.
    pub fn domain(&self) -> Option<&str> {
        match self {
            Self::IdnaConversion { domain, .. } | Self::Lookup { domain, .. } => Some(domain.as_str()),
            Self::ResolverInit { .. } => None,
        }
    }
}
