//! DNS MX resolution.
//!
//! [`build_resolver`] reads the system resolver configuration and applies the
//! query timeout; [`resolve_with`] runs the lookup through any [`LookupMx`]
//! implementation and returns a [`MxStatus`].

mod error;
mod resolver;
mod types;

pub use error::MxError as Error;
pub use resolver::{LookupMx, build_resolver, normalize_domain, resolve_with};
pub use types::{MxRecord, MxStatus};
