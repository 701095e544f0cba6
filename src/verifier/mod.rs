//! Per-address verification pipeline and the batch runner built on it.
//!
//! [`Verifier::verify`] turns one input line into an [`Outcome`];
//! [`run_batch`] / [`run_files`] apply it to a whole input stream and keep
//! the accepted addresses.

mod batch;
mod config;
mod outcome;
mod pipeline;

pub use batch::{BatchError, BatchSummary, run_batch, run_files};
pub use config::{DEFAULT_DNS_TIMEOUT, SyntaxPolicy, VerifierConfig};
pub use outcome::Outcome;
pub use pipeline::Verifier;
