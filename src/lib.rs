#![forbid(unsafe_code)]
//! mailverify — vérification d'adresses e-mail par lot: syntaxe, MX, sonde SMTP
//! (`HELO` / `MAIL FROM` / `RCPT TO`) sans envoi de message.

pub mod mx;
pub mod smtp_verify;
pub mod validator;
pub mod verifier;

pub use mx::{Error as MxError, LookupMx, MxRecord, MxStatus};
pub use smtp_verify::{
    RecipientProbe, SmtpCommand, SmtpProbeOptions, SmtpProber, SmtpReply, SmtpVerifyError,
};
pub use validator::{
    EmailError, NormalizedEmail, ValidationMode, ValidationReport, normalize_email,
    split_address, validate_email,
};
pub use verifier::{
    BatchError, BatchSummary, Outcome, SyntaxPolicy, Verifier, VerifierConfig, run_batch,
    run_files,
};
