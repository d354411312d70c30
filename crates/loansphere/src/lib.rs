//! Loan approval prediction service.
//!
//! The [`prediction`] module owns the encoding, feature assembly, and inference contract;
//! [`config`], [`telemetry`], and [`error`] carry the service plumbing shared with the
//! API binary.

pub mod config;
pub mod error;
pub mod prediction;
pub mod telemetry;
