//! Use case orchestration for finproof.
//!
//! This crate provides the application layer: use cases that coordinate the settings, domain and
//! evidence layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod config;
mod exit;
mod explain;
mod pack;
mod replay;
mod rulebook;
mod validate;
mod verify;

pub use config::{keyring_from_env, load_config, signer_from_env};
pub use exit::{
    EXIT_CLEAN, EXIT_MISMATCH, EXIT_REVIEW, EXIT_RISK, EXIT_USAGE, describe_error, error_exit_code,
    error_kind, status_exit_code,
};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use pack::{PackOutput, build_evidence, run_pack, write_pack};
pub use replay::{parse_bundle, replay_exit_code, run_replay};
pub use rulebook::run_rulebook;
pub use validate::{Validator, parse_filing};
pub use verify::{VerificationReport, parse_certificate, run_verify_certificate};
