//! The `verify-certificate` use case.

use crate::exit::{EXIT_CLEAN, EXIT_MISMATCH};
use anyhow::Context;
use finproof_evidence::{Keyring, Verification, verify_certificate};
use finproof_types::Certificate;
use serde::Serialize;

/// Printable outcome of a verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub result: &'static str,
    pub key_id: String,
    pub filing_hash: String,
}

impl VerificationReport {
    pub fn exit_code(&self) -> i32 {
        if self.result == Verification::Valid.as_str() {
            EXIT_CLEAN
        } else {
            EXIT_MISMATCH
        }
    }
}

pub fn parse_certificate(text: &str) -> anyhow::Result<Certificate> {
    serde_json::from_str(text).context("parse certificate")
}

pub fn run_verify_certificate(cert: &Certificate, keyring: &Keyring) -> VerificationReport {
    let verification = verify_certificate(cert, keyring);
    VerificationReport {
        result: verification.as_str(),
        key_id: cert.key_id.clone(),
        filing_hash: cert.filing_hash.clone(),
    }
}
