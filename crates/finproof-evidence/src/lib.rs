//! Evidence for finproof runs: the artifact pack, HMAC certificates over clean
//! verdicts, and proof bundles that can be replayed against the filing.
//!
//! Nothing here touches the filesystem or the clock; callers pass in `issued_at`
//! and write the pack themselves.

#![forbid(unsafe_code)]

mod certificate;
mod pack;
mod proof;

pub use certificate::{
    CertificateError, CertificateSigner, Keyring, Verification, canonical_payload,
    issue_certificate, verify_certificate,
};
pub use pack::{
    CERTIFICATE_FILE, EvidencePack, MANIFEST_FILE, PROOF_BUNDLE_FILE, PackError, REPORT_FILE,
    SUMMARY_FILE, TRACE_FILE, build_pack,
};
pub use proof::{bundle_matches_filing, proof_bundle, replay};

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
