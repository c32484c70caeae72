//! HMAC-SHA256 certificates over clean verdicts.
//!
//! The signed bytes are the compact JSON of every certificate field except `signature`,
//! in declaration order.

use finproof_types::{Certificate, Report, SCHEMA_CERTIFICATE_V1, Status};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::fmt;
use subtle::ConstantTimeEq;
use time::OffsetDateTime;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    #[error("certificates are only issued for clean reports (status: {})", .status.as_str())]
    NotClean { status: Status },

    #[error("signing secret is empty")]
    EmptySecret,

    #[error("signing key has an invalid length")]
    InvalidKeyLength,

    #[error("failed to canonicalize certificate payload: {0}")]
    Canonicalize(#[from] serde_json::Error),
}

/// Outcome of checking a certificate's signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verification {
    Valid,
    InvalidSignature,
    UnknownKey,
}

impl Verification {
    pub fn as_str(self) -> &'static str {
        match self {
            Verification::Valid => "valid",
            Verification::InvalidSignature => "invalid-signature",
            Verification::UnknownKey => "unknown-key",
        }
    }

    pub fn is_valid(self) -> bool {
        self == Verification::Valid
    }
}

#[derive(Serialize)]
struct SignedPayload<'a> {
    schema: &'a str,
    filing_hash: &'a str,
    profile: &'a str,
    rule_set_version: &'a str,
    #[serde(with = "time::serde::rfc3339")]
    issued_at: OffsetDateTime,
    status: Status,
    key_id: &'a str,
}

impl<'a> SignedPayload<'a> {
    fn of(cert: &'a Certificate) -> Self {
        Self {
            schema: &cert.schema,
            filing_hash: &cert.filing_hash,
            profile: &cert.profile,
            rule_set_version: &cert.rule_set_version,
            issued_at: cert.issued_at,
            status: cert.status,
            key_id: &cert.key_id,
        }
    }
}

/// Canonical bytes covered by a certificate's signature.
pub fn canonical_payload(cert: &Certificate) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&SignedPayload::of(cert))
}

fn mac(secret: &[u8], bytes: &[u8]) -> Result<Vec<u8>, CertificateError> {
    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|_| CertificateError::InvalidKeyLength)?;
    mac.update(bytes);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Operator-held signing key. The secret never appears in `Debug` output.
#[derive(Clone)]
pub struct CertificateSigner {
    key_id: String,
    secret: Vec<u8>,
}

impl fmt::Debug for CertificateSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateSigner")
            .field("key_id", &self.key_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl CertificateSigner {
    pub fn new(key_id: impl Into<String>, secret: impl Into<Vec<u8>>) -> Result<Self, CertificateError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(CertificateError::EmptySecret);
        }
        Ok(Self {
            key_id: key_id.into(),
            secret,
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Issue a certificate for `report`.
    ///
    /// Refuses any report whose status is not clean. `issued_at` is truncated to whole
    /// seconds so the RFC 3339 form is stable.
    pub fn issue(
        &self,
        report: &Report,
        issued_at: OffsetDateTime,
    ) -> Result<Certificate, CertificateError> {
        if report.status != Status::Clean {
            warn!(status = report.status.as_str(), "certificate refused");
            return Err(CertificateError::NotClean {
                status: report.status,
            });
        }

        let mut cert = Certificate {
            schema: SCHEMA_CERTIFICATE_V1.to_string(),
            filing_hash: report.filing_hash.clone(),
            profile: report.profile.clone(),
            rule_set_version: report.rule_set_version.clone(),
            issued_at: issued_at.replace_nanosecond(0).unwrap_or(issued_at),
            status: Status::Clean,
            key_id: self.key_id.clone(),
            signature: String::new(),
        };
        let tag = mac(&self.secret, &canonical_payload(&cert)?)?;
        cert.signature = hex::encode(tag);
        debug!(key_id = %self.key_id, filing_hash = %cert.filing_hash, "certificate issued");
        Ok(cert)
    }
}

/// Issue a certificate for `report` with `signer`.
pub fn issue_certificate(
    report: &Report,
    signer: &CertificateSigner,
    issued_at: OffsetDateTime,
) -> Result<Certificate, CertificateError> {
    signer.issue(report, issued_at)
}

/// Secrets by key id, used for verification.
#[derive(Clone, Default)]
pub struct Keyring {
    keys: BTreeMap<String, Vec<u8>>,
}

impl fmt::Debug for Keyring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyring")
            .field("key_ids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Keyring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        key_id: impl Into<String>,
        secret: impl Into<Vec<u8>>,
    ) -> Result<(), CertificateError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(CertificateError::EmptySecret);
        }
        self.keys.insert(key_id.into(), secret);
        Ok(())
    }

    pub fn with_key(
        mut self,
        key_id: impl Into<String>,
        secret: impl Into<Vec<u8>>,
    ) -> Result<Self, CertificateError> {
        self.insert(key_id, secret)?;
        Ok(self)
    }

    pub fn contains(&self, key_id: &str) -> bool {
        self.keys.contains_key(key_id)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Recompute the signature of `cert` and compare it in constant time.
    pub fn verify(&self, cert: &Certificate) -> Verification {
        let Some(secret) = self.keys.get(&cert.key_id) else {
            return Verification::UnknownKey;
        };
        let Ok(provided) = hex::decode(cert.signature.trim()) else {
            return Verification::InvalidSignature;
        };
        let Ok(payload) = canonical_payload(cert) else {
            return Verification::InvalidSignature;
        };
        let Ok(expected) = mac(secret, &payload) else {
            return Verification::InvalidSignature;
        };
        if bool::from(expected.ct_eq(&provided)) {
            Verification::Valid
        } else {
            Verification::InvalidSignature
        }
    }
}

pub fn verify_certificate(cert: &Certificate, keyring: &Keyring) -> Verification {
    keyring.verify(cert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finproof_types::{FindingCounts, SCHEMA_REPORT_V1};
    use time::macros::datetime;

    fn report(status: Status) -> Report {
        Report {
            schema: SCHEMA_REPORT_V1.to_string(),
            filing_hash: "sha256:00ff".to_string(),
            profile: "fsd-consistency".to_string(),
            rule_set_version: "2026.1".to_string(),
            status,
            counts: FindingCounts::default(),
            findings: Vec::new(),
        }
    }

    fn signer() -> CertificateSigner {
        CertificateSigner::new("ops-2026-01", b"correct horse battery staple".to_vec()).unwrap()
    }

    const ISSUED: OffsetDateTime = datetime!(2026-01-15 10:30:00.123 UTC);

    #[test]
    fn issues_only_for_clean_reports() {
        assert!(signer().issue(&report(Status::Clean), ISSUED).is_ok());
        for status in [Status::Review, Status::Risk] {
            let err = signer().issue(&report(status), ISSUED).unwrap_err();
            assert!(matches!(err, CertificateError::NotClean { status: s } if s == status));
        }
    }

    #[test]
    fn certificate_carries_report_identity() {
        let cert = issue_certificate(&report(Status::Clean), &signer(), ISSUED).unwrap();
        assert_eq!(cert.schema, SCHEMA_CERTIFICATE_V1);
        assert_eq!(cert.filing_hash, "sha256:00ff");
        assert_eq!(cert.status, Status::Clean);
        assert_eq!(cert.key_id, "ops-2026-01");
        assert_eq!(cert.issued_at, datetime!(2026-01-15 10:30:00 UTC));
        assert_eq!(cert.signature.len(), 64);
    }

    #[test]
    fn signing_is_deterministic_for_fixed_time() {
        let a = signer().issue(&report(Status::Clean), ISSUED).unwrap();
        let b = signer().issue(&report(Status::Clean), ISSUED).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn round_trip_verifies() {
        let cert = signer().issue(&report(Status::Clean), ISSUED).unwrap();
        let ring = Keyring::new()
            .with_key("ops-2026-01", b"correct horse battery staple".to_vec())
            .unwrap();
        assert_eq!(ring.verify(&cert), Verification::Valid);

        let json = serde_json::to_string(&cert).unwrap();
        let parsed: Certificate = serde_json::from_str(&json).unwrap();
        assert_eq!(verify_certificate(&parsed, &ring), Verification::Valid);
    }

    #[test]
    fn wrong_secret_or_unknown_key_fail() {
        let cert = signer().issue(&report(Status::Clean), ISSUED).unwrap();
        let other = Keyring::new()
            .with_key("ops-2026-01", b"another secret".to_vec())
            .unwrap();
        assert_eq!(other.verify(&cert), Verification::InvalidSignature);

        let unrelated = Keyring::new().with_key("ops-2025-12", b"x".to_vec()).unwrap();
        assert_eq!(unrelated.verify(&cert), Verification::UnknownKey);
    }

    #[test]
    fn any_tampered_field_invalidates_the_signature() {
        let ring = Keyring::new()
            .with_key("ops-2026-01", b"correct horse battery staple".to_vec())
            .unwrap();
        let cert = signer().issue(&report(Status::Clean), ISSUED).unwrap();

        let mut tampered = cert.clone();
        tampered.filing_hash = "sha256:0000".to_string();
        assert_eq!(ring.verify(&tampered), Verification::InvalidSignature);

        let mut tampered = cert.clone();
        tampered.status = Status::Risk;
        assert_eq!(ring.verify(&tampered), Verification::InvalidSignature);

        let mut tampered = cert.clone();
        tampered.signature = "not hex".to_string();
        assert_eq!(ring.verify(&tampered), Verification::InvalidSignature);

        let mut tampered = cert;
        tampered.issued_at = datetime!(2026-01-15 10:30:01 UTC);
        assert_eq!(ring.verify(&tampered), Verification::InvalidSignature);
    }

    #[test]
    fn empty_secrets_are_rejected() {
        assert!(matches!(
            CertificateSigner::new("k", Vec::new()),
            Err(CertificateError::EmptySecret)
        ));
        assert!(matches!(
            Keyring::new().with_key("k", Vec::new()),
            Err(CertificateError::EmptySecret)
        ));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let dbg = format!("{:?}", signer());
        assert!(!dbg.contains("horse"));
        assert!(dbg.contains("<redacted>"));
    }
}
