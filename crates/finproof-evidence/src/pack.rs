//! Evidence pack assembly.
//!
//! Assembly is pure: the same run (and certificate) always yields byte-identical
//! artifacts, manifest included. Writing the pack to disk is the caller's job.

use crate::proof::proof_bundle;
use finproof_domain::{RunOutput, sha256_hex};
use finproof_render::{render_markdown, render_trace_jsonl};
use finproof_types::{Certificate, Manifest, SCHEMA_MANIFEST_V1, Status};
use serde::Serialize;
use std::collections::BTreeMap;

pub const REPORT_FILE: &str = "report.json";
pub const TRACE_FILE: &str = "trace.jsonl";
pub const SUMMARY_FILE: &str = "summary.md";
pub const PROOF_BUNDLE_FILE: &str = "proof_bundle.json";
pub const CERTIFICATE_FILE: &str = "certificate.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("failed to serialize {artifact}: {source}")]
    Serialize {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("certificate does not belong to this run ({field} differs)")]
    CertificateMismatch { field: &'static str },

    #[error("a certificate cannot accompany a {} report", .0.as_str())]
    NotClean(Status),
}

/// Artifacts of one run, keyed by file name, plus the manifest over them.
#[derive(Clone, Debug, PartialEq)]
pub struct EvidencePack {
    pub artifacts: BTreeMap<&'static str, Vec<u8>>,
    pub manifest: Manifest,
    manifest_bytes: Vec<u8>,
}

impl EvidencePack {
    /// Every file of the pack in name order, the manifest included.
    pub fn files(&self) -> Vec<(&'static str, &[u8])> {
        let mut files: Vec<(&'static str, &[u8])> = self
            .artifacts
            .iter()
            .map(|(name, bytes)| (*name, bytes.as_slice()))
            .collect();
        files.push((MANIFEST_FILE, self.manifest_bytes.as_slice()));
        files.sort_by_key(|(name, _)| *name);
        files
    }

    pub fn manifest_bytes(&self) -> &[u8] {
        &self.manifest_bytes
    }
}

fn pretty<T: Serialize>(artifact: &'static str, value: &T) -> Result<Vec<u8>, PackError> {
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|source| PackError::Serialize { artifact, source })?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn check_certificate(run: &RunOutput, cert: &Certificate) -> Result<(), PackError> {
    let report = &run.report;
    if report.status != Status::Clean {
        return Err(PackError::NotClean(report.status));
    }
    let checks = [
        ("filing_hash", cert.filing_hash == report.filing_hash),
        ("profile", cert.profile == report.profile),
        ("rule_set_version", cert.rule_set_version == report.rule_set_version),
    ];
    for (field, same) in checks {
        if !same {
            return Err(PackError::CertificateMismatch { field });
        }
    }
    Ok(())
}

/// Assemble the evidence pack for `run`.
///
/// `certificate` is only accepted for a clean run and must carry the run's identity.
pub fn build_pack(run: &RunOutput, certificate: Option<&Certificate>) -> Result<EvidencePack, PackError> {
    let mut artifacts: BTreeMap<&'static str, Vec<u8>> = BTreeMap::new();

    artifacts.insert(REPORT_FILE, pretty(REPORT_FILE, &run.report)?);
    let trace = render_trace_jsonl(&run.trace).map_err(|source| PackError::Serialize {
        artifact: TRACE_FILE,
        source,
    })?;
    artifacts.insert(TRACE_FILE, trace.into_bytes());
    artifacts.insert(
        SUMMARY_FILE,
        render_markdown(&run.report, &run.trace).into_bytes(),
    );
    artifacts.insert(PROOF_BUNDLE_FILE, pretty(PROOF_BUNDLE_FILE, &proof_bundle(run))?);
    if let Some(cert) = certificate {
        check_certificate(run, cert)?;
        artifacts.insert(CERTIFICATE_FILE, pretty(CERTIFICATE_FILE, cert)?);
    }

    let manifest = Manifest {
        schema: SCHEMA_MANIFEST_V1.to_string(),
        filing_hash: run.report.filing_hash.clone(),
        artifacts: artifacts
            .iter()
            .map(|(name, bytes)| (name.to_string(), sha256_hex(bytes)))
            .collect(),
    };
    let manifest_bytes = pretty(MANIFEST_FILE, &manifest)?;

    Ok(EvidencePack {
        artifacts,
        manifest,
        manifest_bytes,
    })
}
