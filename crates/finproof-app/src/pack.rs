//! The `pack` use case: validate, certify when clean, and write the evidence pack.

use crate::validate::Validator;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use finproof_domain::{Filing, RunOutput};
use finproof_evidence::{CertificateSigner, EvidencePack, build_pack};
use finproof_types::Status;
use time::OffsetDateTime;
use tracing::info;

#[derive(Debug)]
pub struct PackOutput {
    pub run: RunOutput,
    pub pack: EvidencePack,
    /// Files written, in name order.
    pub written: Vec<Utf8PathBuf>,
}

impl PackOutput {
    pub fn certified(&self) -> bool {
        self.pack
            .artifacts
            .contains_key(finproof_evidence::CERTIFICATE_FILE)
    }
}

/// Assemble the pack for `run`, certifying it when it is clean and a signer is available.
pub fn build_evidence(
    run: &RunOutput,
    signer: Option<&CertificateSigner>,
    issued_at: OffsetDateTime,
) -> anyhow::Result<EvidencePack> {
    let certificate = match signer {
        Some(signer) if run.report.status == Status::Clean => {
            Some(signer.issue(&run.report, issued_at).context("issue certificate")?)
        }
        _ => None,
    };
    build_pack(run, certificate.as_ref()).context("assemble evidence pack")
}

/// Write every file of `pack` into `out_dir`, creating it if needed.
pub fn write_pack(out_dir: &Utf8Path, pack: &EvidencePack) -> anyhow::Result<Vec<Utf8PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create directory: {out_dir}"))?;
    let mut written = Vec::new();
    for (name, bytes) in pack.files() {
        let path = out_dir.join(name);
        std::fs::write(&path, bytes).with_context(|| format!("write artifact: {path}"))?;
        written.push(path);
    }
    Ok(written)
}

/// Validate `filing` and write its evidence pack.
///
/// Fatal engine errors return before anything touches `out_dir`.
pub fn run_pack(
    validator: &Validator,
    filing: &Filing,
    out_dir: &Utf8Path,
    signer: Option<&CertificateSigner>,
    issued_at: OffsetDateTime,
) -> anyhow::Result<PackOutput> {
    let run = validator.validate(filing)?;
    let pack = build_evidence(&run, signer, issued_at)?;
    let written = write_pack(out_dir, &pack)?;
    info!(
        out_dir = %out_dir,
        files = written.len(),
        status = run.report.status.as_str(),
        "evidence pack written"
    );
    Ok(PackOutput { run, pack, written })
}
