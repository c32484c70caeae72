use crate::model::{Filing, InlineDocument, InlinePackage};
use crate::rule::{Rule, RuleFault, RuleFinding};
use finproof_types::{Ref, Severity, ids};
use serde_json::json;
use std::collections::BTreeSet;

/// External references listed per document.
pub const MAX_LISTED_REFERENCES: usize = 20;

const PRIMARY_FALLBACK: &str = "primary_document";

fn package(filing: &Filing) -> Option<&InlinePackage> {
    filing.ixbrl.as_ref().filter(|p| !p.is_empty())
}

fn is_html_filename(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    lowered.ends_with(".htm") || lowered.ends_with(".html")
}

/// Primary document followed by attachments, each with its display name.
fn documents(pkg: &InlinePackage) -> Vec<(String, &InlineDocument)> {
    let mut docs = Vec::new();
    if let Some(primary) = &pkg.primary_document {
        docs.push((primary.display_name(PRIMARY_FALLBACK), primary));
    }
    for (idx, attachment) in pkg.attachments.iter().enumerate() {
        let fallback = format!("attachment-{}", idx + 1);
        docs.push((attachment.display_name(&fallback), attachment));
    }
    docs
}

fn sorted_unique(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub struct MetadataPresence;

impl Rule for MetadataPresence {
    fn code(&self) -> &'static str {
        ids::RULE_IXBRL_METADATA_PRESENCE
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Inline gating needs primary document and attachment metadata."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        if package(filing).is_some() {
            return Ok(Vec::new());
        }
        Ok(vec![RuleFinding::new(
            ids::KIND_MISSING_INLINE_PACKAGE,
            self.default_severity(),
            "filing has no ixbrl metadata",
        )])
    }
}

pub struct PrimaryDocumentConstraints;

impl Rule for PrimaryDocumentConstraints {
    fn code(&self) -> &'static str {
        ids::RULE_IXBRL_PRIMARY_DOCUMENT
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "The primary document is inline HTML with an ix:header."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let Some(pkg) = package(filing) else {
            return Ok(Vec::new());
        };
        let severity = self.default_severity();
        let Some(primary) = &pkg.primary_document else {
            return Ok(vec![RuleFinding::new(
                ids::KIND_PRIMARY_DOCUMENT_INVALID,
                severity,
                "ixbrl metadata has no primary_document",
            )]);
        };

        let name = primary.display_name(PRIMARY_FALLBACK);
        let doc_ref = || Ref::Document(name.clone());
        let mut out = Vec::new();
        if !is_html_filename(&name) {
            out.push(
                RuleFinding::new(
                    ids::KIND_PRIMARY_DOCUMENT_INVALID,
                    severity,
                    format!("primary document {name} must use a .htm or .html extension"),
                )
                .with_ref(doc_ref()),
            );
        }
        if primary.is_inline_xbrl != Some(true) {
            out.push(
                RuleFinding::new(
                    ids::KIND_PRIMARY_DOCUMENT_INVALID,
                    severity,
                    format!("primary document {name} is not marked as inline XBRL"),
                )
                .with_ref(doc_ref()),
            );
        }
        if primary.contains_ix_header == Some(false) {
            out.push(
                RuleFinding::new(
                    ids::KIND_PRIMARY_DOCUMENT_INVALID,
                    severity,
                    format!("primary document {name} has no ix:header"),
                )
                .with_ref(doc_ref()),
            );
        }
        Ok(out)
    }
}

pub struct AttachmentHtml;

impl Rule for AttachmentHtml {
    fn code(&self) -> &'static str {
        ids::RULE_IXBRL_ATTACHMENT_HTML
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Inline attachments are uniquely named HTML documents."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let Some(pkg) = package(filing) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        let mut seen = BTreeSet::new();
        for (idx, attachment) in pkg.attachments.iter().enumerate() {
            let name = attachment.display_name(&format!("attachment-{}", idx + 1));
            if !seen.insert(name.to_ascii_lowercase()) {
                out.push(
                    RuleFinding::new(
                        ids::KIND_ATTACHMENT_INVALID,
                        self.default_severity(),
                        format!("attachment filename {name} is used more than once"),
                    )
                    .with_ref(Ref::Document(name.clone())),
                );
            }
            if attachment.is_inline_xbrl == Some(true) && !is_html_filename(&name) {
                out.push(
                    RuleFinding::new(
                        ids::KIND_ATTACHMENT_INVALID,
                        self.default_severity(),
                        format!("inline attachment {name} must use a .htm or .html extension"),
                    )
                    .with_ref(Ref::Document(name)),
                );
            }
        }
        Ok(out)
    }
}

pub struct DisallowedHtml;

impl Rule for DisallowedHtml {
    fn code(&self) -> &'static str {
        ids::RULE_IXBRL_DISALLOWED_HTML
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "No active or disallowed HTML content."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let Some(pkg) = package(filing) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        if !pkg.disallowed_html_tags.is_empty() {
            out.push(
                RuleFinding::new(
                    ids::KIND_DISALLOWED_HTML,
                    self.default_severity(),
                    "inline package contains disallowed HTML tags",
                )
                .with_data(json!({ "tags": sorted_unique(&pkg.disallowed_html_tags) })),
            );
        }
        for (name, doc) in documents(pkg) {
            if doc.disallowed_html_tags.is_empty() {
                continue;
            }
            out.push(
                RuleFinding::new(
                    ids::KIND_DISALLOWED_HTML,
                    self.default_severity(),
                    format!("{name} contains disallowed HTML tags"),
                )
                .with_ref(Ref::Document(name.clone()))
                .with_data(json!({ "tags": sorted_unique(&doc.disallowed_html_tags) })),
            );
        }
        Ok(out)
    }
}

pub struct ExternalReferences;

fn listed_references(refs: &[String]) -> Vec<&str> {
    refs.iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .take(MAX_LISTED_REFERENCES)
        .collect()
}

impl Rule for ExternalReferences {
    fn code(&self) -> &'static str {
        ids::RULE_IXBRL_EXTERNAL_REFERENCES
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "No references to resources outside the submission."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let Some(pkg) = package(filing) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        let package_refs = listed_references(&pkg.external_references);
        if !package_refs.is_empty() {
            out.push(
                RuleFinding::new(
                    ids::KIND_EXTERNAL_REFERENCE,
                    self.default_severity(),
                    "inline package references external resources",
                )
                .with_data(json!({ "references": package_refs })),
            );
        }
        for (name, doc) in documents(pkg) {
            let refs = listed_references(&doc.external_references);
            if refs.is_empty() {
                continue;
            }
            out.push(
                RuleFinding::new(
                    ids::KIND_EXTERNAL_REFERENCE,
                    self.default_severity(),
                    format!("{name} references external resources"),
                )
                .with_ref(Ref::Document(name.clone()))
                .with_data(json!({ "references": refs })),
            );
        }
        Ok(out)
    }
}

pub struct SuspensionRisk;

impl Rule for SuspensionRisk {
    fn code(&self) -> &'static str {
        ids::RULE_IXBRL_SUSPENSION_RISK
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Inline validation errors put the submission at risk of suspension."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let Some(pkg) = package(filing) else {
            return Ok(Vec::new());
        };
        let affected: Vec<(String, usize)> = documents(pkg)
            .into_iter()
            .filter(|(_, doc)| !doc.xbrl_errors.is_empty())
            .map(|(name, doc)| (name, doc.xbrl_errors.len()))
            .collect();
        if affected.is_empty() {
            return Ok(Vec::new());
        }

        let details: Vec<_> = affected
            .iter()
            .map(|(name, count)| json!({ "document": name, "error_count": count }))
            .collect();
        Ok(vec![
            RuleFinding::new(
                ids::KIND_SUSPENSION_RISK,
                self.default_severity(),
                format!(
                    "inline validation errors in {} document(s); submission may be suspended",
                    affected.len()
                ),
            )
            .with_refs(affected.iter().map(|(name, _)| Ref::Document(name.clone())))
            .with_data(json!({ "affected_documents": details })),
        ])
    }
}
