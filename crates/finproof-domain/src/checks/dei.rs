use crate::model::Filing;
use crate::rule::{Rule, RuleFault, RuleFinding};
use finproof_types::{Ref, Severity, ids};
use serde_json::json;
use std::collections::BTreeSet;

const DOCUMENT_TYPE: &str = "dei:DocumentType";
const REGISTRANT_NAME: &str = "dei:EntityRegistrantName";
const CENTRAL_INDEX_KEY: &str = "dei:EntityCentralIndexKey";

pub const REQUIRED_CONCEPTS: &[&str] = &[DOCUMENT_TYPE, REGISTRANT_NAME, CENTRAL_INDEX_KEY];

pub struct RequiredConcepts;

impl Rule for RequiredConcepts {
    fn code(&self) -> &'static str {
        ids::RULE_DEI_REQUIRED_CONCEPTS
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Document type, registrant name and CIK must be reported."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let present: BTreeSet<&str> = filing.facts.iter().map(|f| f.concept.as_str()).collect();
        Ok(REQUIRED_CONCEPTS
            .iter()
            .filter(|c| !present.contains(**c))
            .map(|concept| {
                RuleFinding::new(
                    ids::KIND_MISSING_REQUIRED_CONCEPT,
                    self.default_severity(),
                    format!("required concept {concept} is not reported"),
                )
                .with_ref(Ref::Concept(concept.to_string()))
            })
            .collect())
    }
}

pub struct MetadataConsistency;

fn text_values(filing: &Filing, concept: &str) -> Vec<String> {
    filing
        .facts_for_concept(concept)
        .filter_map(|f| f.text_value())
        .map(|v| v.trim().to_string())
        .collect()
}

impl Rule for MetadataConsistency {
    fn code(&self) -> &'static str {
        ids::RULE_DEI_METADATA_CONSISTENCY
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Filing header CIK and entity name match the DEI facts."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let mut out = Vec::new();

        let header_cik = filing.cik.as_deref().unwrap_or("").trim();
        let normalized_cik = header_cik.trim_start_matches('0');
        let ciks = text_values(filing, CENTRAL_INDEX_KEY);
        if !normalized_cik.is_empty()
            && ciks
                .iter()
                .any(|v| v.trim_start_matches('0') != normalized_cik)
        {
            let distinct: BTreeSet<&str> = ciks.iter().map(String::as_str).collect();
            out.push(
                RuleFinding::new(
                    ids::KIND_ISSUER_ID_MISMATCH,
                    Severity::Error,
                    format!("filing CIK {header_cik} does not match the reported {CENTRAL_INDEX_KEY}"),
                )
                .with_ref(Ref::Concept(CENTRAL_INDEX_KEY.to_string()))
                .with_data(json!({ "filing_cik": header_cik, "dei_values": distinct })),
            );
        }

        let header_entity = filing.entity.as_deref().unwrap_or("").trim();
        let names = text_values(filing, REGISTRANT_NAME);
        if !header_entity.is_empty()
            && names
                .iter()
                .any(|v| v.to_lowercase() != header_entity.to_lowercase())
        {
            let distinct: BTreeSet<&str> = names.iter().map(String::as_str).collect();
            out.push(
                RuleFinding::new(
                    ids::KIND_ENTITY_NAME_MISMATCH,
                    Severity::Warning,
                    format!("filing entity '{header_entity}' differs from the reported {REGISTRANT_NAME}"),
                )
                .with_ref(Ref::Concept(REGISTRANT_NAME.to_string()))
                .with_data(json!({ "filing_entity": header_entity, "dei_values": distinct })),
            );
        }

        Ok(out)
    }
}
