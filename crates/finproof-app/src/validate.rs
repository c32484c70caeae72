//! The `validate` use case: run the configured profile against filings.

use finproof_domain::{
    Engine, EngineError, Filing, RuleRegistry, RunOutput, SchemaError, SchemaViolation,
};
use finproof_settings::ResolvedConfig;
use rayon::prelude::*;
use tracing::info;

/// Parse a canonical filing document.
///
/// A document that is not valid filing JSON is a schema error like any other
/// structural problem, so it maps to the same exit code.
pub fn parse_filing(text: &str) -> Result<Filing, EngineError> {
    Filing::from_json(text).map_err(|err| {
        EngineError::Schema(SchemaError {
            violations: vec![SchemaViolation {
                location: format!("line {} column {}", err.line(), err.column()),
                message: format!("invalid filing document: {err}"),
            }],
        })
    })
}

/// Resolved configuration plus the registry built from it.
///
/// Immutable once built; a single validator serves any number of runs, in parallel.
#[derive(Debug)]
pub struct Validator {
    config: ResolvedConfig,
    registry: RuleRegistry,
}

impl Validator {
    pub fn new(config: ResolvedConfig) -> anyhow::Result<Self> {
        let registry = config.registry()?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn engine(&self) -> Engine<'_> {
        Engine::new(&self.registry).with_time_budget(self.config.time_budget)
    }

    /// Run the configured profile against `filing`.
    pub fn validate(&self, filing: &Filing) -> Result<RunOutput, EngineError> {
        self.engine().run(filing, &self.config.profile)
    }

    /// Validate independent filings in parallel.
    ///
    /// Results are in input order and each equals what [`Validator::validate`]
    /// returns for that filing alone.
    pub fn validate_batch(&self, filings: &[Filing]) -> Vec<Result<RunOutput, EngineError>> {
        info!(filings = filings.len(), profile = %self.config.profile, "batch validation");
        filings.par_iter().map(|filing| self.validate(filing)).collect()
    }

    /// Parse and validate raw filing documents in parallel, in input order.
    pub fn validate_documents(&self, documents: &[String]) -> Vec<Result<RunOutput, EngineError>> {
        info!(filings = documents.len(), profile = %self.config.profile, "batch validation");
        documents
            .par_iter()
            .map(|doc| parse_filing(doc).and_then(|filing| self.validate(&filing)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_config;
    use finproof_settings::Overrides;
    use finproof_types::Status;

    const CLEAN: &str = r#"{
        "cik": "0000320193",
        "entity": "Example Corp",
        "contexts": {
            "d2025": { "period_type": "duration", "start_date": "2025-01-01", "end_date": "2025-12-31" },
            "i2025": { "period_type": "instant", "instant": "2025-12-31" }
        },
        "facts": [
            { "concept": "dei:DocumentType", "context_id": "d2025", "value": "10-K" },
            { "concept": "dei:EntityRegistrantName", "context_id": "d2025", "value": "Example Corp" },
            { "concept": "dei:EntityCentralIndexKey", "context_id": "d2025", "value": "320193" },
            { "concept": "us-gaap:Assets", "context_id": "i2025", "value": 1000, "unit": "USD", "decimals": 0 },
            { "concept": "us-gaap:Liabilities", "context_id": "i2025", "value": 600, "unit": "USD", "decimals": 0 },
            { "concept": "us-gaap:StockholdersEquity", "context_id": "i2025", "value": 400, "unit": "USD", "decimals": 0 }
        ]
    }"#;

    fn validator(overrides: Overrides) -> Validator {
        Validator::new(load_config("", overrides).unwrap()).unwrap()
    }

    #[test]
    fn clean_filing_is_clean() {
        let filing = parse_filing(CLEAN).unwrap();
        let run = validator(Overrides::default()).validate(&filing).unwrap();
        assert_eq!(run.report.status, Status::Clean);
        assert_eq!(run.report.profile, "fsd-consistency");
        assert_eq!(run.report.rule_set_version, "2026.1");
        assert_eq!(run.trace.len(), run.report.counts.rules_executed as usize);
    }

    #[test]
    fn unparseable_filing_is_a_schema_error() {
        let err = parse_filing("{ not json").unwrap_err();
        assert_eq!(err.exit_code(), 10);
        let EngineError::Schema(schema) = err else {
            panic!("expected schema error");
        };
        assert!(schema.violations[0].location.starts_with("line 1"));
    }

    #[test]
    fn unknown_profile_is_fatal() {
        let filing = parse_filing(CLEAN).unwrap();
        let err = validator(Overrides {
            profile: Some("nope".to_string()),
            ..Overrides::default()
        })
        .validate(&filing)
        .unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn batch_matches_sequential_runs() {
        let clean = parse_filing(CLEAN).unwrap();
        let mut risky = clean.clone();
        for fact in &mut risky.facts {
            if fact.concept == "us-gaap:Assets" {
                fact.value = Some(finproof_domain::model::FactValue::Number(
                    serde_json::Number::from(-1000),
                ));
            }
        }
        let mut broken = clean.clone();
        broken.facts[0].context_id = "missing".to_string();

        let v = validator(Overrides::default());
        let filings = vec![clean.clone(), risky.clone(), broken, clean, risky];
        let batch = v.validate_batch(&filings);

        assert_eq!(batch.len(), filings.len());
        for (filing, result) in filings.iter().zip(&batch) {
            match (v.validate(filing), result) {
                (Ok(a), Ok(b)) => assert_eq!(&a, b),
                (Err(a), Err(b)) => assert_eq!(a.exit_code(), b.exit_code()),
                _ => panic!("batch and sequential runs disagree"),
            }
        }
        assert_eq!(batch[1].as_ref().unwrap().report.status, Status::Risk);
        assert!(batch[2].is_err());
    }

    #[test]
    fn documents_that_do_not_parse_fail_alone() {
        let v = validator(Overrides::default());
        let docs = vec![CLEAN.to_string(), "nope".to_string(), CLEAN.to_string()];
        let results = v.validate_documents(&docs);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().exit_code(), 10);
        assert_eq!(results[0].as_ref().unwrap(), results[2].as_ref().unwrap());
    }
}
