//! Stable identifiers for rules and finding kinds.
//!
//! `rule code` is a dotted namespace. `kind` is a short snake_case discriminator.

// Rules: fact integrity
pub const RULE_XBRL_NUMERIC_FACT_UNIT: &str = "xbrl.numeric_fact_unit";
pub const RULE_XBRL_DECIMALS_FORMAT: &str = "xbrl.decimals_format";
pub const RULE_XBRL_DUPLICATE_FACT_CONFLICT: &str = "xbrl.duplicate_fact_conflict";
pub const RULE_XBRL_UNIT_CONSISTENCY: &str = "xbrl.unit_consistency";
pub const RULE_XBRL_DIMENSION_CONTEXT_CONSISTENCY: &str = "xbrl.dimension_context_consistency";

// Rules: document and entity information
pub const RULE_DEI_REQUIRED_CONCEPTS: &str = "dei.required_concepts";
pub const RULE_DEI_METADATA_CONSISTENCY: &str = "dei.metadata_consistency";

// Rules: accounting consistency
pub const RULE_ACCT_BALANCE_SHEET_EQUATION: &str = "acct.balance_sheet_equation";
pub const RULE_ACCT_ASSETS_NEGATIVE: &str = "acct.assets_negative";
pub const RULE_ACCT_CONCEPT_PERIOD_TYPE: &str = "acct.concept_period_type_heuristic";

// Rules: taxonomy package
pub const RULE_TAXONOMY_METADATA_PRESENCE: &str = "taxonomy.metadata_presence";
pub const RULE_TAXONOMY_NAMESPACE_PREFIX: &str = "taxonomy.namespace_prefix_consistency";
pub const RULE_TAXONOMY_LABEL_CONSTRAINTS: &str = "taxonomy.label_constraints";
pub const RULE_TAXONOMY_RELATIONSHIP_TARGET: &str = "taxonomy.relationship_target_exists";
pub const RULE_TAXONOMY_RELATIONSHIP_CYCLES: &str = "taxonomy.relationship_cycles";
pub const RULE_TAXONOMY_CUSTOM_COVERAGE: &str = "taxonomy.custom_concept_relationship_coverage";

// Rules: inline markup package
pub const RULE_IXBRL_METADATA_PRESENCE: &str = "ixbrl.inline_metadata_presence";
pub const RULE_IXBRL_PRIMARY_DOCUMENT: &str = "ixbrl.primary_document_constraints";
pub const RULE_IXBRL_ATTACHMENT_HTML: &str = "ixbrl.inline_attachment_html";
pub const RULE_IXBRL_DISALLOWED_HTML: &str = "ixbrl.disallowed_html";
pub const RULE_IXBRL_EXTERNAL_REFERENCES: &str = "ixbrl.external_reference_constraints";
pub const RULE_IXBRL_SUSPENSION_RISK: &str = "ixbrl.submission_suspension_risk";

// Kinds: xbrl.*
pub const KIND_MISSING_UNIT: &str = "missing_unit";
pub const KIND_INVALID_DECIMALS: &str = "invalid_decimals";
pub const KIND_DUPLICATE_CONFLICT: &str = "duplicate_conflict";
pub const KIND_UNIT_MISMATCH: &str = "unit_mismatch";
pub const KIND_DIMENSION_CONFLICT: &str = "dimension_conflict";

// Kinds: dei.*
pub const KIND_MISSING_REQUIRED_CONCEPT: &str = "missing_required_concept";
pub const KIND_ISSUER_ID_MISMATCH: &str = "issuer_id_mismatch";
pub const KIND_ENTITY_NAME_MISMATCH: &str = "entity_name_mismatch";

// Kinds: acct.*
pub const KIND_EQUATION_IMBALANCE: &str = "equation_imbalance";
pub const KIND_INSUFFICIENT_COVERAGE: &str = "insufficient_coverage";
pub const KIND_NEGATIVE_VALUE: &str = "negative_value";
pub const KIND_PERIOD_TYPE_MISMATCH: &str = "period_type_mismatch";

// Kinds: taxonomy.*
pub const KIND_MISSING_TAXONOMY_PACKAGE: &str = "missing_taxonomy_package";
pub const KIND_INVALID_PREFIX: &str = "invalid_prefix";
pub const KIND_MISSING_NAMESPACE_URI: &str = "missing_namespace_uri";
pub const KIND_PREFIX_CONFLICT: &str = "prefix_conflict";
pub const KIND_URI_ALIASED: &str = "uri_aliased";
pub const KIND_RESERVED_PREFIX: &str = "reserved_prefix";
pub const KIND_MISSING_LABEL: &str = "missing_label";
pub const KIND_LABEL_UNKNOWN_CONCEPT: &str = "label_unknown_concept";
pub const KIND_EMPTY_LABEL: &str = "empty_label";
pub const KIND_LABEL_TOO_LONG: &str = "label_too_long";
pub const KIND_RELATIONSHIP_TARGET_MISSING: &str = "relationship_target_missing";
pub const KIND_CALCULATION_CYCLE: &str = "calculation_cycle";
pub const KIND_PRESENTATION_CYCLE: &str = "presentation_cycle";
pub const KIND_RELATIONSHIP_CYCLE: &str = "relationship_cycle";
pub const KIND_ISOLATED_CUSTOM_CONCEPT: &str = "isolated_custom_concept";

// Kinds: ixbrl.*
pub const KIND_MISSING_INLINE_PACKAGE: &str = "missing_inline_package";
pub const KIND_PRIMARY_DOCUMENT_INVALID: &str = "primary_document_invalid";
pub const KIND_ATTACHMENT_INVALID: &str = "attachment_invalid";
pub const KIND_DISALLOWED_HTML: &str = "disallowed_html";
pub const KIND_EXTERNAL_REFERENCE: &str = "external_reference";
pub const KIND_SUSPENSION_RISK: &str = "suspension_risk";

