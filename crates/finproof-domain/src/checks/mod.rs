//! Built-in rule catalog.

use crate::arithmetic::TolerancePolicy;
use crate::rule::Rule;

mod accounting;
mod dei;
mod facts;
mod inline;
mod taxonomy;


pub use accounting::{AssetsNegative, BalanceSheetEquation, ConceptPeriodType};
pub use dei::{MetadataConsistency, REQUIRED_CONCEPTS, RequiredConcepts};
pub use facts::{
    DecimalsFormat, DimensionContextConsistency, DuplicateFactConflict, NumericFactUnit,
    UnitConsistency,
};
pub use inline::{
    AttachmentHtml, DisallowedHtml, ExternalReferences, MAX_LISTED_REFERENCES,
    MetadataPresence as InlineMetadataPresence, PrimaryDocumentConstraints, SuspensionRisk,
};
pub use taxonomy::{
    CustomConceptCoverage, LABEL_MAX_LEN, LabelConstraints,
    MetadataPresence as TaxonomyMetadataPresence, NamespacePrefixConsistency,
    RESERVED_STANDARD_PREFIXES, RelationshipCycles, RelationshipTargetExists,
};

/// Every built-in rule, in catalog order.
///
/// `tolerance` is the rounding policy of the balance sheet equation.
pub fn builtin_rules(tolerance: TolerancePolicy) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NumericFactUnit),
        Box::new(DecimalsFormat),
        Box::new(DuplicateFactConflict),
        Box::new(UnitConsistency),
        Box::new(DimensionContextConsistency),
        Box::new(RequiredConcepts),
        Box::new(MetadataConsistency),
        Box::new(BalanceSheetEquation { tolerance }),
        Box::new(AssetsNegative),
        Box::new(ConceptPeriodType),
        Box::new(TaxonomyMetadataPresence),
        Box::new(NamespacePrefixConsistency),
        Box::new(LabelConstraints),
        Box::new(RelationshipTargetExists),
        Box::new(RelationshipCycles),
        Box::new(CustomConceptCoverage),
        Box::new(InlineMetadataPresence),
        Box::new(PrimaryDocumentConstraints),
        Box::new(AttachmentHtml),
        Box::new(DisallowedHtml),
        Box::new(ExternalReferences),
        Box::new(SuspensionRisk),
    ]
}
