//! Explain registry for rules and finding kinds.
//!
//! Maps rule codes and finding kinds to human-readable explanations with remediation guidance.
//! The machine-readable rulebook is built from the same entries.

use crate::ids;

/// Explanation entry for a rule or finding kind.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule/kind.
    pub title: &'static str,
    /// What the rule checks and why it exists.
    pub description: &'static str,
    /// How to resolve findings.
    pub remediation: &'static str,
    /// Before/after filing fragments.
    pub examples: ExamplePair,
}

/// Before and after filing fragments.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Fragment that would trigger a finding.
    pub before: &'static str,
    /// Fragment that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule code or finding kind.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Rule codes
        ids::RULE_XBRL_NUMERIC_FACT_UNIT => Some(explain_numeric_fact_unit()),
        ids::RULE_XBRL_DECIMALS_FORMAT => Some(explain_decimals_format()),
        ids::RULE_XBRL_DUPLICATE_FACT_CONFLICT => Some(explain_duplicate_fact_conflict()),
        ids::RULE_XBRL_UNIT_CONSISTENCY => Some(explain_unit_consistency()),
        ids::RULE_XBRL_DIMENSION_CONTEXT_CONSISTENCY => Some(explain_dimension_consistency()),
        ids::RULE_DEI_REQUIRED_CONCEPTS => Some(explain_dei_required()),
        ids::RULE_DEI_METADATA_CONSISTENCY => Some(explain_dei_consistency()),
        ids::RULE_ACCT_BALANCE_SHEET_EQUATION => Some(explain_balance_sheet_equation()),
        ids::RULE_ACCT_ASSETS_NEGATIVE => Some(explain_assets_negative()),
        ids::RULE_ACCT_CONCEPT_PERIOD_TYPE => Some(explain_period_type_heuristic()),
        ids::RULE_TAXONOMY_METADATA_PRESENCE => Some(explain_taxonomy_presence()),
        ids::RULE_TAXONOMY_NAMESPACE_PREFIX => Some(explain_namespace_prefix()),
        ids::RULE_TAXONOMY_LABEL_CONSTRAINTS => Some(explain_label_constraints()),
        ids::RULE_TAXONOMY_RELATIONSHIP_TARGET => Some(explain_relationship_target()),
        ids::RULE_TAXONOMY_RELATIONSHIP_CYCLES => Some(explain_relationship_cycles()),
        ids::RULE_TAXONOMY_CUSTOM_COVERAGE => Some(explain_custom_coverage()),
        ids::RULE_IXBRL_METADATA_PRESENCE => Some(explain_inline_presence()),
        ids::RULE_IXBRL_PRIMARY_DOCUMENT => Some(explain_primary_document()),
        ids::RULE_IXBRL_ATTACHMENT_HTML => Some(explain_attachment_html()),
        ids::RULE_IXBRL_DISALLOWED_HTML => Some(explain_disallowed_html()),
        ids::RULE_IXBRL_EXTERNAL_REFERENCES => Some(explain_external_references()),
        ids::RULE_IXBRL_SUSPENSION_RISK => Some(explain_suspension_risk()),

        // Finding kinds
        ids::KIND_MISSING_UNIT => Some(kind("Numeric fact without unit", explain_numeric_fact_unit)),
        ids::KIND_INVALID_DECIMALS => Some(kind("Invalid decimals token", explain_decimals_format)),
        ids::KIND_DUPLICATE_CONFLICT => Some(kind(
            "Conflicting duplicate facts",
            explain_duplicate_fact_conflict,
        )),
        ids::KIND_UNIT_MISMATCH => Some(kind("Mixed units", explain_unit_consistency)),
        ids::KIND_DIMENSION_CONFLICT => Some(kind(
            "Fact dimension contradicts context",
            explain_dimension_consistency,
        )),
        ids::KIND_MISSING_REQUIRED_CONCEPT => {
            Some(kind("Missing required DEI concept", explain_dei_required))
        }
        ids::KIND_ISSUER_ID_MISMATCH => Some(kind("Issuer id mismatch", explain_dei_consistency)),
        ids::KIND_ENTITY_NAME_MISMATCH => {
            Some(kind("Entity name mismatch", explain_dei_consistency))
        }
        ids::KIND_EQUATION_IMBALANCE => Some(kind(
            "Balance sheet equation imbalance",
            explain_balance_sheet_equation,
        )),
        ids::KIND_INSUFFICIENT_COVERAGE => Some(explain_insufficient_coverage()),
        ids::KIND_NEGATIVE_VALUE => Some(kind("Negative value", explain_assets_negative)),
        ids::KIND_PERIOD_TYPE_MISMATCH => Some(kind(
            "Concept on unexpected period type",
            explain_period_type_heuristic,
        )),
        ids::KIND_MISSING_TAXONOMY_PACKAGE => {
            Some(kind("Missing taxonomy package", explain_taxonomy_presence))
        }
        ids::KIND_INVALID_PREFIX => Some(kind("Malformed namespace prefix", explain_namespace_prefix)),
        ids::KIND_MISSING_NAMESPACE_URI => {
            Some(kind("Namespace without URI", explain_namespace_prefix))
        }
        ids::KIND_PREFIX_CONFLICT => Some(kind(
            "Prefix declared with two URIs",
            explain_namespace_prefix,
        )),
        ids::KIND_URI_ALIASED => Some(kind("URI declared under two prefixes", explain_namespace_prefix)),
        ids::KIND_RESERVED_PREFIX => Some(kind(
            "Reserved prefix marked custom",
            explain_namespace_prefix,
        )),
        ids::KIND_MISSING_LABEL => Some(kind("Custom element without label", explain_label_constraints)),
        ids::KIND_LABEL_UNKNOWN_CONCEPT => {
            Some(kind("Label for undeclared concept", explain_label_constraints))
        }
        ids::KIND_EMPTY_LABEL => Some(kind("Empty label", explain_label_constraints)),
        ids::KIND_LABEL_TOO_LONG => Some(kind("Label too long", explain_label_constraints)),
        ids::KIND_RELATIONSHIP_TARGET_MISSING => Some(kind(
            "Relationship endpoint not declared",
            explain_relationship_target,
        )),
        ids::KIND_CALCULATION_CYCLE => {
            Some(kind("Calculation cycle", explain_relationship_cycles))
        }
        ids::KIND_PRESENTATION_CYCLE => {
            Some(kind("Presentation cycle", explain_relationship_cycles))
        }
        ids::KIND_RELATIONSHIP_CYCLE => {
            Some(kind("Relationship cycle", explain_relationship_cycles))
        }
        ids::KIND_ISOLATED_CUSTOM_CONCEPT => {
            Some(kind("Isolated custom concept", explain_custom_coverage))
        }
        ids::KIND_MISSING_INLINE_PACKAGE => {
            Some(kind("Missing inline package", explain_inline_presence))
        }
        ids::KIND_PRIMARY_DOCUMENT_INVALID => {
            Some(kind("Invalid primary document", explain_primary_document))
        }
        ids::KIND_ATTACHMENT_INVALID => Some(kind("Invalid attachment", explain_attachment_html)),
        ids::KIND_DISALLOWED_HTML => Some(kind("Disallowed HTML", explain_disallowed_html)),
        ids::KIND_EXTERNAL_REFERENCE => {
            Some(kind("External reference", explain_external_references))
        }
        ids::KIND_SUSPENSION_RISK => Some(kind("Suspension risk", explain_suspension_risk)),

        _ => None,
    }
}

/// List all known rule codes in catalog order.
pub fn all_rule_codes() -> &'static [&'static str] {
    &[
        ids::RULE_XBRL_NUMERIC_FACT_UNIT,
        ids::RULE_XBRL_DECIMALS_FORMAT,
        ids::RULE_XBRL_DUPLICATE_FACT_CONFLICT,
        ids::RULE_XBRL_UNIT_CONSISTENCY,
        ids::RULE_XBRL_DIMENSION_CONTEXT_CONSISTENCY,
        ids::RULE_DEI_REQUIRED_CONCEPTS,
        ids::RULE_DEI_METADATA_CONSISTENCY,
        ids::RULE_ACCT_BALANCE_SHEET_EQUATION,
        ids::RULE_ACCT_ASSETS_NEGATIVE,
        ids::RULE_ACCT_CONCEPT_PERIOD_TYPE,
        ids::RULE_TAXONOMY_METADATA_PRESENCE,
        ids::RULE_TAXONOMY_NAMESPACE_PREFIX,
        ids::RULE_TAXONOMY_LABEL_CONSTRAINTS,
        ids::RULE_TAXONOMY_RELATIONSHIP_TARGET,
        ids::RULE_TAXONOMY_RELATIONSHIP_CYCLES,
        ids::RULE_TAXONOMY_CUSTOM_COVERAGE,
        ids::RULE_IXBRL_METADATA_PRESENCE,
        ids::RULE_IXBRL_PRIMARY_DOCUMENT,
        ids::RULE_IXBRL_ATTACHMENT_HTML,
        ids::RULE_IXBRL_DISALLOWED_HTML,
        ids::RULE_IXBRL_EXTERNAL_REFERENCES,
        ids::RULE_IXBRL_SUSPENSION_RISK,
    ]
}

/// List all known finding kinds.
pub fn all_kinds() -> &'static [&'static str] {
    &[
        ids::KIND_MISSING_UNIT,
        ids::KIND_INVALID_DECIMALS,
        ids::KIND_DUPLICATE_CONFLICT,
        ids::KIND_UNIT_MISMATCH,
        ids::KIND_DIMENSION_CONFLICT,
        ids::KIND_MISSING_REQUIRED_CONCEPT,
        ids::KIND_ISSUER_ID_MISMATCH,
        ids::KIND_ENTITY_NAME_MISMATCH,
        ids::KIND_EQUATION_IMBALANCE,
        ids::KIND_INSUFFICIENT_COVERAGE,
        ids::KIND_NEGATIVE_VALUE,
        ids::KIND_PERIOD_TYPE_MISMATCH,
        ids::KIND_MISSING_TAXONOMY_PACKAGE,
        ids::KIND_INVALID_PREFIX,
        ids::KIND_MISSING_NAMESPACE_URI,
        ids::KIND_PREFIX_CONFLICT,
        ids::KIND_URI_ALIASED,
        ids::KIND_RESERVED_PREFIX,
        ids::KIND_MISSING_LABEL,
        ids::KIND_LABEL_UNKNOWN_CONCEPT,
        ids::KIND_EMPTY_LABEL,
        ids::KIND_LABEL_TOO_LONG,
        ids::KIND_RELATIONSHIP_TARGET_MISSING,
        ids::KIND_CALCULATION_CYCLE,
        ids::KIND_PRESENTATION_CYCLE,
        ids::KIND_RELATIONSHIP_CYCLE,
        ids::KIND_ISOLATED_CUSTOM_CONCEPT,
        ids::KIND_MISSING_INLINE_PACKAGE,
        ids::KIND_PRIMARY_DOCUMENT_INVALID,
        ids::KIND_ATTACHMENT_INVALID,
        ids::KIND_DISALLOWED_HTML,
        ids::KIND_EXTERNAL_REFERENCE,
        ids::KIND_SUSPENSION_RISK,
    ]
}

fn kind(title: &'static str, rule: fn() -> Explanation) -> Explanation {
    let mut exp = rule();
    exp.title = title;
    exp
}

// --- Fact integrity ---

fn explain_numeric_fact_unit() -> Explanation {
    Explanation {
        title: "Numeric Facts Declare a Unit",
        description: "\
Detects numeric facts that carry no unit reference.

A number without a unit cannot be compared, summed or reconciled: 1000 could be
dollars, thousands of dollars or shares. Downstream arithmetic rules skip such facts,
so a missing unit silently weakens every other check.",
        remediation: "\
Attach the unit the value is reported in (e.g. `USD`, `shares`, `USD/shares`).",
        examples: ExamplePair {
            before: r#"{"concept": "us-gaap:Assets", "context_id": "c-2025", "value": 1000}"#,
            after: r#"{"concept": "us-gaap:Assets", "context_id": "c-2025", "value": 1000, "unit": "USD", "decimals": 0}"#,
        },
    }
}

fn explain_decimals_format() -> Explanation {
    Explanation {
        title: "Decimals Are an Integer or INF",
        description: "\
Detects numeric facts whose `decimals` attribute is neither an integer nor `INF`.

Decimals define the rounding precision of a reported value and therefore the
tolerance used by arithmetic consistency rules. An unparseable token leaves the
precision undefined.",
        remediation: "\
Use an integer (`-3` for thousands, `0` for units, `2` for cents) or `INF` for exact values.",
        examples: ExamplePair {
            before: r#"{"concept": "us-gaap:Assets", "value": 1000, "unit": "USD", "decimals": "thousands"}"#,
            after: r#"{"concept": "us-gaap:Assets", "value": 1000, "unit": "USD", "decimals": -3}"#,
        },
    }
}

fn explain_duplicate_fact_conflict() -> Explanation {
    Explanation {
        title: "Duplicate Facts Agree",
        description: "\
Detects facts sharing concept, context, unit and dimensions whose values disagree.

Duplicates are allowed when they carry the same value (e.g. a figure repeated in two
tables), but two different values for the same measurement are a contradiction that
a reader cannot resolve. Numeric duplicates agree when they differ by no more than
the sum of both facts' half units (0.5 x 10^-decimals each).",
        remediation: "\
Reconcile the source tables so every occurrence reports the same value, or tag one of
them against a different context or dimension if they measure different things.",
        examples: ExamplePair {
            before: r#"[{"concept": "us-gaap:Revenues", "context_id": "fy", "value": 500, "unit": "USD", "decimals": 0},
 {"concept": "us-gaap:Revenues", "context_id": "fy", "value": 520, "unit": "USD", "decimals": 0}]"#,
            after: r#"[{"concept": "us-gaap:Revenues", "context_id": "fy", "value": 500, "unit": "USD", "decimals": 0},
 {"concept": "us-gaap:Revenues", "context_id": "fy", "value": 500, "unit": "USD", "decimals": 0}]"#,
        },
    }
}

fn explain_unit_consistency() -> Explanation {
    Explanation {
        title: "One Unit per Measurement",
        description: "\
Detects numeric facts for the same concept, context and dimensions reported in more
than one unit.

Mixed units for a single measurement usually mean a currency or scale was tagged
inconsistently between tables.",
        remediation: "\
Report every occurrence of the measurement in the same unit.",
        examples: ExamplePair {
            before: r#"[{"concept": "us-gaap:Assets", "context_id": "i", "value": 10, "unit": "USD"},
 {"concept": "us-gaap:Assets", "context_id": "i", "value": 9, "unit": "EUR"}]"#,
            after: r#"[{"concept": "us-gaap:Assets", "context_id": "i", "value": 10, "unit": "USD"}]"#,
        },
    }
}

fn explain_dimension_consistency() -> Explanation {
    Explanation {
        title: "Fact Dimensions Match Context",
        description: "\
Detects facts whose own dimension members contradict the members declared by the
context they reference.

A fact that claims `srt:ConsolidatedEntitiesAxis=ParentCompany` inside a context
scoped to a subsidiary describes two different reporting entities at once.",
        remediation: "\
Move the fact to a context whose dimensions match, or drop the conflicting member.",
        examples: ExamplePair {
            before: r#"{"contexts": {"c1": {"period_type": "instant", "instant": "2025-12-31",
  "dimensions": {"srt:SegmentAxis": "East"}}},
 "facts": [{"concept": "us-gaap:Assets", "context_id": "c1", "dimensions": {"srt:SegmentAxis": "West"}}]}"#,
            after: r#"{"facts": [{"concept": "us-gaap:Assets", "context_id": "c1", "dimensions": {"srt:SegmentAxis": "East"}}]}"#,
        },
    }
}

// --- Document and entity information ---

fn explain_dei_required() -> Explanation {
    Explanation {
        title: "Required DEI Concepts Present",
        description: "\
Requires `dei:DocumentType`, `dei:EntityRegistrantName` and `dei:EntityCentralIndexKey`.

These cover sheet facts identify what the filing is and who filed it. Without them the
filing cannot be routed or matched to its issuer.",
        remediation: "\
Tag the cover page values with the listed DEI concepts.",
        examples: ExamplePair {
            before: r#"{"facts": [{"concept": "dei:DocumentType", "context_id": "fy", "value": "10-K"}]}"#,
            after: r#"{"facts": [
  {"concept": "dei:DocumentType", "context_id": "fy", "value": "10-K"},
  {"concept": "dei:EntityRegistrantName", "context_id": "fy", "value": "Example Corp"},
  {"concept": "dei:EntityCentralIndexKey", "context_id": "fy", "value": "0000123456"}]}"#,
        },
    }
}

fn explain_dei_consistency() -> Explanation {
    Explanation {
        title: "DEI Metadata Matches Filing Header",
        description: "\
Compares the issuer identifier and entity name in the filing header with the DEI facts.

A CIK mismatch (leading zeros ignored) is an error: the filing claims to be from a
different issuer. A name mismatch is a warning, since punctuation and suffix
differences are common and the engine does not guess which spelling is correct.",
        remediation: "\
Align the header and the DEI facts, or correct whichever of the two is wrong.",
        examples: ExamplePair {
            before: r#"{"cik": "123456", "facts": [{"concept": "dei:EntityCentralIndexKey", "value": "0000999999"}]}"#,
            after: r#"{"cik": "123456", "facts": [{"concept": "dei:EntityCentralIndexKey", "value": "0000123456"}]}"#,
        },
    }
}

// --- Accounting ---

fn explain_balance_sheet_equation() -> Explanation {
    Explanation {
        title: "Balance Sheet Equation Holds",
        description: "\
Evaluates Assets = Liabilities + Equity for every instant context that reports the terms.

Values are never compared as raw floating point numbers. The tolerance is derived from
the facts' decimals (half a unit of the coarsest precision by default), and an
imbalance is reported only when the difference exceeds it. A context reporting some
but not all terms produces an `insufficient_coverage` warning instead.",
        remediation: "\
Check the totals in the source statement and the signs and scale of the tagged values.",
        examples: ExamplePair {
            before: r#"Assets=100 (decimals 0), Liabilities=60 (decimals 0), StockholdersEquity=39 (decimals 0)"#,
            after: r#"Assets=100 (decimals 0), Liabilities=60 (decimals 0), StockholdersEquity=40 (decimals 0)"#,
        },
    }
}

fn explain_insufficient_coverage() -> Explanation {
    Explanation {
        title: "Insufficient Equation Coverage",
        description: "\
A context reports some terms of a declared equation but not all of them.

Absence is not contradiction, so the equation is not evaluated. The gap is surfaced as
a warning because a silently skipped check would read as a pass.",
        remediation: "\
Tag the missing terms for the context, or confirm they are intentionally not reported.",
        examples: ExamplePair {
            before: r#"Assets=100, Liabilities=60 (no equity fact)"#,
            after: r#"Assets=100, Liabilities=60, StockholdersEquity=40"#,
        },
    }
}

fn explain_assets_negative() -> Explanation {
    Explanation {
        title: "Assets Are Not Negative",
        description: "\
Flags negative values reported for total assets.

A negative total is almost always a sign error. It is a warning rather than an error
because the engine does not interpret accounting intent.",
        remediation: "\
Verify the sign of the reported value.",
        examples: ExamplePair {
            before: r#"{"concept": "us-gaap:Assets", "value": -100, "unit": "USD"}"#,
            after: r#"{"concept": "us-gaap:Assets", "value": 100, "unit": "USD"}"#,
        },
    }
}

fn explain_period_type_heuristic() -> Explanation {
    Explanation {
        title: "Concept Period Type Heuristic",
        description: "\
Flags stock concepts (assets, liabilities, equity, shares outstanding, cash) reported
on duration contexts and flow concepts (revenue, sales, net income, cash flow,
operating income, earnings per share) reported on instant contexts.

The match is on concept names, so it is a warning: custom concepts may legitimately
break the pattern.",
        remediation: "\
Report balances at an instant and activity over a duration.",
        examples: ExamplePair {
            before: r#"{"concept": "us-gaap:Revenues", "context_id": "i-2025-12-31"}"#,
            after: r#"{"concept": "us-gaap:Revenues", "context_id": "d-2025"}"#,
        },
    }
}

// --- Taxonomy ---

fn explain_taxonomy_presence() -> Explanation {
    Explanation {
        title: "Taxonomy Package Present",
        description: "\
Requires the filing to carry a taxonomy package (namespaces, elements, labels and
relationships) when taxonomy rules are selected.",
        remediation: "\
Include the extension taxonomy in the canonical filing under `taxonomy_package`.",
        examples: ExamplePair {
            before: r#"{"accession": "0000123456-26-000001", "facts": []}"#,
            after: r#"{"accession": "0000123456-26-000001", "facts": [], "taxonomy_package": {"namespaces": [], "elements": []}}"#,
        },
    }
}

fn explain_namespace_prefix() -> Explanation {
    Explanation {
        title: "Namespace Prefixes Are Consistent",
        description: "\
Checks the declared namespaces: prefixes must be well formed, every prefix needs a URI,
one prefix may not map to two URIs, and reserved standard prefixes (us-gaap, dei,
ifrs-full, xbrli, link, xlink, iso4217) may not be declared as custom. One URI under
two prefixes is reported as a warning.",
        remediation: "\
Give each namespace exactly one prefix and URI, and pick a company-specific prefix for
extensions.",
        examples: ExamplePair {
            before: r#"[{"prefix": "abc", "uri": "http://abc.com/2025"}, {"prefix": "abc", "uri": "http://abc.com/2026"}]"#,
            after: r#"[{"prefix": "abc", "uri": "http://abc.com/2026"}]"#,
        },
    }
}

fn explain_label_constraints() -> Explanation {
    Explanation {
        title: "Label Constraints",
        description: "\
Custom elements should carry a label (warning). Labels must reference a declared
concept, must not be empty and must not exceed 511 characters (errors).",
        remediation: "\
Add a standard label for every extension element and remove labels for undeclared concepts.",
        examples: ExamplePair {
            before: r#"{"elements": [{"concept": "abc:Backlog", "is_custom": true}], "labels": []}"#,
            after: r#"{"elements": [{"concept": "abc:Backlog", "is_custom": true}],
 "labels": [{"concept": "abc:Backlog", "text": "Contract backlog"}]}"#,
        },
    }
}

fn explain_relationship_target() -> Explanation {
    Explanation {
        title: "Relationship Endpoints Exist",
        description: "\
Every calculation, presentation or other relationship must connect two declared elements.

A dangling endpoint usually means an element was renamed or removed without updating
its linkbase.",
        remediation: "\
Declare the missing element or remove the relationship.",
        examples: ExamplePair {
            before: r#"{"relationships": [{"from": "abc:Total", "to": "abc:Missing"}]}"#,
            after: r#"{"relationships": [{"from": "abc:Total", "to": "abc:Part"}]}"#,
        },
    }
}

fn explain_relationship_cycles() -> Explanation {
    Explanation {
        title: "Relationship Networks Are Acyclic",
        description: "\
Detects directed cycles in each relationship network (calculation, presentation,
other arcroles).

A cycle makes a calculation circular and a presentation tree unrenderable. Each
distinct cycle is reported once, listing its member concepts in path order.",
        remediation: "\
Break the cycle by removing or redirecting one of its relationships.",
        examples: ExamplePair {
            before: r#"A -> B, B -> C, C -> A"#,
            after: r#"A -> B, B -> C"#,
        },
    }
}

fn explain_custom_coverage() -> Explanation {
    Explanation {
        title: "Custom Concepts Participate in Relationships",
        description: "\
Warns about custom elements that appear in no relationship.

An extension element outside every network is not anchored anywhere in the statements,
which usually means it is unused or was left out of a linkbase.",
        remediation: "\
Place the element in the presentation (and, for numeric items, calculation) network.",
        examples: ExamplePair {
            before: r#"{"elements": [{"concept": "abc:Backlog", "is_custom": true}], "relationships": []}"#,
            after: r#"{"relationships": [{"from": "abc:Revenue", "to": "abc:Backlog", "arcrole": "parent-child"}]}"#,
        },
    }
}

// --- Inline markup ---

fn explain_inline_presence() -> Explanation {
    Explanation {
        title: "Inline Package Present",
        description: "\
Requires inline-markup metadata (primary document and attachments) when inline rules
are selected.",
        remediation: "\
Include the `ixbrl` section in the canonical filing.",
        examples: ExamplePair {
            before: r#"{"accession": "0000123456-26-000001"}"#,
            after: r#"{"ixbrl": {"primary_document": {"filename": "main.htm", "is_inline_xbrl": true}}}"#,
        },
    }
}

fn explain_primary_document() -> Explanation {
    Explanation {
        title: "Primary Document Constraints",
        description: "\
The primary document must be an `.htm`/`.html` inline document containing an
`ix:header` element.",
        remediation: "\
Submit the primary document as inline HTML with the hidden header section.",
        examples: ExamplePair {
            before: r#"{"filename": "main.txt", "is_inline_xbrl": false}"#,
            after: r#"{"filename": "main.htm", "is_inline_xbrl": true, "contains_ix_header": true}"#,
        },
    }
}

fn explain_attachment_html() -> Explanation {
    Explanation {
        title: "Inline Attachments Are HTML",
        description: "\
Attachments flagged as inline documents must use an `.htm`/`.html` filename.",
        remediation: "\
Rename or convert the attachment.",
        examples: ExamplePair {
            before: r#"{"filename": "ex101.pdf", "is_inline_xbrl": true}"#,
            after: r#"{"filename": "ex101.htm", "is_inline_xbrl": true}"#,
        },
    }
}

fn explain_disallowed_html() -> Explanation {
    Explanation {
        title: "No Disallowed HTML",
        description: "\
Flags documents containing HTML elements the submission system rejects
(scripts, frames, embedded objects).",
        remediation: "\
Remove the listed elements from the document.",
        examples: ExamplePair {
            before: r#"{"filename": "main.htm", "disallowed_html_tags": ["script"]}"#,
            after: r#"{"filename": "main.htm", "disallowed_html_tags": []}"#,
        },
    }
}

fn explain_external_references() -> Explanation {
    Explanation {
        title: "No External References",
        description: "\
Flags documents that reference resources outside the submission (remote images,
stylesheets, scripts). Up to twenty references are listed per document.",
        remediation: "\
Embed the resources in the submission or remove the references.",
        examples: ExamplePair {
            before: r#"{"external_references": ["https://cdn.example.com/logo.png"]}"#,
            after: r#"{"external_references": []}"#,
        },
    }
}

fn explain_suspension_risk() -> Explanation {
    Explanation {
        title: "Submission Suspension Risk",
        description: "\
Reports inline validation errors recorded against a document. Such errors lead the
receiving system to suspend the submission.",
        remediation: "\
Resolve the recorded validation errors before submitting.",
        examples: ExamplePair {
            before: r#"{"xbrl_errors": ["ix:nonFraction missing contextRef"]}"#,
            after: r#"{"xbrl_errors": []}"#,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_rule_code() {
        assert!(lookup_explanation(ids::RULE_ACCT_BALANCE_SHEET_EQUATION).is_some());
        assert!(lookup_explanation(ids::RULE_TAXONOMY_RELATIONSHIP_CYCLES).is_some());
        assert!(lookup_explanation(ids::RULE_IXBRL_SUSPENSION_RISK).is_some());
    }

    #[test]
    fn lookup_by_kind() {
        assert!(lookup_explanation(ids::KIND_INSUFFICIENT_COVERAGE).is_some());
        assert!(lookup_explanation(ids::KIND_CALCULATION_CYCLE).is_some());
        assert!(lookup_explanation(ids::KIND_RELATIONSHIP_TARGET_MISSING).is_some());
    }

    #[test]
    fn kind_entries_keep_their_own_title() {
        let exp = lookup_explanation(ids::KIND_PRESENTATION_CYCLE).unwrap();
        assert_eq!(exp.title, "Presentation cycle");
    }

    #[test]
    fn lookup_unknown_returns_none() {
        assert!(lookup_explanation("unknown.rule").is_none());
        assert!(lookup_explanation("unknown_kind").is_none());
    }

    #[test]
    fn all_rule_codes_are_valid() {
        for code in all_rule_codes() {
            assert!(
                lookup_explanation(code).is_some(),
                "rule {} should be in registry",
                code
            );
        }
    }

    #[test]
    fn all_kinds_are_valid() {
        for kind in all_kinds() {
            assert!(
                lookup_explanation(kind).is_some(),
                "kind {} should be in registry",
                kind
            );
        }
    }

    #[test]
    fn rule_codes_and_kinds_do_not_collide() {
        for code in all_rule_codes() {
            assert!(!all_kinds().contains(code));
        }
    }
}
