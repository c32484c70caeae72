use crate::graph::{self, Network};
use crate::model::{Filing, TaxonomyPackage};
use crate::rule::{Rule, RuleFault, RuleFinding};
use crate::schema::is_ncname;
use finproof_types::{Ref, Severity, ids};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

pub const RESERVED_STANDARD_PREFIXES: &[&str] = &[
    "us-gaap", "dei", "ifrs-full", "xbrli", "link", "xlink", "iso4217",
];

pub const LABEL_MAX_LEN: usize = 511;

/// Package to check, or `None` when absent or empty (reported by the presence rule).
fn package(filing: &Filing) -> Option<&TaxonomyPackage> {
    filing.taxonomy_package.as_ref().filter(|p| !p.is_empty())
}

fn concept_ref(concept: &str) -> Ref {
    Ref::Concept(concept.to_string())
}

pub struct MetadataPresence;

impl Rule for MetadataPresence {
    fn code(&self) -> &'static str {
        ids::RULE_TAXONOMY_METADATA_PRESENCE
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Taxonomy checks need a taxonomy package."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        if package(filing).is_some() {
            return Ok(Vec::new());
        }
        Ok(vec![RuleFinding::new(
            ids::KIND_MISSING_TAXONOMY_PACKAGE,
            self.default_severity(),
            "filing has no taxonomy_package",
        )])
    }
}

pub struct NamespacePrefixConsistency;

impl Rule for NamespacePrefixConsistency {
    fn code(&self) -> &'static str {
        ids::RULE_TAXONOMY_NAMESPACE_PREFIX
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Namespace prefixes are well formed and map to exactly one URI."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let Some(pkg) = package(filing) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        let mut uri_by_prefix: BTreeMap<&str, &str> = BTreeMap::new();
        let mut prefix_by_uri: BTreeMap<&str, &str> = BTreeMap::new();

        for ns in &pkg.namespaces {
            let prefix = ns.prefix.trim();
            let uri = ns.uri.trim();
            let ns_ref = Ref::Namespace(prefix.to_string());

            if !is_ncname(prefix) {
                out.push(
                    RuleFinding::new(
                        ids::KIND_INVALID_PREFIX,
                        Severity::Error,
                        format!("namespace prefix '{prefix}' is malformed"),
                    )
                    .with_ref(ns_ref),
                );
                continue;
            }
            if uri.is_empty() {
                out.push(
                    RuleFinding::new(
                        ids::KIND_MISSING_NAMESPACE_URI,
                        Severity::Error,
                        format!("namespace '{prefix}' has no URI"),
                    )
                    .with_ref(ns_ref),
                );
                continue;
            }

            match uri_by_prefix.get(prefix) {
                Some(first) if *first != uri => out.push(
                    RuleFinding::new(
                        ids::KIND_PREFIX_CONFLICT,
                        Severity::Error,
                        format!("namespace prefix '{prefix}' maps to two URIs"),
                    )
                    .with_ref(ns_ref.clone())
                    .with_data(json!({ "first_uri": first, "second_uri": uri })),
                ),
                Some(_) => {}
                None => {
                    uri_by_prefix.insert(prefix, uri);
                }
            }

            match prefix_by_uri.get(uri) {
                Some(first) if *first != prefix => out.push(
                    RuleFinding::new(
                        ids::KIND_URI_ALIASED,
                        Severity::Warning,
                        format!("namespace URI '{uri}' is declared under '{first}' and '{prefix}'"),
                    )
                    .with_refs([Ref::Namespace(first.to_string()), ns_ref.clone()]),
                ),
                Some(_) => {}
                None => {
                    prefix_by_uri.insert(uri, prefix);
                }
            }

            if RESERVED_STANDARD_PREFIXES.contains(&prefix) && !ns.is_standard {
                out.push(
                    RuleFinding::new(
                        ids::KIND_RESERVED_PREFIX,
                        Severity::Error,
                        format!("reserved prefix '{prefix}' is declared as a custom namespace"),
                    )
                    .with_ref(ns_ref),
                );
            }
        }
        Ok(out)
    }
}

pub struct LabelConstraints;

impl Rule for LabelConstraints {
    fn code(&self) -> &'static str {
        ids::RULE_TAXONOMY_LABEL_CONSTRAINTS
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Labels reference declared concepts, are non-empty and bounded in length."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let Some(pkg) = package(filing) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        let declared: BTreeSet<String> = pkg.element_concepts().collect();
        let mut labelled: BTreeSet<&str> = BTreeSet::new();

        for label in &pkg.labels {
            let concept = label.concept.trim();
            if concept.is_empty() {
                continue;
            }
            labelled.insert(concept);

            if !declared.contains(concept) {
                out.push(
                    RuleFinding::new(
                        ids::KIND_LABEL_UNKNOWN_CONCEPT,
                        Severity::Error,
                        format!("label references undeclared concept {concept}"),
                    )
                    .with_ref(concept_ref(concept)),
                );
            }
            let length = label.text.chars().count();
            if length > LABEL_MAX_LEN {
                out.push(
                    RuleFinding::new(
                        ids::KIND_LABEL_TOO_LONG,
                        Severity::Error,
                        format!("label for {concept} exceeds {LABEL_MAX_LEN} characters"),
                    )
                    .with_ref(concept_ref(concept))
                    .with_data(json!({ "length": length, "max": LABEL_MAX_LEN })),
                );
            }
            if label.text.trim().is_empty() {
                out.push(
                    RuleFinding::new(
                        ids::KIND_EMPTY_LABEL,
                        Severity::Error,
                        format!("label for {concept} is empty"),
                    )
                    .with_ref(concept_ref(concept)),
                );
            }
        }

        for element in pkg.elements.iter().filter(|e| e.is_custom) {
            let Some(concept) = element.concept() else {
                continue;
            };
            if !labelled.contains(concept.as_str()) {
                out.push(
                    RuleFinding::new(
                        ids::KIND_MISSING_LABEL,
                        Severity::Warning,
                        format!("custom element {concept} has no label"),
                    )
                    .with_ref(concept_ref(&concept)),
                );
            }
        }
        Ok(out)
    }
}

pub struct RelationshipTargetExists;

impl Rule for RelationshipTargetExists {
    fn code(&self) -> &'static str {
        ids::RULE_TAXONOMY_RELATIONSHIP_TARGET
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Relationship endpoints resolve to declared elements."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let Some(pkg) = package(filing) else {
            return Ok(Vec::new());
        };
        let declared: BTreeSet<String> = pkg.element_concepts().collect();
        let mut out = Vec::new();
        for rel in &pkg.relationships {
            let (from, to) = graph::endpoints(rel);
            let network = Network::for_arcrole(rel.arcrole.as_deref());
            for (end, concept) in [("source", from), ("target", to)] {
                if concept.is_empty() || declared.contains(concept) {
                    continue;
                }
                out.push(
                    RuleFinding::new(
                        ids::KIND_RELATIONSHIP_TARGET_MISSING,
                        self.default_severity(),
                        format!(
                            "{} relationship {} {} -> {} references undeclared {}",
                            network.as_str(),
                            end,
                            from,
                            to,
                            concept
                        ),
                    )
                    .with_ref(concept_ref(concept))
                    .with_data(json!({
                        "endpoint": end,
                        "network": network.as_str(),
                        "arcrole": rel.arcrole.as_deref().unwrap_or("unspecified"),
                    })),
                );
            }
        }
        Ok(out)
    }
}

pub struct RelationshipCycles;

impl RelationshipCycles {
    fn kind(network: Network) -> &'static str {
        match network {
            Network::Calculation => ids::KIND_CALCULATION_CYCLE,
            Network::Presentation => ids::KIND_PRESENTATION_CYCLE,
            Network::Other => ids::KIND_RELATIONSHIP_CYCLE,
        }
    }
}

impl Rule for RelationshipCycles {
    fn code(&self) -> &'static str {
        ids::RULE_TAXONOMY_RELATIONSHIP_CYCLES
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Each relationship network is acyclic; one finding per distinct cycle."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let Some(pkg) = package(filing) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for (network, graph) in graph::networks(pkg) {
            for members in graph.find_cycles() {
                let mut closed = members.clone();
                if let Some(first) = members.first() {
                    closed.push(first.clone());
                }
                out.push(
                    RuleFinding::new(
                        Self::kind(network),
                        self.default_severity(),
                        format!("{} cycle: {}", network.as_str(), closed.join(" -> ")),
                    )
                    .with_refs(members.iter().map(|m| concept_ref(m)))
                    .with_data(json!({ "network": network.as_str(), "cycle": closed })),
                );
            }
        }
        Ok(out)
    }
}

pub struct CustomConceptCoverage;

impl Rule for CustomConceptCoverage {
    fn code(&self) -> &'static str {
        ids::RULE_TAXONOMY_CUSTOM_COVERAGE
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn description(&self) -> &'static str {
        "Custom concepts participate in at least one relationship."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let Some(pkg) = package(filing) else {
            return Ok(Vec::new());
        };
        let custom: BTreeSet<String> = pkg
            .elements
            .iter()
            .filter(|e| e.is_custom)
            .filter_map(|e| e.concept())
            .collect();
        let linked: BTreeSet<&str> = pkg
            .relationships
            .iter()
            .flat_map(|r| {
                let (from, to) = graph::endpoints(r);
                [from, to]
            })
            .collect();

        Ok(custom
            .iter()
            .filter(|c| !linked.contains(c.as_str()))
            .map(|concept| {
                RuleFinding::new(
                    ids::KIND_ISOLATED_CUSTOM_CONCEPT,
                    self.default_severity(),
                    format!("custom concept {concept} appears in no relationship"),
                )
                .with_ref(concept_ref(concept))
            })
            .collect())
    }
}
