//! Canonical filing model.
//!
//! The filing is immutable once loaded: the engine and every rule only borrow it.
//! All maps are ordered so that serializing a filing is deterministic.

use crate::decimal::ExactDecimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Filing {
    #[serde(default)]
    pub accession: Option<String>,
    /// Issuer identifier.
    #[serde(default)]
    pub cik: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub period_end: Option<String>,
    /// Taxonomy version the facts were tagged against.
    #[serde(default)]
    pub taxonomy: Option<String>,
    #[serde(default)]
    pub contexts: BTreeMap<String, Context>,
    #[serde(default)]
    pub facts: Vec<Fact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy_package: Option<TaxonomyPackage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ixbrl: Option<InlinePackage>,
}

impl Filing {
    /// Parse a canonical filing document and assign ids to facts that lack one.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        let mut filing: Filing = serde_json::from_str(input)?;
        filing.assign_fact_ids();
        Ok(filing)
    }

    /// Facts without an id get `fact-NNNNNN`, numbered by 1-based position.
    pub fn assign_fact_ids(&mut self) {
        for (idx, fact) in self.facts.iter_mut().enumerate() {
            if fact.id.trim().is_empty() {
                fact.id = format!("fact-{:06}", idx + 1);
            }
        }
    }

    pub fn context(&self, id: &str) -> Option<&Context> {
        self.contexts.get(id)
    }

    pub fn facts_for_concept<'a>(&'a self, concept: &'a str) -> impl Iterator<Item = &'a Fact> {
        self.facts.iter().filter(move |f| f.concept == concept)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodType {
    Instant,
    Duration,
}

impl PeriodType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "instant" => Some(PeriodType::Instant),
            "duration" => Some(PeriodType::Duration),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PeriodType::Instant => "instant",
            PeriodType::Duration => "duration",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Kept as written so schema validation can report unsupported values.
    #[serde(default)]
    pub period_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dimensions: BTreeMap<String, String>,
}

impl Context {
    pub fn period(&self) -> Option<PeriodType> {
        PeriodType::parse(&self.period_type)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    #[serde(default)]
    pub id: String,
    pub concept: String,
    pub context_id: String,
    #[serde(default)]
    pub value: Option<FactValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<Decimals>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dimensions: BTreeMap<String, String>,
    /// Provenance of the fact in the source document, carried through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub source: BTreeMap<String, JsonValue>,
}

impl Fact {
    /// Numeric reading of the value.
    ///
    /// Text is only treated as a number when the fact carries a unit or decimals,
    /// after removing thousands separators.
    pub fn numeric_value(&self) -> Option<f64> {
        match self.value.as_ref()? {
            FactValue::Bool(_) => None,
            FactValue::Number(n) => n.as_f64(),
            FactValue::Text(text) => {
                if self.unit.is_none() && self.decimals.is_none() {
                    return None;
                }
                text.replace(',', "").trim().parse::<f64>().ok()
            }
        }
    }

    /// Exact reading of the value, accepted under the same conditions as [`Fact::numeric_value`].
    pub fn exact_value(&self) -> Option<ExactDecimal> {
        match self.value.as_ref()? {
            FactValue::Bool(_) => None,
            FactValue::Number(n) => ExactDecimal::parse(&n.to_string()),
            FactValue::Text(text) => {
                if self.unit.is_none() && self.decimals.is_none() {
                    return None;
                }
                ExactDecimal::parse(&text.replace(',', ""))
            }
        }
    }

    /// Value rendered as text, for comparisons of non-numeric facts.
    pub fn text_value(&self) -> Option<String> {
        self.value.as_ref().map(|v| v.to_string())
    }

    pub fn local_name(&self) -> &str {
        self.concept
            .split_once(':')
            .map(|(_, local)| local)
            .unwrap_or(&self.concept)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Bool(b) => write!(f, "{b}"),
            FactValue::Number(n) => write!(f, "{n}"),
            FactValue::Text(t) => f.write_str(t),
        }
    }
}

/// Rounding precision of a numeric fact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDecimals", into = "RawDecimals")]
pub enum Decimals {
    Exact(i32),
    Infinite,
    /// Anything that is neither an integer nor `INF`, kept verbatim.
    Unparsed(String),
}

impl Decimals {
    pub fn exact(&self) -> Option<i32> {
        match self {
            Decimals::Exact(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Decimals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decimals::Exact(d) => write!(f, "{d}"),
            Decimals::Infinite => f.write_str("INF"),
            Decimals::Unparsed(raw) => f.write_str(raw),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawDecimals {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<RawDecimals> for Decimals {
    fn from(raw: RawDecimals) -> Self {
        match raw {
            RawDecimals::Int(n) => i32::try_from(n)
                .map(Decimals::Exact)
                .unwrap_or_else(|_| Decimals::Unparsed(n.to_string())),
            RawDecimals::Float(x) => Decimals::Unparsed(x.to_string()),
            RawDecimals::Text(text) => {
                let trimmed = text.trim();
                if trimmed.eq_ignore_ascii_case("INF") {
                    Decimals::Infinite
                } else if let Ok(d) = trimmed.parse::<i32>() {
                    Decimals::Exact(d)
                } else {
                    Decimals::Unparsed(text)
                }
            }
        }
    }
}

impl From<Decimals> for RawDecimals {
    fn from(decimals: Decimals) -> Self {
        match decimals {
            Decimals::Exact(d) => RawDecimals::Int(i64::from(d)),
            Decimals::Infinite => RawDecimals::Text("INF".to_string()),
            Decimals::Unparsed(raw) => RawDecimals::Text(raw),
        }
    }
}

// ---------------------------------------------------------------------------
// Taxonomy package
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyPackage {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<Namespace>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
}

impl TaxonomyPackage {
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
            && self.elements.is_empty()
            && self.labels.is_empty()
            && self.relationships.is_empty()
    }

    /// Concept names of every declared element, in declaration order.
    pub fn element_concepts(&self) -> impl Iterator<Item = String> + '_ {
        self.elements.iter().filter_map(Element::concept)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub is_standard: bool,
}

/// Element declared either as a full `concept` or as `prefix` + `name`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
}

impl Element {
    pub fn concept(&self) -> Option<String> {
        if let Some(concept) = self.concept.as_deref().map(str::trim) {
            return (!concept.is_empty()).then(|| concept.to_string());
        }
        let prefix = self.prefix.as_deref().map(str::trim).unwrap_or("");
        let name = self.name.as_deref().map(str::trim).unwrap_or("");
        if prefix.is_empty() || name.is_empty() {
            return None;
        }
        Some(format!("{prefix}:{name}"))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub concept: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arcrole: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

// ---------------------------------------------------------------------------
// Inline markup package
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlinePackage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_document: Option<InlineDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<InlineDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disallowed_html_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_references: Vec<String>,
}

impl InlinePackage {
    pub fn is_empty(&self) -> bool {
        self.primary_document.is_none()
            && self.attachments.is_empty()
            && self.disallowed_html_tags.is_empty()
            && self.external_references.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_inline_xbrl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_ix_header: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disallowed_html_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_references: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub xbrl_errors: Vec<JsonValue>,
}

impl InlineDocument {
    /// Filename, or `fallback` when none is declared.
    pub fn display_name(&self, fallback: &str) -> String {
        match self.filename.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => fallback.to_string(),
        }
    }
}
