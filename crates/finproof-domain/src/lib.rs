//! Deterministic rule evaluation over a canonical filing (no IO).
//!
//! Input: a filing model parsed elsewhere, a registry and a profile name.
//! Output: an ordered report plus a per-rule execution trace.

#![forbid(unsafe_code)]

pub mod arithmetic;
pub mod checks;
pub mod claims;
pub mod decimal;
pub mod fingerprint;
pub mod graph;
pub mod model;
pub mod registry;
pub mod report;
pub mod rule;
pub mod schema;

mod engine;

pub use arithmetic::TolerancePolicy;
pub use claims::{Recomputed, claim_holds, recompute};
pub use decimal::ExactDecimal;
pub use engine::{Engine, EngineError, RunOutput};
pub use fingerprint::{HASH_PREFIX, filing_hash, sha256_hex};
pub use model::Filing;
pub use registry::{Profile, RegistryError, RuleRegistry};
pub use rule::{Rule, RuleFault, RuleFinding};
pub use schema::{SchemaError, SchemaViolation, validate_filing};

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod proptest;
