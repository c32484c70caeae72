//! Shared test utilities for the finproof workspace.
//!
//! This crate exists because `xtask` needs `normalize_nondeterministic` at
//! runtime (not behind `#[cfg(test)]`), so a `#[cfg(test)]` module inside
//! `finproof-types` would not suffice.

use serde_json::Value;

pub const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
pub const SIGNATURE_PLACEHOLDER: &str = "__SIGNATURE__";
pub const HASH_PLACEHOLDER: &str = "__HASH__";

/// Normalize the clock-dependent parts of finproof payloads for golden comparison.
///
/// Reports, traces and proof bundles are already deterministic. Only certificates
/// carry wall-clock data, and two values follow from it:
///
/// 1. **Certificate objects** (any object with both `issued_at` and `signature`)
///    get both replaced with placeholders, at any depth.
/// 2. **Manifests** (root has `schema`, `filing_hash` and an `artifacts` map)
///    get the `certificate.json` digest replaced, since it hashes the certificate
///    bytes. Every other digest is left alone.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_manifest = obj.contains_key("schema") && obj.contains_key("filing_hash");
        if is_manifest
            && let Some(artifacts) = obj.get_mut("artifacts")
            && let Some(artifacts) = artifacts.as_object_mut()
            && artifacts.contains_key("certificate.json")
        {
            artifacts.insert(
                "certificate.json".to_string(),
                Value::String(HASH_PLACEHOLDER.to_string()),
            );
        }
    }
    normalize_certificates_recursive(&mut value);
    value
}

fn normalize_certificates_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.contains_key("issued_at") && map.contains_key("signature") {
                map.insert(
                    "issued_at".to_string(),
                    Value::String(TIMESTAMP_PLACEHOLDER.to_string()),
                );
                map.insert(
                    "signature".to_string(),
                    Value::String(SIGNATURE_PLACEHOLDER.to_string()),
                );
            }
            for val in map.values_mut() {
                normalize_certificates_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_certificates_recursive(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn certificate_time_and_signature_are_normalized() {
        let input = json!({
            "schema": "finproof.certificate.v1",
            "filing_hash": "sha256:ab",
            "issued_at": "2026-01-15T10:30:00Z",
            "key_id": "ops",
            "signature": "00ff"
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["issued_at"], TIMESTAMP_PLACEHOLDER);
        assert_eq!(result["signature"], SIGNATURE_PLACEHOLDER);
        assert_eq!(result["key_id"], "ops");
        assert_eq!(result["filing_hash"], "sha256:ab");
    }

    #[test]
    fn manifest_only_loses_the_certificate_digest() {
        let input = json!({
            "schema": "finproof.manifest.v1",
            "filing_hash": "sha256:ab",
            "artifacts": {
                "certificate.json": "sha256:01",
                "report.json": "sha256:02"
            }
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["artifacts"]["certificate.json"], HASH_PLACEHOLDER);
        assert_eq!(result["artifacts"]["report.json"], "sha256:02");
    }

    #[test]
    fn objects_with_only_one_of_the_keys_are_untouched() {
        let input = json!({
            "findings": [
                { "data": { "issued_at": "2020-01-01" } },
                { "data": { "signature": "abc" } }
            ]
        });

        let result = normalize_nondeterministic(input.clone());

        assert_eq!(result, input);
    }

    #[test]
    fn nested_artifacts_map_is_not_a_manifest() {
        let input = json!({
            "findings": [
                { "data": {
                    "schema": "x",
                    "filing_hash": "y",
                    "artifacts": { "certificate.json": "sha256:01" }
                } }
            ]
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(
            result["findings"][0]["data"]["artifacts"]["certificate.json"],
            "sha256:01"
        );
    }
}
