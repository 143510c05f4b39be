//! Hashing System - Logo Identity and Content Digests
//!
//! The identity hash is the 53-bit hash of a canonical record, rendered in
//! base 36. Canonical JSON sorts object keys at every depth so the record
//! serializes identically regardless of field declaration order.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::algorithms::Algorithm;
use crate::params::AlgorithmParameters;
use crate::seed::hash53_base36;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Brand names hash case- and padding-insensitively.
pub fn normalize_brand(brand_name: &str) -> String {
    brand_name.trim().to_lowercase()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashInput<'a> {
    brand_name: String,
    algorithm: Algorithm,
    variant: u32,
    params: &'a AlgorithmParameters,
    format_version: &'a str,
}

/// Identity hash of one generated configuration.
///
/// Colors and timestamps are outside the record; bumping `format_version`
/// changes every hash.
pub fn generate_hash(
    brand_name: &str,
    algorithm: Algorithm,
    variant: u32,
    params: &AlgorithmParameters,
    format_version: &str,
) -> Result<String, serde_json::Error> {
    let record = HashInput {
        brand_name: normalize_brand(brand_name),
        algorithm,
        variant,
        params,
        format_version,
    };
    Ok(hash53_base36(&canonical_json(&record)?))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
