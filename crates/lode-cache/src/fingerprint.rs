//! Deterministic request fingerprints.
//!
//! A fingerprint is the SHA-256 of a canonical JSON rendering of
//! `{request, model, params}`: object keys sorted at every depth, no
//! insignificant whitespace. Two logically identical requests hash the same
//! no matter how their objects were assembled.

use std::fmt;

use lode_core::RequestSpec;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

/// Bumped whenever the canonical envelope changes, so old cache entries are
/// never served for a new layout.
pub const FINGERPRINT_VERSION: u32 = 1;

/// Hex length of a SHA-256 digest.
pub const FINGERPRINT_LEN: usize = 64;

/// A 64-character lowercase hex digest identifying a logical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Accept an existing digest, e.g. read back from storage.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let ok = raw.len() == FINGERPRINT_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        ok.then(|| Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 characters, for log lines.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint a request for a given model and search parameters.
#[must_use]
pub fn fingerprint(spec: &RequestSpec, model: &str, params: &Value) -> Fingerprint {
    let envelope = json!({
        "version": FINGERPRINT_VERSION,
        "request": spec,
        "model": model,
        "params": params,
    });
    fingerprint_value(&envelope)
}

/// Fingerprint an arbitrary JSON value.
#[must_use]
pub fn fingerprint_value(value: &Value) -> Fingerprint {
    let digest = Sha256::digest(canonical_json(value).as_bytes());
    Fingerprint(hex::encode(digest))
}

/// Render `value` with object keys sorted recursively and no whitespace.
#[must_use]
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (idx, (key, item)) in entries.into_iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
