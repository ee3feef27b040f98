//! Canonical JSON for token segments.
//!
//! Two logically equal mappings always produce identical bytes: object keys
//! are written in lexicographic order at every depth, no insignificant
//! whitespace is emitted, and numbers must be integers (written without
//! exponent). Key order is enforced here rather than relying on the map type
//! `serde_json` happens to be compiled with.

use crate::error::{JwtError, JwtResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Serialize any `Serialize` value into canonical JSON bytes.
///
/// The value must serialize to a JSON object.
pub fn to_canonical_vec<T: Serialize>(value: &T) -> JwtResult<Vec<u8>> {
    let value = serde_json::to_value(value)
        .map_err(|e| JwtError::malformed_payload(format!("serialization failed: {e}")))?;
    match value {
        Value::Object(map) => encode(&map),
        _ => Err(JwtError::malformed_payload("top-level value is not an object")),
    }
}

/// Encode a JSON object canonically.
pub fn encode(map: &Map<String, Value>) -> JwtResult<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    write_object(&mut out, map)?;
    Ok(out)
}

/// Parse canonical (or any well-formed) JSON bytes back into an object.
pub fn decode(bytes: &[u8]) -> JwtResult<Map<String, Value>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| JwtError::malformed_payload(format!("invalid JSON: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(JwtError::malformed_payload("top-level value is not an object")),
    }
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> JwtResult<()> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.extend_from_slice(i.to_string().as_bytes());
            } else if let Some(u) = n.as_u64() {
                out.extend_from_slice(u.to_string().as_bytes());
            } else {
                return Err(JwtError::malformed_payload(format!(
                    "non-integer number {n} cannot be encoded canonically"
                )));
            }
        }
        Value::String(s) => write_string(out, s)?,
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(out, item)?;
            }
            out.push(b']');
        }
        Value::Object(map) => write_object(out, map)?,
    }
    Ok(())
}

fn write_object(out: &mut Vec<u8>, map: &Map<String, Value>) -> JwtResult<()> {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    out.push(b'{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        write_string(out, key)?;
        out.push(b':');
        write_value(out, value)?;
    }
    out.push(b'}');
    Ok(())
}

fn write_string(out: &mut Vec<u8>, s: &str) -> JwtResult<()> {
    serde_json::to_writer(&mut *out, s)
        .map_err(|e| JwtError::malformed_payload(format!("string encoding failed: {e}")))
}
