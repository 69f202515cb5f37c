//! Tolerant extraction of a boolean verdict from policy RPC payloads.
//!
//! The policy functions have drifted across deployments: some return a bare
//! boolean, some wrap it under `granted`/`allowed`/`can_manage`, some nest
//! the whole thing under `result` or `data`. Rather than chase each shape we
//! probe a fixed candidate list to a bounded depth, and anything past that is
//! reported as indeterminate instead of guessed.

use serde_json::Value;

/// Keys probed for a boolean verdict, in precedence order.
const CANDIDATE_KEYS: [&str; 5] = ["granted", "allow", "allowed", "value", "can_manage"];

/// Envelope keys descended into exactly once before giving up.
const WRAPPER_KEYS: [&str; 2] = ["result", "data"];

/// Outcome of probing a payload. `Indeterminate` means the caller should use
/// its fallback policy; it is never coerced to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extracted {
    Bool(bool),
    Indeterminate,
}

/// Search `payload` for a boolean verdict.
///
/// A bare boolean wins outright. Otherwise the candidate keys are probed in
/// order and the first boolean value found is returned; non-boolean values
/// under a candidate key are skipped, not coerced. If that fails, the search
/// descends one level into each wrapper key and repeats. Numbers, strings,
/// arrays and deeper nesting all come back `Indeterminate`.
pub fn extract_boolean(payload: &Value) -> Extracted {
    if let Some(found) = probe(payload) {
        return Extracted::Bool(found);
    }

    for wrapper in WRAPPER_KEYS {
        if let Some(found) = payload.get(wrapper).and_then(probe) {
            return Extracted::Bool(found);
        }
    }

    Extracted::Indeterminate
}

/// One non-recursive probe: bare boolean, then candidate keys.
fn probe(value: &Value) -> Option<bool> {
    if let Value::Bool(direct) = value {
        return Some(*direct);
    }

    let object = value.as_object()?;
    CANDIDATE_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_bool))
}
