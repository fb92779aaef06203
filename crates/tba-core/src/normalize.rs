//! Absent-field normalization.
//!
//! "Absent" is modelled as a missing key. A key holding `null` is treated as
//! absent and removed, at every nesting level, before anything is parsed or
//! sent. This is the only place that rule lives.
//!
//! Payloads nest as deep as the sender makes them (`reply_to_message` chains
//! in particular), so every deserialization here runs with serde_json's
//! recursion limit off and on a stack that grows onto the heap as needed.

use serde::{de::DeserializeOwned, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::SchemaValidationError;

/// Remove every object key whose value is `null`, recursively.
///
/// Walks with an explicit stack so nesting depth is bounded only by memory.
/// Array elements are kept as-is (their own objects are still normalized).
pub fn strip_absent(value: &mut Value) {
    let mut stack = vec![value];
    while let Some(current) = stack.pop() {
        match current {
            Value::Object(map) => {
                map.retain(|_, v| !v.is_null());
                stack.extend(map.values_mut());
            }
            Value::Array(items) => stack.extend(items.iter_mut()),
            _ => {}
        }
    }
}

/// Free stack below which a nested deserialization moves to a fresh segment.
/// Must exceed the largest frame of a single nesting level (a debug-build
/// `Message` visitor is the biggest).
const RED_ZONE: usize = 1024 * 1024;
/// Size of each extra stack segment.
const SEGMENT_SIZE: usize = 8 * 1024 * 1024;

fn growable<'de, D: Deserializer<'de>>(de: D) -> serde_stacker::Deserializer<D> {
    let mut de = serde_stacker::Deserializer::new(de);
    de.red_zone = RED_ZONE;
    de.stack_size = SEGMENT_SIZE;
    de
}

/// Deserialize a JSON document of any nesting depth.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = T::deserialize(growable(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Normalize `raw` and deserialize it, reporting the failing field path.
pub fn parse<T: DeserializeOwned>(
    entity: &str,
    mut raw: Value,
) -> Result<T, SchemaValidationError> {
    strip_absent(&mut raw);
    serde_path_to_error::deserialize(growable(raw)).map_err(|err| {
        let path = err.path().to_string();
        SchemaValidationError::new(entity, path, err.into_inner().to_string())
    })
}

/// Serialize `value` into its normalized JSON form (no `null` members anywhere).
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Value> {
    let mut out = serde_json::to_value(value)?;
    strip_absent(&mut out);
    Ok(out)
}
