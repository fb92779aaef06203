//! Platform methods as typed values.
//!
//! Each method is a struct naming its required parameters, with the optional
//! ones collected in a `Default`able options struct. A method is turned into
//! wire parameters once, in [`clean_params`], whatever its shape.

use serde::{ser::Error as _, Serialize, Serializer};
use serde_json::Value;

use crate::{
    errors::Error, normalize, ports::FilePart, types::Entity, Result,
};

mod edit;
mod send;
mod updates;

pub use edit::*;
pub use send::*;
pub use updates::*;

/// A platform method: its wire name, its result entity, and its parameters (via `Serialize`).
pub trait Method: Serialize {
    const NAME: &'static str;

    type Output: Entity;

    /// Local files to send as multipart parts.
    fn uploads(&self) -> Vec<FilePart> {
        Vec::new()
    }
}

/// Turn a method into its wire parameters.
///
/// Absent parameters are dropped; `0`, `false` and `""` are kept. Strings go
/// out verbatim, numbers and booleans as their JSON text, and markup or any
/// other structured value as a compact JSON string.
pub fn clean_params<M: Method>(method: &M) -> Result<Vec<(String, String)>> {
    let value = normalize::to_value(method).map_err(|err| {
        Error::ClientUsage(format!("{}: cannot encode parameters: {err}", M::NAME))
    })?;
    let Value::Object(map) = value else {
        return Err(Error::ClientUsage(format!(
            "{}: parameters must serialize to an object",
            M::NAME
        )));
    };
    Ok(map
        .into_iter()
        .map(|(name, value)| (name, wire_value(value)))
        .collect())
}

/// Float parameters must be finite: serde_json writes NaN and infinities as
/// `null`, which cleaning would then drop like an absent value.
fn finite<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return Err(S::Error::custom(format!("expected a finite number, got {value}")));
    }
    serializer.serialize_f64(*value)
}

fn finite_opt<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(v) => finite(v, serializer),
        None => serializer.serialize_none(),
    }
}

fn wire_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
