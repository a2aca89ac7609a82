//! Reloaded-II style flat store (`Config.json`): one JSON object, no schema.
//!
//! With no schema to consult, the value's own JSON encoding decides its kind.

use std::{fs, path::Path};

use serde_json::Value;
use tracing::debug;

use super::{
    coercion::{Representation, TypedValue},
    error::{ResolutionError, ResolutionResult},
};


/// File name of the flat store inside a mod's configuration directory.
pub const FLAT_STORE_FILE_NAME: &str = "Config.json";


fn json_kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Interprets one flat-store entry.
///
/// Booleans become `Int(1)`/`Int(0)`. Numbers become `Double` when a float was
/// requested, otherwise they must fit a 32-bit integer.
pub fn interpret_flat_value(
    key: &str,
    value: &Value,
    representation: Representation,
) -> ResolutionResult<TypedValue> {
    match value {
        Value::Bool(flag) => Ok(TypedValue::Int(i32::from(*flag))),
        Value::Number(number) => {
            if representation.is_float() {
                if let Some(float_value) = number.as_f64() {
                    return Ok(TypedValue::Double(float_value));
                }
            }

            number
                .as_i64()
                .and_then(|integer| i32::try_from(integer).ok())
                .map(TypedValue::Int)
                .ok_or_else(|| ResolutionError::UnparsableNumber {
                    key: key.to_string(),
                    value: number.to_string(),
                    expected: "int",
                })
        }
        other => Err(ResolutionError::UnsupportedValueKind {
            key: key.to_string(),
            kind: json_kind_name(other),
        }),
    }
}

/// Reads `key` from the flat store document at `store_path`.
pub fn read_flat(
    store_path: &Path,
    key: &str,
    representation: Representation,
) -> ResolutionResult<TypedValue> {
    if !store_path.is_file() {
        return Err(ResolutionError::StoreNotFound {
            path: store_path.to_path_buf(),
        });
    }

    let store_text = fs::read_to_string(store_path).map_err(|source| ResolutionError::Io {
        path: store_path.to_path_buf(),
        source,
    })?;

    let document: Value =
        serde_json::from_str(&store_text).map_err(|error| ResolutionError::MalformedDocument {
            path: store_path.to_path_buf(),
            detail: error.to_string(),
        })?;

    let Value::Object(entries) = document else {
        return Err(ResolutionError::MalformedDocument {
            path: store_path.to_path_buf(),
            detail: format!("expected a JSON object, found {}", json_kind_name(&document)),
        });
    };

    let value = entries.get(key).ok_or_else(|| ResolutionError::KeyNotFound {
        key: key.to_string(),
        path: store_path.to_path_buf(),
    })?;

    debug!("{} is of kind {}.", key, json_kind_name(value));

    interpret_flat_value(key, value, representation)
}
