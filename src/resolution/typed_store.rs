//! ReMIX typed store: a raw value document (`data.yaml`) whose entries are
//! interpreted through the setting's schema definition.

use std::{fs, path::Path, str::FromStr};

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use super::{
    coercion::{coerce, Coerced, Representation, TypedValue},
    error::{ResolutionError, ResolutionResult},
    schema::SettingSchema,
    types::{EnumDescriptor, SemanticType, TypeResolver},
};


/// Location of the value document, relative to a mod's configuration directory.
pub const TYPED_VALUES_RELATIVE_PATH: [&str; 3] = ["ReMIX", "Config", "data.yaml"];

/// Location of the schema document, relative to a mod's install directory.
pub const TYPED_SCHEMA_RELATIVE_PATH: [&str; 3] = ["ReMIX", "Config", "config.yaml"];


fn describe_yaml(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => format!("{text:?}"),
        Value::Sequence(_) => "a sequence".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, describe_yaml(&tagged.value)),
    }
}

fn parse_integer<T>(setting_id: &str, value: &Value, expected: &'static str) -> ResolutionResult<T>
where
    T: TryFrom<i64> + FromStr,
{
    let parsed = match value {
        Value::Number(number) => number.as_i64().and_then(|integer| T::try_from(integer).ok()),
        Value::String(text) => text.trim().parse::<T>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| ResolutionError::UnparsableNumber {
        key: setting_id.to_string(),
        value: describe_yaml(value),
        expected,
    })
}

fn parse_floating<T>(setting_id: &str, value: &Value, expected: &'static str) -> ResolutionResult<f64>
where
    T: FromStr + Into<f64>,
{
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<T>().ok().map(Into::into),
        _ => None,
    };

    parsed.ok_or_else(|| ResolutionError::UnparsableNumber {
        key: setting_id.to_string(),
        value: describe_yaml(value),
        expected,
    })
}

fn parse_boolean(setting_id: &str, value: &Value) -> ResolutionResult<bool> {
    let parsed = match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_i64().map(|integer| integer != 0),
        Value::String(text) => {
            let text = text.trim();

            if text.eq_ignore_ascii_case("true") {
                Some(true)
            } else if text.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    };

    parsed.ok_or_else(|| ResolutionError::InvalidStoredValue {
        setting_id: setting_id.to_string(),
        value: describe_yaml(value),
        expected: "bool",
    })
}

fn parse_enum_ordinal(
    setting_id: &str,
    value: &Value,
    descriptor: &EnumDescriptor,
) -> ResolutionResult<usize> {
    // Choices take precedence over ordinals, so `choices: ["30", "60"]` reads `60` as the second choice.
    let ordinal = match value {
        Value::Number(number) => descriptor
            .ordinal_of_display(&number.to_string())
            .or_else(|| number.as_u64().and_then(|ordinal| usize::try_from(ordinal).ok())),
        Value::String(text) => {
            let text = text.trim();

            descriptor
                .ordinal_of_symbol(text)
                .or_else(|| descriptor.ordinal_of_display(text))
                .or_else(|| text.parse::<usize>().ok())
        }
        _ => None,
    };

    ordinal
        .filter(|ordinal| *ordinal < descriptor.len())
        .ok_or_else(|| ResolutionError::InvalidStoredValue {
            setting_id: setting_id.to_string(),
            value: describe_yaml(value),
            expected: "enum choice",
        })
}

/// Interprets a stored (or default) scalar as `semantic_type`.
pub fn interpret_stored_value(
    setting_id: &str,
    value: &Value,
    semantic_type: &SemanticType,
) -> ResolutionResult<TypedValue> {
    // `!tag value` is read as its untagged value.
    if let Value::Tagged(tagged) = value {
        return interpret_stored_value(setting_id, &tagged.value, semantic_type);
    }

    let typed_value = match semantic_type {
        SemanticType::Bool => TypedValue::Bool(parse_boolean(setting_id, value)?),
        SemanticType::Int => TypedValue::Int(parse_integer(setting_id, value, "int")?),
        SemanticType::Byte => TypedValue::Byte(parse_integer(setting_id, value, "byte")?),
        SemanticType::Short => TypedValue::Short(parse_integer(setting_id, value, "short")?),
        SemanticType::Float => {
            TypedValue::Float(parse_floating::<f32>(setting_id, value, "float")? as f32)
        }
        SemanticType::Double => {
            TypedValue::Double(parse_floating::<f64>(setting_id, value, "double")?)
        }
        SemanticType::String => match value {
            Value::String(text) => TypedValue::String(text.clone()),
            Value::Bool(flag) => TypedValue::String(flag.to_string()),
            Value::Number(number) => TypedValue::String(number.to_string()),
            other => {
                return Err(ResolutionError::InvalidStoredValue {
                    setting_id: setting_id.to_string(),
                    value: describe_yaml(other),
                    expected: "string",
                })
            }
        },
        SemanticType::Enum(descriptor) => TypedValue::Enum {
            ordinal: parse_enum_ordinal(setting_id, value, descriptor)?,
            descriptor: descriptor.clone(),
        },
    };

    Ok(typed_value)
}

/// The value a setting takes when nothing (or null) is stored for it.
pub fn default_value(
    schema: &SettingSchema,
    semantic_type: &SemanticType,
) -> ResolutionResult<TypedValue> {
    if let SemanticType::Enum(descriptor) = semantic_type {
        let ordinal = match schema.default.as_deref() {
            Some(default) => schema
                .choices()
                .and_then(|choices| choices.iter().position(|choice| choice == default))
                .ok_or_else(|| ResolutionError::DefaultNotInChoices {
                    setting_id: schema.id.clone(),
                    default: default.to_string(),
                })?,
            None => 0,
        };

        return Ok(TypedValue::Enum {
            ordinal,
            descriptor: descriptor.clone(),
        });
    }

    match schema.default.as_deref() {
        Some(default) => interpret_stored_value(
            &schema.id,
            &Value::String(default.to_string()),
            semantic_type,
        ),
        None => Ok(TypedValue::zero_of(semantic_type)),
    }
}

/// Combines the stored entry (if any) with the schema into a typed value.
pub fn typed_value_for(
    schema: &SettingSchema,
    semantic_type: &SemanticType,
    stored: Option<&Value>,
) -> ResolutionResult<TypedValue> {
    match stored {
        Some(value) if !value.is_null() => {
            interpret_stored_value(&schema.id, value, semantic_type)
        }
        Some(_) => {
            warn!(
                "Config value {} returned null. Returning default value...",
                schema.id
            );
            default_value(schema, semantic_type)
        }
        None => {
            debug!(
                "Config value {} is not stored. Returning default value...",
                schema.id
            );
            default_value(schema, semantic_type)
        }
    }
}

/// Parses the value document at `value_path` into its entries.
pub fn load_value_document(value_path: &Path) -> ResolutionResult<Mapping> {
    if !value_path.is_file() {
        return Err(ResolutionError::StoreNotFound {
            path: value_path.to_path_buf(),
        });
    }

    let document_text = fs::read_to_string(value_path).map_err(|source| ResolutionError::Io {
        path: value_path.to_path_buf(),
        source,
    })?;

    if document_text.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let document: Value =
        serde_yaml::from_str(&document_text).map_err(|error| ResolutionError::MalformedDocument {
            path: value_path.to_path_buf(),
            detail: error.to_string(),
        })?;

    match document {
        Value::Mapping(entries) => Ok(entries),
        Value::Null => Ok(Mapping::new()),
        other => Err(ResolutionError::MalformedDocument {
            path: value_path.to_path_buf(),
            detail: format!("expected a mapping of setting values, found {}", describe_yaml(&other)),
        }),
    }
}

/// Reads `schema.id` from the value document at `value_path` and coerces it to `representation`.
pub fn read_typed(
    value_path: &Path,
    schema: &SettingSchema,
    type_resolver: &TypeResolver,
    representation: Representation,
) -> ResolutionResult<Coerced> {
    let entries = load_value_document(value_path)?;

    let semantic_type = type_resolver.resolve_type(&schema.type_tag, &schema.id, schema.choices())?;
    debug!("{} is of type {}.", schema.id, semantic_type);

    let typed_value = typed_value_for(schema, &semantic_type, entries.get(schema.id.as_str()))?;
    debug!("{} is equal to {}.", schema.id, typed_value);

    coerce(&schema.id, &typed_value, representation)
}
