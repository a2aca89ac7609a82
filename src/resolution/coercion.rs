//! Conversion of a typed stored value into one of the two numeric
//! representations a script can receive.
//!
//! | semantic type  | as int                  | as float                      |
//! |----------------|-------------------------|-------------------------------|
//! | bool           | `1` / `0`               | `1.0` / `0.0`                 |
//! | int/byte/short | widened                 | widened                       |
//! | float          | truncated toward zero   | as-is                         |
//! | double         | truncated toward zero   | as-is, warns `PrecisionLoss`  |
//! | enum           | ordinal                 | ordinal                       |
//! | string         | error                   | error                         |

use std::{fmt, sync::Arc};

use super::{
    error::{ResolutionError, ResolutionResult, ResolutionWarning},
    types::{EnumDescriptor, SemanticType},
};


/// The numeric representation a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Int,
    Float,
}

impl Representation {
    pub fn from_is_float(requested_is_float: bool) -> Self {
        if requested_is_float {
            Self::Float
        } else {
            Self::Int
        }
    }

    pub fn is_float(self) -> bool {
        self == Self::Float
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Int => f.write_str("int"),
            Representation::Float => f.write_str("float"),
        }
    }
}


/// A resolved numeric setting value.
///
/// Floating point results are kept in double precision here;
/// narrowing to the script's single-precision float happens at the call boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Int(i32),
    Float(f64),
}

impl NumericValue {
    pub fn zero(representation: Representation) -> Self {
        match representation {
            Representation::Int => Self::Int(0),
            Representation::Float => Self::Float(0.0),
        }
    }

    pub fn representation(&self) -> Representation {
        match self {
            NumericValue::Int(_) => Representation::Int,
            NumericValue::Float(_) => Representation::Float,
        }
    }

    pub fn as_i32(&self) -> i32 {
        match *self {
            NumericValue::Int(value) => value,
            NumericValue::Float(value) => value as i32,
        }
    }

    pub fn as_f32(&self) -> f32 {
        match *self {
            NumericValue::Int(value) => value as f32,
            NumericValue::Float(value) => value as f32,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            NumericValue::Int(value) => f64::from(value),
            NumericValue::Float(value) => value,
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Int(value) => write!(f, "{value}"),
            NumericValue::Float(value) => write!(f, "{value}"),
        }
    }
}


/// A stored value after it has been interpreted as its semantic type.
#[derive(Debug, Clone)]
pub enum TypedValue {
    Bool(bool),
    Int(i32),
    Byte(u8),
    Short(i16),
    Float(f32),
    Double(f64),
    String(String),
    Enum {
        ordinal: usize,
        descriptor: Arc<EnumDescriptor>,
    },
}

impl TypedValue {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            TypedValue::Bool(_) => SemanticType::Bool,
            TypedValue::Int(_) => SemanticType::Int,
            TypedValue::Byte(_) => SemanticType::Byte,
            TypedValue::Short(_) => SemanticType::Short,
            TypedValue::Float(_) => SemanticType::Float,
            TypedValue::Double(_) => SemanticType::Double,
            TypedValue::String(_) => SemanticType::String,
            TypedValue::Enum { descriptor, .. } => SemanticType::Enum(descriptor.clone()),
        }
    }

    /// The zero value of `semantic_type`; enums start at their first choice.
    pub fn zero_of(semantic_type: &SemanticType) -> Self {
        match semantic_type {
            SemanticType::Bool => TypedValue::Bool(false),
            SemanticType::Int => TypedValue::Int(0),
            SemanticType::Float => TypedValue::Float(0.0),
            SemanticType::Double => TypedValue::Double(0.0),
            SemanticType::Byte => TypedValue::Byte(0),
            SemanticType::Short => TypedValue::Short(0),
            SemanticType::String => TypedValue::String(String::new()),
            SemanticType::Enum(descriptor) => TypedValue::Enum {
                ordinal: 0,
                descriptor: descriptor.clone(),
            },
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Bool(value) => write!(f, "{value}"),
            TypedValue::Int(value) => write!(f, "{value}"),
            TypedValue::Byte(value) => write!(f, "{value}"),
            TypedValue::Short(value) => write!(f, "{value}"),
            TypedValue::Float(value) => write!(f, "{value}"),
            TypedValue::Double(value) => write!(f, "{value}"),
            TypedValue::String(value) => write!(f, "{value:?}"),
            TypedValue::Enum {
                ordinal,
                descriptor,
            } => match descriptor.value(*ordinal) {
                Some(value) => write!(f, "{} ({})", value.symbol, value.display),
                None => write!(f, "option_{ordinal}"),
            },
        }
    }
}


/// Result of a successful coercion, with the advisory warning it raised, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: NumericValue,
    pub warning: Option<ResolutionWarning>,
}

impl Coerced {
    fn exact(value: NumericValue) -> Self {
        Self {
            value,
            warning: None,
        }
    }
}


/// Converts `value` to the requested `representation`.
pub fn coerce(
    setting_id: &str,
    value: &TypedValue,
    representation: Representation,
) -> ResolutionResult<Coerced> {
    let coerced = match (value, representation) {
        (TypedValue::String(_), _) => {
            return Err(ResolutionError::UnsupportedStringCoercion {
                setting_id: setting_id.to_string(),
            })
        }

        (TypedValue::Bool(flag), Representation::Int) => {
            Coerced::exact(NumericValue::Int(i32::from(*flag)))
        }
        (TypedValue::Bool(flag), Representation::Float) => {
            Coerced::exact(NumericValue::Float(if *flag { 1.0 } else { 0.0 }))
        }

        (TypedValue::Int(number), Representation::Int) => Coerced::exact(NumericValue::Int(*number)),
        (TypedValue::Int(number), Representation::Float) => {
            Coerced::exact(NumericValue::Float(f64::from(*number)))
        }
        (TypedValue::Byte(number), Representation::Int) => {
            Coerced::exact(NumericValue::Int(i32::from(*number)))
        }
        (TypedValue::Byte(number), Representation::Float) => {
            Coerced::exact(NumericValue::Float(f64::from(*number)))
        }
        (TypedValue::Short(number), Representation::Int) => {
            Coerced::exact(NumericValue::Int(i32::from(*number)))
        }
        (TypedValue::Short(number), Representation::Float) => {
            Coerced::exact(NumericValue::Float(f64::from(*number)))
        }

        // `as` truncates toward zero and saturates at the i32 bounds (NaN becomes 0).
        (TypedValue::Float(number), Representation::Int) => {
            Coerced::exact(NumericValue::Int(*number as i32))
        }
        (TypedValue::Float(number), Representation::Float) => {
            Coerced::exact(NumericValue::Float(f64::from(*number)))
        }
        (TypedValue::Double(number), Representation::Int) => {
            Coerced::exact(NumericValue::Int(*number as i32))
        }
        (TypedValue::Double(number), Representation::Float) => Coerced {
            value: NumericValue::Float(*number),
            warning: Some(ResolutionWarning::PrecisionLoss {
                setting_id: setting_id.to_string(),
                value: *number,
            }),
        },

        (TypedValue::Enum { ordinal, .. }, Representation::Int) => {
            Coerced::exact(NumericValue::Int(ordinal_to_i32(*ordinal)))
        }
        (TypedValue::Enum { ordinal, .. }, Representation::Float) => {
            Coerced::exact(NumericValue::Float(f64::from(ordinal_to_i32(*ordinal))))
        }
    };

    Ok(coerced)
}

fn ordinal_to_i32(ordinal: usize) -> i32 {
    i32::try_from(ordinal).unwrap_or(i32::MAX)
}
