//! Setting type tags, their semantic types, and the enum descriptor cache.
//!
//! Enum ("choice") settings don't have a type of their own until one is first
//! requested: the descriptor is synthesized from the schema's `choices` list
//! and then cached by setting id for the rest of the process, so every later
//! resolution of the same setting sees the *same* descriptor
//! (compare with [`EnumDescriptor::is_same_as`]).

use std::{collections::HashMap, fmt, sync::Arc};

use parking_lot::RwLock;
use tracing::debug;

use super::error::{ResolutionError, ResolutionResult};


/// One symbolic value of an enum descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Symbolic name, `option_{ordinal}`.
    pub symbol: String,

    /// The choice string this value is displayed as.
    pub display: String,
}

/// Ordinal-indexed list of symbolic values synthesized from a choice list.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumDescriptor {
    setting_id: String,
    values: Vec<EnumValue>,
}

impl EnumDescriptor {
    fn from_choices(setting_id: &str, choices: &[String]) -> Self {
        let values = choices
            .iter()
            .enumerate()
            .map(|(ordinal, choice)| EnumValue {
                symbol: format!("option_{ordinal}"),
                display: choice.clone(),
            })
            .collect();

        Self {
            setting_id: setting_id.to_string(),
            values,
        }
    }

    pub fn setting_id(&self) -> &str {
        &self.setting_id
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, ordinal: usize) -> Option<&EnumValue> {
        self.values.get(ordinal)
    }

    pub fn ordinal_of_symbol(&self, symbol: &str) -> Option<usize> {
        self.values.iter().position(|value| value.symbol == symbol)
    }

    pub fn ordinal_of_display(&self, display: &str) -> Option<usize> {
        self.values.iter().position(|value| value.display == display)
    }

    /// Identity comparison: `true` only if both handles point at the same cached descriptor.
    pub fn is_same_as(self: &Arc<Self>, other: &Arc<Self>) -> bool {
        Arc::ptr_eq(self, other)
    }
}


/// The logical kind a setting's stored value is interpreted as.
#[derive(Debug, Clone)]
pub enum SemanticType {
    Bool,
    Int,
    Float,
    Double,
    Byte,
    Short,
    String,
    Enum(Arc<EnumDescriptor>),
}

impl SemanticType {
    pub fn name(&self) -> &'static str {
        match self {
            SemanticType::Bool => "bool",
            SemanticType::Int => "int",
            SemanticType::Float => "float",
            SemanticType::Double => "double",
            SemanticType::Byte => "byte",
            SemanticType::Short => "short",
            SemanticType::String => "string",
            SemanticType::Enum(_) => "enum",
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, SemanticType::Enum(_))
    }
}

impl PartialEq for SemanticType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SemanticType::Enum(left), SemanticType::Enum(right)) => left.is_same_as(right),
            (left, right) => std::mem::discriminant(left) == std::mem::discriminant(right),
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Enum(descriptor) => {
                write!(f, "enum<{}; {} choices>", descriptor.setting_id(), descriptor.len())
            }
            other => f.write_str(other.name()),
        }
    }
}


/// Maps declared type tags to [`SemanticType`]s and owns the enum descriptor cache.
///
/// The cache is the only state in the engine that outlives a single resolution.
/// It is guarded by a reader-writer lock: lookups share the read lock,
/// synthesis takes the write lock and re-checks before inserting, so two
/// threads racing on the same setting id always end up with one descriptor.
#[derive(Debug, Default)]
pub struct TypeResolver {
    enum_cache: RwLock<HashMap<String, Arc<EnumDescriptor>>>,
}

impl TypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_type(
        &self,
        type_tag: &str,
        setting_id: &str,
        choices: Option<&[String]>,
    ) -> ResolutionResult<SemanticType> {
        let semantic_type = match type_tag {
            "bool" | "toggle" => SemanticType::Bool,
            "string" | "text" => SemanticType::String,
            "enum" | "choice" => SemanticType::Enum(self.enum_descriptor(setting_id, choices)?),
            "int" | "number" => SemanticType::Int,
            "byte" => SemanticType::Byte,
            "short" => SemanticType::Short,
            "float" => SemanticType::Float,
            "double" => SemanticType::Double,
            _ => {
                return Err(ResolutionError::UnknownTypeTag {
                    type_tag: type_tag.to_string(),
                })
            }
        };

        Ok(semantic_type)
    }

    /// Returns the cached descriptor for `setting_id`, synthesizing it from `choices` on first use.
    ///
    /// Once cached, `choices` is ignored for that id.
    pub fn enum_descriptor(
        &self,
        setting_id: &str,
        choices: Option<&[String]>,
    ) -> ResolutionResult<Arc<EnumDescriptor>> {
        if let Some(descriptor) = self.enum_cache.read().get(setting_id) {
            return Ok(descriptor.clone());
        }

        let choices = match choices {
            Some(choices) if !choices.is_empty() => choices,
            _ => {
                return Err(ResolutionError::EmptyChoiceList {
                    setting_id: setting_id.to_string(),
                })
            }
        };

        let mut cache = self.enum_cache.write();
        let descriptor = cache.entry(setting_id.to_string()).or_insert_with(|| {
            debug!(
                "Synthesizing enum type for {} with {} choices.",
                setting_id,
                choices.len()
            );
            Arc::new(EnumDescriptor::from_choices(setting_id, choices))
        });

        Ok(descriptor.clone())
    }

    pub fn cached_enum_count(&self) -> usize {
        self.enum_cache.read().len()
    }
}
