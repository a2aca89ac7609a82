//! The typed configuration resolution engine.
//!
//! A mod's settings live in one of two stores:
//! - the flat Reloaded-II store (`Config.json` in the mod's configuration directory),
//!   whose values carry no declared type, or
//! - the ReMIX typed store, a raw value document (`ReMIX/Config/data.yaml` in the
//!   configuration directory) whose types are declared by a schema shipped with the
//!   mod (`ReMIX/Config/config.yaml` in its install directory).
//!
//! [`ConfigResolver::resolve`] picks the store, reads and types the value,
//! and coerces it into the numeric representation the caller asked for.

mod coercion;
mod error;
mod flat_store;
mod resolver;
mod schema;
mod typed_store;
mod types;

pub use coercion::{coerce, Coerced, NumericValue, Representation, TypedValue};
pub use error::{ResolutionError, ResolutionResult, ResolutionWarning};
pub use flat_store::{interpret_flat_value, read_flat, FLAT_STORE_FILE_NAME};
pub use resolver::{ConfigBackend, ConfigResolver, Resolution};
pub use schema::{find_setting, find_setting_in_str, SettingSchema, SETTINGS_SECTION_NAME};
pub use typed_store::{
    default_value,
    interpret_stored_value,
    load_value_document,
    read_typed,
    typed_value_for,
    TYPED_SCHEMA_RELATIVE_PATH,
    TYPED_VALUES_RELATIVE_PATH,
};
pub use types::{EnumDescriptor, EnumValue, SemanticType, TypeResolver};
