use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;


/// Everything that can make a single setting resolution fail.
///
/// None of these are retried; they propagate straight to the caller
/// of [`ConfigResolver::resolve`][super::ConfigResolver::resolve].
#[derive(Error, Diagnostic, Debug)]
pub enum ResolutionError {
    #[error("Store document does not exist: {}.", .path.display())]
    #[diagnostic(code(flowutils::resolution::store_not_found))]
    StoreNotFound { path: PathBuf },

    #[error("Key \"{key}\" is not present in {}.", .path.display())]
    #[diagnostic(
        code(flowutils::resolution::key_not_found),
        help("Keys are matched exactly, including case.")
    )]
    KeyNotFound { key: String, path: PathBuf },

    #[error("Setting \"{setting_id}\" is not declared in schema {}.", .path.display())]
    #[diagnostic(code(flowutils::resolution::setting_not_found))]
    SettingNotFound { setting_id: String, path: PathBuf },

    #[error("Missing schema file for {mod_id} (expected at {}).", .path.display())]
    #[diagnostic(
        code(flowutils::resolution::schema_missing),
        help("A ReMIX value document was found, but the mod does not ship its config.yaml.")
    )]
    SchemaMissing { mod_id: String, path: PathBuf },

    #[error("Missing config file for {mod_id}.")]
    #[diagnostic(
        code(flowutils::resolution::config_missing),
        help("The mod is enabled, but neither a Config.json nor a ReMIX data.yaml exists for it.")
    )]
    ConfigMissing { mod_id: String },

    #[error("Unknown setting type: {type_tag}.")]
    #[diagnostic(
        code(flowutils::resolution::unknown_type_tag),
        help("Valid types are bool, toggle, string, text, enum, choice, int, number, byte, short, float and double.")
    )]
    UnknownTypeTag { type_tag: String },

    #[error("\"Choice\" setting must have at least 1 choice: {setting_id}.")]
    #[diagnostic(code(flowutils::resolution::empty_choice_list))]
    EmptyChoiceList { setting_id: String },

    #[error("Default \"{default}\" of setting {setting_id} is not one of its choices.")]
    #[diagnostic(code(flowutils::resolution::default_not_in_choices))]
    DefaultNotInChoices { setting_id: String, default: String },

    #[error("Config value {key} is of unsupported kind: {kind}.")]
    #[diagnostic(code(flowutils::resolution::unsupported_value_kind))]
    UnsupportedValueKind { key: String, kind: &'static str },

    #[error("Failed to parse config value {key} ({value}) as {expected}.")]
    #[diagnostic(code(flowutils::resolution::unparsable_number))]
    UnparsableNumber {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("Config value {setting_id} is a string and cannot be read as a number.")]
    #[diagnostic(code(flowutils::resolution::unsupported_string_coercion))]
    UnsupportedStringCoercion { setting_id: String },

    #[error("Config value {setting_id} ({value}) is not a valid {expected}.")]
    #[diagnostic(code(flowutils::resolution::invalid_stored_value))]
    InvalidStoredValue {
        setting_id: String,
        value: String,
        expected: &'static str,
    },

    #[error("Failed to parse {}: {detail}", .path.display())]
    #[diagnostic(code(flowutils::resolution::malformed_document))]
    MalformedDocument { path: PathBuf, detail: String },

    #[error("Failed to read {}.", .path.display())]
    #[diagnostic(code(flowutils::resolution::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolutionError {
    /// `true` only for the one kind the resolver treats as an expected branch signal.
    pub fn is_store_not_found(&self) -> bool {
        matches!(self, Self::StoreNotFound { .. })
    }
}


/// Non-fatal conditions noticed while resolving a setting.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionWarning {
    /// A `double` setting was narrowed to the single-precision float the caller asked for.
    PrecisionLoss { setting_id: String, value: f64 },
}

impl std::fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrecisionLoss { setting_id, value } => write!(
                f,
                "Attempted to read double value {setting_id} ({value}) as float; precision may be lost."
            ),
        }
    }
}


pub type ResolutionResult<T> = Result<T, ResolutionError>;
