//! ReMIX schema (`config.yaml`) model and the single-setting lookup.
//!
//! A schema document is a mapping of top-level sections. Only the `settings`
//! section is of interest here; every other section is skipped as the parser
//! streams past it, without building a value for it.

use std::{fmt, fs, path::Path};

use serde::{
    de::{DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor},
    Deserialize,
    Deserializer,
};
use tracing::{debug, trace};

use super::error::{ResolutionError, ResolutionResult};


/// Name of the reserved schema section that declares settings.
pub const SETTINGS_SECTION_NAME: &str = "settings";

const DEFAULT_TYPE_TAG: &str = "bool";

fn default_type_tag() -> String {
    DEFAULT_TYPE_TAG.to_string()
}


/// One declared setting.
///
/// `list`, `value_on` and `value_off` are only meaningful to non-numeric
/// consumers of the schema and are carried through untouched.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SettingSchema {
    pub id: String,

    #[serde(rename = "type", default = "default_type_tag")]
    pub type_tag: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub category: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_scalar_as_text")]
    pub default: Option<String>,

    #[serde(default)]
    pub list: Option<String>,

    #[serde(default)]
    pub value_on: Option<String>,

    #[serde(default)]
    pub value_off: Option<String>,

    #[serde(default)]
    pub choices: Option<Vec<String>>,
}

/// `category: ~` is read like an absent category.
fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `default: 75` as well as `default: "75"`.
fn deserialize_scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;

    match value {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(text)) => Ok(Some(text)),
        Some(serde_yaml::Value::Bool(boolean)) => Ok(Some(boolean.to_string())),
        Some(serde_yaml::Value::Number(number)) => Ok(Some(number.to_string())),
        Some(_) => Err(serde::de::Error::custom(
            "expected a scalar default value",
        )),
    }
}

impl SettingSchema {
    pub fn choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }
}


/// Scans the top-level sections of a schema document for `setting_id`.
struct SchemaScan<'a> {
    setting_id: &'a str,
}

impl<'de, 'a> DeserializeSeed<'de> for SchemaScan<'a> {
    type Value = Option<SettingSchema>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, 'a> Visitor<'de> for SchemaScan<'a> {
    type Value = Option<SettingSchema>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a schema mapping of top-level sections")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        // Empty document.
        Ok(None)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut found: Option<SettingSchema> = None;

        while let Some(section_name) = map.next_key::<String>()? {
            if found.is_none() && section_name == SETTINGS_SECTION_NAME {
                debug!("Deserializing schema settings section.");
                found = map.next_value_seed(SettingsSectionScan {
                    setting_id: self.setting_id,
                })?;
            } else {
                trace!("Skipping schema {} section...", section_name);
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(found)
    }
}


/// Walks the `settings` sequence and keeps the first entry with a matching id.
struct SettingsSectionScan<'a> {
    setting_id: &'a str,
}

impl<'de, 'a> DeserializeSeed<'de> for SettingsSectionScan<'a> {
    type Value = Option<SettingSchema>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, 'a> Visitor<'de> for SettingsSectionScan<'a> {
    type Value = Option<SettingSchema>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of setting definitions")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        // `settings:` with no entries.
        Ok(None)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut found: Option<SettingSchema> = None;

        while found.is_none() {
            let Some(setting) = seq.next_element::<SettingSchema>()? else {
                return Ok(None);
            };

            if setting.id == self.setting_id {
                found = Some(setting);
            }
        }

        // The parser still has to move past the remaining entries.
        while seq.next_element::<IgnoredAny>()?.is_some() {}

        Ok(found)
    }
}


/// Parses a schema document from text and returns the definition of `setting_id`, if declared.
pub fn find_setting_in_str(
    schema_text: &str,
    setting_id: &str,
) -> Result<Option<SettingSchema>, serde_yaml::Error> {
    if schema_text.trim().is_empty() {
        return Ok(None);
    }

    SchemaScan { setting_id }.deserialize(serde_yaml::Deserializer::from_str(schema_text))
}

/// Reads the schema document at `schema_path` and returns the definition of `setting_id`.
pub fn find_setting(schema_path: &Path, setting_id: &str) -> ResolutionResult<SettingSchema> {
    if !schema_path.is_file() {
        return Err(ResolutionError::StoreNotFound {
            path: schema_path.to_path_buf(),
        });
    }

    let schema_text = fs::read_to_string(schema_path).map_err(|source| ResolutionError::Io {
        path: schema_path.to_path_buf(),
        source,
    })?;

    let setting = find_setting_in_str(&schema_text, setting_id).map_err(|error| {
        ResolutionError::MalformedDocument {
            path: schema_path.to_path_buf(),
            detail: error.to_string(),
        }
    })?;

    setting.ok_or_else(|| ResolutionError::SettingNotFound {
        setting_id: setting_id.to_string(),
        path: schema_path.to_path_buf(),
    })
}



#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SCHEMA: &str = r#"
name: Example Mod
changelog:
  - version: 1.0.0
    notes:
      - "first release"
      - nested: { deeply: [1, 2, 3] }
settings:
  - id: Volume
    name: Music volume
    type: int
    default: "75"
  - id: Difficulty
    type: enum
    category: Gameplay
    choices: [Easy, Normal, Hard]
    default: Normal
  - id: Verbose
    value_on: "1"
    value_off: "0"
  - id: Difficulty
    type: int
"#;

    #[test]
    fn finds_setting_after_skipping_unrelated_sections() {
        let setting = find_setting_in_str(SCHEMA, "Difficulty").unwrap().unwrap();

        assert_eq!(setting.id, "Difficulty");
        assert_eq!(setting.type_tag, "enum");
        assert_eq!(setting.category, "Gameplay");
        assert_eq!(setting.default.as_deref(), Some("Normal"));
        assert_eq!(
            setting.choices(),
            Some(&["Easy".to_string(), "Normal".to_string(), "Hard".to_string()][..])
        );
    }

    #[test]
    fn first_matching_id_wins() {
        let setting = find_setting_in_str(SCHEMA, "Difficulty").unwrap().unwrap();

        assert_ne!(setting.type_tag, "int");
    }

    #[test]
    fn type_defaults_to_bool_and_display_fields_are_kept() {
        let setting = find_setting_in_str(SCHEMA, "Verbose").unwrap().unwrap();

        assert_eq!(setting.type_tag, "bool");
        assert_eq!(setting.value_on.as_deref(), Some("1"));
        assert_eq!(setting.value_off.as_deref(), Some("0"));
        assert_eq!(setting.default, None);
        assert_eq!(setting.category, "");
    }

    #[test]
    fn missing_id_or_section_yields_none() {
        assert_eq!(find_setting_in_str(SCHEMA, "volume").unwrap(), None);
        assert_eq!(
            find_setting_in_str("name: Only metadata\n", "Volume").unwrap(),
            None
        );
        assert_eq!(find_setting_in_str("settings:\n", "Volume").unwrap(), None);
        assert_eq!(find_setting_in_str("", "Volume").unwrap(), None);
    }

    #[test]
    fn null_category_reads_as_empty() {
        let schema = "settings:\n  - id: Hidden\n    category: ~\n  - id: Flag\n    category:\n";

        let flag = find_setting_in_str(schema, "Flag").unwrap().unwrap();
        assert_eq!(flag.category, "");

        let hidden = find_setting_in_str(schema, "Hidden").unwrap().unwrap();
        assert_eq!(hidden.category, "");
    }

    #[test]
    fn unrelated_sections_are_not_validated() {
        // `extras` would not deserialize as a list of settings, but is never looked at.
        let schema = "extras: { a: [1, 2], b: { id: 3 } }\nsettings:\n  - id: Flag\n";

        let setting = find_setting_in_str(schema, "Flag").unwrap().unwrap();
        assert_eq!(setting.type_tag, "bool");
    }

    #[test]
    fn unquoted_scalar_defaults_are_read_as_text() {
        let schema = "settings:\n  - id: Count\n    type: int\n    default: 12\n  - id: On\n    default: true\n";

        let count = find_setting_in_str(schema, "Count").unwrap().unwrap();
        assert_eq!(count.default.as_deref(), Some("12"));

        let on = find_setting_in_str(schema, "On").unwrap().unwrap();
        assert_eq!(on.default.as_deref(), Some("true"));
    }

    #[test]
    fn accepts_json_style_documents() {
        let schema = r#"{"settings": [{"id": "Speed", "type": "float", "default": "1.5"}]}"#;

        let setting = find_setting_in_str(schema, "Speed").unwrap().unwrap();
        assert_eq!(setting.type_tag, "float");
    }

    #[test]
    fn reading_a_missing_file_reports_store_not_found() {
        let directory = tempfile::tempdir().unwrap();

        let error = find_setting(&directory.path().join("config.yaml"), "Volume").unwrap_err();
        assert!(error.is_store_not_found());
    }

    #[test]
    fn reading_from_disk_reports_unknown_setting() {
        let mut schema_file = tempfile::NamedTempFile::new().unwrap();
        schema_file.write_all(SCHEMA.as_bytes()).unwrap();

        let volume = find_setting(schema_file.path(), "Volume").unwrap();
        assert_eq!(volume.default.as_deref(), Some("75"));

        let error = find_setting(schema_file.path(), "Brightness").unwrap_err();
        assert!(matches!(
            error,
            ResolutionError::SettingNotFound { setting_id, .. } if setting_id == "Brightness"
        ));
    }

    #[test]
    fn malformed_schema_is_reported() {
        let mut schema_file = tempfile::NamedTempFile::new().unwrap();
        schema_file.write_all(b"settings: [ { id: Broken").unwrap();

        let error = find_setting(schema_file.path(), "Broken").unwrap_err();
        assert!(matches!(error, ResolutionError::MalformedDocument { .. }));
    }
}
