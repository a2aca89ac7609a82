use std::{
    collections::HashSet,
    fs,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use flowutils_config::{
    resolution::{
        ConfigBackend,
        ConfigResolver,
        NumericValue,
        ResolutionError,
        ResolutionWarning,
        SemanticType,
        TypeResolver,
    },
    FlowFunctions,
    ModHost,
};
use parking_lot::Mutex;
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;


const MOD_ID: &str = "p5rpc.example";


/// Mod loader stand-in rooted in a temporary directory.
struct TestHost {
    root: TempDir,
    enabled_mods: HashSet<String>,
}

impl TestHost {
    fn new(enabled_mods: &[&str]) -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            enabled_mods: enabled_mods.iter().map(|mod_id| mod_id.to_string()).collect(),
        }
    }

    fn write(&self, path: PathBuf, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn write_flat_store(&self, mod_id: &str, contents: &str) {
        self.write(self.config_directory_for(mod_id).join("Config.json"), contents);
    }

    fn write_typed_values(&self, mod_id: &str, contents: &str) {
        self.write(
            self.config_directory_for(mod_id).join("ReMIX/Config/data.yaml"),
            contents,
        );
    }

    fn write_typed_schema(&self, mod_id: &str, contents: &str) {
        self.write(
            self.install_directory_for(mod_id).join("ReMIX/Config/config.yaml"),
            contents,
        );
    }

    fn root(&self) -> &Path {
        self.root.path()
    }
}

impl ModHost for TestHost {
    fn is_mod_active(&self, mod_id: &str) -> bool {
        self.enabled_mods.contains(mod_id)
    }

    fn config_directory_for(&self, mod_id: &str) -> PathBuf {
        self.root().join("User/Mods").join(mod_id)
    }

    fn install_directory_for(&self, mod_id: &str) -> PathBuf {
        self.root().join("Mods").join(mod_id)
    }
}


fn resolver(host: &TestHost) -> ConfigResolver<&TestHost> {
    ConfigResolver::new(host, Arc::new(TypeResolver::new()))
}

const SCHEMA: &str = r#"
metadata:
  author: someone
  pages:
    - title: Gameplay
      blocks: [{ kind: text, body: "long description" }]
settings:
  - id: Difficulty
    name: Difficulty
    type: enum
    choices: [Easy, Normal, Hard]
    default: Normal
  - id: Mode
    type: choice
    choices: [Classic, Modern]
  - id: Strict
    type: enum
    choices: [Lenient, Strict]
    default: Sometimes
  - id: Enabled
    type: toggle
    default: "true"
  - id: Ratio
    type: double
    default: "0.1"
  - id: Scale
    type: float
  - id: Count
    type: short
    default: "-4"
  - id: Title
    type: text
    default: Hello
  - id: FpsCap
    type: enum
    choices: ["30", "60", "120"]
    default: "60"
"#;


/// Formatted log output shared between a scoped subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines_at_level(&self, level: &str) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .filter(|line| line.trim_start().starts_with(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn with_captured_logs<T>(operation: impl FnOnce() -> T) -> (T, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    let output = tracing::subscriber::with_default(subscriber, operation);
    (output, logs)
}


#[test]
fn scenario_a_flat_store_integer() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_flat_store(MOD_ID, r#"{"Volume": 75}"#);

    let resolution = resolver(&host).resolve(MOD_ID, "Volume", false).unwrap();

    assert_eq!(resolution.value, NumericValue::Int(75));
    assert_eq!(resolution.backend, ConfigBackend::Flat);
    assert!(resolution.warnings.is_empty());
}

#[test]
fn scenario_b_flat_store_boolean() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_flat_store(MOD_ID, r#"{"Enabled": true}"#);

    let resolution = resolver(&host).resolve(MOD_ID, "Enabled", false).unwrap();

    assert_eq!(resolution.value, NumericValue::Int(1));
}

#[test]
fn scenario_c_enum_default_from_schema() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    host.write_typed_values(MOD_ID, "Enabled: false\n");

    let resolution = resolver(&host).resolve(MOD_ID, "Difficulty", false).unwrap();

    assert_eq!(resolution.value, NumericValue::Int(1));
    assert_eq!(resolution.backend, ConfigBackend::Typed);
}

#[test]
fn scenario_d_inactive_mod_without_config_is_zero() {
    let host = TestHost::new(&[]);

    let resolution = resolver(&host).resolve(MOD_ID, "Volume", false).unwrap();

    assert_eq!(resolution.value, NumericValue::Int(0));
    assert_eq!(resolution.backend, ConfigBackend::Inactive);

    let as_float = resolver(&host).resolve(MOD_ID, "Volume", true).unwrap();
    assert_eq!(as_float.value, NumericValue::Float(0.0));
}

#[test]
fn scenario_e_active_mod_without_config_fails() {
    let host = TestHost::new(&[MOD_ID]);

    let error = resolver(&host).resolve(MOD_ID, "Volume", false).unwrap_err();

    assert!(matches!(
        error,
        ResolutionError::ConfigMissing { mod_id } if mod_id == MOD_ID
    ));
}


#[test]
fn flat_store_takes_precedence_over_typed_store() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_flat_store(MOD_ID, r#"{"Difficulty": 2}"#);
    host.write_typed_values(MOD_ID, "Difficulty: option_0\n");

    let resolution = resolver(&host).resolve(MOD_ID, "Difficulty", false).unwrap();

    assert_eq!(resolution.value, NumericValue::Int(2));
    assert_eq!(resolution.backend, ConfigBackend::Flat);
}

#[test]
fn flat_store_missing_key_is_not_masked() {
    let host = TestHost::new(&[]);
    host.write_flat_store(MOD_ID, r#"{"Volume": 75}"#);

    let error = resolver(&host).resolve(MOD_ID, "Brightness", false).unwrap_err();

    assert!(matches!(error, ResolutionError::KeyNotFound { .. }));
}

#[test]
fn flat_store_number_parse_follows_requested_representation() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_flat_store(MOD_ID, r#"{"Speed": 1.5}"#);
    let resolver = resolver(&host);

    let as_float = resolver.resolve(MOD_ID, "Speed", true).unwrap();
    assert_eq!(as_float.value, NumericValue::Float(1.5));

    let as_int = resolver.resolve(MOD_ID, "Speed", false).unwrap_err();
    assert!(matches!(as_int, ResolutionError::UnparsableNumber { .. }));
}

#[test]
fn flat_store_float_keeps_double_precision_without_warning() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_flat_store(MOD_ID, r#"{"Ratio": 0.1}"#);

    let resolution = resolver(&host).resolve(MOD_ID, "Ratio", true).unwrap();

    assert_eq!(resolution.value, NumericValue::Float(0.1));
    assert!(resolution.warnings.is_empty());
}

#[test]
fn typed_store_without_schema_fails() {
    let host = TestHost::new(&[]);
    host.write_typed_values(MOD_ID, "Difficulty: option_2\n");

    let error = resolver(&host).resolve(MOD_ID, "Difficulty", false).unwrap_err();

    assert!(matches!(error, ResolutionError::SchemaMissing { .. }));
}

#[test]
fn undeclared_setting_fails() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    host.write_typed_values(MOD_ID, "Volume: 10\n");

    let error = resolver(&host).resolve(MOD_ID, "Volume", false).unwrap_err();

    assert!(matches!(
        error,
        ResolutionError::SettingNotFound { setting_id, .. } if setting_id == "Volume"
    ));
}

#[test]
fn enum_defaults_follow_choice_positions() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    host.write_typed_values(MOD_ID, "Mode: ~\n");
    let resolver = resolver(&host);

    // Explicit null and an unset default both fall back to the first choice.
    let mode = resolver.resolve(MOD_ID, "Mode", false).unwrap();
    assert_eq!(mode.value, NumericValue::Int(0));

    let strict = resolver.resolve(MOD_ID, "Strict", false).unwrap_err();
    assert!(matches!(
        strict,
        ResolutionError::DefaultNotInChoices { default, .. } if default == "Sometimes"
    ));
}

#[test]
fn stored_enum_value_overrides_default() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    host.write_typed_values(MOD_ID, "Difficulty: option_2\n");

    let resolution = resolver(&host).resolve(MOD_ID, "Difficulty", true).unwrap();

    assert_eq!(resolution.value, NumericValue::Float(2.0));
}

#[test]
fn booleans_resolve_to_exactly_one_or_zero() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    let resolver = resolver(&host);

    host.write_typed_values(MOD_ID, "Enabled: ~\n");
    assert_eq!(resolver.resolve(MOD_ID, "Enabled", false).unwrap().value, NumericValue::Int(1));
    assert_eq!(resolver.resolve(MOD_ID, "Enabled", true).unwrap().value, NumericValue::Float(1.0));

    host.write_typed_values(MOD_ID, "Enabled: false\n");
    assert_eq!(resolver.resolve(MOD_ID, "Enabled", false).unwrap().value, NumericValue::Int(0));
    assert_eq!(resolver.resolve(MOD_ID, "Enabled", true).unwrap().value, NumericValue::Float(0.0));
}

#[test]
fn double_as_float_is_exact_and_warns_once_per_call() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    host.write_typed_values(MOD_ID, "Ratio: 0.3333333333333333\n");
    let resolver = resolver(&host);

    for _ in 0..2 {
        let resolution = resolver.resolve(MOD_ID, "Ratio", true).unwrap();

        assert_eq!(resolution.value, NumericValue::Float(0.3333333333333333));
        assert_eq!(
            resolution.warnings,
            vec![ResolutionWarning::PrecisionLoss {
                setting_id: "Ratio".to_string(),
                value: 0.3333333333333333,
            }]
        );
    }

    let as_int = resolver.resolve(MOD_ID, "Ratio", false).unwrap();
    assert_eq!(as_int.value, NumericValue::Int(0));
    assert!(as_int.warnings.is_empty());
}

#[test]
fn precision_loss_is_logged_once_per_call() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    host.write_typed_values(MOD_ID, "Ratio: 0.25\n");
    let resolver = resolver(&host);

    let (resolution, logs) = with_captured_logs(|| resolver.resolve(MOD_ID, "Ratio", true));
    assert!(resolution.is_ok());

    let warnings = logs.lines_at_level("WARN");
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].contains("Ratio"));
    assert!(logs.lines_at_level("ERROR").is_empty());
}

#[test]
fn failures_are_logged_at_error_level() {
    let host = TestHost::new(&[MOD_ID]);
    let resolver = resolver(&host);

    let (resolution, logs) = with_captured_logs(|| resolver.resolve(MOD_ID, "Volume", false));
    assert!(matches!(resolution, Err(ResolutionError::ConfigMissing { .. })));

    let errors = logs.lines_at_level("ERROR");
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0].contains("Volume"));
    assert!(errors[0].contains(MOD_ID));
}

#[test]
fn numeric_looking_choices_resolve_stored_text() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    let resolver = resolver(&host);

    host.write_typed_values(MOD_ID, "FpsCap: \"120\"\n");
    assert_eq!(resolver.resolve(MOD_ID, "FpsCap", false).unwrap().value, NumericValue::Int(2));

    host.write_typed_values(MOD_ID, "FpsCap: ~\n");
    assert_eq!(resolver.resolve(MOD_ID, "FpsCap", false).unwrap().value, NumericValue::Int(1));
}

#[test]
fn float_and_short_settings_coerce_without_warnings() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    host.write_typed_values(MOD_ID, "Scale: 2.75\n");
    let resolver = resolver(&host);

    let scale = resolver.resolve(MOD_ID, "Scale", true).unwrap();
    assert_eq!(scale.value, NumericValue::Float(2.75));
    assert!(scale.warnings.is_empty());

    let scale_as_int = resolver.resolve(MOD_ID, "Scale", false).unwrap();
    assert_eq!(scale_as_int.value, NumericValue::Int(2));

    let count = resolver.resolve(MOD_ID, "Count", true).unwrap();
    assert_eq!(count.value, NumericValue::Float(-4.0));
}

#[test]
fn string_settings_never_resolve_to_numbers() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    host.write_typed_values(MOD_ID, "Title: \"42\"\n");
    let resolver = resolver(&host);

    for requested_is_float in [false, true] {
        let error = resolver.resolve(MOD_ID, "Title", requested_is_float).unwrap_err();
        assert!(matches!(error, ResolutionError::UnsupportedStringCoercion { .. }));
    }
}

#[test]
fn enum_descriptor_identity_is_stable_across_resolutions() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    host.write_typed_values(MOD_ID, "{}\n");
    let resolver = resolver(&host);

    resolver.resolve(MOD_ID, "Difficulty", false).unwrap();
    let first = resolver.type_resolver().enum_descriptor("Difficulty", None).unwrap();

    resolver.resolve(MOD_ID, "Difficulty", true).unwrap();
    resolver.resolve(MOD_ID, "Mode", false).unwrap();
    let second = resolver.type_resolver().enum_descriptor("Difficulty", None).unwrap();

    assert!(first.is_same_as(&second));
    assert_eq!(
        SemanticType::Enum(first),
        SemanticType::Enum(second)
    );
    assert_eq!(resolver.type_resolver().cached_enum_count(), 2);
}

#[test]
fn directories_are_looked_up_on_every_call() {
    let host = TestHost::new(&[]);
    let resolver = resolver(&host);

    assert_eq!(
        resolver.resolve(MOD_ID, "Volume", false).unwrap().value,
        NumericValue::Int(0)
    );

    host.write_flat_store(MOD_ID, r#"{"Volume": 30}"#);
    assert_eq!(
        resolver.resolve(MOD_ID, "Volume", false).unwrap().value,
        NumericValue::Int(30)
    );
}

#[test]
fn flow_functions_narrow_to_script_types() {
    let host = TestHost::new(&[MOD_ID]);
    host.write_typed_schema(MOD_ID, SCHEMA);
    host.write_typed_values(MOD_ID, "Ratio: 0.5\nScale: 1.25\n");
    let functions = FlowFunctions::new(resolver(&host));

    assert_eq!(functions.get_config_float_value(MOD_ID, "Ratio").unwrap(), 0.5);
    assert_eq!(functions.get_config_float_value(MOD_ID, "Scale").unwrap(), 1.25);
    assert_eq!(functions.get_config_int_value(MOD_ID, "Difficulty").unwrap(), 1);
    assert_eq!(functions.is_mod_enabled(MOD_ID), 1);
    assert!(functions.get_config_int_value(MOD_ID, "Title").is_err());
}
