use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, error, info, warn};

use super::{
    coercion::{coerce, Coerced, NumericValue, Representation},
    error::{ResolutionError, ResolutionResult, ResolutionWarning},
    flat_store::{read_flat, FLAT_STORE_FILE_NAME},
    schema::find_setting,
    typed_store::{read_typed, TYPED_SCHEMA_RELATIVE_PATH, TYPED_VALUES_RELATIVE_PATH},
    types::TypeResolver,
};
use crate::host::ModHost;


/// Which backing store a resolution was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigBackend {
    /// Reloaded-II `Config.json`.
    Flat,

    /// ReMIX `data.yaml` + `config.yaml`.
    Typed,

    /// No store exists and the mod is not enabled.
    Inactive,
}

impl fmt::Display for ConfigBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigBackend::Flat => f.write_str("R2"),
            ConfigBackend::Typed => f.write_str("ReMIX"),
            ConfigBackend::Inactive => f.write_str("inactive mod"),
        }
    }
}


/// A successfully resolved setting.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub value: NumericValue,

    pub backend: ConfigBackend,

    /// Advisory conditions raised (and already logged) during this resolution.
    pub warnings: Vec<ResolutionWarning>,
}

impl Resolution {
    fn from_coerced(coerced: Coerced, backend: ConfigBackend) -> Self {
        Self {
            value: coerced.value,
            backend,
            warnings: coerced.warning.into_iter().collect(),
        }
    }
}


/// Resolves a mod's setting into a number, whichever backend stores it.
///
/// Store locations are looked up through the [`ModHost`] on every call.
pub struct ConfigResolver<H>
where
    H: ModHost,
{
    host: H,
    type_resolver: Arc<TypeResolver>,
}

impl<H> ConfigResolver<H>
where
    H: ModHost,
{
    pub fn new(host: H, type_resolver: Arc<TypeResolver>) -> Self {
        Self {
            host,
            type_resolver,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn type_resolver(&self) -> &TypeResolver {
        &self.type_resolver
    }

    pub fn flat_store_path(&self, mod_id: &str) -> PathBuf {
        self.host
            .config_directory_for(mod_id)
            .join(FLAT_STORE_FILE_NAME)
    }

    pub fn typed_values_path(&self, mod_id: &str) -> PathBuf {
        join_all(
            self.host.config_directory_for(mod_id),
            &TYPED_VALUES_RELATIVE_PATH,
        )
    }

    pub fn typed_schema_path(&self, mod_id: &str) -> PathBuf {
        join_all(
            self.host.install_directory_for(mod_id),
            &TYPED_SCHEMA_RELATIVE_PATH,
        )
    }

    /// Resolves `setting_id` of `mod_id` as an int, or as a float if `requested_is_float`.
    ///
    /// A mod with no config at all resolves to zero if it isn't enabled.
    /// Every failure is logged before it is returned.
    pub fn resolve(
        &self,
        mod_id: &str,
        setting_id: &str,
        requested_is_float: bool,
    ) -> ResolutionResult<Resolution> {
        let representation = Representation::from_is_float(requested_is_float);

        let resolution = self
            .resolve_as(mod_id, setting_id, representation)
            .map_err(|resolution_error| {
                error!(
                    "Failed to read config value {} for {}: {}",
                    setting_id, mod_id, resolution_error
                );
                resolution_error
            })?;

        for warning in &resolution.warnings {
            warn!("{}", warning);
        }

        debug!(
            "Config value {} in {} is equal to {} ({}).",
            setting_id, mod_id, resolution.value, resolution.backend
        );

        Ok(resolution)
    }

    fn resolve_as(
        &self,
        mod_id: &str,
        setting_id: &str,
        representation: Representation,
    ) -> ResolutionResult<Resolution> {
        let flat_store_path = self.flat_store_path(mod_id);
        if flat_store_path.is_file() {
            debug!("R2 config file found for {}.", mod_id);
            return self.resolve_flat(&flat_store_path, setting_id, representation);
        }

        let typed_values_path = self.typed_values_path(mod_id);
        if typed_values_path.is_file() {
            debug!("ReMIX config file found for {}.", mod_id);

            let typed_schema_path = self.typed_schema_path(mod_id);
            if !typed_schema_path.is_file() {
                return Err(ResolutionError::SchemaMissing {
                    mod_id: mod_id.to_string(),
                    path: typed_schema_path,
                });
            }

            debug!("ReMIX schema file found for {}.", mod_id);
            return self.resolve_typed(
                &typed_values_path,
                &typed_schema_path,
                setting_id,
                representation,
            );
        }

        warn!(
            "Failed to find config file for {} (is this mod installed and enabled?)",
            mod_id
        );

        if self.host.is_mod_active(mod_id) {
            return Err(ResolutionError::ConfigMissing {
                mod_id: mod_id.to_string(),
            });
        }

        Ok(Resolution {
            value: NumericValue::zero(representation),
            backend: ConfigBackend::Inactive,
            warnings: Vec::new(),
        })
    }

    fn resolve_flat(
        &self,
        flat_store_path: &Path,
        setting_id: &str,
        representation: Representation,
    ) -> ResolutionResult<Resolution> {
        info!(
            "Attempting to read {} value from R2 config.",
            representation
        );

        let typed_value = read_flat(flat_store_path, setting_id, representation)?;
        let coerced = coerce(setting_id, &typed_value, representation)?;

        // Flat literals declare no precision, so reading one as a float loses nothing.
        Ok(Resolution::from_coerced(
            Coerced {
                warning: None,
                ..coerced
            },
            ConfigBackend::Flat,
        ))
    }

    fn resolve_typed(
        &self,
        typed_values_path: &Path,
        typed_schema_path: &Path,
        setting_id: &str,
        representation: Representation,
    ) -> ResolutionResult<Resolution> {
        info!(
            "Attempting to read {} value from ReMIX config.",
            representation
        );

        let schema = find_setting(typed_schema_path, setting_id)?;
        let coerced = read_typed(
            typed_values_path,
            &schema,
            &self.type_resolver,
            representation,
        )?;

        Ok(Resolution::from_coerced(coerced, ConfigBackend::Typed))
    }
}


fn join_all(base: PathBuf, components: &[&str]) -> PathBuf {
    components
        .iter()
        .fold(base, |path, component| path.join(component))
}
