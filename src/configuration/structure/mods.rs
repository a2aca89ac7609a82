use std::{collections::HashSet, path::PathBuf};

use miette::{miette, Result};
use serde::Deserialize;
use tracing::warn;

use super::BasePathsConfiguration;
use crate::configuration::{
    traits::ResolvableConfigurationWithContext,
    utilities::replace_placeholders_in_path,
};


#[derive(Deserialize, Clone, Debug)]
pub(super) struct UnresolvedModsConfiguration {
    mod_configuration_directory_path: String,

    mod_installation_directory_path: String,

    #[serde(default)]
    enabled_mods: Vec<String>,
}

/// Where the mod loader keeps mods and their user configuration,
/// and which mods are currently enabled.
#[derive(Clone, Debug)]
pub struct ModsConfiguration {
    /// Each mod's writable configuration directory is `{this}/{mod id}`.
    pub mod_configuration_directory_path: PathBuf,

    /// Each mod's install directory is `{this}/{mod id}`.
    pub mod_installation_directory_path: PathBuf,

    pub enabled_mods: Vec<String>,
}


impl ResolvableConfigurationWithContext for UnresolvedModsConfiguration {
    type Resolved = ModsConfiguration;
    type Context = BasePathsConfiguration;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved> {
        let mod_configuration_directory_path = replace_placeholders_in_path(
            self.mod_configuration_directory_path,
            context.placeholders_map(),
        );

        let mod_installation_directory_path = replace_placeholders_in_path(
            self.mod_installation_directory_path,
            context.placeholders_map(),
        );

        for directory_path in [
            &mod_configuration_directory_path,
            &mod_installation_directory_path,
        ] {
            if directory_path.exists() && !directory_path.is_dir() {
                return Err(miette!(
                    "Mod directory path {} exists, but is not a directory!",
                    directory_path.display()
                ));
            }
        }


        let mut seen_mod_ids = HashSet::with_capacity(self.enabled_mods.len());
        let mut enabled_mods = Vec::with_capacity(self.enabled_mods.len());

        for mod_id in self.enabled_mods {
            if mod_id.trim().is_empty() {
                return Err(miette!("Field enabled_mods contains an empty mod id."));
            }

            if !seen_mod_ids.insert(mod_id.clone()) {
                warn!("Mod {} is listed in enabled_mods more than once.", mod_id);
                continue;
            }

            enabled_mods.push(mod_id);
        }


        Ok(Self::Resolved {
            mod_configuration_directory_path,
            mod_installation_directory_path,
            enabled_mods,
        })
    }
}

impl ModsConfiguration {
    pub fn is_mod_enabled(&self, mod_id: &str) -> bool {
        self.enabled_mods.iter().any(|enabled_mod| enabled_mod == mod_id)
    }
}
