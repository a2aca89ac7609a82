//! The mod loader as seen by the resolver: which mods are enabled and where
//! their directories live.

use std::{collections::HashSet, path::PathBuf};

use crate::configuration::ModsConfiguration;


/// Host-provided mod lookup. Answers are never cached by the resolver.
pub trait ModHost {
    /// Whether `mod_id` is currently enabled.
    fn is_mod_active(&self, mod_id: &str) -> bool;

    /// Writable per-mod configuration directory (user settings live here).
    fn config_directory_for(&self, mod_id: &str) -> PathBuf;

    /// Directory the mod is installed into (the schema ships here).
    fn install_directory_for(&self, mod_id: &str) -> PathBuf;
}

impl<H> ModHost for &H
where
    H: ModHost + ?Sized,
{
    fn is_mod_active(&self, mod_id: &str) -> bool {
        (**self).is_mod_active(mod_id)
    }

    fn config_directory_for(&self, mod_id: &str) -> PathBuf {
        (**self).config_directory_for(mod_id)
    }

    fn install_directory_for(&self, mod_id: &str) -> PathBuf {
        (**self).install_directory_for(mod_id)
    }
}


/// [`ModHost`] backed by two root directories with one sub-directory per mod id.
#[derive(Debug, Clone)]
pub struct DirectoryModHost {
    mod_configuration_directory_path: PathBuf,
    mod_installation_directory_path: PathBuf,
    enabled_mods: HashSet<String>,
}

impl DirectoryModHost {
    pub fn new<I, S>(
        mod_configuration_directory_path: PathBuf,
        mod_installation_directory_path: PathBuf,
        enabled_mods: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mod_configuration_directory_path,
            mod_installation_directory_path,
            enabled_mods: enabled_mods.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_configuration(configuration: &ModsConfiguration) -> Self {
        Self::new(
            configuration.mod_configuration_directory_path.clone(),
            configuration.mod_installation_directory_path.clone(),
            configuration.enabled_mods.iter().cloned(),
        )
    }
}

impl ModHost for DirectoryModHost {
    fn is_mod_active(&self, mod_id: &str) -> bool {
        self.enabled_mods.contains(mod_id)
    }

    fn config_directory_for(&self, mod_id: &str) -> PathBuf {
        self.mod_configuration_directory_path.join(mod_id)
    }

    fn install_directory_for(&self, mod_id: &str) -> PathBuf {
        self.mod_installation_directory_path.join(mod_id)
    }
}
