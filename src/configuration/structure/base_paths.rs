use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use miette::{miette, Context, IntoDiagnostic, Result};
use serde::Deserialize;

use crate::configuration::traits::ResolvableConfigurationWithContext;


/// Placeholder that other path fields may use to refer to the base data directory.
pub const BASE_DATA_DIRECTORY_PLACEHOLDER: &str = "{BASE_DATA_DIRECTORY}";


#[derive(Deserialize, Debug)]
pub(super) struct UnresolvedBasePathsConfiguration {
    pub(crate) base_data_directory_path: String,
}

#[derive(Debug, Clone)]
pub struct BasePathsConfiguration {
    pub base_data_directory_path: PathBuf,
}

impl ResolvableConfigurationWithContext for UnresolvedBasePathsConfiguration {
    type Resolved = BasePathsConfiguration;

    /// Directory of the configuration file; relative paths are resolved against it.
    type Context = PathBuf;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved> {
        let configured_path = Path::new(&self.base_data_directory_path);

        let base_data_directory_path = if configured_path.is_relative() {
            context.join(configured_path)
        } else {
            configured_path.to_path_buf()
        };

        if base_data_directory_path.exists() && !base_data_directory_path.is_dir() {
            return Err(miette!(
                "Base data directory path {} exists, but is not a directory!",
                base_data_directory_path.display()
            ));
        }

        if !base_data_directory_path.is_dir() {
            std::fs::create_dir_all(&base_data_directory_path)
                .into_diagnostic()
                .wrap_err("Failed to create missing base data directory.")?;
        }


        let base_data_directory_path = dunce::canonicalize(base_data_directory_path)
            .into_diagnostic()
            .wrap_err("Failed to canonicalize base data directory path.")?;


        Ok(BasePathsConfiguration {
            base_data_directory_path,
        })
    }
}


impl BasePathsConfiguration {
    pub fn placeholders_map(&self) -> HashMap<&'static str, String> {
        let mut placeholders_map = HashMap::with_capacity(1);

        placeholders_map.insert(
            BASE_DATA_DIRECTORY_PLACEHOLDER,
            self.base_data_directory_path.to_string_lossy().to_string(),
        );

        placeholders_map
    }
}
