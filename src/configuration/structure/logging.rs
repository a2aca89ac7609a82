use std::path::PathBuf;

use miette::{miette, Context, IntoDiagnostic, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use super::base_paths::BasePathsConfiguration;
use crate::configuration::{
    traits::ResolvableConfigurationWithContext,
    utilities::replace_placeholders_in_path,
};


const DEFAULT_LOG_FILE_NAME: &str = "flowutils-config.log";

fn default_log_file_name() -> String {
    DEFAULT_LOG_FILE_NAME.to_string()
}


#[derive(Deserialize, Clone, Debug)]
pub(super) struct UnresolvedLoggingConfiguration {
    console_output_level_filter: String,

    log_file_output_level_filter: String,

    log_file_output_directory: String,

    #[serde(default = "default_log_file_name")]
    log_file_name: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfiguration {
    /// `EnvFilter` directives for console output, e.g. `info,flowutils_config=debug`.
    pub console_output_level_filter: String,

    /// `EnvFilter` directives for the log file.
    pub log_file_output_level_filter: String,

    pub log_file_output_directory: PathBuf,

    pub log_file_name: String,
}

fn parse_level_filter(field_name: &str, directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .into_diagnostic()
        .wrap_err_with(|| miette!("Failed to parse field {field_name}: {directives:?}"))
}

impl ResolvableConfigurationWithContext for UnresolvedLoggingConfiguration {
    type Resolved = LoggingConfiguration;
    type Context = BasePathsConfiguration;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved> {
        // Validate the file and console level filters.
        parse_level_filter(
            "console_output_level_filter",
            &self.console_output_level_filter,
        )?;
        parse_level_filter(
            "log_file_output_level_filter",
            &self.log_file_output_level_filter,
        )?;

        if self.log_file_name.trim().is_empty() {
            return Err(miette!("Field log_file_name must not be empty."));
        }


        let log_file_output_directory = replace_placeholders_in_path(
            self.log_file_output_directory,
            context.placeholders_map(),
        );


        Ok(Self::Resolved {
            console_output_level_filter: self.console_output_level_filter,
            log_file_output_level_filter: self.log_file_output_level_filter,
            log_file_output_directory,
            log_file_name: self.log_file_name,
        })
    }
}

impl LoggingConfiguration {
    pub fn console_output_level_filter(&self) -> Result<EnvFilter> {
        parse_level_filter(
            "console_output_level_filter",
            &self.console_output_level_filter,
        )
    }

    pub fn log_file_output_level_filter(&self) -> Result<EnvFilter> {
        parse_level_filter(
            "log_file_output_level_filter",
            &self.log_file_output_level_filter,
        )
    }
}
