use std::sync::Arc;

use clap::Parser;
use flowutils_config::{
    configuration::Configuration,
    logging::initialize_tracing,
    ConfigResolver,
    DirectoryModHost,
    FlowFunctions,
    TypeResolver,
};
use miette::{Context, Result};
use tracing::info;

use crate::cli::{CLIArgs, CLICommand};

mod cli;


fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    // Load configuration.
    let configuration = match cli_args.configuration_file_path.as_ref() {
        Some(path) => {
            eprintln!("Loading configuration: {}", path.display());
            Configuration::load_from_path(path)
        }
        None => {
            eprintln!("Loading configuration at default path.");
            Configuration::load_from_default_path()
        }
    }
    .wrap_err("Failed to load configuration file.")?;


    let logging_raii_guard = initialize_tracing(
        configuration.logging.console_output_level_filter()?,
        configuration.logging.log_file_output_level_filter()?,
        &configuration.logging.log_file_output_directory,
        &configuration.logging.log_file_name,
    )
    .wrap_err("Failed to initialize tracing.")?;

    info!(
        "Tracing initialized, configuration loaded from {}.",
        configuration.file_path.display()
    );


    let host = DirectoryModHost::from_configuration(&configuration.mods);
    let flow_functions = FlowFunctions::new(ConfigResolver::new(
        host,
        Arc::new(TypeResolver::new()),
    ));

    match cli_args.command {
        CLICommand::GetInt { mod_id, setting_id } => {
            let value = flow_functions
                .get_config_int_value(&mod_id, &setting_id)
                .wrap_err_with(|| format!("GET_CONFIG_INT_VALUE failed for {setting_id} in {mod_id}."))?;

            println!("{value}");
        }
        CLICommand::GetFloat { mod_id, setting_id } => {
            let value = flow_functions
                .get_config_float_value(&mod_id, &setting_id)
                .wrap_err_with(|| format!("GET_CONFIG_FLOAT_VALUE failed for {setting_id} in {mod_id}."))?;

            println!("{value}");
        }
        CLICommand::IsModEnabled { mod_id } => {
            println!("{}", flow_functions.is_mod_enabled(&mod_id));
        }
        CLICommand::SumItemId {
            section,
            id_in_section,
        } => {
            println!("{}", flow_functions.sum_item_id(section, id_in_section));
        }
    }


    drop(logging_raii_guard);
    Ok(())
}
