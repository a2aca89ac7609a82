//! Command-line interface definitions for the host binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};


/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "flowutils-config",
    author,
    about = "Reads mod configuration values the way flowscripts see them.",
    version
)]
pub struct CLIArgs {
    /// This is the path to the configuration file to use.
    /// If unspecified, this defaults to `./data/configuration.toml`.
    #[arg(
        short = 'c',
        long = "configuration-file-path",
        global = true,
        help = "Path to the configuration file to use. Defaults to ./data/configuration.toml"
    )]
    pub configuration_file_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CLICommand,
}


#[derive(Subcommand)]
pub enum CLICommand {
    /// GET_CONFIG_INT_VALUE: read a setting as an int.
    #[command(name = "get-int")]
    GetInt {
        #[arg(help = "Id of the mod that owns the setting, e.g. p5rpc.example.")]
        mod_id: String,

        #[arg(help = "Id of the setting to read.")]
        setting_id: String,
    },

    /// GET_CONFIG_FLOAT_VALUE: read a setting as a float.
    #[command(name = "get-float")]
    GetFloat {
        #[arg(help = "Id of the mod that owns the setting, e.g. p5rpc.example.")]
        mod_id: String,

        #[arg(help = "Id of the setting to read.")]
        setting_id: String,
    },

    /// IS_MOD_ENABLED: print 1 if the mod is enabled, 0 otherwise.
    #[command(name = "is-mod-enabled")]
    IsModEnabled {
        #[arg(help = "Id of the mod to check.")]
        mod_id: String,
    },

    /// SUM_ITEM_ID: print the global item id of an item within its section.
    #[command(name = "sum-item-id")]
    SumItemId {
        #[arg(help = "Item section index (e.g. 1 for armor, 3 for consumables).")]
        section: i32,

        #[arg(help = "Id of the item within its section.")]
        id_in_section: i32,
    },
}
