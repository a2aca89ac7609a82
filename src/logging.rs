use std::path::Path;

use miette::{miette, Context, IntoDiagnostic, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};


/// Installs the global tracing subscriber: one layer writing to the console,
/// one writing to `{log_file_output_directory}/{log_file_name}`, each with its own filter.
///
/// The returned guard flushes the log file when dropped; keep it alive until exit.
pub fn initialize_tracing(
    console_level_filter: EnvFilter,
    log_file_level_filter: EnvFilter,
    log_file_output_directory: &Path,
    log_file_name: &str,
) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_file_output_directory)
        .into_diagnostic()
        .wrap_err_with(|| {
            miette!(
                "Failed to create log file output directory at {}.",
                log_file_output_directory.display()
            )
        })?;

    let file_appender = tracing_appender::rolling::never(log_file_output_directory, log_file_name);
    let (non_blocking_file_writer, guard) = tracing_appender::non_blocking(file_appender);


    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_level_filter);

    let log_file_layer = fmt::layer()
        .with_writer(non_blocking_file_writer)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_filter(log_file_level_filter);


    tracing_subscriber::registry()
        .with(console_layer)
        .with(log_file_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("Failed to install global tracing subscriber.")?;

    Ok(guard)
}
