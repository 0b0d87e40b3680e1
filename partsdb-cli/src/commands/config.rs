use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use partsdb_build::{load_settings, save_settings};

use crate::CliError;
use crate::cli_types::BuildOverrides;

/// Show the effective settings.
pub(crate) fn run_config_show(path: &Path) -> Result<(), CliError> {
    let settings = load_settings(path);

    log::info!(
        "{}",
        "Build Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    log::info!("  source_db:                     {}", settings.source_db.display());
    log::info!("  output_dir:                    {}", settings.output_dir.display());
    log::info!("  batch_size:                    {}", settings.batch_size);
    log::info!("  price_cutoff:                  {}", settings.price_cutoff);
    log::info!(
        "  obsolete_parts_threshold_days: {}",
        settings.obsolete_parts_threshold_days
    );

    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path(path: &Path) -> Result<(), CliError> {
    log::info!("{}", path.display());
    Ok(())
}

/// Save the current settings with `overrides` applied.
pub(crate) fn run_config_save(path: &Path, overrides: &BuildOverrides) -> Result<(), CliError> {
    let settings = overrides.apply(load_settings(path));
    save_settings(path, &settings)
        .map_err(|e| CliError::config(format!("Failed to save {}: {}", path.display(), e)))?;
    log::info!(
        "{} Saved settings to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    Ok(())
}
