use std::path::Path;

use indicatif::{HumanBytes, HumanCount};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use partsdb_db::SqlitePartsIndex;

use crate::CliError;

pub(crate) fn run_stats(db_path: &Path) -> Result<(), CliError> {
    if !db_path.exists() {
        log::warn!("No parts database found at {}", db_path.display());
        log::info!("Run 'partsdb generate' to create one.");
        return Ok(());
    }

    let index = SqlitePartsIndex::open(db_path)
        .map_err(|e| CliError::database(format!("Failed to open parts database: {}", e)))?;
    let stats = index
        .stats()
        .map_err(|e| CliError::database(format!("Failed to query parts database: {}", e)))?;

    log::info!(
        "{}",
        "Parts Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("  Parts:       {:>10}", HumanCount(stats.parts).to_string());
    log::info!("    Basic:     {:>10}", HumanCount(stats.basic).to_string());
    log::info!("    Preferred: {:>10}", HumanCount(stats.preferred).to_string());
    log::info!("    Extended:  {:>10}", HumanCount(stats.extended).to_string());
    log::info!("  Categories:  {:>10}", stats.categories);

    crate::log_blank();
    match stats.metadata {
        Some(meta) => {
            log::info!("  Built from:  {}", meta.source_name);
            log::info!("  Built on:    {}", meta.last_update_string());
            log::info!("  Size:        {}", HumanBytes(meta.size_bytes));
            if meta.part_count != stats.parts {
                log::warn!(
                    "Metadata records {} parts but the index holds {}",
                    meta.part_count,
                    stats.parts
                );
            }
        }
        None => {
            log::warn!(
                "{}",
                "No build metadata; the build did not finish".if_supports_color(Stdout, |t| t.yellow()),
            );
        }
    }

    Ok(())
}
