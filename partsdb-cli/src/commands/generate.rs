use std::path::Path;
use std::time::Instant;

use indicatif::{HumanBytes, HumanCount, HumanDuration, ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use partsdb_build::{GenerateProgress, IndexVariant, build_variant, load_settings};
use partsdb_db::SqliteComponentStore;

use crate::CliError;
use crate::cli_types::GenerateArgs;

/// Drives an indicatif bar from pipeline progress.
struct CliGenerateProgress {
    pb: ProgressBar,
}

impl CliGenerateProgress {
    fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "  {spinner:.cyan} [{bar:30.cyan/blue}] {human_pos}/{human_len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
            pb.set_style(style);
            pb
        };
        Self { pb }
    }
}

impl GenerateProgress for CliGenerateProgress {
    fn on_phase(&self, message: &str) {
        log::debug!("{}", message);
        self.pb.set_message(message.to_string());
        self.pb.tick();
    }

    fn on_batch(&self, loaded: u64, total: u64) {
        self.pb.set_length(total);
        self.pb.set_position(loaded);
    }

    fn on_complete(&self, message: &str) {
        self.pb.finish_and_clear();
        log::debug!("{}", message);
    }
}

pub(crate) fn run_generate(
    args: GenerateArgs,
    settings_path: &Path,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = args.overrides.apply(load_settings(settings_path));

    if !settings.source_db.exists() {
        return Err(CliError::config(format!(
            "Component database not found at {}",
            settings.source_db.display()
        )));
    }
    let source = SqliteComponentStore::open(&settings.source_db)
        .map_err(|e| CliError::database(format!("Failed to open component database: {}", e)))?;

    let mut variants: Vec<IndexVariant> = Vec::new();
    for variant in args.variant {
        if !variants.contains(&variant) {
            variants.push(variant);
        }
    }

    for variant in variants {
        log::info!(
            "{}",
            format!(
                "Generating {} in {}",
                variant.file_name(),
                settings.output_dir.display()
            )
            .if_supports_color(Stdout, |t| t.bold()),
        );

        let start = Instant::now();
        let progress = CliGenerateProgress::new(quiet);
        let result = build_variant(&source, variant, &settings, &progress);
        progress.pb.finish_and_clear();
        let (path, report) =
            result.map_err(|e| CliError::build(format!("{} index: {}", variant, e)))?;

        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        log::info!(
            "  {} {} parts in {} categories",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            HumanCount(report.part_count),
            report.category_count,
        );
        log::info!("  {}", report.summary());
        log::info!(
            "  Wrote {} ({})",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            HumanBytes(size),
        );
        log::info!("  Elapsed time: {}", HumanDuration(start.elapsed()));
        crate::log_blank();
    }

    Ok(())
}
