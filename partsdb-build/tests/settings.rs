use std::path::PathBuf;

use partsdb_build::*;
use rust_decimal::Decimal;

#[test]
fn defaults() {
    let settings = BuildSettings::default();
    assert_eq!(settings.batch_size, 100_000);
    assert_eq!(settings.price_cutoff, Decimal::new(1, 2));
    assert_eq!(settings.obsolete_parts_threshold_days, 0);
    assert_eq!(settings.source_db, PathBuf::from("cache_archive/cache.sqlite3"));
}

#[test]
fn settings_path_ends_in_partsdb_dir() {
    let path = settings_path();
    assert!(path.ends_with("partsdb/settings.toml"));
}

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    let settings = BuildSettings {
        source_db: PathBuf::from("/data/cache.sqlite3"),
        output_dir: PathBuf::from("/data/out"),
        batch_size: 5_000,
        price_cutoff: Decimal::new(5, 3),
        obsolete_parts_threshold_days: 90,
    };

    save_settings(&path, &settings).unwrap();
    assert_eq!(load_settings(&path), settings);
    assert!(!path.with_extension("toml.tmp").exists());
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        load_settings(&dir.path().join("absent.toml")),
        BuildSettings::default()
    );
}

#[test]
fn corrupt_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "batch_size = [not valid").unwrap();

    assert!(matches!(read_settings(&path), Err(SettingsError::Parse(_))));
    assert_eq!(load_settings(&path), BuildSettings::default());
}

#[test]
fn partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "obsolete_parts_threshold_days = 30\nprice_cutoff = \"0.02\"\n").unwrap();

    let settings = load_settings(&path);
    assert_eq!(settings.obsolete_parts_threshold_days, 30);
    assert_eq!(settings.price_cutoff, Decimal::new(2, 2));
    assert_eq!(settings.batch_size, 100_000);
}
