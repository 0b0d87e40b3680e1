use super::*;

#[test]
fn generate_defaults_to_all_variant() {
    let cli = Cli::try_parse_from(["partsdb", "generate"]).unwrap();
    let Commands::Generate(args) = cli.command else {
        panic!("expected generate");
    };
    assert_eq!(args.variant, vec![IndexVariant::All]);
}

#[test]
fn generate_parses_variant_list_and_overrides() {
    let cli = Cli::try_parse_from([
        "partsdb",
        "--quiet",
        "generate",
        "--variant",
        "basic,current",
        "--batch-size",
        "5000",
        "--price-cutoff",
        "0.005",
        "--obsolete-days",
        "30",
    ])
    .unwrap();
    assert!(cli.quiet);
    let Commands::Generate(args) = cli.command else {
        panic!("expected generate");
    };
    assert_eq!(args.variant, vec![IndexVariant::Basic, IndexVariant::Current]);

    let settings = args.overrides.apply(BuildSettings::default());
    assert_eq!(settings.batch_size, 5000);
    assert_eq!(settings.price_cutoff, Decimal::new(5, 3));
    assert_eq!(settings.obsolete_parts_threshold_days, 30);
    assert_eq!(settings.output_dir, BuildSettings::default().output_dir);
}

#[test]
fn unknown_variant_is_a_usage_error() {
    assert!(Cli::try_parse_from(["partsdb", "generate", "--variant", "everything"]).is_err());
}

#[test]
fn empty_overrides_keep_settings() {
    let settings = BuildSettings {
        batch_size: 42,
        ..BuildSettings::default()
    };
    assert_eq!(BuildOverrides::default().apply(settings.clone()), settings);
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["partsdb", "stats", "parts-fts5.db", "-v", "--logfile", "build.log"])
        .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.logfile, Some(PathBuf::from("build.log")));
    assert!(matches!(cli.command, Commands::Stats { .. }));
}
