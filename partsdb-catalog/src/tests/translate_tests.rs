use super::*;

fn tables() -> (ManufacturerTable, CategoryTable) {
    let manufacturers = ManufacturerTable::from([(1, "UNI-ROYAL".to_string()), (2, "Samsung".to_string())]);
    let categories = CategoryTable::from([
        (10, ("Resistors".to_string(), "Chip Resistor - Surface Mount".to_string())),
        (20, ("Capacitors".to_string(), "Multilayer Ceramic Capacitors MLCC - SMD/SMT".to_string())),
    ]);
    (manufacturers, categories)
}

fn resistor() -> RawComponent {
    RawComponent {
        lcsc: 25744,
        category_id: 10,
        manufacturer_id: 1,
        mfr: "0402WGF1002TCE".to_string(),
        package: "0402".to_string(),
        joints: 2,
        basic: true,
        preferred: false,
        description: "10kΩ ±1% 62.5mW 0402 Chip Resistor - Surface Mount ROHS".to_string(),
        datasheet: "https://example.com/0402WGF1002TCE.pdf".to_string(),
        stock: 1_250_000,
        price: Some(
            r#"[{"qFrom": 1, "qTo": 99, "price": 0.0011}, {"qFrom": 100, "qTo": null, "price": 0.0009}]"#
                .to_string(),
        ),
        extra: None,
        last_on_stock: 0,
    }
}

fn translator() -> ComponentTranslator {
    let (manufacturers, categories) = tables();
    ComponentTranslator::new(manufacturers, categories)
}

// ── translate ───────────────────────────────────────────────────────────────

#[test]
fn translate_builds_all_fields() {
    let part = translator().translate(&resistor()).unwrap().part;

    assert_eq!(part.lcsc_part, "C25744");
    assert_eq!(part.first_category, "Resistors");
    assert_eq!(part.second_category, "Chip Resistor - Surface Mount");
    assert_eq!(part.mfr_part, "0402WGF1002TCE");
    assert_eq!(part.package, "0402");
    assert_eq!(part.solder_joints, 2);
    assert_eq!(part.manufacturer, "UNI-ROYAL");
    assert_eq!(part.library_type, LibraryType::Basic);
    assert_eq!(part.description, "10kΩ ±1% 62.5mW");
    assert_eq!(part.datasheet, "https://example.com/0402WGF1002TCE.pdf");
    assert_eq!(part.price, "1-:0.001");
    assert_eq!(part.stock, "1250000");
}

#[test]
fn translate_reports_price_stats() {
    let translation = translator().translate(&resistor()).unwrap();
    assert_eq!(translation.price_stats.entries, 2);
    assert_eq!(translation.price_stats.cutoff_removed, 1);
    assert_eq!(translation.price_stats.duplicates_removed, 0);
}

#[test]
fn translate_without_price_data() {
    let mut raw = resistor();
    raw.price = None;
    let translation = translator().translate(&raw).unwrap();
    assert_eq!(translation.part.price, "");
    assert_eq!(translation.price_stats.entries, 0);
}

#[test]
fn translate_missing_manufacturer_fails() {
    let mut raw = resistor();
    raw.manufacturer_id = 99;
    let err = translator().translate(&raw).unwrap_err();
    assert!(matches!(
        err,
        TranslateError::MissingManufacturer {
            lcsc: 25744,
            manufacturer_id: 99
        }
    ));
    assert_eq!(err.lcsc(), 25744);
    assert!(err.to_string().contains("C25744"));
}

#[test]
fn translate_missing_category_fails() {
    let mut raw = resistor();
    raw.category_id = 99;
    let err = translator().translate(&raw).unwrap_err();
    assert!(matches!(err, TranslateError::MissingCategory { category_id: 99, .. }));
}

#[test]
fn translate_bad_price_payload_fails() {
    let mut raw = resistor();
    raw.price = Some("{broken".to_string());
    let err = translator().translate(&raw).unwrap_err();
    assert!(matches!(err, TranslateError::Price { lcsc: 25744, .. }));
}

#[test]
fn translate_free_function_matches_translator() {
    let (manufacturers, categories) = tables();
    let part = translate(&resistor(), &manufacturers, &categories).unwrap();
    assert_eq!(part, translator().translate(&resistor()).unwrap().part);
}

#[test]
fn translate_respects_custom_cutoff() {
    // Both breaks survive a zero cutoff, then merge since they round alike
    let translation = translator()
        .with_price_cutoff(Decimal::ZERO)
        .translate(&resistor())
        .unwrap();
    assert_eq!(translation.part.price, "1-:0.001");
    assert_eq!(translation.price_stats.cutoff_removed, 0);
    assert_eq!(translation.price_stats.duplicates_removed, 1);
}

#[test]
fn translate_uses_metadata_description() {
    let mut raw = resistor();
    raw.description = String::new();
    raw.extra = Some(r#"{"description": "X"}"#.to_string());
    let part = translator().translate(&raw).unwrap().part;
    assert!(part.description.contains('X'));
    assert_eq!(part.description, "X not ROHS");
}

// ── Library type ────────────────────────────────────────────────────────────

#[test]
fn library_type_from_flags() {
    assert_eq!(LibraryType::from_flags(true, true), LibraryType::Basic);
    assert_eq!(LibraryType::from_flags(true, false), LibraryType::Basic);
    assert_eq!(LibraryType::from_flags(false, true), LibraryType::Preferred);
    assert_eq!(LibraryType::from_flags(false, false), LibraryType::Extended);
}

#[test]
fn translate_preferred_and_extended() {
    let mut raw = resistor();
    raw.basic = false;
    raw.preferred = true;
    assert_eq!(translator().translate(&raw).unwrap().part.library_type.as_str(), "Preferred");

    raw.preferred = false;
    assert_eq!(translator().translate(&raw).unwrap().part.library_type.as_str(), "Extended");
}

// ── resolve_description ─────────────────────────────────────────────────────

#[test]
fn resolve_prefers_metadata_description() {
    assert_eq!(
        resolve_description("raw", Some(r#"{"description": "from extra"}"#)),
        "from extra"
    );
}

#[test]
fn resolve_falls_back_to_describe_key() {
    assert_eq!(resolve_description("", Some(r#"{"describe": "Describe fallback"}"#)), "Describe fallback");
    assert_eq!(
        resolve_description("", Some(r#"{"description": "first", "describe": "second"}"#)),
        "first"
    );
}

#[test]
fn resolve_ignores_invalid_metadata() {
    assert_eq!(resolve_description("original", Some("invalid json")), "original");
    assert_eq!(resolve_description("original", Some("[1, 2]")), "original");
    assert_eq!(resolve_description("original", Some(r#"{"description": 5}"#)), "original");
}

#[test]
fn resolve_without_usable_keys() {
    assert_eq!(resolve_description("", Some(r#"{"other_key": "value"}"#)), "");
    assert_eq!(resolve_description("", Some("{}")), "");
    assert_eq!(resolve_description("kept", None), "kept");
}

// ── Cleanup ─────────────────────────────────────────────────────────────────

#[test]
fn compliance_token_is_removed() {
    assert_eq!(normalize_compliance("100nF 50V X7R ROHS"), "100nF 50V X7R");
    assert_eq!(normalize_compliance("100nF RoHS 50V"), "100nF 50V");
}

#[test]
fn missing_compliance_token_is_flagged() {
    assert_eq!(normalize_compliance("100nF 50V X7R"), "100nF 50V X7R not ROHS");
}

#[test]
fn flagged_description_is_unchanged() {
    let flagged = normalize_compliance("Relay 5V");
    assert_eq!(normalize_compliance(&flagged), flagged);
}

#[test]
fn scrub_removes_category_and_package() {
    assert_eq!(
        scrub_description(
            "100nF ±10% 50V X7R 0603 Multilayer Ceramic Capacitors MLCC - SMD/SMT",
            "Multilayer Ceramic Capacitors MLCC - SMD/SMT",
            "0603",
        ),
        "100nF ±10% 50V X7R"
    );
}

#[test]
fn scrub_collapses_whitespace() {
    assert_eq!(scrub_description("  a   b \t c  ", "", ""), "a b c");
}

#[test]
fn scrub_is_idempotent() {
    let samples = [
        ("10kΩ  0402 Chip Resistor - Surface Mount not ROHS", "Chip Resistor - Surface Mount", "0402"),
        ("SOT-23 N-Channel MOSFET 30V", "MOSFETs", "SOT-23"),
        ("Chip\tResistor 0805", "Chip Resistor", "0805"),
        ("", "Anything", "0402"),
    ];
    for (text, category, package) in samples {
        let once = scrub_description(text, category, package);
        let twice = scrub_description(&once, category, package);
        assert_eq!(once, twice, "input: {text:?}");
    }
}

#[test]
fn clean_description_of_flagged_part_is_idempotent() {
    let once = clean_description("USB-C receptacle 16P SMD", "USB Connectors", "SMD");
    assert_eq!(once, "USB-C receptacle 16P not ROHS");
    assert_eq!(clean_description(&once, "USB Connectors", "SMD"), once);
}

#[test]
fn remove_ignores_ascii_case() {
    assert_eq!(remove_ignore_ascii_case("a ROHS b rohs", " rohs"), "a b");
    assert_eq!(remove_ignore_ascii_case("Ω rOhS", " ROHS"), "Ω");
}
