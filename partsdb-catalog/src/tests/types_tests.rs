use super::*;

fn component(stock: i64, basic: bool, preferred: bool, last_on_stock: i64) -> RawComponent {
    RawComponent {
        stock,
        basic,
        preferred,
        last_on_stock,
        ..RawComponent::default()
    }
}

#[test]
fn empty_filter_matches_everything() {
    let filter = ComponentFilter::all();
    assert!(filter.is_empty());
    assert!(filter.matches(&component(0, false, false, 0)));
}

#[test]
fn nothing_filter_matches_nothing() {
    assert!(!ComponentFilter::nothing().matches(&component(10, true, true, 0)));
}

#[test]
fn conditions_are_combined() {
    let filter = ComponentFilter::all()
        .with(FilterCondition::InStock)
        .with(FilterCondition::BasicOrPreferred);
    assert!(filter.matches(&component(5, false, true, 0)));
    assert!(!filter.matches(&component(0, true, false, 0)));
    assert!(!filter.matches(&component(5, false, false, 0)));
}

#[test]
fn duplicate_conditions_are_ignored() {
    let filter = ComponentFilter::all()
        .with(FilterCondition::InStock)
        .with(FilterCondition::InStock);
    assert_eq!(filter.conditions().len(), 1);
}

#[test]
fn obsolete_threshold() {
    let day = 24 * 60 * 60;
    let now = 1_700_000_000;
    let filter = ComponentFilter::all().not_obsolete_for(30, now);
    assert_eq!(
        filter.conditions(),
        &[FilterCondition::NotObsoleteSince { cutoff: now - 30 * day }]
    );

    // Out of stock for 40 days
    assert!(!filter.matches(&component(0, false, false, now - 40 * day)));
    // Out of stock for 10 days
    assert!(filter.matches(&component(0, false, false, now - 10 * day)));
    // In stock, however stale the timestamp
    assert!(filter.matches(&component(3, false, false, 0)));
}

#[test]
fn zero_obsolete_threshold_is_disabled() {
    assert!(ComponentFilter::all().not_obsolete_for(0, 1_700_000_000).is_empty());
}

#[test]
fn categories_sort_case_insensitively() {
    let mut rows = vec![
        CategoryIndexRow::new("resistors", "Chip Resistor"),
        CategoryIndexRow::new("Capacitors", "Tantalum"),
        CategoryIndexRow::new("Resistors", "Array"),
        CategoryIndexRow::new("Capacitors", "aluminum"),
    ];
    sort_categories(&mut rows);
    let pairs: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.first_category.as_str(), r.second_category.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Capacitors", "aluminum"),
            ("Capacitors", "Tantalum"),
            ("Resistors", "Array"),
            ("resistors", "Chip Resistor"),
        ]
    );
}

#[test]
fn library_type_labels_round_trip() {
    for ty in [LibraryType::Basic, LibraryType::Preferred, LibraryType::Extended] {
        assert_eq!(LibraryType::from_label(ty.as_str()), Some(ty));
        assert_eq!(ty.to_string(), ty.as_str());
    }
    assert_eq!(LibraryType::from_label("basic"), None);
}

#[test]
fn metadata_formats() {
    let meta = RunMetadata {
        source_name: "cache.sqlite3".to_string(),
        size_bytes: 4096,
        part_count: 1,
        date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        last_update: NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(7, 5, 3, 120)
            .unwrap(),
    };
    assert_eq!(meta.date_string(), "2024-03-09");
    assert_eq!(meta.last_update_string(), "2024-03-09T07:05:03.000120");
}
