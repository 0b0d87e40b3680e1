use partsdb_build::*;
use partsdb_catalog::{ComponentFilter, FilterCondition};

const NOW: i64 = 1_700_000_000;
const DAY: i64 = 24 * 60 * 60;

#[test]
fn names_parse_back() {
    for variant in IndexVariant::VARIANTS {
        assert_eq!(variant.name().parse::<IndexVariant>().unwrap(), variant);
        assert_eq!(variant.to_string(), variant.name());
    }
    assert_eq!("BASIC".parse::<IndexVariant>().unwrap(), IndexVariant::Basic);
}

#[test]
fn unknown_name_is_rejected() {
    let err = "everything".parse::<IndexVariant>().unwrap_err();
    assert!(err.to_string().contains("everything"));
}

#[test]
fn file_names() {
    assert_eq!(IndexVariant::Basic.file_name(), "parts-basic-fts5.db");
    assert_eq!(IndexVariant::All.file_name(), "parts-fts5.db");
    assert_eq!(IndexVariant::Current.file_name(), "parts-current-fts5.db");
    assert_eq!(IndexVariant::Empty.file_name(), "parts-empty-fts5.db");
}

#[test]
fn filters_without_threshold() {
    assert_eq!(IndexVariant::All.filter(0, NOW), ComponentFilter::all());
    assert_eq!(
        IndexVariant::Basic.filter(0, NOW).conditions(),
        &[FilterCondition::BasicOrPreferred]
    );
    assert_eq!(IndexVariant::Empty.filter(0, NOW), ComponentFilter::nothing());
    assert_eq!(
        IndexVariant::Current.filter(0, NOW).conditions(),
        &[FilterCondition::NotObsoleteSince {
            cutoff: NOW - i64::from(DEFAULT_CURRENT_THRESHOLD_DAYS) * DAY
        }]
    );
}

#[test]
fn threshold_applies_to_every_variant_but_empty() {
    let expected = FilterCondition::NotObsoleteSince { cutoff: NOW - 30 * DAY };
    for variant in [IndexVariant::Basic, IndexVariant::All, IndexVariant::Current] {
        assert!(variant.filter(30, NOW).conditions().contains(&expected), "{variant}");
    }
    assert_eq!(IndexVariant::Empty.filter(30, NOW), ComponentFilter::nothing());
}
