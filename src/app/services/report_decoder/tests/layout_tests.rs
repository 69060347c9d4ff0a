//! Tests for column layout construction and row indexing

use crate::app::services::report_decoder::layout::ColumnLayout;
use crate::app::services::variables::is_missing;
use crate::constants::LEGACY_SURFACE_LAYOUT;

#[test]
fn test_from_names_indexing() {
    let layout = ColumnLayout::from_names(&["TT", "FF", "DD"]);

    assert_eq!(layout.len(), 3);
    assert_eq!(layout.index_of("TT"), Some(0));
    assert_eq!(layout.index_of("DD"), Some(2));
    assert_eq!(layout.index_of("RH"), None);
    assert!(layout.has_column("FF"));
    assert!(!layout.has_column("PE"));
}

#[test]
fn test_legacy_layout_matches_constant() {
    let layout = ColumnLayout::legacy_surface();
    assert_eq!(layout.len(), LEGACY_SURFACE_LAYOUT.len());
    for (index, name) in LEGACY_SURFACE_LAYOUT.iter().enumerate() {
        assert_eq!(layout.index_of(name), Some(index));
    }
}

#[test]
fn test_value_lookup() {
    let layout = ColumnLayout::from_names(&["TT", "FF"]);
    let row = [15.0, 5.0];

    assert_eq!(layout.value(&row, "TT"), 15.0);
    assert_eq!(layout.value(&row, "FF"), 5.0);
}

#[test]
fn test_value_absent_column_is_missing() {
    let layout = ColumnLayout::from_names(&["TT"]);
    assert!(is_missing(layout.value(&[15.0], "RH")));
}

#[test]
fn test_value_short_row_is_missing() {
    let layout = ColumnLayout::from_names(&["TT", "FF", "DD"]);
    let row = [15.0];

    assert_eq!(layout.value(&row, "TT"), 15.0);
    assert!(is_missing(layout.value(&row, "FF")));
    assert!(is_missing(layout.value(&row, "DD")));
}

#[test]
fn test_empty_layout() {
    let layout = ColumnLayout::empty();
    assert!(layout.is_empty());
    assert!(is_missing(layout.value(&[1.0, 2.0], "TT")));
}
