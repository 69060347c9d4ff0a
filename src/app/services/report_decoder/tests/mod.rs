//! Test fixtures and helpers for report decoder testing
//!
//! Fixture builders produce minimal but well-formed report file content in
//! both the legacy fixed layout and the named-column layout.

mod layout_tests;

/// A version-4 forecast report: two stations, TT/FF/DD/PE columns, no levels
pub fn forecast_v4_content() -> String {
    "2 0 4\n\
     4\n\
     TT 2\n\
     FF 1\n\
     DD 0\n\
     PE 1\n\
     1001 60.10 24.90 15.0 5.0 270.0 2.5\n\
     1002 59.50 25.10 14.2 3.1 180.0 0.0\n"
        .to_string()
}

/// A version-4 observation report: same stations with a height column
pub fn observation_v4_content() -> String {
    "2 0 4\n\
     4\n\
     TT 2\n\
     FF 1\n\
     DD 0\n\
     PE1 1\n\
     1001 60.10 24.90 12.0 14.0 4.0 260.0 0.3\n\
     1002 59.50 25.10 55.0 13.8 2.9 190.0 0.0\n"
        .to_string()
}

/// A version-4 forecast report with one upper-air station of two levels
pub fn forecast_with_levels_content() -> String {
    "1 1 4\n\
     1\n\
     TT 2\n\
     2001 60.00 25.00 10.0\n\
     2\n\
     3\n\
     PP 0\n\
     TT 2\n\
     RH 0\n\
     2001\n\
     925.0 8.5 80.0\n\
     850.0 4.0 70.0\n"
        .to_string()
}
