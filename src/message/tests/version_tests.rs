//! Unit tests for version string conversions.

use crate::message::domain::{major_version, segments_to_version, version_to_segments};
use rstest::rstest;

#[rstest]
#[case("5.0", vec![5, 0])]
#[case("5.0.dev", vec![5, 0])]
#[case("2.7.6", vec![2, 7, 6])]
#[case("3.rc1.4", vec![3, 4])]
#[case("dev", vec![])]
#[case("", vec![])]
fn version_to_segments_drops_non_numeric_parts(#[case] version: &str, #[case] expected: Vec<i64>) {
    assert_eq!(version_to_segments(version), expected);
}

#[rstest]
#[case("5.0.dev", "5.0")]
#[case("4.1", "4.1")]
#[case("1.a.2.b", "1.2")]
#[case("x.y", "")]
fn round_trip_removes_non_numeric_segments(#[case] version: &str, #[case] expected: &str) {
    assert_eq!(segments_to_version(&version_to_segments(version)), expected);
}

#[rstest]
fn segments_to_version_joins_with_dots() {
    assert_eq!(segments_to_version(&[3, 10, 2]), "3.10.2");
    assert_eq!(segments_to_version(&[]), "");
}

#[rstest]
#[case("5.0", Some(5))]
#[case("4", Some(4))]
#[case("5.x", Some(5))]
#[case("five.0", None)]
#[case("", None)]
fn major_version_reads_leading_segment(#[case] version: &str, #[case] expected: Option<u32>) {
    assert_eq!(major_version(version), expected);
}
