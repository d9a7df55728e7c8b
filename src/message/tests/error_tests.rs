//! Unit tests for `AdaptError`.

use crate::message::error::AdaptError;
use rstest::rstest;

#[rstest]
fn missing_field_display_names_type_and_field() {
    let error = AdaptError::missing_field("complete_request", "cursor_pos");

    let display = error.to_string();
    assert!(display.contains("complete_request"));
    assert!(display.contains("cursor_pos"));
}

#[rstest]
fn invalid_field_display_names_expectation() {
    let error = AdaptError::invalid_field("complete_reply", "matches", "a list");

    assert!(error.to_string().contains("expected a list"));
}

#[rstest]
fn not_supported_display_includes_reason() {
    let error = AdaptError::not_supported("execute_reply", "payloads");

    assert!(error.to_string().contains("execute_reply"));
    assert!(error.to_string().contains("payloads"));
}

#[rstest]
fn invalid_version_and_malformed_display() {
    assert!(
        AdaptError::InvalidVersion("x.1".to_owned())
            .to_string()
            .contains("x.1")
    );
    assert!(AdaptError::malformed("no header").to_string().contains("no header"));
}
