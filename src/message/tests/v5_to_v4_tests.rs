//! Unit tests for the protocol 5 to 4 adapter.

use super::adapter_fixtures::{content, downgrade, v5_message};
use crate::message::{
    adapters::{LEGACY_IMPLEMENTATION_KEY, V5ToV4Adapter},
    error::AdaptError,
    ports::{MessageAdapter, TokenResolver},
};
use mockall::mock;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

mock! {
    Resolver {}

    impl TokenResolver for Resolver {
        fn token_at_cursor(&self, code: &str, cursor_pos: usize) -> String;
    }
}

// ============================================================================
// Header and renames
// ============================================================================

#[rstest]
#[case("execute_result", "pyout")]
#[case("execute_input", "pyin")]
#[case("error", "pyerr")]
#[case("inspect_reply", "object_info_reply")]
#[case("status", "status")]
fn renames_message_types(downgrade: V5ToV4Adapter, #[case] from: &str, #[case] to: &str) {
    let adapted = downgrade
        .adapt(v5_message(from, json!({"data": {}})))
        .expect("should adapt");

    assert_eq!(adapted.msg_type(), to);
    assert_eq!(adapted.header().msg_type(), to);
}

#[rstest]
fn strips_header_version(downgrade: V5ToV4Adapter) {
    let adapted = downgrade
        .adapt(v5_message("status", json!({"execution_state": "idle"})))
        .expect("should adapt");

    assert_eq!(adapted.header().version(), None);
    assert_eq!(downgrade.target_version(), "4.1");
}

// ============================================================================
// kernel_info_reply
// ============================================================================

#[rstest]
fn kernel_info_reply_converts_versions_and_implementation(downgrade: V5ToV4Adapter) {
    let message = v5_message(
        "kernel_info_reply",
        json!({
            "protocol_version": "5.0",
            "implementation": "ipython",
            "implementation_version": "3.0.0",
            "language": "python",
            "language_version": "2.7.6",
            "banner": "Python 2.7.6"
        }),
    );

    let adapted = downgrade.adapt(message).expect("should adapt");
    let body = adapted.content();

    assert!(body.get("banner").is_none());
    assert_eq!(body.get("protocol_version"), Some(&json!([5, 0])));
    assert_eq!(body.get("language_version"), Some(&json!([2, 7, 6])));
    assert_eq!(body.get("ipython_version"), Some(&json!("3.0.0")));
    assert!(body.get("implementation").is_none());
    assert!(body.get("implementation_version").is_none());
    assert_eq!(body.get(LEGACY_IMPLEMENTATION_KEY), Some(&json!("python")));
}

#[rstest]
fn kernel_info_reply_keeps_misspelled_legacy_key(downgrade: V5ToV4Adapter) {
    assert_eq!(LEGACY_IMPLEMENTATION_KEY, "implmentation");

    let message = v5_message(
        "kernel_info_reply",
        json!({"language": "julia", "implmentation": "custom"}),
    );
    let adapted = downgrade.adapt(message).expect("should adapt");

    assert_eq!(adapted.content().get("implmentation"), Some(&json!("custom")));
}

#[rstest]
fn kernel_info_reply_drops_other_implementations(downgrade: V5ToV4Adapter) {
    let message = v5_message(
        "kernel_info_reply",
        json!({
            "implementation": "irkernel",
            "implementation_version": "0.4",
            "language": "R"
        }),
    );

    let adapted = downgrade.adapt(message).expect("should adapt");

    assert_eq!(
        adapted.content(),
        &content(json!({"language": "R", "implmentation": "R"}))
    );
}

#[rstest]
fn kernel_info_reply_falls_back_to_language_info(downgrade: V5ToV4Adapter) {
    let message = v5_message(
        "kernel_info_reply",
        json!({"language_info": {"name": "python", "version": "3.4.0"}}),
    );

    let adapted = downgrade.adapt(message).expect("should adapt");

    assert_eq!(adapted.content().get("implmentation"), Some(&json!("python")));
}

#[rstest]
fn kernel_info_reply_without_language_fails(downgrade: V5ToV4Adapter) {
    let result = downgrade.adapt(v5_message("kernel_info_reply", json!({})));

    assert_eq!(
        result,
        Err(AdaptError::missing_field("kernel_info_reply", "language"))
    );
}

// ============================================================================
// execute_request / execute_reply
// ============================================================================

#[rstest]
fn execute_request_defaults_user_variables(downgrade: V5ToV4Adapter) {
    let adapted = downgrade
        .adapt(v5_message("execute_request", json!({"code": "a = 1"})))
        .expect("should adapt");

    assert_eq!(adapted.content().get("user_variables"), Some(&json!([])));
}

#[rstest]
fn execute_request_keeps_existing_user_variables(downgrade: V5ToV4Adapter) {
    let adapted = downgrade
        .adapt(v5_message(
            "execute_request",
            json!({"code": "", "user_variables": ["a"]}),
        ))
        .expect("should adapt");

    assert_eq!(adapted.content().get("user_variables"), Some(&json!(["a"])));
}

#[rstest]
fn execute_reply_defaults_user_variables(downgrade: V5ToV4Adapter) {
    let adapted = downgrade
        .adapt(v5_message(
            "execute_reply",
            json!({"status": "ok", "execution_count": 1, "payload": []}),
        ))
        .expect("should adapt");

    assert_eq!(adapted.content().get("user_variables"), Some(&json!({})));
}

#[rstest]
fn execute_reply_with_payload_is_not_supported(downgrade: V5ToV4Adapter) {
    let result = downgrade.adapt(v5_message(
        "execute_reply",
        json!({
            "status": "ok",
            "payload": [{"source": "page", "data": {"text/plain": "help"}, "start": 0}]
        }),
    ));

    assert!(matches!(
        result,
        Err(AdaptError::NotSupported { ref msg_type, .. }) if msg_type == "execute_reply"
    ));
}

#[rstest]
fn execute_reply_error_status_is_forwarded_untouched(downgrade: V5ToV4Adapter) {
    let body = json!({
        "status": "error",
        "ename": "NameError",
        "evalue": "x",
        "traceback": [],
        "payload": [{"source": "page"}]
    });

    let adapted = downgrade
        .adapt(v5_message("execute_reply", body.clone()))
        .expect("error replies bypass the transform");

    assert_eq!(adapted.content(), &content(body));
}

// ============================================================================
// complete_request / complete_reply
// ============================================================================

#[rstest]
fn complete_request_projects_cell_onto_line(downgrade: V5ToV4Adapter) {
    let adapted = downgrade
        .adapt(v5_message(
            "complete_request",
            json!({"code": "import os\nos.pa", "cursor_pos": 15}),
        ))
        .expect("should adapt");

    assert_eq!(
        adapted.content(),
        &content(json!({
            "text": "",
            "line": "os.pa",
            "block": null,
            "cursor_pos": 5
        }))
    );
}

#[rstest]
#[case(json!({"cursor_pos": 1}), "code")]
#[case(json!({"code": "x"}), "cursor_pos")]
fn complete_request_requires_code_and_cursor(
    downgrade: V5ToV4Adapter,
    #[case] body: Value,
    #[case] field: &str,
) {
    let result = downgrade.adapt(v5_message("complete_request", body));

    assert_eq!(
        result,
        Err(AdaptError::missing_field("complete_request", field))
    );
}

#[rstest]
fn complete_request_rejects_negative_cursor(downgrade: V5ToV4Adapter) {
    let result = downgrade.adapt(v5_message(
        "complete_request",
        json!({"code": "x", "cursor_pos": -1}),
    ));

    assert!(matches!(result, Err(AdaptError::InvalidField { .. })));
}

#[rstest]
fn complete_reply_truncates_first_match(downgrade: V5ToV4Adapter) {
    let adapted = downgrade
        .adapt(v5_message(
            "complete_reply",
            json!({
                "status": "ok",
                "matches": ["foobar", "foobaz"],
                "cursor_start": 3,
                "cursor_end": 6,
                "metadata": {}
            }),
        ))
        .expect("should adapt");

    assert_eq!(
        adapted.content(),
        &content(json!({
            "status": "ok",
            "matches": ["foobar", "foobaz"],
            "matched_text": "foo"
        }))
    );
}

#[rstest]
fn complete_reply_without_matches_fails(downgrade: V5ToV4Adapter) {
    let result = downgrade.adapt(v5_message(
        "complete_reply",
        json!({"status": "ok", "matches": [], "cursor_start": 0, "cursor_end": 0}),
    ));

    assert_eq!(
        result,
        Err(AdaptError::missing_field("complete_reply", "matches[0]"))
    );
}

#[rstest]
fn complete_reply_requires_cursor_span(downgrade: V5ToV4Adapter) {
    let result = downgrade.adapt(v5_message(
        "complete_reply",
        json!({"status": "ok", "matches": ["a"], "cursor_end": 1}),
    ));

    assert_eq!(
        result,
        Err(AdaptError::missing_field("complete_reply", "cursor_start"))
    );
}

// ============================================================================
// inspect_request / inspect_reply
// ============================================================================

#[rstest]
fn inspect_request_resolves_name_through_resolver() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_token_at_cursor()
        .withf(|code, cursor_pos| code == "x = foo(bar" && *cursor_pos == 9)
        .times(1)
        .return_const("foo".to_owned());
    let adapter = V5ToV4Adapter::with_resolver(Arc::new(resolver));

    let adapted = adapter
        .adapt(v5_message(
            "inspect_request",
            json!({"code": "x = foo(bar", "cursor_pos": 9, "detail_level": 1}),
        ))
        .expect("should adapt");

    assert_eq!(adapted.msg_type(), "object_info_request");
    assert_eq!(
        adapted.content(),
        &content(json!({"oname": "foo", "detail_level": 1}))
    );
}

#[rstest]
fn inspect_request_uses_default_resolver(downgrade: V5ToV4Adapter) {
    let adapted = downgrade
        .adapt(v5_message(
            "inspect_request",
            json!({"code": "np.linalg.norm", "cursor_pos": 5, "detail_level": 0}),
        ))
        .expect("should adapt");

    assert_eq!(adapted.content().get("oname"), Some(&json!("np.linalg")));
}

#[rstest]
fn inspect_request_requires_detail_level(downgrade: V5ToV4Adapter) {
    let result = downgrade.adapt(v5_message(
        "inspect_request",
        json!({"code": "x", "cursor_pos": 1}),
    ));

    assert_eq!(
        result,
        Err(AdaptError::missing_field("object_info_request", "detail_level"))
    );
}

#[rstest]
fn inspect_reply_collapses_to_stub(downgrade: V5ToV4Adapter) {
    let adapted = downgrade
        .adapt(v5_message(
            "inspect_reply",
            json!({
                "status": "ok",
                "found": true,
                "data": {"text/plain": "docs"},
                "metadata": {}
            }),
        ))
        .expect("should adapt");

    assert_eq!(adapted.msg_type(), "object_info_reply");
    assert_eq!(
        adapted.content(),
        &content(json!({"found": false, "name": "unknown"}))
    );
}

// ============================================================================
// display_data / input_request
// ============================================================================

#[rstest]
fn display_data_defaults_source_and_encodes_json(downgrade: V5ToV4Adapter) {
    let adapted = downgrade
        .adapt(v5_message(
            "display_data",
            json!({
                "data": {"application/json": {"a": [1, 2]}, "text/plain": "{'a': [1, 2]}"},
                "metadata": {}
            }),
        ))
        .expect("should adapt");
    let body = adapted.content();

    assert_eq!(body.get("source"), Some(&json!("display")));
    assert_eq!(
        body["data"]["application/json"],
        json!(r#"{"a":[1,2]}"#)
    );
    assert_eq!(body["data"]["text/plain"], json!("{'a': [1, 2]}"));
}

#[rstest]
fn display_data_keeps_existing_source(downgrade: V5ToV4Adapter) {
    let adapted = downgrade
        .adapt(v5_message(
            "display_data",
            json!({"source": "IPython.core.display", "data": {}}),
        ))
        .expect("should adapt");

    assert_eq!(
        adapted.content().get("source"),
        Some(&json!("IPython.core.display"))
    );
}

#[rstest]
fn display_data_requires_data(downgrade: V5ToV4Adapter) {
    let result = downgrade.adapt(v5_message("display_data", json!({"metadata": {}})));

    assert_eq!(result, Err(AdaptError::missing_field("display_data", "data")));
}

#[rstest]
fn input_request_drops_password(downgrade: V5ToV4Adapter) {
    let adapted = downgrade
        .adapt(v5_message(
            "input_request",
            json!({"prompt": "Password: ", "password": true}),
        ))
        .expect("should adapt");

    assert_eq!(adapted.content(), &content(json!({"prompt": "Password: "})));
}
