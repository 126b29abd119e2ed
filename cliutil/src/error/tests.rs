//! Unit tests for option context handling on `BindError`.

use rstest::rstest;

use super::BindError;

#[rstest]
fn for_option_wraps_once() {
    let err = BindError::NilValue.for_option("inner").for_option("outer");
    assert_eq!(err.option(), Some("inner"));
    assert!(matches!(err.root_cause(), BindError::NilValue));
}

#[rstest]
#[case(BindError::HandlerNotFound { name: "nope".into() }, "option verbose: option type func not registered: nope")]
#[case(BindError::SchemeNotSupported { scheme: "ftp".into() }, "option verbose: ftp: scheme not supported")]
#[case(BindError::invalid_default("abc", "int"), "option verbose: invalid default \"abc\": expecting int")]
fn option_context_is_rendered(#[case] err: BindError, #[case] expected: &str) {
    assert_eq!(err.for_option("verbose").to_string(), expected);
}

#[rstest]
fn unwrapped_errors_have_no_option() {
    let err = BindError::NotAStruct { type_name: "i64" };
    assert_eq!(err.option(), None);
    assert_eq!(err.to_string(), "i64 passed: value must be a struct");
}
