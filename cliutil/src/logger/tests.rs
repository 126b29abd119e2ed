//! Unit tests for level filtering and tag formatting.

use rstest::rstest;
use test_helpers::logs::capture_logs;

use super::{LeveledLogger, LogLevel, LogTagError, LogTags, TAG_TRANSACTION_ID};

#[rstest]
#[case("none", LogLevel::None)]
#[case("Fatal", LogLevel::Fatal)]
#[case("ERROR", LogLevel::Error)]
#[case("notice", LogLevel::Notice)]
#[case("debug", LogLevel::Debug)]
#[case("", LogLevel::Info)]
#[case("verbose", LogLevel::Info)]
fn parses_level_names(#[case] name: &str, #[case] expected: LogLevel) {
    assert_eq!(LogLevel::parse(name), expected);
    assert_eq!(name.parse::<LogLevel>(), Ok(expected));
}

#[rstest]
fn levels_are_ordered_by_verbosity() {
    assert!(LogLevel::None < LogLevel::Fatal);
    assert!(LogLevel::Notice < LogLevel::Info);
    assert!(LogLevel::Info < LogLevel::Debug);
}

#[rstest]
#[case("")]
#[case("trans_id")]
#[case("file1")]
fn tag_keys_must_be_letters(#[case] key: &str) {
    assert_eq!(
        LogTags::new().with(key, "v"),
        Err(LogTagError::InvalidKey { key: key.to_owned() })
    );
}

#[rstest]
fn tags_quote_values_with_spaces() -> Result<(), LogTagError> {
    let tags = LogTags::new()
        .with("file", "a.txt")?
        .with("note", "two words")?;
    assert_eq!(tags.to_string(), r#"file=a.txt note="two words""#);
    assert_eq!(tags.get("file"), Some("a.txt"));
    Ok(())
}

#[rstest]
#[case(LogLevel::None, 0)]
#[case(LogLevel::Error, 1)]
#[case(LogLevel::Notice, 2)]
#[case(LogLevel::Info, 3)]
#[case(LogLevel::Debug, 4)]
fn messages_above_the_level_are_dropped(#[case] level: LogLevel, #[case] expected: usize) {
    let logger = LeveledLogger::new(level);
    let ((), logs) = capture_logs(|| {
        logger.error("failed", &"boom");
        logger.notice("noted");
        logger.info("progress");
        logger.debug("detail");
    });
    assert_eq!(logs.lines().count(), expected, "logs were:\n{logs}");
}

#[rstest]
fn events_carry_level_error_and_tags() -> Result<(), LogTagError> {
    let logger = LeveledLogger::new(LogLevel::Debug)
        .with_transaction_id()
        .with_tag("url", "https://example.com")?;
    let id = logger.transaction_id().map(str::to_owned).unwrap_or_default();
    assert_eq!(id.len(), 32);

    let ((), logs) = capture_logs(|| logger.error_if_error("request failed", &Err::<(), _>("timeout")));
    assert!(logs.contains("request failed"), "{logs}");
    assert!(logs.contains("level=\"ERROR\""), "{logs}");
    assert!(logs.contains("error=timeout"), "{logs}");
    assert!(logs.contains(&format!("{TAG_TRANSACTION_ID}={id}")), "{logs}");
    assert!(logs.contains("url=https://example.com"), "{logs}");
    Ok(())
}

#[rstest]
fn error_if_error_ignores_success() {
    let logger = LeveledLogger::new(LogLevel::Debug);
    let ((), logs) = capture_logs(|| logger.error_if_error("unused", &Ok::<(), String>(())));
    assert!(logs.is_empty());
}
