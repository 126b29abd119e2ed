//! Unit tests for flag declaration and command-line resolution.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface unexpected results"
)]

use anyhow::{Result, ensure};
use clap::Command;
use rstest::{fixture, rstest};
use test_helpers::jail::with_jail;

use super::{FlagDef, FlagKind, Flagger};
use crate::error::BindError;

#[fixture]
fn flagger() -> Flagger {
    let mut flagger = Flagger::new(Command::new("demo")).with_env_prefix("DEMO");
    flagger
        .string(&FlagDef::new("name").with_short('n').with_usage("who to greet"), "world")
        .expect("declare name");
    flagger
        .int(&FlagDef::new("count"), 1)
        .expect("declare count");
    flagger
        .bool(&FlagDef::new("verbose").with_short('v'), false)
        .expect("declare verbose");
    flagger
        .persistent_float64(&FlagDef::new("ratio"), 0.25)
        .expect("declare ratio");
    flagger
}

#[rstest]
fn records_declared_flags(flagger: Flagger) {
    let name = flagger.flag("name").expect("name is declared");
    assert_eq!(name.kind(), FlagKind::String);
    assert_eq!(name.short(), Some('n'));
    assert_eq!(name.default_value(), "world");
    assert!(!name.is_persistent());
    assert!(flagger.flag("ratio").is_some_and(|f| f.is_persistent()));
    assert_eq!(
        flagger.bindings().keys().map(String::as_str).collect::<Vec<_>>(),
        ["count", "name", "ratio", "verbose"]
    );
    let help = flagger.command().clone().render_help().to_string();
    assert!(help.contains("who to greet"), "help was {help}");
}

#[rstest]
fn rejects_duplicate_names_and_shorthands(mut flagger: Flagger) {
    let by_name = flagger.int(&FlagDef::new("count"), 2).expect_err("duplicate name");
    assert!(matches!(by_name, BindError::DuplicateFlag { ref name } if name == "count"));
    let by_short = flagger
        .bool(&FlagDef::new("vivid").with_short('v'), false)
        .expect_err("duplicate shorthand");
    assert!(matches!(by_short, BindError::DuplicateFlag { ref name } if name == "-v"));
}

#[rstest]
#[case(&["demo"], false)]
#[case(&["demo", "--verbose"], true)]
#[case(&["demo", "-v"], true)]
#[case(&["demo", "--verbose=false"], false)]
#[case(&["demo", "--verbose=true"], true)]
fn bool_flags_accept_optional_values(
    flagger: Flagger,
    #[case] args: &[&str],
    #[case] expected: bool,
) -> Result<()> {
    let config = flagger.try_config_from(args.iter().copied())?;
    ensure!(config.get_bool("verbose")? == expected);
    ensure!(config.is_set("verbose") == (args.len() > 1));
    Ok(())
}

#[rstest]
fn command_line_overrides_env_and_defaults(flagger: Flagger) -> Result<()> {
    with_jail(|j| {
        j.set_env("DEMO_NAME", "env-name");
        j.set_env("DEMO_COUNT", "5");
        let config = flagger.try_config_from(["demo", "-n", "cli-name"])?;
        ensure!(config.get_string("name") == "cli-name");
        ensure!(config.get_int("count")? == 5);
        ensure!(config.get_float64("ratio")?.to_bits() == 0.25_f64.to_bits());
        ensure!(!config.is_set("ratio"));
        ensure!(config.is_declared("ratio"));
        Ok(())
    })
}

#[rstest]
fn persistent_flags_reach_subcommands(flagger: Flagger) -> Result<()> {
    let mut root = Flagger::new(Command::new("root"));
    root.persistent_string(&FlagDef::new("profile"), "dev")?;
    let command = flagger.attach_to(root.into_command());
    let matches = command.try_get_matches_from(["root", "demo", "--profile", "prod"])?;
    let (name, sub) = matches.subcommand().ok_or_else(|| anyhow::anyhow!("no subcommand"))?;
    ensure!(name == "demo");
    let config = flagger.config_source(sub);
    ensure!(config.get_string("name") == "world");
    ensure!(sub.get_one::<String>("profile").map(String::as_str) == Some("prod"));
    Ok(())
}

#[rstest]
fn unknown_arguments_are_clap_errors(flagger: Flagger) {
    let err = flagger
        .try_config_from(["demo", "--nope"])
        .expect_err("unknown flag");
    assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
}

#[rstest]
fn flag_def_from_tag_uses_first_short_char() {
    let tag = crate::Tag::parse("option=value-one short=Ox usage='value one usage'");
    let def = FlagDef::from_tag(&tag);
    assert_eq!(def.name(), "value-one");
    assert_eq!(def.short(), Some('O'));
    assert_eq!(def.usage(), "value one usage");
}

#[rstest]
fn short_h_takes_over_from_help() -> Result<()> {
    let mut flagger = Flagger::new(Command::new("demo"));
    flagger.string(&FlagDef::new("host").with_short('h'), "localhost")?;
    let config = flagger.try_config_from(["demo", "-h", "example"])?;
    ensure!(config.get_string("host") == "example");
    let err = flagger
        .try_config_from(["demo", "--help"])
        .expect_err("long help still prints help");
    ensure!(err.kind() == clap::error::ErrorKind::DisplayHelp);
    Ok(())
}

#[rstest]
fn a_flag_named_help_replaces_the_builtin() -> Result<()> {
    let mut flagger = Flagger::new(Command::new("demo"));
    flagger.bool(&FlagDef::new("help"), false)?;
    let config = flagger.try_config_from(["demo", "--help"])?;
    ensure!(config.get_bool("help")?);
    Ok(())
}

#[rstest]
fn help_cannot_be_claimed_after_its_shorthand() -> Result<()> {
    let mut flagger = Flagger::new(Command::new("demo"));
    flagger.string(&FlagDef::new("host").with_short('h'), "localhost")?;
    let err = flagger
        .bool(&FlagDef::new("help"), false)
        .expect_err("help is still the long help flag");
    ensure!(matches!(err, BindError::DuplicateFlag { ref name } if name == "help"));
    Ok(())
}

#[rstest]
fn short_v_takes_over_from_version() -> Result<()> {
    let mut flagger = Flagger::new(Command::new("demo").version("1.0.0"));
    flagger.bool(&FlagDef::new("verbose").with_short('V'), false)?;
    let config = flagger.try_config_from(["demo", "-V"])?;
    ensure!(config.get_bool("verbose")?);
    let err = flagger
        .try_config_from(["demo", "--version"])
        .expect_err("long version still prints the version");
    ensure!(err.kind() == clap::error::ErrorKind::DisplayVersion);
    Ok(())
}
