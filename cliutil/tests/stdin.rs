//! Options that fall back to standard input.

use std::env;
use std::io::Write;
use std::process::{Command as Process, Stdio};

use anyhow::{Context, Result, ensure};
use clap::Command;
use cliutil::{Flagger, Options, declare_options, populate_options};
use rstest::rstest;

#[derive(Options, Default)]
struct StdinInput {
    #[cliutil("option=body func=stdin")]
    pub body: String,
}

fn load(args: &[&str], stdin: Option<&str>) -> Result<StdinInput> {
    let mut input = StdinInput::default();
    let mut flagger = Flagger::new(Command::new("test"));
    declare_options(&input, &mut flagger)?;
    let mut config = flagger.try_config_from(args.iter().copied())?;
    if let Some(text) = stdin {
        config = config.with_stdin(text);
    }
    populate_options(&mut input, &config)?;
    Ok(input)
}

#[rstest]
#[case(&["test", "--body", "inline"], Some("piped"), "inline")]
#[case(&["test"], Some("piped"), "piped")]
#[case(&["test"], Some(""), "")]
fn value_wins_over_standard_input(
    #[case] args: &[&str],
    #[case] stdin: Option<&str>,
    #[case] expected: &str,
) -> Result<()> {
    let input = load(args, stdin)?;
    ensure!(input.body == expected, "got {:?}", input.body);
    Ok(())
}

/// Set in a re-executed test binary; holds the body the child should read.
const CHILD_EXPECTS: &str = "CLIUTIL_STDIN_CHILD_EXPECTS";

/// Re-run the single test `name` with `stdin` as its real standard input.
///
/// `None` connects the child to the null device.
fn run_in_child(name: &str, stdin: Option<&str>, expected: &str) -> Result<()> {
    let mut child = Process::new(env::current_exe()?)
        .args([name, "--exact", "--test-threads=1"])
        .env(CHILD_EXPECTS, expected)
        .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(text) = stdin {
        child
            .stdin
            .take()
            .context("child standard input")?
            .write_all(text.as_bytes())?;
    }
    let output = child.wait_with_output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    ensure!(
        output.status.success() && stdout.contains("1 passed"),
        "child run of {name} failed:\n{stdout}\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(())
}

/// Bind without substituted input, so the body comes from the process's own
/// standard input.
fn read_in_child(expected: &str) -> Result<()> {
    let input = load(&["test"], None)?;
    ensure!(input.body == expected, "got {:?}", input.body);
    Ok(())
}

#[rstest]
fn null_standard_input_reads_as_empty() -> Result<()> {
    match env::var(CHILD_EXPECTS) {
        Ok(expected) => read_in_child(&expected),
        Err(_) => run_in_child("null_standard_input_reads_as_empty", None, ""),
    }
}

#[rstest]
fn piped_standard_input_fills_the_option() -> Result<()> {
    match env::var(CHILD_EXPECTS) {
        Ok(expected) => read_in_child(&expected),
        Err(_) => run_in_child(
            "piped_standard_input_fills_the_option",
            Some("line one\nline two\n"),
            "line one\nline two\n",
        ),
    }
}
