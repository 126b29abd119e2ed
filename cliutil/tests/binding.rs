//! Declare-then-populate behaviour of the binding engine.
//!
//! Covers nested and flattened structs, defaults, command-line and
//! environment precedence, metadata overrides, custom handlers, and the
//! error cases surfaced by the walk.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc::{self, Sender};

use anyhow::{Result, anyhow, ensure};
use clap::Command;
use cliutil::{
    BindContext, BindError, BindResult, ConfigSource, FlagDef, Flagger, OptionHandler, Options,
    Slot, Tag, declare_options, populate_options,
};
use rstest::{fixture, rstest};
use test_helpers::jail::with_jail;

#[derive(Options, Default)]
struct InputNested {
    #[cliutil("option=value-one short=O default='some value' usage='value one usage'")]
    pub value_one: String,
}

#[derive(Options, Default)]
struct InputNestedPtr {
    #[cliutil("option=value-two default=1")]
    pub value_two: i64,
}

#[derive(Options, Default)]
struct InputEmbedded {
    #[cliutil("option=value-three default=true")]
    pub value_three: bool,
}

#[derive(Options, Default)]
struct InputEmbeddedPtr {
    #[cliutil("option=value-four default=2.5")]
    pub value_four: f64,
}

#[derive(Options, Default)]
struct Input {
    #[cliutil(nested)]
    pub input_nested: InputNested,
    #[cliutil(nested)]
    pub input_nested_ptr: Option<Box<InputNestedPtr>>,
    #[cliutil(nested)]
    pub input_embedded: InputEmbedded,
    #[cliutil(nested)]
    pub input_embedded_ptr: Option<Box<InputEmbeddedPtr>>,
    #[cliutil("option=value-five default=1,2,3")]
    pub value_five: Vec<i64>,
}

fn full_input() -> Input {
    Input {
        input_nested_ptr: Some(Box::default()),
        input_embedded_ptr: Some(Box::default()),
        ..Input::default()
    }
}

#[fixture]
fn flagger() -> Flagger {
    Flagger::new(Command::new("test")).with_env_prefix("CLIUTIL_TEST")
}

fn bind<T: cliutil::Target>(
    cx: &BindContext,
    value: &mut T,
    mut flagger: Flagger,
    args: &[&str],
) -> Result<()> {
    cx.declare_options(value, &mut flagger)?;
    let config = flagger.try_config_from(args.iter().copied())?;
    cx.populate_options(value, &config)?;
    Ok(())
}

#[rstest]
fn defaults_populate_every_nested_field(flagger: Flagger) -> Result<()> {
    let mut input = full_input();
    bind(&BindContext::new(), &mut input, flagger, &["test"])?;

    ensure!(input.input_nested.value_one == "some value");
    ensure!(input.input_nested_ptr.as_ref().is_some_and(|p| p.value_two == 1));
    ensure!(input.input_embedded.value_three);
    ensure!(
        input
            .input_embedded_ptr
            .as_ref()
            .is_some_and(|p| p.value_four.to_bits() == 2.5_f64.to_bits())
    );
    ensure!(input.value_five == [1, 2, 3]);
    Ok(())
}

#[rstest]
fn declared_flags_follow_field_order(mut flagger: Flagger) -> Result<()> {
    let input = full_input();
    declare_options(&input, &mut flagger)?;
    let names: Vec<&str> = flagger
        .command()
        .get_arguments()
        .map(|arg| arg.get_id().as_str())
        .collect();
    ensure!(
        names == ["value-one", "value-two", "value-three", "value-four", "value-five"],
        "declared {names:?}"
    );
    let short = flagger.flag("value-one").and_then(|f| f.short());
    ensure!(short == Some('O'));
    Ok(())
}

#[rstest]
fn empty_nested_options_are_skipped(mut flagger: Flagger) -> Result<()> {
    let mut input = Input::default();
    declare_options(&input, &mut flagger)?;
    ensure!(flagger.flag("value-two").is_none());
    ensure!(flagger.flag("value-four").is_none());
    let config = flagger.try_config_from(["test"])?;
    populate_options(&mut input, &config)?;
    ensure!(input.input_nested_ptr.is_none());
    ensure!(input.input_nested.value_one == "some value");
    Ok(())
}

#[rstest]
fn command_line_then_env_then_default(flagger: Flagger) -> Result<()> {
    with_jail(|j| {
        j.set_env("CLIUTIL_TEST_VALUE_ONE", "from env");
        j.set_env("CLIUTIL_TEST_VALUE_TWO", "20");
        let mut input = full_input();
        bind(
            &BindContext::new(),
            &mut input,
            flagger,
            &["test", "-O", "from cli", "--value-three=false", "--value-five", "7:9"],
        )?;
        ensure!(input.input_nested.value_one == "from cli");
        ensure!(input.input_nested_ptr.as_ref().is_some_and(|p| p.value_two == 20));
        ensure!(!input.input_embedded.value_three);
        ensure!(input.value_five == [7, 8, 9]);
        Ok(())
    })
}

#[derive(Options, Default)]
struct Pointers {
    #[cliutil("option=boxed default=world")]
    pub boxed: Box<String>,
    #[cliutil("option=maybe default=7")]
    pub maybe: Option<i64>,
    #[cliutil("option=absent default=x")]
    pub absent: Option<Box<String>>,
    #[cliutil("option=ids default=1:2")]
    pub ids: Option<Box<Vec<i64>>>,
}

#[rstest]
fn pointer_fields_bind_their_pointee(mut flagger: Flagger) -> Result<()> {
    let mut pointers = Pointers {
        maybe: Some(0),
        ids: Some(Box::default()),
        ..Pointers::default()
    };
    declare_options(&pointers, &mut flagger)?;
    ensure!(flagger.flag("boxed").is_some());
    ensure!(flagger.flag("maybe").is_some());
    ensure!(flagger.flag("absent").is_none(), "empty options declare nothing");

    let config = flagger.try_config_from(["test", "--maybe", "9"])?;
    populate_options(&mut pointers, &config)?;
    ensure!(*pointers.boxed == "world");
    ensure!(pointers.maybe == Some(9));
    ensure!(pointers.absent.is_none());
    ensure!(pointers.ids.as_deref().is_some_and(|ids| *ids == [1, 2]));
    Ok(())
}

#[rstest]
fn empty_pointer_fields_are_left_alone(mut flagger: Flagger) -> Result<()> {
    let mut pointers = Pointers::default();
    declare_options(&pointers, &mut flagger)?;
    ensure!(flagger.bindings().keys().map(String::as_str).eq(["boxed"]));
    let config = flagger.try_config_from(["test"])?;
    populate_options(&mut pointers, &config)?;
    ensure!(pointers.maybe.is_none());
    ensure!(pointers.ids.is_none());
    Ok(())
}

#[rstest]
fn metadata_fills_missing_tag_keys(flagger: Flagger) -> Result<()> {
    #[derive(Options, Default)]
    struct Sparse {
        #[cliutil("option=level default=2")]
        pub level: i64,
        #[cliutil("option=name")]
        pub name: String,
    }

    let mut cx = BindContext::new();
    cx.set_option_metadata("level", Tag::parse("default=9 short=l usage='verbosity'"));
    cx.set_option_metadata("name", Tag::parse("default=anon"));

    let mut sparse = Sparse::default();
    bind(&cx, &mut sparse, flagger, &["test"])?;
    ensure!(sparse.level == 2, "field tag must win over metadata");
    ensure!(sparse.name == "anon");
    Ok(())
}

struct Upper {
    tag: Tag,
}

impl OptionHandler for Upper {
    fn declare(&self, flagger: &mut Flagger) -> BindResult<()> {
        let default = self.tag.default_value().unwrap_or_default();
        flagger.string(&FlagDef::from_tag(&self.tag), default)
    }

    fn populate(&self, config: &ConfigSource, slot: Slot<'_>) -> BindResult<()> {
        let name = self.tag.option().unwrap_or_default();
        *slot.downcast::<String>()? = config.get_string(name).to_uppercase();
        Ok(())
    }
}

#[rstest]
fn custom_handlers_are_dispatched_by_func(flagger: Flagger) -> Result<()> {
    #[derive(Options, Default)]
    struct Shout {
        #[cliutil("option=word func=upper default=hello")]
        pub word: String,
    }

    let mut cx = BindContext::new();
    cx.register("upper", |tag| Box::new(Upper { tag }));
    let mut shout = Shout::default();
    bind(&cx, &mut shout, flagger, &["test"])?;
    ensure!(shout.word == "HELLO");
    Ok(())
}

#[rstest]
fn key_value_and_bool_string_handlers(flagger: Flagger) -> Result<()> {
    #[derive(Options, Default)]
    struct Extras {
        #[cliutil("option=labels")]
        pub labels: HashMap<String, String>,
        #[cliutil("option=enabled func=boolstring default=f")]
        pub enabled: bool,
    }

    let mut extras = Extras::default();
    bind(
        &BindContext::new(),
        &mut extras,
        flagger,
        &["test", "--labels", "env=prod team='core infra'", "--enabled", "T"],
    )?;
    ensure!(extras.labels.get("team").map(String::as_str) == Some("core infra"));
    ensure!(extras.labels.get("env").map(String::as_str) == Some("prod"));
    ensure!(extras.enabled);
    Ok(())
}

fn root_cause(result: Result<()>) -> Result<BindError> {
    let err = result.err().ok_or_else(|| anyhow!("binding unexpectedly succeeded"))?;
    err.downcast::<BindError>()
        .map_err(|other| anyhow!("unexpected error type: {other}"))
}

#[rstest]
fn unknown_func_is_reported_with_option(flagger: Flagger) -> Result<()> {
    #[derive(Options, Default)]
    struct Bad {
        #[cliutil("option=thing func=nope")]
        pub thing: String,
    }

    let err = root_cause(bind(&BindContext::new(), &mut Bad::default(), flagger, &["test"]))?;
    ensure!(err.option() == Some("thing"));
    ensure!(matches!(err.root_cause(), BindError::HandlerNotFound { name } if name == "nope"));
    ensure!(err.to_string() == "option thing: option type func not registered: nope");
    Ok(())
}

#[rstest]
fn unsupported_shapes_are_rejected(flagger: Flagger) -> Result<()> {
    #[derive(Options)]
    struct Chan {
        #[cliutil("option=events")]
        pub events: Sender<()>,
    }

    let (events, _receiver) = mpsc::channel();
    let err = root_cause(bind(&BindContext::new(), &mut Chan { events }, flagger, &["test"]))?;
    ensure!(matches!(err.root_cause(), BindError::TypeNotSupported { .. }), "got {err}");
    Ok(())
}

#[rstest]
fn invalid_defaults_abort_declare(mut flagger: Flagger) -> Result<()> {
    #[derive(Options, Default)]
    struct Count {
        #[cliutil("option=count default=many")]
        pub count: i64,
    }

    let err = declare_options(&Count::default(), &mut flagger)
        .err()
        .ok_or_else(|| anyhow!("declare unexpectedly succeeded"))?;
    ensure!(err.option() == Some("count"));
    ensure!(matches!(
        err.root_cause(),
        BindError::InvalidDefault { value, expected: "int" } if value == "many"
    ));
    Ok(())
}

#[rstest]
fn roots_must_be_structs(mut flagger: Flagger) -> Result<()> {
    let err = declare_options(&42_i64, &mut flagger)
        .err()
        .ok_or_else(|| anyhow!("integers are not structs"))?;
    ensure!(matches!(err, BindError::NotAStruct { .. }));

    let none: Option<Box<Input>> = None;
    let err = declare_options(&none, &mut flagger)
        .err()
        .ok_or_else(|| anyhow!("empty roots are nil"))?;
    ensure!(matches!(err, BindError::NilValue));
    Ok(())
}

#[rstest]
fn shared_nested_structs_fail_to_populate(mut flagger: Flagger) -> Result<()> {
    #[derive(Options, Default)]
    struct Holder {
        #[cliutil(nested)]
        pub shared: Rc<InputNested>,
    }

    let mut holder = Holder::default();
    declare_options(&holder, &mut flagger)?;
    let config = flagger.try_config_from(["test"])?;
    let _alias = Rc::clone(&holder.shared);
    let err = populate_options(&mut holder, &config)
        .err()
        .ok_or_else(|| anyhow!("shared value must not be settable"))?;
    ensure!(matches!(err, BindError::NotSettable { .. }), "got {err}");
    Ok(())
}

#[rstest]
fn mismatched_func_reports_field_types(flagger: Flagger) -> Result<()> {
    #[derive(Options, Default)]
    struct Wrong {
        #[cliutil("option=flag func=boolstring default=true")]
        pub flag: String,
    }

    let err = root_cause(bind(&BindContext::new(), &mut Wrong::default(), flagger, &["test"]))?;
    ensure!(matches!(err.root_cause(), BindError::FieldMismatch { .. }), "got {err}");
    Ok(())
}
