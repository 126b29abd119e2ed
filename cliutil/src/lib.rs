//! Tag-driven binding of struct fields to command-line options.
//!
//! Annotate public fields with a `#[cliutil("...")]` tag, derive
//! [`Options`], and let the binding engine declare a `clap` flag for each
//! field and later write the resolved value back:
//!
//! ```
//! use cliutil::{ConfigSource, Flagger, Options, declare_options, populate_options};
//!
//! #[derive(Options, Default)]
//! struct Args {
//!     #[cliutil("option=retries short=r default=3 usage='attempts before giving up'")]
//!     pub retries: i64,
//!     #[cliutil("option=ids default=1:3")]
//!     pub ids: Vec<i64>,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut args = Args::default();
//! let mut flagger = Flagger::new(clap::Command::new("app")).with_env_prefix("APP");
//! declare_options(&args, &mut flagger)?;
//! let config: ConfigSource = flagger.try_config_from(["app", "-r", "5"])?;
//! populate_options(&mut args, &config)?;
//! assert_eq!(args.retries, 5);
//! assert_eq!(args.ids, [1, 2, 3]);
//! # Ok(())
//! # }
//! ```
//!
//! Values resolve with command-line arguments first, then environment
//! variables named `PREFIX_OPTION_NAME`, then the tag's default.
//!
//! The crate also carries small helpers for command-line tools: a leveled
//! logger over `tracing`, JSON rendering, signal notification, and input
//! validation.

extern crate self as cliutil;

pub use cliutil_macros::Options;

mod binding;
mod cmd;
mod config;
mod error;
mod flagger;
mod handler;
mod logger;
mod parse;
mod registry;
mod render;
mod shutdown;
mod tag;
mod validate;

pub use binding::{
    BindContext, Field, Options, Shape, Slot, Target, Visit, VisitMut, declare_options,
    populate_options,
};
pub use cmd::{handle_error, use_line, write_error};
pub use config::ConfigSource;
pub use error::{BindError, BindResult};
pub use flagger::{FlagBinding, FlagDef, FlagKind, Flagger};
pub use handler::{BuiltinHandler, OptionHandler, OptionKind, read_uri};
pub use logger::{
    LeveledLogger, LogLevel, LogTagError, LogTags, TAG_FILE, TAG_TRANSACTION_ID, TAG_URL,
};
pub use parse::{MAX_LIST_LEN, ParseError, parse_bool, parse_int_slice, sequence};
pub use registry::HandlerRegistry;
pub use render::{
    RenderError, format_json, format_json_with_filter, print_json, print_json_with_filter,
};
pub use shutdown::{ShutdownError, shutdown_listener};
pub use tag::{Tag, is_quotation_mark, keys, parse_key_value};
pub use validate::{has_required_option, has_required_options, has_space, is_letters, is_number};
