//! The binding context and the declare/populate entry points.

use std::collections::HashMap;

use super::{Field, Shape, Slot, Target, Visit, VisitMut};
use crate::config::ConfigSource;
use crate::error::BindResult;
use crate::flagger::Flagger;
use crate::handler::OptionHandler;
use crate::registry::HandlerRegistry;
use crate::tag::Tag;

/// Handler registry plus per-option metadata overrides.
///
/// Build one context during start-up, register any custom handlers and
/// metadata, then pass it by reference to every declare and populate call.
/// The context is immutable while binding, so one instance can serve several
/// threads.
///
/// # Examples
///
/// ```
/// use cliutil::{BindContext, ConfigSource, Flagger, Options};
///
/// #[derive(Options, Default)]
/// struct Args {
///     #[cliutil("option=name default=world")]
///     pub name: String,
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let cx = BindContext::new();
/// let mut args = Args::default();
/// let mut flagger = Flagger::new(clap::Command::new("demo"));
/// cx.declare_options(&args, &mut flagger)?;
/// let config = flagger.try_config_from(["demo"])?;
/// cx.populate_options(&mut args, &config)?;
/// assert_eq!(args.name, "world");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct BindContext {
    registry: HandlerRegistry,
    metadata: HashMap<String, Tag>,
}

impl BindContext {
    /// Context with the built-in handlers and no metadata overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context using `registry`.
    #[must_use]
    pub fn with_registry(registry: HandlerRegistry) -> Self {
        Self {
            registry,
            metadata: HashMap::new(),
        }
    }

    /// The handler registry.
    #[must_use]
    pub const fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Mutable access to the handler registry.
    pub const fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// Register a custom handler factory under `name`.
    ///
    /// A later registration under the same name replaces the earlier one,
    /// including built-ins.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(Tag) -> Box<dyn OptionHandler> + Send + Sync + 'static,
    {
        self.registry.register(name, factory);
        self
    }

    /// Supply tag keys for the option called `name`.
    ///
    /// Keys in the field's own tag take precedence; `meta` only fills in
    /// keys the field does not define. Valid keys are `short`, `default`,
    /// `usage`, and `func`.
    pub fn set_option_metadata(&mut self, name: impl Into<String>, meta: Tag) -> &mut Self {
        self.metadata.insert(name.into(), meta);
        self
    }

    /// Metadata registered for `name`.
    #[must_use]
    pub fn option_metadata(&self, name: &str) -> Option<&Tag> {
        self.metadata.get(name)
    }

    /// Declare a flag on `flagger` for every tagged field of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BindError::NilValue`] or
    /// [`crate::BindError::NotAStruct`] when `value` does not resolve to a
    /// struct. Failures for a single field are wrapped in
    /// [`crate::BindError::OptionBinding`]; the first one aborts the walk.
    pub fn declare_options<T: Target + ?Sized>(
        &self,
        value: &T,
        flagger: &mut Flagger,
    ) -> BindResult<()> {
        let options = value.resolve()?;
        options.walk(&mut Declare { cx: self, flagger })
    }

    /// Read every tagged field of `value` from `config`.
    ///
    /// The flags must already have been declared, normally by
    /// [`BindContext::declare_options`] on a value with the same layout.
    ///
    /// # Errors
    ///
    /// As [`BindContext::declare_options`]. Shared nested structs fail with
    /// [`crate::BindError::NotSettable`] rather than being skipped.
    pub fn populate_options<T: Target + ?Sized>(
        &self,
        value: &mut T,
        config: &ConfigSource,
    ) -> BindResult<()> {
        let options = value.resolve_mut()?;
        options.walk_mut(&mut Populate { cx: self, config })
    }

    /// Resolve the handler for a tagged field.
    ///
    /// Returns `None` when the tag has no `option` key.
    fn handler_for(
        &self,
        field: &Field,
        shape: Shape,
    ) -> BindResult<Option<(String, Box<dyn OptionHandler>)>> {
        let parsed = Tag::parse(field.tag);
        let Some(option) = parsed.option().map(str::to_owned) else {
            return Ok(None);
        };
        let tag = match self.metadata.get(&option) {
            Some(meta) => parsed.merged_over(meta),
            None => parsed,
        };
        let handler = self
            .registry
            .resolve(tag, shape)
            .map_err(|err| err.for_option(&option))?;
        Ok(Some((option, handler)))
    }
}

struct Declare<'a> {
    cx: &'a BindContext,
    flagger: &'a mut Flagger,
}

impl Visit for Declare<'_> {
    fn visit(&mut self, field: &Field, shape: Shape) -> BindResult<()> {
        let Some((option, handler)) = self.cx.handler_for(field, shape)? else {
            return Ok(());
        };
        tracing::debug!(option = %option, field = field.name, "declaring option");
        handler
            .declare(self.flagger)
            .map_err(|err| err.for_option(&option))
    }
}

struct Populate<'a> {
    cx: &'a BindContext,
    config: &'a ConfigSource,
}

impl VisitMut for Populate<'_> {
    fn visit_mut(&mut self, field: &Field, slot: Slot<'_>) -> BindResult<()> {
        let Some((option, handler)) = self.cx.handler_for(field, slot.shape())? else {
            return Ok(());
        };
        tracing::debug!(option = %option, field = field.name, "populating option");
        handler
            .populate(self.config, slot)
            .map_err(|err| err.for_option(&option))
    }
}

/// [`BindContext::declare_options`] with a default context.
///
/// # Errors
///
/// See [`BindContext::declare_options`].
pub fn declare_options<T: Target + ?Sized>(value: &T, flagger: &mut Flagger) -> BindResult<()> {
    BindContext::new().declare_options(value, flagger)
}

/// [`BindContext::populate_options`] with a default context.
///
/// # Errors
///
/// See [`BindContext::populate_options`].
pub fn populate_options<T: Target + ?Sized>(
    value: &mut T,
    config: &ConfigSource,
) -> BindResult<()> {
    BindContext::new().populate_options(value, config)
}
