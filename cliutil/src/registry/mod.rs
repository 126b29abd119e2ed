//! Name to handler-factory registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::binding::Shape;
use crate::error::{BindError, BindResult};
use crate::handler::{BuiltinHandler, OptionHandler, OptionKind};
use crate::tag::Tag;

type CustomFactory = Arc<dyn Fn(Tag) -> Box<dyn OptionHandler> + Send + Sync>;

#[derive(Clone)]
enum Factory {
    Builtin(OptionKind),
    Custom(CustomFactory),
}

impl Factory {
    fn build(&self, tag: Tag) -> Box<dyn OptionHandler> {
        match self {
            Self::Builtin(kind) => Box::new(BuiltinHandler::new(*kind, tag)),
            Self::Custom(factory) => factory(tag),
        }
    }
}

/// Maps handler names to factories that build an [`OptionHandler`] from a
/// field's tag.
///
/// [`HandlerRegistry::default`] registers every [`OptionKind`] under its
/// [`OptionKind::name`]. Registering under an existing name replaces the
/// previous factory.
#[derive(Clone)]
pub struct HandlerRegistry {
    factories: HashMap<String, Factory>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for kind in OptionKind::ALL {
            registry.register_kind(kind.name(), kind);
        }
        registry
    }
}

impl HandlerRegistry {
    /// Registry holding the built-in handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with no handlers at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a custom factory under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(Tag) -> Box<dyn OptionHandler> + Send + Sync + 'static,
    {
        self.factories
            .insert(name.into(), Factory::Custom(Arc::new(factory)));
        self
    }

    /// Register a built-in handler kind under `name`.
    ///
    /// Useful for aliases such as mapping `"path"` to [`OptionKind::IoReader`].
    pub fn register_kind(&mut self, name: impl Into<String>, kind: OptionKind) -> &mut Self {
        self.factories.insert(name.into(), Factory::Builtin(kind));
        self
    }

    /// Remove the factory registered under `name`.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    /// Whether a factory is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the handler for a field.
    ///
    /// An explicit `func` key selects the handler by name. Otherwise the
    /// name is inferred from the field's shape.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::HandlerNotFound`] when `func` names an
    /// unregistered handler, and [`BindError::TypeNotSupported`] when the
    /// shape has no inferred handler or that handler was unregistered.
    pub fn resolve(&self, tag: Tag, shape: Shape) -> BindResult<Box<dyn OptionHandler>> {
        if let Some(name) = tag.func() {
            let factory = self
                .factories
                .get(name)
                .ok_or_else(|| BindError::HandlerNotFound {
                    name: name.to_owned(),
                })?;
            return Ok(factory.build(tag));
        }
        let factory = shape
            .handler_name()
            .and_then(|name| self.factories.get(name))
            .ok_or(BindError::TypeNotSupported {
                type_name: shape.type_name(),
            })?;
        Ok(factory.build(tag))
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("names", &self.names())
            .finish()
    }
}
