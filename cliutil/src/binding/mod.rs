//! Struct traversal for option binding.
//!
//! Types opt in by implementing [`Options`], normally through
//! `#[derive(Options)]`. The derive lists every public field carrying a
//! `#[cliutil("...")]` tag in declaration order and recurses into fields marked
//! `#[cliutil(nested)]`. Nested fields may hold the struct by value, in a
//! `Box`, `Rc` or `Arc`, or behind an `Option`; an empty `Option` is skipped.
//! Embedding has no special meaning: an "embedded" struct is just a nested
//! field whose options are flattened into the enclosing walk.
//!
//! Tagged fields declared as `Option<T>` or `Box<T>` (in any nesting) are
//! bound as the `T` inside; a `None` field is skipped in both walks.
//!
//! [`Target`] resolves the root value handed to the binding engine, rejecting
//! empty wrappers and non-struct values.

mod context;
mod shape;

use std::any::type_name;
use std::rc::Rc;
use std::sync::Arc;

pub use context::{BindContext, declare_options, populate_options};
pub use shape::{Shape, Slot};

use crate::error::{BindError, BindResult};

/// Static description of a tagged field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Rust field name.
    pub name: &'static str,
    /// Raw tag string.
    pub tag: &'static str,
}

/// Receives tagged fields during the declare walk.
pub trait Visit {
    /// Called once per tagged field with the field's current shape.
    ///
    /// # Errors
    ///
    /// Any error aborts the walk.
    fn visit(&mut self, field: &Field, shape: Shape) -> BindResult<()>;
}

/// Receives tagged fields during the populate walk.
pub trait VisitMut {
    /// Called once per tagged field with a writable view of the field.
    ///
    /// # Errors
    ///
    /// Any error aborts the walk.
    fn visit_mut(&mut self, field: &Field, slot: Slot<'_>) -> BindResult<()>;
}

/// A struct whose fields can be bound to options.
pub trait Options {
    /// Visit tagged fields in declaration order, depth first.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `visitor`.
    fn walk(&self, visitor: &mut dyn Visit) -> BindResult<()>;

    /// Visit tagged fields mutably in declaration order, depth first.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `visitor`, or
    /// [`BindError::NotSettable`] when a nested struct is shared.
    fn walk_mut(&mut self, visitor: &mut dyn VisitMut) -> BindResult<()>;
}

impl<T: Options + ?Sized> Options for Box<T> {
    fn walk(&self, visitor: &mut dyn Visit) -> BindResult<()> {
        (**self).walk(visitor)
    }

    fn walk_mut(&mut self, visitor: &mut dyn VisitMut) -> BindResult<()> {
        (**self).walk_mut(visitor)
    }
}

impl<T: Options> Options for Option<T> {
    fn walk(&self, visitor: &mut dyn Visit) -> BindResult<()> {
        self.as_ref().map_or(Ok(()), |inner| inner.walk(visitor))
    }

    fn walk_mut(&mut self, visitor: &mut dyn VisitMut) -> BindResult<()> {
        self.as_mut().map_or(Ok(()), |inner| inner.walk_mut(visitor))
    }
}

impl<T: Options + ?Sized> Options for Rc<T> {
    fn walk(&self, visitor: &mut dyn Visit) -> BindResult<()> {
        (**self).walk(visitor)
    }

    fn walk_mut(&mut self, visitor: &mut dyn VisitMut) -> BindResult<()> {
        Rc::get_mut(self)
            .ok_or(BindError::NotSettable {
                type_name: type_name::<T>(),
            })?
            .walk_mut(visitor)
    }
}

impl<T: Options + ?Sized> Options for Arc<T> {
    fn walk(&self, visitor: &mut dyn Visit) -> BindResult<()> {
        (**self).walk(visitor)
    }

    fn walk_mut(&mut self, visitor: &mut dyn VisitMut) -> BindResult<()> {
        Arc::get_mut(self)
            .ok_or(BindError::NotSettable {
                type_name: type_name::<T>(),
            })?
            .walk_mut(visitor)
    }
}

/// A value the binding engine can resolve to an [`Options`] struct.
///
/// Derived structs resolve to themselves. Wrappers are dereferenced until a
/// struct is reached; an empty `Option` yields [`BindError::NilValue`] and a
/// non-struct value yields [`BindError::NotAStruct`].
pub trait Target {
    /// Resolve for reading.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::NilValue`] or [`BindError::NotAStruct`].
    fn resolve(&self) -> BindResult<&dyn Options>;

    /// Resolve for writing.
    ///
    /// # Errors
    ///
    /// As [`Target::resolve`], plus [`BindError::NotSettable`] for shared
    /// pointers.
    fn resolve_mut(&mut self) -> BindResult<&mut dyn Options>;
}

impl<T: Target + ?Sized> Target for Box<T> {
    fn resolve(&self) -> BindResult<&dyn Options> {
        (**self).resolve()
    }

    fn resolve_mut(&mut self) -> BindResult<&mut dyn Options> {
        (**self).resolve_mut()
    }
}

impl<T: Target + ?Sized> Target for &mut T {
    fn resolve(&self) -> BindResult<&dyn Options> {
        (**self).resolve()
    }

    fn resolve_mut(&mut self) -> BindResult<&mut dyn Options> {
        (**self).resolve_mut()
    }
}

impl<T: Target> Target for Option<T> {
    fn resolve(&self) -> BindResult<&dyn Options> {
        self.as_ref().ok_or(BindError::NilValue)?.resolve()
    }

    fn resolve_mut(&mut self) -> BindResult<&mut dyn Options> {
        self.as_mut().ok_or(BindError::NilValue)?.resolve_mut()
    }
}

impl<T: Target + ?Sized> Target for Rc<T> {
    fn resolve(&self) -> BindResult<&dyn Options> {
        (**self).resolve()
    }

    fn resolve_mut(&mut self) -> BindResult<&mut dyn Options> {
        Rc::get_mut(self)
            .ok_or(BindError::NotSettable {
                type_name: type_name::<T>(),
            })?
            .resolve_mut()
    }
}

impl<T: Target + ?Sized> Target for Arc<T> {
    fn resolve(&self) -> BindResult<&dyn Options> {
        (**self).resolve()
    }

    fn resolve_mut(&mut self) -> BindResult<&mut dyn Options> {
        Arc::get_mut(self)
            .ok_or(BindError::NotSettable {
                type_name: type_name::<T>(),
            })?
            .resolve_mut()
    }
}

macro_rules! not_a_struct {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Target for $ty {
                fn resolve(&self) -> BindResult<&dyn Options> {
                    Err(BindError::NotAStruct {
                        type_name: type_name::<$ty>(),
                    })
                }

                fn resolve_mut(&mut self) -> BindResult<&mut dyn Options> {
                    Err(BindError::NotAStruct {
                        type_name: type_name::<$ty>(),
                    })
                }
            }
        )*
    };
}

not_a_struct!(
    str,
    String,
    i64,
    bool,
    f64,
    Vec<i64>,
);
