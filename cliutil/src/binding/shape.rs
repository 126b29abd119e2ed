//! Runtime data shapes and mutable field views.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use crate::error::{BindError, BindResult};
use crate::handler::OptionKind;

/// Data shape of a field, inferred from its concrete type.
///
/// Each shape with a built-in handler maps to the handler's registry name via
/// [`Shape::handler_name`]. Every other type is reported as
/// [`Shape::Other`] and can only be bound through a `func` override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `String`.
    String,
    /// `i64`.
    Int,
    /// `bool`.
    Bool,
    /// `f64`.
    Float64,
    /// `Vec<i64>`.
    IntList,
    /// `HashMap<String, String>`.
    StringMap,
    /// Any other type, carrying its name.
    Other(&'static str),
}

impl Shape {
    /// Shape of values of type `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        let id = TypeId::of::<T>();
        if id == TypeId::of::<String>() {
            Self::String
        } else if id == TypeId::of::<i64>() {
            Self::Int
        } else if id == TypeId::of::<bool>() {
            Self::Bool
        } else if id == TypeId::of::<f64>() {
            Self::Float64
        } else if id == TypeId::of::<Vec<i64>>() {
            Self::IntList
        } else if id == TypeId::of::<HashMap<String, String>>() {
            Self::StringMap
        } else {
            Self::Other(type_name::<T>())
        }
    }

    /// Shape of `value`'s type.
    #[must_use]
    pub fn of_val<T: Any>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// Registry name of the built-in handler for this shape.
    #[must_use]
    pub fn handler_name(self) -> Option<&'static str> {
        OptionKind::for_shape(self).map(OptionKind::name)
    }

    /// Name of the underlying Rust type.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::String => type_name::<String>(),
            Self::Int => type_name::<i64>(),
            Self::Bool => type_name::<bool>(),
            Self::Float64 => type_name::<f64>(),
            Self::IntList => type_name::<Vec<i64>>(),
            Self::StringMap => type_name::<HashMap<String, String>>(),
            Self::Other(name) => name,
        }
    }
}

/// Mutable view of a destination field.
///
/// Handlers write through [`Slot::downcast`], which fails with
/// [`BindError::FieldMismatch`] when the field has a different type.
pub struct Slot<'a> {
    value: &'a mut (dyn Any + 'static),
    shape: Shape,
}

impl<'a> Slot<'a> {
    /// Wrap a field.
    pub fn new<T: Any>(value: &'a mut T) -> Self {
        Self {
            value,
            shape: Shape::of::<T>(),
        }
    }

    /// Shape of the wrapped field.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Borrow the field as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::FieldMismatch`] when the field is not a `T`.
    pub fn downcast<T: Any>(self) -> BindResult<&'a mut T> {
        let Self { value, shape } = self;
        value.downcast_mut::<T>().ok_or(BindError::FieldMismatch {
            expected: type_name::<T>(),
            found: shape.type_name(),
        })
    }
}

impl std::fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}
