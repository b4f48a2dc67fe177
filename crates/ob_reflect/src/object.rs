use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::fmt::Debug;

use thiserror::Error;

use crate::{ObjectInfo, Variant};

// -----------------------------------------------------------------------------
// WriteError

/// The reason a property write was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WriteError {
    #[error("property `{0}` does not exist")]
    UnknownProperty(String),

    #[error("property `{0}` is read-only")]
    ReadOnly(&'static str),

    #[error("property `{property}` expects `{expected}`, found `{found}`")]
    TypeMismatch {
        property: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl WriteError {
    #[inline]
    pub fn unknown(name: &str) -> Self {
        Self::UnknownProperty(String::from(name))
    }
}

// -----------------------------------------------------------------------------
// Object

/// An object whose properties can be enumerated and accessed by name at runtime.
///
/// This is the whole contract the codec depends on: stable ordered property
/// metadata through [`object_info`](Object::object_info), and `get`/`set`/`reset`
/// by name.
///
/// Prefer [`impl_object!`](crate::impl_object) over a manual implementation.
///
/// # Type Identification
///
/// Use the inherent methods on `dyn Object` to get back the concrete type:
///
/// ```
/// # use ob_reflect::{impl_object, Object, Variant};
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Label {
///     text: String,
/// }
///
/// impl_object!(Label { text: String });
///
/// let object: Box<dyn Object> = Box::new(Label { text: "hi".into() });
/// assert_eq!(object.property("text"), Variant::from("hi"));
///
/// let label = object.downcast::<Label>().unwrap();
/// assert_eq!(label.text, "hi");
/// ```
pub trait Object: Any + Debug + Send + Sync {
    /// Returns the static class metadata.
    fn object_info(&self) -> &'static ObjectInfo;

    /// Returns the full class name, the runtime type identity.
    #[inline]
    fn class_name(&self) -> &'static str {
        self.object_info().class_name()
    }

    /// Reads a property, [`Variant::Invalid`] if it cannot be read.
    fn property(&self, name: &str) -> Variant;

    /// Borrows the object held by an object property.
    ///
    /// Returns `None` for other properties and empty slots; callers then
    /// fall back to [`property`](Object::property).
    #[inline]
    fn property_ref(&self, _name: &str) -> Option<&dyn Object> {
        None
    }

    /// Writes a property.
    fn set_property(&mut self, name: &str, value: Variant) -> Result<(), WriteError>;

    /// Restores a resettable property to its default value.
    ///
    /// Returns `false` if the property is unknown or not resettable.
    fn reset_property(&mut self, name: &str) -> bool;

    /// Deep-clones the object.
    fn clone_object(&self) -> Box<dyn Object>;

    /// Structural equality against another object of any type.
    fn object_eq(&self, other: &dyn Object) -> bool;
}

impl dyn Object {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Object>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }

    /// Takes the concrete value, giving the box back on mismatch.
    pub fn downcast<T: Object>(self: Box<Self>) -> Result<Box<T>, Box<dyn Object>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        // The type was checked above.
        Ok(any.downcast::<T>().unwrap_or_else(|_| unreachable!()))
    }
}

// -----------------------------------------------------------------------------
// ObjectClass

/// Static access to the class metadata of a concrete [`Object`] type.
///
/// Implemented by [`impl_object!`](crate::impl_object).
pub trait ObjectClass: Object + Sized {
    /// The full class name, equal to `class_info().class_name()`.
    ///
    /// Kept as a separate constant so a class can refer to itself
    /// in the declared kind of its own properties.
    const CLASS_NAME: &'static str;

    fn class_info() -> &'static ObjectInfo;
}
