use alloc::boxed::Box;
use alloc::format;

use ob_reflect::{Object, ObjectClass};
use serde_json::Value;

use crate::{EncodeError, ErrorSink};

// -----------------------------------------------------------------------------
// ObjectCodec

/// A type-specific replacement of the generic property walk.
///
/// Registered with [`TypeRegistry::register_with_codec`]. The serializer and
/// deserializer look for a codec before doing any reflection work, and the
/// codec's value is stored directly under the serial name.
///
/// Most codecs should implement [`TypedCodec`] instead, which provides this
/// trait through a downcast.
///
/// [`TypeRegistry::register_with_codec`]: crate::TypeRegistry::register_with_codec
pub trait ObjectCodec: Send + Sync + 'static {
    fn serialize(&self, object: &dyn Object) -> Result<Value, EncodeError>;

    /// Rebuilds an object, returns `None` after pushing the reason into `errors`.
    fn deserialize(&self, value: &Value, errors: &mut ErrorSink) -> Option<Box<dyn Object>>;
}

// -----------------------------------------------------------------------------
// TypedCodec

/// An [`ObjectCodec`] for one concrete type.
///
/// # Examples
///
/// ```
/// use ob_json::{DecodeErrorKind, EncodeError, ErrorSink, TypedCodec, Value};
/// use ob_reflect::impl_object;
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Celsius {
///     degrees: f64,
/// }
///
/// impl_object!(Celsius { degrees: f64 });
///
/// struct CelsiusCodec;
///
/// impl TypedCodec for CelsiusCodec {
///     type Target = Celsius;
///
///     fn serialize_typed(&self, object: &Celsius) -> Result<Value, EncodeError> {
///         Ok(Value::from(object.degrees))
///     }
///
///     fn deserialize_typed(&self, value: &Value, errors: &mut ErrorSink) -> Option<Celsius> {
///         match value.as_f64() {
///             Some(degrees) => Some(Celsius { degrees }),
///             None => {
///                 errors.push(DecodeErrorKind::Custom, "expected a number of degrees");
///                 None
///             }
///         }
///     }
/// }
/// ```
pub trait TypedCodec: Send + Sync + 'static {
    type Target: ObjectClass;

    fn serialize_typed(&self, object: &Self::Target) -> Result<Value, EncodeError>;

    fn deserialize_typed(&self, value: &Value, errors: &mut ErrorSink) -> Option<Self::Target>;
}

impl<C: TypedCodec> ObjectCodec for C {
    fn serialize(&self, object: &dyn Object) -> Result<Value, EncodeError> {
        match object.downcast_ref::<C::Target>() {
            Some(target) => self.serialize_typed(target),
            None => Err(EncodeError::Custom {
                class: object.class_name(),
                message: format!("codec only accepts `{}`", C::Target::CLASS_NAME),
            }),
        }
    }

    fn deserialize(&self, value: &Value, errors: &mut ErrorSink) -> Option<Box<dyn Object>> {
        self.deserialize_typed(value, errors)
            .map(|target| Box::new(target) as Box<dyn Object>)
    }
}
