//! Items used by the expansion of [`submit_serializable!`](crate::submit_serializable).

#[cfg(feature = "auto_register")]
pub use inventory;

#[cfg(feature = "auto_register")]
pub use auto_register::*;

#[cfg(feature = "auto_register")]
mod auto_register {
    use ob_reflect::ObjectClass;

    use crate::{ObjectCodec, TypeRegistry};

    /// A registration submitted at link time.
    pub struct AutoRegistration {
        serial_name: &'static str,
        register: fn(&mut TypeRegistry, &'static str),
    }

    impl AutoRegistration {
        pub const fn of<T: ObjectClass + Default>(serial_name: &'static str) -> Self {
            Self {
                serial_name,
                register: register_type::<T>,
            }
        }

        pub const fn with_codec<T: ObjectClass + Default, C: ObjectCodec + Default>(
            serial_name: &'static str,
        ) -> Self {
            Self {
                serial_name,
                register: register_type_with_codec::<T, C>,
            }
        }
    }

    fn register_type<T: ObjectClass + Default>(registry: &mut TypeRegistry, serial_name: &'static str) {
        registry.register::<T>(serial_name);
    }

    fn register_type_with_codec<T: ObjectClass + Default, C: ObjectCodec + Default>(
        registry: &mut TypeRegistry,
        serial_name: &'static str,
    ) {
        registry.register_with_codec::<T, C>(serial_name, C::default());
    }

    inventory::collect!(AutoRegistration);

    pub(crate) fn register_submitted(registry: &mut TypeRegistry) {
        for registration in inventory::iter::<AutoRegistration> {
            (registration.register)(registry, registration.serial_name);
        }
    }
}

/// Submits a type for [`TypeRegistry::auto_register`](crate::TypeRegistry::auto_register).
///
/// Without the `auto_register` feature this expands to nothing.
///
/// ```
/// use ob_json::{submit_serializable, TypeRegistry};
/// use ob_reflect::{impl_object, ObjectClass};
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// pub struct Marker {
///     id: u32,
/// }
///
/// impl_object!(Marker { id: u32 });
///
/// submit_serializable!(Marker, "marker");
///
/// let mut registry = TypeRegistry::new();
/// assert!(registry.auto_register());
/// assert_eq!(registry.resolve("marker"), Ok(Marker::CLASS_NAME));
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_serializable {
    ($ty:ty, $serial_name:expr) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::__macro_exports::AutoRegistration::of::<$ty>($serial_name)
        }
    };
    ($ty:ty, $serial_name:expr, $codec:ty) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::__macro_exports::AutoRegistration::with_codec::<$ty, $codec>($serial_name)
        }
    };
}

/// Submits a type for [`TypeRegistry::auto_register`](crate::TypeRegistry::auto_register).
///
/// Without the `auto_register` feature this expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! submit_serializable {
    ($($tt:tt)*) => {};
}
