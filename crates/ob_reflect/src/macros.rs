/// Implements [`Object`](crate::Object) and [`ObjectClass`](crate::ObjectClass)
/// for a struct with named fields.
///
/// The struct must implement `Default`, `Clone`, `PartialEq` and `Debug`.
/// Every listed field type must implement [`PropertyType`](crate::PropertyType).
///
/// The generated class:
///
/// - is named `module_path!()::Type`;
/// - exposes the implicit [`OBJECT_NAME`](crate::OBJECT_NAME) property first,
///   followed by the listed fields in order;
/// - is default-constructible.
///
/// Fields may be prefixed with flags:
///
/// - `[read_only]`: writes are rejected.
/// - `[reset]`: the property can be reset to the value it has in `Default::default()`.
/// - `[skip]`: the property is not serialized.
///
/// # Examples
///
/// ```
/// use ob_reflect::{impl_object, Object, ObjectClass, Variant};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Gauge {
///     value: f64,
///     scale: f64,
///     label: String,
/// }
///
/// impl Default for Gauge {
///     fn default() -> Self {
///         Self { value: 0.0, scale: 1.0, label: String::new() }
///     }
/// }
///
/// impl_object!(Gauge {
///     value: f64,
///     [reset] scale: f64,
///     [read_only] label: String,
/// });
///
/// let mut gauge = Gauge { value: 2.0, scale: 4.0, label: "rpm".into() };
///
/// assert!(gauge.set_property("label", Variant::from("x")).is_err());
/// assert!(gauge.set_property("scale", Variant::from("x")).is_err());
/// assert!(gauge.reset_property("scale"));
/// assert_eq!(gauge.scale, 1.0);
///
/// assert_eq!(gauge.property("object_name"), Variant::from("Gauge"));
/// assert!(Gauge::CLASS_NAME.ends_with("::Gauge"));
/// ```
#[macro_export]
macro_rules! impl_object {
    ($ty:ident { $( $([$flag:ident])* $field:ident : $field_ty:ty ),* $(,)? }) => {
        const _: () = {
            const PROPERTIES: &[$crate::PropertyInfo] = &[
                $crate::PropertyInfo::object_name(),
                $(
                    $crate::PropertyInfo::new(
                        ::core::stringify!($field),
                        <$field_ty as $crate::PropertyType>::KIND,
                    )
                    $( .$flag() )*
                ),*
            ];

            static INFO: $crate::ObjectInfo = $crate::ObjectInfo::new(
                <$ty as $crate::ObjectClass>::CLASS_NAME,
                PROPERTIES,
            )
            .with_constructor($crate::__macro_exports::construct::<$ty>);

            impl $crate::ObjectClass for $ty {
                const CLASS_NAME: &'static str =
                    ::core::concat!(::core::module_path!(), "::", ::core::stringify!($ty));

                #[inline]
                fn class_info() -> &'static $crate::ObjectInfo {
                    &INFO
                }
            }

            impl $crate::Object for $ty {
                #[inline]
                fn object_info(&self) -> &'static $crate::ObjectInfo {
                    &INFO
                }

                fn property(&self, name: &str) -> $crate::Variant {
                    match name {
                        $crate::OBJECT_NAME => $crate::Variant::from(INFO.short_name()),
                        $(
                            ::core::stringify!($field) => {
                                $crate::PropertyType::to_variant(&self.$field)
                            }
                        )*
                        _ => $crate::Variant::Invalid,
                    }
                }

                fn property_ref(&self, name: &str) -> ::core::option::Option<&dyn $crate::Object> {
                    match name {
                        $(
                            ::core::stringify!($field) => $crate::PropertyType::object_ref(&self.$field),
                        )*
                        _ => ::core::option::Option::None,
                    }
                }

                fn set_property(
                    &mut self,
                    name: &str,
                    value: $crate::Variant,
                ) -> ::core::result::Result<(), $crate::WriteError> {
                    let ::core::option::Option::Some(info) = INFO.property(name) else {
                        return ::core::result::Result::Err($crate::WriteError::unknown(name));
                    };
                    if !info.is_writable() {
                        return ::core::result::Result::Err($crate::WriteError::ReadOnly(info.name()));
                    }
                    match name {
                        $(
                            ::core::stringify!($field) => {
                                let found = value.type_name();
                                match <$field_ty as $crate::PropertyType>::from_variant(value) {
                                    ::core::option::Option::Some(value) => {
                                        self.$field = value;
                                        ::core::result::Result::Ok(())
                                    }
                                    ::core::option::Option::None => {
                                        ::core::result::Result::Err($crate::WriteError::TypeMismatch {
                                            property: info.name(),
                                            expected: info.type_name(),
                                            found,
                                        })
                                    }
                                }
                            }
                        )*
                        _ => ::core::result::Result::Err($crate::WriteError::ReadOnly(info.name())),
                    }
                }

                fn reset_property(&mut self, name: &str) -> bool {
                    match INFO.property(name) {
                        ::core::option::Option::Some(info) if info.is_resettable() => {}
                        _ => return false,
                    }
                    match name {
                        $(
                            ::core::stringify!($field) => {
                                self.$field = <$ty as ::core::default::Default>::default().$field;
                                true
                            }
                        )*
                        _ => false,
                    }
                }

                #[inline]
                fn clone_object(&self) -> $crate::__macro_exports::Box<dyn $crate::Object> {
                    $crate::__macro_exports::Box::new(::core::clone::Clone::clone(self))
                }

                fn object_eq(&self, other: &dyn $crate::Object) -> bool {
                    match <dyn $crate::Object>::downcast_ref::<$ty>(other) {
                        ::core::option::Option::Some(other) => ::core::cmp::PartialEq::eq(self, other),
                        ::core::option::Option::None => false,
                    }
                }
            }
        };
    };
}
