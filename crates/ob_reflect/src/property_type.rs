use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{Object, ObjectClass, PropertyKind, ScalarKind, Variant};

/// Conversion between a field type and [`Variant`].
///
/// `from_variant` returns `None` when the value cannot be stored in the field,
/// which surfaces as a failed property write.
///
/// Integers accept any integral variant in range, including integral floats
/// up to 2^53. Floats accept integers.
pub trait PropertyType: Sized {
    const KIND: PropertyKind;

    fn to_variant(&self) -> Variant;

    fn from_variant(value: Variant) -> Option<Self>;

    /// Borrows the held object, for object properties only.
    #[inline]
    fn object_ref(&self) -> Option<&dyn Object> {
        None
    }
}

// Largest float that still represents every integer below it.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

#[inline]
fn integral_float(value: f64) -> Option<i64> {
    // `NaN` fails both comparisons.
    if !(-MAX_EXACT_FLOAT..=MAX_EXACT_FLOAT).contains(&value) {
        return None;
    }
    let integral = value as i64;
    if integral as f64 == value {
        Some(integral)
    } else {
        None
    }
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {
        $(
            impl PropertyType for $ty {
                const KIND: PropertyKind = PropertyKind::Scalar(ScalarKind::Int);

                #[inline]
                fn to_variant(&self) -> Variant {
                    Variant::Int(*self as i64)
                }

                fn from_variant(value: Variant) -> Option<Self> {
                    match value {
                        Variant::Int(v) => <$ty>::try_from(v).ok(),
                        Variant::UInt(v) => <$ty>::try_from(v).ok(),
                        Variant::Float(v) => <$ty>::try_from(integral_float(v)?).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {
        $(
            impl PropertyType for $ty {
                const KIND: PropertyKind = PropertyKind::Scalar(ScalarKind::UInt);

                #[inline]
                fn to_variant(&self) -> Variant {
                    Variant::UInt(*self as u64)
                }

                fn from_variant(value: Variant) -> Option<Self> {
                    match value {
                        Variant::UInt(v) => <$ty>::try_from(v).ok(),
                        Variant::Int(v) => <$ty>::try_from(v).ok(),
                        Variant::Float(v) => <$ty>::try_from(integral_float(v)?).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($($ty:ty),*) => {
        $(
            impl PropertyType for $ty {
                const KIND: PropertyKind = PropertyKind::Scalar(ScalarKind::Float);

                #[inline]
                fn to_variant(&self) -> Variant {
                    Variant::Float(*self as f64)
                }

                fn from_variant(value: Variant) -> Option<Self> {
                    match value {
                        Variant::Float(v) => Some(v as $ty),
                        Variant::Int(v) => Some(v as $ty),
                        Variant::UInt(v) => Some(v as $ty),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_float!(f32, f64);

impl PropertyType for bool {
    const KIND: PropertyKind = PropertyKind::Scalar(ScalarKind::Bool);

    #[inline]
    fn to_variant(&self) -> Variant {
        Variant::Bool(*self)
    }

    fn from_variant(value: Variant) -> Option<Self> {
        match value {
            Variant::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for String {
    const KIND: PropertyKind = PropertyKind::Scalar(ScalarKind::String);

    #[inline]
    fn to_variant(&self) -> Variant {
        Variant::String(self.clone())
    }

    fn from_variant(value: Variant) -> Option<Self> {
        match value {
            Variant::String(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for Vec<u8> {
    const KIND: PropertyKind = PropertyKind::Scalar(ScalarKind::Bytes);

    #[inline]
    fn to_variant(&self) -> Variant {
        Variant::Bytes(self.clone())
    }

    fn from_variant(value: Variant) -> Option<Self> {
        match value {
            Variant::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for Vec<Variant> {
    const KIND: PropertyKind = PropertyKind::List;

    #[inline]
    fn to_variant(&self) -> Variant {
        Variant::List(self.clone())
    }

    fn from_variant(value: Variant) -> Option<Self> {
        match value {
            Variant::List(v) => Some(v),
            _ => None,
        }
    }
}

/// An owned, optional child object.
///
/// `None` reads as [`Variant::Null`], and writing `Null` clears the slot.
impl<T: ObjectClass> PropertyType for Option<Box<T>> {
    const KIND: PropertyKind = PropertyKind::Object(T::CLASS_NAME);

    fn to_variant(&self) -> Variant {
        match self {
            Some(object) => Variant::Object(object.clone_object()),
            None => Variant::Null,
        }
    }

    fn from_variant(value: Variant) -> Option<Self> {
        match value {
            Variant::Object(object) => <dyn Object>::downcast::<T>(object).ok().map(Some),
            Variant::Null => Some(None),
            _ => None,
        }
    }

    #[inline]
    fn object_ref(&self) -> Option<&dyn Object> {
        self.as_deref().map(|object| object as &dyn Object)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::PropertyType;
    use crate::{PropertyKind, ScalarKind, Variant};

    #[test]
    fn integers_check_range() {
        assert!(u8::from_variant(Variant::Int(255)) == Some(255));
        assert!(u8::from_variant(Variant::Int(256)).is_none());
        assert!(u32::from_variant(Variant::Int(-1)).is_none());
        assert!(i32::from_variant(Variant::UInt(7)) == Some(7));
        assert!(i64::from_variant(Variant::Float(4.0)) == Some(4));
        assert!(i64::from_variant(Variant::Float(4.5)).is_none());
        assert!(i64::from_variant(Variant::String(String::from("4"))).is_none());
    }

    #[test]
    fn floats_accept_integers() {
        assert!(f64::from_variant(Variant::Int(-3)) == Some(-3.0));
        assert!(f32::from_variant(Variant::UInt(2)) == Some(2.0));
        assert!(f64::from_variant(Variant::Null).is_none());
    }

    #[test]
    fn kinds() {
        assert!(<bool as PropertyType>::KIND == PropertyKind::Scalar(ScalarKind::Bool));
        assert!(<u16 as PropertyType>::KIND == PropertyKind::Scalar(ScalarKind::UInt));
        assert!(<alloc::vec::Vec<Variant> as PropertyType>::KIND == PropertyKind::List);
    }
}
