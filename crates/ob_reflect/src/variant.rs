use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Object;

// -----------------------------------------------------------------------------
// ScalarKind

/// The tag used for a list element that is itself a list.
pub const LIST_TAG: &str = "list";

/// Built-in scalar kinds a [`Variant`] can hold.
///
/// Each kind has a stable tag, used as the key of a list item wrapper
/// when the element is not a registered object.
///
/// # Examples
///
/// ```
/// use ob_reflect::ScalarKind;
///
/// assert_eq!(ScalarKind::Int.tag(), "int");
/// assert_eq!(ScalarKind::from_tag("float"), Some(ScalarKind::Float));
/// assert_eq!(ScalarKind::from_tag("demo::Point"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    UInt,
    Float,
    String,
    Bytes,
}

impl ScalarKind {
    /// All scalar kinds, in tag order.
    pub const ALL: [ScalarKind; 6] = [
        ScalarKind::Bool,
        ScalarKind::Int,
        ScalarKind::UInt,
        ScalarKind::Float,
        ScalarKind::String,
        ScalarKind::Bytes,
    ];

    /// Returns the wrapper tag of this kind.
    #[inline]
    pub const fn tag(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::UInt => "uint",
            ScalarKind::Float => "float",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
        }
    }

    /// Parses a wrapper tag, returns `None` for non-scalar tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Returns `true` if the tag is reserved by a scalar kind or by [`LIST_TAG`].
    #[inline]
    pub fn is_reserved_tag(tag: &str) -> bool {
        tag == LIST_TAG || Self::from_tag(tag).is_some()
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// -----------------------------------------------------------------------------
// Variant

/// A dynamically typed property value.
///
/// This is the exchange type between an [`Object`] and the codec.
/// A nested object is owned by the variant; reading an object property
/// returns an owned snapshot of the child.
///
/// - `Invalid`: the property could not be read.
/// - `Null`: an empty object slot.
#[derive(Debug, Default)]
pub enum Variant {
    #[default]
    Invalid,
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Object(Box<dyn Object>),
    List(Vec<Variant>),
}

impl Variant {
    /// Returns `false` for [`Variant::Invalid`].
    #[inline]
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Variant::Invalid)
    }

    /// Returns the [`ScalarKind`] if this is a scalar value.
    pub const fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Variant::Bool(_) => Some(ScalarKind::Bool),
            Variant::Int(_) => Some(ScalarKind::Int),
            Variant::UInt(_) => Some(ScalarKind::UInt),
            Variant::Float(_) => Some(ScalarKind::Float),
            Variant::String(_) => Some(ScalarKind::String),
            Variant::Bytes(_) => Some(ScalarKind::Bytes),
            Variant::Invalid | Variant::Null | Variant::Object(_) | Variant::List(_) => None,
        }
    }

    /// A human-readable name of the held type.
    ///
    /// Objects report their class name, scalars their tag.
    ///
    /// ```
    /// use ob_reflect::Variant;
    ///
    /// assert_eq!(Variant::from(3_i64).type_name(), "int");
    /// assert_eq!(Variant::List(Vec::new()).type_name(), "list");
    /// ```
    pub fn type_name(&self) -> &'static str {
        match self {
            Variant::Invalid => "invalid",
            Variant::Null => "null",
            Variant::Object(object) => object.class_name(),
            Variant::List(_) => crate::LIST_TAG,
            scalar => match scalar.scalar_kind() {
                Some(kind) => kind.tag(),
                None => "invalid",
            },
        }
    }

    /// Returns the held object, if any.
    #[inline]
    pub fn as_object(&self) -> Option<&dyn Object> {
        match self {
            Variant::Object(object) => Some(&**object),
            _ => None,
        }
    }

    /// Takes the held object, if any.
    #[inline]
    pub fn into_object(self) -> Option<Box<dyn Object>> {
        match self {
            Variant::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the held list, if any.
    #[inline]
    pub fn as_list(&self) -> Option<&[Variant]> {
        match self {
            Variant::List(list) => Some(list),
            _ => None,
        }
    }
}

impl Clone for Variant {
    fn clone(&self) -> Self {
        match self {
            Variant::Invalid => Variant::Invalid,
            Variant::Null => Variant::Null,
            Variant::Bool(v) => Variant::Bool(*v),
            Variant::Int(v) => Variant::Int(*v),
            Variant::UInt(v) => Variant::UInt(*v),
            Variant::Float(v) => Variant::Float(*v),
            Variant::String(v) => Variant::String(v.clone()),
            Variant::Bytes(v) => Variant::Bytes(v.clone()),
            Variant::Object(v) => Variant::Object(v.clone_object()),
            Variant::List(v) => Variant::List(v.clone()),
        }
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Variant::Invalid, Variant::Invalid) | (Variant::Null, Variant::Null) => true,
            (Variant::Bool(a), Variant::Bool(b)) => a == b,
            (Variant::Int(a), Variant::Int(b)) => a == b,
            (Variant::UInt(a), Variant::UInt(b)) => a == b,
            (Variant::Float(a), Variant::Float(b)) => a == b,
            (Variant::String(a), Variant::String(b)) => a == b,
            (Variant::Bytes(a), Variant::Bytes(b)) => a == b,
            (Variant::Object(a), Variant::Object(b)) => a.object_eq(&**b),
            (Variant::List(a), Variant::List(b)) => a == b,
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_variant_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Variant {
                #[inline]
                fn from(value: $ty) -> Self {
                    Variant::$variant(value)
                }
            }
        )*
    };
}

impl_variant_from! {
    bool => Bool,
    i64 => Int,
    u64 => UInt,
    f64 => Float,
    String => String,
    Vec<u8> => Bytes,
    Box<dyn Object> => Object,
    Vec<Variant> => List,
}

impl From<&str> for Variant {
    #[inline]
    fn from(value: &str) -> Self {
        Variant::String(String::from(value))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::{ScalarKind, Variant};

    #[test]
    fn tags_round_trip() {
        for kind in ScalarKind::ALL {
            assert!(ScalarKind::from_tag(kind.tag()) == Some(kind));
        }
        assert!(ScalarKind::from_tag("String").is_none());
        assert!(ScalarKind::is_reserved_tag("list"));
        assert!(!ScalarKind::is_reserved_tag("demo::Point"));
    }

    #[test]
    fn lists_compare_element_wise() {
        let a = Variant::List(vec![Variant::Int(1), Variant::from("x")]);
        let b = Variant::List(vec![Variant::Int(1), Variant::String(String::from("x"))]);
        assert!(a == b);
        assert!(a != Variant::List(vec![Variant::UInt(1), Variant::from("x")]));
        assert!(a.clone() == a);
    }

    #[test]
    fn invalid_is_default() {
        assert!(!Variant::default().is_valid());
        assert!(Variant::Null.is_valid());
        assert!(Variant::Null.scalar_kind().is_none());
        assert!(Variant::Float(0.5).scalar_kind() == Some(ScalarKind::Float));
    }
}
