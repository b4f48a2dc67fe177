use alloc::boxed::Box;

use crate::{Object, ScalarKind};

// -----------------------------------------------------------------------------
// PropertyKind

/// The declared kind of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// A built-in scalar.
    Scalar(ScalarKind),
    /// An owned nested object, carrying the declared class name.
    Object(&'static str),
    /// A heterogeneous list of [`Variant`](crate::Variant)s.
    List,
}

impl PropertyKind {
    /// Returns the declared type name, used in error messages.
    #[inline]
    pub const fn type_name(self) -> &'static str {
        match self {
            PropertyKind::Scalar(kind) => kind.tag(),
            PropertyKind::Object(class_name) => class_name,
            PropertyKind::List => crate::LIST_TAG,
        }
    }
}

// -----------------------------------------------------------------------------
// PropertyInfo

/// The name of the implicit identity property every object exposes first.
///
/// It is flagged [`skip`](PropertyInfo::skip) and never serialized.
pub const OBJECT_NAME: &str = "object_name";

/// Compile-time description of a single property.
///
/// Built with `const` chaining, the same way [`impl_object!`](crate::impl_object)
/// applies per-field flags.
///
/// # Examples
///
/// ```
/// use ob_reflect::{PropertyInfo, PropertyKind, ScalarKind};
///
/// const SCALE: PropertyInfo =
///     PropertyInfo::new("scale", PropertyKind::Scalar(ScalarKind::Float)).reset();
///
/// assert!(SCALE.is_writable());
/// assert!(SCALE.is_resettable());
/// assert!(SCALE.is_serialized());
/// assert_eq!(SCALE.type_name(), "float");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyInfo {
    name: &'static str,
    kind: PropertyKind,
    writable: bool,
    resettable: bool,
    serialized: bool,
}

impl PropertyInfo {
    /// A writable, non-resettable, serialized property.
    #[inline]
    pub const fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            writable: true,
            resettable: false,
            serialized: true,
        }
    }

    /// The implicit [`OBJECT_NAME`] property.
    #[inline]
    pub const fn object_name() -> Self {
        Self::new(OBJECT_NAME, PropertyKind::Scalar(ScalarKind::String))
            .read_only()
            .skip()
    }

    /// Marks the property as not writable.
    #[inline]
    pub const fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Marks the property as resettable to its default value.
    #[inline]
    pub const fn reset(mut self) -> Self {
        self.resettable = true;
        self
    }

    /// Excludes the property from serialization and deserialization.
    #[inline]
    pub const fn skip(mut self) -> Self {
        self.serialized = false;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn kind(&self) -> PropertyKind {
        self.kind
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.writable
    }

    #[inline]
    pub const fn is_resettable(&self) -> bool {
        self.resettable
    }

    #[inline]
    pub const fn is_serialized(&self) -> bool {
        self.serialized
    }
}

// -----------------------------------------------------------------------------
// ObjectInfo

/// Static class metadata of an [`Object`] type.
///
/// Properties are kept in declaration order, which is the order the codec
/// visits them in.
#[derive(Debug)]
pub struct ObjectInfo {
    class_name: &'static str,
    properties: &'static [PropertyInfo],
    constructor: Option<fn() -> Box<dyn Object>>,
}

impl ObjectInfo {
    /// Create a class without a default constructor.
    #[inline]
    pub const fn new(class_name: &'static str, properties: &'static [PropertyInfo]) -> Self {
        Self {
            class_name,
            properties,
            constructor: None,
        }
    }

    /// Attach the default constructor.
    #[inline]
    pub const fn with_constructor(mut self, constructor: fn() -> Box<dyn Object>) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// The full class name, the type identity used by the registry.
    #[inline]
    pub const fn class_name(&self) -> &'static str {
        self.class_name
    }

    /// The last path segment of the class name.
    pub fn short_name(&self) -> &'static str {
        match self.class_name.rfind("::") {
            Some(index) => &self.class_name[index + 2..],
            None => self.class_name,
        }
    }

    /// All properties in declaration order, including skipped ones.
    #[inline]
    pub const fn properties(&self) -> &'static [PropertyInfo] {
        self.properties
    }

    /// Properties that take part in serialization.
    pub fn serialized_properties(&self) -> impl Iterator<Item = &'static PropertyInfo> {
        self.properties.iter().filter(|info| info.is_serialized())
    }

    /// Returns the property with the given name.
    pub fn property(&self, name: &str) -> Option<&'static PropertyInfo> {
        self.properties.iter().find(|info| info.name == name)
    }

    #[inline]
    pub const fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Creates a default instance, `None` if the class has no constructor.
    #[inline]
    pub fn new_instance(&self) -> Option<Box<dyn Object>> {
        self.constructor.map(|constructor| constructor())
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjectInfo, PropertyInfo, PropertyKind};
    use crate::ScalarKind;

    const PROPERTIES: &[PropertyInfo] = &[
        PropertyInfo::object_name(),
        PropertyInfo::new("width", PropertyKind::Scalar(ScalarKind::UInt)),
        PropertyInfo::new("cache", PropertyKind::List).skip(),
    ];

    static INFO: ObjectInfo = ObjectInfo::new("shapes::Frame", PROPERTIES);

    #[test]
    fn object_name_is_skipped() {
        let first = INFO.properties()[0];
        assert!(first.name() == "object_name");
        assert!(!first.is_serialized());
        assert!(!first.is_writable());
    }

    #[test]
    fn serialized_properties_skip_flagged() {
        let names: alloc::vec::Vec<_> = INFO.serialized_properties().map(|p| p.name()).collect();
        assert!(names == ["width"]);
        assert!(INFO.property("cache").is_some());
        assert!(INFO.property("height").is_none());
    }

    #[test]
    fn class_names() {
        assert!(INFO.class_name() == "shapes::Frame");
        assert!(INFO.short_name() == "Frame");
        assert!(!INFO.is_constructible());
        assert!(INFO.new_instance().is_none());
    }
}
