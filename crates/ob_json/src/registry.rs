use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use foldhash::fast::FixedState;
use hashbrown::HashMap;
use ob_reflect::{Object, ObjectClass, ObjectInfo, ScalarKind};

use crate::{ObjectCodec, RegistryError};

// -----------------------------------------------------------------------------
// Hash state

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6F62_4A53_4F4E_5F31);

type FixedMap<K, V> = HashMap<K, V, FixedState>;

// -----------------------------------------------------------------------------
// TypeEntry

/// A registered type: its prototype, serial name and optional custom codec.
///
/// Entries are created by [`TypeRegistry`] registration and are read-only afterwards.
pub struct TypeEntry {
    prototype: Box<dyn Object>,
    serial_name: Cow<'static, str>,
    codec: Option<Box<dyn ObjectCodec>>,
}

impl TypeEntry {
    /// The class name, the type identity.
    #[inline]
    pub fn class_name(&self) -> &'static str {
        self.prototype.class_name()
    }

    /// The external name used as envelope key.
    #[inline]
    pub fn serial_name(&self) -> &str {
        &self.serial_name
    }

    /// The instance used for introspection.
    #[inline]
    pub fn prototype(&self) -> &dyn Object {
        &*self.prototype
    }

    #[inline]
    pub fn info(&self) -> &'static ObjectInfo {
        self.prototype.object_info()
    }

    #[inline]
    pub fn codec(&self) -> Option<&dyn ObjectCodec> {
        self.codec.as_deref()
    }

    /// Creates a default instance, `None` if the class is not default-constructible.
    #[inline]
    pub fn new_instance(&self) -> Option<Box<dyn Object>> {
        self.info().new_instance()
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("class_name", &self.class_name())
            .field("serial_name", &self.serial_name)
            .field("custom_codec", &self.codec.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistry

/// The table of serializable types.
///
/// Maps a class name to its [`TypeEntry`] and a serial name back to its class.
/// The two directions form a bijection: a serial name belongs to exactly one class.
///
/// Registration takes `&mut self` and is meant to happen once, before any
/// encode or decode. Afterwards the registry is shared by reference; see
/// [`TypeRegistryArc`] when types must be added while readers are live.
///
/// # Example
///
/// ```
/// use ob_json::TypeRegistry;
/// use ob_reflect::{impl_object, ObjectClass};
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// impl_object!(Point { x: f64, y: f64 });
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>("point");
///
/// assert_eq!(registry.resolve("point"), Ok(Point::CLASS_NAME));
/// assert_eq!(registry.serial_name_of(Point::CLASS_NAME), "point");
/// assert_eq!(registry.serial_name_of("other::Type"), "other::Type");
/// assert!(registry.codec_for(Point::CLASS_NAME).is_none());
/// ```
pub struct TypeRegistry {
    entries: FixedMap<&'static str, TypeEntry>,
    serial_to_class: FixedMap<Cow<'static, str>, &'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty [`TypeRegistry`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(FIXED_HASH_STATE),
            serial_to_class: HashMap::with_hasher(FIXED_HASH_STATE),
        }
    }

    /// Registers `T` under `serial_name`, using `T::default()` as prototype.
    ///
    /// # Panics
    ///
    /// See [`register_prototype`](Self::register_prototype).
    pub fn register<T: ObjectClass + Default>(&mut self, serial_name: impl Into<Cow<'static, str>>) {
        self.register_prototype(Box::new(T::default()), serial_name, None);
    }

    /// Registers `T` with a custom codec replacing the generic property walk.
    ///
    /// # Panics
    ///
    /// See [`register_prototype`](Self::register_prototype).
    pub fn register_with_codec<T: ObjectClass + Default, C: ObjectCodec>(
        &mut self,
        serial_name: impl Into<Cow<'static, str>>,
        codec: C,
    ) {
        self.register_prototype(Box::new(T::default()), serial_name, Some(Box::new(codec)));
    }

    /// Registers the class of `prototype`.
    ///
    /// Registering the same class under the same serial name again replaces
    /// its prototype and codec.
    ///
    /// This is the only way to register a type that is not default-constructible;
    /// such a type can still be serialized, and deserialized through a custom codec.
    ///
    /// # Panics
    ///
    /// Registration errors are programming errors:
    /// - `serial_name` already belongs to another class;
    /// - the class is already registered under another serial name;
    /// - `serial_name` is a reserved list item tag, such as `int` or `list`.
    pub fn register_prototype(
        &mut self,
        prototype: Box<dyn Object>,
        serial_name: impl Into<Cow<'static, str>>,
        codec: Option<Box<dyn ObjectCodec>>,
    ) {
        let serial_name = serial_name.into();
        let class_name = prototype.class_name();

        if ScalarKind::is_reserved_tag(&serial_name) {
            panic!("cannot register `{class_name}`: serial name `{serial_name}` is a reserved tag");
        }
        if let Some(owner) = self.serial_to_class.get(serial_name.as_ref())
            && *owner != class_name
        {
            panic!(
                "cannot register `{class_name}`: serial name `{serial_name}` is already used by `{owner}`"
            );
        }
        if let Some(entry) = self.entries.get(class_name)
            && entry.serial_name != serial_name
        {
            panic!(
                "cannot register `{class_name}` as `{serial_name}`: it is already registered as `{}`",
                entry.serial_name,
            );
        }

        log::trace!("register `{class_name}` as `{serial_name}`");

        self.serial_to_class.insert(serial_name.clone(), class_name);
        self.entries.insert(
            class_name,
            TypeEntry {
                prototype,
                serial_name,
                codec,
            },
        );
    }

    /// Registers every type submitted with [`submit_serializable!`](crate::submit_serializable).
    ///
    /// Repeated calls are harmless.
    ///
    /// ## Return Value
    ///
    /// Returns `false` when the `auto_register` feature is disabled.
    ///
    /// ## Platform Support
    ///
    /// Supported platforms include Linux, macOS, Windows, iOS, Android, and Web, enabled by
    /// the `inventory` crate. On unsupported platforms nothing is submitted.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::register_submitted(self);
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Translates a serial name to the class name.
    ///
    /// A registered class name is accepted as well, so envelopes keyed by the
    /// raw class name of a type can still be resolved.
    pub fn resolve(&self, serial_name: &str) -> Result<&'static str, RegistryError> {
        if let Some(class_name) = self.serial_to_class.get(serial_name) {
            return Ok(*class_name);
        }
        match self.entries.get_key_value(serial_name) {
            Some((class_name, _)) => Ok(*class_name),
            None => Err(RegistryError::UnregisteredType(String::from(serial_name))),
        }
    }

    /// Translates a class name to its serial name, or returns it unchanged if unmapped.
    pub fn serial_name_of<'a>(&'a self, class_name: &'a str) -> &'a str {
        match self.entries.get(class_name) {
            Some(entry) => entry.serial_name(),
            None => class_name,
        }
    }

    /// Returns the custom codec registered for the class.
    #[inline]
    pub fn codec_for(&self, class_name: &str) -> Option<&dyn ObjectCodec> {
        self.entries.get(class_name).and_then(TypeEntry::codec)
    }

    #[inline]
    pub fn get(&self, class_name: &str) -> Option<&TypeEntry> {
        self.entries.get(class_name)
    }

    /// Returns the entry registered under the serial name.
    pub fn get_by_serial_name(&self, serial_name: &str) -> Option<&TypeEntry> {
        self.serial_to_class
            .get(serial_name)
            .and_then(|class_name| self.entries.get(class_name))
    }

    #[inline]
    pub fn contains(&self, class_name: &str) -> bool {
        self.entries.contains_key(class_name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the registered entries, in arbitrary order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeEntry> {
        self.entries.values()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.serial_to_class.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

use alloc::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared [`TypeRegistry`] for hosts that register types after startup.
///
/// Registration takes the write lock and should stay a rare event.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read()
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal.write()
    }
}

impl From<TypeRegistry> for TypeRegistryArc {
    fn from(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }
}

impl fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.internal.read(), f)
    }
}
