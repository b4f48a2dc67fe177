use alloc::string::String;
use alloc::vec::Vec;

use ob_reflect::{LIST_TAG, Object, Variant};
use serde_json::{Map, Number, Value};

use crate::{CodecOptions, EncodeError, Envelope, TypeRegistry};

// -----------------------------------------------------------------------------
// EnvelopeSerializer

/// Encodes objects into single-key envelopes.
///
/// # Serialization Rules
///
/// 1. **Codec First**: if the class has a registered [`ObjectCodec`], its value
///    is stored under the serial name as is.
///
/// 2. **Property Walk**: otherwise every [serialized] property is read and
///    converted by the value it holds:
///    - scalars are stored directly;
///    - a nested object is stored as its property map, without envelope;
///    - a list stores every element in a one-key wrapper tagged with the
///      element's serial name, scalar tag or `list`.
///
/// A property that cannot be read, an empty object slot, and a list holding
/// such an element are skipped. A value with no json representation at all
/// (bytes, a non-finite float) aborts the whole encode.
///
/// Classes that are not registered are keyed by their raw class name.
///
/// # Examples
///
/// ```
/// use ob_json::{EnvelopeSerializer, TypeRegistry};
/// use ob_reflect::{impl_object, Variant};
/// use serde_json::json;
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Path {
///     points: Vec<Variant>,
/// }
///
/// impl_object!(Point { x: f64, y: f64 });
/// impl_object!(Path { points: Vec<Variant> });
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>("point");
/// registry.register::<Path>("path");
///
/// let path = Path {
///     points: vec![
///         Variant::Object(Box::new(Point { x: 1.0, y: 2.0 })),
///         Variant::from("end"),
///     ],
/// };
///
/// let output = EnvelopeSerializer::new(&registry).serialize_value(&path).unwrap();
/// assert_eq!(
///     output,
///     json!({
///         "path": {
///             "points": [
///                 { "point": { "x": 1.0, "y": 2.0 } },
///                 { "string": "end" }
///             ]
///         }
///     })
/// );
/// ```
///
/// [`ObjectCodec`]: crate::ObjectCodec
/// [serialized]: ob_reflect::PropertyInfo::is_serialized
#[derive(Clone, Copy)]
pub struct EnvelopeSerializer<'a> {
    registry: &'a TypeRegistry,
    options: CodecOptions,
}

impl<'a> EnvelopeSerializer<'a> {
    /// Creates a serializer with default [`CodecOptions`].
    #[inline]
    pub const fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            options: CodecOptions::new(),
        }
    }

    #[inline]
    pub const fn with_options(registry: &'a TypeRegistry, options: CodecOptions) -> Self {
        Self { registry, options }
    }

    /// Encodes `object` into an envelope keyed by its serial name.
    pub fn serialize(&self, object: &dyn Object) -> Result<Envelope, EncodeError> {
        let body = self.body(object, 0)?;
        let mut envelope = Map::new();
        envelope.insert(String::from(self.serial_name(object)), body);
        Ok(envelope)
    }

    /// Same as [`serialize`](Self::serialize), returning a [`Value`].
    #[inline]
    pub fn serialize_value(&self, object: &dyn Object) -> Result<Value, EncodeError> {
        self.serialize(object).map(Value::Object)
    }

    #[inline]
    fn serial_name<'b>(&'b self, object: &dyn Object) -> &'b str {
        self.registry.serial_name_of(object.class_name())
    }

    /// The envelope value of `object`, which sits at nesting level `depth`.
    fn body(&self, object: &dyn Object, depth: usize) -> Result<Value, EncodeError> {
        let class = object.class_name();
        if depth >= self.options.max_depth {
            return Err(EncodeError::DepthLimitExceeded {
                class,
                max_depth: self.options.max_depth,
            });
        }

        if let Some(codec) = self.registry.codec_for(class) {
            return codec.serialize(object);
        }

        let mut properties = Map::new();
        for info in object.object_info().serialized_properties() {
            let name = info.name();
            let encoded = match object.property_ref(name) {
                Some(child) => Some(self.body(child, depth + 1)?),
                None => self.encode_variant(object.property(name), depth, class, name)?,
            };
            match encoded {
                Some(value) => {
                    properties.insert(String::from(name), value);
                }
                None => log::debug!("skip unencodable property `{class}::{name}`"),
            }
        }
        Ok(Value::Object(properties))
    }

    /// Converts a value held at nesting level `depth`.
    ///
    /// `Ok(None)` means the value is skipped.
    fn encode_variant(
        &self,
        value: Variant,
        depth: usize,
        class: &'static str,
        property: &str,
    ) -> Result<Option<Value>, EncodeError> {
        let unsupported = |kind: &'static str| EncodeError::UnsupportedValue {
            class,
            property: String::from(property),
            kind,
        };

        let value = match value {
            Variant::Invalid | Variant::Null => return Ok(None),
            Variant::Bool(value) => Value::Bool(value),
            Variant::Int(value) => Value::from(value),
            Variant::UInt(value) => Value::from(value),
            Variant::Float(value) => match Number::from_f64(value) {
                Some(number) => Value::Number(number),
                None => return Err(unsupported("float")),
            },
            Variant::String(value) => Value::String(value),
            Variant::Bytes(_) => return Err(unsupported("bytes")),
            Variant::Object(object) => self.body(&*object, depth + 1)?,
            Variant::List(items) => match self.encode_list(items, depth + 1, class, property)? {
                Some(list) => list,
                None => return Ok(None),
            },
        };
        Ok(Some(value))
    }

    fn encode_list(
        &self,
        items: Vec<Variant>,
        depth: usize,
        class: &'static str,
        property: &str,
    ) -> Result<Option<Value>, EncodeError> {
        if depth >= self.options.max_depth {
            return Err(EncodeError::DepthLimitExceeded {
                class,
                max_depth: self.options.max_depth,
            });
        }

        let mut list = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let tag = match &item {
                Variant::Object(object) => String::from(self.serial_name(&**object)),
                Variant::List(_) => String::from(LIST_TAG),
                other => match other.scalar_kind() {
                    Some(kind) => String::from(kind.tag()),
                    None => {
                        log::debug!("list `{class}::{property}` holds an empty element at {index}");
                        return Ok(None);
                    }
                },
            };
            let Some(value) = self.encode_variant(item, depth, class, property)? else {
                return Ok(None);
            };
            let mut wrapper = Map::new();
            wrapper.insert(tag, value);
            list.push(Value::Object(wrapper));
        }
        Ok(Some(Value::Array(list)))
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;

    use core::sync::atomic::{AtomicUsize, Ordering};

    use ob_reflect::{ObjectClass, Variant, impl_object};
    use serde_json::json;

    use super::EnvelopeSerializer;
    use crate::fixtures::{Blob, Circle, Color, Drawing, Node, Square, registry};
    use crate::{CodecOptions, EncodeError, TypeRegistry};

    #[test]
    fn envelope_has_single_serial_key() {
        let registry = registry();
        let circle = Circle {
            radius: 2.0,
            label: String::from("c"),
        };
        let envelope = EnvelopeSerializer::new(&registry).serialize(&circle).unwrap();
        assert!(envelope.len() == 1);
        assert!(envelope["circle"] == json!({ "radius": 2.0, "label": "c" }));
    }

    #[test]
    fn unmapped_class_uses_class_name() {
        let registry = TypeRegistry::new();
        let envelope = EnvelopeSerializer::new(&registry)
            .serialize(&Square { side: 1.5 })
            .unwrap();
        assert!(envelope.keys().eq([Square::CLASS_NAME]));
    }

    #[test]
    fn nested_and_list_values() {
        let registry = registry();
        let drawing = Drawing {
            title: String::from("sketch"),
            opacity: 0.5,
            focus: Some(Box::new(Circle {
                radius: 1.0,
                label: String::from("f"),
            })),
            background: Some(Box::new(Color { r: 255, g: 128, b: 0 })),
            shapes: vec![
                Variant::Int(3),
                Variant::Object(Box::new(Square { side: 4.0 })),
                Variant::List(vec![Variant::Bool(true)]),
            ],
            thumbnail: vec![1, 2, 3],
        };

        let output = EnvelopeSerializer::new(&registry)
            .serialize_value(&drawing)
            .unwrap();
        assert!(
            output
                == json!({
                    "drawing": {
                        "title": "sketch",
                        "opacity": 0.5,
                        "focus": { "radius": 1.0, "label": "f" },
                        "background": "#ff8000",
                        "shapes": [
                            { "int": 3 },
                            { "square": { "side": 4.0 } },
                            { "list": [ { "bool": true } ] }
                        ]
                    }
                })
        );
    }

    #[test]
    fn empty_slots_are_skipped() {
        let registry = registry();
        let output = EnvelopeSerializer::new(&registry)
            .serialize_value(&Drawing::default())
            .unwrap();
        assert!(
            output
                == json!({
                    "drawing": { "title": "", "opacity": 1.0, "shapes": [] }
                })
        );
    }

    #[test]
    fn list_with_empty_element_is_skipped() {
        let registry = registry();
        let drawing = Drawing {
            shapes: vec![Variant::Int(1), Variant::Null],
            ..Drawing::default()
        };
        let envelope = EnvelopeSerializer::new(&registry).serialize(&drawing).unwrap();
        assert!(envelope["drawing"].get("shapes").is_none());
        assert!(envelope["drawing"].get("title").is_some());
    }

    #[test]
    fn unsupported_values_abort() {
        let registry = registry();
        let serializer = EnvelopeSerializer::new(&registry);

        let error = serializer.serialize(&Blob { data: vec![1] }).unwrap_err();
        assert!(matches!(
            error,
            EncodeError::UnsupportedValue { kind: "bytes", ref property, .. } if property == "data"
        ));

        let circle = Circle {
            radius: f64::NAN,
            label: String::new(),
        };
        let error = serializer.serialize(&circle).unwrap_err();
        assert!(matches!(
            error,
            EncodeError::UnsupportedValue { kind: "float", class, .. } if class == Circle::CLASS_NAME
        ));

        let drawing = Drawing {
            shapes: vec![Variant::Bytes(vec![0])],
            ..Drawing::default()
        };
        assert!(serializer.serialize(&drawing).is_err());
    }

    static LINK_CLONES: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug, Default, PartialEq)]
    struct Link {
        value: i64,
        next: Option<Box<Link>>,
    }

    impl Clone for Link {
        fn clone(&self) -> Self {
            LINK_CLONES.fetch_add(1, Ordering::Relaxed);
            Self {
                value: self.value,
                next: self.next.clone(),
            }
        }
    }

    impl_object!(Link {
        value: i64,
        next: Option<Box<Link>>,
    });

    #[test]
    fn nested_objects_are_borrowed() {
        let chain = (0..8).fold(None, |next, value| Some(Box::new(Link { value, next })));
        let head = chain.unwrap();

        let registry = TypeRegistry::new();
        let envelope = EnvelopeSerializer::new(&registry).serialize(&*head).unwrap();
        assert!(LINK_CLONES.load(Ordering::Relaxed) == 0);

        let mut body = &envelope[Link::CLASS_NAME];
        for value in (0..8).rev() {
            assert!(body["value"] == json!(value));
            body = &body["next"];
        }
        assert!(body.is_null());
    }

    #[test]
    fn depth_limit() {
        let registry = registry();
        let options = CodecOptions::new().with_max_depth(3);
        let serializer = EnvelopeSerializer::with_options(&registry, options);

        let shallow = Node::chain(3).unwrap();
        assert!(serializer.serialize(&*shallow).is_ok());

        let deep = Node::chain(4).unwrap();
        assert!(
            serializer.serialize(&*deep)
                == Err(EncodeError::DepthLimitExceeded {
                    class: Node::CLASS_NAME,
                    max_depth: 3,
                })
        );
    }
}
