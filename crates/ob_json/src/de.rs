use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use ob_reflect::{LIST_TAG, Object, ObjectClass, PropertyKind, ScalarKind, Variant};
use serde_json::{Map, Value};

use crate::{CodecOptions, DecodeError, DecodeErrorKind, Envelope, TypeRegistry};

// -----------------------------------------------------------------------------
// ErrorSink

/// Accumulates the message of an aborted decode.
///
/// The innermost failure pushes first and fixes the [`DecodeErrorKind`];
/// every enclosing level then appends one line naming the property it was
/// decoding.
#[derive(Debug, Default, Clone)]
pub struct ErrorSink {
    kind: Option<DecodeErrorKind>,
    lines: Vec<String>,
}

impl ErrorSink {
    #[inline]
    pub const fn new() -> Self {
        Self {
            kind: None,
            lines: Vec::new(),
        }
    }

    /// Appends a line. The first pushed kind is kept.
    pub fn push(&mut self, kind: DecodeErrorKind, line: impl Into<String>) {
        if self.kind.is_none() {
            self.kind = Some(kind);
        }
        self.lines.push(line.into());
    }

    fn context(&mut self, line: String) {
        self.lines.push(line);
    }

    #[inline]
    pub const fn kind(&self) -> Option<DecodeErrorKind> {
        self.kind
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined by newlines, innermost first.
    pub fn message(&self) -> String {
        self.lines.join("\n")
    }

    /// Keeps the first `len` lines, forgetting the kind once the sink is empty.
    pub fn truncate(&mut self, len: usize) {
        self.lines.truncate(len);
        if self.lines.is_empty() {
            self.kind = None;
        }
    }

    pub fn clear(&mut self) {
        self.kind = None;
        self.lines.clear();
    }

    pub fn into_error(self) -> DecodeError {
        match self.kind {
            Some(kind) => DecodeError::new(kind, self.lines.join("\n")),
            None if self.lines.is_empty() => {
                DecodeError::new(DecodeErrorKind::Custom, "deserialization failed")
            }
            None => DecodeError::new(DecodeErrorKind::Custom, self.lines.join("\n")),
        }
    }
}

// -----------------------------------------------------------------------------
// EnvelopeDeserializer

/// Rebuilds objects from envelopes.
///
/// # Deserialization Rules
///
/// The concrete class comes from the envelope key, or from an explicit
/// type name with [`deserialize_as`](Self::deserialize_as). Then:
///
/// 1. **Codec First**: a registered [`ObjectCodec`] receives the value as is.
///
/// 2. **Property Walk**: otherwise a default instance is created and every
///    writable, serialized property is written from the property map:
///    - a nested object is decoded from its own envelope when the value has
///      one, and as the declared class otherwise;
///    - list elements are decoded by their wrapper tag: a scalar tag, `list`,
///      or the serial name of a registered class. The list is written once,
///      after all elements are decoded;
///    - a missing or `null` nested object clears the slot, a missing list is
///      empty.
///
/// When a property value cannot be decoded or written and the property is
/// resettable, it is reset and its errors are dropped. Any other failure
/// aborts the object being built and every enclosing one.
///
/// Every method comes in two flavours: a `Result` one, and a `_with` one
/// that leaves the accumulated message in a caller-supplied [`ErrorSink`].
///
/// # Examples
///
/// ```
/// use ob_json::{DecodeErrorKind, EnvelopeDeserializer, TypeRegistry};
/// use ob_reflect::impl_object;
/// use serde_json::json;
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
/// let deserializer = EnvelopeDeserializer::new(&registry);
///
/// let input = json!({ "point": { "x": 1.0, "y": 2.0 } });
/// let point = deserializer.deserialize_value_to::<Point>(&input).unwrap();
/// assert_eq!(*point, Point { x: 1.0, y: 2.0 });
///
/// let input = json!({ "point": { "x": 1.0, "y": "two" } });
/// let error = deserializer.deserialize_value(&input).unwrap_err();
/// assert_eq!(error.kind(), DecodeErrorKind::PropertyWriteFailed);
/// ```
///
/// [`ObjectCodec`]: crate::ObjectCodec
#[derive(Clone, Copy)]
pub struct EnvelopeDeserializer<'a> {
    registry: &'a TypeRegistry,
    options: CodecOptions,
}

impl<'a> EnvelopeDeserializer<'a> {
    /// Creates a deserializer with default [`CodecOptions`].
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

    /// Decodes an envelope, resolving the class from its only key.
    pub fn deserialize(&self, envelope: &Envelope) -> Result<Box<dyn Object>, DecodeError> {
        let mut errors = ErrorSink::new();
        self.deserialize_with(envelope, &mut errors)
            .ok_or_else(|| errors.into_error())
    }

    /// Same as [`deserialize`](Self::deserialize), reporting into `errors`.
    pub fn deserialize_with(
        &self,
        envelope: &Envelope,
        errors: &mut ErrorSink,
    ) -> Option<Box<dyn Object>> {
        let object = self.decode_envelope(envelope, errors);
        if object.is_none() {
            log::debug!("failed to deserialize envelope: {}", errors.message());
        }
        object
    }

    /// Decodes an envelope held in a [`Value`].
    pub fn deserialize_value(&self, value: &Value) -> Result<Box<dyn Object>, DecodeError> {
        match value {
            Value::Object(envelope) => self.deserialize(envelope),
            other => Err(DecodeError::new(
                DecodeErrorKind::MalformedEnvelope,
                format!("expected a json object, found {}", json_type(other)),
            )),
        }
    }

    /// Decodes a property map as the class named by `type_name`.
    ///
    /// `type_name` may be a serial name or a registered class name.
    pub fn deserialize_as(
        &self,
        properties: &Value,
        type_name: &str,
    ) -> Result<Box<dyn Object>, DecodeError> {
        let mut errors = ErrorSink::new();
        self.deserialize_as_with(properties, type_name, &mut errors)
            .ok_or_else(|| errors.into_error())
    }

    /// Same as [`deserialize_as`](Self::deserialize_as), reporting into `errors`.
    pub fn deserialize_as_with(
        &self,
        properties: &Value,
        type_name: &str,
        errors: &mut ErrorSink,
    ) -> Option<Box<dyn Object>> {
        let object = self
            .resolve(type_name, errors)
            .and_then(|class| self.decode_class(properties, class, 0, errors));
        if object.is_none() {
            log::debug!("failed to deserialize `{type_name}`: {}", errors.message());
        }
        object
    }

    /// Decodes an envelope and takes the concrete `T` out of it.
    pub fn deserialize_to<T: ObjectClass>(&self, envelope: &Envelope) -> Result<Box<T>, DecodeError> {
        downcast(self.deserialize(envelope)?)
    }

    /// Same as [`deserialize_to`](Self::deserialize_to), for an envelope held in a [`Value`].
    pub fn deserialize_value_to<T: ObjectClass>(&self, value: &Value) -> Result<Box<T>, DecodeError> {
        downcast(self.deserialize_value(value)?)
    }

    fn decode_envelope(&self, envelope: &Envelope, errors: &mut ErrorSink) -> Option<Box<dyn Object>> {
        let (serial_name, body) = match envelope.len() {
            1 => envelope.iter().next()?,
            0 => {
                errors.push(DecodeErrorKind::MalformedEnvelope, "empty json object");
                return None;
            }
            _ => {
                errors.push(
                    DecodeErrorKind::MalformedEnvelope,
                    "json object contains multiple keys",
                );
                return None;
            }
        };
        let class = self.resolve(serial_name, errors)?;
        self.decode_class(body, class, 0, errors)
    }

    fn resolve(&self, name: &str, errors: &mut ErrorSink) -> Option<&'static str> {
        match self.registry.resolve(name) {
            Ok(class) => Some(class),
            Err(error) => {
                errors.push(DecodeErrorKind::UnregisteredType, error.to_string());
                None
            }
        }
    }

    /// Builds a `class` instance at nesting level `depth` from its envelope value.
    fn decode_class(
        &self,
        body: &Value,
        class: &str,
        depth: usize,
        errors: &mut ErrorSink,
    ) -> Option<Box<dyn Object>> {
        if depth >= self.options.max_depth {
            errors.push(
                DecodeErrorKind::DepthLimitExceeded,
                format!(
                    "`{class}` exceeds the maximum nesting depth of {}",
                    self.options.max_depth
                ),
            );
            return None;
        }

        let Some(entry) = self.registry.get(class) else {
            errors.push(
                DecodeErrorKind::UnregisteredType,
                format!("class `{class}` is not registered for deserialization"),
            );
            return None;
        };

        if let Some(codec) = entry.codec() {
            let pushed = errors.len();
            let object = codec.deserialize(body, errors);
            if object.is_none() && errors.len() == pushed {
                errors.push(
                    DecodeErrorKind::Custom,
                    format!("custom codec for `{class}` rejected its input"),
                );
            }
            return object;
        }

        let Some(mut instance) = entry.new_instance() else {
            errors.push(
                DecodeErrorKind::NotConstructible,
                format!("class `{class}` has no default constructor"),
            );
            return None;
        };

        let Value::Object(properties) = body else {
            errors.push(
                DecodeErrorKind::MalformedEnvelope,
                format!(
                    "expected the property map of `{class}`, found {}",
                    json_type(body)
                ),
            );
            return None;
        };

        let class = instance.class_name();
        for info in instance.object_info().serialized_properties() {
            if !info.is_writable() {
                continue;
            }
            let name = info.name();
            let raw = properties.get(name);

            let checkpoint = errors.len();
            let decoded = match info.kind() {
                PropertyKind::Scalar(_) => Some(raw.map_or(Variant::Invalid, json_to_variant)),
                PropertyKind::Object(declared) => match raw {
                    None | Some(Value::Null) => Some(Variant::Null),
                    Some(raw) => self
                        .decode_nested(raw, declared, depth, errors)
                        .map(Variant::Object),
                },
                PropertyKind::List => match raw {
                    None | Some(Value::Null) => Some(Variant::List(Vec::new())),
                    Some(raw) => self.decode_list(raw, depth + 1, errors).map(Variant::List),
                },
            };

            let Some(value) = decoded else {
                if info.is_resettable() && instance.reset_property(name) {
                    log::debug!(
                        "reset `{class}::{name}` after failed decode: {}",
                        errors.lines().get(checkpoint..).unwrap_or_default().join("; ")
                    );
                    errors.truncate(checkpoint);
                    continue;
                }
                errors.context(property_context(class, name, info.type_name()));
                return None;
            };

            if let Err(error) = instance.set_property(name, value) {
                if info.is_resettable() && instance.reset_property(name) {
                    log::debug!("reset `{class}::{name}` after rejected write: {error}");
                    continue;
                }
                errors.push(
                    DecodeErrorKind::PropertyWriteFailed,
                    format!("{}: {error}", property_context(class, name, info.type_name())),
                );
                return None;
            }
        }

        Some(instance)
    }

    /// Decodes the value of an object property owned by an object at level `depth`.
    fn decode_nested(
        &self,
        raw: &Value,
        declared: &str,
        depth: usize,
        errors: &mut ErrorSink,
    ) -> Option<Box<dyn Object>> {
        if let Some((key, inner)) = single_entry(raw)
            && let Ok(class) = self.registry.resolve(key)
        {
            return self.decode_class(inner, class, depth + 1, errors);
        }
        let class = self.resolve(declared, errors)?;
        self.decode_class(raw, class, depth + 1, errors)
    }

    /// Decodes a list of wrapped elements at nesting level `depth`.
    fn decode_list(&self, raw: &Value, depth: usize, errors: &mut ErrorSink) -> Option<Vec<Variant>> {
        if depth >= self.options.max_depth {
            errors.push(
                DecodeErrorKind::DepthLimitExceeded,
                format!(
                    "list exceeds the maximum nesting depth of {}",
                    self.options.max_depth
                ),
            );
            return None;
        }

        let Value::Array(items) = raw else {
            errors.push(
                DecodeErrorKind::MalformedEnvelope,
                format!("expected a json array, found {}", json_type(raw)),
            );
            return None;
        };

        let mut list = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let Some((tag, value)) = single_entry(item) else {
                errors.push(
                    DecodeErrorKind::MalformedEnvelope,
                    format!("list item {index} is not a single-key json object"),
                );
                return None;
            };

            let element = if tag == LIST_TAG {
                Variant::List(self.decode_list(value, depth + 1, errors)?)
            } else if let Some(kind) = ScalarKind::from_tag(tag) {
                match scalar_from_json(kind, value) {
                    Some(element) => element,
                    None => {
                        errors.push(
                            DecodeErrorKind::MalformedEnvelope,
                            format!("list item {index} is tagged `{tag}` but holds {}", json_type(value)),
                        );
                        return None;
                    }
                }
            } else {
                let class = self.resolve(tag, errors)?;
                match self.decode_class(value, class, depth + 1, errors) {
                    Some(object) => Variant::Object(object),
                    None => {
                        errors.context(format!("failed to deserialize list item {index} of type `{tag}`"));
                        return None;
                    }
                }
            };
            list.push(element);
        }
        Some(list)
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn downcast<T: ObjectClass>(object: Box<dyn Object>) -> Result<Box<T>, DecodeError> {
    let found = object.class_name();
    object.downcast::<T>().map_err(|_| {
        DecodeError::new(
            DecodeErrorKind::TypeMismatch,
            format!("failed to cast `{found}` to type `{}`", T::CLASS_NAME),
        )
    })
}

fn property_context(class: &str, property: &str, type_name: &str) -> String {
    format!("failed to deserialize `{class}::{property}` of type `{type_name}`")
}

/// The key and value of a one-key json object.
fn single_entry(value: &Value) -> Option<(&str, &Value)> {
    match value {
        Value::Object(map) if map.len() == 1 => first_entry(map),
        _ => None,
    }
}

#[inline]
fn first_entry(map: &Map<String, Value>) -> Option<(&str, &Value)> {
    map.iter().next().map(|(key, value)| (key.as_str(), value))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Converts a json value to the closest scalar variant; the property decides
/// whether it accepts it.
fn json_to_variant(value: &Value) -> Variant {
    match value {
        Value::Null => Variant::Null,
        Value::Bool(value) => Variant::Bool(*value),
        Value::Number(number) => {
            if let Some(value) = number.as_i64() {
                Variant::Int(value)
            } else if let Some(value) = number.as_u64() {
                Variant::UInt(value)
            } else {
                number.as_f64().map_or(Variant::Invalid, Variant::Float)
            }
        }
        Value::String(value) => Variant::String(value.clone()),
        Value::Array(_) | Value::Object(_) => Variant::Invalid,
    }
}

/// Converts the value of a list item tagged with a scalar kind.
fn scalar_from_json(kind: ScalarKind, value: &Value) -> Option<Variant> {
    match kind {
        ScalarKind::Bool => value.as_bool().map(Variant::Bool),
        ScalarKind::Int => value.as_i64().map(Variant::Int),
        ScalarKind::UInt => value.as_u64().map(Variant::UInt),
        ScalarKind::Float => value.as_f64().map(Variant::Float),
        ScalarKind::String => value.as_str().map(Variant::from),
        ScalarKind::Bytes => None,
    }
}
