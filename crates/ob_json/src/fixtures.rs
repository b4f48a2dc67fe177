//! Shared test types.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use ob_reflect::{
    OBJECT_NAME, Object, ObjectClass, ObjectInfo, PropertyInfo, PropertyKind, ScalarKind, Variant,
    WriteError, impl_object,
};

use crate::{DecodeErrorKind, EncodeError, ErrorSink, TypeRegistry, TypedCodec, Value};

// -----------------------------------------------------------------------------
// Shapes

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Circle {
    pub radius: f64,
    pub label: String,
}

impl_object!(Circle {
    radius: f64,
    label: String,
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Square {
    pub side: f64,
}

impl_object!(Square { side: f64 });

// -----------------------------------------------------------------------------
// Color

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl_object!(Color { r: u8, g: u8, b: u8 });

/// Encodes a [`Color`] as `"#rrggbb"`.
#[derive(Debug, Default)]
pub struct ColorCodec;

impl TypedCodec for ColorCodec {
    type Target = Color;

    fn serialize_typed(&self, color: &Color) -> Result<Value, EncodeError> {
        Ok(Value::String(format!(
            "#{:02x}{:02x}{:02x}",
            color.r, color.g, color.b
        )))
    }

    fn deserialize_typed(&self, value: &Value, errors: &mut ErrorSink) -> Option<Color> {
        let parsed = value
            .as_str()
            .and_then(|text| text.strip_prefix('#'))
            .filter(|hex| hex.len() == 6)
            .and_then(|hex| {
                let channel = |at: usize| u8::from_str_radix(hex.get(at..at + 2)?, 16).ok();
                Some(Color {
                    r: channel(0)?,
                    g: channel(2)?,
                    b: channel(4)?,
                })
            });
        if parsed.is_none() {
            errors.push(
                DecodeErrorKind::Custom,
                format!("expected a `#rrggbb` color, found `{value}`"),
            );
        }
        parsed
    }
}

// -----------------------------------------------------------------------------
// Drawing

#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub title: String,
    pub opacity: f64,
    pub focus: Option<Box<Circle>>,
    pub background: Option<Box<Color>>,
    pub shapes: Vec<Variant>,
    pub thumbnail: Vec<u8>,
}

impl Default for Drawing {
    fn default() -> Self {
        Self {
            title: String::new(),
            opacity: 1.0,
            focus: None,
            background: None,
            shapes: Vec::new(),
            thumbnail: Vec::new(),
        }
    }
}

impl_object!(Drawing {
    title: String,
    [reset] opacity: f64,
    focus: Option<Box<Circle>>,
    background: Option<Box<Color>>,
    shapes: Vec<Variant>,
    [skip] thumbnail: Vec<u8>,
});

// -----------------------------------------------------------------------------
// Frame

/// Resettable object and list slots.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    pub focus: Option<Box<Circle>>,
    pub layers: Vec<Variant>,
}

impl_object!(Frame {
    name: String,
    [reset] focus: Option<Box<Circle>>,
    [reset] layers: Vec<Variant>,
});

// -----------------------------------------------------------------------------
// Node

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Node {
    pub value: i64,
    pub next: Option<Box<Node>>,
}

impl_object!(Node {
    value: i64,
    next: Option<Box<Node>>,
});

impl Node {
    /// A chain of `len` nodes valued `0..len`.
    pub fn chain(len: usize) -> Option<Box<Node>> {
        (0..len).rev().fold(None, |next, value| {
            Some(Box::new(Node {
                value: value as i64,
                next,
            }))
        })
    }
}

// -----------------------------------------------------------------------------
// Blob

/// Holds bytes, which have no json form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl_object!(Blob { data: Vec<u8> });

// -----------------------------------------------------------------------------
// Opaque

/// A hand-written object without default constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Opaque {
    pub id: u64,
}

const OPAQUE_PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::object_name(),
    PropertyInfo::new("id", PropertyKind::Scalar(ScalarKind::UInt)).read_only(),
];

static OPAQUE_INFO: ObjectInfo = ObjectInfo::new(Opaque::CLASS_NAME, OPAQUE_PROPERTIES);

impl ObjectClass for Opaque {
    const CLASS_NAME: &'static str = "ob_json::fixtures::Opaque";

    fn class_info() -> &'static ObjectInfo {
        &OPAQUE_INFO
    }
}

impl Object for Opaque {
    fn object_info(&self) -> &'static ObjectInfo {
        &OPAQUE_INFO
    }

    fn property(&self, name: &str) -> Variant {
        match name {
            OBJECT_NAME => Variant::from("Opaque"),
            "id" => Variant::UInt(self.id),
            _ => Variant::Invalid,
        }
    }

    fn set_property(&mut self, name: &str, _value: Variant) -> Result<(), WriteError> {
        match OPAQUE_INFO.property(name) {
            Some(info) => Err(WriteError::ReadOnly(info.name())),
            None => Err(WriteError::unknown(name)),
        }
    }

    fn reset_property(&mut self, _name: &str) -> bool {
        false
    }

    fn clone_object(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    fn object_eq(&self, other: &dyn Object) -> bool {
        other.downcast_ref::<Opaque>() == Some(self)
    }
}

// -----------------------------------------------------------------------------
// Registry

pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register::<Circle>("circle");
    registry.register::<Square>("square");
    registry.register_with_codec::<Color, _>("color", ColorCodec);
    registry.register::<Drawing>("drawing");
    registry.register::<Frame>("frame");
    registry.register::<Node>("node");
    registry.register_prototype(Box::new(Opaque { id: 0 }), "opaque", None);
    registry
}
