#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod de;
mod error;
mod options;
mod registry;
mod ser;

#[cfg(test)]
mod fixtures;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Exports

pub use codec::{ObjectCodec, TypedCodec};
pub use de::{EnvelopeDeserializer, ErrorSink};
pub use error::{DecodeError, DecodeErrorKind, EncodeError, RegistryError};
pub use options::CodecOptions;
pub use registry::{TypeEntry, TypeRegistry, TypeRegistryArc};
pub use ser::EnvelopeSerializer;

pub use serde_json::{Map, Value};

/// A JSON object with exactly one key, the serial name of a registered type.
///
/// Its value is the encoded form of the object, a property map unless the
/// type has a custom codec.
pub type Envelope = Map<alloc::string::String, Value>;
