#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Extern Self

// Doc tests and `impl_object!` expansions inside this crate both refer to `ob_reflect`.
extern crate self as ob_reflect;

// -----------------------------------------------------------------------------
// Modules

mod info;
mod macros;
mod object;
mod property_type;
mod variant;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Exports

pub use info::{OBJECT_NAME, ObjectInfo, PropertyInfo, PropertyKind};
pub use object::{Object, ObjectClass, WriteError};
pub use property_type::PropertyType;
pub use variant::{LIST_TAG, ScalarKind, Variant};
