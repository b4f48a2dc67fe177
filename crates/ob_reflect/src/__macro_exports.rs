//! Items used by the expansion of [`impl_object!`](crate::impl_object).

pub use alloc::boxed::Box;

use crate::Object;

/// Default constructor stored in [`ObjectInfo`](crate::ObjectInfo).
pub fn construct<T: Object + Default>() -> Box<dyn Object> {
    Box::new(T::default())
}
