//! Runtime utilities for generated code (Macros).
//! Do not use directly.

use crate::error::BitformError;
use crate::format::Integer;

pub use crate::layout::{Field, Layout};

/// Error for an enum value that matches no variant of `T`.
pub fn invalid_discriminant<T: ?Sized, R: Integer>(raw: R) -> BitformError {
    BitformError::InvalidDiscriminant {
        type_name: std::any::type_name::<T>(),
        raw: raw.to_raw(),
    }
}

/// Wire width of an enum's `repr` integer.
pub const fn repr_bits<R: Integer>() -> u32 {
    R::BITS
}
