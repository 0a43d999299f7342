//! Integer constants carrying an explicit or derived bit-vector type.

use crate::bv::Bv;
use crate::error::IrError;
use serde::{Deserialize, Serialize};

/// A constant value with its bit-vector type.
///
/// The invariant `bv.can_hold(value)` is established at construction:
/// [`Constant::new`] derives the minimal type, and [`Constant::with_bv`]
/// checks the fit before accepting an explicit one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constant {
    /// The constant value.
    pub value: i128,
    /// The bit-vector type.
    pub bv: Bv,
}

impl Constant {
    /// Creates a constant with the minimal bit vector for `value`.
    ///
    /// Non-negative values become unsigned, negative values become
    /// signed two's-complement, each with minimal width.
    pub fn new(value: i128) -> Self {
        Self {
            value,
            bv: Bv::for_value(value),
        }
    }

    /// Creates a constant with an explicitly supplied bit vector.
    ///
    /// Fails with [`IrError::ConstantOverflow`] if `value` is not
    /// representable in `bv`.
    pub fn with_bv(value: i128, bv: Bv) -> Result<Self, IrError> {
        if !bv.can_hold(value) {
            return Err(IrError::ConstantOverflow {
                value,
                width: bv.width,
                signed: bv.signed,
            });
        }
        Ok(Self { value, bv })
    }
}

impl From<i128> for Constant {
    fn from(value: i128) -> Self {
        Self::new(value)
    }
}
