//! The bit-vector type: signedness plus width.
//!
//! Every value-carrying entity in the IR (signals, constants, resolved
//! expression nodes) is described by a [`Bv`]. It is a pure value type;
//! width inference for composite expressions lives in the elaboration
//! crate, which uses the rules exposed here as helpers.

use fen_common::bits_for;
use serde::{Deserialize, Serialize};

/// A bit-vector type descriptor: width in bits and signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bv {
    /// The number of bits.
    pub width: u32,
    /// Whether values are interpreted as two's-complement signed.
    pub signed: bool,
}

impl Bv {
    /// A single unsigned bit.
    pub const BIT: Bv = Bv {
        width: 1,
        signed: false,
    };

    /// Creates an unsigned bit vector of the given width.
    pub fn new(width: u32) -> Self {
        Self {
            width,
            signed: false,
        }
    }

    /// Creates a signed bit vector of the given width.
    pub fn signed(width: u32) -> Self {
        Self {
            width,
            signed: true,
        }
    }

    /// Derives the minimal bit vector that can represent `value`.
    ///
    /// Non-negative values get the minimal *unsigned* width; negative
    /// values get the minimal *signed* two's-complement width. This is
    /// the rule applied when a constant is built without an explicit type.
    pub fn for_value(value: i128) -> Self {
        Self {
            width: bits_for(value),
            signed: value < 0,
        }
    }

    /// Returns `true` if `value` is representable in this bit vector.
    pub fn can_hold(self, value: i128) -> bool {
        if self.width == 0 {
            return false;
        }
        let minimal = bits_for(value);
        if value >= 0 {
            // An unsigned type needs `minimal` bits; a signed one needs
            // one more for the sign.
            self.width >= minimal + u32::from(self.signed)
        } else {
            self.signed && self.width >= minimal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_constructor() {
        let bv = Bv::new(8);
        assert_eq!(bv.width, 8);
        assert!(!bv.signed);
    }

    #[test]
    fn signed_constructor() {
        let bv = Bv::signed(16);
        assert_eq!(bv.width, 16);
        assert!(bv.signed);
    }

    #[test]
    fn single_bit() {
        assert_eq!(Bv::BIT, Bv::new(1));
    }

    #[test]
    fn derive_nonnegative() {
        assert_eq!(Bv::for_value(0), Bv::new(1));
        assert_eq!(Bv::for_value(1), Bv::new(1));
        assert_eq!(Bv::for_value(255), Bv::new(8));
        assert_eq!(Bv::for_value(256), Bv::new(9));
    }

    #[test]
    fn derive_negative() {
        assert_eq!(Bv::for_value(-1), Bv::signed(1));
        assert_eq!(Bv::for_value(-2), Bv::signed(2));
        assert_eq!(Bv::for_value(-128), Bv::signed(8));
        assert_eq!(Bv::for_value(-129), Bv::signed(9));
    }

    #[test]
    fn can_hold_unsigned() {
        let bv = Bv::new(8);
        assert!(bv.can_hold(0));
        assert!(bv.can_hold(255));
        assert!(!bv.can_hold(256));
        assert!(!bv.can_hold(-1));
    }

    #[test]
    fn can_hold_signed() {
        let bv = Bv::signed(8);
        assert!(bv.can_hold(-128));
        assert!(bv.can_hold(127));
        assert!(!bv.can_hold(128));
        assert!(!bv.can_hold(-129));
    }

    #[test]
    fn signed_needs_room_for_sign_bit() {
        assert!(!Bv::signed(8).can_hold(128));
        assert!(Bv::signed(9).can_hold(128));
    }

    #[test]
    fn serde_roundtrip() {
        let bv = Bv::signed(12);
        let json = serde_json::to_string(&bv).unwrap();
        let restored: Bv = serde_json::from_str(&json).unwrap();
        assert_eq!(bv, restored);
    }
}
