//! Minimal-width arithmetic for two's-complement bit vectors.

/// Returns the minimal number of bits needed to represent `value`.
///
/// Non-negative values get the minimal unsigned width (with `0` taking
/// one bit); negative values get the minimal signed two's-complement
/// width. This is the derivation rule used when a constant is built
/// without an explicit bit-vector type.
pub fn bits_for(value: i128) -> u32 {
    if value >= 0 {
        let mut bits = 1;
        while value >> bits != 0 {
            bits += 1;
        }
        bits
    } else {
        // Minimal n with -2^(n-1) <= value, i.e. the sign bit absorbs
        // everything above position n-1.
        let mut bits = 1;
        while value >> (bits - 1) != -1 {
            bits += 1;
        }
        bits
    }
}

/// Returns the minimal unsigned width for an address covering `depth` words.
///
/// `bits_for_range(1)` is 1 bit; `bits_for_range(256)` is 8 bits.
pub fn bits_for_range(depth: u32) -> u32 {
    if depth <= 1 {
        1
    } else {
        bits_for(i128::from(depth) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_takes_one_bit() {
        assert_eq!(bits_for(0), 1);
    }

    #[test]
    fn small_positives() {
        assert_eq!(bits_for(1), 1);
        assert_eq!(bits_for(2), 2);
        assert_eq!(bits_for(3), 2);
        assert_eq!(bits_for(4), 3);
        assert_eq!(bits_for(255), 8);
        assert_eq!(bits_for(256), 9);
    }

    #[test]
    fn negatives_are_twos_complement() {
        // -1 fits in a single signed bit, -2 needs two, -129 needs nine.
        assert_eq!(bits_for(-1), 1);
        assert_eq!(bits_for(-2), 2);
        assert_eq!(bits_for(-128), 8);
        assert_eq!(bits_for(-129), 9);
    }

    #[test]
    fn derivation_is_idempotent() {
        for v in [0i128, 1, 7, 255, 256, -1, -2, -128, 1 << 40] {
            assert_eq!(bits_for(v), bits_for(v));
        }
    }

    #[test]
    fn address_ranges() {
        assert_eq!(bits_for_range(0), 1);
        assert_eq!(bits_for_range(1), 1);
        assert_eq!(bits_for_range(2), 1);
        assert_eq!(bits_for_range(3), 2);
        assert_eq!(bits_for_range(256), 8);
        assert_eq!(bits_for_range(257), 9);
    }
}
