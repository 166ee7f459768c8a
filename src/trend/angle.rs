use std::f64::consts::TAU;

use sha2::{Digest, Sha256};

/// Deterministic angle in `[0, 2π)` for a place name.
///
/// Derived from the first 32 bits of the SHA-256 digest of the UTF-8 bytes, so
/// the same place lands on the same ray in every group and on every run.
pub fn stable_angle(place: &str) -> f64 {
    let digest = Sha256::digest(place.as_bytes());
    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    let unit = f64::from(prefix) / (f64::from(u32::MAX) + 1.0);
    TAU * unit
}

#[cfg(test)]
mod tests {
    use super::stable_angle;
    use proptest::prelude::*;
    use std::f64::consts::TAU;

    #[test]
    fn same_place_same_angle() {
        let a = stable_angle("gangnam");
        let b = stable_angle("gangnam");
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn different_places_usually_differ() {
        assert_ne!(stable_angle("shibuya"), stable_angle("shinjuku"));
    }

    #[test]
    fn empty_place_is_valid() {
        // sha256("") starts with e3b0c442
        let expected = TAU * (f64::from(0xe3b0_c442_u32) / 4_294_967_296.0);
        assert_eq!(stable_angle(""), expected);
    }

    proptest! {
        #[test]
        fn angle_stays_in_range(place in ".*") {
            let angle = stable_angle(&place);
            prop_assert!((0.0..TAU).contains(&angle));
        }
    }
}
