use proptest::prelude::*;

use upgov_types::{apply_bps, Address, GovernanceParams, Timestamp, BPS_DENOMINATOR};

proptest! {
    /// Address display/parse roundtrip.
    #[test]
    fn address_text_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::new(bytes);
        let parsed: Address = addr.to_string().parse().unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// Address::is_zero is true only for all-zero bytes.
    #[test]
    fn address_is_zero_correct(bytes in prop::array::uniform20(0u8..)) {
        prop_assert_eq!(Address::new(bytes).is_zero(), bytes == [0u8; 20]);
    }

    /// from_index is injective.
    #[test]
    fn address_from_index_injective(a in 0u64.., b in 0u64..) {
        prop_assert_eq!(Address::from_index(a) == Address::from_index(b), a == b);
    }

    /// apply_bps agrees with widened arithmetic and never exceeds the input.
    #[test]
    fn apply_bps_matches_floor(amount in 0u128..u64::MAX as u128, bps in 0u32..=BPS_DENOMINATOR) {
        let expected = amount * bps as u128 / BPS_DENOMINATOR as u128;
        prop_assert_eq!(apply_bps(amount, bps), expected);
        prop_assert!(apply_bps(amount, bps) <= amount);
    }

    /// Quorum threshold is monotone in locked supply.
    #[test]
    fn quorum_threshold_monotone(a in 0u128..1_000_000_000, extra in 0u128..1_000_000) {
        let params = GovernanceParams::default();
        prop_assert!(params.quorum_threshold(a) <= params.quorum_threshold(a + extra));
    }

    /// Timestamp has_passed agrees with manual arithmetic.
    #[test]
    fn timestamp_has_passed_correct(end in 0u64..1_000_000, now in 0u64..1_000_000) {
        prop_assert_eq!(Timestamp::new(end).has_passed(Timestamp::new(now)), now >= end);
    }

    /// Timestamp elapsed_since saturates to 0 when now < self.
    #[test]
    fn timestamp_elapsed_since_saturates(base in 1u64..1_000_000, deficit in 1u64..1_000_000) {
        let later = Timestamp::new(base + deficit);
        let earlier = Timestamp::new(base);
        prop_assert_eq!(later.elapsed_since(earlier), 0);
        prop_assert_eq!(earlier.elapsed_since(later), deficit);
    }
}
