//! Basis-point arithmetic over raw token amounts.
//!
//! Amounts are plain `u128` raw units throughout the workspace. Fractions of an
//! amount (quorum, minimum locked supply) are expressed in basis points and
//! always round down.

/// 10_000 basis points = 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// `floor(amount * bps / 10_000)` without intermediate overflow.
pub fn apply_bps(amount: u128, bps: u32) -> u128 {
    let denom = BPS_DENOMINATOR as u128;
    let bps = bps as u128;
    (amount / denom) * bps + (amount % denom) * bps / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_rounds_down() {
        assert_eq!(apply_bps(100, 5_000), 50);
        assert_eq!(apply_bps(101, 5_000), 50);
        assert_eq!(apply_bps(1, 5_000), 0);
    }

    #[test]
    fn full_and_zero() {
        assert_eq!(apply_bps(12_345, BPS_DENOMINATOR), 12_345);
        assert_eq!(apply_bps(12_345, 0), 0);
    }

    #[test]
    fn huge_amounts_do_not_overflow() {
        assert_eq!(apply_bps(u128::MAX, BPS_DENOMINATOR), u128::MAX);
        assert_eq!(apply_bps(u128::MAX, 5_000), u128::MAX / 2);
    }
}
