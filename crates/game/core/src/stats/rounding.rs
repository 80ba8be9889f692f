//! Rounding helpers.
//!
//! Historical logs were produced with "round half toward positive infinity",
//! which differs from [`f64::round`] for negative halves (`-2.5 -> -2`).

/// Rounds half toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Rounds to `decimals` fractional digits, half toward positive infinity.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_round_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(84.49), 84.0);
    }

    #[test]
    fn rounds_to_decimals() {
        assert_eq!(round_to(1.234, 2), 1.23);
        assert_eq!(round_to(-0.5, 2), -0.5);
        assert_eq!(round_to(1.0, 3), 1.0);
    }
}
