//! Action delay - the scheduler's notion of speed.
//!
//! Formula: `tick = round3(100 / speed + EPSILON)`, where `round3` keeps three
//! fractional digits. Each action adds one tick to the actor's accumulated
//! delay; the living unit with the smallest delay acts next.

use super::rounding::round_half_up;

/// Delay added for one action at `speed`.
///
/// `speed` is expected to be at least 1; effective speed is floored there.
pub fn action_delay_tick(speed: i64) -> f64 {
    let speed = speed.max(1) as f64;
    round_half_up((100.0 / speed + f64::EPSILON) * 1000.0) / 1000.0
}

/// Accumulated delay after acting once more at `speed`.
pub fn advance_action_delay(current: f64, speed: i64) -> f64 {
    round_half_up((current + action_delay_tick(speed)) * 1000.0) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_is_rounded_to_thousandths() {
        assert_eq!(action_delay_tick(100), 1.0);
        assert_eq!(action_delay_tick(50), 2.0);
        assert_eq!(action_delay_tick(3), 33.333);
        assert_eq!(action_delay_tick(0), 100.0);
    }

    #[test]
    fn accumulated_delay_stays_rounded() {
        let mut delay = action_delay_tick(3);
        delay = advance_action_delay(delay, 3);
        delay = advance_action_delay(delay, 3);
        assert_eq!(delay, 99.999);
    }
}
