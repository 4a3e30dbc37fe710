quantity!(MetresPerSecond, via: f64, suffix: "m/s", precision: 1);

impl MetresPerSecond {
    pub fn from_kilometres_per_hour(kilometres_per_hour: f64) -> Self {
        Self(kilometres_per_hour / 3.6)
    }

    /// Round to the nearest half metre per second, the resolution of turbine power curves.
    pub fn round_to_half(self) -> Self {
        Self((self.0 * 2.0).round() / 2.0)
    }

    /// Key of the speed in a half-metre-per-second lookup table.
    #[expect(clippy::cast_possible_truncation)]
    pub fn half_steps(self) -> i64 {
        (self.0 * 2.0).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_from_kilometres_per_hour() {
        assert_abs_diff_eq!(MetresPerSecond::from_kilometres_per_hour(36.0).0, 10.0);
    }

    #[test]
    fn test_round_to_half() {
        assert_abs_diff_eq!(MetresPerSecond(7.24).round_to_half().0, 7.0);
        assert_abs_diff_eq!(MetresPerSecond(7.26).round_to_half().0, 7.5);
        assert_abs_diff_eq!(MetresPerSecond(7.8).round_to_half().0, 8.0);
    }

    #[test]
    fn test_half_steps() {
        assert_eq!(MetresPerSecond(12.5).half_steps(), 25);
        assert_eq!(MetresPerSecond(3.2).half_steps(), 6);
    }
}
