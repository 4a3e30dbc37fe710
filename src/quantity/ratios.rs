quantity!(Percentage, via: f64, suffix: "%", precision: 2);

impl Percentage {
    /// Express `part` as a percentage of `whole`, unless the whole is zero.
    pub fn of<T>(part: T, whole: T) -> Option<Self>
    where
        T: Into<f64>,
    {
        let whole = whole.into();
        (whole != 0.0).then(|| Self(100.0 * part.into() / whole))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_percentage_of() {
        assert_abs_diff_eq!(Percentage::of(1.0, 4.0).unwrap().0, 25.0);
        assert!(Percentage::of(1.0, 0.0).is_none());
    }
}
