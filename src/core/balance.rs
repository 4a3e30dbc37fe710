use std::cmp::Ordering;

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::{
    core::series::{Align, Series, SumByKey, Validate},
    prelude::*,
    quantity::power::Kilowatts,
};

/// Average load and generation over a single interval.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Balance {
    pub load: Kilowatts,
    pub generation: Kilowatts,
}

impl Balance {
    pub const fn new(load: Kilowatts, generation: Kilowatts) -> Self {
        Self { load, generation }
    }

    pub fn regime(self) -> Regime {
        match self.generation.cmp(&self.load) {
            Ordering::Greater => Regime::Surplus,
            Ordering::Less => Regime::Deficit,
            Ordering::Equal => Regime::Balanced,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Regime {
    /// Generation exceeds the load.
    Surplus,

    /// Load exceeds the generation.
    Deficit,

    /// Generation exactly matches the load.
    Balanced,
}

/// Sum the loads and pair the total with the generation at every load timestamp.
///
/// A timestamp missing from one of the loads contributes nothing for that load.
/// The total load must advance by exactly `interval`, and the generation must cover all of it.
pub fn try_balances(
    loads: Vec<Series<NaiveDateTime, Kilowatts>>,
    generation: Series<NaiveDateTime, Kilowatts>,
    interval: TimeDelta,
) -> Result<Series<NaiveDateTime, Balance>> {
    for (index, load) in loads.iter().enumerate() {
        load.try_validate_increasing().with_context(|| format!("invalid load #{}", index + 1))?;
    }
    let load = loads.into_iter().flatten().sum_by_key();
    load.try_validate_uniform(interval).context("invalid total load")?;
    generation.try_validate_increasing().context("invalid generation")?;
    let balances: Series<_, _> = load
        .try_align(generation)
        .context("the generation does not cover the load")?
        .into_iter()
        .map(|(timestamp, (load, generation))| (timestamp, Balance::new(load, generation)))
        .collect();
    debug!(n_balances = balances.len(), "aligned");
    Ok(balances)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 12, 29).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn series(points: &[((u32, u32), f64)]) -> Series<NaiveDateTime, Kilowatts> {
        points
            .iter()
            .map(|((hour, minute), power)| (at(*hour, *minute), Kilowatts(*power)))
            .collect()
    }

    #[test]
    fn test_regime() {
        assert_eq!(Balance::new(Kilowatts(100.0), Kilowatts(150.0)).regime(), Regime::Surplus);
        assert_eq!(Balance::new(Kilowatts(200.0), Kilowatts(0.0)).regime(), Regime::Deficit);
        assert_eq!(Balance::new(Kilowatts(42.0), Kilowatts(42.0)).regime(), Regime::Balanced);
    }

    #[test]
    fn test_try_balances_missing_load_is_zero() -> Result {
        let site = series(&[((10, 0), 100.0), ((10, 30), 100.0), ((11, 0), 100.0)]);
        let festival = series(&[((10, 30), 50.0)]);
        let generation =
            series(&[((10, 0), 10.0), ((10, 15), 15.0), ((10, 30), 20.0), ((11, 0), 30.0)]);
        let balances = try_balances(vec![site, festival], generation, TimeDelta::minutes(30))?;
        assert_eq!(
            balances,
            vec![
                (at(10, 0), Balance::new(Kilowatts(100.0), Kilowatts(10.0))),
                (at(10, 30), Balance::new(Kilowatts(150.0), Kilowatts(20.0))),
                (at(11, 0), Balance::new(Kilowatts(100.0), Kilowatts(30.0))),
            ],
        );
        Ok(())
    }

    #[test]
    fn test_try_balances_non_uniform_load_fails() {
        let load = series(&[((10, 0), 100.0), ((11, 0), 100.0)]);
        let generation = series(&[((10, 0), 10.0), ((10, 30), 10.0), ((11, 0), 10.0)]);
        assert!(try_balances(vec![load], generation, TimeDelta::minutes(30)).is_err());
    }

    #[test]
    fn test_try_balances_decreasing_load_fails() {
        let load = series(&[((10, 30), 100.0), ((10, 0), 100.0)]);
        let generation = series(&[((10, 0), 10.0), ((10, 30), 10.0)]);
        assert!(try_balances(vec![load], generation, TimeDelta::minutes(30)).is_err());
    }

    #[test]
    fn test_try_balances_uncovered_load_fails() {
        let load = series(&[((10, 0), 100.0), ((10, 30), 100.0), ((11, 0), 100.0)]);
        let generation = series(&[((10, 0), 10.0), ((10, 30), 10.0)]);
        assert!(try_balances(vec![load], generation, TimeDelta::minutes(30)).is_err());
    }
}
