use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    core::series::Point,
    quantity::{energy::KilowattHours, power::Kilowatts, time::Hours},
};

#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct LoadStatistics {
    pub peak: Kilowatts,

    /// Mean energy over the calendar days covered by the series in full.
    pub average_daily_energy: Option<KilowattHours>,

    pub n_full_days: usize,
}

/// Highest power in the series, zero for an empty one.
pub fn peak<K>(series: &[Point<K, Kilowatts>]) -> Kilowatts {
    series.iter().map(|(_, power)| *power).max().unwrap_or(Kilowatts::ZERO)
}

impl LoadStatistics {
    pub fn new(series: &[Point<NaiveDateTime, Kilowatts>], interval: Hours) -> Self {
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let intervals_per_day = (24.0 / interval.0).round() as usize;

        let peak = peak(series);
        let daily_energies = series
            .iter()
            .chunk_by(|(timestamp, _)| timestamp.date())
            .into_iter()
            .filter_map(|(_, points)| {
                let points = points.collect_vec();
                (points.len() == intervals_per_day).then(|| {
                    points.into_iter().map(|(_, power)| *power * interval).sum::<KilowattHours>()
                })
            })
            .collect_vec();

        #[expect(clippy::cast_precision_loss)]
        let average_daily_energy = (!daily_energies.is_empty()).then(|| {
            daily_energies.iter().copied().sum::<KilowattHours>() / daily_energies.len() as f64
        });

        Self { peak, average_daily_energy, n_full_days: daily_energies.len() }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{Datelike, NaiveDate, TimeDelta};

    use super::*;

    #[test]
    fn test_load_statistics_skips_partial_days() {
        // Two hours of the 28th, then the full 29th and 30th:
        let start = NaiveDate::from_ymd_opt(2022, 12, 28).unwrap().and_hms_opt(22, 0, 0).unwrap();
        let series: Vec<_> = (0..(4 + 2 * 48))
            .map(|index| {
                let timestamp = start + TimeDelta::minutes(30 * index);
                let power = if timestamp.day() == 30 { 20.0 } else { 10.0 };
                (timestamp, Kilowatts(power))
            })
            .collect();
        let statistics = LoadStatistics::new(&series, Hours(0.5));
        assert_eq!(statistics.n_full_days, 2);
        assert_abs_diff_eq!(statistics.peak.0, 20.0);
        assert_abs_diff_eq!(statistics.average_daily_energy.unwrap().0, (240.0 + 480.0) / 2.0);
    }

    #[test]
    fn test_load_statistics_empty() {
        let statistics = LoadStatistics::new(&[], Hours(0.5));
        assert!(statistics.average_daily_energy.is_none());
        assert_eq!(statistics.peak, Kilowatts::ZERO);
    }

    #[test]
    fn test_peak_ok() {
        let series = [(1, Kilowatts(3.0)), (2, Kilowatts(7.5)), (3, Kilowatts(0.0))];
        assert_abs_diff_eq!(peak(&series).0, 7.5);
        assert_eq!(peak::<i32>(&[]), Kilowatts::ZERO);
    }
}
