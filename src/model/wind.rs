use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::{
    core::series::{Point, Series},
    io::timestamp,
    prelude::*,
    quantity::{power::Kilowatts, ratios::Percentage, speed::MetresPerSecond},
};

/// Weather station reading.
#[derive(Deserialize)]
pub struct WindRecord {
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,

    pub wind_speed_kph: f64,
}

#[derive(Deserialize)]
pub struct PowerCurveRecord {
    #[serde(rename = "wind_speed_ms")]
    pub speed: MetresPerSecond,

    #[serde(rename = "power_kw")]
    pub power: Kilowatts,
}

/// Convert the readings to metres per second.
///
/// Zero readings are gaps in the station's recording and get dropped.
pub fn try_wind_speeds(
    records: impl IntoIterator<Item = WindRecord>,
) -> Result<Series<NaiveDateTime, MetresPerSecond>> {
    let mut n_gaps = 0_usize;
    let speeds = records
        .into_iter()
        .filter(|record| {
            let is_gap = record.wind_speed_kph == 0.0;
            n_gaps += usize::from(is_gap);
            !is_gap
        })
        .map(|record| {
            ensure!(
                record.wind_speed_kph.is_finite() && record.wind_speed_kph > 0.0,
                "invalid wind speed at {}: {}",
                record.timestamp,
                record.wind_speed_kph,
            );
            Ok((record.timestamp, MetresPerSecond::from_kilometres_per_hour(record.wind_speed_kph)))
        })
        .collect::<Result<Series<_, _>>>()?;
    debug!(n_speeds = speeds.len(), n_gaps, "converted");
    Ok(speeds)
}

/// Average the measurements of the same month, day and time across the years,
/// and lay them out over the year starting at `start`.
///
/// Dates preceding the start's month and day fall into the following calendar year.
/// The 29th of February is dropped when that year has none.
pub fn typical_year(
    measurements: &[Point<NaiveDateTime, MetresPerSecond>],
    start: NaiveDate,
) -> Series<NaiveDateTime, MetresPerSecond> {
    let mut sums = BTreeMap::<(u32, u32, NaiveTime), (MetresPerSecond, u32)>::new();
    for (timestamp, speed) in measurements {
        let (sum, count) =
            sums.entry((timestamp.month(), timestamp.day(), timestamp.time())).or_default();
        *sum += *speed;
        *count += 1;
    }
    let mut series: Series<_, _> = sums
        .into_iter()
        .filter_map(|((month, day, time), (sum, count))| {
            let year = if (month, day) < (start.month(), start.day()) {
                start.year() + 1
            } else {
                start.year()
            };
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            Some((date.and_time(time), sum / f64::from(count)))
        })
        .collect();
    series.sort_unstable_by_key(|(timestamp, _)| *timestamp);
    series
}

/// Turbine output at 0.5 m/s resolution.
pub struct PowerCurve(BTreeMap<i64, Kilowatts>);

impl PowerCurve {
    pub fn try_from_records(records: impl IntoIterator<Item = PowerCurveRecord>) -> Result<Self> {
        let mut curve = BTreeMap::new();
        for record in records {
            ensure!(
                record.speed.0.is_finite() && record.speed == record.speed.round_to_half(),
                "power curve speed {} is not a multiple of 0.5 m/s",
                record.speed,
            );
            ensure!(
                record.power.0.is_finite() && record.power >= Kilowatts::ZERO,
                "invalid power at {}: {}",
                record.speed,
                record.power,
            );
            ensure!(
                curve.insert(record.speed.half_steps(), record.power).is_none(),
                "duplicate power curve entry for {}",
                record.speed,
            );
        }
        ensure!(!curve.is_empty(), "the power curve is empty");
        Ok(Self(curve))
    }

    /// Look up the power at the speed rounded to the nearest 0.5 m/s.
    pub fn try_power_at(&self, speed: MetresPerSecond) -> Result<Kilowatts> {
        self.0
            .get(&speed.half_steps())
            .copied()
            .with_context(|| format!("no power curve entry for {}", speed.round_to_half()))
    }
}

#[must_use]
#[derive(bon::Builder)]
pub struct Turbines {
    curve: PowerCurve,

    #[builder(default = 1)]
    count: u32,

    cut_in: MetresPerSecond,

    /// Exclusive.
    cut_out: MetresPerSecond,
}

impl Turbines {
    pub fn is_generating(&self, speed: MetresPerSecond) -> bool {
        self.cut_in <= speed && speed < self.cut_out
    }

    pub fn try_power_at(&self, speed: MetresPerSecond) -> Result<Kilowatts> {
        if self.is_generating(speed) {
            Ok(self.curve.try_power_at(speed)? * f64::from(self.count))
        } else {
            Ok(Kilowatts::ZERO)
        }
    }

    #[instrument(skip_all, fields(n_speeds = speeds.len(), count = self.count))]
    pub fn try_generation(
        &self,
        speeds: &[Point<NaiveDateTime, MetresPerSecond>],
    ) -> Result<Series<NaiveDateTime, Kilowatts>> {
        speeds
            .iter()
            .map(|(timestamp, speed)| {
                let power = self
                    .try_power_at(*speed)
                    .with_context(|| format!("failed to estimate generation at {timestamp}"))?;
                Ok((*timestamp, power))
            })
            .collect()
    }

    /// Share of the samples with the wind between the cut-in and cut-out speeds.
    #[expect(clippy::cast_precision_loss)]
    pub fn generating_time(
        &self,
        speeds: &[Point<NaiveDateTime, MetresPerSecond>],
    ) -> Option<Percentage> {
        let n_generating = speeds.iter().filter(|(_, speed)| self.is_generating(*speed)).count();
        Percentage::of(n_generating as f64, speeds.len() as f64)
    }
}
