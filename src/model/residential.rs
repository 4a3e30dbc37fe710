use std::{collections::BTreeMap, iter::successors};

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use serde::Deserialize;

use crate::{
    core::series::Series,
    io::time_of_day,
    prelude::*,
    quantity::power::Kilowatts,
};

/// Average power of a single home at the time of the day.
#[derive(Deserialize)]
pub struct HouseholdRecord {
    #[serde(deserialize_with = "time_of_day::deserialize")]
    pub time: NaiveTime,

    #[serde(rename = "summer_kw")]
    pub summer: Kilowatts,

    #[serde(rename = "winter_kw")]
    pub winter: Kilowatts,
}

#[derive(Copy, Clone)]
struct Seasons {
    summer: Kilowatts,
    winter: Kilowatts,
}

/// Daily power profile of a single home, for summer and for winter.
pub struct HouseholdProfile(BTreeMap<NaiveTime, Seasons>);

impl HouseholdProfile {
    pub fn try_from_records(records: impl IntoIterator<Item = HouseholdRecord>) -> Result<Self> {
        let mut profile = BTreeMap::new();
        for record in records {
            for power in [record.summer, record.winter] {
                ensure!(
                    power.0.is_finite() && power >= Kilowatts::ZERO,
                    "invalid household power at {}: {power}",
                    record.time,
                );
            }
            let seasons = Seasons { summer: record.summer, winter: record.winter };
            ensure!(
                profile.insert(record.time, seasons).is_none(),
                "duplicate household profile entry for {}",
                record.time,
            );
        }
        ensure!(!profile.is_empty(), "the household profile is empty");
        Ok(Self(profile))
    }
}

/// Homes sharing the same household profile.
#[must_use]
#[derive(bon::Builder)]
pub struct Residential {
    profile: HouseholdProfile,

    homes: u32,

    /// The winter profile applies from this moment on.
    summer_end: NaiveDateTime,
}

impl Residential {
    pub fn try_power_at(&self, timestamp: NaiveDateTime) -> Result<Kilowatts> {
        let seasons = self
            .profile
            .0
            .get(&timestamp.time())
            .with_context(|| format!("no household profile entry for {}", timestamp.time()))?;
        let power = if timestamp < self.summer_end { seasons.summer } else { seasons.winter };
        Ok(power * f64::from(self.homes))
    }

    /// Load over `[start, end)`, one point per interval start.
    #[instrument(skip_all, fields(homes = self.homes))]
    pub fn try_load(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        interval: TimeDelta,
    ) -> Result<Series<NaiveDateTime, Kilowatts>> {
        ensure!(interval > TimeDelta::zero(), "the interval must be positive");
        ensure!(start < end, "the load ends at {end} before it starts");
        successors(Some(start), |timestamp| Some(*timestamp + interval))
            .take_while(|timestamp| *timestamp < end)
            .map(|timestamp| Ok((timestamp, self.try_power_at(timestamp)?)))
            .collect()
    }
}
