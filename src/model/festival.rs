use std::{fs, iter::successors, path::Path};

use chrono::{NaiveDateTime, TimeDelta};
use serde::Deserialize;

use crate::{
    core::series::Series,
    io::timestamp,
    prelude::*,
    quantity::power::{Kilowatts, Watts},
};

const SPEAKER_POWER: Watts = Watts(1000.0);
const STAGE_LIGHT_POWER: Watts = Watts(60.0);
const TICKETING_STAND_POWER: Watts = Watts(500.0);
const FOOD_STAND_POWER: Watts = Watts(8000.0);
const DRINK_STAND_POWER: Watts = Watts(5000.0);
const TOILET_STAND_POWER: Watts = Watts(10000.0);
const CAMPERVAN_OUTLET_POWER: Watts = Watts(3500.0);
const SITE_LIGHT_POWER: Watts = Watts(400.0);

/// Festival infrastructure as described in a TOML file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Festival {
    pub name: String,

    #[serde(with = "timestamp")]
    pub start: NaiveDateTime,

    /// Exclusive.
    #[serde(with = "timestamp")]
    pub end: NaiveDateTime,

    #[serde(default)]
    pub ticketing_stands: u32,

    #[serde(default)]
    pub food_stands: u32,

    #[serde(default)]
    pub drink_stands: u32,

    #[serde(default)]
    pub toilet_stands: u32,

    #[serde(default)]
    pub campervan_outlets: u32,

    /// Site lighting, not counting the stage lights.
    #[serde(default)]
    pub lights: u32,

    #[serde(default)]
    pub stages: Vec<Stage>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stage {
    pub name: String,

    #[serde(default)]
    pub speakers: u32,

    #[serde(default)]
    pub lights: u32,

    #[serde(default)]
    pub sets: Vec<Set>,
}

/// A stage is powered from the start of a set up to, but not including, its end.
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Set {
    #[serde(with = "timestamp")]
    pub start: NaiveDateTime,

    #[serde(with = "timestamp")]
    pub end: NaiveDateTime,
}

impl Festival {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn try_from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let festival = Self::try_from_toml(&text)
            .with_context(|| format!("invalid festival in `{}`", path.display()))?;
        info!(festival = %festival.name, n_stages = festival.stages.len(), "loaded");
        Ok(festival)
    }

    pub fn try_from_toml(text: &str) -> Result<Self> {
        let festival: Self = toml::from_str(text)?;
        festival.try_validate()?;
        Ok(festival)
    }

    fn try_validate(&self) -> Result {
        ensure!(self.start < self.end, "the festival ends at {} before it starts", self.end);
        for stage in &self.stages {
            for set in &stage.sets {
                ensure!(
                    set.start < set.end,
                    "a set on `{}` ends at {} before it starts",
                    stage.name,
                    set.end,
                );
            }
        }
        Ok(())
    }

    /// Power drawn by everything but the stages, around the clock.
    pub fn site_power(&self) -> Watts {
        TICKETING_STAND_POWER * f64::from(self.ticketing_stands)
            + FOOD_STAND_POWER * f64::from(self.food_stands)
            + DRINK_STAND_POWER * f64::from(self.drink_stands)
            + TOILET_STAND_POWER * f64::from(self.toilet_stands)
            + CAMPERVAN_OUTLET_POWER * f64::from(self.campervan_outlets)
            + SITE_LIGHT_POWER * f64::from(self.lights)
    }

    pub fn power_at(&self, timestamp: NaiveDateTime) -> Watts {
        self.site_power()
            + self
                .stages
                .iter()
                .filter(|stage| stage.is_playing_at(timestamp))
                .map(Stage::power)
                .sum::<Watts>()
    }

    /// Load over the festival window, one point per interval start.
    pub fn try_load(&self, interval: TimeDelta) -> Result<Series<NaiveDateTime, Kilowatts>> {
        ensure!(interval > TimeDelta::zero(), "the interval must be positive");
        Ok(successors(Some(self.start), |timestamp| Some(*timestamp + interval))
            .take_while(|timestamp| *timestamp < self.end)
            .map(|timestamp| (timestamp, Kilowatts::from(self.power_at(timestamp))))
            .collect())
    }
}

impl Stage {
    pub fn power(&self) -> Watts {
        SPEAKER_POWER * f64::from(self.speakers) + STAGE_LIGHT_POWER * f64::from(self.lights)
    }

    pub fn is_playing_at(&self, timestamp: NaiveDateTime) -> bool {
        self.sets.iter().any(|set| set.start <= timestamp && timestamp < set.end)
    }
}
