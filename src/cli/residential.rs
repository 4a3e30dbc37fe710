use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;

use crate::{
    cli::IntervalArgs,
    io::{timestamp, try_read_csv_file, try_write_power_series},
    model::residential::{HouseholdProfile, HouseholdRecord, Residential},
    prelude::*,
    quantity::time::Hours,
    statistics::load::LoadStatistics,
    tables::build_load_table,
};

#[derive(Parser)]
pub struct ResidentialArgs {
    /// Household profile CSV with `time`, `summer_kw` and `winter_kw` columns, per single home.
    #[clap(long = "household", env = "HOUSEHOLD_PATH")]
    household_path: PathBuf,

    #[clap(long = "homes", env = "HOMES", default_value = "400")]
    homes: u32,

    /// The winter profile applies from this moment on.
    #[clap(
        long = "summer-end",
        env = "SUMMER_END",
        default_value = "2023-04-15 00:00:00",
        value_parser = timestamp::try_parse,
    )]
    summer_end: NaiveDateTime,

    /// Inclusive.
    #[clap(long = "start", env = "RESIDENTIAL_START", value_parser = timestamp::try_parse)]
    start: NaiveDateTime,

    /// Exclusive.
    #[clap(long = "end", env = "RESIDENTIAL_END", value_parser = timestamp::try_parse)]
    end: NaiveDateTime,

    #[clap(flatten)]
    interval: IntervalArgs,

    /// Write the load series to this CSV file, usable as a `simulate --load` input.
    #[clap(long = "output", env = "RESIDENTIAL_OUTPUT_PATH")]
    output_path: Option<PathBuf>,
}

impl ResidentialArgs {
    #[instrument(skip_all)]
    pub fn run(&self) -> Result {
        let interval = self.interval.try_time_delta()?;
        let profile = HouseholdProfile::try_from_records(try_read_csv_file::<HouseholdRecord>(
            &self.household_path,
        )?)
        .with_context(|| {
            format!("invalid household profile in `{}`", self.household_path.display())
        })?;
        let residential = Residential::builder()
            .profile(profile)
            .homes(self.homes)
            .summer_end(self.summer_end)
            .build();

        let load = residential.try_load(self.start, self.end, interval)?;
        let statistics = LoadStatistics::new(&load, Hours::from(interval));
        info!(homes = self.homes, n_points = load.len(), peak = %statistics.peak, "modelled");
        println!("{}", build_load_table(&statistics, &[]));

        if let Some(path) = &self.output_path {
            try_write_power_series(path, &load)?;
        }
        Ok(())
    }
}
