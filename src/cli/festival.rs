use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::IntervalArgs,
    io::try_write_power_series,
    model::festival::Festival,
    prelude::*,
    quantity::time::Hours,
    statistics::load::LoadStatistics,
    tables::build_load_table,
};

#[derive(Parser)]
pub struct FestivalArgs {
    /// Festival description in TOML.
    #[clap(long = "festival", env = "FESTIVAL_PATH")]
    festival_path: PathBuf,

    #[clap(flatten)]
    interval: IntervalArgs,

    /// Write the load series to this CSV file, usable as a `simulate --load` input.
    #[clap(long = "output", env = "FESTIVAL_OUTPUT_PATH")]
    output_path: Option<PathBuf>,
}

impl FestivalArgs {
    #[instrument(skip_all)]
    pub fn run(&self) -> Result {
        let interval = self.interval.try_time_delta()?;
        let festival = Festival::try_from_file(&self.festival_path)?;
        let load = festival.try_load(interval)?;
        let statistics = LoadStatistics::new(&load, Hours::from(interval));
        info!(festival = %festival.name, peak = %statistics.peak, "modelled");
        println!("{}", build_load_table(&statistics, &[]));

        if let Some(path) = &self.output_path {
            try_write_power_series(path, &load)?;
        }
        Ok(())
    }
}
