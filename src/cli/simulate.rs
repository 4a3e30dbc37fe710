use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::{IntervalArgs, storage::StorageArgs},
    core::{
        balance::try_balances,
        simulation::{Precision, Simulator},
    },
    io::{StepRecord, try_read_power_series, try_write_csv_file, try_write_json_file},
    prelude::*,
    quantity::time::Hours,
    statistics::{
        load::{LoadStatistics, peak},
        summary::Summary,
    },
    tables::{build_load_table, build_source_mix_table, build_summary_table},
};

#[derive(Parser)]
pub struct SimulateArgs {
    /// Load CSV files with `timestamp` and `power_kw` columns, summed by timestamp.
    #[clap(
        long = "load",
        env = "LOAD_PATHS",
        value_delimiter = ',',
        num_args = 1..,
        required = true
    )]
    load_paths: Vec<PathBuf>,

    /// Generation CSV file with `timestamp` and `power_kw` columns.
    #[clap(long = "generation", env = "GENERATION_PATH")]
    generation_path: PathBuf,

    #[clap(flatten)]
    storage: StorageArgs,

    #[clap(flatten)]
    interval: IntervalArgs,

    /// How to record the per-interval results: `exact`, or `truncate` toward zero.
    #[clap(long, env, default_value = "exact")]
    precision: Precision,

    /// Write the per-interval results to this CSV file.
    #[clap(long = "output", env = "OUTPUT_PATH")]
    output_path: Option<PathBuf>,

    /// Write the summary to this JSON file.
    #[clap(long = "summary-output", env = "SUMMARY_OUTPUT_PATH")]
    summary_output_path: Option<PathBuf>,
}

impl SimulateArgs {
    #[instrument(skip_all)]
    pub fn run(&self) -> Result {
        let interval = self.interval.try_time_delta()?;
        let battery = self.storage.try_battery()?;

        let loads = self
            .load_paths
            .iter()
            .map(|path| try_read_power_series(path))
            .collect::<Result<Vec<_>>>()?;
        let component_peaks = self
            .load_paths
            .iter()
            .zip(&loads)
            .map(|(path, load)| (path.display().to_string(), peak(load)))
            .collect::<Vec<_>>();
        let generation = try_read_power_series(&self.generation_path)?;
        let balances = try_balances(loads, generation, interval)?;
        info!(n_intervals = balances.len(), "aligned");

        let load = balances
            .iter()
            .map(|(timestamp, balance)| (*timestamp, balance.load))
            .collect::<Vec<_>>();
        let load_statistics = LoadStatistics::new(&load, Hours::from(interval));

        let simulation = Simulator::builder()
            .battery(battery)
            .interval(Hours::from(interval))
            .precision(self.precision)
            .build()
            .run(&balances);
        let summary = Summary::new(&simulation);

        println!("{}", build_load_table(&load_statistics, &component_peaks));
        println!("{}", build_summary_table(&summary));
        println!("{}", build_source_mix_table(&summary));

        if summary.sustainability.is_sustainable() {
            info!(difference = %summary.sustainability.difference(), "sustainable");
        } else {
            warn!(difference = %summary.sustainability.difference(), "unsustainable");
        }

        if let Some(path) = &self.output_path {
            try_write_csv_file(path, simulation.steps.iter().map(StepRecord::from))?;
        }
        if let Some(path) = &self.summary_output_path {
            try_write_json_file(path, &summary)?;
        }
        Ok(())
    }
}
