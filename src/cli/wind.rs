use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::{
    io::{try_read_csv_file, try_write_power_series},
    model::wind::{
        PowerCurve,
        PowerCurveRecord,
        Turbines,
        WindRecord,
        try_wind_speeds,
        typical_year,
    },
    prelude::*,
    quantity::speed::MetresPerSecond,
    statistics::load::peak,
    tables::build_generation_table,
};

#[derive(Parser)]
pub struct WindArgs {
    /// Wind measurements CSV with `timestamp` and `wind_speed_kph` columns.
    #[clap(long = "wind", env = "WIND_PATH")]
    wind_path: PathBuf,

    /// Turbine power curve CSV with `wind_speed_ms` and `power_kw` columns.
    #[clap(long = "power-curve", env = "POWER_CURVE_PATH")]
    power_curve_path: PathBuf,

    #[clap(long = "turbine-count", env = "TURBINE_COUNT", default_value = "1")]
    turbine_count: u32,

    #[clap(long = "cut-in-speed-ms", env = "CUT_IN_SPEED_MS", default_value = "3")]
    cut_in_speed: MetresPerSecond,

    /// Exclusive.
    #[clap(long = "cut-out-speed-ms", env = "CUT_OUT_SPEED_MS", default_value = "25")]
    cut_out_speed: MetresPerSecond,

    /// First day of the modelled year.
    #[clap(long = "start", env = "WIND_START_DATE", default_value = "2022-09-01")]
    start: NaiveDate,

    /// Write the generation series to this CSV file, usable as a `simulate --generation` input.
    #[clap(long = "output", env = "WIND_OUTPUT_PATH")]
    output_path: Option<PathBuf>,
}

impl WindArgs {
    #[instrument(skip_all)]
    pub fn run(&self) -> Result {
        ensure!(
            self.cut_in_speed < self.cut_out_speed,
            "the cut-in speed {} must be below the cut-out speed {}",
            self.cut_in_speed,
            self.cut_out_speed,
        );
        let curve = PowerCurve::try_from_records(try_read_csv_file::<PowerCurveRecord>(
            &self.power_curve_path,
        )?)
        .with_context(|| format!("invalid power curve in `{}`", self.power_curve_path.display()))?;
        let turbines = Turbines::builder()
            .curve(curve)
            .count(self.turbine_count)
            .cut_in(self.cut_in_speed)
            .cut_out(self.cut_out_speed)
            .build();

        let measurements = try_wind_speeds(try_read_csv_file::<WindRecord>(&self.wind_path)?)
            .with_context(|| format!("invalid wind data in `{}`", self.wind_path.display()))?;
        let speeds = typical_year(&measurements, self.start);
        info!(n_measurements = measurements.len(), n_speeds = speeds.len(), "averaged");

        let generation = turbines.try_generation(&speeds)?;
        println!(
            "{}",
            build_generation_table(peak(&generation), turbines.generating_time(&speeds)),
        );

        if let Some(path) = &self.output_path {
            try_write_power_series(path, &generation)?;
        }
        Ok(())
    }
}
