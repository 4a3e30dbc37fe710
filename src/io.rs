//! CSV and JSON plumbing around the simulation.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    core::{
        series::{Point, Series},
        step::Step,
    },
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts},
};

/// Average power over the interval starting at the timestamp.
#[derive(Deserialize, Serialize)]
pub struct PowerRecord {
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,

    #[serde(rename = "power_kw")]
    pub power: Kilowatts,
}

/// Per-interval simulation output.
#[derive(Serialize)]
pub struct StepRecord {
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,

    pub load_kw: Kilowatts,
    pub generation_kw: Kilowatts,
    pub stored_energy_kwh: KilowattHours,
    pub storage_power_kw: Kilowatts,
    pub grid_draw_kwh: KilowattHours,
    pub grid_draw_kw: Kilowatts,
    pub grid_supply_kwh: KilowattHours,
    pub grid_supply_kw: Kilowatts,
    pub source_generation_kw: Kilowatts,
    pub source_storage_kw: Kilowatts,
    pub source_grid_kw: Kilowatts,
}

impl From<&Point<NaiveDateTime, Step>> for StepRecord {
    fn from((timestamp, step): &Point<NaiveDateTime, Step>) -> Self {
        Self {
            timestamp: *timestamp,
            load_kw: step.balance.load,
            generation_kw: step.balance.generation,
            stored_energy_kwh: step.residual_energy_after,
            storage_power_kw: step.storage_power,
            grid_draw_kwh: step.grid_energy.import,
            grid_draw_kw: step.grid_power.import,
            grid_supply_kwh: step.grid_energy.export,
            grid_supply_kw: step.grid_power.export,
            source_generation_kw: step.sources.generation,
            source_storage_kw: step.sources.storage,
            source_grid_kw: step.sources.grid,
        }
    }
}

pub fn read_csv<T: DeserializeOwned>(reader: impl Read) -> Result<Vec<T>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<Result<_, _>>()
        .map_err(Error::from)
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn try_read_csv_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file =
        File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    let records = read_csv(BufReader::new(file))
        .with_context(|| format!("failed to parse `{}`", path.display()))?;
    info!(n_records = records.len(), "loaded");
    Ok(records)
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: impl IntoIterator<Item = T>) -> Result {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn try_write_csv_file<T: Serialize>(
    path: &Path,
    records: impl IntoIterator<Item = T>,
) -> Result {
    let file =
        File::create(path).with_context(|| format!("failed to create `{}`", path.display()))?;
    write_csv(BufWriter::new(file), records)
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    info!("saved");
    Ok(())
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn try_write_json_file<T: Serialize>(path: &Path, value: &T) -> Result {
    let file =
        File::create(path).with_context(|| format!("failed to create `{}`", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    info!("saved");
    Ok(())
}

/// Parse power records into a series, rejecting non-finite values.
pub fn try_into_power_series(
    records: impl IntoIterator<Item = PowerRecord>,
) -> Result<Series<NaiveDateTime, Kilowatts>> {
    records
        .into_iter()
        .map(|record| {
            ensure!(
                record.power.0.is_finite(),
                "non-finite power at {}: {}",
                record.timestamp,
                record.power.0,
            );
            Ok((record.timestamp, record.power))
        })
        .collect()
}

pub fn try_read_power_series(path: &Path) -> Result<Series<NaiveDateTime, Kilowatts>> {
    try_into_power_series(try_read_csv_file::<PowerRecord>(path)?)
        .with_context(|| format!("invalid power series in `{}`", path.display()))
}

pub fn try_write_power_series(path: &Path, series: &[Point<NaiveDateTime, Kilowatts>]) -> Result {
    try_write_csv_file(
        path,
        series
            .iter()
            .map(|(timestamp, power)| PowerRecord { timestamp: *timestamp, power: *power }),
    )
}

/// Timestamps as they come out of spreadsheets.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Accepted on input, tried in order.
    const FORMATS: &[&str] = &[
        FORMAT,
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];

    pub fn parse(text: &str) -> Option<NaiveDateTime> {
        FORMATS.iter().find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    }

    /// Command-line flavour of [`parse`].
    pub fn try_parse(text: &str) -> anyhow::Result<NaiveDateTime> {
        parse(text).ok_or_else(|| anyhow::anyhow!("unrecognised timestamp `{text}`"))
    }

    pub fn serialize<S: Serializer>(
        timestamp: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&timestamp.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).ok_or_else(|| D::Error::custom(format!("unrecognised timestamp `{text}`")))
    }
}

/// Time of the day in daily profiles.
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, de::Error};

    const FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

    pub fn parse(text: &str) -> Option<NaiveTime> {
        FORMATS.iter().find_map(|format| NaiveTime::parse_from_str(text, format).ok())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).ok_or_else(|| D::Error::custom(format!("unrecognised time `{text}`")))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;
    use crate::core::{balance::Balance, battery::Battery};

    #[test]
    fn test_try_into_power_series_ok() -> Result {
        let text = "\
timestamp,power_kw
2022-12-29 10:00:00, 120.5
2022-12-29T10:30:00,80
29/12/2022 11:00,0
";
        let series = try_into_power_series(read_csv::<PowerRecord>(text.as_bytes())?)?;
        assert_eq!(series.len(), 3);
        assert_eq!(
            series[2].0,
            NaiveDate::from_ymd_opt(2022, 12, 29).unwrap().and_hms_opt(11, 0, 0).unwrap()
        );
        assert_abs_diff_eq!(series[0].1.0, 120.5);
        Ok(())
    }

    #[test]
    fn test_read_csv_bad_timestamp_fails() {
        let text = "timestamp,power_kw\nyesterday,1\n";
        assert!(read_csv::<PowerRecord>(text.as_bytes()).is_err());
    }

    #[test]
    fn test_try_into_power_series_non_finite_fails() -> Result {
        let text = "timestamp,power_kw\n2022-12-29 10:00:00,NaN\n";
        let records = read_csv::<PowerRecord>(text.as_bytes())?;
        assert!(try_into_power_series(records).is_err());
        Ok(())
    }

    #[test]
    fn test_write_csv_steps_ok() -> Result {
        let timestamp = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 30, 0).unwrap();
        let step = Battery::try_new(KilowattHours(0.0), 1.0, 1.0)?.step(
            KilowattHours::ZERO,
            Balance::new(Kilowatts(100.0), Kilowatts(150.0)),
            crate::quantity::time::Hours(0.5),
        );
        let mut buffer = Vec::new();
        write_csv(&mut buffer, [StepRecord::from(&(timestamp, step))])?;
        let text = String::from_utf8(buffer)?;
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "timestamp,load_kw,generation_kw,stored_energy_kwh,storage_power_kw,\
                 grid_draw_kwh,grid_draw_kw,grid_supply_kwh,grid_supply_kw,\
                 source_generation_kw,source_storage_kw,source_grid_kw"
            ),
        );
        assert_eq!(
            lines.next(),
            Some("2023-01-01 00:30:00,100.0,150.0,0.0,0.0,0.0,0.0,25.0,50.0,100.0,0.0,0.0"),
        );
        Ok(())
    }
}
