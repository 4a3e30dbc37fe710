use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    core::{
        balance::{Balance, Regime},
        battery::Battery,
        series::{Point, Series},
        step::Step,
    },
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts, time::Hours},
};

/// How the per-interval values are recorded.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Precision {
    /// Keep the full floating-point values.
    #[default]
    Exact,

    /// Truncate the recorded values toward zero.
    Truncate,
}

#[must_use]
#[derive(bon::Builder)]
pub struct Simulator {
    battery: Battery,

    /// Duration of a single interval.
    interval: Hours,

    #[builder(default)]
    precision: Precision,
}

impl Simulator {
    /// Run the intervals in order, starting with a fully charged battery.
    #[instrument(skip_all, fields(n_intervals = series.len()))]
    pub fn run(&self, series: &[Point<NaiveDateTime, Balance>]) -> Simulation {
        info!(
            capacity = %self.battery.capacity,
            round_trip_efficiency = self.battery.round_trip_efficiency(),
            precision = ?self.precision,
            "simulating…"
        );
        let simulation = series.iter().fold(
            Simulation::new(self.battery.capacity, series.len()),
            |simulation, (timestamp, balance)| {
                let step = self.battery.step(simulation.residual_energy, *balance, self.interval);
                simulation.with_step(*timestamp, step, self.precision)
            },
        );
        info!(residual_energy = %simulation.residual_energy, "done");
        simulation
    }
}

#[must_use]
pub struct Simulation {
    /// Stored energy before the first interval.
    pub initial_energy: KilowattHours,

    /// Stored energy after the last processed interval.
    pub residual_energy: KilowattHours,

    /// Highest shortfall that the battery alone has covered.
    pub peak_storage_power: Kilowatts,

    pub counts: RegimeCounts,
    pub steps: Series<NaiveDateTime, Step>,
}

impl Simulation {
    fn new(initial_energy: KilowattHours, n_intervals: usize) -> Self {
        Self {
            initial_energy,
            residual_energy: initial_energy,
            peak_storage_power: Kilowatts::ZERO,
            counts: RegimeCounts::default(),
            steps: Vec::with_capacity(n_intervals),
        }
    }

    fn with_step(mut self, timestamp: NaiveDateTime, step: Step, precision: Precision) -> Self {
        let regime = step.balance.regime();
        match regime {
            Regime::Surplus => self.counts.surplus += 1,
            Regime::Deficit => self.counts.deficit += 1,
            Regime::Balanced => self.counts.balanced += 1,
        }
        if regime == Regime::Deficit && step.grid_energy.import == KilowattHours::ZERO {
            self.peak_storage_power = self.peak_storage_power.max(step.sources.storage);
        }
        self.residual_energy = step.residual_energy_after;
        self.steps.push((
            timestamp,
            match precision {
                Precision::Exact => step,
                Precision::Truncate => step.truncated(),
            },
        ));
        self
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RegimeCounts {
    /// Number of intervals with generation above the load.
    pub surplus: usize,

    /// Number of intervals with generation below the load.
    pub deficit: usize,

    pub balanced: usize,
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, TimeDelta};
    use itertools::Itertools;

    use super::*;

    fn series(balances: &[(f64, f64)]) -> Series<NaiveDateTime, Balance> {
        let start = NaiveDate::from_ymd_opt(2022, 12, 29).unwrap().and_hms_opt(0, 0, 0).unwrap();
        balances
            .iter()
            .enumerate()
            .map(|(index, (load, generation))| {
                (
                    start + TimeDelta::minutes(30 * i64::try_from(index).unwrap()),
                    Balance::new(Kilowatts(*load), Kilowatts(*generation)),
                )
            })
            .collect()
    }

    fn simulator(capacity: f64, efficiency: f64) -> Simulator {
        Simulator::builder()
            .battery(Battery::try_new(KilowattHours(capacity), efficiency, efficiency).unwrap())
            .interval(Hours(0.5))
            .build()
    }

    fn assert_invariants(simulation: &Simulation, capacity: f64) {
        for (_, step) in &simulation.steps {
            assert_abs_diff_eq!(step.sources.total().0, step.balance.load.0, epsilon = 1e-9);
            assert!(step.residual_energy_after >= KilowattHours::ZERO);
            assert!(step.residual_energy_after <= KilowattHours(capacity));
        }
    }

    /// Storage disabled, constant 50 kW surplus.
    #[test]
    fn test_run_surplus_without_storage_ok() {
        let simulation = simulator(0.0, 0.9).run(&series(&[(100.0, 150.0); 4]));
        assert_eq!(simulation.steps.len(), 4);
        for (_, step) in &simulation.steps {
            assert_abs_diff_eq!(step.grid_power.export.0, 50.0);
            assert_abs_diff_eq!(step.residual_energy_after.0, 0.0);
            assert_abs_diff_eq!(step.grid_energy.import.0, 0.0);
        }
        assert_eq!(simulation.counts, RegimeCounts { surplus: 4, deficit: 0, balanced: 0 });
        assert_invariants(&simulation, 0.0);
    }

    /// Full 100 kWh battery facing a single 200 kW shortfall.
    #[test]
    fn test_run_single_deficit_depletes_battery_ok() {
        let simulation = simulator(100.0, 0.9).run(&series(&[(200.0, 0.0)]));
        let (_, step) = simulation.steps[0];
        assert_abs_diff_eq!(step.residual_energy_after.0, 0.0);
        assert_abs_diff_eq!(step.grid_energy.import.0, 11.111, epsilon = 1e-3);
        assert_abs_diff_eq!(step.grid_power.import.0, 22.222, epsilon = 1e-3);
        assert_abs_diff_eq!(simulation.residual_energy.0, 0.0);
        assert_eq!(simulation.peak_storage_power, Kilowatts::ZERO);
        assert_invariants(&simulation, 100.0);
    }

    #[test]
    fn test_run_balanced_keeps_state_ok() {
        let simulation = simulator(100.0, 0.9).run(&series(&[(80.0, 80.0); 6]));
        for (_, step) in &simulation.steps {
            assert_abs_diff_eq!(step.residual_energy_after.0, 100.0);
            assert_abs_diff_eq!(step.grid_energy.import.0, 0.0);
            assert_abs_diff_eq!(step.grid_energy.export.0, 0.0);
        }
        assert_eq!(simulation.counts.balanced, 6);
    }

    /// Never reaching the capacity, the battery charges on every interval.
    #[test]
    fn test_step_pure_surplus_charges_monotonically() {
        let battery = Battery::try_new(KilowattHours(1000.0), 0.9, 0.9).unwrap();
        let mut residual_energy = KilowattHours::ZERO;
        for (_, balance) in series(&[(10.0, 50.0); 10]) {
            let step = battery.step(residual_energy, balance, Hours(0.5));
            assert!(step.residual_energy_after > residual_energy);
            assert_eq!(step.grid_energy.import, KilowattHours::ZERO);
            assert_abs_diff_eq!(
                (step.residual_energy_after - residual_energy).0,
                40.0 * 0.5 * 0.9,
                epsilon = 1e-9
            );
            residual_energy = step.residual_energy_after;
        }
    }

    #[test]
    fn test_run_pure_deficit_draws_grid_after_depletion() {
        let simulation = simulator(100.0, 1.0).run(&series(&[(60.0, 20.0); 8]));
        let residuals =
            simulation.steps.iter().map(|(_, step)| step.residual_energy_after.0).collect_vec();
        assert_eq!(residuals, [80.0, 60.0, 40.0, 20.0, 0.0, 0.0, 0.0, 0.0]);
        for (_, step) in &simulation.steps[..5] {
            assert_eq!(step.grid_energy.import, KilowattHours::ZERO);
        }
        for (_, step) in &simulation.steps[5..] {
            assert_abs_diff_eq!(step.grid_energy.import.0, 20.0);
        }
        assert_abs_diff_eq!(simulation.peak_storage_power.0, 40.0);
        assert_invariants(&simulation, 100.0);
    }

    #[test]
    fn test_run_mixed_keeps_invariants() {
        let simulation = simulator(50.0, 0.85).run(&series(&[
            (100.0, 10.0),
            (10.0, 300.0),
            (120.0, 0.0),
            (50.0, 50.0),
            (0.0, 80.0),
            (400.0, 30.0),
        ]));
        assert_invariants(&simulation, 50.0);
        assert_eq!(simulation.counts, RegimeCounts { surplus: 2, deficit: 3, balanced: 1 });
    }

    #[test]
    fn test_run_truncate_keeps_carried_state() {
        let simulator = Simulator::builder()
            .battery(Battery::try_new(KilowattHours(100.0), 0.9, 0.9).unwrap())
            .interval(Hours(0.5))
            .precision(Precision::Truncate)
            .build();
        let simulation = simulator.run(&series(&[(101.0, 100.0), (101.0, 100.0)]));
        assert_abs_diff_eq!(simulation.steps[0].1.residual_energy_after.0, 99.0);
        assert_abs_diff_eq!(simulation.residual_energy.0, 100.0 - 1.0 / 0.9, epsilon = 1e-9);
    }
}
