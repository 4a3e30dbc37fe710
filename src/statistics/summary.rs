use serde::Serialize;

use crate::{
    core::{
        flow::Flow,
        simulation::{RegimeCounts, Simulation},
        sources::Sources,
    },
    quantity::{energy::KilowattHours, power::Kilowatts, ratios::Percentage},
};

/// Scalar outcome of a whole simulation run.
#[must_use]
#[derive(Serialize)]
pub struct Summary {
    pub initial_energy: KilowattHours,
    pub final_energy: KilowattHours,
    pub peak_storage_power: Kilowatts,
    pub counts: RegimeCounts,

    /// Share of the unbalanced intervals with generation above the load.
    pub surplus_time: Option<Percentage>,

    /// Share of the unbalanced intervals with generation below the load.
    pub deficit_time: Option<Percentage>,

    /// Total energy drawn from and supplied to the grid.
    pub grid_energy: Flow<KilowattHours>,

    /// Sum of the load series.
    pub total_load: Kilowatts,

    /// Sum of the attribution series.
    pub sources: Sources<Kilowatts>,

    /// Shares of the total load served by each of the sources.
    pub source_mix: Option<Sources<Percentage>>,

    pub sustainability: Sustainability,
}

impl Summary {
    pub fn new(simulation: &Simulation) -> Self {
        let counts = simulation.counts;
        #[expect(clippy::cast_precision_loss)]
        let (surplus, unbalanced) =
            (counts.surplus as f64, (counts.surplus + counts.deficit) as f64);

        let (grid_energy, total_load, sources) = simulation.steps.iter().fold(
            (Flow::<KilowattHours>::default(), Kilowatts::ZERO, Sources::<Kilowatts>::default()),
            |(grid_energy, total_load, sources), (_, step)| {
                (
                    grid_energy + step.grid_energy,
                    total_load + step.balance.load,
                    sources + step.sources,
                )
            },
        );
        let source_mix = (total_load != Kilowatts::ZERO).then(|| {
            sources.map(|source| Percentage(100.0 * source.0 / total_load.0))
        });

        Self {
            initial_energy: simulation.initial_energy,
            final_energy: simulation.residual_energy,
            peak_storage_power: simulation.peak_storage_power,
            counts,
            surplus_time: Percentage::of(surplus, unbalanced),
            deficit_time: Percentage::of(unbalanced - surplus, unbalanced),
            grid_energy,
            total_load,
            sources,
            source_mix,
            sustainability: Sustainability::new(
                simulation.initial_energy,
                simulation.residual_energy,
            ),
        }
    }
}

/// Whether the storage cycle ends with at least as much energy as it started with.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "kebab-case")]
pub enum Sustainability {
    Sustainable {
        /// Non-negative difference between the final and initial stored energy.
        difference: KilowattHours,
    },
    Unsustainable {
        /// Negative difference between the final and initial stored energy.
        difference: KilowattHours,
    },
}

impl Sustainability {
    pub fn new(initial_energy: KilowattHours, final_energy: KilowattHours) -> Self {
        let difference = final_energy - initial_energy;
        if final_energy >= initial_energy {
            Self::Sustainable { difference }
        } else {
            Self::Unsustainable { difference }
        }
    }

    pub const fn is_sustainable(self) -> bool {
        matches!(self, Self::Sustainable { .. })
    }

    pub const fn difference(self) -> KilowattHours {
        match self {
            Self::Sustainable { difference } | Self::Unsustainable { difference } => difference,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, TimeDelta};

    use super::*;
    use crate::{
        core::{balance::Balance, battery::Battery, simulation::Simulator},
        quantity::time::Hours,
    };

    fn simulate(capacity: f64, balances: &[(f64, f64)]) -> Simulation {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let series: Vec<_> = balances
            .iter()
            .zip(0..)
            .map(|((load, generation), index)| {
                (
                    start + TimeDelta::minutes(30 * index),
                    Balance::new(Kilowatts(*load), Kilowatts(*generation)),
                )
            })
            .collect();
        Simulator::builder()
            .battery(Battery::try_new(KilowattHours(capacity), 1.0, 1.0).unwrap())
            .interval(Hours(0.5))
            .build()
            .run(&series)
    }

    #[test]
    fn test_sustainability_ok() {
        assert!(Sustainability::new(KilowattHours(100.0), KilowattHours(100.0)).is_sustainable());
        let verdict = Sustainability::new(KilowattHours(100.0), KilowattHours(60.0));
        assert!(!verdict.is_sustainable());
        assert_abs_diff_eq!(verdict.difference().0, -40.0);
    }

    #[test]
    fn test_summary_source_mix_ok() {
        // 100 kWh battery: first interval fully from storage, second half-and-half with the grid.
        let simulation = simulate(100.0, &[(100.0, 50.0), (300.0, 0.0), (50.0, 50.0)]);
        let summary = Summary::new(&simulation);
        assert_abs_diff_eq!(summary.total_load.0, 450.0);
        let sources = summary.sources;
        assert_abs_diff_eq!(sources.generation.0, 100.0);
        assert_abs_diff_eq!(sources.storage.0, 50.0 + 150.0);
        assert_abs_diff_eq!(sources.grid.0, 150.0);
        let mix = summary.source_mix.unwrap();
        assert_abs_diff_eq!(mix.generation.0 + mix.storage.0 + mix.grid.0, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mix.grid.0, 100.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.grid_energy.import.0, 75.0);
        assert!(!summary.sustainability.is_sustainable());
    }

    #[test]
    fn test_summary_time_shares_ok() {
        let simulation = simulate(0.0, &[(1.0, 2.0), (1.0, 2.0), (2.0, 1.0), (3.0, 3.0)]);
        let summary = Summary::new(&simulation);
        assert_abs_diff_eq!(summary.surplus_time.unwrap().0, 100.0 * 2.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.deficit_time.unwrap().0, 100.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.peak_storage_power.0, 0.0);
    }

    #[test]
    fn test_summary_empty_run() {
        let summary = Summary::new(&simulate(10.0, &[]));
        assert!(summary.surplus_time.is_none());
        assert!(summary.source_mix.is_none());
        assert!(summary.sustainability.is_sustainable());
    }
}
