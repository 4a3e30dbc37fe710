use crate::{
    core::{
        balance::{Balance, Regime},
        flow::Flow,
        sources::Sources,
        step::Step,
    },
    prelude::*,
    quantity::{energy::KilowattHours, time::Hours},
};

/// Energy storage configuration.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Battery {
    /// Zero capacity disables the storage.
    pub capacity: KilowattHours,

    /// Share of the surplus energy that ends up stored while charging.
    pub charging_efficiency: f64,

    /// Share of the stored energy that reaches the load while discharging.
    pub discharging_efficiency: f64,
}

impl Battery {
    pub fn try_new(
        capacity: KilowattHours,
        charging_efficiency: f64,
        discharging_efficiency: f64,
    ) -> Result<Self> {
        ensure!(
            capacity.0.is_finite() && capacity >= KilowattHours::ZERO,
            "storage capacity must be non-negative, got {capacity}",
        );
        for (name, efficiency) in
            [("charging", charging_efficiency), ("discharging", discharging_efficiency)]
        {
            ensure!(
                efficiency > 0.0 && efficiency <= 1.0,
                "{name} efficiency must be within (0, 1], got {efficiency}",
            );
        }
        Ok(Self { capacity, charging_efficiency, discharging_efficiency })
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > KilowattHours::ZERO
    }

    pub const fn round_trip_efficiency(&self) -> f64 {
        self.charging_efficiency * self.discharging_efficiency
    }

    /// Balance a single interval, starting with the given stored energy.
    ///
    /// Surplus charges the battery and overflows to the grid. Deficit drains the battery first,
    /// and the grid covers whatever the battery cannot.
    pub fn step(&self, residual_energy: KilowattHours, balance: Balance, duration: Hours) -> Step {
        let mut residual_energy_after = residual_energy;
        let mut grid_energy = Flow::<KilowattHours>::default();
        let mut sources = Sources {
            generation: balance.load.min(balance.generation),
            ..Sources::default()
        };

        match balance.regime() {
            Regime::Surplus => {
                let excess = (balance.generation - balance.load) * duration;
                if self.is_enabled() && residual_energy < self.capacity {
                    residual_energy_after = residual_energy + excess * self.charging_efficiency;
                    if residual_energy_after > self.capacity {
                        grid_energy.export = residual_energy_after - self.capacity;
                        residual_energy_after = self.capacity;
                    }
                } else {
                    grid_energy.export = excess;
                }
            }

            Regime::Deficit => {
                let shortfall = balance.load - balance.generation;
                let required = shortfall * duration / self.discharging_efficiency;
                if residual_energy >= required {
                    residual_energy_after = residual_energy - required;
                    sources.storage = shortfall;
                } else {
                    // Drain whatever is left, the grid covers the rest:
                    grid_energy.import = required - residual_energy;
                    sources.storage = residual_energy * self.discharging_efficiency / duration;
                    sources.grid = shortfall - sources.storage;
                    residual_energy_after = KilowattHours::ZERO;
                }
            }

            Regime::Balanced => {}
        }

        Step {
            balance,
            residual_energy_after,
            storage_power: (residual_energy_after - residual_energy) / duration,
            grid_power: grid_energy / duration,
            grid_energy,
            sources,
        }
    }
}
