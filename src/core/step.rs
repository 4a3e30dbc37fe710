use serde::Serialize;

use crate::{
    core::{balance::Balance, flow::Flow, sources::Sources},
    quantity::{energy::KilowattHours, power::Kilowatts},
};

/// Outcome of a single interval.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Step {
    pub balance: Balance,

    /// Stored energy at the end of the interval.
    pub residual_energy_after: KilowattHours,

    /// Rate of change of the stored energy, positive while charging.
    pub storage_power: Kilowatts,

    /// Energy drawn from (import) and supplied to (export) the grid.
    pub grid_energy: Flow<KilowattHours>,

    /// The grid energy expressed as average power over the interval.
    pub grid_power: Flow<Kilowatts>,

    /// Which sources served the load.
    pub sources: Sources<Kilowatts>,
}

impl Step {
    /// Truncate every recorded value toward zero.
    ///
    /// The battery state carried to the next interval is not affected.
    pub fn truncated(self) -> Self {
        Self {
            balance: self.balance,
            residual_energy_after: self.residual_energy_after.trunc(),
            storage_power: self.storage_power.trunc(),
            grid_energy: self.grid_energy.map(KilowattHours::trunc),
            grid_power: self.grid_power.map(Kilowatts::trunc),
            sources: self.sources.map(Kilowatts::trunc),
        }
    }
}
