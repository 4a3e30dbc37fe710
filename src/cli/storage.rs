//! Storage-related CLI arguments.

use clap::Parser;

use crate::{core::battery::Battery, prelude::*, quantity::energy::KilowattHours};

#[must_use]
#[derive(Copy, Clone, Parser)]
pub struct StorageArgs {
    /// Storage capacity in kilowatt-hours, zero disables the storage.
    #[clap(long = "storage-capacity-kwh", env = "STORAGE_CAPACITY_KWH", default_value = "1000")]
    capacity: KilowattHours,

    /// Share of the surplus energy that ends up stored, within (0, 1].
    #[clap(long = "storage-charging-efficiency", env, default_value = "0.9")]
    storage_charging_efficiency: f64,

    /// Share of the stored energy that reaches the load, within (0, 1].
    #[clap(long = "storage-discharging-efficiency", env, default_value = "0.9")]
    storage_discharging_efficiency: f64,
}

impl StorageArgs {
    pub fn try_battery(self) -> Result<Battery> {
        Battery::try_new(
            self.capacity,
            self.storage_charging_efficiency,
            self.storage_discharging_efficiency,
        )
        .context("invalid storage configuration")
    }
}
