use std::ops::Div;

use derive_more::{Add, AddAssign, Sub};
use serde::Serialize;

use crate::quantity::{energy::KilowattHours, power::Kilowatts, time::Hours};

/// Generic bidirectional energy flow.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Add, AddAssign, Sub, Serialize)]
pub struct Flow<T> {
    /// Drawing from the grid or charging the battery.
    pub import: T,

    /// Supplying to the grid or discharging the battery.
    pub export: T,
}

impl<T> Flow<T> {
    pub fn map<R>(self, f: impl Fn(T) -> R) -> Flow<R> {
        Flow { import: f(self.import), export: f(self.export) }
    }
}

impl Div<Hours> for Flow<KilowattHours> {
    type Output = Flow<Kilowatts>;

    fn div(self, hours: Hours) -> Self::Output {
        self.map(|energy| energy / hours)
    }
}
