use derive_more::{Add, AddAssign};
use serde::Serialize;

use crate::quantity::power::Kilowatts;

/// Attribution of the served load to the sources that covered it.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Add, AddAssign, Serialize)]
pub struct Sources<T> {
    pub generation: T,
    pub storage: T,
    pub grid: T,
}

impl<T> Sources<T> {
    pub fn map<R>(self, f: impl Fn(T) -> R) -> Sources<R> {
        Sources { generation: f(self.generation), storage: f(self.storage), grid: f(self.grid) }
    }
}

impl Sources<Kilowatts> {
    pub fn total(self) -> Kilowatts {
        self.generation + self.storage + self.grid
    }
}
