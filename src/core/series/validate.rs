use chrono::{NaiveDateTime, TimeDelta};
use itertools::Itertools;

use crate::{core::series::Point, prelude::*};

pub trait Validate {
    /// Ensure that the timestamps strictly increase.
    fn try_validate_increasing(&self) -> Result;

    /// Ensure that the timestamps strictly increase by exactly `interval`.
    fn try_validate_uniform(&self, interval: TimeDelta) -> Result;
}

impl<V> Validate for [Point<NaiveDateTime, V>] {
    fn try_validate_increasing(&self) -> Result {
        for ((left, _), (right, _)) in self.iter().tuple_windows() {
            ensure!(left < right, "timestamps must strictly increase, but {right} follows {left}");
        }
        Ok(())
    }

    fn try_validate_uniform(&self, interval: TimeDelta) -> Result {
        self.try_validate_increasing()?;
        for ((left, _), (right, _)) in self.iter().tuple_windows() {
            ensure!(
                *right - *left == interval,
                "expected {} minutes between {left} and {right}",
                interval.num_minutes(),
            );
        }
        Ok(())
    }
}
