use std::{collections::BTreeMap, ops::AddAssign};

use crate::core::series::{Point, Series};

impl<T> SumByKey for T where T: ?Sized {}

pub trait SumByKey {
    /// Sum the values sharing the same key, producing a series sorted by the key.
    ///
    /// A key missing from one of the summed series simply contributes nothing.
    fn sum_by_key<K, V>(self) -> Series<K, V>
    where
        Self: Iterator<Item = Point<K, V>> + Sized,
        K: Ord,
        V: Default + AddAssign,
    {
        let mut sums = BTreeMap::<K, V>::new();
        for (key, value) in self {
            *sums.entry(key).or_default() += value;
        }
        sums.into_iter().collect()
    }
}
