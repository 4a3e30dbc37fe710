use std::{cmp::Ordering, fmt::Debug};

use crate::{
    core::series::{Point, Series},
    prelude::*,
};

impl<T> Align for T where T: ?Sized {}

pub trait Align {
    /// Pair every point with the point of the `other` series at the same key.
    ///
    /// Both series must be sorted. Points of `other` without a counterpart are skipped, while a
    /// point of `self` without a counterpart in `other` fails the alignment.
    fn try_align<K, V, W>(
        self,
        other: impl IntoIterator<Item = Point<K, W>>,
    ) -> Result<Series<K, (V, W)>>
    where
        Self: IntoIterator<Item = Point<K, V>> + Sized,
        K: Copy + Ord + Debug,
    {
        let mut other = other.into_iter();
        self.into_iter()
            .map(|(key, value)| {
                loop {
                    let Some((other_key, other_value)) = other.next() else {
                        bail!("the series ends before reaching {key:?}");
                    };
                    match other_key.cmp(&key) {
                        Ordering::Less => {}
                        Ordering::Equal => return Ok((key, (value, other_value))),
                        Ordering::Greater => {
                            bail!("no point at {key:?}, the next one is at {other_key:?}")
                        }
                    }
                }
            })
            .collect()
    }
}
