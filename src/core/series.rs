mod align;
mod sum;
mod validate;

pub use self::{align::Align, sum::SumByKey, validate::Validate};

pub type Point<K, V> = (K, V);
pub type Series<K, V> = Vec<Point<K, V>>;
