//! Upstream models producing the load and generation series.

pub mod festival;
pub mod residential;
pub mod wind;
