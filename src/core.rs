pub mod balance;
pub mod battery;
pub mod flow;
pub mod series;
pub mod simulation;
pub mod sources;
pub mod step;
