mod festival;
mod residential;
mod simulate;
mod storage;
mod wind;

use chrono::TimeDelta;
use clap::{Parser, Subcommand};

use crate::{
    cli::{
        festival::FestivalArgs,
        residential::ResidentialArgs,
        simulate::SimulateArgs,
        wind::WindArgs,
    },
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: balance the load against the generation with storage and the grid.
    #[clap(name = "simulate")]
    Simulate(Box<SimulateArgs>),

    /// Model the festival load from its infrastructure and set times.
    #[clap(name = "festival")]
    Festival(Box<FestivalArgs>),

    /// Model the residential load of a number of homes sharing a household profile.
    #[clap(name = "residential")]
    Residential(Box<ResidentialArgs>),

    /// Model the wind turbine generation over a typical year.
    #[clap(name = "wind")]
    Wind(Box<WindArgs>),
}

impl Command {
    pub fn run(self) -> Result {
        match self {
            Self::Simulate(args) => args.run(),
            Self::Festival(args) => args.run(),
            Self::Residential(args) => args.run(),
            Self::Wind(args) => args.run(),
        }
    }
}

#[derive(Parser)]
pub struct IntervalArgs {
    /// Duration of a single interval.
    #[clap(long = "interval", env = "INTERVAL", default_value = "30m")]
    interval: humantime::Duration,
}

impl IntervalArgs {
    pub fn try_time_delta(&self) -> Result<TimeDelta> {
        ensure!(!self.interval.is_zero(), "the interval must be positive");
        TimeDelta::from_std(*self.interval)
            .with_context(|| format!("the interval `{}` is out of range", self.interval))
    }
}
