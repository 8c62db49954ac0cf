//! Stats module - engagement aggregates

mod calculator;
mod dates;

pub use calculator::{
    AgeGroupSummary, Aggregates, DateAverage, FiveNumberSummary, GroupedAverage, StatsCalculator,
    StatsError,
};
pub use dates::parse_calendar_date;
