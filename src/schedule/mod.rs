//! Stepped growth-rate schedule calculator.
pub mod steps;

pub use steps::{
    parse_rate, ComputedStep, PeriodBound, ScheduleConfig, ScheduleTrack, Step, TrackIssue,
};
