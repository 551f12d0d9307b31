//! Stepped growth-rate schedules.
//!
//! A track is an ordered list of steps, each holding a rate and a duration
//! in periods. Durations chain end-to-end: a step starts the period after
//! its predecessor ends. The sentinel `"E"` runs a step to the end of the
//! analysis horizon. Unresolved bounds are a normal editing state rendered
//! as a placeholder, never an error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed parameters of the analysis timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Number of periods in the analysis horizon (months, by convention).
    pub horizon: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { horizon: 180 }
    }
}

/// One user-editable row of a rate track. Both fields are kept verbatim as
/// entered; parsing happens on read so half-typed input never crashes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Step {
    pub rate: String,
    pub periods: String,
}

impl Step {
    pub fn new(rate: &str, periods: &str) -> Self {
        Self {
            rate: rate.to_string(),
            periods: periods.to_string(),
        }
    }
}

/// A resolved or not-yet-resolvable period boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodBound {
    Unresolved,
    At(u32),
}

impl fmt::Display for PeriodBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodBound::Unresolved => write!(f, "-"),
            PeriodBound::At(p) => write!(f, "{}", p),
        }
    }
}

/// A step plus its derived period span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedStep {
    pub step: Step,
    pub from: PeriodBound,
    pub thru: PeriodBound,
}

/// Well-formedness findings for a whole track. Advisory; the calculator
/// itself tolerates any shape without crashing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackIssue {
    /// No step runs to the end of the analysis.
    MissingEnd,
    /// More than one step carries the end sentinel.
    MultipleEnd { indices: Vec<usize> },
    /// The end sentinel appears before the last step.
    EndNotLast { index: usize },
}

enum PeriodSpec {
    End,
    Count(u32),
    Invalid,
}

fn parse_periods(s: &str) -> PeriodSpec {
    let s = s.trim();
    if s.eq_ignore_ascii_case("e") {
        return PeriodSpec::End;
    }
    match s.parse::<u32>() {
        Ok(n) if n > 0 => PeriodSpec::Count(n),
        _ => PeriodSpec::Invalid,
    }
}

/// Parses a rate like `"3.0%"` or `"3"` for display math. Never gates
/// period resolution.
pub fn parse_rate(s: &str) -> Option<f64> {
    let s = s.trim().trim_end_matches('%').trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// One named rate track and its computed spans. Edits to step `i` cascade
/// to every step at or after `i`; earlier steps are never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleTrack {
    config: ScheduleConfig,
    steps: Vec<ComputedStep>,
}

impl ScheduleTrack {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            steps: Vec::new(),
        }
    }

    pub fn from_steps(config: ScheduleConfig, steps: Vec<Step>) -> Self {
        let mut track = Self::new(config);
        track.steps = steps
            .into_iter()
            .map(|step| ComputedStep {
                step,
                from: PeriodBound::Unresolved,
                thru: PeriodBound::Unresolved,
            })
            .collect();
        track.recompute_from(0);
        track
    }

    pub fn steps(&self) -> &[ComputedStep] {
        &self.steps
    }

    pub fn config(&self) -> ScheduleConfig {
        self.config
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(ComputedStep {
            step,
            from: PeriodBound::Unresolved,
            thru: PeriodBound::Unresolved,
        });
        self.recompute_from(self.steps.len() - 1);
    }

    /// Replaces step `index` and recomputes the affected suffix.
    pub fn set(&mut self, index: usize, step: Step) {
        self.steps[index].step = step;
        self.recompute_from(index);
    }

    pub fn set_rate(&mut self, index: usize, rate: &str) {
        self.steps[index].step.rate = rate.to_string();
        self.recompute_from(index);
    }

    pub fn set_periods(&mut self, index: usize, periods: &str) {
        self.steps[index].step.periods = periods.to_string();
        self.recompute_from(index);
    }

    pub fn insert(&mut self, index: usize, step: Step) {
        self.steps.insert(
            index,
            ComputedStep {
                step,
                from: PeriodBound::Unresolved,
                thru: PeriodBound::Unresolved,
            },
        );
        self.recompute_from(index);
    }

    pub fn remove(&mut self, index: usize) -> Step {
        let removed = self.steps.remove(index);
        self.recompute_from(index);
        removed.step
    }

    /// Re-derives `from`/`thru` for every step at or after `start`.
    fn recompute_from(&mut self, start: usize) {
        for i in start..self.steps.len() {
            let from = if i == 0 {
                PeriodBound::At(1)
            } else {
                match self.steps[i - 1].thru {
                    PeriodBound::At(t) => PeriodBound::At(t + 1),
                    PeriodBound::Unresolved => PeriodBound::Unresolved,
                }
            };

            // The end sentinel pins thru to the horizon regardless of from;
            // a finite count needs a resolved start to anchor against.
            let thru = match parse_periods(&self.steps[i].step.periods) {
                PeriodSpec::End => PeriodBound::At(self.config.horizon),
                PeriodSpec::Count(n) => match from {
                    PeriodBound::At(f) => PeriodBound::At(f + n - 1),
                    PeriodBound::Unresolved => PeriodBound::Unresolved,
                },
                PeriodSpec::Invalid => PeriodBound::Unresolved,
            };

            self.steps[i].from = from;
            self.steps[i].thru = thru;
        }
    }

    /// Well-formedness: exactly one end sentinel, and it must be last.
    pub fn check(&self) -> Vec<TrackIssue> {
        let end_indices: Vec<usize> = self
            .steps
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(parse_periods(&s.step.periods), PeriodSpec::End))
            .map(|(i, _)| i)
            .collect();

        let mut issues = Vec::new();
        match end_indices.as_slice() {
            [] => issues.push(TrackIssue::MissingEnd),
            [only] => {
                if *only != self.steps.len() - 1 {
                    issues.push(TrackIssue::EndNotLast { index: *only });
                }
            }
            many => {
                issues.push(TrackIssue::MultipleEnd {
                    indices: many.to_vec(),
                });
                if let Some(&last) = many.last() {
                    if last != self.steps.len() - 1 {
                        issues.push(TrackIssue::EndNotLast { index: last });
                    }
                }
            }
        }
        issues
    }
}
