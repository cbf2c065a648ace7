use std::fmt;

use chrono::NaiveDate;

use super::model::{GridCell, Region, SceneRecord, SceneTable, SensorSet};
use crate::error::CriteriaError;

// ---------------------------------------------------------------------------
// Filter criteria: one optional constraint per dimension
// ---------------------------------------------------------------------------

/// The complete filter configuration.
///
/// A field that is `None` puts no constraint on its dimension, so the default
/// value lets every scene through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_cloud_cover: Option<u8>,
    pub grid: Option<GridCell>,
    pub region: Option<Region>,
    pub sensors: Option<SensorSet>,
}

impl FilterCriteria {
    /// Whether no constraint is set at all.
    pub fn is_empty(&self) -> bool {
        self.steps().is_empty()
    }

    /// Reject combinations that can never select anything.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(CriteriaError::DateOrder { start, end });
            }
        }
        Ok(())
    }

    /// The active filter steps, in the order they are applied.
    pub fn steps(&self) -> Vec<FilterStep> {
        let mut steps = Vec::new();
        if let Some(date) = self.start_date {
            steps.push(FilterStep::StartDate(date));
        }
        if let Some(date) = self.end_date {
            steps.push(FilterStep::EndDate(date));
        }
        if let Some(max) = self.max_cloud_cover {
            steps.push(FilterStep::CloudCover(max));
        }
        if let Some(grid) = self.grid {
            steps.push(FilterStep::Grid(grid));
        }
        if let Some(region) = self.region {
            steps.push(FilterStep::Region(region));
        }
        if let Some(sensors) = &self.sensors {
            steps.push(FilterStep::Sensor(sensors.clone()));
        }
        steps
    }

    /// Run all active steps over `table`, reporting each one to `observer`.
    ///
    /// Every step runs even if an earlier one left no scenes, so the observer
    /// always sees one report per active constraint.
    pub fn apply(&self, mut table: SceneTable, observer: &mut dyn FilterObserver) -> SceneTable {
        for step in self.steps() {
            let before = table.len();
            table.retain(|scene| step.matches(scene));

            observer.step_applied(&StepReport {
                step: &step,
                before,
                remaining: table.len(),
            });
        }
        table
    }
}

// ---------------------------------------------------------------------------
// Individual filter steps
// ---------------------------------------------------------------------------

/// A single active constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStep {
    StartDate(NaiveDate),
    EndDate(NaiveDate),
    CloudCover(u8),
    Grid(GridCell),
    Region(Region),
    Sensor(SensorSet),
}

impl FilterStep {
    /// Whether `scene` survives this step.
    pub fn matches(&self, scene: &SceneRecord) -> bool {
        match self {
            FilterStep::StartDate(start) => scene.acquisition_date >= *start,
            FilterStep::EndDate(end) => scene.acquisition_date <= *end,
            FilterStep::CloudCover(max) => scene.cloud_cover <= f64::from(*max),
            FilterStep::Grid(grid) => grid.contains(scene),
            FilterStep::Region(region) => scene.region == region.code(),
            FilterStep::Sensor(sensors) => sensors.matches(&scene.sensor),
        }
    }
}

impl fmt::Display for FilterStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStep::StartDate(d) => write!(f, "Removing entries before {d}"),
            FilterStep::EndDate(d) => write!(f, "Removing entries after {d}"),
            FilterStep::CloudCover(max) => {
                write!(f, "Removing entries with cloud cover above {max}%")
            }
            FilterStep::Grid(g) => write!(
                f,
                "Keeping entries in grid horizontal {} vertical {}",
                g.horizontal, g.vertical
            ),
            FilterStep::Region(r) => write!(f, "Keeping entries in region {r}"),
            FilterStep::Sensor(s) => write!(f, "Keeping entries from sensor(s) {s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Outcome of one applied filter step.
#[derive(Debug, Clone, Copy)]
pub struct StepReport<'a> {
    pub step: &'a FilterStep,
    pub before: usize,
    pub remaining: usize,
}

impl StepReport<'_> {
    pub fn removed(&self) -> usize {
        self.before - self.remaining
    }
}

/// Receives a report after each filter step.
pub trait FilterObserver {
    fn step_applied(&mut self, report: &StepReport<'_>);
}

impl<F> FilterObserver for F
where
    F: FnMut(&StepReport<'_>),
{
    fn step_applied(&mut self, report: &StepReport<'_>) {
        self(report)
    }
}

/// Prints each step and the remaining row count to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl FilterObserver for ConsoleReporter {
    fn step_applied(&mut self, report: &StepReport<'_>) {
        log::debug!(
            "{:?}: {} -> {} entries",
            report.step,
            report.before,
            report.remaining
        );
        println!("{}", report.step);
        println!(
            "  {} entries remaining ({} removed)",
            report.remaining,
            report.removed()
        );
    }
}
