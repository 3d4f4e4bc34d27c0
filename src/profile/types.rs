use super::best::BestN;
use crate::chart::{Chart, ChartCatalog};
use crate::scoring::{compute_play_score, PlayResult};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const PROFILE_VERSION: u32 = 1;

/// A player's stored best results and their reported overall rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub version: u32,
    pub username: String,
    /// Overall rating as shown in game, e.g. "12.34".
    pub potential: String,
    /// One result per chart, in insertion order.
    #[serde(default)]
    pub best: Vec<PlayResult>,
}

/// What `Profile::add_result` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Replaced { old: i64, new: i64 },
    /// An existing result scores at least as high; nothing was changed.
    NotImproved { old: i64, new: i64 },
}

impl Profile {
    pub fn new(username: &str) -> Self {
        Self {
            version: PROFILE_VERSION,
            username: username.to_string(),
            potential: "0".to_string(),
            best: Vec::new(),
        }
    }

    pub fn reported_potential(&self) -> Result<f64> {
        self.potential.trim().parse::<f64>().with_context(|| {
            format!(
                "Invalid potential '{}' in profile {}",
                self.potential, self.username
            )
        })
    }

    pub fn set_potential(&mut self, potential: f64) {
        self.potential = format!("{:.2}", potential);
    }

    pub fn find_result(&self, chart_id: &str) -> Option<&PlayResult> {
        self.best.iter().find(|r| r.chart_id() == chart_id)
    }

    /// Store a result for `chart`.
    ///
    /// An existing result for the same chart is only overwritten when the new
    /// score is strictly higher, or when `replace` is set.
    pub fn add_result(
        &mut self,
        result: PlayResult,
        chart: &Chart,
        replace: bool,
    ) -> Result<AddOutcome> {
        if result.chart_id() != chart.id {
            bail!(
                "Result is for chart {} but was added as {}",
                result.chart_id(),
                chart.id
            );
        }
        let new = compute_play_score(&result, chart);
        let Some(index) = self.best.iter().position(|r| r.chart_id() == chart.id) else {
            self.best.push(result);
            return Ok(AddOutcome::Added);
        };
        let old = compute_play_score(&self.best[index], chart);
        if !replace && new <= old {
            return Ok(AddOutcome::NotImproved { old, new });
        }
        self.best[index] = result;
        Ok(AddOutcome::Replaced { old, new })
    }

    /// Returns true if a result was removed.
    pub fn remove_result(&mut self, chart_id: &str) -> bool {
        let before = self.best.len();
        self.best.retain(|r| r.chart_id() != chart_id);
        self.best.len() != before
    }

    /// Best-N statistics over the stored results.
    pub fn best_n<'a, C>(&self, catalog: &'a C) -> BestN<'a>
    where
        C: ChartCatalog + ?Sized,
    {
        BestN::compute(&self.best, catalog)
    }
}
