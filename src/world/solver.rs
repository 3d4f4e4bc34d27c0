use super::map::{compute_progress_range, CurrentProgress, WorldMap};
use super::progress::{WorldMapBonus, BASE_BOOST, BASE_PROG, POTENTIAL_FACTOR, STEP_RATIO};
use crate::chart::ConstantBounds;
use crate::scoring::{compute_pm_constant, inverse_constant};
use anyhow::Result;
use serde::Serialize;

const LEGACY_STAMINA: [f64; 3] = [2.0, 4.0, 6.0];
const LEGACY_FRAGMENT: [f64; 4] = [1.0, 1.1, 1.25, 1.5];

/// One answer to "what potential lands me in this progress window", under a
/// single bonus hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InverseProgressSolution {
    /// `None` means no bonus at all.
    pub bonus: Option<WorldMapBonus>,
    pub low_potential: f64,
    pub high_potential: f64,
    /// Why this hypothesis cannot work, if it cannot.
    pub invalid_message: Option<String>,
    /// Chart constants whose full-accuracy play lands in the window.
    pub pm_range: Option<(f64, f64)>,
}

impl InverseProgressSolution {
    pub fn is_valid(&self) -> bool {
        self.invalid_message.is_none()
    }
}

/// Potential whose basic progress equals `progress`.
///
/// A negative root means even a zero-potential play goes further than
/// `progress`: as a lower bound that is simply 0, as an upper bound there is
/// no answer.
fn inverse_basic_progress(progress: f64, step: f64, overflow: bool) -> f64 {
    let root = (progress * STEP_RATIO / step - BASE_PROG) / POTENTIAL_FACTOR;
    if root < 0.0 {
        return if overflow { 0.0 } else { f64::NAN };
    }
    root * root
}

/// Every bonus regime worth considering: none, new map x4, then each legacy
/// stamina/fragment combination.
pub fn bonus_hypotheses() -> Vec<Option<WorldMapBonus>> {
    let mut hypotheses = vec![None, Some(WorldMapBonus::New { x4: true })];
    for stamina in LEGACY_STAMINA {
        for fragment in LEGACY_FRAGMENT {
            hypotheses.push(Some(WorldMapBonus::Legacy { fragment, stamina }));
        }
    }
    hypotheses
}

/// Solve the progress window `[low, high]` under every bonus hypothesis.
/// Infeasible hypotheses are kept, tagged with the reason.
pub fn inverse_progress(
    step: f64,
    (low, high): (f64, f64),
    bounds: &ConstantBounds,
) -> Vec<InverseProgressSolution> {
    bonus_hypotheses()
        .into_iter()
        .map(|bonus| {
            let ratio = bonus.as_ref().map_or(1.0, WorldMapBonus::ratio);
            let mut solution = solve_progress_range(step, (low / ratio, high / ratio), bounds);
            solution.bonus = bonus;
            solution
        })
        .collect()
}

/// Solve an unboosted progress window for the potential and, assuming a
/// full-accuracy play, the chart constant range.
pub fn solve_progress_range(
    step: f64,
    (low, high): (f64, f64),
    bounds: &ConstantBounds,
) -> InverseProgressSolution {
    let max_potential = bounds.max_single_potential();
    let low_potential = inverse_basic_progress(low, step, true);
    let high_raw = inverse_basic_progress(high, step, false);
    // f64::min would swallow the NaN
    let high_potential = if high_raw.is_nan() {
        high_raw
    } else {
        high_raw.min(max_potential)
    };

    let mut solution = InverseProgressSolution {
        bonus: None,
        low_potential,
        high_potential,
        invalid_message: None,
        pm_range: None,
    };

    if high_potential.is_nan() {
        solution.invalid_message =
            Some("Cannot land here: even a zero score moves past the target".to_string());
    } else if low_potential > max_potential {
        solution.invalid_message = Some(format!(
            "Even a pure memory on a {} chart cannot move this far",
            bounds.maximum
        ));
    } else if low_potential > high_potential {
        solution.invalid_message =
            Some("Cannot land here: the window is too narrow to land in".to_string());
    } else {
        let min_constant = compute_pm_constant(low_potential, true).max(bounds.minimum);
        let max_constant = compute_pm_constant(high_potential, false).min(bounds.maximum);
        if min_constant <= max_constant {
            solution.pm_range = Some((min_constant, max_constant));
        }
    }
    solution
}

/// Inverse progress for landing on `target_level` from `current`.
pub fn solve_for_platform(
    map: &WorldMap,
    current: &CurrentProgress,
    target_level: usize,
    step: f64,
    bounds: &ConstantBounds,
) -> Result<Vec<InverseProgressSolution>> {
    let range = compute_progress_range(map, current, target_level)?;
    log::debug!(
        "Map {} level {} -> {}: progress window {:?}",
        map.id,
        current.level,
        target_level,
        range
    );
    Ok(inverse_progress(step, range, bounds))
}

/// Chart constant implied by a one-off beyond boost of `difference` obtained
/// with `score`. NaN when no potential produces that boost.
pub fn inverse_beyond_boost(difference: f64, score: i64) -> f64 {
    let root = (difference - BASE_BOOST) / POTENTIAL_FACTOR;
    if root < 0.0 {
        return f64::NAN;
    }
    inverse_constant(root * root, score)
}
