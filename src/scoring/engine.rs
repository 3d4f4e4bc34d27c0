use super::types::{ClearRank, Grade, NoteResult, PlayResult, ScoreResult};
use crate::chart::Chart;
use anyhow::{bail, Result};

/// Score of a play with every note judged pure, before shiny bonus points.
pub const MAX_BASE_SCORE: i64 = 10_000_000;
pub const EX_PLUS_SCORE: i64 = 9_900_000;
pub const EX_SCORE: i64 = 9_800_000;
pub const AA_SCORE: i64 = 9_500_000;
pub const A_SCORE: i64 = 9_200_000;
pub const B_SCORE: i64 = 8_900_000;
pub const C_SCORE: i64 = 8_600_000;

/// Points per +1 potential modifier at or above EX.
pub(crate) const EX_RATIO: f64 = 200_000.0;
/// Points per +1 potential modifier below EX.
pub(crate) const AA_RATIO: f64 = 300_000.0;

/// Modifier granted by any score at or above `MAX_BASE_SCORE`.
pub(crate) const PM_MODIFIER: f64 = 2.0;

/// `floor(10M * (1 - (far/2 + lost) / note)) + perfect`
///
/// Evaluated in integer arithmetic so the floor is exact: a far costs half a
/// note, which is why the fraction is taken over `2 * note`.
pub fn compute_score(chart: &Chart, result: &NoteResult) -> i64 {
    let half_notes = 2 * i64::from(chart.note);
    let half_misses = i64::from(result.far) + 2 * i64::from(result.lost);
    let base = (MAX_BASE_SCORE * (half_notes - half_misses)).div_euclid(half_notes);
    base + i64::from(result.perfect)
}

/// Score of a stored record, computing it from judgments when needed.
pub fn compute_play_score(result: &PlayResult, chart: &Chart) -> i64 {
    match result {
        PlayResult::Score { score, .. } => *score,
        PlayResult::Note { result, .. } => compute_score(chart, result),
    }
}

pub fn compute_grade(score: i64) -> Grade {
    match score {
        s if s >= EX_PLUS_SCORE => Grade::EXPlus,
        s if s >= EX_SCORE => Grade::EX,
        s if s >= AA_SCORE => Grade::AA,
        s if s >= A_SCORE => Grade::A,
        s if s >= B_SCORE => Grade::B,
        s if s >= C_SCORE => Grade::C,
        _ => Grade::D,
    }
}

/// Derive the clear rank from judgment counts where possible.
///
/// Without a lost note the rank follows from the counts, except that a
/// supplied `TrackLost` is kept for full-recall plays: some partners can
/// fail a track on its last note even when nothing was missed.
/// With lost notes the supplied rank is returned unchanged.
pub fn compute_clear_rank(
    result: &NoteResult,
    chart: &Chart,
    supplied: Option<ClearRank>,
) -> Option<ClearRank> {
    if result.lost == 0 {
        if result.far == 0 {
            if result.perfect == chart.note {
                return Some(ClearRank::Maximum);
            }
            return Some(ClearRank::PureMemory);
        }
        if supplied != Some(ClearRank::TrackLost) {
            return Some(ClearRank::FullRecall);
        }
    }
    supplied
}

/// Potential modifier for a score.
///
/// Capped at +2 from `MAX_BASE_SCORE` upwards. Below EX the slope flattens,
/// and the same line keeps going below zero for very low scores.
pub fn compute_potential_modifier(score: i64) -> f64 {
    if score >= MAX_BASE_SCORE {
        return PM_MODIFIER;
    }
    let over_ex = (score - EX_SCORE) as f64;
    if score >= EX_SCORE {
        over_ex / EX_RATIO + 1.0
    } else {
        over_ex / AA_RATIO + 1.0
    }
}

/// Chart constant plus score modifier, floored at zero.
pub fn compute_potential(score: i64, chart: &Chart) -> f64 {
    (chart.constant + compute_potential_modifier(score)).max(0.0)
}

pub fn compute_score_result(score: i64, chart: &Chart) -> ScoreResult {
    ScoreResult {
        chart_id: chart.id.clone(),
        score,
        grade: compute_grade(score),
        potential: compute_potential(score, chart),
    }
}

/// Map a clear type code from an exported score database.
///
/// A play whose shiny count equals the note count is a Maximum no matter what
/// the code says. Codes outside 0..=5 are rejected.
pub fn map_clear_type(code: u8, shiny_perfect_count: u32, chart: &Chart) -> Result<ClearRank> {
    if shiny_perfect_count == chart.note {
        return Ok(ClearRank::Maximum);
    }
    let rank = match code {
        0 => ClearRank::TrackLost,
        1 => ClearRank::NormalClear,
        2 => ClearRank::FullRecall,
        3 => ClearRank::PureMemory,
        4 => ClearRank::EasyClear,
        5 => ClearRank::HardClear,
        other => bail!("Unknown clear type {} for chart {}", other, chart.id),
    };
    Ok(rank)
}
