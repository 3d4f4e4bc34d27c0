use super::engine::{
    compute_potential_modifier, compute_score, AA_RATIO, AA_SCORE, EX_RATIO, EX_SCORE,
    MAX_BASE_SCORE, PM_MODIFIER,
};
use super::types::NoteResult;
use crate::chart::Chart;

/// Constants at or above this are published in 0.1 steps, below it in 0.5 steps.
const FINE_CONSTANT_THRESHOLD: f64 = 8.0;

/// Smallest chart constant (when `overflow`) or largest one (otherwise) whose
/// full-accuracy play relates to `potential`, on the published constant grid.
///
/// The grid switch at 8.0 is an approximation of how constants are published.
pub fn compute_pm_constant(potential: f64, overflow: bool) -> f64 {
    let target = potential - PM_MODIFIER;
    let steps_per_unit = if target >= FINE_CONSTANT_THRESHOLD {
        10.0
    } else {
        2.0
    };
    let scaled = snap_to_integer(target * steps_per_unit);
    let stepped = if overflow {
        scaled.ceil()
    } else {
        scaled.floor()
    };
    stepped / steps_per_unit
}

/// Absorb binary representation noise such as `10.3 * 10 = 103.00000000000001`
/// so it does not push ceil/floor across a grid line.
fn snap_to_integer(value: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() < 1e-9 {
        nearest
    } else {
        value
    }
}

/// Score needed on a chart of `constant` to reach `potential`.
pub fn inverse_score(potential: f64, constant: f64) -> i64 {
    let modifier = potential - constant;
    let raw = if modifier < 1.0 {
        modifier * AA_RATIO + AA_SCORE as f64
    } else {
        (modifier - 1.0) * EX_RATIO + EX_SCORE as f64
    };
    raw.round() as i64
}

/// Chart constant implied by a potential and the score that produced it,
/// rounded to one decimal.
pub fn inverse_constant(potential: f64, score: i64) -> f64 {
    let raw = potential - compute_potential_modifier(score);
    (raw * 10.0).round() / 10.0
}

/// Far count of a no-lost play that would land on `score`, ignoring shiny
/// bonus points. Rounds down when `overflow`, up otherwise.
pub fn compute_far(score: i64, note: u32, overflow: bool) -> i64 {
    let numerator = (MAX_BASE_SCORE - score) * i64::from(note) * 2;
    if overflow {
        numerator.div_euclid(MAX_BASE_SCORE)
    } else {
        -(-numerator).div_euclid(MAX_BASE_SCORE)
    }
}

/// Rebuild full judgment counts from whatever is known about a play.
///
/// Supported shapes, tried in order:
/// 1. perfect, far and lost known: pure follows from the note count.
/// 2. score, far and lost known: pure follows, perfect is the leftover score.
/// 3. only the score known: a score at or above `MAX_BASE_SCORE` is a pure
///    memory, otherwise a one-far play is assumed if the score allows it.
///
/// Anything else, or counts that cannot belong to this chart, gives `None`.
pub fn infer_note_result(
    chart: &Chart,
    perfect: Option<u32>,
    far: Option<u32>,
    lost: Option<u32>,
    score: Option<i64>,
) -> Option<NoteResult> {
    let note = chart.note;
    match (perfect, far, lost, score) {
        (Some(perfect), Some(far), Some(lost), _) => Some(NoteResult {
            pure: note.checked_sub(far)?.checked_sub(lost)?,
            perfect,
            far,
            lost,
        }),
        (_, Some(far), Some(lost), Some(score)) => {
            let pure = note.checked_sub(far)?.checked_sub(lost)?;
            let mut result = NoteResult {
                pure,
                perfect: 0,
                far,
                lost,
            };
            result.perfect = u32::try_from(score - compute_score(chart, &result)).ok()?;
            Some(result)
        }
        (None, None, None, Some(score)) if score >= MAX_BASE_SCORE => Some(NoteResult {
            pure: note,
            perfect: u32::try_from(score - MAX_BASE_SCORE).ok()?,
            far: 0,
            lost: 0,
        }),
        (None, None, None, Some(score)) => {
            let mut one_far = NoteResult {
                pure: note.checked_sub(1)?,
                perfect: 0,
                far: 1,
                lost: 0,
            };
            let one_far_score = compute_score(chart, &one_far);
            if score < one_far_score {
                return None;
            }
            one_far.perfect = u32::try_from(score - one_far_score).ok()?;
            Some(one_far)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::catalog::tests::chart;
    use crate::scoring::compute_potential;
    use proptest::prelude::*;

    #[test]
    fn test_pm_constant_fine_grid() {
        // target 9.83 -> 9.9 / 9.8
        assert!((compute_pm_constant(11.83, true) - 9.9).abs() < 1e-9);
        assert!((compute_pm_constant(11.83, false) - 9.8).abs() < 1e-9);
    }

    #[test]
    fn test_pm_constant_coarse_grid() {
        // target 7.3 -> 7.5 / 7.0
        assert!((compute_pm_constant(9.3, true) - 7.5).abs() < 1e-9);
        assert!((compute_pm_constant(9.3, false) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_pm_constant_threshold_is_inclusive() {
        // target exactly 8.0 uses the fine grid
        assert!((compute_pm_constant(10.0, true) - 8.0).abs() < 1e-9);
        // just below 8 uses the coarse grid
        assert!((compute_pm_constant(9.95, false) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_pm_constant_exact_grid_value_is_stable() {
        assert!((compute_pm_constant(12.3, true) - 10.3).abs() < 1e-9);
        assert!((compute_pm_constant(12.3, false) - 10.3).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_score_both_branches() {
        // modifier 1.5 -> EX branch
        assert_eq!(inverse_score(11.5, 10.0), 9_900_000);
        // modifier 0.5 -> AA branch
        assert_eq!(inverse_score(10.5, 10.0), 9_650_000);
        // modifier exactly 1 -> EX
        assert_eq!(inverse_score(11.0, 10.0), 9_800_000);
    }

    #[test]
    fn test_inverse_constant_rounds_to_one_decimal() {
        assert!((inverse_constant(11.5, 9_900_000) - 10.0).abs() < 1e-9);
        assert!((inverse_constant(11.54, 9_900_000) - 10.0).abs() < 1e-9);
        assert!((inverse_constant(11.56, 9_900_000) - 10.1).abs() < 1e-9);
    }

    #[test]
    fn test_compute_far_rounding_direction() {
        // (10M - 9_990_000) * 1000 * 2 / 10M = 2.0 exactly
        assert_eq!(compute_far(9_990_000, 1000, true), 2);
        assert_eq!(compute_far(9_990_000, 1000, false), 2);
        // 2.2 far
        assert_eq!(compute_far(9_989_000, 1000, true), 2);
        assert_eq!(compute_far(9_989_000, 1000, false), 3);
    }

    #[test]
    fn test_infer_from_all_counts() {
        let c = chart("alpha-2", 9.8, 1000);
        let result = infer_note_result(&c, Some(500), Some(5), Some(5), None).unwrap();
        assert_eq!(result.pure, 990);
        assert_eq!(result.perfect, 500);
    }

    #[test]
    fn test_infer_from_score_far_lost() {
        let c = chart("alpha-2", 9.8, 1000);
        let result = infer_note_result(&c, None, Some(5), Some(5), Some(9_925_500)).unwrap();
        assert_eq!(result.pure, 990);
        assert_eq!(result.perfect, 500);
        assert_eq!(compute_score(&c, &result), 9_925_500);
    }

    #[test]
    fn test_infer_rejects_score_below_counts() {
        let c = chart("alpha-2", 9.8, 1000);
        assert!(infer_note_result(&c, None, Some(5), Some(5), Some(9_000_000)).is_none());
    }

    #[test]
    fn test_infer_rejects_counts_over_note_total() {
        let c = chart("alpha-2", 9.8, 100);
        assert!(infer_note_result(&c, Some(0), Some(60), Some(60), None).is_none());
    }

    #[test]
    fn test_infer_score_only_pure_memory() {
        let c = chart("alpha-2", 9.8, 1000);
        let result = infer_note_result(&c, None, None, None, Some(10_000_950)).unwrap();
        assert_eq!(
            result,
            NoteResult {
                pure: 1000,
                perfect: 950,
                far: 0,
                lost: 0
            }
        );
    }

    #[test]
    fn test_infer_score_only_one_far() {
        let c = chart("alpha-2", 9.8, 1000);
        // one far costs 5000 points
        let result = infer_note_result(&c, None, None, None, Some(9_995_900)).unwrap();
        assert_eq!(result.pure, 999);
        assert_eq!(result.far, 1);
        assert_eq!(result.lost, 0);
        assert_eq!(result.perfect, 900);
    }

    #[test]
    fn test_infer_score_only_too_low_is_unsolvable() {
        let c = chart("alpha-2", 9.8, 1000);
        assert!(infer_note_result(&c, None, None, None, Some(9_994_999)).is_none());
    }

    #[test]
    fn test_infer_unsupported_shapes() {
        let c = chart("alpha-2", 9.8, 1000);
        assert!(infer_note_result(&c, None, None, None, None).is_none());
        assert!(infer_note_result(&c, Some(900), Some(1), None, None).is_none());
        assert!(infer_note_result(&c, None, Some(1), None, Some(9_990_000)).is_none());
        assert!(infer_note_result(&c, Some(900), None, None, Some(9_990_000)).is_none());
    }

    proptest! {
        #[test]
        fn inverse_constant_recovers_constant(
            tenths in 20u32..=125,
            score in 9_000_000i64..=10_002_000,
        ) {
            let constant = f64::from(tenths) / 10.0;
            let c = chart("alpha-2", constant, 1000);
            let potential = compute_potential(score, &c);
            prop_assert!((inverse_constant(potential, score) - constant).abs() <= 0.05);
        }

        #[test]
        fn overflow_pm_constant_is_never_lower(potential in -5.0f64..20.0) {
            let upper = compute_pm_constant(potential, true);
            let lower = compute_pm_constant(potential, false);
            prop_assert!(upper >= lower);
        }
    }
}
