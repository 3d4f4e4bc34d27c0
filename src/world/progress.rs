use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const BASE_PROG: f64 = 2.5;
pub(crate) const BASE_BOOST: f64 = 27.0;
pub(crate) const POTENTIAL_FACTOR: f64 = 2.45;
/// A partner with step 50 moves exactly the play result.
pub(crate) const STEP_RATIO: f64 = 50.0;

/// Progress multiplier in effect for a play. The two map families never stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorldMapBonus {
    /// Current maps: optional x4 stamina boost.
    New { x4: bool },
    /// Legacy maps: fragment boost times stamina multiplier.
    Legacy { fragment: f64, stamina: f64 },
}

impl WorldMapBonus {
    pub fn ratio(&self) -> f64 {
        match *self {
            WorldMapBonus::New { x4 } => {
                if x4 {
                    4.0
                } else {
                    1.0
                }
            }
            WorldMapBonus::Legacy { fragment, stamina } => fragment * stamina,
        }
    }
}

impl fmt::Display for WorldMapBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldMapBonus::New { x4: true } => write!(f, "new map, x4"),
            WorldMapBonus::New { x4: false } => write!(f, "new map"),
            WorldMapBonus::Legacy { fragment, stamina } => {
                write!(f, "legacy map, stamina x{} fragment x{}", stamina, fragment)
            }
        }
    }
}

/// Raw play result before the partner step is applied.
pub fn compute_play_result(potential: f64) -> f64 {
    BASE_PROG + POTENTIAL_FACTOR * potential.sqrt()
}

pub fn compute_basic_progress(step: f64, potential: f64) -> f64 {
    compute_play_result(potential) * step / STEP_RATIO
}

pub fn compute_progress(step: f64, potential: f64, bonus: Option<&WorldMapBonus>) -> f64 {
    let ratio = bonus.map_or(1.0, WorldMapBonus::ratio);
    compute_basic_progress(step, potential) * ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_progress_step_fifty() {
        // 2.5 + 2.45 * 4 = 12.3
        assert!((compute_basic_progress(50.0, 16.0) - 12.3).abs() < 1e-9);
        assert!((compute_basic_progress(100.0, 16.0) - 24.6).abs() < 1e-9);
    }

    #[test]
    fn test_zero_potential_still_moves() {
        assert!((compute_basic_progress(50.0, 0.0) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_progress_without_bonus() {
        assert_eq!(
            compute_progress(50.0, 16.0, None),
            compute_basic_progress(50.0, 16.0)
        );
    }

    #[test]
    fn test_progress_new_map_bonus() {
        let base = compute_basic_progress(50.0, 9.0);
        let x4 = WorldMapBonus::New { x4: true };
        let plain = WorldMapBonus::New { x4: false };
        assert!((compute_progress(50.0, 9.0, Some(&x4)) - base * 4.0).abs() < 1e-9);
        assert!((compute_progress(50.0, 9.0, Some(&plain)) - base).abs() < 1e-9);
    }

    #[test]
    fn test_progress_legacy_bonus() {
        let base = compute_basic_progress(50.0, 9.0);
        let bonus = WorldMapBonus::Legacy {
            fragment: 1.25,
            stamina: 4.0,
        };
        assert!((compute_progress(50.0, 9.0, Some(&bonus)) - base * 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_bonus_json_shape() {
        let bonus: WorldMapBonus =
            serde_json::from_str(r#"{"type":"legacy","fragment":1.1,"stamina":2}"#).unwrap();
        assert_eq!(
            bonus,
            WorldMapBonus::Legacy {
                fragment: 1.1,
                stamina: 2.0
            }
        );
    }
}
