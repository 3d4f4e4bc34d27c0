use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    D,
    C,
    B,
    A,
    AA,
    EX,
    #[serde(rename = "EX+")]
    EXPlus,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::D => "D",
            Grade::C => "C",
            Grade::B => "B",
            Grade::A => "A",
            Grade::AA => "AA",
            Grade::EX => "EX",
            Grade::EXPlus => "EX+",
        };
        f.write_str(s)
    }
}

/// Clear rank of a play.
///
/// `EasyClear` and `HardClear` come from assist/hard gauges and are not
/// comparable with the rest, so no ordering is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClearRank {
    TrackLost,
    NormalClear,
    HardClear,
    FullRecall,
    PureMemory,
    Maximum,
    EasyClear,
}

impl ClearRank {
    pub fn short_name(self) -> &'static str {
        match self {
            ClearRank::TrackLost => "TL",
            ClearRank::NormalClear => "NC",
            ClearRank::HardClear => "HC",
            ClearRank::FullRecall => "FR",
            ClearRank::PureMemory => "PM",
            ClearRank::Maximum => "MAX",
            ClearRank::EasyClear => "EC",
        }
    }
}

impl fmt::Display for ClearRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Judgment counts of a single play.
///
/// A real play satisfies `pure + far + lost == note` and `perfect <= pure`,
/// but partial records are accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoteResult {
    pub pure: u32,
    pub perfect: u32, // shiny pures, each worth one bonus point
    pub far: u32,
    pub lost: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub chart_id: String,
    pub score: i64,
    pub grade: Grade,
    pub potential: f64,
}

/// What gets stored per chart: either a bare score or full judgment counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlayResult {
    Score {
        chart_id: String,
        score: i64,
        clear: Option<ClearRank>,
    },
    Note {
        chart_id: String,
        result: NoteResult,
        clear: Option<ClearRank>,
    },
}

impl PlayResult {
    pub fn chart_id(&self) -> &str {
        match self {
            PlayResult::Score { chart_id, .. } | PlayResult::Note { chart_id, .. } => chart_id,
        }
    }

    pub fn clear(&self) -> Option<ClearRank> {
        match self {
            PlayResult::Score { clear, .. } | PlayResult::Note { clear, .. } => *clear,
        }
    }

    /// Judgment counts, when this record carries them.
    pub fn note_result(&self) -> Option<&NoteResult> {
        match self {
            PlayResult::Score { .. } => None,
            PlayResult::Note { result, .. } => Some(result),
        }
    }
}
