pub mod engine;
pub mod inverse;
pub mod types;

pub use engine::{
    compute_clear_rank, compute_grade, compute_play_score, compute_potential,
    compute_potential_modifier, compute_score, compute_score_result, map_clear_type, AA_SCORE,
    A_SCORE, B_SCORE, C_SCORE, EX_PLUS_SCORE, EX_SCORE, MAX_BASE_SCORE,
};
pub use inverse::{
    compute_far, compute_pm_constant, infer_note_result, inverse_constant, inverse_score,
};
pub use types::{ClearRank, Grade, NoteResult, PlayResult, ScoreResult};
