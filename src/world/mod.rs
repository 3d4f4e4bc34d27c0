pub mod map;
pub mod progress;
pub mod solver;

pub use map::{
    compute_distance, compute_progress_range, compute_remaining_progress, find_map, load_maps,
    EVENT_CHAPTER,
    map_rewards, Chapter, CurrentProgress, NextReward, Platform, RemainingProgress, Reward,
    RewardType, WorldMap,
};
pub use progress::{compute_basic_progress, compute_play_result, compute_progress, WorldMapBonus};
pub use solver::{
    bonus_hypotheses, inverse_beyond_boost, inverse_progress, solve_for_platform,
    solve_progress_range, InverseProgressSolution,
};
