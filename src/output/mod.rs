pub mod formatter;

pub use formatter::{
    format_best_summary, format_best_table, format_note_result, format_potential,
    format_remaining, format_rewards, format_score, format_score_report, format_solutions,
    format_tsv, should_use_colors,
};
