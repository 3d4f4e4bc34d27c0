use std::collections::BTreeMap;
use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::chart::ChartEntry;
use crate::profile::{BestN, BestResultItem};
use crate::scoring::{ClearRank, Grade, NoteResult, ScoreResult};
use crate::world::{InverseProgressSolution, RemainingProgress, RewardType};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score the way the game shows it: 8 digits grouped by
/// apostrophes ("09'925'500").
pub fn format_score(score: i64) -> String {
    let digits = format!("{:08}", score.unsigned_abs());
    let mut grouped = String::with_capacity(digits.len() + 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\'');
        }
        grouped.push(c);
    }
    if score < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Potential to 4 decimals, "-" when there is no answer
pub fn format_potential(potential: f64) -> String {
    if potential.is_nan() {
        "-".to_string()
    } else {
        format!("{:.4}", potential)
    }
}

/// "P 990 (+500) / F 5 / L 5"
pub fn format_note_result(result: &NoteResult) -> String {
    format!(
        "P {} (+{}) / F {} / L {}",
        result.pure, result.perfect, result.far, result.lost
    )
}

fn clear_label(clear: Option<ClearRank>) -> &'static str {
    clear.map_or("--", ClearRank::short_name)
}

fn chart_label(entry: &ChartEntry) -> String {
    format!(
        "{} [{} {:.1}]",
        entry.song.display_name(entry.chart),
        entry.chart.difficulty.short_name(),
        entry.chart.constant
    )
}

/// Multi-line report for one play
pub fn format_score_report(
    entry: &ChartEntry,
    score: &ScoreResult,
    note: Option<&NoteResult>,
    clear: Option<ClearRank>,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();
    if use_colors {
        lines.push(format!("{}", chart_label(entry).bold()));
        lines.push(format!(
            "  Score: {}  {}",
            format_score(score.score).bold(),
            grade_colored(score.grade)
        ));
        lines.push(format!("  Potential: {}", format_potential(score.potential).cyan()));
    } else {
        lines.push(chart_label(entry));
        lines.push(format!("  Score: {}  {}", format_score(score.score), score.grade));
        lines.push(format!("  Potential: {}", format_potential(score.potential)));
    }
    if let Some(note) = note {
        lines.push(format!("  Judgments: {}", format_note_result(note)));
    }
    lines.push(format!("  Clear: {}", clear_label(clear)));
    lines.join("\n")
}

fn grade_colored(grade: Grade) -> String {
    match grade {
        Grade::EXPlus | Grade::EX => grade.magenta().to_string(),
        Grade::AA | Grade::A => grade.green().to_string(),
        _ => grade.to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked results as a table: Rank, Potential, Score, Grade, Clear, Chart
/// No headers. Chart names are truncated to the terminal width.
pub fn format_best_table(items: &[BestResultItem], use_colors: bool) -> String {
    if items.is_empty() {
        return "No results recorded.".to_string();
    }

    let term_width = get_terminal_width();

    // rank 3, potential 7, score 10, grade 3, clear 3, plus separators
    let fixed_width = 3 + 1 + 7 + 2 + 10 + 1 + 3 + 1 + 3 + 2;

    items
        .iter()
        .map(|item| {
            let rank_str = format!("{:>2}.", item.rank);
            let potential_str = format!("{:>7.4}", item.score.potential);
            let score_str = format_score(item.score.score);
            let grade_str = format!("{:<3}", item.score.grade.to_string());
            let clear_str = format!("{:<3}", clear_label(item.clear));

            let label = chart_label(&ChartEntry {
                chart: item.chart,
                song: item.song,
            });
            let label = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_title(&label, width - fixed_width)
                }
                Some(_) => truncate_title(&label, 20),
                None => label,
            };

            if use_colors {
                format!(
                    "{} {}  {} {} {}  {}",
                    rank_str.dimmed(),
                    potential_str.bold(),
                    score_str,
                    grade_colored(item.score.grade),
                    clear_str.yellow(),
                    label
                )
            } else {
                format!(
                    "{} {}  {} {} {}  {}",
                    rank_str, potential_str, score_str, grade_str, clear_str, label
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tab-separated rows for scripting
/// Columns: rank, potential, score, grade, chart id (no headers, no colors)
pub fn format_tsv(items: &[BestResultItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{}\t{:.4}\t{}\t{}\t{}",
                item.rank, item.score.potential, item.score.score, item.score.grade, item.chart.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Aggregate lines printed under the best table
pub fn format_best_summary(best: &BestN, reported: Option<f64>, use_colors: bool) -> String {
    let mut lines = vec![
        format!(
            "Best 30 average: {}",
            best.top30_average.map_or("-".to_string(), format_potential)
        ),
        format!("Max potential: {}", format_potential(best.max_potential)),
        format!("Min potential: {}", format_potential(best.min_potential)),
    ];
    if let Some(recent) = reported.and_then(|r| best.recent_average(r)) {
        lines.push(format!("Recent 10 average: {}", format_potential(recent)));
    }
    if !best.skipped.is_empty() {
        let note = format!(
            "Skipped {} result(s) for unknown charts: {}",
            best.skipped.len(),
            best.skipped.join(", ")
        );
        lines.push(if use_colors { note.red().to_string() } else { note });
    }
    lines.join("\n")
}

fn bonus_label(solution: &InverseProgressSolution) -> String {
    solution
        .bonus
        .map_or_else(|| "no bonus".to_string(), |b| b.to_string())
}

/// One line per bonus hypothesis. Infeasible ones show their reason.
pub fn format_solutions(solutions: &[InverseProgressSolution], use_colors: bool) -> String {
    solutions
        .iter()
        .map(|solution| {
            let label = format!("{:<38}", bonus_label(solution));
            let Some(reason) = solution.invalid_message.as_deref() else {
                let potential = format!(
                    "potential {} - {}",
                    format_potential(solution.low_potential),
                    format_potential(solution.high_potential)
                );
                let pm = solution.pm_range.map_or_else(
                    || "no PM constant".to_string(),
                    |(lo, hi)| format!("PM on {:.1} - {:.1}", lo, hi),
                );
                return if use_colors {
                    format!("{}  {}  {}", label.bold(), potential, pm.green())
                } else {
                    format!("{}  {}  {}", label, potential, pm)
                };
            };
            if use_colors {
                format!("{}  {}", label.dimmed(), reason.dimmed())
            } else {
                format!("{}  {}", label, reason)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_remaining(remaining: &RemainingProgress) -> String {
    let next = match &remaining.next_reward {
        Some(next) => format!(
            "Next reward: {} at level {}, {:.1} steps away",
            next.reward.name(),
            next.level,
            next.remaining
        ),
        None => "No partner or song rewards left on this map".to_string(),
    };
    format!("{}\nTo map end: {:.1} steps", next, remaining.total)
}

/// "Song: A, B" style listing, one reward type per line
pub fn format_rewards(rewards: &BTreeMap<RewardType, Vec<String>>) -> String {
    if rewards.is_empty() {
        return "No rewards on this map.".to_string();
    }
    rewards
        .iter()
        .map(|(kind, names)| format!("{:?}: {}", kind, names.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
