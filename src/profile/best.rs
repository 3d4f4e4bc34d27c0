use crate::chart::{Chart, ChartCatalog, Song};
use crate::scoring::{
    compute_play_score, compute_score_result, ClearRank, NoteResult, PlayResult, ScoreResult,
};

const BEST_COUNT: usize = 30;
const TOP_COUNT: usize = 10;
const RECENT_COUNT: usize = 10;
/// Ranks 31..=39 are shown as the next candidates for the best 30.
const OVERFLOW_END: usize = 39;
/// Rating = (best 30 + recent 10) / 40.
const RATING_DIVISOR: f64 = 40.0;

/// One stored result, resolved against the catalog and ranked.
#[derive(Debug, Clone)]
pub struct BestResultItem<'a> {
    /// 1-based rank by potential.
    pub rank: usize,
    pub chart: &'a Chart,
    pub song: &'a Song,
    pub clear: Option<ClearRank>,
    pub note: Option<NoteResult>,
    pub score: ScoreResult,
}

/// Best-N view over a profile's results.
#[derive(Debug, Clone)]
pub struct BestN<'a> {
    /// Every resolvable result, best potential first.
    pub ranked: Vec<BestResultItem<'a>>,
    /// Chart ids that were not found in the catalog.
    pub skipped: Vec<String>,
    /// Rating if the recent 10 matched the top 10 of the best 30.
    pub max_potential: f64,
    /// Rating contributed by the best 30 alone.
    pub min_potential: f64,
    pub top30_average: Option<f64>,
}

impl<'a> BestN<'a> {
    /// Rank `results` by potential. Ties keep their input order.
    /// Results whose chart is unknown are skipped, not fatal.
    pub fn compute<C>(results: &[PlayResult], catalog: &'a C) -> Self
    where
        C: ChartCatalog + ?Sized,
    {
        let mut ranked = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();

        for result in results {
            let Some(entry) = catalog.lookup(result.chart_id()) else {
                log::warn!("Skipping result for unknown chart {}", result.chart_id());
                skipped.push(result.chart_id().to_string());
                continue;
            };
            let score = compute_play_score(result, entry.chart);
            ranked.push(BestResultItem {
                rank: 0,
                chart: entry.chart,
                song: entry.song,
                clear: result.clear(),
                note: result.note_result().copied(),
                score: compute_score_result(score, entry.chart),
            });
        }

        // sort_by is stable, so equal potentials stay in input order
        ranked.sort_by(|a, b| b.score.potential.total_cmp(&a.score.potential));
        for (i, item) in ranked.iter_mut().enumerate() {
            item.rank = i + 1;
        }

        let best: Vec<f64> = ranked
            .iter()
            .take(BEST_COUNT)
            .map(|item| item.score.potential)
            .collect();
        let best_sum: f64 = best.iter().sum();
        let top_sum: f64 = best.iter().take(TOP_COUNT).sum();
        let top30_average = if best.is_empty() {
            None
        } else {
            Some(best_sum / best.len() as f64)
        };

        log::debug!(
            "Ranked {} results ({} skipped), best 30 sum {:.4}",
            ranked.len(),
            skipped.len(),
            best_sum
        );

        Self {
            ranked,
            skipped,
            max_potential: (top_sum + best_sum) / RATING_DIVISOR,
            min_potential: best_sum / RATING_DIVISOR,
            top30_average,
        }
    }

    pub fn top30(&self) -> &[BestResultItem<'a>] {
        &self.ranked[..self.ranked.len().min(BEST_COUNT)]
    }

    /// Ranks 31 to 39, possibly empty.
    pub fn ranks_31_to_39(&self) -> &[BestResultItem<'a>] {
        let start = self.ranked.len().min(BEST_COUNT);
        let end = self.ranked.len().min(OVERFLOW_END);
        &self.ranked[start..end]
    }

    fn top30_sum(&self) -> f64 {
        self.top30().iter().map(|item| item.score.potential).sum()
    }

    /// Average potential of the recent 10, back-solved from the reported
    /// overall `rating`. With fewer than 10 results the average is taken over
    /// the results that exist. `None` when there are no results.
    pub fn recent_average(&self, rating: f64) -> Option<f64> {
        let count = self.ranked.len().min(RECENT_COUNT);
        if count == 0 {
            return None;
        }
        Some((rating * RATING_DIVISOR - self.top30_sum()) / count as f64)
    }
}
