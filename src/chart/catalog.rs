use super::types::{Chart, Song};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// A chart together with the song that owns it.
#[derive(Debug, Clone, Copy)]
pub struct ChartEntry<'a> {
    pub chart: &'a Chart,
    pub song: &'a Song,
}

/// Read-only keyed access to chart reference data.
pub trait ChartCatalog {
    fn lookup(&self, chart_id: &str) -> Option<ChartEntry<'_>>;
}

/// Lowest and highest published chart constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantBounds {
    pub minimum: f64,
    pub maximum: f64,
}

impl ConstantBounds {
    /// Best potential a single play can reach: a full-accuracy play on the hardest chart.
    pub fn max_single_potential(&self) -> f64 {
        self.maximum + 2.0
    }
}

/// Song list loaded from the chart data JSON file, indexed by chart id.
#[derive(Debug, Clone, Default)]
pub struct SongCatalog {
    songs: Vec<Song>,
    index: HashMap<String, (usize, usize)>, // chart id -> (song idx, chart idx)
}

impl SongCatalog {
    /// Index `songs` by chart id. Fails if a chart has no notes.
    pub fn from_songs(songs: Vec<Song>) -> Result<Self> {
        if let Some(chart) = songs.iter().flat_map(|s| s.charts.iter()).find(|c| c.note == 0) {
            bail!("Chart {} has no notes", chart.id);
        }
        let mut index = HashMap::new();
        for (si, song) in songs.iter().enumerate() {
            for (ci, chart) in song.charts.iter().enumerate() {
                index.insert(chart.id.clone(), (si, ci));
            }
        }
        Ok(Self { songs, index })
    }

    /// Load the catalog from a JSON array of songs.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open chart catalog at {}", path.display()))?;
        let songs: Vec<Song> = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse chart catalog in {}", path.display()))?;
        log::debug!("Loaded {} songs from {}", songs.len(), path.display());
        Self::from_songs(songs)
            .with_context(|| format!("Invalid chart catalog in {}", path.display()))
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Case-insensitive search over song names and chart ids.
    /// Results are ordered by constant, hardest first.
    pub fn search(&self, query: &str) -> Vec<ChartEntry<'_>> {
        let needle = query.trim().to_lowercase();
        let mut found: Vec<ChartEntry<'_>> = self
            .songs
            .iter()
            .flat_map(|song| song.charts.iter().map(move |chart| ChartEntry { chart, song }))
            .filter(|entry| {
                entry.chart.id.to_lowercase() == needle
                    || entry.song.display_name(entry.chart).to_lowercase().contains(&needle)
            })
            .collect();
        found.sort_by(|a, b| b.chart.constant.total_cmp(&a.chart.constant));
        found
    }

    /// Constant range over every chart. `None` for an empty catalog.
    pub fn constant_bounds(&self) -> Option<ConstantBounds> {
        let mut charts = self.songs.iter().flat_map(|s| s.charts.iter());
        let first = charts.next()?.constant;
        let (minimum, maximum) = charts.fold((first, first), |(lo, hi), c| {
            (lo.min(c.constant), hi.max(c.constant))
        });
        Some(ConstantBounds { minimum, maximum })
    }
}

impl ChartCatalog for SongCatalog {
    fn lookup(&self, chart_id: &str) -> Option<ChartEntry<'_>> {
        let &(si, ci) = self.index.get(chart_id)?;
        let song = &self.songs[si];
        Some(ChartEntry {
            chart: &song.charts[ci],
            song,
        })
    }
}
