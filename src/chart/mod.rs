pub mod catalog;
pub mod types;

pub use catalog::{ChartCatalog, ChartEntry, ConstantBounds, SongCatalog};
pub use types::{BeyondOverride, Chart, Difficulty, Song};
