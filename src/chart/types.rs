use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Past,
    Present,
    Future,
    Beyond,
}

impl Difficulty {
    /// Numeric difficulty slot used by exported score databases (0 = Past).
    pub fn index(self) -> u8 {
        match self {
            Difficulty::Past => 0,
            Difficulty::Present => 1,
            Difficulty::Future => 2,
            Difficulty::Beyond => 3,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Difficulty::Past => "PST",
            Difficulty::Present => "PRS",
            Difficulty::Future => "FTR",
            Difficulty::Beyond => "BYD",
        }
    }
}

/// Alternate name and cover for a Beyond chart that is effectively its own song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeyondOverride {
    pub name: String,
    pub cover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub id: String,
    pub song_id: String,
    pub difficulty: Difficulty,
    pub constant: f64, // e.g. 9.8, 10.7
    pub note: u32,     // total judgeable notes
    pub level: String, // display only: "9+", "10"
    #[serde(default)]
    pub byd: Option<BeyondOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cover: String,
    pub charts: Vec<Chart>,
}

impl Song {
    /// Display name for one of this song's charts, honouring the Beyond override.
    pub fn display_name<'a>(&'a self, chart: &'a Chart) -> &'a str {
        chart
            .byd
            .as_ref()
            .map(|b| b.name.as_str())
            .unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_index() {
        assert_eq!(Difficulty::Past.index(), 0);
        assert_eq!(Difficulty::Present.index(), 1);
        assert_eq!(Difficulty::Future.index(), 2);
        assert_eq!(Difficulty::Beyond.index(), 3);
    }

    #[test]
    fn test_display_name_uses_beyond_override() {
        let byd = Chart {
            id: "song-3".to_string(),
            song_id: "song".to_string(),
            difficulty: Difficulty::Beyond,
            constant: 11.0,
            note: 1500,
            level: "11".to_string(),
            byd: Some(BeyondOverride {
                name: "Song (Beyond)".to_string(),
                cover: "byd.jpg".to_string(),
            }),
        };
        let mut ftr = byd.clone();
        ftr.byd = None;
        let song = Song {
            id: "song".to_string(),
            name: "Song".to_string(),
            cover: "base.jpg".to_string(),
            charts: vec![ftr.clone(), byd.clone()],
        };
        assert_eq!(song.display_name(&byd), "Song (Beyond)");
        assert_eq!(song.display_name(&ftr), "Song");
    }

    #[test]
    fn test_chart_parse_without_byd() {
        let json = r#"{
            "id": "grievous-2",
            "song_id": "grievous",
            "difficulty": "Future",
            "constant": 11.0,
            "note": 1450,
            "level": "11"
        }"#;
        let chart: Chart = serde_json::from_str(json).unwrap();
        assert_eq!(chart.difficulty, Difficulty::Future);
        assert!(chart.byd.is_none());
    }
}
