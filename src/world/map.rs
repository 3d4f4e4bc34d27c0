use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RewardType {
    Character,
    Song,
    Background,
    Item,
}

/// Reward granted on reaching a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reward {
    Character {
        id: String,
        name: String,
        #[serde(default)]
        img: String,
    },
    Song {
        id: String,
        name: String,
        #[serde(default)]
        img: String,
    },
    Background {
        name: String,
        #[serde(default)]
        img: String,
    },
    Item {
        name: String,
        count: u32,
        #[serde(default)]
        img: String,
    },
}

impl Reward {
    pub fn reward_type(&self) -> RewardType {
        match self {
            Reward::Character { .. } => RewardType::Character,
            Reward::Song { .. } => RewardType::Song,
            Reward::Background { .. } => RewardType::Background,
            Reward::Item { .. } => RewardType::Item,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Reward::Character { name, .. }
            | Reward::Song { name, .. }
            | Reward::Background { name, .. }
            | Reward::Item { name, .. } => name,
        }
    }

    /// Partners and songs are the rewards worth walking towards.
    pub fn is_milestone(&self) -> bool {
        matches!(self, Reward::Character { .. } | Reward::Song { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Steps needed to cross this platform.
    pub length: f64,
    #[serde(default)]
    pub reward: Option<Reward>,
}

/// A sequence of platforms. Level `n` is `platforms[n - 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldMap {
    pub id: String,
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter: String,
    pub maps: Vec<WorldMap>,
}

/// Where the player stands: a level and the distance still left on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentProgress {
    pub level: usize,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NextReward {
    pub level: usize,
    pub reward: Reward,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemainingProgress {
    pub next_reward: Option<NextReward>,
    pub total: f64,
}

impl WorldMap {
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn platform(&self, level: usize) -> Result<&Platform> {
        level
            .checked_sub(1)
            .and_then(|i| self.platforms.get(i))
            .ok_or_else(|| {
                anyhow!(
                    "Level {} is outside map {} (1-{})",
                    level,
                    self.id,
                    self.platforms.len()
                )
            })
    }
}

/// Distance from the current position to the start of `target_level`, or to
/// its end when `inclusive` is set.
pub fn compute_distance(
    map: &WorldMap,
    current: &CurrentProgress,
    target_level: usize,
    inclusive: bool,
) -> Result<f64> {
    map.platform(current.level)?;
    if target_level < current.level {
        bail!(
            "Level {} is behind the current level {} on map {}",
            target_level,
            current.level,
            map.id
        );
    }
    let mut distance = 0.0;
    for level in current.level..=target_level {
        if !inclusive && level == target_level {
            break;
        }
        distance += if level == current.level {
            current.progress
        } else {
            map.platform(level)?.length
        };
    }
    Ok(distance)
}

/// Progress range `[min, max]` that ends a play on `target_level`.
///
/// Both ends are pulled 0.1 inside the platform so the landing point is
/// strictly on it rather than on its edges. A platform too short for that
/// collapses to its midpoint.
pub fn compute_progress_range(
    map: &WorldMap,
    current: &CurrentProgress,
    target_level: usize,
) -> Result<(f64, f64)> {
    let enter = compute_distance(map, current, target_level, false)?;
    let leave = compute_distance(map, current, target_level, true)?;
    let mut min = enter;
    let mut max = leave;
    if min != 0.0 {
        min += 0.1;
    }
    if max != 0.0 {
        max -= 0.1;
    }
    if min > max {
        let mid = (enter + leave) / 2.0;
        min = mid;
        max = mid;
    }
    Ok((min.max(0.0), max.max(0.0)))
}

/// Distance to the next partner/song reward and to the end of the map.
pub fn compute_remaining_progress(
    map: &WorldMap,
    current: &CurrentProgress,
) -> Result<RemainingProgress> {
    let milestone = (current.level..=map.len())
        .filter_map(|level| {
            let platform = map.platforms.get(level.checked_sub(1)?)?;
            platform.reward.as_ref().map(|reward| (level, reward))
        })
        .find(|(_, reward)| reward.is_milestone());

    let next_reward = match milestone {
        Some((level, reward)) => Some(NextReward {
            level,
            reward: reward.clone(),
            remaining: compute_distance(map, current, level, false)?,
        }),
        None => None,
    };
    let total = compute_distance(map, current, map.len(), true)?;
    Ok(RemainingProgress { next_reward, total })
}

/// Reward names grouped by type, in platform order.
pub fn map_rewards(map: &WorldMap) -> BTreeMap<RewardType, Vec<String>> {
    let mut rewards: BTreeMap<RewardType, Vec<String>> = BTreeMap::new();
    for reward in map.platforms.iter().filter_map(|p| p.reward.as_ref()) {
        rewards
            .entry(reward.reward_type())
            .or_default()
            .push(reward.name().to_string());
    }
    rewards
}

/// Either chaptered story maps or a flat list of event maps.
#[derive(Deserialize)]
#[serde(untagged)]
enum MapFile {
    Chapters(Vec<Chapter>),
    Events(Vec<WorldMap>),
}

/// Chapter name given to maps loaded from a flat list.
pub const EVENT_CHAPTER: &str = "Event";

/// Load world maps from a JSON file, as chapters or as a flat map list.
pub fn load_maps(path: &Path) -> Result<Vec<Chapter>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open world map data at {}", path.display()))?;
    let parsed: MapFile = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse world map data in {}", path.display()))?;
    let chapters = match parsed {
        MapFile::Chapters(chapters) => chapters,
        MapFile::Events(maps) => vec![Chapter {
            chapter: EVENT_CHAPTER.to_string(),
            maps,
        }],
    };
    for map in chapters.iter().flat_map(|c| c.maps.iter()) {
        if let Some(level) = map.platforms.iter().position(|p| p.length < 0.0) {
            bail!("Map {} has a negative length at level {}", map.id, level + 1);
        }
    }
    Ok(chapters)
}

pub fn find_map<'a>(chapters: &'a [Chapter], id: &str) -> Option<&'a WorldMap> {
    chapters
        .iter()
        .flat_map(|c| c.maps.iter())
        .find(|m| m.id == id)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_map() -> WorldMap {
        WorldMap {
            id: "test-map".to_string(),
            platforms: vec![
                Platform {
                    length: 10.0,
                    reward: None,
                },
                Platform {
                    length: 20.0,
                    reward: Some(Reward::Item {
                        name: "Fragment".to_string(),
                        count: 100,
                        img: String::new(),
                    }),
                },
                Platform {
                    length: 30.0,
                    reward: Some(Reward::Song {
                        id: "alpha".to_string(),
                        name: "Alpha".to_string(),
                        img: String::new(),
                    }),
                },
                Platform {
                    length: 40.0,
                    reward: None,
                },
                Platform {
                    length: 0.0,
                    reward: Some(Reward::Character {
                        id: "7".to_string(),
                        name: "Partner".to_string(),
                        img: String::new(),
                    }),
                },
            ],
        }
    }

    fn at(level: usize, progress: f64) -> CurrentProgress {
        CurrentProgress { level, progress }
    }

    #[test]
    fn test_distance_exclusive_and_inclusive() {
        let map = sample_map();
        let current = at(1, 4.0);
        // 4 left on level 1, then level 2
        assert_eq!(compute_distance(&map, &current, 3, false).unwrap(), 24.0);
        assert_eq!(compute_distance(&map, &current, 3, true).unwrap(), 54.0);
    }

    #[test]
    fn test_distance_to_current_level() {
        let map = sample_map();
        let current = at(2, 7.5);
        assert_eq!(compute_distance(&map, &current, 2, false).unwrap(), 0.0);
        assert_eq!(compute_distance(&map, &current, 2, true).unwrap(), 7.5);
    }

    #[test]
    fn test_distance_out_of_range_errors() {
        let map = sample_map();
        assert!(compute_distance(&map, &at(1, 1.0), 9, true).is_err());
        assert!(compute_distance(&map, &at(0, 1.0), 2, true).is_err());
    }

    #[test]
    fn test_progress_range_is_nudged_inside() {
        let map = sample_map();
        let (min, max) = compute_progress_range(&map, &at(1, 4.0), 3).unwrap();
        assert!((min - 24.1).abs() < 1e-9);
        assert!((max - 53.9).abs() < 1e-9);
    }

    #[test]
    fn test_progress_range_zero_distance_not_nudged() {
        let map = sample_map();
        let (min, max) = compute_progress_range(&map, &at(2, 5.0), 2).unwrap();
        assert_eq!(min, 0.0);
        assert!((max - 4.9).abs() < 1e-9);
    }

    #[test]
    fn test_progress_range_short_current_level_collapses() {
        let map = sample_map();
        let (min, max) = compute_progress_range(&map, &at(2, 0.05), 2).unwrap();
        assert!((min - 0.025).abs() < 1e-9);
        assert_eq!(min, max);
    }

    #[test]
    fn test_progress_range_short_platform_not_inverted() {
        let mut map = sample_map();
        map.platforms[2].length = 0.15;
        let (min, max) = compute_progress_range(&map, &at(1, 4.0), 3).unwrap();
        assert!(min <= max);
        assert!((min - 24.075).abs() < 1e-9);
    }

    #[test]
    fn test_progress_range_zero_length_platform() {
        let map = sample_map();
        // level 5 has no length: enter and leave at 94
        let (min, max) = compute_progress_range(&map, &at(1, 4.0), 5).unwrap();
        assert!((min - 94.0).abs() < 1e-9);
        assert_eq!(min, max);
    }

    #[test]
    fn test_distance_to_earlier_level_errors() {
        let map = sample_map();
        let err = compute_distance(&map, &at(3, 4.0), 1, false).unwrap_err();
        assert!(err.to_string().contains("behind the current level"));
        assert!(compute_progress_range(&map, &at(3, 4.0), 1).is_err());
    }

    #[test]
    fn test_remaining_progress_finds_milestone() {
        let map = sample_map();
        let remaining = compute_remaining_progress(&map, &at(1, 4.0)).unwrap();
        let next = remaining.next_reward.unwrap();
        assert_eq!(next.level, 3);
        assert_eq!(next.reward.name(), "Alpha");
        assert_eq!(next.remaining, 24.0);
        assert_eq!(remaining.total, 94.0);
    }

    #[test]
    fn test_remaining_progress_past_last_milestone() {
        let mut map = sample_map();
        map.platforms[4].reward = None;
        let remaining = compute_remaining_progress(&map, &at(4, 12.0)).unwrap();
        assert!(remaining.next_reward.is_none());
        assert_eq!(remaining.total, 12.0);
    }

    #[test]
    fn test_map_rewards_grouped() {
        let rewards = map_rewards(&sample_map());
        assert_eq!(rewards[&RewardType::Song], vec!["Alpha".to_string()]);
        assert_eq!(rewards[&RewardType::Character], vec!["Partner".to_string()]);
        assert_eq!(rewards[&RewardType::Item], vec!["Fragment".to_string()]);
        assert!(!rewards.contains_key(&RewardType::Background));
    }

    #[test]
    fn test_load_maps_and_find() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps.json");
        let chapters = vec![Chapter {
            chapter: "Chapter 1".to_string(),
            maps: vec![sample_map()],
        }];
        std::fs::write(&path, serde_json::to_string(&chapters).unwrap()).unwrap();

        let loaded = load_maps(&path).unwrap();
        let map = find_map(&loaded, "test-map").unwrap();
        assert_eq!(map.len(), 5);
        assert!(find_map(&loaded, "missing").is_none());
    }

    #[test]
    fn test_load_flat_event_maps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, serde_json::to_string(&vec![sample_map()]).unwrap()).unwrap();

        let loaded = load_maps(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].chapter, EVENT_CHAPTER);
        assert!(find_map(&loaded, "test-map").is_some());
    }

    #[test]
    fn test_load_rejects_negative_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps.json");
        let mut map = sample_map();
        map.platforms[1].length = -1.0;
        std::fs::write(&path, serde_json::to_string(&vec![map]).unwrap()).unwrap();
        assert!(load_maps(&path).is_err());
    }
}
