pub struct LadderSettings {
    /// A side score equal to this counts as a bagel on the leaderboard.
    pub bagel_score: i32,
    /// Minimum entries on the most-points-in-a-week board before the scan stops.
    pub most_points_top_n: usize,
    pub min_rank: u8,
    pub max_rank: u8,
}

impl Default for LadderSettings {
    fn default() -> Self {
        Self {
            bagel_score: 5,
            most_points_top_n: 10,
            min_rank: 1,
            max_rank: 8,
        }
    }
}

pub struct StorageSettings {
    pub snapshot_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            snapshot_path: std::env::var("LADDER_SNAPSHOT_PATH")
                .unwrap_or_else(|_| "ladder.json".to_string()),
        }
    }
}

pub struct AppConfig {
    pub ladder: LadderSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            ladder: LadderSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

// Passed explicitly into services rather than read from globals, so tests
// can tighten or relax thresholds per case.
