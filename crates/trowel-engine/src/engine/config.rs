use serde::{Deserialize, Serialize};

use crate::{
    CountdownConfig, GRID_SIZE, NarrativeConfig, PreferenceConfig, ResourceConfig, ShakeConfig,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: GRID_SIZE,
            height: GRID_SIZE,
        }
    }
}

/// Every tunable of a game, loadable from a partial JSON document.
///
/// # Example
///
/// ```
/// use trowel_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{"resources": {"base_stake": 800}}"#).unwrap();
/// assert_eq!(config.resources.base_stake, 800.0);
/// assert_eq!(config.resources.base_threshold, 10.0);
/// assert_eq!(config.grid.width, 10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub resources: ResourceConfig,
    pub preferences: PreferenceConfig,
    pub countdown: CountdownConfig,
    pub shake: ShakeConfig,
    pub narrative: NarrativeConfig,
}
