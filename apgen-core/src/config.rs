//! Game configuration as handed to the generator.
//!
//! Loading and validating the per-game JSON definition belongs to the host
//! application; these types only describe the fully-populated result. They
//! derive `Deserialize` so the CLI (and tests) can build one from JSON.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

pub const HERETIC_IWAD: &str = "HERETIC.WAD";

fn default_ap_name() -> String {
    "Unnamed id1 Game".to_string()
}

fn default_world_name() -> String {
    "id1_game".to_string()
}

fn default_class_name() -> String {
    "id1Game".to_string()
}

fn default_true() -> bool {
    true
}

fn default_one() -> i64 {
    1
}

/// Accepts either a single string or an array of strings.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemDef {
    pub doom_type: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sprite: String,
    #[serde(default = "default_one")]
    pub count: i64,
    #[serde(default, rename = "group", deserialize_with = "one_or_many")]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyDef {
    #[serde(flatten)]
    pub item: ItemDef,
    /// Key slot (0..=2) as displayed by the game.
    pub key: usize,
    #[serde(default)]
    pub use_skull: bool,
    #[serde(default)]
    pub region_name: String,
    #[serde(default)]
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub lump: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub minor: bool,
    #[serde(default = "default_true", rename = "default")]
    pub default_enabled: bool,
    #[serde(default = "default_one")]
    pub start_level: i64,
    /// Defaults to the last map of the episode.
    #[serde(default)]
    pub boss_level: Option<i64>,
    #[serde(default)]
    pub maps: Vec<LevelDef>,
}

impl EpisodeInfo {
    pub fn display_name(&self, ep: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Episode {}", ep + 1))
    }

    /// One-based starting map, only meaningful for major episodes.
    pub fn starting_level(&self) -> Option<i64> {
        (!self.minor).then_some(self.start_level)
    }

    pub fn boss_level(&self) -> Option<i64> {
        if self.minor {
            return None;
        }
        Some(self.boss_level.unwrap_or(self.maps.len() as i64))
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub check_sanity: bool,
    #[serde(default)]
    pub extended_names: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct PoolRatio {
    #[serde(default)]
    pub helpful: i64,
    #[serde(default)]
    pub random: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorldInfo {
    #[serde(default, deserialize_with = "one_or_many")]
    pub description: Vec<String>,
    /// Kept as raw JSON; order is the plugin declaration order.
    #[serde(default)]
    pub world_options: Vec<Value>,
    #[serde(default)]
    pub hooks: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub filler_item_weight: BTreeMap<String, i64>,
    #[serde(default)]
    pub custom_pool_ratio: BTreeMap<i64, PoolRatio>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub short_name: String,
    #[serde(rename = "iwad")]
    pub iwad_name: String,
    #[serde(default = "default_ap_name")]
    pub ap_name: String,
    #[serde(default = "default_world_name")]
    pub ap_world_name: String,
    #[serde(default = "default_class_name")]
    pub ap_class_name: String,
    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub required_wads: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub optional_wads: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub included_wads: Vec<String>,

    #[serde(default)]
    pub settings: Settings,
    pub episodes: Vec<EpisodeInfo>,

    #[serde(default)]
    pub location_doom_types: BTreeMap<i32, String>,
    #[serde(default)]
    pub extra_connection_requirements: Vec<ItemDef>,
    #[serde(default)]
    pub progression: Vec<ItemDef>,
    #[serde(default)]
    pub useful: Vec<ItemDef>,
    #[serde(default)]
    pub filler: Vec<ItemDef>,
    #[serde(default)]
    pub unique_progression: Vec<ItemDef>,
    #[serde(default)]
    pub unique_useful: Vec<ItemDef>,
    #[serde(default)]
    pub unique_filler: Vec<ItemDef>,
    #[serde(default)]
    pub keys: Vec<KeyDef>,

    #[serde(default)]
    pub world_info: WorldInfo,

    #[serde(default)]
    pub game_info: Option<Value>,
    #[serde(default)]
    pub map_tweaks: Option<Value>,
    #[serde(default)]
    pub level_select: Option<Value>,
    #[serde(default)]
    pub rename_lumps: Option<Value>,

    #[serde(default, rename = "loc_remap")]
    pub location_remap: BTreeMap<String, i64>,
    #[serde(default)]
    pub item_remap: BTreeMap<String, i64>,
}

impl GameConfig {
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn full_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.ap_name)
    }

    pub fn is_heretic(&self) -> bool {
        self.iwad_name == HERETIC_IWAD
    }

    /// Docstring for the generated world class.
    pub fn description(&self) -> Vec<String> {
        if self.world_info.description.is_empty() {
            return vec![format!(
                "{} is a game playable with APDoom version 2.0.0.",
                self.ap_name
            )];
        }
        self.world_info.description.clone()
    }

    pub fn level_count(&self) -> usize {
        self.episodes.iter().map(|ep| ep.maps.len()).sum()
    }

    /// Every item definition a connection rule may name, in lookup order.
    pub fn item_requirements(&self) -> impl Iterator<Item = &ItemDef> {
        self.extra_connection_requirements
            .iter()
            .chain(self.progression.iter())
            .chain(self.unique_progression.iter())
            .chain(self.keys.iter().map(|k| &k.item))
    }

    /// All catalog templates (not keys), in name-lookup order.
    pub fn catalog_items(&self) -> impl Iterator<Item = &ItemDef> {
        self.progression
            .iter()
            .chain(self.useful.iter())
            .chain(self.filler.iter())
            .chain(self.unique_progression.iter())
            .chain(self.unique_useful.iter())
            .chain(self.unique_filler.iter())
    }

    pub fn item_name(&self, doom_type: i32) -> &str {
        self.catalog_items()
            .find(|def| def.doom_type == doom_type)
            .map(|def| def.name.as_str())
            .unwrap_or("(no item)")
    }

    pub fn key_for_type(&self, doom_type: i32) -> Option<&KeyDef> {
        self.keys.iter().find(|k| k.item.doom_type == doom_type)
    }

    pub fn game_info_field(&self, field: &str) -> Option<&Value> {
        self.game_info.as_ref().and_then(|info| info.get(field))
    }
}
