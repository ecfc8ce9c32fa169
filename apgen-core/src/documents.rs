//! JSON documents written into the package.
//!
//! * `<short>.data.json` is read by the generated Python world.
//! * `<short>.game.json` is read by the game client (APDoom).
//! * `archipelago.json` is the package manifest.

use chrono::{DateTime, Local};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::catalog::{Catalog, Level};
use crate::config::GameConfig;
use crate::level::LevelIndex;
use crate::regions::RegionDoc;
use crate::Result;

pub const MANIFEST_VERSION: i64 = 7;
pub const WORLD_VERSION_PREFIX: &str = "2.0.";

fn exmx(idx: LevelIndex) -> Value {
    json!(idx.exmx())
}

/// The document the Python world loads at import time.
pub fn data_document(
    game: &GameConfig,
    levels: &[Level<'_>],
    catalog: &Catalog,
    regions: &[RegionDoc],
) -> Result<Value> {
    let level_names: HashMap<LevelIndex, &str> = levels.iter().map(|l| (l.index, l.name.as_str())).collect();

    let mut item_table = Map::new();
    for item in &catalog.items {
        let mut data = Map::new();
        data.insert("_name".into(), json!(item.name));
        data.insert("classification".into(), json!(item.classification.bits()));
        data.insert("doom_type".into(), json!(item.kind.code()));
        if item.count > 0 {
            data.insert("count".into(), json!(item.count));
        }
        if let Some(idx) = item.level {
            data.insert("exmx".into(), exmx(idx));
        }
        item_table.insert(item.id.to_string(), Value::Object(data));
    }

    let item_name_groups: Map<String, Value> = catalog
        .item_name_groups
        .iter()
        .map(|(group, names)| (group.clone(), json!(names)))
        .collect();

    let mut location_table = Map::new();
    let mut location_groups: Map<String, Value> = Map::new();
    let mut death_logic = Vec::new();
    for loc in &catalog.locations {
        let mut data = Map::new();
        data.insert("_name".into(), json!(loc.name));
        data.insert("doom_type".into(), json!(loc.kind.code()));
        data.insert("exmx".into(), exmx(loc.level));
        data.insert("region".into(), json!(loc.region_name.as_deref().unwrap_or_default()));
        if game.settings.check_sanity && loc.check_sanity {
            data.insert("check_sanity".into(), json!(true));
        }
        location_table.insert(loc.id.to_string(), Value::Object(data));

        let level_name = level_names.get(&loc.level).copied().unwrap_or_default();
        if let Value::Array(names) = location_groups
            .entry(level_name.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            names.push(json!(loc.name));
        }

        if loc.death_logic {
            death_logic.push(json!(loc.name));
        }
    }

    let mut starting_levels = Map::new();
    for (ep, episode) in game.episodes.iter().enumerate() {
        let Some(start) = episode.starting_level() else {
            continue;
        };
        let found = usize::try_from(start - 1)
            .ok()
            .and_then(|map| level_names.get(&LevelIndex::new(ep, map)));
        if let Some(name) = found {
            starting_levels.insert((ep + 1).to_string(), json!(name));
        }
    }

    let mut doc = Map::new();
    doc.insert("regions".into(), serde_json::to_value(regions)?);
    doc.insert("item_table".into(), Value::Object(item_table));
    doc.insert("item_name_groups".into(), Value::Object(item_name_groups));
    doc.insert("location_table".into(), Value::Object(location_table));
    doc.insert("location_name_groups".into(), Value::Object(location_groups));
    doc.insert("death_logic_excluded_locations".into(), Value::Array(death_logic));
    doc.insert("starting_levels_by_episode".into(), Value::Object(starting_levels));

    let pool_ratio = &game.world_info.custom_pool_ratio;
    if !pool_ratio.is_empty() {
        let ratios: Map<String, Value> = pool_ratio
            .iter()
            .map(|(difficulty, ratio)| (difficulty.to_string(), json!([ratio.helpful, ratio.random])))
            .collect();
        doc.insert("custom_pool_ratio".into(), Value::Object(ratios));
    }
    let weights = &game.world_info.filler_item_weight;
    if !weights.is_empty() {
        doc.insert("filler_item_weight".into(), json!(weights));
    }

    Ok(Value::Object(doc))
}

/// Leading decimal digits of `s`, as C's `atoi` would read them.
fn leading_number(s: &str) -> i64 {
    let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// `[episode, map]` as the engine numbers them: `E2M4` -> `[2, 4]`, `MAP07` -> `[1, 7]`.
pub fn game_map(lump_name: &str) -> [i64; 2] {
    let map = leading_number(lump_name.get(3..).unwrap_or_default());
    if lump_name.starts_with("MAP") {
        return [1, map];
    }
    let episode = lump_name
        .as_bytes()
        .get(1)
        .map(|b| *b as i64 - b'0' as i64)
        .unwrap_or(0);
    [episode, map]
}

/// Game definitions for the client: which thing is which location, item
/// lookups, per-level key info and passthrough blocks.
pub fn game_definitions(game: &GameConfig, levels: &[Level<'_>], catalog: &Catalog) -> Value {
    // episode -> map -> thing index ("-1" for the exit) -> location id
    let mut location_table: BTreeMap<String, BTreeMap<String, BTreeMap<String, i64>>> = BTreeMap::new();
    let mut thing_locations: HashMap<(LevelIndex, usize), i64> = HashMap::new();
    for loc in &catalog.locations {
        let [ep, map] = loc.level.exmx();
        let thing = loc
            .thing_index
            .map(|i| i.to_string())
            .unwrap_or_else(|| "-1".to_string());
        location_table
            .entry(ep.to_string())
            .or_default()
            .entry(map.to_string())
            .or_default()
            .insert(thing, loc.id);

        if let Some(idx) = loc.thing_index {
            thing_locations.insert((loc.level, idx), loc.id);
        }
    }

    let mut item_table = Map::new();
    for item in &catalog.items {
        let mut row = vec![json!(item.name), json!(item.kind.code())];
        if let Some(idx) = item.level {
            let [ep, map] = idx.exmx();
            row.push(json!(ep));
            row.push(json!(map));
        }
        item_table.insert(item.id.to_string(), Value::Array(row));
    }

    let mut level_info: Vec<Vec<Value>> = game.episodes.iter().map(|_| Vec::new()).collect();
    for level in levels {
        let keys = catalog.keys_for(level.index);
        let thing_list: Vec<Value> = level
            .data
            .map
            .things
            .iter()
            .enumerate()
            .map(|(i, thing)| match thing_locations.get(&(level.index, i)) {
                Some(id) => json!([thing.doom_type, id]),
                None => json!(thing.doom_type),
            })
            .collect();

        if let Some(episode) = level_info.get_mut(level.index.episode) {
            episode.push(json!({
                "_name": level.name,
                "key": keys.present,
                "use_skull": keys.use_skull,
                "game_map": game_map(&level.lump_name),
                "thing_list": thing_list,
            }));
        }
    }

    let mut type_sprites = Map::new();
    for def in game.catalog_items().chain(game.keys.iter().map(|k| &k.item)) {
        type_sprites.insert(def.doom_type.to_string(), json!(def.sprite));
    }

    let location_types: Vec<i32> = game.location_doom_types.keys().copied().collect();

    let mut defs = Map::new();
    defs.insert("location_table".into(), json!(location_table));
    defs.insert("item_table".into(), Value::Object(item_table));
    defs.insert("level_info".into(), json!(level_info));
    defs.insert("type_sprites".into(), Value::Object(type_sprites));
    defs.insert("ap_location_types".into(), json!(location_types));

    let passthroughs = [
        ("game_info", &game.game_info),
        ("map_tweaks", &game.map_tweaks),
        ("level_select", &game.level_select),
        ("rename_lumps", &game.rename_lumps),
    ];
    for (key, block) in passthroughs {
        if let Some(value) = block {
            defs.insert(key.into(), value.clone());
        }
    }

    Value::Object(defs)
}

/// What the launcher needs to know about the game; embedded in the manifest.
pub fn launcher_info(game: &GameConfig, wads_included: &[String], definitions_path: &str) -> Value {
    let mut info = Map::new();
    info.insert("short_name".into(), json!(game.short_name));
    info.insert("iwad".into(), json!(game.iwad_name));
    if game.full_name() != game.ap_name {
        info.insert("full_name".into(), json!(game.full_name()));
    }
    if !game.required_wads.is_empty() {
        info.insert("wads_required".into(), json!(game.required_wads));
    }
    if !game.optional_wads.is_empty() {
        info.insert("wads_optional".into(), json!(game.optional_wads));
    }
    if !wads_included.is_empty() {
        info.insert("wads_included".into(), json!(wads_included));
    }
    info.insert("definitions".into(), json!(definitions_path));
    Value::Object(info)
}

pub fn world_version(now: DateTime<Local>) -> String {
    format!("{WORLD_VERSION_PREFIX}{}", now.format("%Y%m%d"))
}

/// `archipelago.json`. Only archives carry the manifest version fields.
pub fn manifest(game: &GameConfig, launcher: Value, include_version: bool, now: DateTime<Local>) -> Value {
    let mut doc = Map::new();
    if include_version {
        doc.insert("version".into(), json!(MANIFEST_VERSION));
        doc.insert("compatible_version".into(), json!(MANIFEST_VERSION));
    }
    doc.insert("game".into(), json!(game.ap_name));
    doc.insert("world_version".into(), json!(world_version(now)));
    doc.insert("__apdoom".into(), launcher);
    Value::Object(doc)
}
