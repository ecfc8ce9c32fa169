//! Item and location catalogs.
//!
//! Walks every level's placed things and emits the items and locations the
//! randomizer will shuffle, then the per-level unlock/complete items and the
//! level-scoped copies of the game's unique item templates.

use bitflags::bitflags;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::{GameConfig, ItemDef, KeyDef};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ids::{self, LocationSequence, Remappable};
use crate::level::{GameLevels, LevelData, LevelIndex, MapThing};
use crate::regions::{entrance_region_name, region_name};
use crate::{GenError, Result};

pub const MAP_GROUP_MARKER: &str = "%MAP%";
pub const JUNK_GROUP: &str = "Junk";

bitflags! {
    /// How the randomizer treats an item. No bits set means filler.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Classification: u8 {
        const PROGRESSION = 0b00001;
        const USEFUL = 0b00010;
        const TRAP = 0b00100;
        const SKIP_BALANCING = 0b01000;
        const DEPRIORITIZED = 0b10000;
    }
}

impl Classification {
    pub const FILLER: Classification = Classification::empty();
}

/// What an item or location stands for in the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Type(i32),
    LevelUnlock,
    LevelComplete,
}

impl EntityKind {
    /// The code written to the output documents; pseudo types are negative.
    pub fn code(self) -> i32 {
        match self {
            EntityKind::Type(code) => code,
            EntityKind::LevelUnlock => -1,
            EntityKind::LevelComplete => -2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    /// `None` for global items.
    pub level: Option<LevelIndex>,
    pub kind: EntityKind,
    pub count: i64,
    pub is_key: bool,
    pub classification: Classification,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub level: LevelIndex,
    /// Index into the map's thing list; `None` for the level exit.
    pub thing_index: Option<usize>,
    pub kind: EntityKind,
    pub position: Option<(i32, i32)>,
    pub region_name: Option<String>,
    pub check_sanity: bool,
    pub death_logic: bool,
}

impl Remappable for Item {
    fn remap_name(&self) -> &str {
        &self.name
    }
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Remappable for Location {
    fn remap_name(&self) -> &str {
        &self.name
    }
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Key slots seen in a level.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelKeys {
    pub present: [bool; 3],
    pub use_skull: [bool; 3],
}

/// One playable map, joined with its parsed data.
#[derive(Debug)]
pub struct Level<'a> {
    pub index: LevelIndex,
    pub name: String,
    pub group_name: String,
    pub lump_name: String,
    pub data: &'a LevelData,
}

/// Usually the lump name, unless the display name carries a "(XXXX)" tag.
pub fn group_name(display_name: &str, lump_name: &str) -> String {
    match (display_name.rfind('('), display_name.rfind(')')) {
        (Some(begin), Some(end)) if end > begin => display_name[begin + 1..end].to_string(),
        _ => lump_name.to_string(),
    }
}

/// Pairs every level of the configuration with its data, in episode order.
pub fn collect_levels<'a>(game: &GameConfig, levels: &'a GameLevels) -> Result<Vec<Level<'a>>> {
    if levels.episodes.len() != game.episodes.len() {
        return Err(GenError::Config(format!(
            "level data has {} episode(s), game '{}' declares {}",
            levels.episodes.len(),
            game.short_name,
            game.episodes.len()
        )));
    }

    let mut out = Vec::with_capacity(game.level_count());
    for (ep, episode) in game.episodes.iter().enumerate() {
        if levels.episodes[ep].len() != episode.maps.len() {
            return Err(GenError::Config(format!(
                "level data for episode {} has {} map(s), expected {}",
                ep + 1,
                levels.episodes[ep].len(),
                episode.maps.len()
            )));
        }
        for (map, def) in episode.maps.iter().enumerate() {
            out.push(Level {
                index: LevelIndex::new(ep, map),
                name: def.name.clone(),
                group_name: group_name(&def.name, &def.lump),
                lump_name: def.lump.clone(),
                data: &levels.episodes[ep][map],
            });
        }
    }
    Ok(out)
}

#[derive(Debug, Default)]
pub struct Catalog {
    pub items: Vec<Item>,
    pub locations: Vec<Location>,
    pub item_name_groups: BTreeMap<String, BTreeSet<String>>,
    pub level_keys: BTreeMap<LevelIndex, LevelKeys>,
    extended_names: bool,
    taken_location_names: HashSet<String>,
}

impl Catalog {
    /// Builds the full catalog for one run. Ids are the formula ids; call
    /// [`Catalog::apply_legacy_remap`] and [`Catalog::sort_by_id`] afterwards.
    pub fn compile(game: &GameConfig, levels: &[Level<'_>], diag: &mut Diagnostics) -> Catalog {
        let mut catalog = Catalog {
            extended_names: game.settings.extended_names,
            ..Default::default()
        };

        for def in &game.progression {
            catalog.add_item(def, EntityKind::Type(def.doom_type), Classification::PROGRESSION, None);
        }
        for def in &game.useful {
            catalog.add_item(def, EntityKind::Type(def.doom_type), Classification::USEFUL, None);
        }
        for def in &game.filler {
            catalog.add_item(def, EntityKind::Type(def.doom_type), Classification::FILLER, None);
        }

        for level in levels {
            catalog.compile_level(game, level, diag);
        }

        // Level items go last so adding levels never shifts existing ids.
        let unlock = ItemDef {
            doom_type: EntityKind::LevelUnlock.code(),
            count: 1,
            groups: vec!["Levels".to_string(), MAP_GROUP_MARKER.to_string()],
            ..Default::default()
        };
        let complete = ItemDef {
            doom_type: EntityKind::LevelComplete.code(),
            name: "Complete".to_string(),
            count: 0,
            ..Default::default()
        };

        for level in levels {
            catalog.add_item(
                &unlock,
                EntityKind::LevelUnlock,
                Classification::PROGRESSION | Classification::USEFUL,
                Some(level),
            );
            catalog.add_item(&complete, EntityKind::LevelComplete, Classification::PROGRESSION, Some(level));

            for def in &game.unique_progression {
                catalog.add_item(def, EntityKind::Type(def.doom_type), Classification::PROGRESSION, Some(level));
            }
            for def in &game.unique_useful {
                catalog.add_item(def, EntityKind::Type(def.doom_type), Classification::USEFUL, Some(level));
            }
            for def in &game.unique_filler {
                catalog.add_item(def, EntityKind::Type(def.doom_type), Classification::FILLER, Some(level));
            }
        }

        tracing::debug!(
            items = catalog.items.len(),
            locations = catalog.locations.len(),
            "catalog compiled"
        );
        catalog
    }

    fn compile_level(&mut self, game: &GameConfig, level: &Level<'_>, diag: &mut Diagnostics) {
        let mut sequence = LocationSequence::new(level.index);
        let prefix = format!("{} - ", level.name);

        for (thing_index, thing) in level.data.map.things.iter().enumerate() {
            let Some(label) = game.location_doom_types.get(&(thing.doom_type as i32)) else {
                continue;
            };
            if thing.is_multiplayer_only() {
                continue;
            }

            if let Some(key_def) = game.key_for_type(thing.doom_type as i32) {
                self.add_key(key_def, level);
            }

            let seq = sequence.advance();
            self.add_location(&format!("{prefix}{label}"), thing, thing_index, seq, &sequence, level, diag);
        }

        let region_name = match level.data.rules.exit_region() {
            Some(region) => region_name(&level.name, &region.name),
            None => {
                diag.record(
                    DiagnosticKind::LevelWithoutExit,
                    format!("{} has no region that connects to the Exit.", level.name),
                );
                entrance_region_name(&level.name)
            }
        };

        let exit_name = format!("{prefix}Exit");
        self.taken_location_names.insert(exit_name.clone());
        self.locations.push(Location {
            id: ids::level_complete_location_id(level.index),
            name: exit_name,
            level: level.index,
            thing_index: None,
            kind: EntityKind::LevelComplete,
            position: None,
            region_name: Some(region_name),
            check_sanity: false,
            death_logic: false,
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn add_location(
        &mut self,
        base_name: &str,
        thing: &MapThing,
        thing_index: usize,
        seq: u32,
        sequence: &LocationSequence,
        level: &Level<'_>,
        diag: &mut Diagnostics,
    ) {
        let meta = level.data.rules.location(thing_index).cloned().unwrap_or_default();
        if meta.unreachable {
            return;
        }

        let id = match sequence.id_for(seq, base_name) {
            Ok(id) => id,
            Err(overflow) => {
                diag.record(DiagnosticKind::LocationOverflow, overflow.to_string());
                return;
            }
        };

        let name = self.unique_location_name(base_name, &meta.name);
        self.taken_location_names.insert(name.clone());
        self.locations.push(Location {
            id,
            name,
            level: level.index,
            thing_index: Some(thing_index),
            kind: EntityKind::Type(thing.doom_type as i32),
            position: Some((thing.x as i32, thing.y as i32)),
            region_name: None,
            check_sanity: meta.check_sanity,
            death_logic: meta.death_logic,
        });
    }

    /// First free name of `base`, `base 2`, `base 3`, ... With extended names
    /// the description trails the number: `base 2 (description)`.
    fn unique_location_name(&self, base: &str, description: &str) -> String {
        let extended = self.extended_names && !description.is_empty();
        let candidate = |n: usize| match (extended, n) {
            (true, 1) => format!("{base} ({description})"),
            (true, n) => format!("{base} {n} ({description})"),
            (false, 1) => base.to_string(),
            (false, n) => format!("{base} {n}"),
        };

        let mut n = 1;
        loop {
            let name = candidate(n);
            if !self.taken_location_names.contains(&name) {
                return name;
            }
            n += 1;
        }
    }

    /// Registers the level's copy of a key, once per level.
    fn add_key(&mut self, key_def: &KeyDef, level: &Level<'_>) -> i64 {
        let name = format!("{} - {}", level.name, key_def.item.name);

        let keys = self.level_keys.entry(level.index).or_default();
        if let Some(slot) = keys.present.get_mut(key_def.key) {
            *slot = true;
            keys.use_skull[key_def.key] = key_def.use_skull;
        }

        if let Some(existing) = self.items.iter().find(|item| item.name == name) {
            return existing.id;
        }

        let kind = EntityKind::Type(key_def.item.doom_type);
        let id = ids::item_id(Some(level.index), kind);
        self.add_groups(&name, &key_def.item.groups, Some(level));
        self.items.push(Item {
            id,
            name,
            level: Some(level.index),
            kind,
            count: 1,
            is_key: true,
            classification: Classification::PROGRESSION,
        });
        id
    }

    fn add_item(
        &mut self,
        def: &ItemDef,
        kind: EntityKind,
        classification: Classification,
        level: Option<&Level<'_>>,
    ) {
        let name = match level {
            Some(level) if def.name.is_empty() => level.name.clone(),
            Some(level) => format!("{} - {}", level.name, def.name),
            None => def.name.clone(),
        };
        let level_index = level.map(|l| l.index);

        self.add_groups(&name, &def.groups, level);
        self.items.push(Item {
            id: ids::item_id(level_index, kind),
            name,
            level: level_index,
            kind,
            count: def.count,
            is_key: false,
            classification,
        });
    }

    fn add_groups(&mut self, item_name: &str, groups: &[String], level: Option<&Level<'_>>) {
        for group in groups.iter().filter(|g| !g.is_empty()) {
            let group = match level {
                Some(level) => group.replace(MAP_GROUP_MARKER, &level.group_name),
                None => group.clone(),
            };
            self.item_name_groups
                .entry(group)
                .or_default()
                .insert(item_name.to_string());
        }
    }

    /// Applies the game's legacy name->id tables, if any.
    pub fn apply_legacy_remap(&mut self, game: &GameConfig) {
        let locations = ids::apply_remap(&mut self.locations, &game.location_remap);
        let items = ids::apply_remap(&mut self.items, &game.item_remap);
        if locations + items > 0 {
            tracing::info!(
                locations,
                items,
                "legacy remap assigned new ids to unmapped entities"
            );
        }
    }

    pub fn sort_by_id(&mut self) {
        self.locations.sort_by_key(|loc| loc.id);
        self.items.sort_by_key(|item| item.id);
    }

    /// Keeps the first entity registered under each id and drops the rest.
    /// Run after [`Catalog::sort_by_id`], which is stable.
    pub fn drop_duplicate_ids(&mut self, diag: &mut Diagnostics) {
        let mut seen = HashSet::new();
        let mut dropped_items = Vec::new();
        self.items.retain(|item| {
            if seen.insert(item.id) {
                return true;
            }
            diag.record(
                DiagnosticKind::DuplicateId,
                format!("Item '{}' dropped: id {} is already used.", item.name, item.id),
            );
            dropped_items.push(item.name.clone());
            false
        });

        seen.clear();
        self.locations.retain(|loc| {
            if seen.insert(loc.id) {
                return true;
            }
            diag.record(
                DiagnosticKind::DuplicateId,
                format!("Location '{}' dropped: id {} is already used.", loc.name, loc.id),
            );
            false
        });

        for name in dropped_items {
            if self.items.iter().any(|item| item.name == name) {
                continue;
            }
            for members in self.item_name_groups.values_mut() {
                members.remove(&name);
            }
        }
        self.item_name_groups.retain(|_, members| !members.is_empty());
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.item_name_groups.contains_key(group)
    }

    pub fn keys_for(&self, level: LevelIndex) -> LevelKeys {
        self.level_keys.get(&level).copied().unwrap_or_default()
    }

    pub fn location_for_thing(&self, level: LevelIndex, thing_index: usize) -> Option<&Location> {
        self.locations
            .iter()
            .find(|loc| loc.level == level && loc.thing_index == Some(thing_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Connection, ConnectionTarget, LocationMeta, Region};

    fn game(json: &str) -> GameConfig {
        GameConfig::from_json(json).unwrap()
    }

    fn base_game() -> GameConfig {
        game(
            r#"{
                "short_name": "doom", "iwad": "DOOM.WAD",
                "episodes": [{ "maps": [
                    { "name": "Hangar (E1M1)", "lump": "E1M1" },
                    { "name": "Nuclear Plant", "lump": "E1M2" }
                ] }],
                "location_doom_types": { "2018": "Armor", "5": "Blue keycard" },
                "keys": [{ "doom_type": 5, "name": "Blue keycard", "key": 0, "group": "Keys" }],
                "filler": [{ "doom_type": 2007, "name": "Clip", "group": "Junk" }],
                "unique_progression": [{ "doom_type": 2026, "name": "Computer area map", "group": "%MAP% items" }]
            }"#,
        )
    }

    fn thing(doom_type: i16, x: i16, y: i16) -> MapThing {
        MapThing {
            x,
            y,
            doom_type,
            ..Default::default()
        }
    }

    fn level_with(things: Vec<MapThing>, exit: bool) -> LevelData {
        let mut data = LevelData::default();
        data.map.things = things;
        data.rules.regions.push(Region {
            name: "Main".into(),
            connections: if exit {
                vec![Connection::to(ConnectionTarget::LevelExit)]
            } else {
                Vec::new()
            },
            ..Default::default()
        });
        data
    }

    fn compile(game: &GameConfig, data: Vec<LevelData>) -> (Catalog, Diagnostics) {
        let levels = GameLevels { episodes: vec![data] };
        let levels = collect_levels(game, &levels).unwrap();
        let mut diag = Diagnostics::new();
        let mut catalog = Catalog::compile(game, &levels, &mut diag);
        catalog.sort_by_id();
        (catalog, diag)
    }

    #[test]
    fn group_name_prefers_parenthesised_tag() {
        assert_eq!(group_name("Hangar (E1M1)", "X"), "E1M1");
        assert_eq!(group_name("Hangar", "E1M1"), "E1M1");
        assert_eq!(group_name("odd ) (", "MAP01"), "MAP01");
    }

    #[test]
    fn location_ids_follow_discovery_order() {
        let game = base_game();
        let (catalog, _) = compile(
            &game,
            vec![
                level_with(vec![thing(2018, 0, 0), thing(3004, 0, 0), thing(2018, 8, 8)], true),
                level_with(vec![thing(2018, 0, 0)], true),
            ],
        );

        let ids: Vec<i64> = catalog.locations.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![101_000, 101_001, 101_002, 102_000, 102_001]);
        assert_eq!(catalog.locations[1].name, "Hangar (E1M1) - Armor");
        assert_eq!(catalog.locations[2].name, "Hangar (E1M1) - Armor 2");
        assert_eq!(catalog.locations[2].thing_index, Some(2));
    }

    #[test]
    fn multiplayer_and_unreachable_things_are_skipped() {
        let game = base_game();
        let mut mp = thing(2018, 0, 0);
        mp.flags = 0x0010;
        let mut data = level_with(vec![mp, thing(2018, 0, 0), thing(2018, 0, 0)], true);
        data.rules.locations.insert(
            1,
            LocationMeta {
                unreachable: true,
                ..Default::default()
            },
        );
        let (catalog, _) = compile(&game, vec![data, level_with(vec![], true)]);

        let first_level: Vec<_> = catalog
            .locations
            .iter()
            .filter(|l| l.level == LevelIndex::new(0, 0) && l.thing_index.is_some())
            .collect();
        assert_eq!(first_level.len(), 1);
        // unreachable thing still consumed sequence number 1
        assert_eq!(first_level[0].id, 101_002);
        assert_eq!(first_level[0].thing_index, Some(2));
    }

    #[test]
    fn extended_names_put_number_before_description() {
        let mut game = base_game();
        game.settings.extended_names = true;
        let mut data = level_with(vec![thing(2018, 0, 0), thing(2018, 0, 0), thing(2018, 0, 0)], true);
        for idx in 0..2 {
            data.rules.locations.insert(
                idx,
                LocationMeta {
                    name: "Ledge".into(),
                    ..Default::default()
                },
            );
        }
        let (catalog, _) = compile(&game, vec![data, level_with(vec![], true)]);

        let names: Vec<&str> = catalog.locations.iter().map(|l| l.name.as_str()).collect();
        assert!(names.contains(&"Hangar (E1M1) - Armor (Ledge)"));
        assert!(names.contains(&"Hangar (E1M1) - Armor 2 (Ledge)"));
        assert!(names.contains(&"Hangar (E1M1) - Armor"));
    }

    #[test]
    fn repeated_keys_share_one_item() {
        let game = base_game();
        let (catalog, _) = compile(
            &game,
            vec![level_with(vec![thing(5, 0, 0), thing(5, 4, 4)], true), level_with(vec![], true)],
        );

        let keys: Vec<&Item> = catalog.items.iter().filter(|i| i.is_key).collect();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].name, "Hangar (E1M1) - Blue keycard");
        assert_eq!(keys[0].id, 10_100_005);
        assert_eq!(keys[0].classification, Classification::PROGRESSION);
        assert!(catalog.keys_for(LevelIndex::new(0, 0)).present[0]);
        assert!(!catalog.keys_for(LevelIndex::new(0, 1)).present[0]);
        // both key pickups are still locations
        assert_eq!(
            catalog
                .locations
                .iter()
                .filter(|l| l.kind == EntityKind::Type(5))
                .count(),
            2
        );
    }

    #[test]
    fn level_items_and_groups_are_registered() {
        let game = base_game();
        let (catalog, _) = compile(&game, vec![level_with(vec![], true), level_with(vec![], true)]);

        let unlock = catalog.items.iter().find(|i| i.id == 10_100_000).unwrap();
        assert_eq!(unlock.name, "Hangar (E1M1)");
        assert_eq!(unlock.kind, EntityKind::LevelUnlock);
        assert_eq!(
            unlock.classification,
            Classification::PROGRESSION | Classification::USEFUL
        );

        let complete = catalog.items.iter().find(|i| i.id == 10_199_999).unwrap();
        assert_eq!(complete.name, "Hangar (E1M1) - Complete");
        assert_eq!(complete.count, 0);

        assert!(catalog.item_name_groups["Levels"].contains("Nuclear Plant"));
        assert!(catalog.item_name_groups["E1M1"].contains("Hangar (E1M1)"));
        assert!(catalog.item_name_groups["E1M2 items"].contains("Nuclear Plant - Computer area map"));
        assert!(catalog.has_group(JUNK_GROUP));

        let clip = catalog.items.iter().find(|i| i.name == "Clip").unwrap();
        assert_eq!(clip.id, 2007);
        assert_eq!(clip.level, None);
    }

    #[test]
    fn missing_exit_defaults_to_entrance_with_warning() {
        let game = base_game();
        let (catalog, diag) = compile(&game, vec![level_with(vec![], false), level_with(vec![], true)]);

        let exit = catalog.locations.iter().find(|l| l.id == 101_000).unwrap();
        assert_eq!(exit.name, "Hangar (E1M1) - Exit");
        assert_eq!(exit.kind, EntityKind::LevelComplete);
        assert_eq!(exit.region_name.as_deref(), Some("Hub @ Entrance to Hangar (E1M1)"));
        assert_eq!(diag.count(DiagnosticKind::LevelWithoutExit), 1);

        let other = catalog.locations.iter().find(|l| l.id == 102_000).unwrap();
        assert_eq!(other.region_name.as_deref(), Some("Nuclear Plant @ Main"));
    }

    #[test]
    fn legacy_remap_overrides_by_name_then_sorts() {
        let mut game = base_game();
        game.location_remap.insert("Hangar (E1M1) - Armor".into(), 7);
        let levels = GameLevels {
            episodes: vec![vec![level_with(vec![thing(2018, 0, 0)], true), level_with(vec![], true)]],
        };
        let levels = collect_levels(&game, &levels).unwrap();
        let mut diag = Diagnostics::new();
        let mut catalog = Catalog::compile(&game, &levels, &mut diag);
        catalog.apply_legacy_remap(&game);
        catalog.sort_by_id();

        let ids: Vec<(i64, &str)> = catalog
            .locations
            .iter()
            .map(|l| (l.id, l.name.as_str()))
            .collect();
        assert_eq!(
            ids,
            vec![
                (7, "Hangar (E1M1) - Armor"),
                (8, "Hangar (E1M1) - Exit"),
                (9, "Nuclear Plant - Exit"),
            ]
        );
    }

    #[test]
    fn key_sharing_a_unique_item_type_keeps_one_id() {
        let game = game(
            r#"{
                "short_name": "doom", "iwad": "DOOM.WAD",
                "episodes": [{ "maps": [{ "name": "Hangar", "lump": "E1M1" }] }],
                "location_doom_types": { "5": "Blue keycard" },
                "keys": [{ "doom_type": 5, "name": "Blue keycard", "key": 0, "group": "Keys" }],
                "filler": [{ "doom_type": 2007, "name": "Clip", "group": "Junk" }],
                "unique_progression": [{ "doom_type": 5, "name": "Blue card", "group": "Cards" }]
            }"#,
        );
        let (mut catalog, mut diag) = compile(&game, vec![level_with(vec![thing(5, 0, 0)], true)]);
        catalog.drop_duplicate_ids(&mut diag);

        let id = ids::item_id(Some(LevelIndex::new(0, 0)), EntityKind::Type(5));
        let holders: Vec<&str> = catalog
            .items
            .iter()
            .filter(|item| item.id == id)
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(holders, vec!["Hangar - Blue keycard"]);
        assert_eq!(diag.count(DiagnosticKind::DuplicateId), 1);
        assert!(!catalog.has_group("Cards"));
        assert!(catalog.has_group("Keys"));

        let mut unique = HashSet::new();
        assert!(catalog.items.iter().all(|item| unique.insert(item.id)));
    }

    #[test]
    fn mismatched_level_data_is_a_config_error() {
        let game = base_game();
        let levels = GameLevels {
            episodes: vec![vec![LevelData::default()]],
        };
        assert!(matches!(collect_levels(&game, &levels), Err(GenError::Config(_))));
    }
}
