//! Numeric identifiers for items and locations.
//!
//! Location ids: `(ep+1)*100_000 + (map+1)*1_000 + seq`, where `seq` is the
//! discovery order within the level (1..=999) and 0 is the level exit.
//! Item ids: `(ep+1)*10_000_000 + (map+1)*100_000 + type code` for
//! level-scoped items; global items use the raw type code.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::catalog::EntityKind;
use crate::level::LevelIndex;

pub const MAX_LOCATIONS_PER_LEVEL: u32 = 999;
pub const LEVEL_UNLOCK_TYPE_CODE: i64 = 0;
pub const LEVEL_COMPLETE_TYPE_CODE: i64 = 99_999;

pub fn location_id_base(idx: LevelIndex) -> i64 {
    (idx.episode as i64 + 1) * 100_000 + (idx.map as i64 + 1) * 1_000
}

pub fn item_id_base(idx: LevelIndex) -> i64 {
    (idx.episode as i64 + 1) * 10_000_000 + (idx.map as i64 + 1) * 100_000
}

/// The per-level part of an item id.
pub fn item_type_code(kind: EntityKind) -> i64 {
    match kind {
        EntityKind::Type(code) => code as i64,
        EntityKind::LevelUnlock => LEVEL_UNLOCK_TYPE_CODE,
        EntityKind::LevelComplete => LEVEL_COMPLETE_TYPE_CODE,
    }
}

pub fn item_id(level: Option<LevelIndex>, kind: EntityKind) -> i64 {
    match level {
        Some(idx) => item_id_base(idx) + item_type_code(kind),
        None => item_type_code(kind),
    }
}

pub fn level_complete_location_id(idx: LevelIndex) -> i64 {
    location_id_base(idx)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("maximum number of locations reached for {level} (location '{name}' dropped)")]
pub struct LocationOverflow {
    pub level: LevelIndex,
    pub name: String,
}

/// Hands out per-level location sequence numbers in discovery order.
#[derive(Debug)]
pub struct LocationSequence {
    level: LevelIndex,
    next: u32,
}

impl LocationSequence {
    pub fn new(level: LevelIndex) -> Self {
        Self { level, next: 1 }
    }

    /// Reserves the next sequence number whether or not the caller ends up
    /// emitting a location for it, so ids stay tied to thing order.
    pub fn advance(&mut self) -> u32 {
        let seq = self.next;
        self.next += 1;
        seq
    }

    pub fn id_for(&self, seq: u32, name: &str) -> Result<i64, LocationOverflow> {
        if seq > MAX_LOCATIONS_PER_LEVEL {
            return Err(LocationOverflow {
                level: self.level,
                name: name.to_string(),
            });
        }
        Ok(location_id_base(self.level) + seq as i64)
    }
}

/// Something whose id may be overridden by a legacy name table.
pub trait Remappable {
    fn remap_name(&self) -> &str;
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

/// Applies a legacy name->id table.
///
/// Entities whose name is in the table take that id. The rest are renumbered
/// from `max(table) + 1` in ascending order of their freshly allocated id,
/// ties broken by current position. Returns how many were renumbered.
pub fn apply_remap<T: Remappable>(entities: &mut [T], table: &BTreeMap<String, i64>) -> usize {
    if table.is_empty() {
        return 0;
    }

    let mut next_id = table.values().map(|id| id + 1).max().unwrap_or(0).max(0);
    let mut unmapped: Vec<(i64, usize)> = Vec::new();

    for (pos, entity) in entities.iter_mut().enumerate() {
        match table.get(entity.remap_name()) {
            Some(&id) => entity.set_id(id),
            None => unmapped.push((entity.id(), pos)),
        }
    }

    unmapped.sort();
    for &(_, pos) in &unmapped {
        entities[pos].set_id(next_id);
        next_id += 1;
    }
    unmapped.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Named(String, i64);

    impl Remappable for Named {
        fn remap_name(&self) -> &str {
            &self.0
        }
        fn id(&self) -> i64 {
            self.1
        }
        fn set_id(&mut self, id: i64) {
            self.1 = id;
        }
    }

    #[test]
    fn bases_follow_episode_and_map() {
        let idx = LevelIndex::new(0, 0);
        assert_eq!(location_id_base(idx), 101_000);
        assert_eq!(item_id_base(idx), 10_100_000);

        let idx = LevelIndex::new(2, 8);
        assert_eq!(location_id_base(idx), 309_000);
        assert_eq!(item_id_base(idx), 30_900_000);
    }

    #[test]
    fn pseudo_types_have_reserved_codes() {
        let idx = LevelIndex::new(1, 2);
        assert_eq!(item_id(Some(idx), EntityKind::LevelUnlock), 20_300_000);
        assert_eq!(item_id(Some(idx), EntityKind::LevelComplete), 20_399_999);
        assert_eq!(item_id(Some(idx), EntityKind::Type(5)), 20_300_005);
        assert_eq!(item_id(None, EntityKind::Type(2007)), 2007);
    }

    #[test]
    fn sequence_overflows_past_999() {
        let mut seq = LocationSequence::new(LevelIndex::new(0, 0));
        for _ in 0..999 {
            let n = seq.advance();
            assert!(seq.id_for(n, "ok").is_ok());
        }
        let n = seq.advance();
        let err = seq.id_for(n, "Too Many").unwrap_err();
        assert_eq!(err.name, "Too Many");
    }

    #[test]
    fn remap_keeps_table_ids_and_renumbers_the_rest_in_id_order() {
        let mut entities = vec![
            Named("c".into(), 30),
            Named("a".into(), 10),
            Named("b".into(), 20),
            Named("kept".into(), 5),
        ];
        let table = BTreeMap::from([("kept".to_string(), 500)]);

        let renumbered = apply_remap(&mut entities, &table);

        assert_eq!(renumbered, 3);
        assert_eq!(entities[3].1, 500);
        assert_eq!(entities[1].1, 501); // a, lowest original id
        assert_eq!(entities[2].1, 502); // b
        assert_eq!(entities[0].1, 503); // c
    }

    #[test]
    fn empty_table_is_a_no_op() {
        let mut entities = vec![Named("a".into(), 10)];
        assert_eq!(apply_remap(&mut entities, &BTreeMap::new()), 0);
        assert_eq!(entities[0].1, 10);
    }
}
