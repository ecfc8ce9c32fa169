//! Region documents and location binding.
//!
//! Each level contributes an entrance region (reached from the hub) plus one
//! document per authored region. Connections carry two kinds of gates:
//! `requires` lists world options that must be enabled for the connection to
//! exist at all, while `rules` is an AND/OR tree of item names.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::catalog::{Catalog, Level};
use crate::config::GameConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::level::{Connection, ConnectionTarget, LevelIndex, SectorLookup};

pub const HUB_REGION: &str = "Hub";

pub fn entrance_region_name(level_name: &str) -> String {
    format!("{HUB_REGION} @ Entrance to {level_name}")
}

pub fn region_name(level_name: &str, region: &str) -> String {
    format!("{level_name} @ {region}")
}

/// A connection that cannot be serialized; the connection is dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("{level}: no item matches requirement type {code}")]
    UnknownRequirement { level: String, code: i32 },
    #[error("{level}: no option requirement matches type {code}")]
    UnknownOptionRequirement { level: String, code: i32 },
    #[error("{level}: connection targets missing region #{index}")]
    UnknownRegion { level: String, index: usize },
    #[error("{level}: connection has unknown target code {code}")]
    UnknownTarget { level: String, code: i64 },
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct RuleGroup {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub and: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub or: Vec<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ConnectionDoc {
    #[serde(rename = "_target")]
    pub target: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    /// At most one group today; a list so OR-of-AND groups fit later.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleGroup>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RegionDoc {
    #[serde(rename = "_name")]
    pub name: String,
    pub connections: Vec<ConnectionDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exmx: Option<[usize; 2]>,
}

/// Name of the item a non-negative requirement code stands for.
pub fn requirement_name(game: &GameConfig, level_name: &str, code: i32) -> Result<String, ConnectionError> {
    if let Some(def) = game.unique_progression.iter().find(|d| d.doom_type == code) {
        return Ok(format!("{level_name} - {}", def.name));
    }
    if let Some(key) = game.key_for_type(code) {
        return Ok(format!("{level_name} - {}", key.item.name));
    }
    game.item_requirements()
        .find(|d| d.doom_type == code)
        .map(|d| d.name.clone())
        .ok_or_else(|| ConnectionError::UnknownRequirement {
            level: level_name.to_string(),
            code,
        })
}

fn option_requirement_name(game: &GameConfig, level_name: &str, code: i32) -> Result<String, ConnectionError> {
    game.extra_connection_requirements
        .iter()
        .find(|d| d.doom_type == code)
        .map(|d| d.name.clone())
        .ok_or_else(|| ConnectionError::UnknownOptionRequirement {
            level: level_name.to_string(),
            code,
        })
}

pub fn make_connection(
    game: &GameConfig,
    connection: &Connection,
    level_name: &str,
    target: String,
) -> Result<ConnectionDoc, ConnectionError> {
    let mut requires = Vec::new();
    let mut group = RuleGroup::default();

    for &code in &connection.requirements_and {
        if code < 0 {
            requires.push(option_requirement_name(game, level_name, code)?);
        } else {
            group.and.push(requirement_name(game, level_name, code)?);
        }
    }
    for &code in &connection.requirements_or {
        if code < 0 {
            requires.push(option_requirement_name(game, level_name, code)?);
        } else {
            group.or.push(requirement_name(game, level_name, code)?);
        }
    }

    let rules = if group.and.is_empty() && group.or.is_empty() {
        Vec::new()
    } else {
        vec![group]
    };

    Ok(ConnectionDoc {
        target,
        requires,
        rules,
    })
}

/// Target region name, or `None` for the exit (completion is a location).
fn target_name(level: &Level<'_>, target: ConnectionTarget) -> Result<Option<String>, ConnectionError> {
    match target {
        ConnectionTarget::LevelExit => Ok(None),
        ConnectionTarget::HubEntrance => Ok(Some(entrance_region_name(&level.name))),
        ConnectionTarget::Region(index) => level
            .data
            .rules
            .regions
            .get(index)
            .map(|r| Some(region_name(&level.name, &r.name)))
            .ok_or_else(|| ConnectionError::UnknownRegion {
                level: level.name.clone(),
                index,
            }),
        ConnectionTarget::Unknown(code) => Err(ConnectionError::UnknownTarget {
            level: level.name.clone(),
            code,
        }),
    }
}

fn serialize_connections(
    game: &GameConfig,
    level: &Level<'_>,
    connections: &[Connection],
    diag: &mut Diagnostics,
) -> Vec<ConnectionDoc> {
    let mut out = Vec::with_capacity(connections.len());
    for connection in connections {
        let doc = target_name(level, connection.target).and_then(|target| {
            target
                .map(|t| make_connection(game, connection, &level.name, t))
                .transpose()
        });
        match doc {
            Ok(Some(doc)) => out.push(doc),
            Ok(None) => {}
            Err(err) => diag.record(DiagnosticKind::UnresolvedConnection, err.to_string()),
        }
    }
    out
}

/// The top-level hub: one connection per level, gated on its unlock item.
pub fn hub_region(levels: &[Level<'_>]) -> RegionDoc {
    RegionDoc {
        name: HUB_REGION.to_string(),
        connections: levels
            .iter()
            .map(|level| ConnectionDoc {
                target: entrance_region_name(&level.name),
                requires: Vec::new(),
                rules: vec![RuleGroup {
                    and: vec![level.name.clone()],
                    or: Vec::new(),
                }],
            })
            .collect(),
        exmx: None,
    }
}

/// Every region document for the game, hub first.
pub fn serialize_regions(game: &GameConfig, levels: &[Level<'_>], diag: &mut Diagnostics) -> Vec<RegionDoc> {
    let mut docs = vec![hub_region(levels)];

    for level in levels {
        let exmx = Some(level.index.exmx());
        let rules = &level.data.rules;

        docs.push(RegionDoc {
            name: entrance_region_name(&level.name),
            connections: serialize_connections(game, level, &rules.entrance, diag),
            exmx,
        });

        for region in &rules.regions {
            docs.push(RegionDoc {
                name: region_name(&level.name, &region.name),
                connections: serialize_connections(game, level, &region.connections, diag),
                exmx,
            });
        }
    }
    docs
}

/// Assigns each placed location the region owning the sector it stands in.
///
/// Locations with no sector under them are dropped. Locations whose sector
/// no region owns fall back to the level's entrance region.
pub fn bind_locations(catalog: &mut Catalog, levels: &[Level<'_>], diag: &mut Diagnostics) {
    let by_index: HashMap<LevelIndex, &Level<'_>> = levels.iter().map(|l| (l.index, l)).collect();
    let owners: HashMap<LevelIndex, _> = levels
        .iter()
        .map(|l| (l.index, l.data.rules.sector_owners()))
        .collect();

    catalog.locations.retain_mut(|loc| {
        let (Some(_), Some((x, y))) = (loc.thing_index, loc.position) else {
            return true;
        };
        let Some(level) = by_index.get(&loc.level) else {
            return true;
        };

        let Some(sector) = level.data.map.sector_at(x, y) else {
            diag.record(
                DiagnosticKind::MissingSector,
                format!("Cannot find sector for location: {}", loc.name),
            );
            return false;
        };

        loc.region_name = owners
            .get(&loc.level)
            .and_then(|o| o.get(&sector))
            .and_then(|&r| level.data.rules.regions.get(r))
            .map(|region| region_name(&level.name, &region.name));

        if loc.region_name.is_none() {
            diag.record(
                DiagnosticKind::UnboundLocation,
                format!(
                    "Location '{}' is not marked as unreachable, and is not associated with a region.",
                    loc.name
                ),
            );
            loc.region_name = Some(entrance_region_name(&level.name));
        }
        true
    });
}
