//! Per-level inputs: the parsed map and the authored rule graph.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Thing flag marking an object that only spawns in multiplayer.
pub const MULTIPLAYER_ONLY: i16 = 0x0010;

/// Position of a level inside its game, zero-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LevelIndex {
    pub episode: usize,
    pub map: usize,
}

impl LevelIndex {
    pub fn new(episode: usize, map: usize) -> Self {
        Self { episode, map }
    }

    /// The one-based `[episode, map]` pair used throughout the output.
    pub fn exmx(&self) -> [usize; 2] {
        [self.episode + 1, self.map + 1]
    }
}

impl fmt::Display for LevelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Episode {} Map {}", self.episode + 1, self.map + 1)
    }
}

#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MapThing {
    pub x: i16,
    pub y: i16,
    #[serde(default)]
    pub angle: i16,
    #[serde(rename = "type")]
    pub doom_type: i16,
    #[serde(default)]
    pub flags: i16,
}

impl MapThing {
    pub fn is_multiplayer_only(&self) -> bool {
        self.flags & MULTIPLAYER_ONLY != 0
    }
}

/// Outline of one sector, as a closed polygon in map units.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SectorShape {
    pub vertices: Vec<[i32; 2]>,
}

impl SectorShape {
    /// Even-odd rule; points exactly on an edge may land on either side.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let pts = &self.vertices;
        if pts.len() < 3 {
            return false;
        }

        let (px, py) = (x as i64, y as i64);
        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (xi, yi) = (pts[i][0] as i64, pts[i][1] as i64);
            let (xj, yj) = (pts[j][0] as i64, pts[j][1] as i64);
            if (yi > py) != (yj > py) {
                // x of the edge at py, compared without division
                let lhs = (px - xi) * (yj - yi);
                let rhs = (xj - xi) * (py - yi);
                if (yj > yi && lhs < rhs) || (yj < yi && lhs > rhs) {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Spatial query over a level's sectors.
pub trait SectorLookup {
    fn sector_at(&self, x: i32, y: i32) -> Option<usize>;
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MapData {
    #[serde(default)]
    pub things: Vec<MapThing>,
    #[serde(default)]
    pub sectors: Vec<SectorShape>,
}

impl SectorLookup for MapData {
    fn sector_at(&self, x: i32, y: i32) -> Option<usize> {
        self.sectors.iter().position(|s| s.contains(x, y))
    }
}

/// Where a connection leads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "i64", into = "i64")]
pub enum ConnectionTarget {
    Region(usize),
    HubEntrance,
    LevelExit,
    /// A negative code with no meaning; kept so it can be reported.
    Unknown(i64),
}

impl From<i64> for ConnectionTarget {
    fn from(raw: i64) -> Self {
        match raw {
            -1 => ConnectionTarget::HubEntrance,
            -2 => ConnectionTarget::LevelExit,
            n if n < 0 => ConnectionTarget::Unknown(n),
            n => ConnectionTarget::Region(n as usize),
        }
    }
}

impl From<ConnectionTarget> for i64 {
    fn from(target: ConnectionTarget) -> Self {
        match target {
            ConnectionTarget::Region(n) => n as i64,
            ConnectionTarget::HubEntrance => -1,
            ConnectionTarget::LevelExit => -2,
            ConnectionTarget::Unknown(n) => n,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Connection {
    pub target: ConnectionTarget,
    #[serde(default)]
    pub requirements_and: Vec<i32>,
    #[serde(default)]
    pub requirements_or: Vec<i32>,
}

impl Connection {
    pub fn to(target: ConnectionTarget) -> Self {
        Self {
            target,
            requirements_and: Vec::new(),
            requirements_or: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Region {
    pub name: String,
    #[serde(default)]
    pub sectors: BTreeSet<usize>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LocationMeta {
    /// Descriptive text, used by extended names.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub unreachable: bool,
    #[serde(default)]
    pub check_sanity: bool,
    #[serde(default)]
    pub death_logic: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RuleGraph {
    #[serde(default)]
    pub regions: Vec<Region>,
    /// Connections out of the level's hub entrance.
    #[serde(default)]
    pub entrance: Vec<Connection>,
    /// Authored metadata keyed by thing index.
    #[serde(default)]
    pub locations: BTreeMap<usize, LocationMeta>,
}

impl RuleGraph {
    /// First region with a connection into the level exit.
    pub fn exit_region(&self) -> Option<&Region> {
        self.regions.iter().find(|region| {
            region
                .connections
                .iter()
                .any(|c| c.target == ConnectionTarget::LevelExit)
        })
    }

    pub fn location(&self, thing_index: usize) -> Option<&LocationMeta> {
        self.locations.get(&thing_index)
    }

    /// Sector to owning region. A sector listed by several regions goes to
    /// the last one.
    pub fn sector_owners(&self) -> BTreeMap<usize, usize> {
        let mut owners = BTreeMap::new();
        for (idx, region) in self.regions.iter().enumerate() {
            for &sector in &region.sectors {
                owners.insert(sector, idx);
            }
        }
        owners
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LevelData {
    #[serde(default)]
    pub map: MapData,
    #[serde(default)]
    pub rules: RuleGraph,
}

/// Level data for a whole game, indexed `[episode][map]`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GameLevels {
    pub episodes: Vec<Vec<LevelData>>,
}

impl GameLevels {
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn get(&self, idx: LevelIndex) -> Option<&LevelData> {
        self.episodes.get(idx.episode)?.get(idx.map)
    }
}
