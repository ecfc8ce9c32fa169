#![allow(dead_code)]

use std::fs;
use std::path::Path;

use apgen_core::config::GameConfig;
use apgen_core::level::GameLevels;
use apgen_core::output::FailedWrite;
use apgen_core::{OutputSink, Result};
use serde_json::{json, Value};

/// Keeps every write in memory; nothing is visible until `finalize`.
#[derive(Default)]
pub struct RecordingSink {
    pending: Vec<(String, Vec<u8>)>,
    pub files: Vec<(String, Vec<u8>)>,
    pub finalize_calls: usize,
    pub with_version: bool,
}

impl RecordingSink {
    pub fn archive_like() -> Self {
        Self {
            with_version: true,
            ..Default::default()
        }
    }

    pub fn text(&self, path: &str) -> &str {
        let (_, data) = self
            .files
            .iter()
            .find(|(p, _)| p == path)
            .unwrap_or_else(|| panic!("{path} was not written"));
        std::str::from_utf8(data).unwrap()
    }

    pub fn json(&self, path: &str) -> Value {
        serde_json::from_str(self.text(path)).unwrap()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl OutputSink for RecordingSink {
    fn add_text(&mut self, path: &str, content: &str) -> Result<()> {
        self.pending.push((path.to_string(), content.as_bytes().to_vec()));
        Ok(())
    }

    fn add_file(&mut self, dest: &str, source: &Path) -> Result<()> {
        let data = fs::read(source)?;
        self.pending.push((dest.to_string(), data));
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<FailedWrite>> {
        self.finalize_calls += 1;
        self.files.append(&mut self.pending);
        Ok(Vec::new())
    }

    fn output_label(&self) -> String {
        "memory".to_string()
    }

    fn includes_manifest_version(&self) -> bool {
        self.with_version
    }
}

/// A two-level game. Hangar has authored regions and an exit; Plant has
/// neither.
pub fn game_json() -> Value {
    json!({
        "short_name": "doom",
        "iwad": "DOOM.WAD",
        "ap_name": "DOOM 1993",
        "ap_world_name": "doom_1993",
        "ap_class_name": "DOOM1993",
        "episodes": [
            {
                "name": "Knee-Deep in the Dead",
                "maps": [
                    { "name": "Hangar", "lump": "E1M1" },
                    { "name": "Plant", "lump": "E1M2" }
                ]
            }
        ],
        "location_doom_types": {
            "5": "Blue keycard",
            "2011": "Stimpack",
            "2018": "Armor"
        },
        "extra_connection_requirements": [
            { "doom_type": -100, "name": "Allow Ledge Jumps" }
        ],
        "progression": [
            { "doom_type": 2001, "name": "Shotgun", "sprite": "SHOT", "group": "Weapons" }
        ],
        "filler": [
            { "doom_type": 2011, "name": "Stimpack", "sprite": "STIM", "group": "Junk" }
        ],
        "keys": [
            { "doom_type": 5, "name": "Blue keycard", "sprite": "BKEY", "key": 0, "group": ["Keys", "%MAP% keys"] }
        ],
        "world_info": {
            "world_options": [
                { "name": "Difficulty", "preset": "Doom" },
                { "name": "Bogus" }
            ]
        }
    })
}

pub fn game() -> GameConfig {
    serde_json::from_value(game_json()).unwrap()
}

fn square(x: i32, y: i32, size: i32) -> Value {
    json!({ "vertices": [[x, y], [x + size, y], [x + size, y + size], [x, y + size]] })
}

pub fn levels_json() -> Value {
    let hangar = json!({
        "map": {
            "things": [
                { "x": 64, "y": 64, "type": 1 },
                { "x": 128, "y": 128, "type": 2018 },
                { "x": 300, "y": 100, "type": 5 },
                { "x": 320, "y": 100, "type": 2018 },
                { "x": 1000, "y": 1000, "type": 2011 }
            ],
            "sectors": [square(0, 0, 256), square(256, 0, 256)]
        },
        "rules": {
            "entrance": [{ "target": 0 }],
            "regions": [
                {
                    "name": "Main",
                    "sectors": [0],
                    "connections": [
                        { "target": 1, "requirements_and": [5] },
                        { "target": 1, "requirements_or": [-100, 2001] }
                    ]
                },
                {
                    "name": "Blue",
                    "sectors": [1],
                    "connections": [
                        { "target": -2 },
                        { "target": -1 }
                    ]
                }
            ]
        }
    });
    let plant = json!({
        "map": {
            "things": [{ "x": 10, "y": 10, "type": 2018 }],
            "sectors": [square(0, 0, 64)]
        }
    });
    json!({ "episodes": [[hangar, plant]] })
}

pub fn levels() -> GameLevels {
    serde_json::from_value(levels_json()).unwrap()
}
