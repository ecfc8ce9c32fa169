use serde_json::Value;

use super::{int_field, str_field, WorldOption};
use crate::config::GameConfig;
use crate::python::{to_snake_case, PyOption, PyOptionKind};

const GROUP: &str = "Ammo Capacity";
const MAX_CAPACITY: i64 = 999;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmmoType {
    pub name: String,
    pub suffix: String,
    pub capacity: i64,
}

/// Per-ammo-type starting and upgrade capacities, read from `game_info.ammo`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomAmmoCapacity {
    pub ammo: Vec<AmmoType>,
}

impl CustomAmmoCapacity {
    pub fn init(game: &GameConfig, _json: &Value) -> Self {
        let ammo = game
            .game_info_field("ammo")
            .and_then(Value::as_array)
            .map(|all| {
                all.iter()
                    .map(|entry| {
                        let name = str_field(entry, "name", "(no name)").to_string();
                        AmmoType {
                            suffix: to_snake_case(&name),
                            capacity: int_field(entry, "max", 0),
                            name,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { ammo }
    }
}

impl WorldOption for CustomAmmoCapacity {
    fn emit_hook(&self, hook: &str) -> Vec<String> {
        if hook != "fill_slot_data" {
            return Vec::new();
        }

        let mut lines = vec!["slot_data[\"ammo_start\"] = [".to_string()];
        lines.extend(
            self.ammo
                .iter()
                .map(|a| format!("    self.options.max_ammo_{}.value,", a.suffix)),
        );
        lines.push("]".to_string());
        lines.push("slot_data[\"ammo_add\"] = [".to_string());
        lines.extend(
            self.ammo
                .iter()
                .map(|a| format!("    self.options.added_ammo_{}.value,", a.suffix)),
        );
        lines.push("]".to_string());
        lines
    }

    fn emit_options(&self) -> Vec<PyOption> {
        let max = self.ammo.iter().map(|ammo| {
            let mut opt = PyOption::new(
                &format!("max_ammo_{}", ammo.suffix),
                &format!("Max Ammo - {}", ammo.name),
                PyOptionKind::Range,
            )
            .with_group(GROUP);
            opt.docstring.push(format!("Set the starting capacity for {}.", ammo.name));
            opt.range_start = ammo.capacity;
            opt.range_end = MAX_CAPACITY;
            opt.default_int = Some(ammo.capacity);
            opt
        });

        let added = self.ammo.iter().map(|ammo| {
            let mut opt = PyOption::new(
                &format!("added_ammo_{}", ammo.suffix),
                &format!("Added Ammo - {}", ammo.name),
                PyOptionKind::Range,
            )
            .with_group(GROUP);
            opt.docstring.push(format!(
                "Set how much capacity for {} will be added when a capacity upgrade is obtained.",
                ammo.name
            ));
            opt.range_start = ammo.capacity / 10;
            opt.range_end = MAX_CAPACITY;
            opt.default_int = Some(ammo.capacity);
            opt
        });

        max.chain(added).collect()
    }
}
