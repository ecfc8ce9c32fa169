use serde_json::Value;

use super::{int_field, str_field, WorldOption, RANDOMIZER_GROUP};
use crate::config::GameConfig;
use crate::python::{to_snake_case, to_title_case, PyOption, PyOptionKind};

const DOOM_MAP_TYPE: i32 = 2026;
const HERETIC_MAP_TYPE: i32 = 35;

/// Optionally hands every automap item to the player at the start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartWithMaps {
    pub doom_type: i32,
    pub plural_name: String,
    pub option_name: String,
}

impl StartWithMaps {
    pub fn init(game: &GameConfig, json: &Value) -> Self {
        let default_type = if game.is_heretic() {
            HERETIC_MAP_TYPE
        } else {
            DOOM_MAP_TYPE
        };
        let doom_type = int_field(json, "doom_type", default_type as i64) as i32;
        let singular_plural = format!("{}s", game.item_name(doom_type));
        let plural_name = str_field(json, "plural_name", &singular_plural).to_string();

        Self {
            doom_type,
            option_name: format!("start_with_{}", to_snake_case(&plural_name)),
            plural_name,
        }
    }
}

impl WorldOption for StartWithMaps {
    fn emit_hook(&self, hook: &str) -> Vec<String> {
        if hook != "create_items" {
            return Vec::new();
        }
        vec![
            format!("map_opt = self.options.{}", self.option_name),
            "if map_opt.value:".to_string(),
            "    map_items = [pop_from_pool(i.name) for i in self.matching_items(doom_type=map_opt.doom_type).values()]".to_string(),
            "    [self.multiworld.push_precollected(self.create_item(n)) for n in map_items if n is not None]".to_string(),
        ]
    }

    fn emit_options(&self) -> Vec<PyOption> {
        let common = match (self.doom_type, self.plural_name.as_str()) {
            (DOOM_MAP_TYPE, "Computer area maps") => Some("StartWithComputerAreaMaps"),
            (HERETIC_MAP_TYPE, "Map Scrolls") => Some("StartWithMapScrolls"),
            _ => None,
        };
        if let Some(class) = common {
            return vec![PyOption::common(&self.option_name, class).with_group(RANDOMIZER_GROUP)];
        }

        let display = format!("Start With {}", to_title_case(&self.plural_name));
        let mut opt =
            PyOption::new(&self.option_name, &display, PyOptionKind::StartWithMaps).with_group(RANDOMIZER_GROUP);
        opt.docstring.push(format!(
            "If enabled, all {} will be given to the player from the start.",
            self.plural_name
        ));
        opt.doom_type = Some(self.doom_type);
        vec![opt]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::test_support::{doom, heretic};
    use serde_json::json;

    #[test]
    fn defaults_map_to_shared_classes() {
        let doom_opt = StartWithMaps::init(&doom(), &json!({}));
        assert_eq!(doom_opt.option_name, "start_with_computer_area_maps");
        assert_eq!(
            doom_opt.emit_options()[0].output_dataclass(),
            "start_with_computer_area_maps: id1Options.StartWithComputerAreaMaps"
        );

        let heretic_opt = StartWithMaps::init(&heretic(), &json!({ "plural_name": "Map Scrolls" }));
        assert_eq!(heretic_opt.doom_type, 35);
        assert_eq!(
            heretic_opt.emit_options()[0].class_name(),
            "id1Options.StartWithMapScrolls"
        );
    }

    #[test]
    fn custom_item_gets_its_own_class() {
        let opt = StartWithMaps::init(&doom(), &json!({ "plural_name": "area charts" }));
        let py = &opt.emit_options()[0];
        assert!(py.has_own_class());
        let class = py.output_class();
        assert!(class.starts_with("class StartWithAreaCharts(id1Options.StartWithComputerAreaMaps):"));
        assert!(class.contains("display_name = \"Start With Area Charts\""));
        assert!(class.contains("doom_type = 2026"));
    }

    #[test]
    fn hook_pulls_maps_from_pool() {
        let opt = StartWithMaps::init(&doom(), &json!({}));
        let lines = opt.emit_hook("create_items");
        assert_eq!(lines[0], "map_opt = self.options.start_with_computer_area_maps");
        assert_eq!(lines.len(), 4);
        assert!(opt.emit_hook("create_item").is_empty());
    }
}
