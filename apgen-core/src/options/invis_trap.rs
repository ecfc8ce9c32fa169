use serde_json::Value;

use super::{int_field, WorldOption, RANDOMIZER_GROUP};
use crate::config::GameConfig;
use crate::python::{to_snake_case, to_title_case, PyOption, PyOptionKind};

const DEFAULT_TYPE: i32 = 2024;
const DEFAULT_NAME: &str = "Partial invisibility";

/// Lets the player have an item classified as a trap instead of filler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvisAsTrap {
    pub doom_type: i32,
    pub item_name: String,
    pub option_name: String,
}

impl InvisAsTrap {
    pub fn init(game: &GameConfig, json: &Value) -> Self {
        let doom_type = int_field(json, "doom_type", DEFAULT_TYPE as i64) as i32;
        let item_name = game.item_name(doom_type).to_string();
        Self {
            doom_type,
            option_name: format!("{}_as_trap", to_snake_case(&item_name)),
            item_name,
        }
    }
}

impl WorldOption for InvisAsTrap {
    fn emit_hook(&self, hook: &str) -> Vec<String> {
        if hook != "create_item" {
            return Vec::new();
        }
        vec![
            format!("invis_trap = self.options.{}", self.option_name),
            "if invis_trap.value and item_data.doom_type == invis_trap.doom_type:".to_string(),
            "    classification = AP.ItemClassification.trap".to_string(),
        ]
    }

    fn emit_options(&self) -> Vec<PyOption> {
        if self.doom_type == DEFAULT_TYPE && self.item_name == DEFAULT_NAME {
            return vec![
                PyOption::bound(&self.option_name, PyOptionKind::InvisibilityTrap).with_group(RANDOMIZER_GROUP),
            ];
        }

        let display = format!("{} as Trap", to_title_case(&self.item_name));
        let mut opt =
            PyOption::new(&self.option_name, &display, PyOptionKind::InvisibilityTrap).with_group(RANDOMIZER_GROUP);
        opt.docstring.push(format!(
            "If enabled, {} will be classified as a trap, rather than just filler.",
            self.item_name
        ));
        opt.docstring
            .push("This does not change how the item behaves, only how Archipelago sees it.".to_string());
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
    fn default_item_binds_shared_class() {
        let opt = InvisAsTrap::init(&doom(), &json!({}));
        assert_eq!(opt.option_name, "partial_invisibility_as_trap");
        let py = &opt.emit_options()[0];
        assert_eq!(
            py.output_dataclass(),
            "partial_invisibility_as_trap: id1Options.PartialInvisibilityAsTrap"
        );
    }

    #[test]
    fn other_item_gets_own_class() {
        let opt = InvisAsTrap::init(&heretic(), &json!({ "doom_type": 75 }));
        assert_eq!(opt.option_name, "shadowsphere_as_trap");
        let class = opt.emit_options()[0].output_class();
        assert!(class.starts_with("class ShadowsphereAsTrap(id1Options.PartialInvisibilityAsTrap):"));
        assert!(class.contains("display_name = \"Shadowsphere as Trap\""));
        assert!(class.contains("    If enabled, Shadowsphere will be classified as a trap, rather than just filler.\n"));
        assert!(class.contains("doom_type = 75"));
    }

    #[test]
    fn hook_reclassifies_in_create_item() {
        let opt = InvisAsTrap::init(&doom(), &json!({}));
        assert_eq!(opt.emit_hook("create_item").len(), 3);
        assert!(opt.emit_hook("create_items").is_empty());
    }
}
