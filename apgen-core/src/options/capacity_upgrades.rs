use serde_json::Value;

use super::{int_field, str_field, WorldOption, RANDOMIZER_GROUP};
use crate::config::GameConfig;
use crate::python::{to_snake_case, to_title_case, PyOption, PyOptionKind};

const DEFAULT_TYPE: i32 = 8;

/// Controls how many capacity upgrades exist and whether they come split
/// into one item per ammo type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapacityUpgrades {
    pub doom_type: i32,
    pub item_count: i64,
    pub singular_name: String,
    pub plural_name: String,
    pub split_option: String,
    pub count_option: String,
}

impl CapacityUpgrades {
    pub fn init(game: &GameConfig, json: &Value) -> Self {
        let doom_type = int_field(json, "doom_type", DEFAULT_TYPE as i64) as i32;
        let singular_name = game.item_name(doom_type).to_string();
        let default_plural = format!("{singular_name}s");
        let snake = to_snake_case(&singular_name);

        Self {
            doom_type,
            item_count: int_field(json, "item_count", if game.is_heretic() { 6 } else { 4 }),
            plural_name: str_field(json, "combined_plural_name", &default_plural).to_string(),
            split_option: format!("split_{snake}"),
            count_option: format!("{snake}_count"),
            singular_name,
        }
    }
}

impl WorldOption for CapacityUpgrades {
    fn emit_hook(&self, hook: &str) -> Vec<String> {
        if hook != "create_items" {
            return Vec::new();
        }
        let count = &self.count_option;
        vec![
            format!("split_opt = self.options.{}", self.split_option),
            "split_items = [i for i in self.matching_items(doom_type=split_opt.split_doom_types).values()]".to_string(),
            "combined_items = [i for i in self.matching_items(doom_type=split_opt.doom_type).values()]".to_string(),
            String::new(),
            "# Remove stray capacity upgrades of all types from the pool".to_string(),
            "item_names = [i.name for i in split_items] + [i.name for i in combined_items]".to_string(),
            "itempool = [n for n in itempool if n not in item_names]".to_string(),
            String::new(),
            "# Insert requested types and count of capacity upgrades".to_string(),
            "if split_opt.value:".to_string(),
            format!("    itempool += [i.name for i in split_items for _ in range(self.options.{count}.value)]"),
            "else:".to_string(),
            format!("    itempool += [i.name for i in combined_items for _ in range(self.options.{count}.value)]"),
        ]
    }

    fn emit_options(&self) -> Vec<PyOption> {
        let common = match (self.doom_type, self.singular_name.as_str(), self.item_count) {
            (DEFAULT_TYPE, "Backpack", 4) => Some(("SplitBackpack", "BackpackCount")),
            (DEFAULT_TYPE, "Bag of Holding", 6) => Some(("SplitBagOfHolding", "BagOfHoldingCount")),
            _ => None,
        };
        if let Some((split, count)) = common {
            return vec![
                PyOption::common(&self.split_option, split).with_group(RANDOMIZER_GROUP),
                PyOption::common(&self.count_option, count).with_group(RANDOMIZER_GROUP),
            ];
        }

        let title = to_title_case(&self.singular_name);
        let split_display = format!("Split {title}");

        let mut split =
            PyOption::new(&self.split_option, &split_display, PyOptionKind::CapacitySplit).with_group(RANDOMIZER_GROUP);
        split.docstring.push(format!(
            "Split the {} into {} individual items, each one increasing ammo capacity for one type of weapon only.",
            self.singular_name, self.item_count
        ));
        split.doom_type = Some(self.doom_type);
        split.split_item_count = self.item_count;

        let mut count = PyOption::new(
            &self.count_option,
            &format!("{title} Count"),
            PyOptionKind::CapacityCount,
        )
        .with_group(RANDOMIZER_GROUP);
        count
            .docstring
            .push(format!("How many {} will be available.", self.plural_name));
        count.docstring.push(format!(
            "If {split_display} is set, this will be the number of each capacity upgrade available."
        ));

        vec![split, count]
    }
}
