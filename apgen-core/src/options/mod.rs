//! World options: independently pluggable features that each contribute
//! option declarations to `options.py` and code to the world's hook points.
//!
//! A game lists the options it wants in `world_info.world_options`. Each entry
//! is matched by name against the registry; its initializer runs once and the
//! resulting value answers every later query for that run.

mod ammo_capacity;
mod capacity_upgrades;
mod difficulty;
mod invis_trap;
mod start_with_maps;

use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::config::GameConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::python::PyOption;

pub use ammo_capacity::CustomAmmoCapacity;
pub use capacity_upgrades::CapacityUpgrades;
pub use difficulty::Difficulty;
pub use invis_trap::InvisAsTrap;
pub use start_with_maps::StartWithMaps;

pub const RANDOMIZER_GROUP: &str = "Randomizer Options";

/// An initialized world option.
pub trait WorldOption {
    /// Lines to splice into the named hook point; empty when not interested.
    fn emit_hook(&self, _hook: &str) -> Vec<String> {
        Vec::new()
    }

    fn emit_options(&self) -> Vec<PyOption>;
}

pub type InitFn = fn(&GameConfig, &Value) -> Box<dyn WorldOption>;

pub struct WorldOptionRegistry {
    handlers: BTreeMap<String, InitFn>,
}

impl WorldOptionRegistry {
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Every option this crate ships.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("Difficulty", |game, json| Box::new(Difficulty::init(game, json)));
        registry.register("Start with Maps", |game, json| Box::new(StartWithMaps::init(game, json)));
        registry.register("Invis as Trap", |game, json| Box::new(InvisAsTrap::init(game, json)));
        registry.register("Custom Ammo Capacity", |game, json| {
            Box::new(CustomAmmoCapacity::init(game, json))
        });
        registry.register("Capacity Upgrades", |game, json| Box::new(CapacityUpgrades::init(game, json)));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, init: InitFn) {
        self.handlers.insert(name.into(), init);
    }

    #[cfg(test)]
    fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Initializes the game's declared options in declaration order.
    pub fn init(&self, game: &GameConfig, diag: &mut Diagnostics) -> InitializedOptions {
        let mut entries: Vec<(String, Box<dyn WorldOption>)> = Vec::new();
        let mut seen = HashSet::new();

        for json in &game.world_info.world_options {
            let name = str_field(json, "name", "(no name)");
            let Some(init) = self.handlers.get(name) else {
                diag.record(
                    DiagnosticKind::UnknownWorldOption,
                    format!("Unknown world option '{name}'!"),
                );
                continue;
            };
            if !seen.insert(name.to_string()) {
                tracing::warn!(option = name, "world option declared twice; keeping the first");
                continue;
            }

            tracing::debug!(option = name, "world option initialized");
            entries.push((name.to_string(), init(game, json)));
        }
        InitializedOptions { entries }
    }
}

impl Default for WorldOptionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The options in use for one run, in declaration order.
pub struct InitializedOptions {
    entries: Vec<(String, Box<dyn WorldOption>)>,
}

impl InitializedOptions {
    #[cfg(test)]
    fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    /// All code for one hook point: the game's own lines first, then each
    /// option's, every block fenced by marker comments and followed by
    /// `line_breaks` blank lines.
    pub fn hook_lines(&self, game: &GameConfig, hook: &str, line_breaks: usize) -> Vec<String> {
        let mut content = Vec::new();

        if let Some(custom) = game.world_info.hooks.get(hook) {
            content.push("######## Custom code for this world begins here ########".to_string());
            content.extend(custom.iter().cloned());
            content.push("######## Custom code for this world ends here ########".to_string());
            content.extend(std::iter::repeat(String::new()).take(line_breaks));
        }

        for (name, option) in &self.entries {
            let lines = option.emit_hook(hook);
            if lines.is_empty() {
                continue;
            }
            content.push(format!("######## Custom code for world option '{name}' begins here ########"));
            content.extend(lines);
            content.push(format!("######## Custom code for world option '{name}' ends here ########"));
            content.extend(std::iter::repeat(String::new()).take(line_breaks));
        }
        content
    }

    pub fn option_descriptors(&self) -> Vec<PyOption> {
        self.entries
            .iter()
            .flat_map(|(_, option)| option.emit_options())
            .collect()
    }
}

pub(crate) fn str_field<'a>(json: &'a Value, key: &str, default: &'a str) -> &'a str {
    json.get(key).and_then(Value::as_str).unwrap_or(default)
}

pub(crate) fn int_field(json: &Value, key: &str, default: i64) -> i64 {
    json.get(key).and_then(Value::as_i64).unwrap_or(default)
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(&'static str);

    impl WorldOption for Fixed {
        fn emit_hook(&self, hook: &str) -> Vec<String> {
            if hook == "set_rules" {
                vec![self.0.to_string()]
            } else {
                Vec::new()
            }
        }

        fn emit_options(&self) -> Vec<PyOption> {
            vec![PyOption::common(self.0, "Fixed")]
        }
    }

    fn registry() -> WorldOptionRegistry {
        let mut registry = WorldOptionRegistry::empty();
        registry.register("A", |_, _| Box::new(Fixed("a_line")));
        registry.register("B", |_, _| Box::new(Fixed("b_line")));
        registry
    }

    fn game_with(options: Value, hooks: Value) -> GameConfig {
        GameConfig::from_json(
            &json!({
                "short_name": "x", "iwad": "X.WAD", "episodes": [],
                "world_info": { "world_options": options, "hooks": hooks }
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn unknown_options_are_counted_and_skipped() {
        let game = game_with(json!([{ "name": "B" }, { "name": "Nope" }, {}, { "name": "A" }]), json!({}));
        let mut diag = Diagnostics::new();
        let opts = registry().init(&game, &mut diag);

        assert_eq!(opts.names().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(diag.count(DiagnosticKind::UnknownWorldOption), 2);
    }

    #[test]
    fn duplicate_declarations_initialize_once() {
        let game = game_with(json!([{ "name": "A" }, { "name": "A" }]), json!({}));
        let mut diag = Diagnostics::new();
        let opts = registry().init(&game, &mut diag);
        assert_eq!(opts.len(), 1);
        assert!(diag.is_empty());
    }

    #[test]
    fn hooks_are_fenced_in_declaration_order() {
        let game = game_with(
            json!([{ "name": "B" }, { "name": "A" }]),
            json!({ "set_rules": ["custom()"] }),
        );
        let mut diag = Diagnostics::new();
        let opts = registry().init(&game, &mut diag);

        assert_eq!(
            opts.hook_lines(&game, "set_rules", 1),
            vec![
                "######## Custom code for this world begins here ########",
                "custom()",
                "######## Custom code for this world ends here ########",
                "",
                "######## Custom code for world option 'B' begins here ########",
                "b_line",
                "######## Custom code for world option 'B' ends here ########",
                "",
                "######## Custom code for world option 'A' begins here ########",
                "a_line",
                "######## Custom code for world option 'A' ends here ########",
                "",
            ]
        );
        assert!(opts.hook_lines(&game, "create_items", 1).is_empty());
        assert_eq!(opts.hook_lines(&game, "set_rules", 0).len(), 9);
    }

    #[test]
    fn descriptors_follow_declaration_order() {
        let game = game_with(json!([{ "name": "B" }, { "name": "A" }]), json!({}));
        let mut diag = Diagnostics::new();
        let names: Vec<String> = registry()
            .init(&game, &mut diag)
            .option_descriptors()
            .iter()
            .map(|o| o.data_name().to_string())
            .collect();
        assert_eq!(names, vec!["b_line", "a_line"]);
    }

    #[test]
    fn builtin_registry_knows_every_shipped_option() {
        let registry = WorldOptionRegistry::builtin();
        for name in [
            "Difficulty",
            "Start with Maps",
            "Invis as Trap",
            "Custom Ammo Capacity",
            "Capacity Upgrades",
        ] {
            assert!(registry.contains(name), "{name}");
        }
    }
}
