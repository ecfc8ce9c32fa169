use serde_json::Value;

use super::{str_field, WorldOption};
use crate::config::GameConfig;
use crate::python::{py_quote, to_snake_case, PyOption, PyOptionKind};

const GROUP: &str = "Difficulty Options";

/// (default option name, description) for each skill level.
const SKILLS_DOOM: [(&str, &str); 5] = [
    ("baby", "Damage taken is halved. Ammo received from pickups is doubled."),
    ("easy", "Lesser number or strength of monsters, and more pickups."),
    ("medium", "The default skill. Balanced monsters and pickups."),
    ("hard", "Greater number or strength of monsters, and less pickups."),
    ("nightmare", "Monsters are faster, more aggressive, and respawn."),
];

const SKILLS_HERETIC: [(&str, &str); 5] = [
    (
        "wet nurse",
        "Damage taken is halved. Ammo received from pickups is doubled. Quartz Flasks and Mystic Urns are automatically used when the player nears death.",
    ),
    ("easy", "Lesser number or strength of monsters, and more pickups."),
    ("medium", "The default skill. Balanced monsters and pickups."),
    ("hard", "Greater number or strength of monsters, and less pickups."),
    ("black plague", "Monsters are faster and more aggressive."),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skill {
    pub full_name: String,
    pub option_name: String,
    pub description: &'static str,
    pub aliases: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Difficulty {
    /// One of the tables already present in the shared options module.
    Preset(&'static str),
    Custom {
        skill_5_warning: String,
        /// Skills with no `full_name` are left out of the choice.
        skills: Vec<Option<Skill>>,
    },
}

impl Difficulty {
    pub fn init(game: &GameConfig, json: &Value) -> Self {
        match str_field(json, "preset", "") {
            "Doom" => return Difficulty::Preset("DifficultyDoom"),
            "Heretic" => return Difficulty::Preset("DifficultyHeretic"),
            _ => {}
        }

        let defaults = if game.is_heretic() {
            &SKILLS_HERETIC
        } else {
            &SKILLS_DOOM
        };
        let list = json.get("list").and_then(Value::as_array);

        let skills = defaults
            .iter()
            .enumerate()
            .map(|(i, &(default_name, description))| {
                let entry = list.and_then(|l| l.get(i)).unwrap_or(&Value::Null);
                let full_name = str_field(entry, "full_name", "");
                if full_name.is_empty() {
                    return None;
                }
                Some(Skill {
                    full_name: full_name.to_string(),
                    option_name: str_field(entry, "option_name", default_name).to_string(),
                    description,
                    aliases: entry
                        .get("aliases")
                        .and_then(Value::as_array)
                        .map(|a| a.iter().filter_map(Value::as_str).map(str::to_string).collect())
                        .unwrap_or_default(),
                })
            })
            .collect();

        Difficulty::Custom {
            skill_5_warning: str_field(json, "skill_5_warning", "").to_string(),
            skills,
        }
    }
}

impl WorldOption for Difficulty {
    fn emit_options(&self) -> Vec<PyOption> {
        let (skill_5_warning, skills) = match self {
            Difficulty::Preset(class) => return vec![PyOption::common("difficulty", class).with_group(GROUP)],
            Difficulty::Custom {
                skill_5_warning,
                skills,
            } => (skill_5_warning, skills),
        };

        let mut opt = PyOption::new("difficulty", "Difficulty", PyOptionKind::Choice).with_group(GROUP);
        opt.docstring.push("Choose the game difficulty (skill level).".to_string());
        opt.docstring.push(String::new());

        let mut choices = Vec::new();
        let mut aliases = Vec::new();
        for (i, skill) in skills.iter().enumerate() {
            let Some(skill) = skill else { continue };
            opt.docstring.push(format!(
                "**{}**: ({}) - {}",
                skill.option_name, skill.full_name, skill.description
            ));
            choices.push(format!("option_{} = {i}", to_snake_case(&skill.option_name)));
            aliases.extend(
                skill
                    .aliases
                    .iter()
                    .map(|alias| format!("alias_{} = {i}", to_snake_case(alias))),
            );
        }

        if !skill_5_warning.is_empty() {
            opt.option_list.push(format!("skill_5_warning = {}", py_quote(skill_5_warning)));
        }
        opt.option_list.extend(choices);
        opt.option_list.extend(aliases);
        opt.default_int = Some(2);
        vec![opt]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::test_support::{doom, heretic};
    use serde_json::json;

    #[test]
    fn presets_bind_shared_classes() {
        let opts = Difficulty::init(&doom(), &json!({ "preset": "Heretic" })).emit_options();
        assert_eq!(opts.len(), 1);
        assert_eq!(opts[0].output_dataclass(), "difficulty: id1Options.DifficultyHeretic");
        assert_eq!(opts[0].option_group.as_deref(), Some(GROUP));
        assert!(!opts[0].has_own_class());
    }

    #[test]
    fn custom_table_builds_choice() {
        let json = json!({
            "skill_5_warning": "Really?",
            "list": [
                { "full_name": "Too young", "aliases": ["ity td"] },
                {},
                { "full_name": "Plenty", "option_name": "Normal Mode" },
            ]
        });
        let opts = Difficulty::init(&doom(), &json).emit_options();
        let class = opts[0].output_class();

        assert!(class.starts_with("class Difficulty(BaseOptions.Choice):"));
        assert!(class.contains("    **baby**: (Too young) - Damage taken is halved."));
        assert!(class.contains("    **Normal Mode**: (Plenty) - The default skill."));
        assert!(!class.contains("**easy**"));
        assert!(class.contains(
            "    skill_5_warning = \"Really?\"\n    option_baby = 0\n    option_normal_mode = 2\n    alias_ity_td = 0\n    default = 2\n"
        ));
    }

    #[test]
    fn heretic_uses_its_own_skill_names() {
        let json = json!({ "list": [{ "full_name": "Thou needeth a wet-nurse" }] });
        let class = Difficulty::init(&heretic(), &json).emit_options()[0].output_class();
        assert!(class.contains("option_wet_nurse = 0"));
        assert!(class.contains("Quartz Flasks"));
    }

    #[test]
    fn no_hooks() {
        assert!(Difficulty::init(&doom(), &json!({})).emit_hook("fill_slot_data").is_empty());
    }
}
