//! Python source rendering for the generated world package.
//!
//! Two files come out of here: `options.py`, built from a list of
//! [`PyOption`] descriptors, and `__init__.py`, the world class with hook
//! lines spliced into its methods.

use std::fmt::Write as _;

use crate::config::GameConfig;

/// `Partial invisibility` -> `partial_invisibility`.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out
}

/// `computer area maps` -> `Computer Area Maps`.
pub fn to_title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut capitalize = true;
    for c in name.chars() {
        out.push(if capitalize { c.to_ascii_uppercase() } else { c });
        capitalize = !c.is_ascii_alphanumeric();
    }
    out
}

/// `goal_num_levels` -> `GoalNumLevels`; digits start a new word.
pub fn to_class_name(data_name: &str) -> String {
    let mut out = String::with_capacity(data_name.len());
    let mut next_upper = true;
    for c in data_name.chars() {
        if c.is_ascii_digit() {
            out.push(c);
            next_upper = true;
        } else if c.is_ascii_uppercase() {
            out.push(c);
            next_upper = false;
        } else if c.is_ascii_lowercase() {
            out.push(if next_upper { c.to_ascii_uppercase() } else { c });
            next_upper = false;
        } else {
            next_upper = true;
        }
    }
    out
}

pub fn py_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Joins lines, each indented and newline-terminated. Blank lines stay blank.
pub fn indent_join(lines: &[String], indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = String::new();
    for line in lines {
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PyOptionKind {
    Removed,
    /// A class that already exists in the shared `id1common` options module.
    InCommon(String),
    Toggle,
    Choice,
    Range,
    OptionSet,
    CheckSanity,
    Episode,
    InvisibilityTrap,
    StartWithMaps,
    CapacitySplit,
    CapacityCount,
}

/// One option as it will appear in `options.py`.
#[derive(Clone, Debug)]
pub struct PyOption {
    pub docstring: Vec<String>,
    pub default_int: Option<i64>,
    pub default_list: Vec<String>,
    /// Choice enumerants (`name = value` lines) or set members.
    pub option_list: Vec<String>,
    pub doom_type: Option<i32>,
    pub range_start: i64,
    pub range_end: i64,
    pub is_minor_episode: bool,
    pub split_item_count: i64,
    pub option_group: Option<String>,
    kind: PyOptionKind,
    data_name: String,
    display_name: String,
    own_class: Option<String>,
}

impl PyOption {
    fn blank(data_name: &str, display_name: &str, kind: PyOptionKind) -> Self {
        Self {
            docstring: Vec::new(),
            default_int: None,
            default_list: Vec::new(),
            option_list: Vec::new(),
            doom_type: None,
            range_start: 0,
            range_end: 0,
            is_minor_episode: false,
            split_item_count: 0,
            option_group: None,
            kind,
            data_name: data_name.to_string(),
            display_name: display_name.to_string(),
            own_class: None,
        }
    }

    /// An option that only binds a field to an existing class.
    pub fn bound(data_name: &str, kind: PyOptionKind) -> Self {
        Self::blank(data_name, "", kind)
    }

    pub fn common(data_name: &str, class_name: &str) -> Self {
        Self::bound(data_name, PyOptionKind::InCommon(class_name.to_string()))
    }

    /// An option that gets its own class, named after `data_name`.
    pub fn new(data_name: &str, display_name: &str, kind: PyOptionKind) -> Self {
        let mut opt = Self::blank(data_name, display_name, kind);
        if !matches!(opt.kind, PyOptionKind::Removed | PyOptionKind::InCommon(_)) {
            opt.own_class = Some(to_class_name(data_name));
        }
        opt
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.option_group = Some(group.to_string());
        self
    }

    pub fn data_name(&self) -> &str {
        &self.data_name
    }

    pub fn has_own_class(&self) -> bool {
        self.own_class.is_some()
    }

    fn default_or(&self, fallback: i64) -> i64 {
        self.default_int.unwrap_or(fallback)
    }

    pub fn base_class(&self) -> String {
        let name = match &self.kind {
            PyOptionKind::Removed => "BaseOptions.Removed",
            PyOptionKind::InCommon(class) => return format!("id1Options.{class}"),
            PyOptionKind::Toggle if self.default_or(0) != 0 => "BaseOptions.DefaultOnToggle",
            PyOptionKind::Toggle => "BaseOptions.Toggle",
            PyOptionKind::Choice => "BaseOptions.Choice",
            PyOptionKind::Range => "BaseOptions.Range",
            PyOptionKind::OptionSet => "BaseOptions.OptionSet",
            PyOptionKind::CheckSanity => "id1Options.CheckSanity",
            PyOptionKind::Episode => match (self.is_minor_episode, self.default_or(0) != 0) {
                (true, true) => "id1Options.MinorDefaultEpisode",
                (true, false) => "id1Options.MinorEpisode",
                (false, true) => "id1Options.DefaultEpisode",
                (false, false) => "id1Options.Episode",
            },
            PyOptionKind::InvisibilityTrap => "id1Options.PartialInvisibilityAsTrap",
            PyOptionKind::StartWithMaps => "id1Options.StartWithComputerAreaMaps",
            PyOptionKind::CapacitySplit if self.split_item_count == 6 => "id1Options.SplitBagOfHolding",
            PyOptionKind::CapacitySplit => "id1Options.SplitBackpack",
            PyOptionKind::CapacityCount => "id1Options.BackpackCount",
        };
        name.to_string()
    }

    pub fn class_name(&self) -> String {
        self.own_class.clone().unwrap_or_else(|| self.base_class())
    }

    /// The class block, or nothing for options without their own class.
    pub fn output_class(&self) -> String {
        let Some(class_name) = &self.own_class else {
            return String::new();
        };

        let mut out = String::new();
        let _ = writeln!(out, "class {class_name}({}):", self.base_class());
        out.push_str("    \"\"\"\n");
        out.push_str(&indent_join(&self.docstring, 4));
        out.push_str("    \"\"\"\n");
        let _ = writeln!(out, "    display_name = {}", py_quote(&self.display_name));

        if let Some(doom_type) = self.doom_type {
            let _ = writeln!(out, "    doom_type = {doom_type}");
        }

        match self.kind {
            PyOptionKind::Choice => {
                for opt in self.option_list.iter().filter(|o| o.contains('=')) {
                    let _ = writeln!(out, "    {opt}");
                }
                let _ = writeln!(out, "    default = {}", self.default_or(0));
            }
            PyOptionKind::Range => {
                let _ = writeln!(out, "    range_start = {}", self.range_start);
                let _ = writeln!(out, "    range_end = {}", self.range_end);
                let _ = writeln!(out, "    default = {}", self.default_or(self.range_end));
            }
            PyOptionKind::OptionSet => {
                out.push_str("    valid_keys = frozenset({\n");
                for opt in &self.option_list {
                    let _ = writeln!(out, "        {},", py_quote(opt));
                }
                out.push_str("    })\n");
                out.push_str("    default = frozenset({\n");
                for opt in &self.default_list {
                    let _ = writeln!(out, "        {},", py_quote(opt));
                }
                out.push_str("    })\n");
            }
            PyOptionKind::CapacitySplit if self.split_item_count != 4 && self.split_item_count != 6 => {
                let types: Vec<String> = (1..=self.split_item_count).map(|i| (65_000 + i).to_string()).collect();
                let _ = writeln!(out, "    split_doom_types = [{}]", types.join(", "));
            }
            _ => {}
        }

        out.push_str("\n\n");
        out
    }

    pub fn output_dataclass(&self) -> String {
        let mut line = format!("{}: {}", self.data_name, self.class_name());
        if matches!(
            self.data_name.as_str(),
            "goal_num_levels" | "goal_specific_levels" | "flip_levels"
        ) {
            line.push_str("  # type: ignore[assignment]");
        }
        line
    }
}

fn header(game: &GameConfig, what: &str) -> String {
    format!(
        "# {what} for {}.\n# This file is generated; edits will be lost the next time the world is built.\n\n",
        game.full_name()
    )
}

/// Renders `options.py`.
pub fn render_options_py(game: &GameConfig, options: &[PyOption]) -> String {
    let mut out = header(game, "Options");
    out.push_str("import typing\n");
    out.push_str("from dataclasses import dataclass\n\n");
    out.push_str("import Options as BaseOptions\n");
    out.push_str("from .id1common import options as id1Options\n\n\n");

    for opt in options {
        out.push_str(&opt.output_class());
    }

    let _ = writeln!(out, "@dataclass");
    let _ = writeln!(out, "class {}Options(id1Options.id1CommonOptions):", game.ap_class_name);
    let bindings: Vec<String> = options.iter().map(PyOption::output_dataclass).collect();
    if bindings.is_empty() {
        out.push_str("    pass\n");
    } else {
        out.push_str(&indent_join(&bindings, 4));
    }
    out.push_str("\n\n");

    // Groups in order of first appearance.
    let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
    for opt in options {
        let Some(group) = opt.option_group.as_deref() else {
            continue;
        };
        match groups.iter_mut().find(|(name, _)| *name == group) {
            Some((_, members)) => members.push(opt.class_name()),
            None => groups.push((group, vec![opt.class_name()])),
        }
    }

    out.push_str("option_groups: typing.List[BaseOptions.OptionGroup] = [\n");
    for (name, members) in &groups {
        let _ = writeln!(out, "    BaseOptions.OptionGroup({}, [", py_quote(name));
        for member in members {
            let _ = writeln!(out, "        {member},");
        }
        out.push_str("    ]),\n");
    }
    out.push_str("]\n");
    out
}

/// Hook points spliced into the generated world class.
pub const HOOK_POINTS: [&str; 5] = [
    "create_item",
    "create_items",
    "generate_early",
    "set_rules",
    "fill_slot_data",
];

/// Renders `__init__.py`; `hooks` supplies the lines for each hook point.
pub fn render_init_py(game: &GameConfig, hooks: impl Fn(&str) -> Vec<String>) -> String {
    let class = &game.ap_class_name;
    let body = |hook: &str| indent_join(&hooks(hook), 8);

    let mut out = header(game, "World definition");
    out.push_str("import typing\n\n");
    out.push_str("import BaseClasses as AP\n");
    out.push_str("from worlds.AutoWorld import WebWorld\n\n");
    out.push_str("from .id1common import id1CommonWorld\n");
    let _ = writeln!(out, "from .options import {class}Options, option_groups");
    out.push_str("\n\n");

    let _ = writeln!(out, "class {class}Web(WebWorld):");
    out.push_str("    theme = \"dirt\"\n");
    out.push_str("    option_groups = option_groups\n\n\n");

    let _ = writeln!(
        out,
        "class {class}World(id1CommonWorld, import_data=(__name__, {})):",
        py_quote(&format!("{}.data.json", game.short_name))
    );
    out.push_str("    \"\"\"\n");
    out.push_str(&indent_join(&game.description(), 4));
    out.push_str("    \"\"\"\n");
    let _ = writeln!(out, "    game = {}", py_quote(&game.ap_name));
    let _ = writeln!(out, "    web = {class}Web()");
    let _ = writeln!(out, "    options_dataclass = {class}Options");
    let _ = writeln!(out, "    options: {class}Options  # type: ignore[assignment]");
    out.push('\n');

    out.push_str("    extra_connection_requirements = {\n");
    for req in &game.extra_connection_requirements {
        let _ = writeln!(
            out,
            "        {}: lambda world: bool(getattr(world.options, {}, 0)),",
            py_quote(&req.name),
            py_quote(&to_snake_case(&req.name))
        );
    }
    out.push_str("    }\n\n");

    out.push_str("    def create_item(self, name: str) -> AP.Item:\n");
    out.push_str("        item_id = self.item_name_to_id[name]\n");
    out.push_str("        item_data = self.item_table[item_id]\n");
    out.push_str("        classification = item_data.classification\n");
    out.push_str(&body("create_item"));
    out.push_str("        return AP.Item(name, classification, item_id, self.player)\n\n");

    out.push_str("    def generate_early(self) -> None:\n");
    out.push_str("        self.init_episodes()\n");
    out.push_str(&body("generate_early"));
    out.push('\n');

    out.push_str("    def create_regions(self) -> None:\n");
    out.push_str("        self.construct_regions()\n");
    out.push_str("        self.make_regions()\n\n");

    out.push_str("    def create_items(self) -> None:\n");
    out.push_str("        self.place_level_complete_items()\n");
    out.push_str("        itempool = self.construct_base_item_pool()\n\n");
    out.push_str("        def pop_from_pool(name: str) -> str | None:\n");
    out.push_str("            if name in itempool:\n");
    out.push_str("                itempool.remove(name)\n");
    out.push_str("                return name\n");
    out.push_str("            return None\n\n");
    out.push_str(&body("create_items"));
    out.push_str("        self.fill_item_pool(itempool, len(self.multiworld.get_unfilled_locations(self.player)))\n");
    out.push_str("        self.multiworld.itempool += [self.create_item(name) for name in itempool]\n\n");

    out.push_str("    def set_rules(self) -> None:\n");
    out.push_str("        self.make_rules()\n");
    out.push_str(&body("set_rules"));
    out.push('\n');

    out.push_str("    def fill_slot_data(self) -> dict[str, typing.Any]:\n");
    out.push_str("        slot_data = super().fill_slot_data()\n");
    out.push_str(&body("fill_slot_data"));
    out.push_str("        return slot_data\n");
    out
}
