//! The whole pipeline: catalog, regions, documents, Python sources, sink.

use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::catalog::{self, Catalog, Level};
use crate::checks;
use crate::config::GameConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::documents;
use crate::level::GameLevels;
use crate::options::{InitializedOptions, WorldOptionRegistry};
use crate::output::{JsonStyle, OutputSink};
use crate::python::{self, PyOption, PyOptionKind};
use crate::regions;
use crate::{GenError, Result};

const GOAL_GROUP: &str = "Goal Options";
const EPISODE_GROUP: &str = "Episodes to Play";

#[derive(Clone, Debug)]
pub struct GenerateOptions {
    /// Blank lines written after every injected hook block.
    pub hook_spacing: usize,
    /// Directory holding the shared `id1common` Python module.
    pub common_module: Option<PathBuf>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            hook_spacing: 1,
            common_module: None,
        }
    }
}

#[derive(Debug)]
pub struct GenerationReport {
    pub output_label: String,
    pub location_count: usize,
    pub item_count: usize,
    pub diagnostics: Diagnostics,
}

/// Compiles one game into `sink` and finalizes it.
///
/// Validation failures return [`GenError::Validation`] before the sink sees
/// a single write.
pub fn generate(
    game: &GameConfig,
    level_data: &GameLevels,
    sink: &mut dyn OutputSink,
    opts: &GenerateOptions,
) -> Result<GenerationReport> {
    let started = Instant::now();
    let mut diag = Diagnostics::new();

    let world_options = WorldOptionRegistry::builtin().init(game, &mut diag);
    let levels = catalog::collect_levels(game, level_data)?;

    let mut catalog = Catalog::compile(game, &levels, &mut diag);
    regions::bind_locations(&mut catalog, &levels, &mut diag);
    catalog.apply_legacy_remap(game);
    catalog.sort_by_id();
    catalog.drop_duplicate_ids(&mut diag);

    if let Err(failures) = checks::validate(game, &catalog) {
        for failure in &failures {
            error!("{failure}");
        }
        return Err(GenError::Validation(failures));
    }

    let region_docs = regions::serialize_regions(game, &levels, &mut diag);
    info!(
        levels = levels.len(),
        items = catalog.items.len(),
        locations = catalog.locations.len(),
        regions = region_docs.len(),
        "catalog compiled"
    );

    let assembled = Instant::now();
    let world = &game.ap_world_name;

    let data = documents::data_document(game, &levels, &catalog, &region_docs)?;
    sink.add_json(&format!("{world}/{}.data.json", game.short_name), &data, JsonStyle::Pretty)?;

    let wads_included = add_included_wads(game, sink, &mut diag);

    let definitions_path = format!("{world}/{}.game.json", game.short_name);
    let definitions = documents::game_definitions(game, &levels, &catalog);
    sink.add_json(&definitions_path, &definitions, JsonStyle::Compact)?;

    let launcher = documents::launcher_info(game, &wads_included, &definitions_path);
    let manifest = documents::manifest(game, launcher, sink.includes_manifest_version(), Local::now());
    sink.add_json(&format!("{world}/archipelago.json"), &manifest, JsonStyle::Compact)?;

    let mut py_options = builtin_options(game, &levels);
    py_options.extend(world_options.option_descriptors());
    sink.add_text(&format!("{world}/options.py"), &python::render_options_py(game, &py_options))?;
    sink.add_text(
        &format!("{world}/__init__.py"),
        &render_init(game, &world_options, opts.hook_spacing),
    )?;

    match &opts.common_module {
        Some(dir) => add_common_module(dir, &format!("{world}/id1common"), sink, &mut diag),
        None => warn!("no common module given; the package will not import on its own"),
    }

    let output_label = sink.output_label();
    for failed in sink.finalize()? {
        diag.record(DiagnosticKind::UnreadableAsset, format!("Failed write: {failed}"));
    }

    let finished = Instant::now();
    info!(
        "Generation complete: {:.3} sec. total, {:.3} sec. assembling, {:.3} sec. output",
        (finished - started).as_secs_f64(),
        (assembled - started).as_secs_f64(),
        (finished - assembled).as_secs_f64()
    );
    info!("Created world '{output_label}' successfully");

    Ok(GenerationReport {
        output_label,
        location_count: catalog.locations.len(),
        item_count: catalog.items.len(),
        diagnostics: diag,
    })
}

fn render_init(game: &GameConfig, world_options: &InitializedOptions, spacing: usize) -> String {
    python::render_init_py(game, |hook| world_options.hook_lines(game, hook, spacing))
}

/// Copies each extra data file to `<world>/wad/` and returns the paths that
/// made it into the package.
fn add_included_wads(game: &GameConfig, sink: &mut dyn OutputSink, diag: &mut Diagnostics) -> Vec<String> {
    let mut included = Vec::new();
    for wad_path in &game.included_wads {
        let file_name = wad_path.rsplit('/').next().unwrap_or(wad_path);
        let dest = format!("{}/wad/{file_name}", game.ap_world_name);
        match sink.add_file(&dest, Path::new(wad_path)) {
            Ok(()) => included.push(dest),
            Err(e) => diag.record(
                DiagnosticKind::UnreadableAsset,
                format!("Couldn't add {wad_path} to the APWorld! ({e})"),
            ),
        }
    }
    included
}

fn add_common_module(dir: &Path, dest_root: &str, sink: &mut dyn OutputSink, diag: &mut Diagnostics) {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                diag.record(
                    DiagnosticKind::UnreadableAsset,
                    format!("Couldn't read the id1common module: {e}"),
                );
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let rel: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let dest = format!("{dest_root}/{}", rel.join("/"));

        debug!("adding {}", dest);
        if let Err(e) = sink.add_file(&dest, entry.path()) {
            diag.record(
                DiagnosticKind::UnreadableAsset,
                format!("Couldn't add {} to the APWorld! ({e})", entry.path().display()),
            );
        }
    }
}

/// Options every generated world has, ahead of the world-option plugins.
pub fn builtin_options(game: &GameConfig, levels: &[Level<'_>]) -> Vec<PyOption> {
    let mut opts = Vec::new();

    let mut num_levels = PyOption::new("goal_num_levels", "Goal: Number of Levels", PyOptionKind::Range)
        .with_group(GOAL_GROUP);
    num_levels.docstring.push(
        "If 'Complete Some Levels' or 'Complete Random Levels' are chosen as the goal, this is how many levels must be completed."
            .to_string(),
    );
    num_levels.range_start = 1;
    num_levels.range_end = levels.len() as i64;
    num_levels.default_int = Some(levels.len() as i64);
    opts.push(num_levels);

    let mut specific = PyOption::new("goal_specific_levels", "Goal: Specific Levels", PyOptionKind::OptionSet)
        .with_group(GOAL_GROUP);
    specific.docstring.push(
        "If 'Complete Specific Levels' is chosen as the goal, all levels chosen here must be completed.".to_string(),
    );
    specific.option_list = levels.iter().map(|l| l.name.clone()).collect();
    for (ep, episode) in game.episodes.iter().enumerate() {
        let Some(boss) = episode.boss_level() else {
            continue;
        };
        let boss_level = usize::try_from(boss - 1)
            .ok()
            .and_then(|map| levels.iter().find(|l| l.index.episode == ep && l.index.map == map));
        if let Some(level) = boss_level {
            specific.default_list.push(level.name.clone());
        }
    }
    opts.push(specific);

    // A single episode is always played; no point offering it.
    if game.episodes.len() > 1 {
        for (ep, episode) in game.episodes.iter().enumerate() {
            let mut opt = PyOption::new(
                &format!("episode{}", ep + 1),
                &format!("Episode {}", ep + 1),
                PyOptionKind::Episode,
            )
            .with_group(EPISODE_GROUP);
            opt.docstring.push(format!("{}.", episode.display_name(ep)));
            if episode.minor {
                opt.docstring
                    .push("This is a minor episode. Another episode must be played alongside this one.".to_string());
            }
            opt.docstring.push(String::new());
            opt.docstring.push("This episode includes the following levels:".to_string());
            opt.docstring.extend(
                levels
                    .iter()
                    .filter(|l| l.index.episode == ep)
                    .map(|l| format!("- {}", l.name)),
            );
            opt.is_minor_episode = episode.minor;
            opt.default_int = Some(i64::from(episode.default_enabled));
            opts.push(opt);
        }
    }

    if game.is_heretic() {
        opts.push(PyOption::bound("flip_levels", PyOptionKind::Removed));
    }
    if game.settings.check_sanity {
        opts.push(PyOption::bound("check_sanity", PyOptionKind::CheckSanity));
    }
    opts
}
