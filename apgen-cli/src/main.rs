use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use apgen_core::level::GameLevels;
use apgen_core::{generate, FolderSink, GameConfig, GenError, GenerateOptions, OutputSink, ZipSink};

#[derive(Debug, Parser)]
#[command(name = "apgen", version, about = "Builds an Archipelago apworld from authored level rules")]
struct Args {
    /// Game definition JSON.
    #[arg(long)]
    game: PathBuf,

    /// Parsed maps and rule graphs, one entry per episode and map.
    #[arg(long)]
    levels: PathBuf,

    /// Directory of the shared id1common Python module.
    #[arg(long)]
    common_module: Option<PathBuf>,

    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Write into an Archipelago worlds folder instead of an .apworld.
    #[arg(long, value_name = "DIR")]
    world_folder: Option<PathBuf>,

    /// Blank lines after each injected hook block.
    #[arg(long, default_value_t = 1)]
    hook_spacing: usize,
}

fn read_text(path: &Path) -> apgen_core::Result<String> {
    fs::read_to_string(path).map_err(|e| GenError::Config(format!("{}: {e}", path.display())))
}

fn run(args: Args) -> apgen_core::Result<()> {
    let game = GameConfig::from_json(&read_text(&args.game)?)?;
    tracing::info!(game = %game.short_name, levels = game.level_count(), "loaded game definition");

    // Checked before any compilation work.
    let mut sink: Box<dyn OutputSink> = match &args.world_folder {
        Some(dir) => Box::new(FolderSink::new(dir, &game.ap_world_name)?),
        None => Box::new(ZipSink::new(
            args.output_dir.join(format!("{}.apworld", game.ap_world_name)),
        )),
    };

    let levels = GameLevels::from_json(&read_text(&args.levels)?)?;
    let opts = GenerateOptions {
        hook_spacing: args.hook_spacing,
        common_module: args.common_module,
    };

    let report = generate(&game, &levels, sink.as_mut(), &opts)?;

    for line in report.diagnostics.summary() {
        println!("{line}");
    }
    println!(
        "Created world '{}' ({} locations, {} items)",
        report.output_label, report.location_count, report.item_count
    );
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apgen=info,apgen_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if let Err(err) = run(args) {
        if let GenError::Validation(failures) = &err {
            for failure in failures {
                eprintln!("  {failure}");
            }
        }
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
