use std::path::PathBuf;
use thiserror::Error;

pub mod catalog;
pub mod checks;
pub mod config;
pub mod diagnostics;
pub mod documents;
pub mod generate;
pub mod ids;
pub mod level;
pub mod options;
pub mod output;
pub mod python;
pub mod regions;

pub use catalog::{Catalog, Classification, EntityKind, Item, Location};
pub use checks::ValidationFailure;
pub use config::GameConfig;
pub use diagnostics::Diagnostics;
pub use generate::{generate, GenerateOptions, GenerationReport};
pub use level::{LevelData, LevelIndex};
pub use output::{FolderSink, JsonStyle, OutputSink, ZipSink};

#[derive(Debug, Error)]
pub enum GenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{}: folder does not appear to be a valid worlds folder", path.display())]
    InvalidDestination { path: PathBuf },
    #[error("{} validation error(s) prevented generation", .0.len())]
    Validation(Vec<ValidationFailure>),
    #[error("couldn't create '{label}': {source}")]
    Finalize {
        label: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, GenError>;
