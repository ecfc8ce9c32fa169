//! Whole-game checks that must pass before anything is written.

use thiserror::Error;

use crate::catalog::{Catalog, JUNK_GROUP};
use crate::config::GameConfig;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("A 'Junk' item group must exist.")]
    MissingJunkGroup,
    #[error("There must be at least one major episode.")]
    NoMajorEpisode,
    #[error("There must be at least one episode enabled by default.")]
    NoDefaultEpisode,
}

/// Runs every check and reports all failures together.
pub fn validate(game: &GameConfig, catalog: &Catalog) -> Result<(), Vec<ValidationFailure>> {
    let mut failures = Vec::new();

    if !catalog.has_group(JUNK_GROUP) {
        failures.push(ValidationFailure::MissingJunkGroup);
    }
    if game.episodes.iter().all(|ep| ep.minor) {
        failures.push(ValidationFailure::NoMajorEpisode);
    }
    if !game.episodes.iter().any(|ep| ep.default_enabled) {
        failures.push(ValidationFailure::NoDefaultEpisode);
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}
