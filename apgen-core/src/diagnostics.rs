//! Warnings and per-entity errors collected during a run.
//!
//! Every entry is logged through `tracing` as it is recorded; the counts are
//! surfaced to the caller afterwards as a short summary.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    /// The entity was dropped; the run continues.
    EntityError,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    UnknownWorldOption,
    LevelWithoutExit,
    UnboundLocation,
    UnreadableAsset,
    LocationOverflow,
    MissingSector,
    UnresolvedConnection,
    DuplicateId,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::UnknownWorldOption
            | DiagnosticKind::LevelWithoutExit
            | DiagnosticKind::UnboundLocation
            | DiagnosticKind::UnreadableAsset => Severity::Warning,
            DiagnosticKind::LocationOverflow
            | DiagnosticKind::MissingSector
            | DiagnosticKind::UnresolvedConnection
            | DiagnosticKind::DuplicateId => Severity::EntityError,
        }
    }

    fn summary(self, count: usize) -> String {
        match self {
            DiagnosticKind::UnknownWorldOption => {
                format!("{count} unknown world option(s) found.")
            }
            DiagnosticKind::LevelWithoutExit => {
                format!("{count} level(s) are missing Exit connections.")
            }
            DiagnosticKind::UnboundLocation => {
                format!("{count} location(s) are not associated with any regions.")
            }
            DiagnosticKind::UnreadableAsset => {
                format!("{count} file(s) couldn't be added to the output.")
            }
            DiagnosticKind::LocationOverflow => {
                format!("{count} location(s) dropped: too many locations in one level.")
            }
            DiagnosticKind::MissingSector => {
                format!("{count} location(s) dropped: no sector at their position.")
            }
            DiagnosticKind::UnresolvedConnection => {
                format!("{count} connection(s) dropped: unresolved requirement or target.")
            }
            DiagnosticKind::DuplicateId => {
                format!("{count} item(s) or location(s) dropped: id already in use.")
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        match kind.severity() {
            Severity::Warning => tracing::warn!(?kind, "{}", message),
            Severity::EntityError => tracing::error!(?kind, "{}", message),
        }
        self.entries.push(Diagnostic { kind, message });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.kind.severity() == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.entries.len() - self.warning_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One line per kind that occurred, in a fixed order.
    pub fn summary(&self) -> Vec<String> {
        const ORDER: [DiagnosticKind; 8] = [
            DiagnosticKind::UnknownWorldOption,
            DiagnosticKind::LevelWithoutExit,
            DiagnosticKind::UnboundLocation,
            DiagnosticKind::UnreadableAsset,
            DiagnosticKind::LocationOverflow,
            DiagnosticKind::MissingSector,
            DiagnosticKind::UnresolvedConnection,
            DiagnosticKind::DuplicateId,
        ];

        ORDER
            .iter()
            .filter_map(|&kind| match self.count(kind) {
                0 => None,
                n => Some(kind.summary(n)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_by_kind() {
        let mut diag = Diagnostics::new();
        diag.record(DiagnosticKind::LevelWithoutExit, "E1M1 has no exit");
        diag.record(DiagnosticKind::LevelWithoutExit, "E1M2 has no exit");
        diag.record(DiagnosticKind::MissingSector, "lost");

        assert_eq!(diag.warning_count(), 2);
        assert_eq!(diag.error_count(), 1);
        assert_eq!(
            diag.summary(),
            vec![
                "2 level(s) are missing Exit connections.".to_string(),
                "1 location(s) dropped: no sector at their position.".to_string(),
            ]
        );
    }
}
