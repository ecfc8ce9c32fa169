use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

use super::{FailedWrite, OutputSink};
use crate::{GenError, Result};

/// Files that must already exist in a checkout of the worlds folder.
const MARKER_FILES: [&str; 2] = ["__init__.py", "AutoWorld.py"];

enum Pending {
    Text { dest: PathBuf, content: String },
    Copy { dest: PathBuf, source: PathBuf },
}

/// Writes the package into an existing worlds folder instead of an archive.
///
/// Writes are queued and applied together in `finalize`.
pub struct FolderSink {
    base: PathBuf,
    world_name: String,
    pending: Vec<Pending>,
}

impl FolderSink {
    pub fn new(base: impl Into<PathBuf>, world_name: &str) -> Result<Self> {
        let base = base.into();
        if !base.is_dir() || MARKER_FILES.iter().any(|f| !base.join(f).is_file()) {
            return Err(GenError::InvalidDestination { path: base });
        }
        Ok(Self {
            base,
            world_name: world_name.to_string(),
            pending: Vec::new(),
        })
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let rel = Path::new(path);
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(GenError::Config(format!("output path '{path}' is not relative to the world")));
        }
        Ok(self.base.join(rel))
    }
}

impl Pending {
    fn dest(&self) -> &Path {
        match self {
            Pending::Text { dest, .. } | Pending::Copy { dest, .. } => dest,
        }
    }
}

fn apply(pending: &Pending) -> io::Result<()> {
    match pending {
        Pending::Text { dest, content } => {
            create_parent(dest)?;
            fs::write(dest, content)
        }
        Pending::Copy { dest, source } => {
            let source_time = fs::metadata(source)?.modified()?;
            if is_up_to_date(dest, source_time) {
                debug!("{} is up to date", dest.display());
                return Ok(());
            }
            create_parent(dest)?;
            fs::copy(source, dest)?;
            fs::File::options().write(true).open(dest)?.set_modified(source_time)
        }
    }
}

fn create_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

fn is_up_to_date(dest: &Path, source_time: SystemTime) -> bool {
    fs::metadata(dest)
        .and_then(|m| m.modified())
        .map(|dest_time| dest_time >= source_time)
        .unwrap_or(false)
}

impl OutputSink for FolderSink {
    fn add_text(&mut self, path: &str, content: &str) -> Result<()> {
        let dest = self.resolve(path)?;
        self.pending.push(Pending::Text {
            dest,
            content: content.to_string(),
        });
        Ok(())
    }

    fn add_file(&mut self, dest: &str, source: &Path) -> Result<()> {
        let dest = self.resolve(dest)?;
        if !source.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, format!("{}: no such file", source.display())).into());
        }
        self.pending.push(Pending::Copy {
            dest,
            source: source.to_path_buf(),
        });
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<FailedWrite>> {
        fs::create_dir_all(self.base.join(&self.world_name)).map_err(|source| GenError::Finalize {
            label: self.output_label(),
            source,
        })?;

        let mut failed = Vec::new();
        for pending in self.pending.drain(..) {
            if let Err(source) = apply(&pending) {
                let path = pending.dest().to_path_buf();
                warn!("couldn't write {}: {source}", path.display());
                failed.push(FailedWrite { path, source });
            }
        }
        info!(
            "wrote files under {} ({} failed)",
            self.base.join(&self.world_name).display(),
            failed.len()
        );
        Ok(failed)
    }

    fn output_label(&self) -> String {
        self.base.join(&self.world_name).display().to_string()
    }

    fn includes_manifest_version(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn worlds_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for marker in MARKER_FILES {
            fs::write(dir.path().join(marker), "").unwrap();
        }
        dir
    }

    #[test]
    fn rejects_folder_without_markers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("__init__.py"), "").unwrap();
        assert!(matches!(
            FolderSink::new(dir.path(), "doom"),
            Err(GenError::InvalidDestination { .. })
        ));
    }

    #[test]
    fn nothing_lands_before_finalize() {
        let dir = worlds_dir();
        let mut sink = FolderSink::new(dir.path(), "doom").unwrap();
        sink.add_text("doom/options.py", "x = 1\n").unwrap();
        assert!(!dir.path().join("doom").exists());

        assert!(sink.finalize().unwrap().is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("doom/options.py")).unwrap(), "x = 1\n");
        assert!(sink.output_label().ends_with("doom"));
        assert!(!sink.includes_manifest_version());
    }

    #[test]
    fn rejects_paths_escaping_the_base() {
        let dir = worlds_dir();
        let mut sink = FolderSink::new(dir.path(), "doom").unwrap();
        assert!(matches!(sink.add_text("../evil.py", ""), Err(GenError::Config(_))));
        assert!(matches!(sink.add_text("/abs.py", ""), Err(GenError::Config(_))));
    }

    #[test]
    fn copies_preserve_mtime_and_skip_when_current() {
        let dir = worlds_dir();
        let source = dir.path().join("src.wad");
        fs::write(&source, b"PWAD").unwrap();
        let old = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options().write(true).open(&source).unwrap().set_modified(old).unwrap();

        let mut sink = FolderSink::new(dir.path(), "doom").unwrap();
        sink.add_file("doom/wad/src.wad", &source).unwrap();
        sink.finalize().unwrap();

        let dest = dir.path().join("doom/wad/src.wad");
        assert_eq!(fs::read(&dest).unwrap(), b"PWAD");
        let copied = fs::metadata(&dest).unwrap().modified().unwrap();
        let drift = copied.duration_since(old).unwrap_or_else(|e| e.duration());
        assert!(drift < Duration::from_secs(2));

        fs::write(&dest, b"LOCAL").unwrap();
        sink.add_file("doom/wad/src.wad", &source).unwrap();
        sink.finalize().unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"LOCAL");
    }

    #[test]
    fn one_bad_destination_does_not_stop_the_rest() {
        let dir = worlds_dir();
        fs::create_dir_all(dir.path().join("doom/b.py")).unwrap();

        let mut sink = FolderSink::new(dir.path(), "doom").unwrap();
        sink.add_text("doom/a.py", "a = 1\n").unwrap();
        sink.add_text("doom/b.py", "b = 1\n").unwrap();
        sink.add_text("doom/c.py", "c = 1\n").unwrap();

        let failed = sink.finalize().unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].path, dir.path().join("doom/b.py"));
        assert_eq!(fs::read_to_string(dir.path().join("doom/a.py")).unwrap(), "a = 1\n");
        assert_eq!(fs::read_to_string(dir.path().join("doom/c.py")).unwrap(), "c = 1\n");
        assert!(dir.path().join("doom/b.py").is_dir());
    }

    #[test]
    fn unusable_world_folder_fails_the_whole_target() {
        let dir = worlds_dir();
        fs::write(dir.path().join("doom"), b"not a folder").unwrap();

        let mut sink = FolderSink::new(dir.path(), "doom").unwrap();
        sink.add_text("doom/a.py", "").unwrap();
        assert!(matches!(sink.finalize(), Err(GenError::Finalize { .. })));
    }
}
