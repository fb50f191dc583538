use super::naming::{generate_name, is_valid_name};
use super::MissionStore;
use anyhow::{bail, Context};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Keeps artifacts as files in one download directory.
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating download directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> anyhow::Result<PathBuf> {
        if !is_valid_name(name) {
            bail!("invalid mission name {:?}", name);
        }
        Ok(self.dir.join(name))
    }
}

/// Modification time, `None` when the file vanished in the meantime.
fn modified_at(path: &Path) -> std::io::Result<Option<SystemTime>> {
    match fs::metadata(path).and_then(|meta| meta.modified()) {
        Ok(modified) => Ok(Some(modified)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

impl MissionStore for DiskStore {
    fn put(&self, document: &[u8]) -> anyhow::Result<String> {
        let name = generate_name();
        let path = self.path_for(&name)?;
        fs::write(&path, document)
            .with_context(|| format!("writing mission {}", path.display()))?;
        debug!("stored {} ({} bytes)", path.display(), document.len());
        Ok(name)
    }

    fn take(&self, name: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let path = self.path_for(name)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("reading mission {}", path.display()))
            }
        };
        match fs::remove_file(&path) {
            Ok(()) => Ok(Some(bytes)),
            // another request collected it first
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("removing mission {}", path.display())),
        }
    }

    fn expire(&self, max_age: Duration) -> anyhow::Result<usize> {
        let now = SystemTime::now();
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("listing download directory {}", self.dir.display()))?;

        let mut removed = 0;
        for entry in entries {
            let entry = entry.context("reading download directory entry")?;
            let is_mission = entry.file_name().to_str().map_or(false, is_valid_name);
            if !is_mission {
                continue;
            }
            let modified = match modified_at(&entry.path())
                .with_context(|| format!("inspecting {}", entry.path().display()))?
            {
                Some(modified) => modified,
                // collected by a concurrent take
                None => continue,
            };
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age >= max_age {
                match fs::remove_file(entry.path()) {
                    Ok(()) => removed += 1,
                    Err(err) if err.kind() == ErrorKind::NotFound => {}
                    Err(err) => {
                        return Err(err)
                            .with_context(|| format!("expiring {}", entry.path().display()))
                    }
                }
            }
        }

        if removed > 0 {
            info!("expired {} stale missions from {}", removed, self.dir.display());
        }
        Ok(removed)
    }
}
