use log::{debug, error};
use meshnode_rs::{MeshError, SettingsStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Settings store keeping one file per key inside a directory.
///
/// Files are named after the key in hex (`0001.bin`). Writes go to a
/// temporary file first and are renamed into place.
pub struct FileSettingsStore {
    dir: PathBuf,
}

impl FileSettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: u16) -> PathBuf {
        self.dir.join(format!("{:04x}.bin", key))
    }
}

impl SettingsStore for FileSettingsStore {
    fn init(&mut self) -> Result<(), MeshError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            error!("[SETTINGS] Cannot create {}: {}", self.dir.display(), e);
            MeshError::Storage("cannot create settings directory")
        })?;
        debug!("[SETTINGS] Using {}", self.dir.display());
        Ok(())
    }

    fn wipe(&mut self) -> Result<(), MeshError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(_) => return Err(MeshError::Storage("cannot list settings directory")),
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "bin") {
                fs::remove_file(&path)
                    .map_err(|_| MeshError::Storage("cannot remove settings file"))?;
            }
        }
        Ok(())
    }

    fn get(&mut self, key: u16) -> Result<Vec<u8>, MeshError> {
        match fs::read(self.key_path(key)) {
            Ok(blob) => Ok(blob),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(MeshError::NotFound),
            Err(_) => Err(MeshError::Storage("cannot read settings file")),
        }
    }

    fn set(&mut self, key: u16, value: &[u8]) -> Result<(), MeshError> {
        let path = self.key_path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).map_err(|_| MeshError::Storage("cannot write settings file"))?;
        fs::rename(&tmp, &path).map_err(|_| MeshError::Storage("cannot replace settings file"))
    }

    fn delete(&mut self, key: u16) -> Result<(), MeshError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(_) => Err(MeshError::Storage("cannot remove settings file")),
        }
    }
}
