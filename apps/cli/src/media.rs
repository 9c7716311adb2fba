//! Media folder on the local filesystem.

use recall_core::error::HostError;
use recall_core::host::MediaStore;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A flat directory of media files addressed by name.
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    dir: PathBuf,
}

impl FsMediaStore {
    /// Use `dir` as the media folder, creating it if needed.
    pub fn open<P: Into<PathBuf>>(dir: P) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, HostError> {
        let flat = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\']);
        if !flat {
            return Err(HostError::new(
                "resolving media name",
                format!("not a flat file name: {name:?}"),
            ));
        }
        Ok(self.dir.join(name))
    }
}

impl MediaStore for FsMediaStore {
    fn contains(&self, name: &str) -> Result<bool, HostError> {
        Ok(self.path_for(name)?.is_file())
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), HostError> {
        let path = self.path_for(name)?;
        // Never expose a half-written file under its final name.
        let partial = self.dir.join(format!(".{name}.partial"));
        fs::write(&partial, bytes).map_err(|e| HostError::new("writing media", e))?;
        fs::rename(&partial, &path).map_err(|e| HostError::new("writing media", e))?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "wrote media file");
        Ok(())
    }
}
