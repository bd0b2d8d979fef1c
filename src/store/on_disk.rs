//! A repository that stores content on the local file system.
//!
//! Layout inside the working directory:
//!
//! ```text
//! .twig/
//!   objects/d6/70460b4b4aece5915caf5c68d12f560a9fe3e4   loose objects
//!   branches                                           branch table
//!   HEAD                                               active branch name
//!   staging                                            pending adds and removals
//! ```
//!
//! Working files are the plain files directly inside the working directory.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{ObjectStore, StateStore, WorkTree};
use crate::object::{Id, Kind, Object};
use crate::{Error, Result};

/// Name of the repository directory inside the working directory.
pub const TWIG_DIR: &str = ".twig";

// Long enough for the longest kind name and the space after it.
const KIND_PEEK_LEN: u64 = 16;

/// Implementation of the storage traits on the local file system.
#[derive(Debug)]
pub struct OnDisk {
    work_dir: PathBuf,
    twig_dir: PathBuf,
}

impl OnDisk {
    /// Create an on-disk repository handle rooted at `work_dir`.
    ///
    /// Nothing is created or checked here; use
    /// [`StateStore::initialize`] to create the storage.
    pub fn new<P: AsRef<Path>>(work_dir: P) -> OnDisk {
        let work_dir = work_dir.as_ref().to_path_buf();
        let twig_dir = work_dir.join(TWIG_DIR);
        OnDisk { work_dir, twig_dir }
    }

    /// Return the working directory for this repo.
    pub fn work_dir(&self) -> &Path {
        self.work_dir.as_path()
    }

    /// Return the path to the `.twig` directory.
    pub fn twig_dir(&self) -> &Path {
        self.twig_dir.as_path()
    }

    fn objects_dir(&self) -> PathBuf {
        self.twig_dir.join("objects")
    }

    fn object_path(&self, id: &Id) -> PathBuf {
        let hex = id.to_string();
        let (dir, file) = hex.split_at(2);
        self.objects_dir().join(dir).join(file)
    }

    fn work_path(&self, path: &str) -> Result<PathBuf> {
        if path.is_empty()
            || path == "."
            || path == ".."
            || path == TWIG_DIR
            || path.contains('/')
            || path.contains('\\')
        {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("`{}` is not a plain file name", path),
            )));
        }
        Ok(self.work_dir.join(path))
    }
}

impl ObjectStore for OnDisk {
    fn put_object(&mut self, object: &Object) -> Result<Id> {
        let id = object.id();
        let path = self.object_path(&id);
        if path.exists() {
            return Ok(id);
        }

        let dir = path.parent().unwrap_or(&self.twig_dir);
        fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&object.to_envelope())?;
        temp.as_file().sync_all()?;

        match temp.persist_noclobber(&path) {
            Ok(_) => {
                debug!(%id, kind = %object.kind(), len = object.len(), "wrote object");
                Ok(id)
            }
            // Someone else wrote identical content first.
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => Ok(id),
            Err(err) => Err(err.error.into()),
        }
    }

    fn get_object(&self, id: &Id) -> Result<Object> {
        match fs::read(self.object_path(id)) {
            Ok(envelope) => Object::from_envelope(&envelope, Some(id)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(Error::MissingObject(*id)),
            Err(err) => Err(err.into()),
        }
    }

    fn object_kind(&self, id: &Id) -> Result<Kind> {
        let file = match File::open(self.object_path(id)) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::MissingObject(*id))
            }
            Err(err) => return Err(err.into()),
        };

        let mut prefix = vec![];
        file.take(KIND_PEEK_LEN).read_to_end(&mut prefix)?;
        Object::peek_kind(&prefix)
    }

    fn has_object(&self, id: &Id) -> Result<bool> {
        Ok(self.object_path(id).is_file())
    }

    fn object_ids(&self) -> Result<Vec<Id>> {
        let mut ids = vec![];

        for dir in fs::read_dir(self.objects_dir())? {
            let dir = dir?;
            if !dir.file_type()?.is_dir() {
                continue;
            }
            let prefix = dir.file_name().to_string_lossy().into_owned();

            for file in fs::read_dir(dir.path())? {
                let file = file?;
                let name = format!("{}{}", prefix, file.file_name().to_string_lossy());
                // Skip leftovers such as temp files from an interrupted write.
                if let Ok(id) = Id::from_hex(&name) {
                    ids.push(id);
                }
            }
        }

        ids.sort();
        Ok(ids)
    }
}

impl StateStore for OnDisk {
    fn is_initialized(&self) -> bool {
        self.twig_dir.is_dir()
    }

    fn initialize(&mut self) -> Result<()> {
        if self.twig_dir.exists() {
            return Err(Error::AlreadyInitialized);
        }

        fs::create_dir_all(self.objects_dir())?;
        debug!(dir = %self.twig_dir.display(), "created repository storage");
        Ok(())
    }

    fn load_state(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.twig_dir.join(name)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save_state(&mut self, name: &str, content: &[u8]) -> Result<()> {
        let mut temp = NamedTempFile::new_in(&self.twig_dir)?;
        temp.write_all(content)?;
        temp.as_file().sync_all()?;
        temp.persist(self.twig_dir.join(name))
            .map_err(|err| err.error)?;

        debug!(state = name, len = content.len(), "saved state");
        Ok(())
    }
}

impl WorkTree for OnDisk {
    fn work_files(&self) -> Result<Vec<String>> {
        let mut files = vec![];

        for entry in fs::read_dir(&self.work_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        files.sort();
        Ok(files)
    }

    fn read_work_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let path = match self.work_path(path) {
            Ok(path) => path,
            Err(_) => return Ok(None),
        };
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read(path)?))
    }

    fn write_work_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        fs::write(self.work_path(path)?, content).map_err(|e| e.into())
    }

    fn remove_work_file(&mut self, path: &str) -> Result<()> {
        match fs::remove_file(self.work_path(path)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
