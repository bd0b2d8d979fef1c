//! Storage mechanisms for a twig repository.
//!
//! ## Design Goals
//!
//! The engine never touches the file system directly. Everything it persists
//! or reads goes through three small traits:
//!
//! * [`ObjectStore`]: content-addressed, append-only object storage.
//! * [`StateStore`]: the few mutable records (branch table, active branch,
//!   staging area) that live beside the objects.
//! * [`WorkTree`]: the user's working files.
//!
//! [`OnDisk`] implements all three against a real directory. [`InMemory`]
//! implements them with maps, so graph walks and merge classification can be
//! tested without disk I/O.

use crate::commit::Commit;
use crate::object::{Id, Kind, Object};
use crate::{Error, Result};

mod memory;
pub use memory::InMemory;

mod on_disk;
pub use on_disk::OnDisk;

/// Content-addressed object storage.
///
/// The required methods are the primitives a storage mechanism must provide.
/// Objects are never updated or deleted once written.
pub trait ObjectStore {
    /// Stores `object`, returning its ID.
    ///
    /// Idempotent: storing an object that already exists is a no-op.
    fn put_object(&mut self, object: &Object) -> Result<Id>;

    /// Reads the object with the given ID.
    ///
    /// Fails with [`Error::MissingObject`] if no such object exists.
    fn get_object(&self, id: &Id) -> Result<Object>;

    /// Returns the kind of the object with the given ID, reading no more of it
    /// than its header. The content is not verified.
    ///
    /// Fails with [`Error::MissingObject`] if no such object exists.
    fn object_kind(&self, id: &Id) -> Result<Kind>;

    /// Returns true if an object with the given ID exists.
    fn has_object(&self, id: &Id) -> Result<bool>;

    /// Lists the IDs of every stored object, in ascending order.
    fn object_ids(&self) -> Result<Vec<Id>>;

    /// Stores `content` as a blob.
    fn put_blob(&mut self, content: Vec<u8>) -> Result<Id> {
        self.put_object(&Object::blob(content))
    }

    /// Reads the content of a blob.
    fn get_blob(&self, id: &Id) -> Result<Vec<u8>> {
        let object = self.get_object(id)?;
        if object.kind() != Kind::Blob {
            return Err(Error::CorruptObject(format!("{} is not a blob", id)));
        }
        Ok(object.into_content())
    }

    /// Stores a commit.
    fn put_commit(&mut self, commit: &Commit) -> Result<Id> {
        self.put_object(&commit.to_object()?)
    }

    /// Reads a commit.
    fn get_commit(&self, id: &Id) -> Result<Commit> {
        Commit::from_object(&self.get_object(id)?)
    }
}

/// Named mutable records stored beside the objects.
pub trait StateStore {
    /// Returns true if the repository storage exists.
    fn is_initialized(&self) -> bool;

    /// Creates empty repository storage.
    ///
    /// Fails with [`Error::AlreadyInitialized`] if it already exists.
    fn initialize(&mut self) -> Result<()>;

    /// Reads a record, or `None` if it has never been saved.
    fn load_state(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Replaces a record. The replacement is atomic: readers see either the
    /// old or the new content.
    fn save_state(&mut self, name: &str, content: &[u8]) -> Result<()>;
}

/// The user's working files, addressed by plain file name.
pub trait WorkTree {
    /// Lists working files, in ascending order. Repository storage is never listed.
    fn work_files(&self) -> Result<Vec<String>>;

    /// Reads a working file, or `None` if it doesn't exist.
    fn read_work_file(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Creates or overwrites a working file.
    fn write_work_file(&mut self, path: &str, content: &[u8]) -> Result<()>;

    /// Deletes a working file. Deleting a missing file is not an error.
    fn remove_work_file(&mut self, path: &str) -> Result<()>;
}

/// Everything a [`Repository`](crate::Repository) needs from its storage.
pub trait Backend: ObjectStore + StateStore + WorkTree {}

impl<T: ObjectStore + StateStore + WorkTree> Backend for T {}
