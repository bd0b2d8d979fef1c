use std::collections::BTreeMap;

use super::{ObjectStore, StateStore, WorkTree};
use crate::object::{Id, Kind, Object};
use crate::{Error, Result};

/// A repository held entirely in memory.
///
/// Objects are kept in their serialized envelope form so that reads go
/// through the same decoding and verification as on-disk objects.
#[derive(Clone, Debug, Default)]
pub struct InMemory {
    initialized: bool,
    objects: BTreeMap<Id, Vec<u8>>,
    state: BTreeMap<String, Vec<u8>>,
    files: BTreeMap<String, Vec<u8>>,
}

impl InMemory {
    pub fn new() -> InMemory {
        InMemory::default()
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl ObjectStore for InMemory {
    fn put_object(&mut self, object: &Object) -> Result<Id> {
        let id = object.id();
        self.objects
            .entry(id)
            .or_insert_with(|| object.to_envelope());
        Ok(id)
    }

    fn get_object(&self, id: &Id) -> Result<Object> {
        let envelope = self.objects.get(id).ok_or(Error::MissingObject(*id))?;
        Object::from_envelope(envelope, Some(id))
    }

    fn object_kind(&self, id: &Id) -> Result<Kind> {
        let envelope = self.objects.get(id).ok_or(Error::MissingObject(*id))?;
        Object::peek_kind(envelope)
    }

    fn has_object(&self, id: &Id) -> Result<bool> {
        Ok(self.objects.contains_key(id))
    }

    fn object_ids(&self) -> Result<Vec<Id>> {
        Ok(self.objects.keys().copied().collect())
    }
}

impl StateStore for InMemory {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }
        self.initialized = true;
        Ok(())
    }

    fn load_state(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.state.get(name).cloned())
    }

    fn save_state(&mut self, name: &str, content: &[u8]) -> Result<()> {
        self.state.insert(name.to_string(), content.to_vec());
        Ok(())
    }
}

impl WorkTree for InMemory {
    fn work_files(&self) -> Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn read_work_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.files.get(path).cloned())
    }

    fn write_work_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        self.files.insert(path.to_string(), content.to_vec());
        Ok(())
    }

    fn remove_work_file(&mut self, path: &str) -> Result<()> {
        self.files.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_is_idempotent() {
        let mut m = InMemory::new();
        let first = m.put_blob(b"hello".to_vec()).unwrap();
        let second = m.put_blob(b"hello".to_vec()).unwrap();

        assert_eq!(first, second);
        assert_eq!(m.object_count(), 1);
        assert!(m.has_object(&first).unwrap());
        assert_eq!(m.get_blob(&first).unwrap(), b"hello");
    }

    #[test]
    fn missing_object() {
        let m = InMemory::new();
        let id = Object::blob(b"nope".to_vec()).id();

        assert!(!m.has_object(&id).unwrap());
        assert!(matches!(m.get_object(&id), Err(Error::MissingObject(x)) if x == id));
    }

    #[test]
    fn get_blob_rejects_commit() {
        let mut m = InMemory::new();
        let id = m
            .put_object(&Object::new(Kind::Commit, b"{}".to_vec()))
            .unwrap();
        assert!(matches!(m.get_blob(&id), Err(Error::CorruptObject(_))));
    }

    #[test]
    fn initialize_once() {
        let mut m = InMemory::new();
        assert!(!m.is_initialized());
        m.initialize().unwrap();
        assert!(m.is_initialized());
        assert!(matches!(m.initialize(), Err(Error::AlreadyInitialized)));
    }

    #[test]
    fn work_tree() {
        let mut m = InMemory::new();
        m.write_work_file("b", b"2").unwrap();
        m.write_work_file("a", b"1").unwrap();

        assert_eq!(m.work_files().unwrap(), vec!["a", "b"]);
        assert_eq!(m.read_work_file("a").unwrap(), Some(b"1".to_vec()));

        m.remove_work_file("a").unwrap();
        m.remove_work_file("a").unwrap();
        assert_eq!(m.read_work_file("a").unwrap(), None);
    }
}
