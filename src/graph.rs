//! Read-only queries over the commit DAG.

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::debug;

use crate::commit::{Commit, LogEntry};
use crate::object::{Id, Kind};
use crate::store::ObjectStore;
use crate::{Error, Result};

/// A view of the commits held by an object store.
///
/// Commits are decoded at most once per graph and cached, so repeated walks
/// over shared history stay cheap.
pub struct CommitGraph<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    cache: HashMap<Id, Commit>,
}

impl<'a, S: ObjectStore + ?Sized> CommitGraph<'a, S> {
    pub fn new(store: &'a S) -> Self {
        CommitGraph {
            store,
            cache: HashMap::new(),
        }
    }

    /// Loads the commit with the given ID.
    pub fn get(&mut self, id: &Id) -> Result<&Commit> {
        if !self.cache.contains_key(id) {
            let commit = self.store.get_commit(id)?;
            self.cache.insert(*id, commit);
        }
        Ok(&self.cache[id])
    }

    /// IDs of every stored commit, in ascending order.
    pub fn commit_ids(&mut self) -> Result<Vec<Id>> {
        let mut ids = vec![];
        for id in self.store.object_ids()? {
            if self.cache.contains_key(&id) || self.store.object_kind(&id)? == Kind::Commit {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Finds the commit named by a full ID or an unambiguous ID prefix.
    pub fn resolve(&mut self, reference: &str) -> Result<Id> {
        if let Ok(id) = Id::from_hex(reference) {
            if self.store.has_object(&id)? && self.store.object_kind(&id)? == Kind::Commit {
                return Ok(id);
            }
            return Err(Error::NoSuchCommit);
        }

        let mut matches = self
            .commit_ids()?
            .into_iter()
            .filter(|id| id.has_prefix(reference));

        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id),
            (Some(_), Some(_)) => Err(Error::AmbiguousCommit),
            (None, _) => Err(Error::NoSuchCommit),
        }
    }

    /// Every commit reachable from `id` through any parent edge, including `id`.
    pub fn ancestors(&mut self, id: &Id) -> Result<BTreeSet<Id>> {
        Ok(self.distances(id)?.into_iter().map(|(id, _)| id).collect())
    }

    /// Length of the shortest parent path from `id` to each of its ancestors.
    pub fn distances(&mut self, id: &Id) -> Result<HashMap<Id, usize>> {
        let mut distances = HashMap::new();
        let mut queue = VecDeque::new();

        distances.insert(*id, 0);
        queue.push_back(*id);

        while let Some(next) = queue.pop_front() {
            let depth = distances[&next];
            for parent in self.get(&next)?.parents().ids() {
                if !distances.contains_key(&parent) {
                    distances.insert(parent, depth + 1);
                    queue.push_back(parent);
                }
            }
        }

        Ok(distances)
    }

    /// Finds the most recent common ancestor of two commits.
    ///
    /// Only lowest common ancestors (those that are not an ancestor of another
    /// common ancestor) are candidates. Among those, the one with the smallest
    /// combined distance from both heads wins, and equal distances fall back to
    /// the smaller ID. The result never depends on traversal order.
    ///
    /// Returns `None` only if the two commits share no history at all.
    pub fn merge_base(&mut self, a: &Id, b: &Id) -> Result<Option<Id>> {
        let from_a = self.distances(a)?;
        let from_b = self.distances(b)?;

        let common: BTreeSet<Id> = from_a
            .keys()
            .filter(|id| from_b.contains_key(*id))
            .copied()
            .collect();

        let mut shadowed = BTreeSet::new();
        for id in &common {
            if shadowed.contains(id) {
                continue;
            }
            for ancestor in self.ancestors(id)? {
                if ancestor != *id {
                    shadowed.insert(ancestor);
                }
            }
        }

        let base = common
            .iter()
            .filter(|id| !shadowed.contains(*id))
            .min_by_key(|id| (from_a[*id] + from_b[*id], **id))
            .copied();

        debug!(%a, %b, base = ?base.map(|id| id.to_string()), "computed merge base");
        Ok(base)
    }

    /// The first-parent chain from `head` back to the root.
    pub fn first_parent_history(&mut self, head: &Id) -> Result<Vec<LogEntry>> {
        let mut entries = vec![];
        let mut next = Some(*head);

        while let Some(id) = next {
            let commit = self.get(&id)?.clone();
            next = commit.parents().first();
            entries.push(LogEntry { id, commit });
        }

        Ok(entries)
    }
}
