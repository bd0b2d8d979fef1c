//! The staging area: pending additions and removals layered over the active head.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::commit::Snapshot;
use crate::object::Id;

/// Pending changes that the next commit will apply to its parent's snapshot.
///
/// A path is never both added and removed; staging one side clears the other.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Staging {
    added: BTreeMap<String, Id>,
    removed: BTreeSet<String>,
}

impl Staging {
    /// Records new content for `path`, clearing any pending removal.
    pub fn stage_add(&mut self, path: &str, blob: Id) {
        self.removed.remove(path);
        self.added.insert(path.to_string(), blob);
    }

    /// Records a pending removal of `path`, clearing any pending add.
    pub fn stage_remove(&mut self, path: &str) {
        self.added.remove(path);
        self.removed.insert(path.to_string());
    }

    /// Drops any pending change for `path`. Returns true if there was one.
    pub fn unstage(&mut self, path: &str) -> bool {
        let added = self.added.remove(path).is_some();
        let removed = self.removed.remove(path);
        added || removed
    }

    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn added(&self) -> &BTreeMap<String, Id> {
        &self.added
    }

    pub fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    pub fn staged_blob(&self, path: &str) -> Option<Id> {
        self.added.get(path).copied()
    }

    pub fn is_added(&self, path: &str) -> bool {
        self.added.contains_key(path)
    }

    pub fn is_removed(&self, path: &str) -> bool {
        self.removed.contains(path)
    }

    /// True if `path` has any pending change.
    pub fn is_staged(&self, path: &str) -> bool {
        self.is_added(path) || self.is_removed(path)
    }

    /// Applies the pending changes to `snapshot`.
    pub fn apply_to(&self, snapshot: &mut Snapshot) {
        for (path, blob) in &self.added {
            snapshot.insert(path.clone(), *blob);
        }
        for path in &self.removed {
            snapshot.remove(path);
        }
    }
}

/// Where a single path stands relative to the head commit, the staging area,
/// and the working tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileStatus {
    /// Tracked, unstaged, and the working copy matches the head.
    Unmodified,

    /// New content is staged.
    StagedAdd,

    /// Removal is staged.
    StagedRemove,

    /// The working copy differs from what would be committed: the staged
    /// content if there is any, otherwise the head's.
    ModifiedNotStaged,

    /// Tracked or staged for addition, but missing from the working tree.
    DeletedNotStaged,

    /// Present in the working tree only.
    Untracked,
}

impl FileStatus {
    /// Classifies a path from the blob the head tracks for it and the blob
    /// ID of its working content.
    ///
    /// Returns `None` for a path unknown to all three.
    pub fn classify(
        head: Option<Id>,
        staging: &Staging,
        path: &str,
        working: Option<Id>,
    ) -> Option<FileStatus> {
        if let Some(staged) = staging.staged_blob(path) {
            return Some(match working {
                Some(current) if current == staged => FileStatus::StagedAdd,
                Some(_) => FileStatus::ModifiedNotStaged,
                None => FileStatus::DeletedNotStaged,
            });
        }
        if staging.is_removed(path) {
            return Some(FileStatus::StagedRemove);
        }

        match (head, working) {
            (Some(tracked), Some(current)) if tracked == current => Some(FileStatus::Unmodified),
            (Some(_), Some(_)) => Some(FileStatus::ModifiedNotStaged),
            (Some(_), None) => Some(FileStatus::DeletedNotStaged),
            (None, Some(_)) => Some(FileStatus::Untracked),
            (None, None) => None,
        }
    }
}
