use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use tracing::{debug, info};

use super::Repository;
use crate::object::{Id, Object};
use crate::staging::FileStatus;
use crate::store::{Backend, ObjectStore, WorkTree};
use crate::{Error, Result};

impl<B: Backend> Repository<B> {
    /// Stages the working content of `path`.
    ///
    /// Returns false, staging nothing, when the content matches what the head
    /// already tracks; any pending change for the path is dropped in that case.
    pub fn add(&mut self, path: &str) -> Result<bool> {
        let content = self
            .backend
            .read_work_file(path)?
            .ok_or(Error::FileDoesNotExist)?;
        let blob = Object::blob(content);
        let head = self.head_commit()?;

        if head.blob_for(path) == Some(blob.id()) {
            if self.staging.unstage(path) {
                self.save_staging()?;
            }
            return Ok(false);
        }

        self.backend.put_object(&blob)?;
        self.staging.stage_add(path, blob.id());
        self.save_staging()?;

        debug!(path, blob = %blob.id(), "staged file");
        Ok(true)
    }

    /// Stages the removal of a tracked file and deletes it from the working
    /// tree, or unstages a pending add.
    pub fn rm(&mut self, path: &str) -> Result<()> {
        let head = self.head_commit()?;

        if head.is_tracking(path) {
            self.staging.stage_remove(path);
            self.save_staging()?;
            self.backend.remove_work_file(path)?;
        } else if self.staging.unstage(path) {
            self.save_staging()?;
        } else {
            return Err(Error::NoReasonToRemove);
        }

        debug!(path, "staged removal");
        Ok(())
    }

    /// Overwrites the working copy of `path` with its version in a commit.
    ///
    /// `reference` is a full or abbreviated commit ID; `None` means the head.
    pub fn checkout_file(&mut self, reference: Option<&str>, path: &str) -> Result<()> {
        let id = match reference {
            Some(reference) => self.graph().resolve(reference)?,
            None => self.head(),
        };
        let commit = self.backend.get_commit(&id)?;
        let blob = commit.blob_for(path).ok_or(Error::FileNotInCommit)?;
        let content = self.backend.get_blob(&blob)?;

        self.backend.write_work_file(path, &content)
    }

    /// Moves the active branch to a commit, replacing the working files with
    /// that commit's and clearing the staging area.
    pub fn reset(&mut self, reference: &str) -> Result<Id> {
        let target = self.graph().resolve(reference)?;
        let head = self.head_commit()?;
        self.check_untracked(&head)?;

        let to = self.backend.get_commit(&target)?;
        self.replace_work_tree(&head, &to)?;
        self.move_head(target);
        self.save()?;

        info!(branch = self.current_branch(), head = %target, "reset branch");
        Ok(target)
    }

    /// Summarizes branches, staged changes, and the working tree.
    pub fn status(&self) -> Result<Status> {
        let head = self.head_commit()?;
        let work_files = self.backend.work_files()?;

        let paths: BTreeSet<&String> = head
            .tracked_files()
            .chain(self.staging.added().keys())
            .chain(self.staging.removed().iter())
            .chain(work_files.iter())
            .collect();

        let mut modified = vec![];
        let mut untracked = vec![];
        for path in paths {
            let working = self
                .backend
                .read_work_file(path)?
                .map(|content| Object::blob(content).id());

            match FileStatus::classify(head.blob_for(path), &self.staging, path, working) {
                Some(status @ FileStatus::ModifiedNotStaged)
                | Some(status @ FileStatus::DeletedNotStaged) => {
                    modified.push((path.clone(), status))
                }
                Some(FileStatus::Untracked) => untracked.push(path.clone()),
                _ => {}
            }
        }

        Ok(Status {
            branches: self.branches.heads().keys().cloned().collect(),
            current: self.current_branch().to_string(),
            staged: self.staging.added().keys().cloned().collect(),
            removed: self.staging.removed().iter().cloned().collect(),
            modified,
            untracked,
        })
    }
}

/// The result of `status`. Every list is sorted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Status {
    pub branches: Vec<String>,
    pub current: String,
    pub staged: Vec<String>,
    pub removed: Vec<String>,

    /// Tracked files changed in the working tree but not staged. The status is
    /// either `ModifiedNotStaged` or `DeletedNotStaged`.
    pub modified: Vec<(String, FileStatus)>,

    pub untracked: Vec<String>,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for branch in &self.branches {
            if *branch == self.current {
                writeln!(f, "*{}", branch)?;
            } else {
                writeln!(f, "{}", branch)?;
            }
        }

        writeln!(f, "\n=== Staged Files ===")?;
        for path in &self.staged {
            writeln!(f, "{}", path)?;
        }

        writeln!(f, "\n=== Removed Files ===")?;
        for path in &self.removed {
            writeln!(f, "{}", path)?;
        }

        writeln!(f, "\n=== Modifications Not Staged For Commit ===")?;
        for (path, status) in &self.modified {
            let what = match status {
                FileStatus::DeletedNotStaged => "deleted",
                _ => "modified",
            };
            writeln!(f, "{} ({})", path, what)?;
        }

        writeln!(f, "\n=== Untracked Files ===")?;
        for path in &self.untracked {
            writeln!(f, "{}", path)?;
        }

        writeln!(f)
    }
}
