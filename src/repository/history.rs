use tracing::info;

use super::{now, Repository};
use crate::commit::{Commit, LogEntry, Parents};
use crate::object::Id;
use crate::store::{Backend, ObjectStore};
use crate::{Error, Result};

impl<B: Backend> Repository<B> {
    /// Commits the staged changes on the active branch.
    pub fn commit(&mut self, message: &str) -> Result<Id> {
        let parent = self.head();
        let base = self.head_commit()?;
        let commit = Commit::new(
            message,
            now(),
            Parents::Single(parent),
            base.snapshot(),
            &self.staging,
        )?;

        self.record_commit(&commit)
    }

    /// Stores `commit`, advances the active branch to it, and clears the
    /// staging area, in that order.
    pub(super) fn record_commit(&mut self, commit: &Commit) -> Result<Id> {
        let id = self.backend.put_commit(commit)?;
        self.move_head(id);
        self.save_branches()?;

        self.staging.clear();
        self.save_staging()?;

        info!(branch = self.current_branch(), commit = %id, message = commit.message(), "committed");
        Ok(id)
    }

    /// History of the active branch, following first parents from the head.
    pub fn log(&self) -> Result<Vec<LogEntry>> {
        self.graph().first_parent_history(&self.head())
    }

    /// Every commit ever made, in ID order.
    pub fn global_log(&self) -> Result<Vec<LogEntry>> {
        let mut graph = self.graph();
        let mut entries = vec![];
        for id in graph.commit_ids()? {
            let commit = graph.get(&id)?.clone();
            entries.push(LogEntry { id, commit });
        }
        Ok(entries)
    }

    /// IDs of every commit whose message is exactly `message`.
    pub fn find(&self, message: &str) -> Result<Vec<Id>> {
        let found: Vec<Id> = self
            .global_log()?
            .into_iter()
            .filter(|entry| entry.commit.message() == message)
            .map(|entry| entry.id)
            .collect();

        if found.is_empty() {
            return Err(Error::NoCommitWithMessage);
        }
        Ok(found)
    }
}
