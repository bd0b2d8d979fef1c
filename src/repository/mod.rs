//! The version-control engine.
//!
//! A [`Repository`] owns the branch table, the name of the active branch, and
//! a single staging area shared by all branches. Every operation checks its
//! preconditions before it writes anything, and writes in the order blobs,
//! then commit objects, then branch pointers, so an interrupted command never
//! leaves a branch naming a commit that doesn't exist.

use chrono::Utc;
use tracing::debug;

use crate::commit::Commit;
use crate::graph::CommitGraph;
use crate::object::Id;
use crate::staging::Staging;
use crate::store::{Backend, ObjectStore, StateStore, WorkTree};
use crate::{Error, Result};

mod branch;
pub use branch::{Branch, BranchTable, DEFAULT_BRANCH};

mod files;
pub use files::Status;

mod history;

mod merge;
pub use merge::MergeOutcome;

const BRANCHES_STATE: &str = "branches";
const HEAD_STATE: &str = "HEAD";
const STAGING_STATE: &str = "staging";

/// A repository on top of some storage [`Backend`].
pub struct Repository<B: Backend> {
    backend: B,
    branches: BranchTable,
    staging: Staging,
}

impl<B: Backend> Repository<B> {
    /// Creates a new repository with a root commit and a `master` branch.
    ///
    /// Fails with [`Error::AlreadyInitialized`] if the backend already holds one.
    pub fn init(mut backend: B) -> Result<Self> {
        backend.initialize()?;

        let root = backend.put_commit(&Commit::initial())?;
        let mut repo = Repository {
            backend,
            branches: BranchTable::new(DEFAULT_BRANCH, root),
            staging: Staging::default(),
        };
        repo.save()?;

        debug!(%root, "initialized repository");
        Ok(repo)
    }

    /// Opens an existing repository.
    ///
    /// Fails with [`Error::NotInitialized`] if the backend holds none.
    pub fn open(backend: B) -> Result<Self> {
        if !backend.is_initialized() {
            return Err(Error::NotInitialized);
        }

        let heads = backend
            .load_state(BRANCHES_STATE)?
            .ok_or_else(|| Error::CorruptObject("branch table is missing".to_string()))?;
        let current = backend
            .load_state(HEAD_STATE)?
            .ok_or_else(|| Error::CorruptObject("HEAD is missing".to_string()))?;
        let current = String::from_utf8_lossy(&current).trim().to_string();
        let branches = BranchTable::from_parts(serde_json::from_slice(&heads)?, current)?;

        let staging = match backend.load_state(STAGING_STATE)? {
            Some(staging) => serde_json::from_slice(&staging)?,
            None => Staging::default(),
        };

        Ok(Repository {
            backend,
            branches,
            staging,
        })
    }

    /// Return the storage backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the storage backend, mostly for editing working files.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Name of the active branch.
    pub fn current_branch(&self) -> &str {
        self.branches.current()
    }

    /// Head commit ID of the active branch.
    pub fn head(&self) -> Id {
        self.branches.current_head()
    }

    /// Head commit of the active branch.
    pub fn head_commit(&self) -> Result<Commit> {
        self.backend.get_commit(&self.head())
    }

    pub fn branches(&self) -> &BranchTable {
        &self.branches
    }

    pub fn staging(&self) -> &Staging {
        &self.staging
    }

    fn graph(&self) -> CommitGraph<'_, B> {
        CommitGraph::new(&self.backend)
    }

    fn save(&mut self) -> Result<()> {
        self.save_branches()?;
        self.save_staging()
    }

    fn save_branches(&mut self) -> Result<()> {
        let heads = serde_json::to_vec_pretty(self.branches.heads())?;
        self.backend.save_state(BRANCHES_STATE, &heads)?;

        let current = self.branches.current().as_bytes().to_vec();
        self.backend.save_state(HEAD_STATE, &current)
    }

    fn save_staging(&mut self) -> Result<()> {
        let staging = serde_json::to_vec_pretty(&self.staging)?;
        self.backend.save_state(STAGING_STATE, &staging)
    }

    /// Fails if a working file is neither tracked by `head` nor staged.
    fn check_untracked(&self, head: &Commit) -> Result<()> {
        for file in self.backend.work_files()? {
            if !head.is_tracking(&file) && !self.staging.is_staged(&file) {
                return Err(Error::UntrackedFileInTheWay);
            }
        }
        Ok(())
    }

    /// Replaces the working files of `from` (and any staged files) with those of
    /// `to`, and clears the staging area.
    ///
    /// Callers must already have checked for untracked files.
    fn replace_work_tree(&mut self, from: &Commit, to: &Commit) -> Result<()> {
        let mut contents = Vec::with_capacity(to.snapshot().len());
        for (path, blob) in to.snapshot() {
            contents.push((path.clone(), self.backend.get_blob(blob)?));
        }

        let doomed: Vec<String> = from
            .tracked_files()
            .chain(self.staging.added().keys())
            .cloned()
            .collect();
        for path in doomed {
            self.backend.remove_work_file(&path)?;
        }

        for (path, content) in contents {
            self.backend.write_work_file(&path, &content)?;
        }

        self.staging.clear();
        Ok(())
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}
