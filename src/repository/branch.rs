use std::collections::BTreeMap;

use tracing::info;

use super::Repository;
use crate::object::Id;
use crate::store::{Backend, ObjectStore};
use crate::{Error, Result};

/// Name of the branch created by `init`.
pub const DEFAULT_BRANCH: &str = "master";

/// A named, movable pointer to a commit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Branch {
    pub name: String,
    pub head: Id,
}

/// Every branch keyed by name, plus which one is active.
///
/// The active branch always exists in the table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BranchTable {
    heads: BTreeMap<String, Id>,
    current: String,
}

impl BranchTable {
    pub fn new(name: &str, head: Id) -> BranchTable {
        let mut heads = BTreeMap::new();
        heads.insert(name.to_string(), head);
        BranchTable {
            heads,
            current: name.to_string(),
        }
    }

    /// Rebuilds a table from its persisted pieces.
    pub fn from_parts(heads: BTreeMap<String, Id>, current: String) -> Result<BranchTable> {
        if !heads.contains_key(&current) {
            return Err(Error::CorruptObject(format!(
                "active branch `{}` is not in the branch table",
                current
            )));
        }
        Ok(BranchTable { heads, current })
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn current_head(&self) -> Id {
        self.heads[&self.current]
    }

    pub fn heads(&self) -> &BTreeMap<String, Id> {
        &self.heads
    }

    pub fn head_of(&self, name: &str) -> Option<Id> {
        self.heads.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.heads.contains_key(name)
    }

    /// All branches, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = Branch> + '_ {
        self.heads.iter().map(|(name, head)| Branch {
            name: name.clone(),
            head: *head,
        })
    }

    fn set_head(&mut self, name: &str, head: Id) {
        self.heads.insert(name.to_string(), head);
    }

    fn set_current_head(&mut self, head: Id) {
        let current = self.current.clone();
        self.set_head(&current, head);
    }
}

impl<B: Backend> Repository<B> {
    /// Creates a branch pointing at the current head.
    pub fn branch(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::IncorrectOperands);
        }
        if self.branches.contains(name) {
            return Err(Error::BranchExists);
        }

        let head = self.head();
        self.branches.set_head(name, head);
        self.save_branches()?;

        info!(branch = name, %head, "created branch");
        Ok(())
    }

    /// Deletes a branch pointer. Its commits are kept.
    pub fn rm_branch(&mut self, name: &str) -> Result<()> {
        if !self.branches.contains(name) {
            return Err(Error::BranchDoesNotExist);
        }
        if name == self.branches.current() {
            return Err(Error::RemoveCurrentBranch);
        }

        self.branches.heads.remove(name);
        self.save_branches()?;

        info!(branch = name, "removed branch");
        Ok(())
    }

    /// Makes `name` the active branch, replacing the working files with its head's.
    ///
    /// Any staged changes are discarded.
    pub fn checkout_branch(&mut self, name: &str) -> Result<()> {
        let target = self.branches.head_of(name).ok_or(Error::NoSuchBranch)?;
        if name == self.branches.current() {
            return Err(Error::CheckoutCurrentBranch);
        }

        let head = self.head_commit()?;
        self.check_untracked(&head)?;

        let to = self.backend.get_commit(&target)?;
        self.replace_work_tree(&head, &to)?;
        self.branches.current = name.to_string();
        self.save()?;

        info!(branch = name, head = %target, "switched branch");
        Ok(())
    }

    /// Moves the active branch to `head`.
    pub(super) fn move_head(&mut self, head: Id) {
        self.branches.set_current_head(head);
    }
}
