use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use super::{now, Repository};
use crate::commit::{Commit, Parents};
use crate::object::{Id, Object};
use crate::store::{Backend, ObjectStore, WorkTree};
use crate::{Error, Result};

/// What a successful merge did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MergeOutcome {
    /// The given branch was already part of the current branch's history.
    AlreadyAncestor,

    /// The current branch was moved forward to the given branch's head.
    FastForward,

    /// A two-parent merge commit was made. `conflicts` lists the paths that
    /// were written with conflict markers.
    Merged { commit: Id, conflicts: Vec<String> },
}

impl MergeOutcome {
    /// The line reported to the user, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            MergeOutcome::AlreadyAncestor => {
                Some("Given branch is an ancestor of the current branch.")
            }
            MergeOutcome::FastForward => Some("Current branch fast-forwarded."),
            MergeOutcome::Merged { conflicts, .. } if !conflicts.is_empty() => {
                Some("Encountered a merge conflict.")
            }
            MergeOutcome::Merged { .. } => None,
        }
    }
}

/// A change to one path decided by the three-way comparison.
enum Resolution {
    Take(Id, Vec<u8>),
    Delete,
    Conflict(Vec<u8>),
}

impl<B: Backend> Repository<B> {
    /// Merges the branch `name` into the active branch.
    pub fn merge(&mut self, name: &str) -> Result<MergeOutcome> {
        let other = self.branches.head_of(name).ok_or(Error::BranchDoesNotExist)?;
        if name == self.current_branch() {
            return Err(Error::MergeWithSelf);
        }
        if !self.staging.is_empty() {
            return Err(Error::UncommittedChanges);
        }

        let head_id = self.head();
        let head = self.head_commit()?;
        self.check_untracked(&head)?;

        let base = self.graph().merge_base(&head_id, &other)?.ok_or_else(|| {
            Error::CorruptObject(format!("{} and {} share no history", head_id, other))
        })?;

        if base == other {
            return Ok(MergeOutcome::AlreadyAncestor);
        }

        let given = self.backend.get_commit(&other)?;

        if base == head_id {
            self.replace_work_tree(&head, &given)?;
            self.move_head(other);
            self.save()?;

            info!(branch = self.current_branch(), head = %other, "fast-forwarded");
            return Ok(MergeOutcome::FastForward);
        }

        let split = self.backend.get_commit(&base)?;
        let plan = self.plan_merge(&split, &head, &given)?;
        if plan.is_empty() {
            return Err(Error::NothingToCommit);
        }

        let mut conflicts = vec![];
        for (path, resolution) in plan {
            match resolution {
                Resolution::Take(blob, content) => {
                    self.backend.write_work_file(&path, &content)?;
                    self.staging.stage_add(&path, blob);
                }
                Resolution::Delete => {
                    self.backend.remove_work_file(&path)?;
                    self.staging.stage_remove(&path);
                }
                Resolution::Conflict(content) => {
                    let blob = Object::blob(content);
                    self.backend.put_object(&blob)?;
                    self.backend.write_work_file(&path, blob.content())?;
                    self.staging.stage_add(&path, blob.id());
                    conflicts.push(path);
                }
            }
        }

        let message = format!("Merged {} into {}.", name, self.current_branch());
        let commit = Commit::new(
            &message,
            now(),
            Parents::Merge(head_id, other),
            head.snapshot(),
            &self.staging,
        )?;
        let commit = self.record_commit(&commit)?;

        if !conflicts.is_empty() {
            warn!(?conflicts, "merge left conflict markers");
        }
        Ok(MergeOutcome::Merged { commit, conflicts })
    }

    /// Decides what happens to every path in any of the three snapshots,
    /// reading all needed blobs before anything is written.
    fn plan_merge(
        &self,
        split: &Commit,
        current: &Commit,
        given: &Commit,
    ) -> Result<Vec<(String, Resolution)>> {
        let paths: BTreeSet<&String> = split
            .tracked_files()
            .chain(current.tracked_files())
            .chain(given.tracked_files())
            .collect();

        let mut plan = vec![];
        for path in paths {
            let base = split.blob_for(path);
            let ours = current.blob_for(path);
            let theirs = given.blob_for(path);

            if theirs == base || ours == theirs {
                continue;
            }

            let resolution = if ours == base {
                match theirs {
                    Some(blob) => Resolution::Take(blob, self.backend.get_blob(&blob)?),
                    None => Resolution::Delete,
                }
            } else {
                Resolution::Conflict(self.conflict_markers(ours, theirs)?)
            };

            debug!(path = path.as_str(), conflict = matches!(resolution, Resolution::Conflict(_)), "merge resolved path");
            plan.push((path.clone(), resolution));
        }

        Ok(plan)
    }

    fn conflict_markers(&self, ours: Option<Id>, theirs: Option<Id>) -> Result<Vec<u8>> {
        let mut content = b"<<<<<<< HEAD\n".to_vec();
        if let Some(blob) = ours {
            content.extend(self.backend.get_blob(&blob)?);
        }
        content.extend_from_slice(b"=======\n");
        if let Some(blob) = theirs {
            content.extend(self.backend.get_blob(&blob)?);
        }
        content.extend_from_slice(b">>>>>>>\n");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    use crate::commit::INITIAL_MESSAGE;

    #[test]
    fn fast_forward() {
        let mut repo = new_repo();
        let add_a = commit_file(&mut repo, "a.txt", "hello", "add a");
        repo.branch("feature").unwrap();
        repo.checkout_branch("feature").unwrap();
        let update_a = commit_file(&mut repo, "a.txt", "world", "update a");
        repo.checkout_branch("master").unwrap();
        let objects = repo.backend().object_count();

        let outcome = repo.merge("feature").unwrap();
        assert_eq!(outcome, MergeOutcome::FastForward);
        assert_eq!(outcome.message(), Some("Current branch fast-forwarded."));

        assert_eq!(repo.head(), update_a);
        assert_eq!(repo.backend().object_count(), objects);
        assert_eq!(read(&repo, "a.txt").as_deref(), Some("world"));

        let log: Vec<(Id, String)> = repo
            .log()
            .unwrap()
            .into_iter()
            .map(|e| (e.id, e.commit.message().to_string()))
            .collect();
        assert_eq!(log[0], (update_a, "update a".to_string()));
        assert_eq!(log[1], (add_a, "add a".to_string()));
        assert_eq!(log[2].1, INITIAL_MESSAGE);
    }

    #[test]
    fn already_ancestor() {
        let mut repo = new_repo();
        commit_file(&mut repo, "a.txt", "hello", "add a");
        repo.branch("old").unwrap();
        let head = commit_file(&mut repo, "a.txt", "world", "update a");

        let outcome = repo.merge("old").unwrap();
        assert_eq!(outcome, MergeOutcome::AlreadyAncestor);
        assert_eq!(
            outcome.message(),
            Some("Given branch is an ancestor of the current branch.")
        );
        assert_eq!(repo.head(), head);
    }

    #[test]
    fn clean_three_way_merge() {
        let mut repo = new_repo();
        commit_file(&mut repo, "a.txt", "a", "add a");
        commit_file(&mut repo, "b.txt", "b", "add b");
        repo.branch("feature").unwrap();

        repo.checkout_branch("feature").unwrap();
        commit_file(&mut repo, "b.txt", "b2", "change b");
        commit_file(&mut repo, "c.txt", "c", "add c");
        repo.rm("a.txt").unwrap();
        let feature = repo.commit("remove a").unwrap();

        repo.checkout_branch("master").unwrap();
        let master = commit_file(&mut repo, "d.txt", "d", "add d");

        let outcome = repo.merge("feature").unwrap();
        let commit = match outcome {
            MergeOutcome::Merged { commit, ref conflicts } => {
                assert!(conflicts.is_empty());
                commit
            }
            _ => panic!("expected a merge commit, got {:?}", outcome),
        };
        assert_eq!(outcome.message(), None);
        assert_eq!(repo.head(), commit);

        let merged = repo.head_commit().unwrap();
        assert_eq!(merged.message(), "Merged feature into master.");
        assert_eq!(merged.parents(), Parents::Merge(master, feature));
        assert!(!merged.is_tracking("a.txt"));

        assert_eq!(read(&repo, "a.txt"), None);
        assert_eq!(read(&repo, "b.txt").as_deref(), Some("b2"));
        assert_eq!(read(&repo, "c.txt").as_deref(), Some("c"));
        assert_eq!(read(&repo, "d.txt").as_deref(), Some("d"));
        assert!(repo.staging().is_empty());
    }

    #[test]
    fn conflicting_edits() {
        let mut repo = new_repo();
        commit_file(&mut repo, "a.txt", "base\n", "add a");
        commit_file(&mut repo, "same.txt", "x\n", "add same");
        repo.branch("feature").unwrap();

        repo.checkout_branch("feature").unwrap();
        commit_file(&mut repo, "a.txt", "feature\n", "feature edit");
        commit_file(&mut repo, "same.txt", "y\n", "same edit");

        repo.checkout_branch("master").unwrap();
        commit_file(&mut repo, "a.txt", "master\n", "master edit");
        commit_file(&mut repo, "same.txt", "y\n", "same edit");

        let outcome = repo.merge("feature").unwrap();
        assert_eq!(outcome.message(), Some("Encountered a merge conflict."));
        match &outcome {
            MergeOutcome::Merged { conflicts, .. } => {
                assert_eq!(conflicts, &vec!["a.txt".to_string()]);
            }
            _ => panic!("expected a merge commit, got {:?}", outcome),
        }

        let expected = "<<<<<<< HEAD\nmaster\n=======\nfeature\n>>>>>>>\n";
        assert_eq!(read(&repo, "a.txt").as_deref(), Some(expected));
        assert_eq!(read(&repo, "same.txt").as_deref(), Some("y\n"));

        let merged = repo.head_commit().unwrap();
        assert!(merged.parents().is_merge());
        let blob = merged.blob_for("a.txt").unwrap();
        assert_eq!(repo.backend().get_blob(&blob).unwrap(), expected.as_bytes());
    }

    #[test]
    fn delete_against_edit_conflicts() {
        let mut repo = new_repo();
        commit_file(&mut repo, "a.txt", "base\n", "add a");
        repo.branch("feature").unwrap();

        repo.checkout_branch("feature").unwrap();
        repo.rm("a.txt").unwrap();
        repo.commit("remove a").unwrap();

        repo.checkout_branch("master").unwrap();
        commit_file(&mut repo, "a.txt", "master\n", "master edit");

        let outcome = repo.merge("feature").unwrap();
        assert_eq!(outcome.message(), Some("Encountered a merge conflict."));
        assert_eq!(
            read(&repo, "a.txt").as_deref(),
            Some("<<<<<<< HEAD\nmaster\n=======\n>>>>>>>\n")
        );
    }

    #[test]
    fn identical_edits_leave_nothing_to_commit() {
        let mut repo = new_repo();
        commit_file(&mut repo, "a.txt", "base\n", "add a");
        repo.branch("feature").unwrap();

        repo.checkout_branch("feature").unwrap();
        commit_file(&mut repo, "a.txt", "same\n", "feature edit");

        repo.checkout_branch("master").unwrap();
        let head = commit_file(&mut repo, "a.txt", "same\n", "master edit");

        assert!(matches!(
            repo.merge("feature"),
            Err(Error::NothingToCommit)
        ));
        assert_eq!(repo.head(), head);
        assert!(repo.staging().is_empty());
        assert_eq!(read(&repo, "a.txt").as_deref(), Some("same\n"));
    }

    #[test]
    fn preconditions_leave_repository_untouched() {
        let mut repo = new_repo();
        commit_file(&mut repo, "a.txt", "hello", "add a");
        repo.branch("feature").unwrap();
        let head = repo.head();

        assert!(matches!(
            repo.merge("nope"),
            Err(Error::BranchDoesNotExist)
        ));
        assert!(matches!(repo.merge("master"), Err(Error::MergeWithSelf)));

        write(&mut repo, "b.txt", "bee");
        repo.add("b.txt").unwrap();
        assert!(matches!(
            repo.merge("feature"),
            Err(Error::UncommittedChanges)
        ));
        repo.rm("b.txt").unwrap();

        assert!(matches!(
            repo.merge("feature"),
            Err(Error::UntrackedFileInTheWay)
        ));
        assert_eq!(repo.head(), head);
        assert_eq!(read(&repo, "b.txt").as_deref(), Some("bee"));
    }
}
