//! Immutable commit nodes.
//!
//! A commit records a full path-to-blob snapshot rather than a diff, and refers
//! to its parents by ID only. Its own ID is the hash of its canonical JSON
//! encoding, so computing it never touches ancestor history.

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::object::{Id, Kind, Object};
use crate::staging::Staging;
use crate::{Error, Result};

/// Message given to the root commit created by `init`.
pub const INITIAL_MESSAGE: &str = "initial commit";

/// Path-to-blob mapping captured by a commit.
pub type Snapshot = BTreeMap<String, Id>;

/// The parent references of a commit.
///
/// Serialized as a list of zero, one, or two IDs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Id>", try_from = "Vec<Id>")]
pub enum Parents {
    Root,
    Single(Id),
    Merge(Id, Id),
}

impl Parents {
    /// The parent followed by `log`, if any.
    pub fn first(&self) -> Option<Id> {
        match *self {
            Parents::Root => None,
            Parents::Single(id) | Parents::Merge(id, _) => Some(id),
        }
    }

    /// All parent IDs in order.
    pub fn ids(&self) -> Vec<Id> {
        Vec::from(*self)
    }

    pub fn is_merge(&self) -> bool {
        matches!(self, Parents::Merge(..))
    }
}

impl From<Parents> for Vec<Id> {
    fn from(parents: Parents) -> Vec<Id> {
        match parents {
            Parents::Root => vec![],
            Parents::Single(id) => vec![id],
            Parents::Merge(first, second) => vec![first, second],
        }
    }
}

impl TryFrom<Vec<Id>> for Parents {
    type Error = String;

    fn try_from(ids: Vec<Id>) -> std::result::Result<Self, Self::Error> {
        match ids.as_slice() {
            [] => Ok(Parents::Root),
            [id] => Ok(Parents::Single(*id)),
            [first, second] => Ok(Parents::Merge(*first, *second)),
            _ => Err(format!("a commit has at most 2 parents, found {}", ids.len())),
        }
    }
}

/// An immutable snapshot of tracked paths plus metadata and parent references.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    message: String,
    timestamp: i64,
    snapshot: Snapshot,
    parents: Parents,
}

impl Commit {
    /// The root commit every repository starts from.
    pub fn initial() -> Commit {
        Commit {
            message: INITIAL_MESSAGE.to_string(),
            timestamp: 0,
            snapshot: Snapshot::new(),
            parents: Parents::Root,
        }
    }

    /// Builds a commit by applying `staging` to `base` (the first parent's snapshot).
    ///
    /// Fails with [`Error::EmptyMessage`] for an empty message and with
    /// [`Error::NothingToCommit`] when the commit would carry no changes.
    /// Only the root commit may have an empty diff.
    pub fn new(
        message: &str,
        timestamp: i64,
        parents: Parents,
        base: &Snapshot,
        staging: &Staging,
    ) -> Result<Commit> {
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }

        if parents != Parents::Root && staging.is_empty() {
            return Err(Error::NothingToCommit);
        }

        let mut snapshot = match parents {
            Parents::Root => Snapshot::new(),
            _ => base.clone(),
        };
        staging.apply_to(&mut snapshot);

        Ok(Commit {
            message: message.to_string(),
            timestamp,
            snapshot,
            parents,
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn parents(&self) -> Parents {
        self.parents
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn is_tracking(&self, path: &str) -> bool {
        self.snapshot.contains_key(path)
    }

    pub fn blob_for(&self, path: &str) -> Option<Id> {
        self.snapshot.get(path).copied()
    }

    pub fn tracked_files(&self) -> impl Iterator<Item = &String> {
        self.snapshot.keys()
    }

    /// Encodes the commit as a storable object.
    pub fn to_object(&self) -> Result<Object> {
        Ok(Object::new(Kind::Commit, serde_json::to_vec(self)?))
    }

    /// Decodes a commit from a stored object.
    pub fn from_object(object: &Object) -> Result<Commit> {
        if object.kind() != Kind::Commit {
            return Err(Error::CorruptObject(format!(
                "{} is a {}, not a commit",
                object.id(),
                object.kind()
            )));
        }

        Ok(serde_json::from_slice(object.content())?)
    }

    /// The ID this commit has (or will have) in the object store.
    pub fn id(&self) -> Result<Id> {
        Ok(self.to_object()?.id())
    }

    /// Formats the timestamp the way `log` shows it.
    pub fn date(&self) -> String {
        match Utc.timestamp_opt(self.timestamp, 0).single() {
            Some(time) => time.format("%a %b %-d %H:%M:%S %Y %z").to_string(),
            None => self.timestamp.to_string(),
        }
    }
}

/// A commit paired with its ID, rendered as one `log` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub id: Id,
    pub commit: Commit,
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "===")?;
        writeln!(f, "commit {}", self.id)?;
        if let Parents::Merge(first, second) = self.commit.parents {
            writeln!(f, "Merge: {} {}", first.abbrev(), second.abbrev())?;
        }
        writeln!(f, "Date: {}", self.commit.date())?;
        writeln!(f, "{}", self.commit.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob_id(content: &str) -> Id {
        Object::blob(content.as_bytes().to_vec()).id()
    }

    #[test]
    fn initial_commit() {
        let c = Commit::initial();
        assert_eq!(c.message(), "initial commit");
        assert_eq!(c.parents(), Parents::Root);
        assert!(c.snapshot().is_empty());
        assert_eq!(c.date(), "Thu Jan 1 00:00:00 1970 +0000");

        // Same content, same ID, every time.
        assert_eq!(c.id().unwrap(), Commit::initial().id().unwrap());
    }

    #[test]
    fn applies_staged_diff_to_parent() {
        let root = Commit::initial();
        let root_id = root.id().unwrap();

        let mut staging = Staging::default();
        staging.stage_add("a.txt", blob_id("hello"));
        staging.stage_add("b.txt", blob_id("bee"));
        let first = Commit::new(
            "add a",
            10,
            Parents::Single(root_id),
            root.snapshot(),
            &staging,
        )
        .unwrap();
        assert_eq!(first.blob_for("a.txt"), Some(blob_id("hello")));
        assert!(first.is_tracking("b.txt"));

        let mut staging = Staging::default();
        staging.stage_remove("b.txt");
        staging.stage_add("a.txt", blob_id("world"));
        let second = Commit::new(
            "update a",
            20,
            Parents::Single(first.id().unwrap()),
            first.snapshot(),
            &staging,
        )
        .unwrap();
        assert_eq!(second.blob_for("a.txt"), Some(blob_id("world")));
        assert!(!second.is_tracking("b.txt"));

        // The parent is untouched.
        assert_eq!(first.blob_for("a.txt"), Some(blob_id("hello")));
    }

    #[test]
    fn nothing_to_commit() {
        let root = Commit::initial();
        let err = Commit::new(
            "empty",
            1,
            Parents::Single(root.id().unwrap()),
            root.snapshot(),
            &Staging::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NothingToCommit));
    }

    #[test]
    fn empty_message() {
        let mut staging = Staging::default();
        staging.stage_add("a.txt", blob_id("hello"));
        let root = Commit::initial();
        let err = Commit::new(
            "",
            1,
            Parents::Single(root.id().unwrap()),
            root.snapshot(),
            &staging,
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyMessage));
    }

    #[test]
    fn merge_needs_changes() {
        let root = Commit::initial();
        let a = blob_id("a");
        let b = blob_id("b");
        let err = Commit::new(
            "Merged b into a.",
            5,
            Parents::Merge(a, b),
            root.snapshot(),
            &Staging::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NothingToCommit));

        let mut staging = Staging::default();
        staging.stage_add("b.txt", b);
        let merge = Commit::new(
            "Merged b into a.",
            5,
            Parents::Merge(a, b),
            root.snapshot(),
            &staging,
        )
        .unwrap();
        assert!(merge.parents().is_merge());
        assert_eq!(merge.blob_for("b.txt"), Some(b));
        assert_eq!(merge.parents().ids(), vec![a, b]);
        assert_eq!(merge.parents().first(), Some(a));
    }

    #[test]
    fn object_round_trip_preserves_id() {
        let mut staging = Staging::default();
        staging.stage_add("a.txt", blob_id("hello"));
        let root = Commit::initial();
        let c = Commit::new(
            "add a",
            1234,
            Parents::Single(root.id().unwrap()),
            root.snapshot(),
            &staging,
        )
        .unwrap();

        let object = c.to_object().unwrap();
        assert_eq!(object.kind(), Kind::Commit);
        let decoded = Commit::from_object(&object).unwrap();
        assert_eq!(decoded, c);
        assert_eq!(decoded.id().unwrap(), object.id());
    }

    #[test]
    fn from_blob_object_is_corrupt() {
        let err = Commit::from_object(&Object::blob(b"{}".to_vec())).unwrap_err();
        assert!(matches!(err, Error::CorruptObject(_)));
    }

    #[test]
    fn too_many_parents() {
        let json = format!(
            r#"{{"message":"m","timestamp":0,"snapshot":{{}},"parents":["{0}","{0}","{0}"]}}"#,
            blob_id("x")
        );
        assert!(serde_json::from_str::<Commit>(&json).is_err());
    }

    #[test]
    fn log_entry() {
        let root = Commit::initial();
        let id = root.id().unwrap();
        let entry = LogEntry {
            id,
            commit: root,
        };
        assert_eq!(
            entry.to_string(),
            format!(
                "===\ncommit {}\nDate: Thu Jan 1 00:00:00 1970 +0000\ninitial commit\n",
                id
            )
        );
    }

    #[test]
    fn merge_log_entry() {
        let a = blob_id("a");
        let b = blob_id("b");
        let mut staging = Staging::default();
        staging.stage_remove("gone.txt");
        let merge = Commit::new(
            "Merged b into a.",
            0,
            Parents::Merge(a, b),
            &Snapshot::new(),
            &staging,
        )
        .unwrap();
        let id = merge.id().unwrap();
        let text = LogEntry { id, commit: merge }.to_string();
        assert!(text.contains(&format!("Merge: {} {}\n", a.abbrev(), b.abbrev())));
    }
}
