use thiserror::Error;

use crate::object::{Id, ParseIdError};

/// Broad classes of failure.
///
/// Every class except `Storage` describes a condition the user can fix; those
/// are reported as messages and never abort the process abnormally.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A missing or unknown command, malformed or missing operands, or an
    /// empty change set at commit time.
    Validation,

    /// A commit, branch, or file that was referenced does not exist.
    NotFound,

    /// The repository is not in a state where the operation can proceed.
    Precondition,

    /// Stored data could not be read or written.
    Storage,
}

/// Describes the potential error conditions that might arise from twig operations.
///
/// The `Display` text of each user-facing variant is the exact message shown to the user.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Please enter a command.")]
    NoCommand,

    #[error("No command with that name exists.")]
    UnknownCommand,

    #[error("A twig version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Not in an initialized twig directory.")]
    NotInitialized,

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("File does not exist.")]
    FileDoesNotExist,

    #[error("Incorrect operands.")]
    IncorrectOperands,

    #[error("No commit with that id exists.")]
    NoSuchCommit,

    #[error("Commit id prefix is ambiguous.")]
    AmbiguousCommit,

    #[error("File does not exist in that commit.")]
    FileNotInCommit,

    #[error("No such branch exists.")]
    NoSuchBranch,

    #[error("A branch with that name does not exist.")]
    BranchDoesNotExist,

    #[error("Found no commit with that message.")]
    NoCommitWithMessage,

    #[error("A branch with that name already exists.")]
    BranchExists,

    #[error("No reason to remove the file.")]
    NoReasonToRemove,

    #[error("No need to checkout the current branch.")]
    CheckoutCurrentBranch,

    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay,

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unable to encode or decode repository state: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt object: {0}")]
    CorruptObject(String),

    #[error("object {0} is missing from the object store")]
    MissingObject(Id),

    #[error("invalid object ID: {0}")]
    ParseId(#[from] ParseIdError),
}

impl Error {
    /// Returns the class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoCommand
            | Error::UnknownCommand
            | Error::AlreadyInitialized
            | Error::NotInitialized
            | Error::EmptyMessage
            | Error::NothingToCommit
            | Error::FileDoesNotExist
            | Error::IncorrectOperands => ErrorKind::Validation,

            Error::NoSuchCommit
            | Error::AmbiguousCommit
            | Error::FileNotInCommit
            | Error::NoSuchBranch
            | Error::BranchDoesNotExist
            | Error::NoCommitWithMessage => ErrorKind::NotFound,

            Error::BranchExists
            | Error::NoReasonToRemove
            | Error::CheckoutCurrentBranch
            | Error::RemoveCurrentBranch
            | Error::UntrackedFileInTheWay
            | Error::UncommittedChanges
            | Error::MergeWithSelf => ErrorKind::Precondition,

            Error::Io(_)
            | Error::Serialization(_)
            | Error::CorruptObject(_)
            | Error::MissingObject(_)
            | Error::ParseId(_) => ErrorKind::Storage,
        }
    }

    /// True for conditions that are reported to the user rather than treated as fatal.
    pub fn is_user_error(&self) -> bool {
        self.kind() != ErrorKind::Storage
    }
}

/// A specialized `Result` type for twig operations.
pub type Result<T> = std::result::Result<T, Error>;
