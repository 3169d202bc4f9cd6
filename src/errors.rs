//! User-facing failures
//!
//! Every failure a user can trigger from the command line is a [`TwigError`].
//! Library code raises them through `anyhow` like any other error; the binary
//! recognizes them by downcasting and prints the one-line message instead of a
//! fatal error chain.

use thiserror::Error;

/// Broad classification of a [`TwigError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed command line or arguments
    Validation,
    /// The store is in a state that forbids the operation
    Precondition,
    /// A named file, commit, branch or remote is absent
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TwigError {
    #[error("Please enter a command.")]
    NoCommand,
    #[error("No command with that name exists.")]
    UnknownCommand,
    #[error("Incorrect operands.")]
    IncorrectOperands,
    #[error("Not in an initialized Twig directory.")]
    NotInitialized,
    #[error("A Twig version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("File does not exist.")]
    FileNotFound,
    #[error("File does not exist in that commit.")]
    FileNotInCommit,
    #[error("Please enter a commit message.")]
    EmptyMessage,
    #[error("No changes added to the commit.")]
    NothingStaged,
    #[error("No commit with that id exists.")]
    CommitNotFound,
    #[error("Commit id {0} is ambiguous.")]
    AmbiguousCommitId(String),
    #[error("No such branch exists.")]
    NoSuchBranch,
    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict,
    #[error("A branch with that name already exists.")]
    BranchAlreadyExists,
    #[error("A branch with that name does not exist.")]
    BranchNotFound,
    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrent,
    #[error("Invalid branch name: {0}.")]
    InvalidBranchName(String),
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("Cannot merge a branch with itself.")]
    SelfMerge,
    #[error("A remote with that name already exists.")]
    RemoteAlreadyExists,
    #[error("A remote with that name does not exist.")]
    UnknownRemote,
    #[error("Remote directory not found.")]
    RemoteNotFound,
    #[error("That remote does not have that branch.")]
    RemoteBranchNotFound,
    #[error("Please pull down remote changes before pushing.")]
    RejectNonFastForward,
}

impl TwigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TwigError::NoCommand
            | TwigError::UnknownCommand
            | TwigError::IncorrectOperands
            | TwigError::InvalidBranchName(_)
            | TwigError::AmbiguousCommitId(_) => ErrorKind::Validation,
            TwigError::FileNotFound
            | TwigError::FileNotInCommit
            | TwigError::CommitNotFound
            | TwigError::NoSuchBranch
            | TwigError::BranchNotFound
            | TwigError::UnknownRemote
            | TwigError::RemoteNotFound
            | TwigError::RemoteBranchNotFound => ErrorKind::NotFound,
            TwigError::NotInitialized
            | TwigError::AlreadyInitialized
            | TwigError::EmptyMessage
            | TwigError::NothingStaged
            | TwigError::AlreadyOnBranch
            | TwigError::UntrackedFileConflict
            | TwigError::BranchAlreadyExists
            | TwigError::CannotRemoveCurrent
            | TwigError::UncommittedChanges
            | TwigError::SelfMerge
            | TwigError::RemoteAlreadyExists
            | TwigError::RejectNonFastForward => ErrorKind::Precondition,
        }
    }
}

/// Extract the user-facing failure from an error chain, if there is one
pub fn user_error(error: &anyhow::Error) -> Option<&TwigError> {
    error.chain().find_map(|cause| cause.downcast_ref::<TwigError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use rstest::rstest;

    #[rstest]
    #[case(TwigError::CommitNotFound, ErrorKind::NotFound)]
    #[case(TwigError::SelfMerge, ErrorKind::Precondition)]
    #[case(TwigError::IncorrectOperands, ErrorKind::Validation)]
    #[case(TwigError::RejectNonFastForward, ErrorKind::Precondition)]
    fn classifies_failures(#[case] error: TwigError, #[case] kind: ErrorKind) {
        assert_eq!(error.kind(), kind);
    }

    #[test]
    fn messages_interpolate_their_operand() {
        assert_eq!(
            TwigError::InvalidBranchName("a..b".to_string()).to_string(),
            "Invalid branch name: a..b."
        );
    }

    #[test]
    fn user_error_is_found_beneath_context() {
        let error = Err::<(), _>(anyhow::Error::from(TwigError::NothingStaged))
            .context("while committing")
            .unwrap_err();

        assert_eq!(user_error(&error), Some(&TwigError::NothingStaged));
    }

    #[test]
    fn plain_failures_are_not_user_errors() {
        let error = anyhow::anyhow!("disk on fire");

        assert_eq!(user_error(&error), None);
    }
}
