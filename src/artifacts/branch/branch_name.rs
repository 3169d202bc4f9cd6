use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use crate::errors::TwigError;
use anyhow::Context;
use regex::Regex;
use std::sync::LazyLock;

static INVALID_BRANCH_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(INVALID_BRANCH_NAME_REGEX).ok());

/// Validated branch name
///
/// Names may be hierarchical (`origin/master`), in which case the branch file
/// nests under `refs/heads/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();

        let re = INVALID_BRANCH_NAME
            .as_ref()
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if name.is_empty() || re.is_match(&name) {
            Err(TwigError::InvalidBranchName(name).into())
        } else {
            Ok(Self(name))
        }
    }

    /// Name of the local branch tracking `branch` of `remote`
    pub fn tracking(remote: &RemoteName, branch: &BranchName) -> Self {
        Self(format!("{}/{}", remote, branch))
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated remote name
///
/// Same rules as a branch name, without hierarchy: the name is a single file
/// under `remotes/` and the first component of its tracking branches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemoteName(String);

impl RemoteName {
    pub fn try_parse(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();

        match BranchName::try_parse(name.clone()) {
            Ok(_) if !name.contains('/') => Ok(Self(name)),
            _ => Err(TwigError::IncorrectOperands.into()),
        }
    }
}

impl AsRef<str> for RemoteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RemoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
