use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

pub type ChangeSet = BTreeMap<String, WorkspaceChangeType>;
pub type FileSet = BTreeSet<String>;

/// Every section reported by `status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub branches: Vec<BranchName>,
    pub current_branch: BranchName,
    pub staged_files: FileSet,
    pub removed_files: FileSet,
    pub workspace_changeset: ChangeSet,
    pub untracked_files: FileSet,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl Status<'_> {
    pub fn initialize(&self) -> anyhow::Result<StatusInfo> {
        let refs = self.repository.refs();
        let index = self.repository.index();
        let workspace = self.repository.workspace();

        let (_, head) = self.repository.head_commit()?;
        let staged_files = index.staged_for_add()?.into_iter().collect::<FileSet>();
        let removed_files = index.staged_for_remove()?.into_iter().collect::<FileSet>();
        let working_files = workspace.list_files()?;

        let mut workspace_changeset = ChangeSet::new();

        // tracked files changed behind the staging area's back
        for (path, blob_oid) in head.snapshot() {
            match self.working_oid(path)? {
                None if !removed_files.contains(path) => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
                }
                Some(working_oid) if &working_oid != blob_oid && !staged_files.contains(path) => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Modified);
                }
                _ => {}
            }
        }

        // staged files that no longer match what was staged
        for path in &staged_files {
            let staged_oid = Blob::new(index.read_staged(path)?).object_id()?;

            match self.working_oid(path)? {
                None => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
                }
                Some(working_oid) if working_oid != staged_oid => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Modified);
                }
                _ => {}
            }
        }

        let untracked_files = working_files
            .into_iter()
            .filter(|path| {
                (!head.tracks(path) && !staged_files.contains(path)) || removed_files.contains(path)
            })
            .collect::<FileSet>();

        Ok(StatusInfo {
            branches: refs.list_branches()?,
            current_branch: refs.current_branch()?,
            staged_files,
            removed_files,
            workspace_changeset,
            untracked_files,
        })
    }

    fn working_oid(&self, path: &str) -> anyhow::Result<Option<ObjectId>> {
        self.repository
            .workspace()
            .parse_blob(path)?
            .map(|blob| blob.object_id())
            .transpose()
    }
}
