use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::remotes::Remotes;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Name of the store directory inside a working tree
pub const STORE_DIR: &str = ".twig";

/// Every path of one store, derived from its working-tree root
///
/// Remote stores are addressed by their store directory; their working tree is
/// taken to be its parent and is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: Box<Path>,
    store: Box<Path>,
}

impl StoreLayout {
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let store = root.join(STORE_DIR);

        StoreLayout {
            root: root.into_boxed_path(),
            store: store.into_boxed_path(),
        }
    }

    pub fn from_store_dir(store: impl Into<PathBuf>) -> Self {
        let store = store.into();
        let root = store
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| store.clone());

        StoreLayout {
            root: root.into_boxed_path(),
            store: store.into_boxed_path(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &Path {
        &self.store
    }

    pub fn objects(&self) -> PathBuf {
        self.store.join("objects")
    }

    pub fn commits(&self) -> PathBuf {
        self.store.join("commits")
    }

    pub fn stage_add(&self) -> PathBuf {
        self.store.join("stage-add")
    }

    pub fn stage_remove(&self) -> PathBuf {
        self.store.join("stage-remove")
    }

    pub fn heads(&self) -> PathBuf {
        self.store.join("refs").join("heads")
    }

    pub fn remotes(&self) -> PathBuf {
        self.store.join("remotes")
    }

    pub fn head_file(&self) -> PathBuf {
        self.store.join("HEAD")
    }

    pub fn blob_index_file(&self) -> PathBuf {
        self.store.join("blob-index")
    }

    /// Directories created by `init`
    pub fn directories(&self) -> [PathBuf; 6] {
        [
            self.objects(),
            self.commits(),
            self.stage_add(),
            self.stage_remove(),
            self.heads(),
            self.remotes(),
        ]
    }

    pub fn is_initialized(&self) -> bool {
        self.store.is_dir()
    }
}

pub struct Repository {
    layout: StoreLayout,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    index: Index,
    workspace: Workspace,
    refs: Refs,
    remotes: Remotes,
    colorize: bool,
}

impl Repository {
    /// Open the store of the working tree at `root`
    ///
    /// The store need not exist yet; `init` creates it.
    pub fn new(root: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("Unable to open working tree {}", root.display()))?;

        Self::with_layout(StoreLayout::from_root(root), writer)
    }

    /// Open another store by its store directory, discarding its output
    pub fn open_store(store: &Path) -> anyhow::Result<Self> {
        Self::with_layout(StoreLayout::from_store_dir(store), Box::new(std::io::sink()))
    }

    fn with_layout(layout: StoreLayout, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let database = Database::open(&layout)?;
        let index = Index::new(&layout);
        let workspace = Workspace::new(layout.root().into());
        let refs = Refs::new(&layout);
        let remotes = Remotes::new(layout.remotes().into_boxed_path());

        Ok(Repository {
            layout,
            writer: RefCell::new(writer),
            database,
            index,
            workspace,
            refs,
            remotes,
            colorize: false,
        })
    }

    /// Color commit headers in the output
    pub fn with_colors(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn colorize(&self) -> bool {
        self.colorize
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn path(&self) -> &Path {
        self.layout.root()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn remotes(&self) -> &Remotes {
        &self.remotes
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if self.layout.is_initialized() {
            Ok(())
        } else {
            Err(TwigError::NotInitialized.into())
        }
    }

    /// Id of the commit the current branch points at
    pub fn head_oid(&self) -> anyhow::Result<ObjectId> {
        let current = self.refs.current_branch()?;

        self.refs
            .read_branch(&current)?
            .with_context(|| format!("current branch {current} points at nothing"))
    }

    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let oid = self.head_oid()?;
        let commit = self.database.load_commit(&oid)?;

        Ok((oid, commit))
    }
}
