//! Object store
//!
//! Blobs live at `objects/<oid>` and commits at `commits/<oid>`, both
//! zlib-compressed. The blob index (`blob-index`) records every stored blob
//! and is the authority for blob membership; it is loaded when the store is
//! opened and rewritten after each new blob.

use crate::areas::repository::StoreLayout;
use crate::artifacts::core::write_atomically;
use crate::artifacts::database::blob_map::BlobMap;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use bytes::Bytes;
use std::cell::{Ref, RefCell};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    objects_path: Box<Path>,
    commits_path: Box<Path>,
    blob_index_path: Box<Path>,
    blob_map: RefCell<BlobMap>,
}

impl Database {
    /// Open the object store of `layout`, loading its blob index if present
    pub fn open(layout: &StoreLayout) -> anyhow::Result<Self> {
        let blob_index_path = layout.blob_index_file();

        let blob_map = if blob_index_path.is_file() {
            let content = std::fs::read(&blob_index_path).with_context(|| {
                format!("Unable to read blob index {}", blob_index_path.display())
            })?;
            BlobMap::deserialize(Cursor::new(content))?
        } else {
            BlobMap::default()
        };

        Ok(Database {
            objects_path: layout.objects().into_boxed_path(),
            commits_path: layout.commits().into_boxed_path(),
            blob_index_path: blob_index_path.into_boxed_path(),
            blob_map: RefCell::new(blob_map),
        })
    }

    pub fn blob_map(&self) -> Ref<'_, BlobMap> {
        self.blob_map.borrow()
    }

    pub fn contains_blob(&self, oid: &ObjectId) -> bool {
        self.blob_map.borrow().contains(oid)
    }

    /// Store a blob unless its content is already present
    ///
    /// # Returns
    ///
    /// The blob id, which is the hash of its content
    pub fn store_blob(&self, blob: &Blob) -> anyhow::Result<ObjectId> {
        let oid = blob.object_id()?;

        if self.contains_blob(&oid) {
            return Ok(oid);
        }

        self.write_object(&self.objects_path.join(oid.as_ref()), blob.serialize()?)?;

        self.blob_map
            .borrow_mut()
            .insert(oid.clone(), oid.to_string());
        self.write_blob_index()?;

        tracing::debug!(oid = %oid, items = self.blob_map.borrow().len(), "stored blob");
        Ok(oid)
    }

    /// Persist the blob index
    pub fn write_blob_index(&self) -> anyhow::Result<()> {
        write_atomically(&self.blob_index_path, &self.blob_map.borrow().serialize()?)
    }

    pub fn load_blob(&self, oid: &ObjectId) -> anyhow::Result<Blob> {
        let file_name = self
            .blob_map
            .borrow()
            .get(oid)
            .map(|slot| slot.file_name.clone())
            .with_context(|| format!("blob {oid} is not in the store"))?;

        let content = self.read_object(&self.objects_path.join(file_name))?;
        Blob::deserialize(Cursor::new(content))
    }

    pub fn contains_commit(&self, oid: &ObjectId) -> bool {
        self.commit_path(oid).is_file()
    }

    /// Store a commit under the hash of its encoding
    pub fn store_commit(&self, commit: &Commit) -> anyhow::Result<ObjectId> {
        let oid = commit.object_id()?;

        if !self.contains_commit(&oid) {
            self.write_object(&self.commit_path(&oid), commit.serialize()?)?;
            tracing::debug!(oid = %oid, "stored commit");
        }

        Ok(oid)
    }

    pub fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        let content = self.read_object(&self.commit_path(oid))?;

        Commit::deserialize(Cursor::new(content))
            .with_context(|| format!("Unable to parse commit {oid}"))
    }

    pub fn load_slim_commit(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        Ok(self.load_commit(oid)?.to_slim(oid.clone()))
    }

    /// Ids of every stored commit, sorted
    pub fn commit_ids(&self) -> anyhow::Result<Vec<ObjectId>> {
        if !self.commits_path.is_dir() {
            return Ok(vec![]);
        }

        let mut ids = std::fs::read_dir(&self.commits_path)
            .with_context(|| format!("Unable to list {}", self.commits_path.display()))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| ObjectId::try_parse(entry.file_name().to_string_lossy().into()).ok())
            .collect::<Vec<_>>();
        ids.sort();

        Ok(ids)
    }

    /// Resolve a full or abbreviated commit id
    ///
    /// A prefix must name exactly one stored commit.
    pub fn find_commit(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let mut matches = self
            .commit_ids()?
            .into_iter()
            .filter(|oid| oid.matches_prefix(prefix));

        match (matches.next(), matches.next()) {
            (Some(oid), None) => Ok(oid),
            (Some(_), Some(_)) => Err(TwigError::AmbiguousCommitId(prefix.to_string()).into()),
            (None, _) => Err(TwigError::CommitNotFound.into()),
        }
    }

    fn commit_path(&self, oid: &ObjectId) -> PathBuf {
        self.commits_path.join(oid.as_ref())
    }

    fn read_object(&self, object_path: &Path) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(object_path).with_context(|| {
            format!("Unable to read object file {}", object_path.display())
        })?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: &Path, object_content: Bytes) -> anyhow::Result<()> {
        let object_content = Self::compress(object_content)?;

        write_atomically(object_path, &object_content)
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::user_error;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct Store {
        _dir: TempDir,
        layout: StoreLayout,
        database: Database,
    }

    #[fixture]
    fn store() -> Store {
        let dir = TempDir::new().unwrap();
        let layout = StoreLayout::from_root(dir.path());
        let database = Database::open(&layout).unwrap();

        Store {
            _dir: dir,
            layout,
            database,
        }
    }

    #[rstest]
    fn storing_the_same_content_twice_keeps_one_blob(store: Store) {
        let first = store.database.store_blob(&Blob::from(b"hello".to_vec())).unwrap();
        let second = store.database.store_blob(&Blob::from(b"hello".to_vec())).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.database.blob_map().len(), 1);
        assert_eq!(std::fs::read_dir(store.layout.objects()).unwrap().count(), 1);
    }

    #[rstest]
    fn blobs_load_back_byte_for_byte(store: Store) {
        let oid = store.database.store_blob(&Blob::from(b"\x00binary\xff".to_vec())).unwrap();

        let blob = store.database.load_blob(&oid).unwrap();

        assert_eq!(blob.content().as_ref(), b"\x00binary\xff");
    }

    #[rstest]
    fn blob_index_survives_reopening(store: Store) {
        for n in 0..30 {
            store
                .database
                .store_blob(&Blob::from(format!("content {n}").into_bytes()))
                .unwrap();
        }

        let reopened = Database::open(&store.layout).unwrap();

        assert_eq!(*reopened.blob_map(), *store.database.blob_map());
    }

    #[rstest]
    fn commits_resolve_by_unique_prefix(store: Store) {
        let oid = store.database.store_commit(&Commit::root("initial commit")).unwrap();

        assert_eq!(store.database.find_commit(&oid.to_short_oid()).unwrap(), oid);
        assert_eq!(store.database.load_commit(&oid).unwrap().message(), "initial commit");
    }

    #[rstest]
    fn unknown_prefixes_are_reported(store: Store) {
        store.database.store_commit(&Commit::root("initial commit")).unwrap();

        let error = store.database.find_commit("zzzz").unwrap_err();

        assert_eq!(user_error(&error), Some(&TwigError::CommitNotFound));
    }
}
