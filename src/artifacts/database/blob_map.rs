//! Bucketed hash table indexing the blobs of a store
//!
//! Every stored blob is recorded here under its content hash. The table is an
//! array of buckets, each an ordered list of slots, with the bucket chosen by
//! `hash(key) mod capacity`. There is no removal: blobs are never deleted.
//!
//! ## Growth policy
//!
//! Before a new key is placed, if `items / capacity` exceeds [`LOAD_FACTOR`]
//! the table grows to `capacity * GROWTH_FACTOR` and every slot is rehashed
//! into the new bucket array, in bucket order. The policy is fixed so bucket
//! distribution is reproducible across runs and stores.
//!
//! ## Format
//!
//! ```text
//! capacity <n>
//! <bucket> <key> <file>      (bucket order, then slot order)
//! ```

use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// Bucket count of a fresh table
pub const INITIAL_CAPACITY: usize = 31;

/// Ratio of items to buckets above which the table grows
pub const LOAD_FACTOR: f64 = 0.75;

/// Multiplier applied to the bucket count on growth
pub const GROWTH_FACTOR: usize = 2;

/// A key and the file holding its content, relative to the objects directory
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct BlobSlot {
    pub key: ObjectId,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobMap {
    buckets: Vec<Vec<BlobSlot>>,
    items: usize,
}

impl Default for BlobMap {
    fn default() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }
}

/// 32-bit polynomial string hash (`h = 31 * h + byte`), wrapping on overflow
///
/// The result is frequently negative for 40-character keys.
pub fn key_hash(key: &str) -> i32 {
    key.bytes()
        .fold(0i32, |hash, byte| hash.wrapping_mul(31).wrapping_add(byte as i32))
}

/// Bucket for `key` in a table of `capacity` buckets, normalized into `[0, capacity)`
pub fn bucket_index(key: &str, capacity: usize) -> usize {
    let bin = key_hash(key) as i64 % capacity as i64;

    if bin < 0 {
        (bin + capacity as i64) as usize
    } else {
        bin as usize
    }
}

impl BlobMap {
    pub fn with_capacity(capacity: usize) -> Self {
        BlobMap {
            buckets: vec![Vec::new(); capacity.max(1)],
            items: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket(&self, index: usize) -> &[BlobSlot] {
        self.buckets.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, key: &ObjectId) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &ObjectId) -> Option<&BlobSlot> {
        self.buckets[bucket_index(key.as_ref(), self.capacity())]
            .iter()
            .find(|slot| &slot.key == key)
    }

    /// Record a key
    ///
    /// # Returns
    ///
    /// false if the key was already present, in which case nothing changes
    pub fn insert(&mut self, key: ObjectId, file_name: String) -> bool {
        if self.contains(&key) {
            return false;
        }

        if self.items as f64 / self.capacity() as f64 > LOAD_FACTOR {
            self.resize(self.capacity() * GROWTH_FACTOR);
        }

        let bin = bucket_index(key.as_ref(), self.capacity());
        self.buckets[bin].push(BlobSlot::new(key, file_name));
        self.items += 1;

        true
    }

    pub fn slots(&self) -> impl Iterator<Item = &BlobSlot> {
        self.buckets.iter().flatten()
    }

    fn resize(&mut self, capacity: usize) {
        let mut buckets = vec![Vec::new(); capacity];

        for slot in self.buckets.drain(..).flatten() {
            let bin = bucket_index(slot.key.as_ref(), capacity);
            buckets[bin].push(slot);
        }

        tracing::debug!(capacity, items = self.items, "rehashed blob index");
        self.buckets = buckets;
    }
}

impl Packable for BlobMap {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![format!("capacity {}", self.capacity())];

        for (index, bucket) in self.buckets.iter().enumerate() {
            for slot in bucket {
                lines.push(format!("{} {} {}", index, slot.key, slot.file_name));
            }
        }

        let mut content = lines.join("\n");
        content.push('\n');

        Ok(Bytes::from(content))
    }
}

impl Unpackable for BlobMap {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut lines = reader.lines();

        let capacity_line = lines
            .next()
            .context("Invalid blob index: missing capacity line")??;
        let capacity = capacity_line
            .strip_prefix("capacity ")
            .context("Invalid blob index: invalid capacity line")?
            .parse::<usize>()
            .context("Invalid blob index: capacity is not a number")?;
        if capacity == 0 {
            anyhow::bail!("Invalid blob index: zero capacity");
        }

        let mut map = BlobMap::with_capacity(capacity);

        for line in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let mut parts = line.splitn(3, ' ');
            let (Some(index), Some(key), Some(file_name)) = (parts.next(), parts.next(), parts.next())
            else {
                anyhow::bail!("Invalid blob index: malformed slot line {line:?}");
            };

            let index = index
                .parse::<usize>()
                .context("Invalid blob index: bucket is not a number")?;
            if index >= capacity {
                anyhow::bail!("Invalid blob index: bucket {index} out of range");
            }

            map.buckets[index].push(BlobSlot::new(
                ObjectId::try_parse(key.to_string())?,
                file_name.to_string(),
            ));
            map.items += 1;
        }

        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::hash_bytes;
    use pretty_assertions::assert_eq;
    use proptest::proptest;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    fn key(n: usize) -> ObjectId {
        hash_bytes(format!("blob-{n}").as_bytes())
    }

    #[fixture]
    fn populated() -> BlobMap {
        let mut map = BlobMap::default();
        for n in 0..40 {
            map.insert(key(n), key(n).to_string());
        }
        map
    }

    #[test]
    fn key_hash_matches_the_polynomial_string_hash() {
        assert_eq!(key_hash(""), 0);
        assert_eq!(key_hash("a"), 97);
        assert_eq!(key_hash("ab"), 97 * 31 + 98);
        assert_eq!(key_hash("hello"), 99162322);
    }

    #[test]
    fn negative_hashes_are_normalized_into_range() {
        // wraps exactly onto i32::MIN
        assert_eq!(key_hash("polygenelubricants"), i32::MIN);
        assert_eq!(bucket_index("polygenelubricants", 31), 29);
    }

    proptest! {
        #[test]
        fn bucket_index_is_always_in_range(key in "\\PC{0,64}", capacity in 1usize..4096) {
            assert!(bucket_index(&key, capacity) < capacity);
        }
    }

    #[test]
    fn inserting_the_same_key_twice_keeps_one_slot() {
        let mut map = BlobMap::default();

        assert!(map.insert(key(1), key(1).to_string()));
        assert!(!map.insert(key(1), key(1).to_string()));

        assert_eq!(map.len(), 1);
        assert_eq!(map.slots().count(), 1);
    }

    #[test]
    fn grows_only_once_the_load_factor_is_exceeded() {
        let mut map = BlobMap::default();

        // 23/31 is under the load factor, so the 24th insert still fits
        for n in 0..24 {
            map.insert(key(n), key(n).to_string());
        }
        assert_eq!(map.capacity(), INITIAL_CAPACITY);

        // 24/31 exceeds it, so the 25th insert doubles the table first
        map.insert(key(24), key(24).to_string());
        assert_eq!(map.capacity(), INITIAL_CAPACITY * GROWTH_FACTOR);
        assert_eq!(map.len(), 25);
    }

    #[rstest]
    fn every_key_sits_in_its_hashed_bucket_after_growth(populated: BlobMap) {
        assert_eq!(populated.capacity(), INITIAL_CAPACITY * GROWTH_FACTOR);

        for index in 0..populated.capacity() {
            for slot in populated.bucket(index) {
                assert_eq!(bucket_index(slot.key.as_ref(), populated.capacity()), index);
            }
        }
        for n in 0..40 {
            assert!(populated.contains(&key(n)));
        }
    }

    #[rstest]
    fn reloading_keeps_the_bucket_layout(populated: BlobMap) {
        let encoded = populated.serialize().unwrap();
        let decoded = BlobMap::deserialize(Cursor::new(encoded)).unwrap();

        assert_eq!(decoded, populated);
    }

    #[test]
    fn rejects_slots_outside_the_table() {
        let raw = format!("capacity 2\n5 {} file\n", key(0));

        assert!(BlobMap::deserialize(Cursor::new(raw.into_bytes())).is_err());
    }
}
