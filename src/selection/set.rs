//! Hash-indexed set of grid records.
//!
//! Records live densely in a `Vec`; each bucket heads an intrusive doubly
//! linked chain threaded through the records by index. Removal moves the
//! tail record into the freed slot and re-points its chain neighbours, so
//! the backing store never has holes and brushes can rebuild every move
//! without reallocating.

use std::collections::HashSet;
use std::fmt;
use std::ops::Index;

use thiserror::Error;

use crate::core::types::Vec2;
use super::record::{GridCoord, GridRecord};

/// Bucket count used by [`SpatialSet::new`].
pub const DEFAULT_BUCKET_COUNT: usize = 1024;

/// Chain corruption found by [`SpatialSet::check_chains`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("bucket {bucket} points at record {index}, past the end")]
    DanglingHead { bucket: usize, index: usize },

    #[error("record {index} links to {target}, past the end")]
    DanglingLink { index: usize, target: usize },

    #[error("bucket {bucket} head {index} has a prev link")]
    HeadHasPrev { bucket: usize, index: usize },

    #[error("record {index} is chained in bucket {found} but hashes to {expected}")]
    WrongBucket { index: usize, found: usize, expected: usize },

    #[error("record {index} prev link does not point back to {expected:?}")]
    BrokenBackLink { index: usize, expected: Option<usize> },

    #[error("bucket {bucket} chain does not terminate")]
    Cycle { bucket: usize },

    #[error("record {index} is unlinked but not a bucket head")]
    OrphanHead { index: usize },

    #[error("{reachable} of {len} records are reachable from bucket heads")]
    Unreachable { reachable: usize, len: usize },

    #[error("coordinate {0:?} is stored more than once")]
    Duplicate(GridCoord),
}

/// Unique-by-coordinate collection of [`GridRecord`]s with O(1) average
/// insert, lookup and removal.
#[derive(Clone)]
pub struct SpatialSet {
    records: Vec<GridRecord>,
    buckets: Vec<Option<usize>>,
}

impl SpatialSet {
    /// Create an empty set with [`DEFAULT_BUCKET_COUNT`] buckets
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKET_COUNT)
    }

    /// Create an empty set with a specific bucket count (at least one).
    pub fn with_buckets(bucket_count: usize) -> Self {
        Self {
            records: Vec::new(),
            buckets: vec![None; bucket_count.max(1)],
        }
    }

    /// Number of hash buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Clear all records and bucket heads, keeping allocations.
    pub fn reset(&mut self) {
        self.records.clear();
        self.buckets.fill(None);
    }

    /// Insert a record. Returns `false` without change if its coordinate
    /// is already present.
    pub fn add(&mut self, info: GridRecord) -> bool {
        let bucket = self.bucket_of(&info.coord);
        if self.find_in_bucket(bucket, &info.coord).is_some() {
            return false;
        }

        let index = self.records.len();
        let head = self.buckets[bucket];
        if let Some(h) = head {
            self.records[h].prev = Some(index);
        }

        let mut record = info.unlinked();
        record.next = head;
        self.buckets[bucket] = Some(index);
        self.records.push(record);
        true
    }

    /// Remove the record at `info`'s coordinate. Returns `false` if absent.
    pub fn remove(&mut self, info: &GridRecord) -> bool {
        self.remove_at(&info.coord).is_some()
    }

    /// Remove the record at `coord`, returning it.
    ///
    /// The last record is moved into the freed slot, so indices of other
    /// records may change.
    pub fn remove_at(&mut self, coord: &GridCoord) -> Option<GridRecord> {
        let bucket = self.bucket_of(coord);
        let victim = self.find_in_bucket(bucket, coord)?;

        let GridRecord { prev, next, .. } = self.records[victim];
        match prev {
            Some(p) => self.records[p].next = next,
            None => self.buckets[bucket] = next,
        }
        if let Some(n) = next {
            self.records[n].prev = prev;
        }

        let last = self.records.len() - 1;
        if victim == last {
            return self.records.pop().map(GridRecord::unlinked);
        }

        let removed = self.records.swap_remove(victim);

        // The former tail now sits at `victim`; its neighbours still point at `last`.
        let moved = self.records[victim];
        match moved.prev {
            Some(p) => self.records[p].next = Some(victim),
            None => {
                let moved_bucket = self.bucket_of(&moved.coord);
                self.buckets[moved_bucket] = Some(victim);
            }
        }
        if let Some(n) = moved.next {
            self.records[n].prev = Some(victim);
        }

        Some(removed.unlinked())
    }

    /// Look up the record at `coord`.
    pub fn get(&self, coord: &GridCoord) -> Option<&GridRecord> {
        self.index_of(coord).map(|i| &self.records[i])
    }

    /// Check whether a coordinate is present
    pub fn contains(&self, coord: &GridCoord) -> bool {
        self.index_of(coord).is_some()
    }

    /// Weight stored for `coord`, if present.
    pub fn weight_of(&self, coord: &GridCoord) -> Option<f32> {
        self.get(coord).map(|r| r.weight)
    }

    /// Overwrite the payload of the record at `info`'s coordinate.
    /// Chain links are untouched. Returns `false` if absent.
    pub fn set_info(&mut self, info: &GridRecord) -> bool {
        match self.index_of(&info.coord) {
            Some(i) => {
                self.records[i].assign_payload(info);
                true
            }
            None => false,
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over present records. Order is unspecified after removals.
    pub fn iter(&self) -> std::slice::Iter<'_, GridRecord> {
        self.records.iter()
    }

    /// Present records as a dense slice
    pub fn as_slice(&self) -> &[GridRecord] {
        &self.records
    }

    /// Position of `coord` in the dense record storage.
    pub fn index_of(&self, coord: &GridCoord) -> Option<usize> {
        self.find_in_bucket(self.bucket_of(coord), coord)
    }

    /// Walk every chain and confirm bucket heads, back links and chain
    /// membership agree with the records.
    pub fn check_chains(&self) -> Result<(), ChainError> {
        let len = self.records.len();
        let mut reachable = 0usize;
        let mut seen = HashSet::with_capacity(len);

        for (bucket, head) in self.buckets.iter().enumerate() {
            let Some(head) = *head else { continue };
            if head >= len {
                return Err(ChainError::DanglingHead { bucket, index: head });
            }
            if self.records[head].prev.is_some() {
                return Err(ChainError::HeadHasPrev { bucket, index: head });
            }

            let mut prev = None;
            let mut cursor = Some(head);
            let mut steps = 0usize;
            while let Some(index) = cursor {
                steps += 1;
                if steps > len {
                    return Err(ChainError::Cycle { bucket });
                }

                let record = &self.records[index];
                if record.prev != prev {
                    return Err(ChainError::BrokenBackLink { index, expected: prev });
                }
                let expected = self.bucket_of(&record.coord);
                if expected != bucket {
                    return Err(ChainError::WrongBucket { index, found: bucket, expected });
                }
                if !seen.insert(record.coord) {
                    return Err(ChainError::Duplicate(record.coord));
                }
                if let Some(target) = record.next {
                    if target >= len {
                        return Err(ChainError::DanglingLink { index, target });
                    }
                }

                reachable += 1;
                prev = Some(index);
                cursor = record.next;
            }
        }

        for (index, record) in self.records.iter().enumerate() {
            if record.prev.is_none() && self.buckets[self.bucket_of(&record.coord)] != Some(index) {
                return Err(ChainError::OrphanHead { index });
            }
        }

        if reachable != len {
            return Err(ChainError::Unreachable { reachable, len });
        }
        Ok(())
    }

    /// Assert chain integrity in debug builds. Does nothing in release.
    pub fn validate(&self) {
        if cfg!(debug_assertions) {
            if let Err(e) = self.check_chains() {
                panic!("selection chain corruption: {e}");
            }
        }
    }

    fn find_in_bucket(&self, bucket: usize, coord: &GridCoord) -> Option<usize> {
        let mut cursor = self.buckets[bucket];
        while let Some(index) = cursor {
            let record = &self.records[index];
            if record.coord == *coord {
                return Some(index);
            }
            cursor = record.next;
        }
        None
    }

    fn bucket_of(&self, coord: &GridCoord) -> usize {
        hash_coord(coord, self.buckets.len())
    }
}

/// Spread nearby cells across buckets: offset the position, take its
/// length, and keep the fractional part of a golden-ratio multiple.
fn hash_coord(coord: &GridCoord, bucket_count: usize) -> usize {
    let offset = Vec2::new(1.3 + coord.surface.0 as f32 * 7.1, 3.5);
    let length = (coord.pos.as_vec2() + offset).length();
    let frac = (length * 0.618).fract();
    ((bucket_count as f32 * frac) as usize).min(bucket_count - 1)
}

impl Default for SpatialSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for SpatialSet {
    type Output = GridRecord;

    fn index(&self, index: usize) -> &GridRecord {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a SpatialSet {
    type Item = &'a GridRecord;
    type IntoIter = std::slice::Iter<'a, GridRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Debug for SpatialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialSet")
            .field("len", &self.records.len())
            .field("buckets", &self.buckets.len())
            .finish()
    }
}
