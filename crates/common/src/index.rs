// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! A concurrent chained hash index: fixed bucket count, separate chaining on collision,
//! and a pool of reader/writer lock stripes so unrelated buckets never contend.
//!
//! The bucket table is partitioned into `2^max(0, hashpower - 7)` stripes (see
//! [`rcachesim_core::hash::stripe_count`]); a bucket's stripe is its id masked by the
//! low bits of the stripe count, so adjacent buckets interleave across stripes rather
//! than clustering on one. There is no global lock: two operations on buckets in
//! different stripes run fully in parallel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use rand::Rng;
use rcachesim_core::hash::{bucket_index, stripe_count, stripe_index};
use rcachesim_core::ObjId;

use crate::record::{ObjectRecord, RecordHandle};

type Bucket = Option<Box<ObjectRecord>>;

struct Stripe {
    slots: Vec<Bucket>,
}

impl Drop for Stripe {
    // The derived drop for `Bucket` recurses one stack frame per chain node. Walk each
    // chain iteratively instead, so a long collision chain cannot overflow the stack.
    fn drop(&mut self) {
        for slot in &mut self.slots {
            let mut cursor = slot.take();
            while let Some(mut node) = cursor {
                cursor = node.hash_next.take();
            }
        }
    }
}

/// A concurrent, chained hash index keyed by [`ObjId`].
///
/// The index owns every resident [`ObjectRecord`] for as long as it is resident; callers
/// navigate records through [`RecordHandle`]s rather than taking ownership.
pub struct ChainedHashIndex {
    hashpower: u8,
    num_buckets: usize,
    num_stripes: usize,
    stripes: Vec<RwLock<Stripe>>,
    n_obj: AtomicUsize,
}

impl ChainedHashIndex {
    /// Creates an empty index with `2^hashpower` buckets.
    #[must_use]
    pub fn new(hashpower: u8) -> Self {
        let num_buckets = 1usize << hashpower;
        let num_stripes = stripe_count(hashpower);
        let buckets_per_stripe = num_buckets / num_stripes;

        let stripes = (0..num_stripes)
            .map(|_| {
                let mut slots = Vec::with_capacity(buckets_per_stripe);
                slots.resize_with(buckets_per_stripe, || None);
                RwLock::new(Stripe { slots })
            })
            .collect();

        Self {
            hashpower,
            num_buckets,
            num_stripes,
            stripes,
            n_obj: AtomicUsize::new(0),
        }
    }

    /// The number of resident records, read with acquire ordering to observe a
    /// consistent snapshot with respect to a preceding `insert`/`delete_by_id`.
    #[must_use]
    pub fn n_obj(&self) -> usize {
        self.n_obj.load(Ordering::Acquire)
    }

    fn locate(&self, id: ObjId) -> (usize, usize) {
        let bucket_id = bucket_index(id, self.hashpower);
        let stripe = stripe_index(bucket_id, self.num_stripes);
        let local = bucket_id >> self.num_stripes.trailing_zeros();
        (stripe, local)
    }

    /// Looks up `id`, returning a handle to the resident record if present.
    #[must_use]
    pub fn find(&self, id: ObjId) -> Option<RecordHandle> {
        let (stripe_idx, local_idx) = self.locate(id);
        let stripe = self.stripes[stripe_idx]
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut cursor = stripe.slots[local_idx].as_ref();
        while let Some(record) = cursor {
            if record.obj_id == id {
                return Some(RecordHandle::from_box(record));
            }
            cursor = record.hash_next.as_ref();
        }
        None
    }

    /// Inserts `record` if no record with the same id is already resident; otherwise
    /// drops `record` and returns a handle to the existing one. Either way, the returned
    /// handle is resident in the index once this call returns.
    pub fn insert(&self, mut record: Box<ObjectRecord>) -> RecordHandle {
        let (stripe_idx, local_idx) = self.locate(record.obj_id);
        let mut stripe = self.stripes[stripe_idx]
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut cursor = stripe.slots[local_idx].as_ref();
        while let Some(existing) = cursor {
            if existing.obj_id == record.obj_id {
                return RecordHandle::from_box(existing);
            }
            cursor = existing.hash_next.as_ref();
        }

        record.hash_next = stripe.slots[local_idx].take();
        stripe.slots[local_idx] = Some(record);
        self.n_obj.fetch_add(1, Ordering::AcqRel);
        RecordHandle::from_box(stripe.slots[local_idx].as_ref().unwrap())
    }

    /// Removes the record with the given id, if resident, dropping it. Returns whether
    /// a record was removed.
    pub fn delete_by_id(&self, id: ObjId) -> bool {
        let (stripe_idx, local_idx) = self.locate(id);
        let mut stripe = self.stripes[stripe_idx]
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if stripe.slots[local_idx].as_ref().is_some_and(|r| r.obj_id == id) {
            let mut removed = stripe.slots[local_idx].take().unwrap();
            stripe.slots[local_idx] = removed.hash_next.take();
            self.n_obj.fetch_sub(1, Ordering::AcqRel);
            return true;
        }

        let mut prev = stripe.slots[local_idx].as_mut();
        while let Some(node) = prev {
            if node.hash_next.as_ref().is_some_and(|n| n.obj_id == id) {
                let mut removed = node.hash_next.take().unwrap();
                node.hash_next = removed.hash_next.take();
                self.n_obj.fetch_sub(1, Ordering::AcqRel);
                return true;
            }
            prev = node.hash_next.as_mut();
        }
        false
    }

    /// Returns a handle to an arbitrarily chosen resident record, or `None` if the
    /// index is empty.
    #[must_use]
    pub fn random_object(&self) -> Option<RecordHandle> {
        if self.n_obj() == 0 {
            return None;
        }
        let mut rng = rand::rng();
        loop {
            let bucket_id = rng.random_range(0..self.num_buckets);
            let stripe_idx = stripe_index(bucket_id, self.num_stripes);
            let local_idx = bucket_id >> self.num_stripes.trailing_zeros();
            let stripe = self.stripes[stripe_idx]
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(record) = stripe.slots[local_idx].as_ref() {
                return Some(RecordHandle::from_box(record));
            }
        }
    }

    /// Visits every resident record exactly once, handing ownership to `visitor`. A
    /// visitor that drops its argument frees the record; a visitor that leaks or stores
    /// it takes over responsibility for eventually dropping it.
    pub fn foreach<F: FnMut(Box<ObjectRecord>)>(&self, mut visitor: F) {
        for stripe_lock in &self.stripes {
            let mut stripe = stripe_lock
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            for slot in &mut stripe.slots {
                let mut cursor = slot.take();
                while let Some(mut node) = cursor {
                    cursor = node.hash_next.take();
                    self.n_obj.fetch_sub(1, Ordering::AcqRel);
                    visitor(node);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use rcachesim_core::VirtualTime;
    use rstest::rstest;

    use super::*;

    fn record(id: u64) -> Box<ObjectRecord> {
        Box::new(ObjectRecord::new(ObjId(id), 8, None, VirtualTime(0)))
    }

    #[rstest]
    fn test_insert_then_find_round_trips() {
        let index = ChainedHashIndex::new(8);
        index.insert(record(42));
        let handle = index.find(ObjId(42)).expect("record should be resident");
        assert_eq!(handle.obj_id(), ObjId(42));
        assert_eq!(index.n_obj(), 1);
    }

    #[rstest]
    fn test_find_missing_is_none() {
        let index = ChainedHashIndex::new(8);
        assert!(index.find(ObjId(1)).is_none());
    }

    #[rstest]
    fn test_insert_duplicate_keeps_existing_and_drops_newcomer() {
        let index = ChainedHashIndex::new(8);
        index.insert(record(1));
        index.insert(record(1));
        assert_eq!(index.n_obj(), 1);
    }

    #[rstest]
    fn test_delete_by_id_removes_record() {
        let index = ChainedHashIndex::new(8);
        index.insert(record(7));
        assert!(index.delete_by_id(ObjId(7)));
        assert!(index.find(ObjId(7)).is_none());
        assert_eq!(index.n_obj(), 0);
    }

    #[rstest]
    fn test_delete_by_id_missing_returns_false() {
        let index = ChainedHashIndex::new(8);
        assert!(!index.delete_by_id(ObjId(1)));
    }

    #[rstest]
    fn test_delete_from_middle_of_chain_preserves_siblings() {
        // Small hashpower forces collisions onto the same bucket.
        let index = ChainedHashIndex::new(1);
        for id in 0..20u64 {
            index.insert(record(id));
        }
        for id in 0..20u64 {
            assert!(index.delete_by_id(ObjId(id)), "id {id} should have been resident");
        }
        assert_eq!(index.n_obj(), 0);
    }

    #[rstest]
    fn test_foreach_visits_every_record_exactly_once() {
        let index = ChainedHashIndex::new(4);
        for id in 0..50u64 {
            index.insert(record(id));
        }
        let mut seen = Vec::new();
        index.foreach(|r| seen.push(r.obj_id));
        seen.sort_by_key(|id| id.0);
        let expected: Vec<ObjId> = (0..50u64).map(ObjId).collect();
        assert_eq!(seen, expected);
        assert_eq!(index.n_obj(), 0);
    }

    #[rstest]
    fn test_random_object_on_empty_index_is_none() {
        let index = ChainedHashIndex::new(8);
        assert!(index.random_object().is_none());
    }

    #[rstest]
    fn test_random_object_returns_a_resident_record() {
        let index = ChainedHashIndex::new(8);
        index.insert(record(3));
        let handle = index.random_object().expect("index is non-empty");
        assert_eq!(handle.obj_id(), ObjId(3));
    }

    #[rstest]
    fn test_concurrent_insert_find_delete_preserves_n_obj() {
        let index = Arc::new(ChainedHashIndex::new(10));
        let n_threads = 8;
        let per_thread = 125u64;

        thread::scope(|scope| {
            for t in 0..n_threads {
                let index = Arc::clone(&index);
                scope.spawn(move || {
                    let base = t * per_thread;
                    for offset in 0..per_thread {
                        let id = base + offset;
                        index.insert(record(id));
                    }
                    for offset in 0..per_thread {
                        let id = base + offset;
                        assert!(index.find(ObjId(id)).is_some());
                    }
                });
            }
        });

        assert_eq!(index.n_obj(), (n_threads * per_thread) as usize);

        thread::scope(|scope| {
            for t in 0..n_threads {
                let index = Arc::clone(&index);
                scope.spawn(move || {
                    let base = t * per_thread;
                    for offset in 0..per_thread {
                        let id = base + offset;
                        assert!(index.delete_by_id(ObjId(id)));
                    }
                });
            }
        });

        assert_eq!(index.n_obj(), 0);
    }
}
