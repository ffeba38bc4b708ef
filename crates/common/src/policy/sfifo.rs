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

//! Segmented FIFO: `n_seg` ordered queues, promotion by one segment per hit, and a
//! cooling cascade that relieves per-segment overflow down to eviction at segment 0.

use rcachesim_core::{ObjId, RealTime, Request, VirtualTime};

use crate::index::ChainedHashIndex;
use crate::list::ListEnds;
use crate::params::{CommonCacheParams, SegmentedFifoParams};
use crate::policy::{EvictedObject, EvictionPolicy};
use crate::record::{ObjectRecord, RecordHandle};
use crate::stats::{CacheStats, EvictionAgeRecorder, NullEvictionAgeRecorder};

/// A segmented FIFO eviction policy: `n_seg` ordered queues, with segment 0 the
/// eviction end and segment `n_seg - 1` the hottest.
pub struct SegmentedFifo<R: EvictionAgeRecorder = NullEvictionAgeRecorder> {
    common: CommonCacheParams,
    n_seg: usize,
    per_seg_max_size: u64,
    index: ChainedHashIndex,
    segments: Vec<ListEnds>,
    segment_bytes: Vec<u64>,
    segment_counts: Vec<usize>,
    stats: CacheStats,
    last_real_time: Option<RealTime>,
    age_recorder: R,
}

impl SegmentedFifo<NullEvictionAgeRecorder> {
    /// Creates an empty segmented FIFO cache with no eviction-age recording.
    #[must_use]
    pub fn new(common: CommonCacheParams, sfifo: SegmentedFifoParams) -> Self {
        Self::with_age_recorder(common, sfifo, NullEvictionAgeRecorder)
    }
}

impl<R: EvictionAgeRecorder> SegmentedFifo<R> {
    /// Creates an empty segmented FIFO cache that reports evicted-object ages to
    /// `age_recorder`.
    #[must_use]
    pub fn with_age_recorder(
        common: CommonCacheParams,
        sfifo: SegmentedFifoParams,
        age_recorder: R,
    ) -> Self {
        let n_seg = sfifo.n_seg.max(1);
        let per_seg_max_size = common.cache_size / n_seg as u64;
        Self {
            common,
            n_seg,
            per_seg_max_size,
            index: ChainedHashIndex::new(common.hashpower),
            segments: vec![ListEnds::new(); n_seg],
            segment_bytes: vec![0; n_seg],
            segment_counts: vec![0; n_seg],
            stats: CacheStats::new(),
            last_real_time: None,
            age_recorder,
        }
    }

    fn charged_size(&self, obj_size: u32) -> u32 {
        obj_size + self.common.obj_md_size()
    }

    /// The lowest-index segment that currently holds at least one object, if any.
    fn lowest_nonempty_segment(&self) -> Option<usize> {
        (0..self.n_seg).find(|&i| self.segment_counts[i] > 0)
    }

    fn promote_to_next_segment(&mut self, mut handle: RecordHandle, level: usize) {
        let charged = self.charged_size(handle.obj_size());
        self.segments[level].unlink(handle);
        self.segment_bytes[level] -= u64::from(charged);
        self.segment_counts[level] -= 1;

        handle.set_segment_id(Some(level + 1));
        self.segments[level + 1].prepend(handle);
        self.segment_bytes[level + 1] += u64::from(charged);
        self.segment_counts[level + 1] += 1;
        debug_assert_eq!(handle.segment_id(), Some(level + 1));

        log::debug!(
            "promoted id={} from segment {} to {}",
            handle.obj_id(),
            level,
            level + 1
        );
        self.debug_assert_segment_counters_consistent();
    }

    /// Moves the tail of segment `level` into the head of segment `level - 1`,
    /// cascading further down while the receiving segment is still over budget.
    /// Degenerates to a single eviction once the cascade reaches segment 0.
    fn cool(&mut self, mut level: usize) {
        loop {
            if level == 0 {
                self.evict_lowest_nonempty();
                self.debug_assert_segment_counters_consistent();
                return;
            }

            let Some(mut tail) = self.segments[level].pop_tail() else {
                return;
            };
            let charged = self.charged_size(tail.obj_size());
            self.segment_bytes[level] -= u64::from(charged);
            self.segment_counts[level] -= 1;

            tail.set_segment_id(Some(level - 1));
            self.segments[level - 1].prepend(tail);
            self.segment_bytes[level - 1] += u64::from(charged);
            self.segment_counts[level - 1] += 1;
            debug_assert_eq!(tail.segment_id(), Some(level - 1));

            log::debug!(
                "cooled id={} from segment {} to {}",
                tail.obj_id(),
                level,
                level - 1
            );
            self.debug_assert_segment_counters_consistent();

            if self.segment_bytes[level - 1] > self.per_seg_max_size {
                level -= 1;
                continue;
            }
            return;
        }
    }

    fn evict_lowest_nonempty(&mut self) -> Option<EvictedObject> {
        let level = self.lowest_nonempty_segment()?;
        let handle = self.segments[level].pop_tail()?;
        let obj_id = handle.obj_id();
        let obj_size = handle.obj_size();
        let charged = self.charged_size(obj_size);

        self.record_eviction_age(handle);

        self.segment_bytes[level] -= u64::from(charged);
        self.segment_counts[level] -= 1;
        self.index.delete_by_id(obj_id);
        self.stats.record_depart(charged);

        log::debug!("evicted id={obj_id} size={obj_size} from segment {level}");
        self.debug_assert_segment_counters_consistent();
        Some(EvictedObject { obj_id, obj_size })
    }

    fn record_eviction_age(&mut self, handle: RecordHandle) {
        let virtual_age = self.stats.n_req - handle.create_time_virtual().0;
        let real_age = handle
            .create_time_real()
            .and_then(|created| self.last_real_time.map(|now| now - created));
        self.age_recorder.record_eviction(real_age, virtual_age);
    }

    /// Debug-only cross-check that the per-segment counters still agree with the
    /// cache-wide totals they are supposed to sum to.
    fn debug_assert_segment_counters_consistent(&self) {
        debug_assert_eq!(
            self.segment_bytes.iter().sum::<u64>(),
            self.stats.occupied_size,
            "segment_bytes does not sum to occupied_size"
        );
        debug_assert_eq!(
            self.segment_counts.iter().sum::<usize>(),
            self.stats.n_obj,
            "segment_counts does not sum to n_obj"
        );
    }
}

impl<R: EvictionAgeRecorder> EvictionPolicy for SegmentedFifo<R> {
    fn check(&mut self, id: ObjId, update: bool) -> bool {
        let Some(handle) = self.index.find(id) else {
            return false;
        };
        if !update {
            return true;
        }

        let level = handle.segment_id().expect("resident record always has a segment");
        if level == self.n_seg - 1 {
            self.segments[level].move_to_head(handle);
        } else {
            self.promote_to_next_segment(handle, level);
        }

        let new_level = handle.segment_id().expect("just assigned above");
        while self.stats.occupied_size > self.common.cache_size {
            self.cool(new_level);
        }

        true
    }

    fn can_insert(&self, req: &Request) -> bool {
        u64::from(self.charged_size(req.obj_size)) <= self.per_seg_max_size
    }

    fn needs_eviction_for(&self, req: &Request) -> bool {
        self.stats.occupied_size + u64::from(self.charged_size(req.obj_size)) > self.common.cache_size
    }

    fn insert(&mut self, req: &Request) {
        if !self.can_insert(req) {
            return;
        }
        let charged = u64::from(self.charged_size(req.obj_size));

        while self.segment_bytes[0] + charged > self.per_seg_max_size {
            if self.evict_lowest_nonempty().is_none() {
                break;
            }
        }

        let record = Box::new(ObjectRecord::new(
            req.obj_id,
            req.obj_size,
            self.last_real_time,
            VirtualTime(self.stats.n_req),
        ));
        let mut handle = self.index.insert(record);
        handle.set_segment_id(Some(0));
        self.segments[0].prepend(handle);
        self.segment_bytes[0] += charged;
        self.segment_counts[0] += 1;
        debug_assert_eq!(handle.segment_id(), Some(0));
        self.stats.record_admit(self.charged_size(req.obj_size));

        log::debug!("admitted id={} to segment 0", req.obj_id);
        self.debug_assert_segment_counters_consistent();
    }

    fn to_evict(&self) -> Option<RecordHandle> {
        let level = self.lowest_nonempty_segment()?;
        self.segments[level].tail
    }

    fn evict(&mut self, _req: &Request) -> Option<EvictedObject> {
        self.evict_lowest_nonempty()
    }

    fn remove(&mut self, id: ObjId) -> bool {
        let Some(handle) = self.index.find(id) else {
            log::warn!("remove called for non-resident id={id}");
            return false;
        };
        let level = handle.segment_id().expect("resident record always has a segment");
        let obj_size = handle.obj_size();
        self.segments[level].unlink(handle);
        self.segment_bytes[level] -= u64::from(self.charged_size(obj_size));
        self.segment_counts[level] -= 1;
        self.index.delete_by_id(id);
        self.stats.record_depart(self.charged_size(obj_size));
        true
    }

    fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    fn note_request_time(&mut self, req: &Request) {
        if let Some(real_time) = req.real_time {
            self.last_real_time = Some(real_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn sfifo(n_seg: usize, cache_size: u64) -> SegmentedFifo {
        SegmentedFifo::new(
            CommonCacheParams::new(cache_size).with_hashpower(6),
            SegmentedFifoParams { n_seg },
        )
    }

    fn req(id: u64) -> Request {
        Request::new(ObjId(id), 1)
    }

    /// Concrete scenario 3: segment 0 fills, then evicts from itself to admit a third
    /// object rather than spilling directly into an empty higher segment.
    #[rstest]
    fn test_scenario_insert_evicts_from_segment_zero_when_full() {
        let mut cache = sfifo(2, 4);
        assert!(!cache.get(&req(1)));
        assert!(!cache.get(&req(2)));
        assert!(!cache.get(&req(3)));

        assert!(!cache.check(ObjId(1), false));
        let h2 = cache.index.find(ObjId(2)).unwrap();
        let h3 = cache.index.find(ObjId(3)).unwrap();
        assert_eq!(h2.segment_id(), Some(0));
        assert_eq!(h3.segment_id(), Some(0));
        assert_eq!(cache.segment_counts[1], 0);
    }

    /// Concrete scenario 4: a hit on a segment-0 resident object promotes it to
    /// segment 1 without overflow.
    #[rstest]
    fn test_scenario_hit_promotes_without_overflow() {
        let mut cache = sfifo(2, 4);
        assert!(!cache.get(&req(1)));
        assert!(!cache.get(&req(2)));
        assert!(cache.get(&req(1))); // hit, promotes

        let h1 = cache.index.find(ObjId(1)).unwrap();
        assert_eq!(h1.segment_id(), Some(1));
        assert_eq!(cache.segment_counts[0], 1);
        assert_eq!(cache.segment_counts[1], 1);
        assert_eq!(cache.stats().occupied_size, 2);
    }

    /// Concrete scenario 5: later admissions keep landing in segment 0, evicting from
    /// segment 0 as needed; segment 1 is untouched once occupied by a promoted object.
    #[rstest]
    fn test_scenario_later_admissions_stay_in_segment_zero() {
        let mut cache = sfifo(2, 4);
        cache.get(&req(1));
        cache.get(&req(2));
        cache.get(&req(1)); // promotes 1 to segment 1
        cache.get(&req(3)); // segment 0 has room: [3, 2]
        cache.get(&req(4)); // segment 0 full: evict 2, admit 4: [4, 3]

        assert!(!cache.check(ObjId(2), false));
        let h1 = cache.index.find(ObjId(1)).unwrap();
        let h3 = cache.index.find(ObjId(3)).unwrap();
        let h4 = cache.index.find(ObjId(4)).unwrap();
        assert_eq!(h1.segment_id(), Some(1));
        assert_eq!(h3.segment_id(), Some(0));
        assert_eq!(h4.segment_id(), Some(0));
        assert_eq!(cache.segment_counts[0], 2);
        assert_eq!(cache.segment_counts[1], 1);
    }

    #[rstest]
    fn test_hit_on_top_segment_moves_to_its_own_head_without_promoting_further() {
        let mut cache = sfifo(2, 4);
        cache.get(&req(1));
        cache.get(&req(2));
        cache.get(&req(1)); // promote 1 -> segment 1
        cache.get(&req(1)); // hit again, stays in segment 1

        let h1 = cache.index.find(ObjId(1)).unwrap();
        assert_eq!(h1.segment_id(), Some(1));
        assert_eq!(cache.segment_counts[1], 1);
    }

    #[rstest]
    fn test_round_trip_insert_check_remove_check() {
        let mut cache = sfifo(4, 16);
        assert!(!cache.get(&req(1)));
        assert!(cache.check(ObjId(1), false));
        assert!(cache.remove(ObjId(1)));
        assert!(!cache.check(ObjId(1), false));
    }

    #[rstest]
    fn test_remove_unknown_id_returns_false_without_panicking() {
        let mut cache = sfifo(4, 16);
        assert!(!cache.remove(ObjId(999)));
    }

    #[rstest]
    fn test_can_insert_false_for_object_larger_than_segment() {
        let cache = sfifo(4, 16); // per_seg_max_size = 4
        assert!(!cache.can_insert(&Request::new(ObjId(1), 5)));
    }

    #[rstest]
    fn test_segment_bytes_sum_matches_occupied_size_after_many_requests() {
        let mut cache = sfifo(4, 32);
        for id in 0..100u64 {
            cache.get(&req(id % 20));
        }
        let sum_bytes: u64 = cache.segment_bytes.iter().sum();
        let sum_counts: usize = cache.segment_counts.iter().sum();
        assert_eq!(sum_bytes, cache.stats().occupied_size);
        assert_eq!(sum_counts, cache.stats().n_obj);
        assert!(cache.stats().occupied_size <= 32);
    }

    #[rstest]
    fn test_from_spec_params_feed_constructor() {
        let params = SegmentedFifoParams::from_spec("n-seg=3").unwrap();
        let cache = sfifo(params.n_seg, 30);
        assert_eq!(cache.n_seg, 3);
        assert_eq!(cache.per_seg_max_size, 10);
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;
    use rcachesim_core::ObjId;

    use super::*;

    proptest! {
        #[test]
        fn prop_segment_bytes_never_exceed_per_seg_max_size(
            n_seg in 1usize..6,
            cache_size in 8u64..128,
            ids in proptest::collection::vec(0u64..32, 0..300),
        ) {
            let mut cache = SegmentedFifo::new(
                CommonCacheParams::new(cache_size).with_hashpower(6),
                SegmentedFifoParams { n_seg },
            );
            for id in ids {
                cache.get(&Request::new(ObjId(id), 1));
                for &bytes in &cache.segment_bytes {
                    prop_assert!(bytes <= cache.per_seg_max_size);
                }
            }
        }

        #[test]
        fn prop_occupied_size_never_exceeds_cache_size(
            n_seg in 1usize..6,
            cache_size in 8u64..128,
            ids in proptest::collection::vec(0u64..32, 0..300),
        ) {
            let mut cache = SegmentedFifo::new(
                CommonCacheParams::new(cache_size).with_hashpower(6),
                SegmentedFifoParams { n_seg },
            );
            for id in ids {
                cache.get(&Request::new(ObjId(id), 1));
                prop_assert!(cache.stats().occupied_size <= cache_size);
            }
        }

        #[test]
        fn prop_segment_counts_and_bytes_track_occupied_and_n_obj(
            n_seg in 1usize..6,
            cache_size in 8u64..128,
            ids in proptest::collection::vec(0u64..32, 0..300),
        ) {
            let mut cache = SegmentedFifo::new(
                CommonCacheParams::new(cache_size).with_hashpower(6),
                SegmentedFifoParams { n_seg },
            );
            for id in ids {
                cache.get(&Request::new(ObjId(id), 1));
            }
            let sum_bytes: u64 = cache.segment_bytes.iter().sum();
            let sum_counts: usize = cache.segment_counts.iter().sum();
            prop_assert_eq!(sum_bytes, cache.stats().occupied_size);
            prop_assert_eq!(sum_counts, cache.stats().n_obj);
        }
    }
}
