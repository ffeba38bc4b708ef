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

//! Plain FIFO: one queue, admission at the head, eviction at the tail, no reordering
//! on hit.

use rcachesim_core::{ObjId, RealTime, Request, VirtualTime};

use crate::index::ChainedHashIndex;
use crate::list::ListEnds;
use crate::params::CommonCacheParams;
use crate::policy::{EvictedObject, EvictionPolicy};
use crate::record::ObjectRecord;
use crate::stats::{CacheStats, EvictionAgeRecorder, NullEvictionAgeRecorder};

/// A plain FIFO eviction policy.
///
/// `R` is the eviction-age sink; it defaults to [`NullEvictionAgeRecorder`], which
/// discards every age. Use [`Fifo::with_age_recorder`] to plug in
/// [`crate::stats::VecEvictionAgeRecorder`] or a custom sink.
pub struct Fifo<R: EvictionAgeRecorder = NullEvictionAgeRecorder> {
    params: CommonCacheParams,
    index: ChainedHashIndex,
    list: ListEnds,
    stats: CacheStats,
    last_real_time: Option<RealTime>,
    age_recorder: R,
}

impl Fifo<NullEvictionAgeRecorder> {
    /// Creates an empty FIFO cache with no eviction-age recording.
    #[must_use]
    pub fn new(params: CommonCacheParams) -> Self {
        Self::with_age_recorder(params, NullEvictionAgeRecorder)
    }
}

impl<R: EvictionAgeRecorder> Fifo<R> {
    /// Creates an empty FIFO cache that reports evicted-object ages to `age_recorder`.
    #[must_use]
    pub fn with_age_recorder(params: CommonCacheParams, age_recorder: R) -> Self {
        let index = ChainedHashIndex::new(params.hashpower);
        Self {
            params,
            index,
            list: ListEnds::new(),
            stats: CacheStats::new(),
            last_real_time: None,
            age_recorder,
        }
    }

    fn charged_size(&self, obj_size: u32) -> u32 {
        obj_size + self.params.per_obj_overhead
    }
}

impl<R: EvictionAgeRecorder> EvictionPolicy for Fifo<R> {
    fn check(&mut self, id: ObjId, _update: bool) -> bool {
        // Plain FIFO never reorders on a hit; `update` has no effect.
        self.index.find(id).is_some()
    }

    fn can_insert(&self, req: &Request) -> bool {
        u64::from(self.charged_size(req.obj_size)) <= self.params.cache_size
    }

    fn needs_eviction_for(&self, req: &Request) -> bool {
        self.stats.occupied_size + u64::from(self.charged_size(req.obj_size)) > self.params.cache_size
    }

    fn insert(&mut self, req: &Request) {
        let record = Box::new(ObjectRecord::new(
            req.obj_id,
            req.obj_size,
            self.last_real_time,
            VirtualTime(self.stats.n_req),
        ));
        let handle = self.index.insert(record);
        self.list.prepend(handle);
        self.stats.record_admit(self.charged_size(req.obj_size));
    }

    fn to_evict(&self) -> Option<crate::record::RecordHandle> {
        self.list.tail
    }

    fn evict(&mut self, _req: &Request) -> Option<EvictedObject> {
        let handle = self.list.pop_tail()?;
        let obj_id = handle.obj_id();
        let obj_size = handle.obj_size();

        if let Some(create_time_real) = handle.create_time_real() {
            let real_age = self.last_real_time.map_or(0, |now| now - create_time_real);
            let virtual_age = self.stats.n_req - handle.create_time_virtual().0;
            self.age_recorder.record_eviction(Some(real_age), virtual_age);
        } else {
            let virtual_age = self.stats.n_req - handle.create_time_virtual().0;
            self.age_recorder.record_eviction(None, virtual_age);
        }

        self.index.delete_by_id(obj_id);
        self.stats.record_depart(self.charged_size(obj_size));
        log::debug!("evicted id={obj_id} size={obj_size}");
        Some(EvictedObject { obj_id, obj_size })
    }

    fn remove(&mut self, id: ObjId) -> bool {
        let Some(handle) = self.index.find(id) else {
            log::warn!("remove called for non-resident id={id}");
            return false;
        };
        let obj_size = handle.obj_size();
        self.list.unlink(handle);
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
