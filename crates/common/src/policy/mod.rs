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

//! The dispatch surface every eviction policy implements, and the shared driver
//! admission path built on top of it.

pub mod fifo;
pub mod sfifo;

use rcachesim_core::{ObjId, Request};

use crate::record::RecordHandle;
use crate::stats::CacheStats;

/// The identity and size of an object that just left the cache, handed back to the
/// caller of [`EvictionPolicy::evict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictedObject {
    pub obj_id: ObjId,
    pub obj_size: u32,
}

/// The operation set every eviction policy exposes to a driver.
///
/// A constructor and `Drop` stand in for the historical `initialize`/`free` pair; the
/// remaining methods below are this trait, implemented once by [`fifo::Fifo`] and once
/// by [`sfifo::SegmentedFifo`], so [`EvictionPolicy::get`] — the admission path — is
/// written once here and shared by both.
pub trait EvictionPolicy {
    /// Looks up `id`. When `update` is true and the lookup hits, the policy applies its
    /// hit-side effects (FIFO: none; segmented FIFO: promotion). Returns whether `id`
    /// was resident.
    fn check(&mut self, id: ObjId, update: bool) -> bool;

    /// Whether `req` could be admitted without exceeding any hard per-object bound
    /// (segment capacity for segmented FIFO; always true for plain FIFO as long as the
    /// object alone does not exceed the whole cache).
    fn can_insert(&self, req: &Request) -> bool;

    /// Whether admitting `req` right now, before any further eviction, would exceed the
    /// cache's byte budget.
    fn needs_eviction_for(&self, req: &Request) -> bool;

    /// Admits `req` as a new resident object. The caller must already know `req` is not
    /// resident (a prior [`EvictionPolicy::check`] returned `false`).
    fn insert(&mut self, req: &Request);

    /// A read-only look at the next object [`EvictionPolicy::evict`] would remove,
    /// without removing it.
    fn to_evict(&self) -> Option<RecordHandle>;

    /// Evicts one object chosen by the policy's replacement order. Returns `None` if
    /// the cache is empty.
    fn evict(&mut self, req: &Request) -> Option<EvictedObject>;

    /// Removes `id` if resident. Returns `false`, and does not panic, if it is not —
    /// removing an id the caller merely suspects is resident is a normal, non-erroneous
    /// path for this interface.
    fn remove(&mut self, id: ObjId) -> bool;

    /// The policy's running occupancy and request counters.
    fn stats(&self) -> &CacheStats;

    /// Mutable access to the policy's running counters, for [`EvictionPolicy::get`]'s
    /// default implementation.
    fn stats_mut(&mut self) -> &mut CacheStats;

    /// Lets a policy track the most recent wall-clock timestamp it has observed, for
    /// eviction-age recording. The default does nothing; override if age recording is
    /// wired up.
    fn note_request_time(&mut self, _req: &Request) {}

    /// The standard driver admission path: check, and on miss, evict until there is
    /// room, then insert.
    fn get(&mut self, req: &Request) -> bool {
        self.note_request_time(req);
        let hit = self.check(req.obj_id, true);
        self.stats_mut().record_request(hit);

        if hit {
            log::debug!(
                "admission hit id={} size={}",
                req.obj_id,
                req.obj_size
            );
            return true;
        }

        log::debug!(
            "admission miss id={} size={}",
            req.obj_id,
            req.obj_size
        );

        if !self.can_insert(req) {
            return false;
        }

        while self.needs_eviction_for(req) {
            if self.evict(req).is_none() {
                log::warn!("evict attempted on an empty cache");
                break;
            }
        }

        self.insert(req);
        false
    }
}
