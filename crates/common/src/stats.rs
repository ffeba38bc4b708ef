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

//! Policy-local bookkeeping: occupancy counters and the pluggable eviction-age sink.
//!
//! Unlike the hash index's `n_obj`, these counters are single-threaded — each policy
//! owns one [`CacheStats`] and updates it inline with every admission, promotion, and
//! eviction, so it never needs atomics.

/// Running occupancy and request counters for one cache instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Sum of `obj_size` over every resident object.
    pub occupied_size: u64,
    /// Number of resident objects.
    pub n_obj: usize,
    /// Total requests observed.
    pub n_req: u64,
    /// Requests that hit a resident object.
    pub n_hit: u64,
    /// Requests that missed.
    pub n_miss: u64,
}

impl CacheStats {
    /// A fresh, empty counter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            occupied_size: 0,
            n_obj: 0,
            n_req: 0,
            n_hit: 0,
            n_miss: 0,
        }
    }

    /// Records a request outcome.
    pub fn record_request(&mut self, hit: bool) {
        self.n_req += 1;
        if hit {
            self.n_hit += 1;
        } else {
            self.n_miss += 1;
        }
    }

    /// Records the admission of a new resident object of `obj_size` bytes.
    pub fn record_admit(&mut self, obj_size: u32) {
        self.occupied_size += u64::from(obj_size);
        self.n_obj += 1;
    }

    /// Records the departure (eviction or explicit removal) of a resident object.
    pub fn record_depart(&mut self, obj_size: u32) {
        self.occupied_size = self.occupied_size.saturating_sub(u64::from(obj_size));
        self.n_obj = self.n_obj.saturating_sub(1);
    }

    /// The running hit ratio, or `0.0` before any request has been observed.
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        if self.n_req == 0 {
            0.0
        } else {
            self.n_hit as f64 / self.n_req as f64
        }
    }
}

/// A sink for the age (time since admission) of every evicted object.
///
/// Ages are reported in both wall-clock and virtual-time units when the driver supplied
/// a wall-clock timestamp at admission; otherwise only the virtual-time age is known.
pub trait EvictionAgeRecorder {
    /// Called once per eviction, with the evicted object's age.
    fn record_eviction(&mut self, real_age: Option<u64>, virtual_age: u64);
}

/// An [`EvictionAgeRecorder`] that discards everything. The default for policies that
/// do not need age tracking.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEvictionAgeRecorder;

impl EvictionAgeRecorder for NullEvictionAgeRecorder {
    fn record_eviction(&mut self, _real_age: Option<u64>, _virtual_age: u64) {}
}

/// An [`EvictionAgeRecorder`] that retains every age it is given, in eviction order.
/// Intended for tests and for drivers that want to post-process the full distribution.
#[derive(Debug, Clone, Default)]
pub struct VecEvictionAgeRecorder {
    ages: Vec<(Option<u64>, u64)>,
}

impl VecEvictionAgeRecorder {
    /// An empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self { ages: Vec::new() }
    }

    /// The `(real_age, virtual_age)` pairs recorded so far, oldest eviction first.
    #[must_use]
    pub fn ages(&self) -> &[(Option<u64>, u64)] {
        &self.ages
    }
}

impl EvictionAgeRecorder for VecEvictionAgeRecorder {
    fn record_eviction(&mut self, real_age: Option<u64>, virtual_age: u64) {
        self.ages.push((real_age, virtual_age));
    }
}
