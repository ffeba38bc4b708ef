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

//! The eviction policies (FIFO, segmented FIFO) and the concurrent chained hash index
//! that backs both of them.
//!
//! A driver constructs a [`Fifo`] or [`SegmentedFifo`], then drives it through the
//! shared [`EvictionPolicy`] trait: [`EvictionPolicy::get`] is the standard per-request
//! admission path, with [`EvictionPolicy::check`], [`EvictionPolicy::insert`],
//! [`EvictionPolicy::evict`], and [`EvictionPolicy::remove`] available individually for
//! callers that need finer control (trace replay tooling, test harnesses).

pub mod index;
pub mod list;
pub mod params;
pub mod policy;
pub mod record;
pub mod stats;

pub use index::ChainedHashIndex;
pub use list::ListEnds;
pub use params::{
    CommonCacheParams, SegmentedFifoParams, DEFAULT_HASHPOWER, DEFAULT_N_SEG, OBJ_METADATA_SIZE,
};
pub use policy::fifo::Fifo;
pub use policy::sfifo::SegmentedFifo;
pub use policy::{EvictedObject, EvictionPolicy};
pub use record::{ObjectRecord, RecordHandle};
pub use stats::{CacheStats, EvictionAgeRecorder, NullEvictionAgeRecorder, VecEvictionAgeRecorder};
