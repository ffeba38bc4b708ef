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

//! Foundational types shared by the rcachesim crates: object identifiers, timestamps,
//! the request record, and the deterministic bucket-hashing primitives used by the
//! chained hash index.

pub mod hash;
pub mod ids;
pub mod request;
pub mod time;

pub use hash::{bucket_index, mix64, stripe_count, stripe_index};
pub use ids::ObjId;
pub use request::Request;
pub use time::{RealTime, VirtualTime};
