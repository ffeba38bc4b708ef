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

//! The request record submitted by a driver for each trace entry.

use crate::{ids::ObjId, time::RealTime};

/// A single cache access submitted by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    /// The identifier of the object being accessed.
    pub obj_id: ObjId,
    /// The byte size of the object, excluding per-object overhead.
    pub obj_size: u32,
    /// The wall-clock time of the access, if the driver tracks it.
    pub real_time: Option<RealTime>,
}

impl Request {
    /// Creates a new [`Request`] with no wall-clock timestamp.
    #[must_use]
    pub const fn new(obj_id: ObjId, obj_size: u32) -> Self {
        Self {
            obj_id,
            obj_size,
            real_time: None,
        }
    }

    /// Creates a new [`Request`] carrying a wall-clock timestamp.
    #[must_use]
    pub const fn with_real_time(obj_id: ObjId, obj_size: u32, real_time: RealTime) -> Self {
        Self {
            obj_id,
            obj_size,
            real_time: Some(real_time),
        }
    }
}
