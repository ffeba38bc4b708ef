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

//! Object identifier newtype.

use std::fmt::{self, Display, Formatter};

/// A 64-bit identifier for a cache-resident object.
///
/// At most one resident record may carry a given `ObjId` at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjId(pub u64);

impl ObjId {
    /// Returns the raw 64-bit value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for ObjId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ObjId> for u64 {
    fn from(id: ObjId) -> Self {
        id.0
    }
}

impl Display for ObjId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_roundtrip_conversion() {
        let id = ObjId::from(42u64);
        assert_eq!(id.value(), 42);
        assert_eq!(u64::from(id), 42);
    }

    #[rstest]
    fn test_ordering_matches_raw_value() {
        assert!(ObjId(1) < ObjId(2));
        assert_eq!(ObjId(5), ObjId(5));
    }

    #[rstest]
    fn test_display() {
        assert_eq!(ObjId(7).to_string(), "7");
    }
}
