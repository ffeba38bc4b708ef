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

//! Deterministic 64-bit mixing and the bucket/stripe addressing shared by the chained
//! hash index.
//!
//! The mixing function is a fixed (unseeded) finalizer rather than a randomized hasher:
//! reproducible bucket placement across runs is a feature for a cache simulator, since
//! two runs over the same trace must produce the same hit/miss sequence.

use crate::ids::ObjId;

/// Mixes a 64-bit value using the splitmix64 finalizer.
///
/// Deterministic: the same input always maps to the same output, in this process and
/// any other.
#[must_use]
pub const fn mix64(x: u64) -> u64 {
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Returns the bucket index for `id` within a table of `2^hashpower` buckets.
#[must_use]
pub const fn bucket_index(id: ObjId, hashpower: u8) -> usize {
    let mask = (1u64 << hashpower) - 1;
    (mix64(id.0) & mask) as usize
}

/// Returns the number of stripes (reader/writer locks) for a table with the given
/// `hashpower`: `2^max(0, hashpower - 7)`.
#[must_use]
pub const fn stripe_count(hashpower: u8) -> usize {
    let stripe_bits = hashpower.saturating_sub(7);
    1usize << stripe_bits
}

/// Returns the stripe index that guards `bucket_id`, given `stripe_count` stripes.
#[must_use]
pub const fn stripe_index(bucket_id: usize, stripe_count: usize) -> usize {
    bucket_id & (stripe_count - 1)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_mix64_deterministic() {
        assert_eq!(mix64(42), mix64(42));
    }

    #[rstest]
    fn test_mix64_is_not_identity() {
        assert_ne!(mix64(1), 1);
    }

    #[rstest]
    #[case(0u8)]
    #[case(1u8)]
    #[case(4u8)]
    #[case(10u8)]
    #[case(20u8)]
    fn test_bucket_index_within_range(#[case] hashpower: u8) {
        let num_buckets = 1usize << hashpower;
        for raw in [0u64, 1, 2, 1000, u64::MAX, u64::MAX / 2] {
            let idx = bucket_index(ObjId(raw), hashpower);
            assert!(idx < num_buckets);
        }
    }

    #[rstest]
    #[case(0u8, 1usize)]
    #[case(6u8, 1usize)]
    #[case(7u8, 1usize)]
    #[case(8u8, 2usize)]
    #[case(10u8, 8usize)]
    #[case(20u8, 1usize << 13)]
    fn test_stripe_count(#[case] hashpower: u8, #[case] expected: usize) {
        assert_eq!(stripe_count(hashpower), expected);
    }

    #[rstest]
    fn test_stripe_index_masks_low_bits() {
        let stripes = stripe_count(10); // 8
        assert_eq!(stripe_index(0, stripes), 0);
        assert_eq!(stripe_index(1, stripes), 1);
        assert_eq!(stripe_index(8, stripes), 0);
        assert_eq!(stripe_index(9, stripes), 1);
    }

    #[rstest]
    fn test_stripe_index_never_exceeds_stripe_count() {
        let stripes = stripe_count(14);
        for bucket_id in 0..(1usize << 14) {
            assert!(stripe_index(bucket_id, stripes) < stripes);
        }
    }
}
