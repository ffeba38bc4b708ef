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

//! Parameters shared by every policy, and the segmented-FIFO-specific parameter string
//! parser.

/// Default hash-index `hashpower` when the caller does not specify one.
pub const DEFAULT_HASHPOWER: u8 = 20;

/// Per-object metadata overhead charged when `consider_obj_metadata` is set, mirroring
/// the historical implementation's fixed-size bookkeeping header.
pub const OBJ_METADATA_SIZE: u32 = 16;

/// Default number of segments for [`crate::policy::sfifo::SegmentedFifo`].
pub const DEFAULT_N_SEG: usize = 4;

/// Parameters shared by every policy in this crate.
#[derive(Debug, Clone, Copy)]
pub struct CommonCacheParams {
    /// Total byte budget of the cache.
    pub cache_size: u64,
    /// Whether per-object metadata overhead is charged against `cache_size`.
    pub consider_obj_metadata: bool,
    /// Bytes added to the FIFO policy's accounting on top of `obj_size`.
    pub per_obj_overhead: u32,
    /// `log2` of the hash index's bucket count.
    pub hashpower: u8,
}

impl CommonCacheParams {
    /// Creates parameters for a cache of `cache_size` bytes, with no per-object
    /// overhead and the default hash-index sizing.
    #[must_use]
    pub const fn new(cache_size: u64) -> Self {
        Self {
            cache_size,
            consider_obj_metadata: false,
            per_obj_overhead: 0,
            hashpower: DEFAULT_HASHPOWER,
        }
    }

    /// Returns `self` with `consider_obj_metadata` set.
    #[must_use]
    pub const fn with_obj_metadata(mut self, consider_obj_metadata: bool) -> Self {
        self.consider_obj_metadata = consider_obj_metadata;
        self
    }

    /// Returns `self` with a specific `per_obj_overhead`.
    #[must_use]
    pub const fn with_per_obj_overhead(mut self, per_obj_overhead: u32) -> Self {
        self.per_obj_overhead = per_obj_overhead;
        self
    }

    /// Returns `self` with a specific `hashpower`.
    #[must_use]
    pub const fn with_hashpower(mut self, hashpower: u8) -> Self {
        self.hashpower = hashpower;
        self
    }

    /// The per-object metadata overhead in force: [`OBJ_METADATA_SIZE`] when
    /// `consider_obj_metadata` is set, otherwise `0`.
    #[must_use]
    pub const fn obj_md_size(&self) -> u32 {
        if self.consider_obj_metadata {
            OBJ_METADATA_SIZE
        } else {
            0
        }
    }
}

/// Parsed parameters specific to [`crate::policy::sfifo::SegmentedFifo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentedFifoParams {
    /// Number of segments.
    pub n_seg: usize,
}

impl Default for SegmentedFifoParams {
    fn default() -> Self {
        Self {
            n_seg: DEFAULT_N_SEG,
        }
    }
}

impl SegmentedFifoParams {
    /// Parses a comma-separated `key=value` parameter string (e.g. `"n-seg=8"`).
    ///
    /// The only recognized keys are `n-seg` and the valueless `print`, matched
    /// case-insensitively. `print` logs the parameters parsed so far at `info` level
    /// rather than printing to stdout and terminating the process, since this is a
    /// library with no controlling CLI. An unknown key or an unparsable `n-seg` value
    /// is reported as `Err` rather than aborting.
    pub fn from_spec(spec: &str) -> anyhow::Result<Self> {
        let mut params = Self::default();

        for entry in spec.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            if entry.eq_ignore_ascii_case("print") {
                log::info!("SegmentedFifoParams {{ n_seg: {} }}", params.n_seg);
                continue;
            }

            let Some((key, value)) = entry.split_once('=') else {
                let err = anyhow::anyhow!("unrecognized segmented-fifo parameter: '{entry}'");
                log::error!("{err}");
                return Err(err);
            };

            let key = key.trim();
            let value = value.trim();

            if key.eq_ignore_ascii_case("n-seg") {
                params.n_seg = value.parse().map_err(|_| {
                    let err = anyhow::anyhow!("invalid n-seg value: '{value}'");
                    log::error!("{err}");
                    err
                })?;
            } else {
                let err = anyhow::anyhow!("unknown segmented-fifo parameter key: '{key}'");
                log::error!("{err}");
                return Err(err);
            }
        }

        Ok(params)
    }
}
