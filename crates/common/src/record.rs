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

//! The cache-resident object record and the non-owning handle the eviction policies
//! use to reference it.
//!
//! # Ownership model
//!
//! A resident record is heap-allocated exactly once, as a `Box<ObjectRecord>` owned by
//! the bucket chain of a [`crate::index::ChainedHashIndex`] (the record's own
//! `hash_next` field continues that chain). A policy never owns a record; it is handed
//! a [`RecordHandle`] — a `Copy` wrapper around a raw, non-null pointer into the boxed
//! allocation — and uses it to thread its own intrusive segment list through the
//! `list_prev`/`list_next` fields. Because a `Box`'s heap address never moves while the
//! box is alive (only the pointer *value* moves when the box itself is relocated, e.g.
//! spliced between chain links), a handle taken while a record is resident stays valid
//! for as long as that residency lasts.
//!
//! The handle becomes dangling the instant the owning index drops the record (on
//! eviction or explicit removal). Every caller in this crate upholds the invariant
//! promised by the specification: a policy unlinks a record from its own segment list
//! in the same operation that asks the index to delete it, and never touches a handle
//! afterward.

use std::ptr::NonNull;

use rcachesim_core::{ObjId, RealTime, VirtualTime};

/// A cache-resident object.
pub struct ObjectRecord {
    /// The object's identifier.
    pub obj_id: ObjId,
    /// The object's payload size in bytes, excluding per-object overhead.
    pub obj_size: u32,
    /// The segment a segmented policy has placed this record in; `None` for FIFO and
    /// for records not yet placed.
    pub segment_id: Option<usize>,
    /// Wall-clock creation timestamp, if the driver supplied one.
    pub create_time_real: Option<RealTime>,
    /// Request-counter ("virtual time") creation timestamp.
    pub create_time_virtual: VirtualTime,
    /// Intrusive previous pointer within the policy's segment list. Owned by the
    /// policy; the hash index never reads or writes this field.
    pub(crate) list_prev: Option<RecordHandle>,
    /// Intrusive next pointer within the policy's segment list.
    pub(crate) list_next: Option<RecordHandle>,
    /// Intrusive next pointer within the hash bucket chain. Owned by the index; a
    /// policy never reads or writes this field.
    pub(crate) hash_next: Option<Box<ObjectRecord>>,
}

impl ObjectRecord {
    /// Creates a new record with no list linkage, ready to be handed to
    /// [`crate::index::ChainedHashIndex::insert`].
    #[must_use]
    pub fn new(
        obj_id: ObjId,
        obj_size: u32,
        create_time_real: Option<RealTime>,
        create_time_virtual: VirtualTime,
    ) -> Self {
        Self {
            obj_id,
            obj_size,
            segment_id: None,
            create_time_real,
            create_time_virtual,
            list_prev: None,
            list_next: None,
            hash_next: None,
        }
    }
}

/// A `Copy`able, non-owning reference to a resident [`ObjectRecord`].
///
/// See the module documentation for the safety argument behind treating this as a
/// stable handle rather than a borrow.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RecordHandle(NonNull<ObjectRecord>);

// SAFETY: a `RecordHandle` is a bare pointer into a record that is otherwise always
// accessed through the index's own synchronization (see the module documentation); it
// carries no thread-affine state of its own, so it is safe to send and share across
// threads under the same invariants that already govern dereferencing it.
unsafe impl Send for RecordHandle {}
unsafe impl Sync for RecordHandle {}

impl RecordHandle {
    pub(crate) fn from_box(record: &Box<ObjectRecord>) -> Self {
        Self(NonNull::from(record.as_ref()))
    }

    /// # Safety
    ///
    /// The caller must ensure the pointee is still resident in its owning hash index;
    /// see the module documentation.
    #[must_use]
    pub(crate) fn as_ref(&self) -> &ObjectRecord {
        // SAFETY: handles are only created from, and only outlive, a record's
        // residency in its owning `ChainedHashIndex`; see the module documentation.
        unsafe { self.0.as_ref() }
    }

    /// # Safety
    ///
    /// Same contract as [`RecordHandle::as_ref`]. The policy layer is the sole writer
    /// of the fields reachable through this accessor (`segment_id`, `list_prev`,
    /// `list_next`); the hash index never aliases them.
    #[must_use]
    pub(crate) fn as_mut(&mut self) -> &mut ObjectRecord {
        // SAFETY: see `as_ref`; exclusivity of the policy-owned fields is maintained
        // by convention (the hash index only ever touches `hash_next`).
        unsafe { self.0.as_mut() }
    }

    /// The object identifier of the referenced record.
    #[must_use]
    pub fn obj_id(&self) -> ObjId {
        self.as_ref().obj_id
    }

    /// The object size of the referenced record.
    #[must_use]
    pub fn obj_size(&self) -> u32 {
        self.as_ref().obj_size
    }

    /// The segment the referenced record currently occupies.
    #[must_use]
    pub fn segment_id(&self) -> Option<usize> {
        self.as_ref().segment_id
    }

    /// The wall-clock creation timestamp of the referenced record.
    #[must_use]
    pub fn create_time_real(&self) -> Option<RealTime> {
        self.as_ref().create_time_real
    }

    /// The virtual-time creation timestamp of the referenced record.
    #[must_use]
    pub fn create_time_virtual(&self) -> VirtualTime {
        self.as_ref().create_time_virtual
    }

    pub(crate) fn set_segment_id(&mut self, segment_id: Option<usize>) {
        self.as_mut().segment_id = segment_id;
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_new_record_has_no_linkage() {
        let record = ObjectRecord::new(ObjId(1), 16, None, VirtualTime(0));
        assert_eq!(record.obj_id, ObjId(1));
        assert_eq!(record.obj_size, 16);
        assert!(record.segment_id.is_none());
        assert!(record.list_prev.is_none());
        assert!(record.list_next.is_none());
        assert!(record.hash_next.is_none());
    }

    #[rstest]
    fn test_handle_reads_through_to_record() {
        let boxed = Box::new(ObjectRecord::new(ObjId(9), 32, Some(RealTime(5)), VirtualTime(2)));
        let handle = RecordHandle::from_box(&boxed);
        assert_eq!(handle.obj_id(), ObjId(9));
        assert_eq!(handle.obj_size(), 32);
        assert_eq!(handle.create_time_real(), Some(RealTime(5)));
        assert_eq!(handle.create_time_virtual(), VirtualTime(2));
    }

    #[rstest]
    fn test_set_segment_id_is_visible_through_another_handle() {
        let boxed = Box::new(ObjectRecord::new(ObjId(1), 1, None, VirtualTime(0)));
        let mut handle_a = RecordHandle::from_box(&boxed);
        let handle_b = RecordHandle::from_box(&boxed);
        handle_a.set_segment_id(Some(3));
        assert_eq!(handle_b.segment_id(), Some(3));
    }
}
