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

//! The intrusive doubly-linked list primitives shared by every eviction policy's
//! segment lists.
//!
//! Every policy keeps a `(head, tail)` pair of [`RecordHandle`]s per segment and threads
//! `list_prev`/`list_next` through the records themselves rather than allocating a
//! separate list node. The three operations below — prepend, unlink, and move-to-head —
//! cover every splice a FIFO or segmented-FIFO policy needs.

use crate::record::RecordHandle;

/// The head and tail of one intrusive list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListEnds {
    pub head: Option<RecordHandle>,
    pub tail: Option<RecordHandle>,
}

impl ListEnds {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    /// Links `node` in as the new head of the list.
    pub fn prepend(&mut self, mut node: RecordHandle) {
        node.as_mut().list_prev = None;
        node.as_mut().list_next = self.head;
        if let Some(mut old_head) = self.head {
            old_head.as_mut().list_prev = Some(node);
        } else {
            self.tail = Some(node);
        }
        self.head = Some(node);
    }

    /// Unlinks `node` from the list. `node` must currently belong to this list.
    pub fn unlink(&mut self, mut node: RecordHandle) {
        let prev = node.as_ref().list_prev;
        let next = node.as_ref().list_next;

        match prev {
            Some(mut prev) => prev.as_mut().list_next = next,
            None => self.head = next,
        }
        match next {
            Some(mut next) => next.as_mut().list_prev = prev,
            None => self.tail = prev,
        }

        node.as_mut().list_prev = None;
        node.as_mut().list_next = None;
    }

    /// Moves `node`, already a member of this list, to the head.
    pub fn move_to_head(&mut self, node: RecordHandle) {
        if self.head == Some(node) {
            return;
        }
        self.unlink(node);
        self.prepend(node);
    }

    /// Removes and returns the tail node, if any.
    pub fn pop_tail(&mut self) -> Option<RecordHandle> {
        let tail = self.tail?;
        self.unlink(tail);
        Some(tail)
    }

    /// Whether the list has no members.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}
