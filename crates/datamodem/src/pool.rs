//! Best-effort recycling of writer cores.
//!
//! One process-wide slot holds at most one released staging-plus-intern
//! allocation. Put-if-empty and take-or-null are the only operations; on a
//! contended put the loser is dropped rather than retried. Only cores with
//! the default capacity are offered (see
//! [`release`](crate::DataWriter::release)), so the consuming constructor
//! always receives the configuration it assumes.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use crate::intern::InternTable;

/// A released writer stripped to its reusable allocations. The sink is
/// never pooled.
#[derive(Debug)]
pub(crate) struct Scratch {
    pub(crate) buf: Vec<u8>,
    pub(crate) refs: InternTable,
}

pub(crate) struct Slot(AtomicPtr<Scratch>);

impl Slot {
    pub(crate) const fn new() -> Self {
        Self(AtomicPtr::new(ptr::null_mut()))
    }

    pub(crate) fn take(&self) -> Option<Box<Scratch>> {
        let p = self.0.swap(ptr::null_mut(), Ordering::AcqRel);
        if p.is_null() {
            None
        } else {
            // Safe: `p` came from `Box::into_raw` in `put` and the swap just
            // transferred sole ownership to us.
            Some(unsafe { Box::from_raw(p) })
        }
    }

    pub(crate) fn put(&self, scratch: Scratch) {
        let p = Box::into_raw(Box::new(scratch));
        if self
            .0
            .compare_exchange(ptr::null_mut(), p, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            // Slot occupied: discard the loser.
            // Safe: the exchange failed, so `p` never left our hands.
            drop(unsafe { Box::from_raw(p) });
        }
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.take();
    }
}

static SLOT: Slot = Slot::new();

pub(crate) fn take() -> Option<Box<Scratch>> {
    SLOT.take()
}

pub(crate) fn put(scratch: Scratch) {
    SLOT.put(scratch);
}
