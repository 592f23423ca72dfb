//! Process-wide heap behind a one-shot guard.
//!
//! The first successful [`init`] installs the heap for the rest of the
//! process. Every call takes the same lock for its whole duration, so the
//! scan and coalescing steps never interleave.

use std::{
  ptr::NonNull,
  sync::{Mutex, MutexGuard, PoisonError},
};

use log::error;

use crate::{error::HeapError, heap::Heap, inspect::Report};

static HEAP: Mutex<Option<Heap>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Heap>> {
  HEAP.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_heap<T>(f: impl FnOnce(&mut Heap) -> Result<T, HeapError>) -> Result<T, HeapError> {
  lock().as_mut().ok_or(HeapError::Uninitialized).and_then(f)
}

/// Sets up the process heap. Fails with [`HeapError::DoubleInit`] once a
/// previous call has succeeded; a failed call leaves the guard unarmed.
pub fn init(size: usize) -> Result<(), HeapError> {
  let mut slot = lock();

  if slot.is_some() {
    error!("the heap has already been initialized by a previous call");
    return Err(HeapError::DoubleInit);
  }

  *slot = Some(Heap::init(size)?);
  Ok(())
}

pub fn allocate(size: usize) -> Result<NonNull<u8>, HeapError> {
  with_heap(|heap| heap.allocate(size))
}

pub fn free(ptr: *mut u8) -> Result<(), HeapError> {
  with_heap(|heap| heap.free(ptr))
}

pub fn report() -> Result<Report, HeapError> {
  with_heap(|heap| Ok(heap.report()))
}

/// Prints the block list, or nothing before [`init`].
pub fn dump() {
  if let Some(heap) = lock().as_ref() {
    heap.dump();
  }
}
