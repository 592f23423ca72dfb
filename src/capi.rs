//! C entry points over the process heap. Failures come back as `-1` or a
//! null pointer.
//!
//! `mem_init` failures are also written to stderr, since a C host usually
//! installs no `log` backend. Everything else goes through `log` only.

use std::ptr;

use libc::{c_int, c_void};
use log::error;

use crate::{error::HeapError, global};

fn size_from(size: c_int) -> Result<usize, HeapError> {
  usize::try_from(size)
    .ok()
    .filter(|&size| size > 0)
    .ok_or(HeapError::InvalidSize)
}

fn status(result: Result<(), HeapError>) -> c_int {
  match result {
    Ok(()) => 0,
    Err(err) => err.status(),
  }
}

#[unsafe(no_mangle)]
pub extern "C" fn mem_init(size: c_int) -> c_int {
  let size = size_from(size).inspect_err(|_| error!("requested region size {size} is not positive"));
  let result = size.and_then(global::init);
  if let Err(err) = &result {
    eprintln!("{}", init_diagnostic(err));
  }
  status(result)
}

fn init_diagnostic(err: &HeapError) -> String {
  format!("Error: tagalloc: mem_init: {err}")
}

#[unsafe(no_mangle)]
pub extern "C" fn mem_alloc(size: c_int) -> *mut c_void {
  size_from(size)
    .and_then(global::allocate)
    .map_or(ptr::null_mut(), |ptr| ptr.as_ptr().cast())
}

#[unsafe(no_mangle)]
pub extern "C" fn mem_free(ptr: *mut c_void) -> c_int {
  status(global::free(ptr.cast()))
}

#[unsafe(no_mangle)]
pub extern "C" fn mem_dump() {
  global::dump();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn init_diagnostic_names_the_failure() {
    assert_eq!(
      init_diagnostic(&HeapError::DoubleInit),
      "Error: tagalloc: mem_init: the heap has already been initialized"
    );
    assert!(init_diagnostic(&HeapError::InvalidSize).contains("not positive"));
  }

  #[test]
  fn sizes_must_be_positive() {
    assert!(matches!(size_from(0), Err(HeapError::InvalidSize)));
    assert!(matches!(size_from(-4), Err(HeapError::InvalidSize)));
    assert_eq!(size_from(24).unwrap(), 24);
  }
}
