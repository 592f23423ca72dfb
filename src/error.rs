use std::io;

/// Failures reported by the heap. None of them leave the heap modified.
#[derive(Debug, thiserror::Error)]
pub enum HeapError {
  #[error("requested size is not positive or too large for a block header")]
  InvalidSize,

  #[error("the heap has already been initialized")]
  DoubleInit,

  #[error("cannot map backing memory: {0}")]
  BackingAllocationFailure(#[source] io::Error),

  #[error("the heap has not been initialized")]
  Uninitialized,

  #[error("null pointer")]
  NullPointer,

  #[error("pointer does not belong to the heap")]
  ForeignPointer,

  #[error("block is already free")]
  AlreadyFree,

  #[error("pointer or block size is not double-word aligned")]
  Misaligned,

  #[error("no free block is large enough")]
  OutOfMemory,
}

impl HeapError {
  /// Status code used by the C entry points.
  pub fn status(&self) -> i32 {
    -1
  }
}
