use std::{io, ptr::NonNull, slice};

use crate::{align, block::WORD_SIZE, error::HeapError};

/// Size of a virtual memory page on this system.
pub fn page_size() -> usize {
  let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
  if size <= 0 { 4096 } else { size as usize }
}

/// One contiguous, zero-filled, page-aligned mapping.
///
/// Words are addressed by byte offset from the start of the mapping and every
/// access is bounds-checked against its length.
pub struct Region {
  base: NonNull<u8>,
  len: usize,
}

// SAFETY: the mapping is owned exclusively by this value and is not tied to
// the thread that created it.
unsafe impl Send for Region {}

impl Region {
  /// Maps at least `requested` bytes, rounded up to the page size.
  pub fn map(requested: usize) -> Result<Self, HeapError> {
    let page = page_size();
    if requested == 0 || requested > usize::MAX - page {
      return Err(HeapError::InvalidSize);
    }
    let len = align!(requested, page);

    let address = unsafe {
      libc::mmap(
        std::ptr::null_mut(),
        len,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
        -1,
        0,
      )
    };

    if address == libc::MAP_FAILED {
      return Err(HeapError::BackingAllocationFailure(io::Error::last_os_error()));
    }

    let base = NonNull::new(address as *mut u8).ok_or_else(|| {
      HeapError::BackingAllocationFailure(io::Error::other("mmap returned null"))
    })?;

    Ok(Self { base, len })
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn base(&self) -> *mut u8 {
    self.base.as_ptr()
  }

  /// Pointer to the byte at `offset`.
  pub fn at(
    &self,
    offset: usize,
  ) -> NonNull<u8> {
    assert!(offset < self.len, "offset {offset} outside region");
    unsafe { self.base.add(offset) }
  }

  /// Offset of `address` from the start of the region, if it lies inside.
  pub fn offset_of(
    &self,
    address: *const u8,
  ) -> Option<usize> {
    (address as usize)
      .checked_sub(self.base.as_ptr() as usize)
      .filter(|&offset| offset < self.len)
  }

  pub fn word(
    &self,
    offset: usize,
  ) -> u32 {
    let bytes = &self.bytes()[offset..offset + WORD_SIZE];
    u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
  }

  pub fn set_word(
    &mut self,
    offset: usize,
    word: u32,
  ) {
    self.bytes_mut()[offset..offset + WORD_SIZE].copy_from_slice(&word.to_ne_bytes());
  }

  fn bytes(&self) -> &[u8] {
    unsafe { slice::from_raw_parts(self.base.as_ptr(), self.len) }
  }

  fn bytes_mut(&mut self) -> &mut [u8] {
    unsafe { slice::from_raw_parts_mut(self.base.as_ptr(), self.len) }
  }
}

impl Drop for Region {
  fn drop(&mut self) {
    unsafe {
      libc::munmap(self.base.as_ptr().cast(), self.len);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn map_rounds_up_to_page_size() {
    let page = page_size();
    let region = Region::map(page + 1).unwrap();

    assert_eq!(region.len(), 2 * page);
    assert_eq!(region.base() as usize % page, 0);
  }

  #[test]
  fn mapping_is_zero_filled() {
    let region = Region::map(64).unwrap();

    for offset in (0..region.len()).step_by(WORD_SIZE) {
      assert_eq!(region.word(offset), 0);
    }
  }

  #[test]
  fn words_round_trip_at_offsets() {
    let mut region = Region::map(64).unwrap();
    region.set_word(12, 0xDEAD_BEEF);

    assert_eq!(region.word(12), 0xDEAD_BEEF);
    assert_eq!(region.word(8), 0);
  }

  #[test]
  fn offset_of_rejects_outside_addresses() {
    let region = Region::map(64).unwrap();

    assert_eq!(region.offset_of(region.base()), Some(0));
    assert_eq!(region.offset_of(region.base().wrapping_sub(1)), None);
    assert_eq!(region.offset_of(region.base().wrapping_add(region.len())), None);
  }

  #[test]
  #[should_panic]
  fn word_past_the_end_panics() {
    let region = Region::map(64).unwrap();
    region.word(region.len() - 2);
  }
}
