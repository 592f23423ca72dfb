use std::mem;

/// Bytes taken by one header or footer word.
pub const WORD_SIZE: usize = mem::size_of::<u32>();

const ALLOCATED: u32 = 0b01;
const PREV_ALLOCATED: u32 = 0b10;
const FLAGS: u32 = ALLOCATED | PREV_ALLOCATED;

/// Decoded form of a header word.
///
/// Sizes are multiples of 8, so the two low bits of the packed word are free
/// to carry the block's own status and its predecessor's:
///
/// ```text
///   31                                   2   1   0
///   ┌────────────────────────────────────┬───┬───┐
///   │               size                 │ P │ A │
///   └────────────────────────────────────┴───┴───┘
///   A = this block is allocated
///   P = the block right before this one is allocated
/// ```
///
/// Footers (free blocks only) store the size with both flags cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
  pub size: usize,
  pub allocated: bool,
  pub prev_allocated: bool,
}

impl Block {
  /// Terminating marker at the top of the region: zero size, allocated.
  pub const SENTINEL: Block = Block {
    size: 0,
    allocated: true,
    prev_allocated: false,
  };

  pub fn new(
    size: usize,
    allocated: bool,
    prev_allocated: bool,
  ) -> Self {
    Self {
      size,
      allocated,
      prev_allocated,
    }
  }

  pub fn free(
    size: usize,
    prev_allocated: bool,
  ) -> Self {
    Self::new(size, false, prev_allocated)
  }

  pub fn busy(
    size: usize,
    prev_allocated: bool,
  ) -> Self {
    Self::new(size, true, prev_allocated)
  }

  pub fn decode(word: u32) -> Self {
    Self {
      size: (word & !FLAGS) as usize,
      allocated: word & ALLOCATED != 0,
      prev_allocated: word & PREV_ALLOCATED != 0,
    }
  }

  pub fn encode(self) -> u32 {
    let mut word = self.size as u32;
    if self.allocated {
      word |= ALLOCATED;
    }
    if self.prev_allocated {
      word |= PREV_ALLOCATED;
    }
    word
  }

  /// Footer word for a free block of `size` bytes.
  pub fn footer(size: usize) -> u32 {
    size as u32 & !FLAGS
  }

  pub fn is_sentinel(&self) -> bool {
    self.size == 0 && self.allocated
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn busy_block_words() {
    // 20 payload bytes + 4 header bytes, rounded to 24.
    assert_eq!(Block::busy(24, true).encode(), 27);
    assert_eq!(Block::busy(24, false).encode(), 25);
  }

  #[test]
  fn free_block_words() {
    assert_eq!(Block::free(24, true).encode(), 26);
    assert_eq!(Block::free(24, false).encode(), 24);
    assert_eq!(Block::footer(24), 24);
  }

  #[test]
  fn decode_splits_flags_from_size() {
    let block = Block::decode(4090);

    assert_eq!(block.size, 4088);
    assert!(!block.allocated);
    assert!(block.prev_allocated);
  }

  #[test]
  fn sentinel_is_a_single_allocated_bit() {
    assert_eq!(Block::SENTINEL.encode(), 1);
    assert!(Block::decode(1).is_sentinel());
    assert!(!Block::decode(0b11 | 8).is_sentinel());
  }
}
