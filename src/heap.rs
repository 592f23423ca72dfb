use std::ptr::NonNull;

use log::{debug, error, trace};

use crate::{
  align,
  align::DOUBLE_WORD,
  block::{Block, WORD_SIZE},
  error::HeapError,
  region::{Region, page_size},
};

/// Offset of the first block header. One word of padding in front of it puts
/// every payload on a double-word boundary.
pub(crate) const FIRST_BLOCK: usize = WORD_SIZE;

/// A best-fit heap over a single fixed region, tracked with boundary tags.
///
/// ```text
///   offset 0   4                                                   len-4
///   ┌────┬────────────┬─────────────────────┬──────────────┬──────┬────┐
///   │pad │ hdr│payload│ hdr│ free ... │ftr │ hdr│payload   │ ...  │ S  │
///   └────┴────────────┴─────────────────────┴──────────────┴──────┴────┘
///        ▲ first block                                            ▲ sentinel
/// ```
///
/// Busy blocks carry only a header. Free blocks also carry a footer in their
/// last word, which lets `free` find a free left neighbour in O(1).
pub struct Heap {
  pub(crate) region: Region,
  pub(crate) end: usize,
}

impl Heap {
  /// Maps a region of at least `size` bytes and lays out one free block
  /// spanning all of it, followed by the sentinel.
  pub fn init(size: usize) -> Result<Self, HeapError> {
    let page = page_size();

    if size == 0 {
      error!("requested region size is not positive");
      return Err(HeapError::InvalidSize);
    }

    if size > u32::MAX as usize - (page - 1) {
      error!("requested region size {size} does not fit a block header");
      return Err(HeapError::InvalidSize);
    }

    let region = Region::map(size).inspect_err(|err| {
      error!("cannot allocate {size} bytes of backing memory: {err}");
    })?;

    // One word of front padding plus the sentinel word.
    let usable = region.len() - DOUBLE_WORD;
    let end = FIRST_BLOCK + usable;

    let mut heap = Self { region, end };
    heap.set_block(end, Block::SENTINEL);
    heap.set_block(FIRST_BLOCK, Block::free(usable, true));
    heap.set_footer(FIRST_BLOCK, usable);

    debug!(
      "heap initialized: {} bytes mapped at {:?}, {} usable",
      heap.region.len(),
      heap.region.base(),
      usable
    );

    Ok(heap)
  }

  /// Bytes covered by blocks, headers and footers included.
  pub fn capacity(&self) -> usize {
    self.end - FIRST_BLOCK
  }

  /// Address of the first block header.
  pub fn start(&self) -> *const u8 {
    self.region.at(FIRST_BLOCK).as_ptr()
  }

  /// Hands out `size` bytes from the smallest free block that fits.
  ///
  /// The returned address is double-word aligned. Its contents are whatever
  /// the block held before.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<NonNull<u8>, HeapError> {
    if size == 0 {
      return Err(HeapError::InvalidSize);
    }

    if size > self.capacity() {
      debug!("allocate({size}): larger than the whole heap");
      return Err(HeapError::OutOfMemory);
    }

    let need = align!(size + WORD_SIZE);

    let Some((offset, block)) = self.best_fit(need) else {
      debug!("allocate({size}): no free block of {need} bytes");
      return Err(HeapError::OutOfMemory);
    };

    if block.size > need {
      let rest = offset + need;
      let rest_size = block.size - need;
      self.set_block(rest, Block::free(rest_size, true));
      self.set_footer(rest, rest_size);
      trace!("split block at {offset}: {need} busy, {rest_size} free at {rest}");
    } else {
      let next = offset + need;
      let mut successor = self.block_at(next);
      if !successor.is_sentinel() {
        successor.prev_allocated = true;
        self.set_block(next, successor);
      }
      trace!("exact fit at {offset}: {need} bytes");
    }

    self.set_block(offset, Block::busy(need, block.prev_allocated));

    Ok(self.region.at(offset + WORD_SIZE))
  }

  /// Returns the block behind `ptr` to the heap, merging it with free
  /// neighbours on either side.
  pub fn free(
    &mut self,
    ptr: *mut u8,
  ) -> Result<(), HeapError> {
    if ptr.is_null() {
      return Err(HeapError::NullPointer);
    }

    let payload = self
      .region
      .offset_of(ptr)
      .filter(|&offset| offset >= FIRST_BLOCK + WORD_SIZE && offset < self.end)
      .ok_or(HeapError::ForeignPointer)?;

    if payload % DOUBLE_WORD != 0 {
      return Err(HeapError::Misaligned);
    }

    let header = payload - WORD_SIZE;
    let block = self.block_at(header);

    if !block.allocated {
      return Err(HeapError::AlreadyFree);
    }

    if !self.fits(block.size, header, self.end) {
      return Err(HeapError::Misaligned);
    }

    let mut start = header;
    let mut size = block.size;
    let mut prev_allocated = block.prev_allocated;

    if !block.prev_allocated {
      let left_size = Block::decode(self.region.word(header - WORD_SIZE)).size;
      if !self.fits(left_size, FIRST_BLOCK, header) {
        return Err(HeapError::Misaligned);
      }

      let left = self.block_at(header - left_size);
      if left.allocated || left.size != left_size {
        return Err(HeapError::Misaligned);
      }

      start -= left_size;
      size += left_size;
      prev_allocated = left.prev_allocated;
      trace!("coalesce {header} with free left neighbour at {start}");
    }

    let next = header + block.size;
    let mut successor = self.block_at(next);

    if !successor.allocated && !self.fits(successor.size, next, self.end) {
      return Err(HeapError::Misaligned);
    }

    if !successor.allocated {
      size += successor.size;
      trace!("coalesce {header} with free right neighbour at {next}");
    } else if !successor.is_sentinel() {
      successor.prev_allocated = false;
      self.set_block(next, successor);
    }

    self.set_block(start, Block::free(size, prev_allocated));
    self.set_footer(start, size);

    Ok(())
  }

  /// Walks blocks in address order and picks the smallest free one holding
  /// `need` bytes. The first exact fit ends the walk.
  fn best_fit(
    &self,
    need: usize,
  ) -> Option<(usize, Block)> {
    let mut best: Option<(usize, Block)> = None;
    let mut offset = FIRST_BLOCK;

    loop {
      let block = self.block_at(offset);

      if block.is_sentinel() {
        break;
      }

      if !block.allocated {
        if block.size == need {
          return Some((offset, block));
        }

        if block.size > need && best.is_none_or(|(_, current)| block.size < current.size) {
          best = Some((offset, block));
        }
      }

      offset += block.size;
    }

    best
  }

  /// Whether a block of `size` bytes is well formed and fits between
  /// offsets `from` and `to`.
  fn fits(
    &self,
    size: usize,
    from: usize,
    to: usize,
  ) -> bool {
    size != 0 && size % DOUBLE_WORD == 0 && size <= to - from
  }

  pub(crate) fn block_at(
    &self,
    offset: usize,
  ) -> Block {
    Block::decode(self.region.word(offset))
  }

  fn set_block(
    &mut self,
    offset: usize,
    block: Block,
  ) {
    self.region.set_word(offset, block.encode());
  }

  fn set_footer(
    &mut self,
    offset: usize,
    size: usize,
  ) {
    self.region.set_word(offset + size - WORD_SIZE, Block::footer(size));
  }
}
