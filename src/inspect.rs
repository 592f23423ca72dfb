use std::fmt;

use crate::heap::{FIRST_BLOCK, Heap};

/// One block as seen by a walk over the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
  /// Position in address order, starting at 1.
  pub index: usize,
  pub allocated: bool,
  pub prev_allocated: bool,
  /// Address of the header.
  pub start: usize,
  /// Address of the last byte.
  pub end: usize,
  /// Size including header and footer.
  pub size: usize,
}

/// Address-order walk from the first block up to the sentinel.
pub struct Blocks<'a> {
  heap: &'a Heap,
  offset: usize,
  index: usize,
}

impl Iterator for Blocks<'_> {
  type Item = BlockInfo;

  fn next(&mut self) -> Option<Self::Item> {
    let block = self.heap.block_at(self.offset);
    if block.is_sentinel() {
      return None;
    }

    let start = self.heap.region.base() as usize + self.offset;
    self.index += 1;
    self.offset += block.size;

    Some(BlockInfo {
      index: self.index,
      allocated: block.allocated,
      prev_allocated: block.prev_allocated,
      start,
      end: start + block.size - 1,
      size: block.size,
    })
  }
}

/// Snapshot of every block plus byte totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
  pub blocks: Vec<BlockInfo>,
  pub busy_size: usize,
  pub free_size: usize,
}

impl Report {
  pub fn total_size(&self) -> usize {
    self.busy_size + self.free_size
  }
}

fn status(busy: bool) -> &'static str {
  if busy { "Busy" } else { "Free" }
}

const RULE: &str = "--------------------------------------------------------------------------------";
const STARS: &str = "********************************************************************************";

impl fmt::Display for Report {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    writeln!(f, "{STARS}")?;
    writeln!(f, "No.\tStatus\tPrev\tt_Begin\t\tt_End\t\tt_Size")?;
    writeln!(f, "{RULE}")?;

    for block in &self.blocks {
      writeln!(
        f,
        "{}\t{}\t{}\t{:#010x}\t{:#010x}\t{}",
        block.index,
        status(block.allocated),
        status(block.prev_allocated),
        block.start,
        block.end,
        block.size
      )?;
    }

    writeln!(f, "{RULE}")?;
    writeln!(f, "{STARS}")?;
    writeln!(f, "Total busy size = {}", self.busy_size)?;
    writeln!(f, "Total free size = {}", self.free_size)?;
    writeln!(f, "Total size = {}", self.total_size())?;
    writeln!(f, "{STARS}")
  }
}

impl Heap {
  pub fn blocks(&self) -> Blocks<'_> {
    Blocks {
      heap: self,
      offset: FIRST_BLOCK,
      index: 0,
    }
  }

  pub fn report(&self) -> Report {
    let blocks: Vec<BlockInfo> = self.blocks().collect();
    let sum = |allocated: bool| -> usize {
      blocks
        .iter()
        .filter(|block| block.allocated == allocated)
        .map(|block| block.size)
        .sum()
    };

    Report {
      busy_size: sum(true),
      free_size: sum(false),
      blocks,
    }
  }

  /// Prints the block list to stdout.
  pub fn dump(&self) {
    print!("{}", self.report());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn walk_reports_addresses_and_totals() {
    let mut heap = Heap::init(4096).unwrap();
    let a = heap.allocate(20).unwrap();
    heap.allocate(100).unwrap();
    heap.free(a.as_ptr()).unwrap();

    let report = heap.report();
    let first = report.blocks[0];
    let second = report.blocks[1];

    assert_eq!(first.index, 1);
    assert_eq!(first.start, heap.start() as usize);
    assert_eq!(first.end, first.start + 23);
    assert_eq!(second.start, first.end + 1);
    assert!(!second.prev_allocated);
    assert_eq!(report.busy_size, 104);
    assert_eq!(report.free_size, heap.capacity() - 104);
    assert_eq!(report.total_size(), heap.capacity());
  }

  #[test]
  fn table_lists_every_block() {
    let mut heap = Heap::init(4096).unwrap();
    heap.allocate(20).unwrap();

    let table = heap.report().to_string();
    let rows: Vec<_> = table.lines().filter(|line| line.starts_with(char::is_numeric)).collect();

    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("1\tBusy\tBusy\t0x"));
    assert!(rows[0].ends_with("\t24"));
    assert!(rows[1].starts_with("2\tFree\tBusy\t0x"));
    assert!(table.contains("Total busy size = 24\n"));
    assert!(table.contains(&format!("Total size = {}\n", heap.capacity())));
  }
}
