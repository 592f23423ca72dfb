use std::ptr::NonNull;

use tagalloc::{Heap, HeapError};

/// Prints a labelled allocation together with its header address.
fn print_alloc(
  label: &str,
  size: usize,
  ptr: NonNull<u8>,
) {
  println!(
    "[{}] Allocated {} bytes, payload = {:?}, header = {:#X}, addr % 8 = {}",
    label,
    size,
    ptr,
    ptr.as_ptr() as usize - tagalloc::WORD_SIZE,
    ptr.as_ptr() as usize % 8
  );
}

fn main() -> Result<(), HeapError> {
  env_logger::init();

  // --------------------------------------------------------------------
  // 1) Map one page. The whole region starts out as a single free block.
  // --------------------------------------------------------------------
  let mut heap = Heap::init(4096)?;
  println!("[1] Heap initialized, {} bytes usable", heap.capacity());
  heap.dump();

  // --------------------------------------------------------------------
  // 2) Allocate three neighbours A, B, C and a guard block D.
  //    Each request grows by the 4-byte header and rounds up to 8.
  // --------------------------------------------------------------------
  let a = heap.allocate(20)?;
  let b = heap.allocate(12)?;
  let c = heap.allocate(40)?;
  let d = heap.allocate(4)?;
  print_alloc("2", 20, a);
  print_alloc("2", 12, b);
  print_alloc("2", 40, c);
  print_alloc("2", 4, d);

  unsafe {
    a.as_ptr().write_bytes(0xAB, 20);
    c.cast::<u64>().write(0x1122334455667788);
  }
  heap.dump();

  // --------------------------------------------------------------------
  // 3) Free A and C. C's neighbours are busy, so nothing merges yet,
  //    but B and D now see a free predecessor.
  // --------------------------------------------------------------------
  heap.free(a.as_ptr())?;
  heap.free(c.as_ptr())?;
  println!("\n[3] Freed A and C");
  heap.dump();

  // --------------------------------------------------------------------
  // 4) Free B. It merges with A on the left and C on the right.
  // --------------------------------------------------------------------
  heap.free(b.as_ptr())?;
  println!("\n[4] Freed B, A + B + C coalesced");
  heap.dump();

  // --------------------------------------------------------------------
  // 5) A request that exactly matches the merged hole reuses it.
  // --------------------------------------------------------------------
  let e = heap.allocate(84)?;
  print_alloc("5", 84, e);
  println!("[5] e == a? {}", if e == a { "Yes, it reused the hole" } else { "No" });

  // --------------------------------------------------------------------
  // 6) Failures leave the heap untouched.
  // --------------------------------------------------------------------
  println!("\n[6] free(null): {:?}", heap.free(std::ptr::null_mut()).err());
  println!("[6] allocate(1 MiB): {:?}", heap.allocate(1 << 20).err());

  heap.free(e.as_ptr())?;
  heap.free(d.as_ptr())?;
  println!("\n[7] Everything freed");
  heap.dump();

  Ok(())
}
