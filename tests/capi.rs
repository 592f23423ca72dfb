use std::ptr;

use tagalloc::{
  capi::{mem_alloc, mem_dump, mem_free, mem_init},
  global,
};
use test_log::test;

#[test]
fn c_entry_points_report_status_codes() {
  assert!(mem_alloc(8).is_null());
  assert_eq!(mem_init(-1), -1);
  assert_eq!(mem_init(0), -1);

  assert_eq!(mem_init(4096), 0);
  assert_eq!(mem_init(4096), -1);

  assert!(mem_alloc(0).is_null());
  assert!(mem_alloc(-8).is_null());

  let a = mem_alloc(20);
  let b = mem_alloc(20);
  let c = mem_alloc(20);
  assert!(!a.is_null() && !b.is_null() && !c.is_null());
  assert_eq!(a as usize % 8, 0);

  assert_eq!(mem_free(a), 0);
  assert_eq!(mem_free(b), 0);
  assert_eq!(mem_free(a), -1);
  assert_eq!(mem_free(ptr::null_mut()), -1);

  let report = global::report().unwrap();
  assert_eq!(report.blocks[0].size, 48);
  assert!(!report.blocks[0].allocated);
  assert!(report.blocks[1].allocated);
  assert!(!report.blocks[1].prev_allocated);

  mem_dump();
}
