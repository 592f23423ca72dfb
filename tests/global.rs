use tagalloc::{HeapError, global};
use test_log::test;

// The guard is per process, so the whole lifecycle runs in one test.
#[test]
fn second_init_keeps_the_first_heap() {
  assert!(matches!(global::allocate(8), Err(HeapError::Uninitialized)));
  assert!(matches!(global::init(0), Err(HeapError::InvalidSize)));

  global::init(4096).unwrap();
  let ptr = global::allocate(16).unwrap();
  let before = global::report().unwrap();

  assert!(matches!(global::init(4096), Err(HeapError::DoubleInit)));
  assert!(matches!(global::init(1 << 20), Err(HeapError::DoubleInit)));

  assert_eq!(global::report().unwrap(), before);
  global::free(ptr.as_ptr()).unwrap();
  assert!(matches!(global::free(ptr.as_ptr()), Err(HeapError::AlreadyFree)));

  let report = global::report().unwrap();
  assert_eq!(report.blocks.len(), 1);
  assert_eq!(report.free_size, report.total_size());
  global::dump();
}
