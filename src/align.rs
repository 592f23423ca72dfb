/// Double-word boundary every block size and payload address honors.
pub const DOUBLE_WORD: usize = 8;

/// Rounds `value` up to the double-word boundary, or to an explicit
/// power-of-two alignment when one is given.
///
/// # Examples
///
/// ```rust
/// use tagalloc::align;
///
/// assert_eq!(align!(13), 16);
/// assert_eq!(align!(24), 24);
/// assert_eq!(align!(5000, 4096), 8192);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    $crate::align!($value, $crate::align::DOUBLE_WORD)
  };
  ($value:expr, $alignment:expr) => {
    ($value + $alignment - 1) & !($alignment - 1)
  };
}
