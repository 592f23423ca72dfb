//! # tagalloc - A Best-Fit Boundary-Tag Heap
//!
//! This crate provides a small `malloc`/`free` style allocator that manages a
//! single fixed-size region mapped once from the operating system. All block
//! metadata lives inside the region itself: there is no side table and no
//! explicit free list.
//!
//! ## Overview
//!
//! ```text
//!   Region layout:
//!
//!   ┌─────┬──────────────┬────────────────────────┬──────────────┬─────┐
//!   │ pad │  Busy block  │       Free block       │  Busy block  │  S  │
//!   │ 4 B │ hdr│ payload │ hdr│              │ftr │ hdr│ payload │ 4 B │
//!   └─────┴──────────────┴────────────────────────┴──────────────┴─────┘
//!         ▲                                                         ▲
//!         first block                                          sentinel
//! ```
//!
//! - Every block starts with a one-word header packing its size with two
//!   status bits (allocated, previous block allocated).
//! - Free blocks repeat their size in a footer word, the boundary tag that
//!   lets `free` reach a free left neighbour in O(1).
//! - The sentinel is a zero-sized, allocated header that ends every walk.
//!
//! ## Crate Structure
//!
//! ```text
//!   tagalloc
//!   ├── align      - Alignment macro (align!)
//!   ├── block      - Header/footer word codec
//!   ├── region     - mmap-backed region (internal)
//!   ├── heap       - Heap: init, allocate, free
//!   ├── inspect    - Block walk, report and dump
//!   ├── global     - Process-wide one-shot heap
//!   └── capi       - C entry points over the global heap
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tagalloc::Heap;
//!
//! fn main() -> Result<(), tagalloc::HeapError> {
//!     let mut heap = Heap::init(4096)?;
//!
//!     let ptr = heap.allocate(16)?;
//!     unsafe { ptr.as_ptr().write_bytes(0xAB, 16) };
//!
//!     heap.free(ptr.as_ptr())?;
//!     heap.dump();
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! `allocate` walks blocks in address order and keeps the smallest free block
//! that fits. The first exact fit stops the walk. A larger block is split and
//! its tail becomes a new free block:
//!
//! ```text
//!   Before:  ┌──────────────── free 64 ────────────────┐
//!   After:   ┌── busy 24 ──┬──────── free 40 ──────────┐
//! ```
//!
//! `free` clears the allocated bit and merges the block with a free left
//! neighbour (found through its footer) and a free right neighbour, so no
//! two free blocks are ever adjacent.
//!
//! ## Limitations
//!
//! - **Fixed size**: the region never grows or shrinks
//! - **No corruption detection**: out-of-bounds writes into headers go unnoticed
//! - **Unix-only**: requires `libc` and `mmap`
//!
//! ## Safety
//!
//! The heap never dereferences caller pointers: `free` maps them back to
//! offsets inside the region and bounds-checks every header it touches.
//! Writing through a returned pointer is up to the caller.

pub mod align;
mod block;
pub mod capi;
mod error;
pub mod global;
mod heap;
mod inspect;
mod region;

pub use block::{Block, WORD_SIZE};
pub use error::HeapError;
pub use heap::Heap;
pub use inspect::{BlockInfo, Blocks, Report};
