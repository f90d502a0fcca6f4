//! This crate provides the [`SimpleVec`] data structure:
//! a contiguous growable array with explicit capacity control.
//!
//! A `SimpleVec` owns a single buffer of `capacity` slots, of which the first `len`
//! hold its elements. Appending is amortized constant time: the capacity goes from 0
//! to 1, then doubles each time the array is full. Removing elements never releases
//! memory, and capacity only changes through growth, [`reserve`](SimpleVec::reserve)
//! or [`shrink_to_fit`](SimpleVec::shrink_to_fit).
//!
//! ## Basic usage
//!
//! ```rust
//! use simple_vec::SimpleVec;
//!
//! let mut v = SimpleVec::new();
//! v.push_back(1);
//! v.push_back(2);
//! assert_eq!(v.capacity(), 2);
//!
//! v.insert(1, 9);
//! assert_eq!(v, [1, 9, 2]);
//! assert_eq!(v.capacity(), 4);
//!
//! v.erase(1);
//! v.resize(5);
//! assert_eq!(v, [1, 2, 0, 0, 0]);
//! ```
//!
//! Element access through indexing panics on out-of-range indexes, just like slices.
//! [`at`](SimpleVec::at) reports them as an [`Error`] instead:
//! ```rust
//! # use simple_vec::{SimpleVec, Error};
//! let v = SimpleVec::from([1, 2, 3]);
//! assert_eq!(v.at(5), Err(Error::OutOfRange { index: 5, len: 3 }));
//! ```
//!
//! Every slot of the buffer always holds a value: fresh slots are filled with
//! `T::default()`, and elements moved out of the array leave a default value
//! behind. This is why operations that allocate require `T: Default`.
//!
//! ## Metadata layout
//!
//! The length and capacity are stored according to a [`Meta`](generic::Meta) layout.
//! [`wide::SimpleVec`] (re-exported at the root) stores them as two `usize`,
//! while on 64-bit targets [`lean::SimpleVec`] packs them in a single `usize`,
//! limiting the capacity to `u32::MAX`.
//!
//! ## Features
//!
//! - `serde`: `Serialize` / `Deserialize` implementations, as a sequence of elements.
pub mod raw;
pub mod generic;
pub mod iter;
pub mod wide;
#[cfg(target_pointer_width = "64")]
pub mod lean;
#[cfg(not(target_pointer_width = "64"))]
pub mod lean {
	//! Re-exports `wide` for non-64-bit targets
	pub use super::wide::*;
}
mod error;
mod reserve;
#[cfg(feature = "serde")]
mod serde;

pub use error::Error;
pub use reserve::{
	reserve,
	ReserveProxy
};
pub use wide::{
	SimpleVec,
	IntoIter
};
