//! Error type shared by the raw buffer and the array.
use std::{
	error,
	fmt
};

/// Errors returned by the fallible operations of [`SimpleVec`](crate::generic::SimpleVec).
///
/// Only checked element access ([`at`](crate::generic::SimpleVec::at)) and the `try_*`
/// allocation methods produce an error. Every other operation either succeeds or
/// panics on a violated precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// Checked access with an index that is not smaller than the length.
	OutOfRange {
		/// The requested index.
		index: usize,

		/// The length of the array at the time of the access.
		len: usize
	},

	/// The requested capacity cannot be represented, either because its size in bytes
	/// overflows or because it exceeds the maximum length of the metadata layout.
	CapacityOverflow,

	/// The global allocator failed to provide memory.
	AllocFailed {
		/// Requested size in bytes.
		size: usize,

		/// Requested alignment.
		align: usize
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::OutOfRange { index, len } => write!(f, "index out of range: the len is {} but the index is {}", len, index),
			Self::CapacityOverflow => f.write_str("capacity overflow"),
			Self::AllocFailed { size, align } => write!(f, "memory allocation of {} bytes (align {}) failed", size, align)
		}
	}
}

impl error::Error for Error {}
