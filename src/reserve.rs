//! Reserve-only construction.
//!
//! ```
//! # use simple_vec::{reserve, SimpleVec};
//! let v: SimpleVec<String> = reserve(16).into();
//! assert!(v.is_empty());
//! assert_eq!(v.capacity(), 16);
//! ```
use crate::generic::{
	Meta,
	SimpleVec
};

/// A capacity request, turned into an empty vector with exactly this capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveProxy {
	capacity: usize
}

impl ReserveProxy {
	#[inline]
	pub fn new(capacity: usize) -> Self {
		ReserveProxy { capacity }
	}

	#[inline]
	pub fn capacity(&self) -> usize {
		self.capacity
	}
}

/// Requests a vector with `capacity` slots and no element.
#[inline]
pub fn reserve(capacity: usize) -> ReserveProxy {
	ReserveProxy::new(capacity)
}

impl<M: Meta, T: Default> From<ReserveProxy> for SimpleVec<M, T> {
	#[inline]
	fn from(proxy: ReserveProxy) -> Self {
		SimpleVec::with_capacity(proxy.capacity())
	}
}

#[cfg(test)]
mod tests {
	use crate::SimpleVec;
	use super::*;

	#[test]
	fn reserved_vec_is_empty() {
		let mut v = SimpleVec::from(reserve(5));
		assert_eq!(v.len(), 0);
		assert_eq!(v.capacity(), 5);

		for i in 0..5 {
			v.push_back(i);
		}
		assert_eq!(v.capacity(), 5);

		v.push_back(5);
		assert_eq!(v.capacity(), 10);
	}

	#[test]
	fn zero_reservation_does_not_allocate() {
		let v: SimpleVec<u8> = reserve(0).into();
		assert_eq!(v.capacity(), 0);
	}
}
