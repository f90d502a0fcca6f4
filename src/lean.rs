/// Length and capacity packed in a single `usize`, 32 bits each.
#[derive(Clone, Copy, Debug)]
pub struct Meta {
	data: usize
}

const CAP_MASK: usize = u32::MAX as usize;
const LEN_MASK: usize = (u32::MAX as usize) << 32;

impl crate::generic::Meta for Meta {
	const MAX_LENGTH: usize = u32::MAX as usize;

	fn new(len: usize, capacity: usize) -> Self {
		assert!(len <= Self::MAX_LENGTH);
		assert!(capacity <= Self::MAX_LENGTH);

		Meta {
			data: len << 32 | capacity
		}
	}

	fn len(&self) -> usize {
		self.data >> 32
	}

	fn capacity(&self) -> usize {
		self.data & CAP_MASK
	}

	fn set_len(&mut self, len: usize) {
		assert!(len <= Self::MAX_LENGTH);
		self.data = (len << 32) | (self.data & CAP_MASK)
	}

	fn set_capacity(&mut self, capacity: usize) {
		assert!(capacity <= Self::MAX_LENGTH);
		self.data = (self.data & LEN_MASK) | capacity
	}
}

pub type SimpleVec<T> = crate::generic::SimpleVec<Meta, T>;
pub type IntoIter<T> = crate::iter::IntoIter<Meta, T>;

#[cfg(test)]
mod tests {
	use crate::{
		generic::Meta as _,
		Error
	};
	use super::*;

	#[test]
	fn packs_len_and_capacity() {
		let mut meta = Meta::new(3, 10);
		assert_eq!(meta.len(), 3);
		assert_eq!(meta.capacity(), 10);

		meta.set_len(7);
		meta.set_capacity(u32::MAX as usize);
		assert_eq!(meta.len(), 7);
		assert_eq!(meta.capacity(), u32::MAX as usize);

		meta.set_len(0);
		assert_eq!(meta.capacity(), u32::MAX as usize);
	}

	#[test]
	fn lean_vec_behaves_like_wide() {
		let mut v: SimpleVec<u16> = SimpleVec::new();
		for i in 0..9 {
			v.push_back(i);
		}

		assert_eq!(v.capacity(), 16);
		v.insert(0, 100);
		v.erase(9);
		assert_eq!(v, [100, 0, 1, 2, 3, 4, 5, 6, 7]);
		assert_eq!(std::mem::size_of::<Meta>(), std::mem::size_of::<usize>());
	}

	#[test]
	fn capacity_is_bounded_by_u32() {
		let mut v: SimpleVec<()> = SimpleVec::new();
		assert_eq!(v.try_reserve(u32::MAX as usize + 1), Err(Error::CapacityOverflow));
		assert_eq!(v.capacity(), 0);
	}
}
